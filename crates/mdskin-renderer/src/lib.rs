use mdskin_core::{RenderConfig, StyleMapping, render, render_sanitized};
use std::fs;
use std::io;
use std::path::Path;

const PAGE_BACKGROUND: &str = "#f5f5f5";
const PAGE_WIDTH: &str = "480px";

/// Wraps rendered fragments the way the editor preview shows them.
#[derive(Debug, Clone)]
pub struct Preview {
    font_family: String,
    title: String,
}

impl Preview {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            font_family: config.font_family.clone(),
            title: "mdskin preview".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Renders `document` and wraps it in the article container.
    pub fn render_article(
        &self,
        document: &str,
        mapping: &StyleMapping,
        config: &RenderConfig,
        sanitized: bool,
    ) -> String {
        let html = if sanitized {
            render_sanitized(document, mapping, config)
        } else {
            render(document, mapping, config)
        };
        self.article(&html)
    }

    /// The container that carries the font stack. Copying this section into
    /// a rich-text editor keeps the font, since every child is inline-styled.
    pub fn article(&self, html: &str) -> String {
        let mut out = String::new();
        out.push_str("<section style=\"font-family: ");
        out.push_str(&self.font_family.replace('"', "'"));
        out.push_str("; word-break: break-word; text-align: justify;\">\n");
        out.push_str(html);
        if !html.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("</section>\n");
        out
    }

    pub fn embed_html(&self, html: &str, with_footer: bool) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n");
        out.push_str("<html lang=\"en\">\n");
        out.push_str("<head>\n");
        out.push_str("  <meta charset=\"utf-8\" />\n");
        out.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
        out.push_str("  <title>");
        out.push_str(&mdskin_core::escape_html(&self.title));
        out.push_str("</title>\n");
        out.push_str("</head>\n");
        out.push_str(&format!(
            "<body style=\"margin: 0; background: {PAGE_BACKGROUND};\">\n"
        ));
        out.push_str(&format!(
            "<main style=\"max-width: {PAGE_WIDTH}; margin: 0 auto; padding: 20px; background: #fff;\">\n"
        ));
        out.push_str(&self.article(html));
        if with_footer {
            out.push_str(
                "<p style=\"margin-top: 48px; color: #ccc; font-size: 12px; letter-spacing: 1px; text-align: center;\">— END —</p>\n",
            );
        }
        out.push_str("</main>\n");
        out.push_str("</body>\n");
        out.push_str("</html>\n");
        out
    }
}

pub fn write_page(path: &Path, html: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)
}
