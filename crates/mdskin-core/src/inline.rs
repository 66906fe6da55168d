//! Inline Markdown rules, applied as ordered global substitutions.
//!
//! Input is already HTML-escaped unless raw HTML is allowed. Order matters:
//! code spans are taken out first so their contents never look like
//! emphasis, and bold runs before italic so `**x**` is not read as two
//! italics.

use crate::escape::{escape_html, quote_attr};
use crate::vault::PlaceholderVault;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static CODE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("valid regex"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^\s*](?:[^*\n]*?[^\s*])?)\*").expect("valid regex"));
static STRIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").expect("valid regex"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]\n]*)\]\(([^)\n]*)\)").expect("valid regex"));
pub(crate) static IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]\n]*)\]\(([^)\n]*)\)").expect("valid regex"));

const CODE_SPAN_STYLE: &str = "background: #f4f4f5; color: #eb5757; padding: 2px 4px; \
border-radius: 3px; font-family: Menlo, monospace; font-size: 85%; margin: 0 2px;";

#[derive(Clone, Copy, Debug)]
pub struct InlineFormatter<'a> {
    accent: &'a str,
    /// Code span contents still need escaping (raw HTML mode).
    escape_code: bool,
}

impl<'a> InlineFormatter<'a> {
    pub fn new(accent: &'a str, escape_code: bool) -> Self {
        Self {
            accent,
            escape_code,
        }
    }

    /// Renders `` `code` `` spans and stores them in the vault.
    pub fn code_spans(&self, text: &str, vault: &mut PlaceholderVault) -> String {
        CODE_SPAN
            .replace_all(text, |caps: &Captures<'_>| {
                let body = if self.escape_code {
                    escape_html(&caps[1])
                } else {
                    caps[1].to_string()
                };
                vault.stash_inline(format!("<span style=\"{CODE_SPAN_STYLE}\">{body}</span>"))
            })
            .into_owned()
    }

    /// Links, then bold, italic and strikethrough. Finished links go to the
    /// vault so emphasis markers inside a URL stay literal; a label is
    /// emphasized on its own.
    pub fn format(&self, text: &str, vault: &mut PlaceholderVault) -> String {
        let text = self.links(text, vault);
        self.emphasis(&text)
    }

    fn emphasis(&self, text: &str) -> String {
        let text = self.bold(text);
        let text = italic(&text);
        strike(&text)
    }

    pub fn bold(&self, text: &str) -> String {
        BOLD.replace_all(text, |caps: &Captures<'_>| {
            format!(
                "<strong style=\"color: {}; font-weight: bold;\">{}</strong>",
                self.accent, &caps[1]
            )
        })
        .into_owned()
    }

    pub fn links(&self, text: &str, vault: &mut PlaceholderVault) -> String {
        LINK.replace_all(text, |caps: &Captures<'_>| {
            vault.stash_inline(format!(
                "<a href=\"{url}\" style=\"color: {c}; text-decoration: none; border-bottom: 1px dashed {c};\">{label}</a>",
                url = quote_attr(&caps[2]),
                c = self.accent,
                label = self.emphasis(&caps[1]),
            ))
        })
        .into_owned()
    }
}

pub fn italic(text: &str) -> String {
    ITALIC
        .replace_all(text, "<em style=\"font-style: italic; color: #666;\">$1</em>")
        .into_owned()
}

pub fn strike(text: &str) -> String {
    STRIKE
        .replace_all(text, "<del style=\"color: #999;\">$1</del>")
        .into_owned()
}

/// A centered image block with the alt text as an optional caption.
pub fn render_image(alt: &str, url: &str) -> String {
    let caption = if alt.is_empty() {
        String::new()
    } else {
        format!("<div style=\"font-size: 12px; color: #999; margin-top: 8px;\">{alt}</div>")
    };
    format!(
        "<section style=\"margin: 20px 0; text-align: center;\"><img src=\"{}\" alt=\"{}\" \
         style=\"max-width: 100%; border-radius: 6px; box-shadow: 0 4px 12px rgba(0,0,0,0.08);\" />{}</section>",
        quote_attr(url),
        quote_attr(alt),
        caption
    )
}

/// Formats one line on its own: escapes it, then applies every inline rule.
pub fn format_inline(line: &str, accent: &str) -> String {
    let mut vault = PlaceholderVault::for_source(line);
    let formatter = InlineFormatter::new(accent, false);
    let escaped = escape_html(line);
    let text = formatter.code_spans(&escaped, &mut vault);
    let text = IMAGE
        .replace_all(&text, |caps: &Captures<'_>| {
            vault.stash_inline(render_image(&caps[1], &caps[2]))
        })
        .into_owned();
    let text = formatter.format(&text, &mut vault);
    vault.resolve(&text)
}

#[cfg(test)]
mod tests {
    use super::{format_inline, italic, render_image};
    use pretty_assertions::assert_eq;

    #[test]
    fn bold_uses_accent_color() {
        assert_eq!(
            format_inline("**bold**", "#ff0000"),
            "<strong style=\"color: #ff0000; font-weight: bold;\">bold</strong>"
        );
    }

    #[test]
    fn bold_wins_over_italic() {
        let html = format_inline("**a** and *b*", "red");
        assert_eq!(
            html,
            "<strong style=\"color: red; font-weight: bold;\">a</strong> and \
             <em style=\"font-style: italic; color: #666;\">b</em>"
        );
    }

    #[test]
    fn code_span_content_is_not_emphasized() {
        let html = format_inline("`**x** <y>`", "red");
        assert!(html.contains(">**x** &lt;y&gt;</span>"));
        assert!(!html.contains("<strong"));
    }

    #[test]
    fn list_marker_is_not_italic() {
        assert_eq!(italic("* item"), "* item");
        assert_eq!(
            italic("* item *x*"),
            "* item <em style=\"font-style: italic; color: #666;\">x</em>"
        );
    }

    #[test]
    fn strike_and_link() {
        let html = format_inline("~~old~~ [site](https://a.b/?q=\"x\")", "red");
        assert_eq!(
            html,
            "<del style=\"color: #999;\">old</del> <a href=\"https://a.b/?q=&quot;x&quot;\" \
             style=\"color: red; text-decoration: none; border-bottom: 1px dashed red;\">site</a>"
        );
    }

    #[test]
    fn emphasis_markers_in_url_stay_literal() {
        let html = format_inline("[x](http://a.com/*y*z) and *b*", "red");
        assert!(html.contains("<a href=\"http://a.com/*y*z\""));
        assert_eq!(html.matches("<em ").count(), 1);
        assert!(html.ends_with("<em style=\"font-style: italic; color: #666;\">b</em>"));
    }

    #[test]
    fn link_label_is_emphasized() {
        let html = format_inline("[**go**](u)", "red");
        assert!(html.contains(
            "<a href=\"u\" style=\"color: red; text-decoration: none; border-bottom: 1px dashed red;\">\
             <strong style=\"color: red; font-weight: bold;\">go</strong></a>"
        ));
    }

    #[test]
    fn link_label_does_not_span_brackets() {
        let html = format_inline("[a] then [b](u)", "red");
        assert!(html.starts_with("[a] then <a href=\"u\""));
    }

    #[test]
    fn image_is_not_read_as_link() {
        let html = format_inline("![cat](c.png)", "red");
        assert!(html.contains("<img src=\"c.png\" alt=\"cat\""));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn image_without_alt_has_no_caption() {
        assert!(!render_image("", "x.png").contains("<div"));
        assert!(render_image("cap", "x.png").contains(">cap</div>"));
    }

    #[test]
    fn unbalanced_markers_stay_literal() {
        assert_eq!(format_inline("**open and ~~x", "red"), "**open and ~~x");
    }
}
