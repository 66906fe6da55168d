//! Block renderer: the ordered text passes that turn a document into HTML.
//!
//! Every pass is a `&str -> String` step. Passes that emit finished markup
//! park it in the [`PlaceholderVault`] so later rules never see it; the
//! final step swaps the markers back.

use crate::config::RenderConfig;
use crate::escape::escape_html;
use crate::highlight::highlight;
use crate::inline::{IMAGE, InlineFormatter, render_image};
use crate::style::{StyleCategory, StyleLibrary, StyleMapping};
use crate::vault::PlaceholderVault;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)^```([^`\n]*)(?:\n(.*?)(?:```|\z)|\z)").expect("valid regex")
});
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{1,5}) (.*)$").expect("valid regex"));
static DIVIDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*---[ \t]*$").expect("valid regex"));
static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.\s+(.*)$").expect("valid regex"));

const LIST_OPEN: &str = "<ul style=\"list-style-type: none; padding-left: 20px; margin: 15px 0;\">";
const LIST_CLOSE: &str = "</ul>";

/// Tags a generated or typed line may start with and still be paragraph text.
const INLINE_TAGS: &[&str] = &[
    "a", "b", "code", "del", "em", "i", "s", "span", "strong", "sub", "sup", "u",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ListKind {
    Unordered,
    Ordered,
}

/// Where the line scan currently is. Fenced code never reaches the scan;
/// it is taken out by the first pass.
#[derive(Debug)]
enum LineState {
    Normal,
    Blockquote(Vec<String>),
    List(ListKind),
}

pub struct BlockRenderer<'a> {
    library: &'a StyleLibrary,
    mapping: &'a StyleMapping,
    config: &'a RenderConfig,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(
        library: &'a StyleLibrary,
        mapping: &'a StyleMapping,
        config: &'a RenderConfig,
    ) -> Self {
        Self {
            library,
            mapping,
            config,
        }
    }

    pub fn render(&self, document: &str) -> String {
        let source = normalize_newlines(document);
        let mut vault = PlaceholderVault::for_source(&source);
        let inline = self.inline();

        let text = self.extract_fenced_code(&source, &mut vault);
        let text = inline.code_spans(&text, &mut vault);
        let text = self.headings(&text, &mut vault);
        let text = self.dividers(&text, &mut vault);
        let text = self.images(&text, &mut vault);
        let text = inline.format(&text, &mut vault);
        let text = self.assemble(&text);

        tracing::debug!(
            input_len = document.len(),
            fragments = vault.len(),
            "rendered document"
        );
        vault.resolve(&text)
    }

    fn inline(&self) -> InlineFormatter<'a> {
        InlineFormatter::new(&self.config.theme_color, self.config.allow_raw_html)
    }

    fn skin(&self, category: StyleCategory, content: &str) -> String {
        self.library
            .selected(self.mapping, category)
            .instantiate(content, &self.config.theme_color)
    }

    /// Pass 1: fenced code. Highlights each fence with the selected code
    /// skin and escapes the text between fences unless raw HTML is allowed.
    pub fn extract_fenced_code(&self, source: &str, vault: &mut PlaceholderVault) -> String {
        let template = self.library.selected(self.mapping, StyleCategory::Code);
        let color = &self.config.theme_color;
        let mut out = String::with_capacity(source.len());
        let mut last = 0;
        let mut blocks = 0usize;

        for caps in FENCE.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&self.prose(&source[last..whole.start()]));
            let body = caps.get(2).map_or("", |m| m.as_str());
            let lang = caps.get(1).map_or("", |m| m.as_str().trim());
            tracing::trace!(lang, lines = body.lines().count(), "fenced code block");
            let code = highlight(trim_code(body), template.is_dark, color);
            out.push_str(&vault.stash_block(template.instantiate(&code, color)));
            last = whole.end();
            blocks += 1;
        }
        out.push_str(&self.prose(&source[last..]));

        tracing::debug!(blocks, "extracted fenced code");
        out
    }

    fn prose(&self, text: &str) -> String {
        if self.config.allow_raw_html {
            text.to_string()
        } else {
            escape_html(text)
        }
    }

    /// Pass 3: `#` to `#####` headings. `######` has no skin and is left
    /// for the paragraph rule.
    pub fn headings(&self, text: &str, vault: &mut PlaceholderVault) -> String {
        let inline = self.inline();
        HEADING
            .replace_all(text, |caps: &Captures<'_>| {
                let Some(category) = StyleCategory::heading(caps[1].len()) else {
                    return caps[0].to_string();
                };
                let content = self.images(caps[2].trim_end(), vault);
                let content = inline.format(&content, vault);
                vault.stash_block(self.skin(category, &content))
            })
            .into_owned()
    }

    /// Pass 4: a line holding only `---`.
    pub fn dividers(&self, text: &str, vault: &mut PlaceholderVault) -> String {
        DIVIDER
            .replace_all(text, |_: &Captures<'_>| {
                vault.stash_block(self.skin(StyleCategory::Divider, ""))
            })
            .into_owned()
    }

    /// Pass 5: `![alt](url)` becomes a centered image section.
    pub fn images(&self, text: &str, vault: &mut PlaceholderVault) -> String {
        IMAGE
            .replace_all(text, |caps: &Captures<'_>| {
                vault.stash_block(render_image(&caps[1], &caps[2]))
            })
            .into_owned()
    }

    /// Pass 7: the line scan that builds quotes, lists and paragraphs.
    pub fn assemble(&self, text: &str) -> String {
        let quote_prefix = if self.config.allow_raw_html {
            "> "
        } else {
            "&gt; "
        };
        let mut out: Vec<String> = Vec::new();
        let mut state = LineState::Normal;

        for line in text.split('\n') {
            if let Some(content) = line.strip_prefix(quote_prefix) {
                let item = self.quote_line(content);
                match &mut state {
                    LineState::Blockquote(lines) => lines.push(item),
                    _ => {
                        self.leave(&mut state, &mut out);
                        state = LineState::Blockquote(vec![item]);
                    }
                }
                continue;
            }
            if matches!(state, LineState::Blockquote(_)) {
                self.leave(&mut state, &mut out);
            }

            if let Some(content) = unordered_item(line) {
                self.enter_list(&mut state, ListKind::Unordered, &mut out);
                out.push(self.bullet_item(content));
                continue;
            }
            if let Some(caps) = ORDERED_ITEM.captures(line) {
                self.enter_list(&mut state, ListKind::Ordered, &mut out);
                out.push(self.numbered_item(&caps[1], &caps[2]));
                continue;
            }
            self.leave(&mut state, &mut out);

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if is_raw_html_line(trimmed) {
                out.push(line.to_string());
            } else {
                out.push(self.paragraph(trimmed));
            }
        }
        self.leave(&mut state, &mut out);
        out.join("\n")
    }

    fn enter_list(&self, state: &mut LineState, kind: ListKind, out: &mut Vec<String>) {
        if matches!(state, LineState::List(current) if *current == kind) {
            return;
        }
        self.leave(state, out);
        out.push(LIST_OPEN.to_string());
        *state = LineState::List(kind);
    }

    /// Closes whatever construct is open and returns to `Normal`.
    fn leave(&self, state: &mut LineState, out: &mut Vec<String>) {
        match std::mem::replace(state, LineState::Normal) {
            LineState::Normal => {}
            LineState::List(_) => out.push(LIST_CLOSE.to_string()),
            LineState::Blockquote(lines) => {
                out.push(self.skin(StyleCategory::Quote, &lines.join("<br/>")));
            }
        }
    }

    fn quote_line(&self, content: &str) -> String {
        let color = &self.config.theme_color;
        if let Some(rest) = unordered_item(content) {
            return format!(
                "<div style=\"display: flex; align-items: baseline; margin-left: 10px; margin-bottom: 5px;\">\
                 <span style=\"display: inline-block; width: 4px; height: 4px; background-color: {color}; \
                 border-radius: 50%; margin-right: 8px; flex-shrink: 0; transform: translateY(-3px);\"></span>\
                 <span style=\"flex: 1;\">{rest}</span></div>"
            );
        }
        if let Some(caps) = ORDERED_ITEM.captures(content) {
            return format!(
                "<div style=\"display: flex; align-items: baseline; margin-left: 10px; margin-bottom: 5px;\">\
                 <span style=\"font-weight: bold; color: {color}; margin-right: 6px; font-size: 13px;\">{}.</span>\
                 <span style=\"flex: 1;\">{}</span></div>",
                &caps[1], &caps[2]
            );
        }
        content.to_string()
    }

    fn bullet_item(&self, content: &str) -> String {
        let config = self.config;
        format!(
            "<li style=\"margin-bottom: 8px; display: flex; align-items: baseline;\">\
             <span style=\"display: inline-block; width: 4px; height: 4px; background-color: {}; \
             border-radius: 50%; margin-right: 10px; flex-shrink: 0; transform: translateY(-3px);\"></span>\
             <span style=\"flex: 1; line-height: {}; font-size: {}px;\">{}</span></li>",
            config.theme_color, config.line_height, config.font_size, content
        )
    }

    fn numbered_item(&self, number: &str, content: &str) -> String {
        let config = self.config;
        format!(
            "<li style=\"margin-bottom: 8px; display: flex; align-items: baseline;\">\
             <span style=\"font-weight: bold; color: {}; margin-right: 8px; flex-shrink: 0; font-size: {}px;\">{}.</span>\
             <span style=\"flex: 1; line-height: {}; font-size: {}px;\">{}</span></li>",
            config.theme_color,
            config.font_size,
            number,
            config.line_height,
            config.font_size,
            content
        )
    }

    fn paragraph(&self, content: &str) -> String {
        let config = self.config;
        format!(
            "<p style=\"margin: 15px 0; line-height: {}; font-size: {}px; color: #333; \
             text-align: {}; letter-spacing: {}px;\">{}</p>",
            config.line_height, config.font_size, config.text_align, config.letter_spacing, content
        )
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Drops blank lines around the body and trailing whitespace, keeping the
/// indentation of the first code line.
fn trim_code(body: &str) -> &str {
    let body = body.trim_end();
    let first = body
        .find(|ch: char| !ch.is_whitespace())
        .unwrap_or(body.len());
    let start = body[..first].rfind('\n').map_or(0, |idx| idx + 1);
    &body[start..]
}

fn unordered_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

fn is_raw_html_line(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('<') else {
        return false;
    };
    let name: String = rest
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    !INLINE_TAGS.contains(&name.as_str())
}

#[cfg(test)]
mod tests {
    use super::{BlockRenderer, is_raw_html_line, trim_code};
    use crate::config::RenderConfig;
    use crate::style::{StyleCategory, StyleLibrary, StyleMapping};
    use crate::vault::PlaceholderVault;

    fn renderer<'a>(mapping: &'a StyleMapping, config: &'a RenderConfig) -> BlockRenderer<'a> {
        BlockRenderer::new(StyleLibrary::builtin(), mapping, config)
    }

    #[test]
    fn trim_code_keeps_first_line_indent() {
        assert_eq!(trim_code("\n\n    let x;\n  y\n\n"), "    let x;\n  y");
        assert_eq!(trim_code("   \n"), "");
    }

    #[test]
    fn fenced_code_is_replaced_by_a_block_marker() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let mut vault = PlaceholderVault::for_source("");
        let text = renderer(&mapping, &config)
            .extract_fenced_code("a < b\n```rust\n# not a heading\n```\nafter", &mut vault);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "a &lt; b");
        assert!(lines[1].starts_with("<!--"));
        assert_eq!(lines[2], "after");
        assert_eq!(vault.len(), 1);
    }

    #[test]
    fn unterminated_fence_runs_to_end_of_document() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let html = renderer(&mapping, &config).render("```\nlet a = 1;\n- not a list");
        assert!(html.contains("- not a list</pre>"));
        assert!(!html.contains("<li"));
    }

    #[test]
    fn fence_closed_on_its_own_line_is_prose() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let html = renderer(&mapping, &config).render("```inline``` then text\n\nmore paragraph");
        assert!(!html.contains("<pre "));
        assert!(html.contains(">inline</span>"));
        assert!(html.contains("`` then text</p>"));
        assert!(html.contains(">more paragraph</p>"));
    }

    #[test]
    fn heading_levels_map_to_categories() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let library = StyleLibrary::builtin();
        let html = renderer(&mapping, &config).render("##### five");
        let expected = library
            .template(StyleCategory::H5, 0)
            .instantiate("five", &config.theme_color);
        assert_eq!(html, expected);
    }

    #[test]
    fn six_hashes_fall_through_to_paragraph() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let html = renderer(&mapping, &config).render("###### six");
        assert!(html.starts_with("<p "));
        assert!(html.contains("###### six</p>"));
    }

    #[test]
    fn switching_list_kind_closes_previous_wrapper() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let html = renderer(&mapping, &config).render("- a\n1. b");
        assert_eq!(html.matches("<ul ").count(), 2);
        assert_eq!(html.matches("</ul>").count(), 2);
    }

    #[test]
    fn blank_line_ends_a_list() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let html = renderer(&mapping, &config).render("- a\n\n- b");
        assert_eq!(html.matches("<ul ").count(), 2);
    }

    #[test]
    fn quote_renders_nested_items_and_joins_lines() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let html = renderer(&mapping, &config).render("> intro\n> - dot\n> 2. two\nafter");
        assert_eq!(html.matches("<br/>").count(), 2);
        assert!(html.contains(">2.</span><span style=\"flex: 1;\">two</span>"));
        assert!(html.ends_with("after</p>"));
    }

    #[test]
    fn ordered_items_keep_their_number() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let html = renderer(&mapping, &config).render("3. three\n7. seven");
        assert!(html.contains(">3.</span>"));
        assert!(html.contains(">7.</span>"));
        assert_eq!(html.matches("<ul ").count(), 1);
    }

    #[test]
    fn paragraph_uses_render_config() {
        let mapping = StyleMapping::default();
        let config = RenderConfig {
            font_size: 17.0,
            line_height: 2.0,
            letter_spacing: 1.0,
            ..RenderConfig::default()
        };
        let html = renderer(&mapping, &config).render("hello");
        assert_eq!(
            html,
            "<p style=\"margin: 15px 0; line-height: 2; font-size: 17px; color: #333; \
             text-align: justify; letter-spacing: 1px;\">hello</p>"
        );
    }

    #[test]
    fn line_starting_with_bold_is_still_a_paragraph() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let html = renderer(&mapping, &config).render("**lead** text");
        assert!(html.starts_with("<p "));
    }

    #[test]
    fn raw_html_passes_through_when_allowed() {
        let mapping = StyleMapping::default();
        let config = RenderConfig {
            allow_raw_html: true,
            ..RenderConfig::default()
        };
        let html = renderer(&mapping, &config).render("<section>card</section>");
        assert_eq!(html, "<section>card</section>");
    }

    #[test]
    fn raw_html_is_escaped_by_default() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let html = renderer(&mapping, &config).render("<script>x</script>");
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn divider_skin_is_shielded_from_inline_rules() {
        // the "Asterisks" divider is `* * * * *`
        let mapping = StyleMapping::default().with(StyleCategory::Divider, 6);
        let config = RenderConfig::default();
        let html = renderer(&mapping, &config).render("---");
        assert!(html.contains("* * * * *"));
        assert!(!html.contains("<em"));
    }

    #[test]
    fn crlf_input_is_normalized() {
        let mapping = StyleMapping::default();
        let config = RenderConfig::default();
        let html = renderer(&mapping, &config).render("- a\r\n- b\r\n");
        assert_eq!(html.matches("<li ").count(), 2);
        assert!(!html.contains('\r'));
    }

    #[test]
    fn inline_tag_lines_are_not_raw() {
        assert!(is_raw_html_line("<section>"));
        assert!(is_raw_html_line("<!--marker-->"));
        assert!(!is_raw_html_line("<strong style=\"\">x</strong>"));
        assert!(!is_raw_html_line("<a href=\"u\">x</a>"));
    }
}
