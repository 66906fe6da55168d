use crate::config::RenderConfig;
use crate::style::{StyleLibrary, StyleMapping};
use ammonia::Builder;
use std::collections::{HashMap, HashSet};

/// Renders a document and sanitizes the result according to an allow-list
/// covering everything the renderer and the bundled templates emit.
///
/// Inline `style` attributes are kept; scripts, event handlers and
/// `javascript:` URLs are not.
pub fn render_sanitized(document: &str, mapping: &StyleMapping, config: &RenderConfig) -> String {
    let raw_html = crate::render_with_library(StyleLibrary::builtin(), document, mapping, config);
    sanitize_html(&raw_html)
}

pub fn sanitize_html(raw_html: &str) -> String {
    let tags: HashSet<&'static str> = [
        "a", "b", "blockquote", "br", "code", "del", "div", "em", "h1", "h2", "h3", "h4", "h5",
        "h6", "hr", "i", "img", "li", "ol", "p", "pre", "s", "section", "span", "strong", "sub",
        "sup", "u", "ul",
    ]
    .iter()
    .copied()
    .collect();

    let mut generic_attributes: HashSet<&'static str> = HashSet::new();
    generic_attributes.insert("style");

    let mut tag_attributes = HashMap::new();
    tag_attributes.insert("a", ["href", "title"].iter().copied().collect());
    tag_attributes.insert("img", ["alt", "src", "title"].iter().copied().collect());
    tag_attributes.insert("ol", ["start"].iter().copied().collect());

    let cleaned = Builder::new()
        .tags(tags)
        .generic_attributes(generic_attributes)
        .tag_attributes(tag_attributes)
        .clean(raw_html)
        .to_string();
    tracing::debug!(
        before = raw_html.len(),
        after = cleaned.len(),
        "sanitized rendered html"
    );
    cleaned
}
