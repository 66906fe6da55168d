/// Escapes the three characters that can open markup: `&`, `<` and `>`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Makes already-escaped text safe inside a double-quoted attribute.
pub(crate) fn quote_attr(text: &str) -> String {
    text.replace('"', "&quot;")
}
