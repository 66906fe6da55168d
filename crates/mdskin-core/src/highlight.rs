//! Best-effort syntax coloring for fenced code.
//!
//! A single ordered alternation runs over the escaped source; the first
//! alternative that matches at a position wins. This is not a lexer: nested
//! or overlapping constructs are not recognized.

use crate::escape::escape_html;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const KEYWORDS: &[&str] = &[
    "const", "let", "var", "function", "return", "if", "else", "for", "while", "class", "import",
    "from", "def", "print", "try", "catch", "async", "await", "new", "this", "super", "true",
    "false", "null", "undefined", "export", "default", "break", "continue", "switch", "case",
    "public", "private", "protected", "interface", "type", "struct", "impl", "fn", "mut",
    "package", "main", "go", "select", "defer", "int", "string", "bool", "float64", "void", "None",
    "True", "False",
];

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        concat!(
            r"(?m)",
            // comments; `<!-- -->` is matched in its escaped form
            r"(//.*$|#.*$|/\*[\s\S]*?\*/|&lt;!--[\s\S]*?--&gt;)",
            r#"|("(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\.)*`)"#,
            r"|(\b\d+\b)",
            r"|\b({})\b",
            r"|\b([A-Za-z_]\w*)\(",
        ),
        KEYWORDS.join("|")
    );
    Regex::new(&pattern).expect("token pattern is valid")
});

/// Token colors for one background flavor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Palette {
    pub comment: &'static str,
    pub string: &'static str,
    pub number: &'static str,
    pub function: &'static str,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        comment: "#9ca3af",
        string: "#dd1144",
        number: "#d97706",
        function: "#2563eb",
    };

    pub const DARK: Palette = Palette {
        comment: "#7f848e",
        string: "#e06c75",
        number: "#d19a66",
        function: "#61afef",
    };

    pub fn for_background(is_dark: bool) -> Self {
        if is_dark { Self::DARK } else { Self::LIGHT }
    }
}

/// Escapes `code` and wraps recognized tokens in colored spans.
///
/// Keywords use `accent`; every other token color depends on `is_dark`.
pub fn highlight(code: &str, is_dark: bool, accent: &str) -> String {
    let escaped = escape_html(code);
    let palette = Palette::for_background(is_dark);
    TOKEN
        .replace_all(&escaped, |caps: &Captures<'_>| {
            if let Some(m) = caps.get(1) {
                span(&format!("color: {}; font-style: italic;", palette.comment), m.as_str())
            } else if let Some(m) = caps.get(2) {
                span(&format!("color: {};", palette.string), m.as_str())
            } else if let Some(m) = caps.get(3) {
                span(&format!("color: {};", palette.number), m.as_str())
            } else if let Some(m) = caps.get(4) {
                span(&format!("color: {accent}; font-weight: bold;"), m.as_str())
            } else if let Some(m) = caps.get(5) {
                // the opening parenthesis is consumed by the match; put it back
                format!("{}(", span(&format!("color: {};", palette.function), m.as_str()))
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

fn span(style: &str, text: &str) -> String {
    format!("<span style=\"{style}\">{text}</span>")
}
