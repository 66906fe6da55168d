use crate::error::StyleError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const CONTENT_SLOT: &str = "{{CONTENT}}";
pub const COLOR_SLOT: &str = "{{COLOR}}";

const BUILTIN_STYLES: &str = include_str!("../assets/styles.json");

static BUILTIN: Lazy<StyleLibrary> = Lazy::new(|| {
    StyleLibrary::from_json(BUILTIN_STYLES).expect("bundled style catalog is valid")
});

/// Block kinds that carry a selectable skin.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    H1,
    H2,
    H3,
    H4,
    H5,
    Quote,
    Divider,
    Code,
}

impl StyleCategory {
    pub const ALL: [StyleCategory; 8] = [
        StyleCategory::H1,
        StyleCategory::H2,
        StyleCategory::H3,
        StyleCategory::H4,
        StyleCategory::H5,
        StyleCategory::Quote,
        StyleCategory::Divider,
        StyleCategory::Code,
    ];

    /// Heading category for a `#` count. Level 6 has no skin.
    pub fn heading(level: usize) -> Option<Self> {
        match level {
            1 => Some(Self::H1),
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            5 => Some(Self::H5),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::Quote => "quote",
            Self::Divider => "divider",
            Self::Code => "code",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One visual skin: an HTML pattern with `{{CONTENT}}` and `{{COLOR}}` slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTemplate {
    pub name: String,
    pub html: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_dark: bool,
}

impl StyleTemplate {
    pub fn instantiate(&self, content: &str, color: &str) -> String {
        instantiate(&self.html, content, color)
    }
}

/// The catalog of templates, grouped by category.
///
/// Every category is present and non-empty; [`StyleLibrary::from_json`] and
/// deserialization both enforce it, so index 0 is always a valid fallback.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<StyleCategory, Vec<StyleTemplate>>",
    into = "BTreeMap<StyleCategory, Vec<StyleTemplate>>"
)]
pub struct StyleLibrary {
    categories: BTreeMap<StyleCategory, Vec<StyleTemplate>>,
}

impl StyleLibrary {
    /// The catalog shipped with the crate.
    pub fn builtin() -> &'static StyleLibrary {
        &BUILTIN
    }

    pub fn new(categories: BTreeMap<StyleCategory, Vec<StyleTemplate>>) -> Result<Self, StyleError> {
        for category in StyleCategory::ALL {
            match categories.get(&category) {
                None => return Err(StyleError::MissingCategory(category)),
                Some(list) if list.is_empty() => return Err(StyleError::EmptyCategory(category)),
                Some(_) => {}
            }
        }
        Ok(Self { categories })
    }

    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        let categories: BTreeMap<StyleCategory, Vec<StyleTemplate>> = serde_json::from_str(json)?;
        Self::new(categories)
    }

    pub fn to_json(&self) -> Result<String, StyleError> {
        Ok(serde_json::to_string_pretty(&self.categories)?)
    }

    pub fn templates(&self, category: StyleCategory) -> &[StyleTemplate] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Template at `index`, or the category default when out of range.
    pub fn template(&self, category: StyleCategory, index: usize) -> &StyleTemplate {
        let list = &self.categories[&category];
        match list.get(index) {
            Some(template) => template,
            None => {
                tracing::debug!(%category, index, "style index out of range, using default");
                &list[0]
            }
        }
    }

    pub fn selected(&self, mapping: &StyleMapping, category: StyleCategory) -> &StyleTemplate {
        self.template(category, mapping.index(category))
    }
}

impl TryFrom<BTreeMap<StyleCategory, Vec<StyleTemplate>>> for StyleLibrary {
    type Error = StyleError;

    fn try_from(value: BTreeMap<StyleCategory, Vec<StyleTemplate>>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StyleLibrary> for BTreeMap<StyleCategory, Vec<StyleTemplate>> {
    fn from(value: StyleLibrary) -> Self {
        value.categories
    }
}

/// Selected template index per category. Missing entries mean index 0.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMapping(BTreeMap<StyleCategory, usize>);

impl StyleMapping {
    pub fn index(&self, category: StyleCategory) -> usize {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn set(&mut self, category: StyleCategory, index: usize) {
        self.0.insert(category, index);
    }

    pub fn with(mut self, category: StyleCategory, index: usize) -> Self {
        self.set(category, index);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleCategory, usize)> + '_ {
        StyleCategory::ALL
            .into_iter()
            .map(|category| (category, self.index(category)))
    }
}

impl Default for StyleMapping {
    fn default() -> Self {
        Self(StyleCategory::ALL.into_iter().map(|c| (c, 0)).collect())
    }
}

/// Fills the slots of `pattern` in one pass.
///
/// Slot tokens that appear inside `content` or `color` are copied verbatim,
/// never substituted again.
pub fn instantiate(pattern: &str, content: &str, color: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + content.len());
    let mut rest = pattern;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix(CONTENT_SLOT) {
            out.push_str(content);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(COLOR_SLOT) {
            out.push_str(color);
            rest = after;
        } else {
            out.push_str("{{");
            rest = &tail[2..];
        }
    }
    out.push_str(rest);
    out
}
