//! Persisted editor state: what the UI shell keeps between sessions.
//!
//! Nothing in the render pipeline reads from here. The shell loads a
//! [`PersistedState`], then hands its document, mapping and config to
//! [`crate::render`] as plain values.

use crate::config::RenderConfig;
use crate::error::StoreError;
use crate::style::StyleMapping;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Welcome document shown on first start and after a reset.
pub const DEFAULT_DOCUMENT: &str = "# Welcome to mdskin

Paste Markdown on the left and copy the styled result on the right.

## 1. Inline formatting
- **Bold** uses the accent color
- *Italic* and ~~strikethrough~~
- `inline code` for short snippets
- [Links](https://github.com) keep their target

## 2. Blocks
1. Pick a theme preset
2. Fine-tune each heading, quote, divider and code style

> Quotes can hold lists too:
> - like this one

```js
const greet = (name) => `hello ${name}`;
```

---
Start writing!
";

/// Minimal key/value backend, e.g. browser local storage.
pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str);
    fn clear(&mut self);
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Versioned key prefix. Bump the version when a persisted shape changes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Namespace(&'static str);

impl Namespace {
    pub const CURRENT: Namespace = Namespace("mdskin_v1_");

    pub const fn new(prefix: &'static str) -> Self {
        Self(prefix)
    }

    pub fn prefix(&self) -> &'static str {
        self.0
    }

    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.0, name)
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::CURRENT
    }
}

const MARKDOWN: &str = "markdown";
const CONFIG: &str = "config";
const STYLE_MAPPING: &str = "style_mapping";
const SIDEBAR_OPEN: &str = "sidebar_open";
const PREVIEW_MODE: &str = "preview_mode";
const ACTIVE_TAB: &str = "active_tab";
const SYNC_SCROLL: &str = "sync_scroll";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    #[default]
    Mobile,
    Desktop,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarTab {
    #[default]
    Themes,
    Components,
    Settings,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LayoutFlags {
    pub sidebar_open: bool,
    pub preview_mode: PreviewMode,
    pub active_tab: SidebarTab,
    pub sync_scroll: bool,
}

impl Default for LayoutFlags {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            preview_mode: PreviewMode::Mobile,
            active_tab: SidebarTab::Themes,
            sync_scroll: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PersistedState {
    pub markdown: String,
    pub config: RenderConfig,
    pub style_mapping: StyleMapping,
    pub layout: LayoutFlags,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            markdown: DEFAULT_DOCUMENT.to_string(),
            config: RenderConfig::default(),
            style_mapping: StyleMapping::default(),
            layout: LayoutFlags::default(),
        }
    }
}

impl PersistedState {
    /// Reads every key on its own. A missing or unreadable entry falls back
    /// to that key's default; the rest of the state is still restored.
    pub fn load(store: &dyn StateStore, namespace: Namespace) -> Self {
        let defaults = Self::default();
        let markdown = match store.get(&namespace.key(MARKDOWN)) {
            // older shells stored the document unquoted
            Some(raw) => serde_json::from_str(&raw).unwrap_or(raw),
            None => defaults.markdown,
        };
        Self {
            markdown,
            config: load_key(store, namespace, CONFIG).unwrap_or(defaults.config),
            style_mapping: load_key(store, namespace, STYLE_MAPPING)
                .unwrap_or(defaults.style_mapping),
            layout: LayoutFlags {
                sidebar_open: load_key(store, namespace, SIDEBAR_OPEN)
                    .unwrap_or(defaults.layout.sidebar_open),
                preview_mode: load_key(store, namespace, PREVIEW_MODE)
                    .unwrap_or(defaults.layout.preview_mode),
                active_tab: load_key(store, namespace, ACTIVE_TAB)
                    .unwrap_or(defaults.layout.active_tab),
                sync_scroll: load_key(store, namespace, SYNC_SCROLL)
                    .unwrap_or(defaults.layout.sync_scroll),
            },
        }
    }

    /// Writes every key as JSON.
    ///
    /// # Errors
    ///
    /// Stops at the first key the store refuses.
    pub fn save(&self, store: &mut dyn StateStore, namespace: Namespace) -> Result<(), StoreError> {
        save_key(store, namespace, MARKDOWN, &self.markdown)?;
        save_key(store, namespace, CONFIG, &self.config)?;
        save_key(store, namespace, STYLE_MAPPING, &self.style_mapping)?;
        save_key(store, namespace, SIDEBAR_OPEN, &self.layout.sidebar_open)?;
        save_key(store, namespace, PREVIEW_MODE, &self.layout.preview_mode)?;
        save_key(store, namespace, ACTIVE_TAB, &self.layout.active_tab)?;
        save_key(store, namespace, SYNC_SCROLL, &self.layout.sync_scroll)?;
        tracing::debug!(namespace = namespace.prefix(), "saved editor state");
        Ok(())
    }
}

fn load_key<T: DeserializeOwned>(store: &dyn StateStore, namespace: Namespace, name: &str) -> Option<T> {
    let key = namespace.key(name);
    let raw = store.get(&key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "ignoring malformed persisted entry");
            None
        }
    }
}

fn save_key<T: Serialize>(
    store: &mut dyn StateStore,
    namespace: Namespace,
    name: &str,
    value: &T,
) -> Result<(), StoreError> {
    let key = namespace.key(name);
    let json = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.clone(),
        source,
    })?;
    store.set(&key, json)
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_DOCUMENT, MemoryStore, Namespace, PersistedState, PreviewMode, SidebarTab,
        StateStore,
    };
    use crate::style::StyleCategory;

    #[test]
    fn empty_store_loads_defaults() {
        let store = MemoryStore::new();
        let state = PersistedState::load(&store, Namespace::CURRENT);
        assert_eq!(state, PersistedState::default());
        assert_eq!(state.markdown, DEFAULT_DOCUMENT);
        assert!(state.layout.sidebar_open);
    }

    #[test]
    fn save_then_load_restores_state() {
        let mut store = MemoryStore::new();
        let mut state = PersistedState::default();
        state.markdown = "# mine".to_string();
        state.config.theme_color = "#0f766e".to_string();
        state.style_mapping.set(StyleCategory::Code, 3);
        state.layout.preview_mode = PreviewMode::Desktop;
        state.layout.active_tab = SidebarTab::Settings;

        state.save(&mut store, Namespace::CURRENT).expect("save");
        assert_eq!(store.len(), 7);
        assert_eq!(
            store.get("mdskin_v1_preview_mode").as_deref(),
            Some("\"desktop\"")
        );
        assert_eq!(PersistedState::load(&store, Namespace::CURRENT), state);
    }

    #[test]
    fn malformed_entry_falls_back_for_that_key_only() {
        let mut store = MemoryStore::new();
        store
            .set("mdskin_v1_config", "{not json".to_string())
            .expect("set");
        store
            .set("mdskin_v1_sync_scroll", "false".to_string())
            .expect("set");
        let state = PersistedState::load(&store, Namespace::CURRENT);
        assert_eq!(state.config.theme_color, "#dc2626");
        assert!(!state.layout.sync_scroll);
    }

    #[test]
    fn unquoted_markdown_is_accepted() {
        let mut store = MemoryStore::new();
        store
            .set("mdskin_v1_markdown", "plain text".to_string())
            .expect("set");
        let state = PersistedState::load(&store, Namespace::CURRENT);
        assert_eq!(state.markdown, "plain text");
    }

    #[test]
    fn namespaces_do_not_collide() {
        let mut store = MemoryStore::new();
        let mut state = PersistedState::default();
        state.markdown = "old".to_string();
        state
            .save(&mut store, Namespace::new("mdskin_v0_"))
            .expect("save");
        let current = PersistedState::load(&store, Namespace::CURRENT);
        assert_eq!(current.markdown, DEFAULT_DOCUMENT);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = MemoryStore::new();
        PersistedState::default()
            .save(&mut store, Namespace::CURRENT)
            .expect("save");
        store.remove("mdskin_v1_markdown");
        assert_eq!(store.len(), 6);
        store.clear();
        assert!(store.is_empty());
    }
}
