mod block;
mod error;
mod escape;
mod highlight;
mod inline;
mod sanitize;
mod vault;

pub mod config;
pub mod extract;
pub mod persist;
pub mod style;
pub mod theme;

pub use block::BlockRenderer;
pub use config::{FONT_FAMILIES, FontFamily, RenderConfig, TextAlign};
pub use error::{ConfigError, ExtractError, StoreError, StyleError};
pub use escape::escape_html;
pub use extract::{ExtractionRequest, ExtractionResponse, document_from_response};
pub use highlight::{Palette, highlight};
pub use inline::{InlineFormatter, format_inline};
pub use persist::{
    DEFAULT_DOCUMENT, LayoutFlags, MemoryStore, Namespace, PersistedState, StateStore,
};
pub use sanitize::{render_sanitized, sanitize_html};
pub use style::{StyleCategory, StyleLibrary, StyleMapping, StyleTemplate, instantiate};
pub use theme::ThemePreset;
pub use vault::PlaceholderVault;

/// Renders a Markdown document to inline-styled HTML with the bundled
/// style catalog. Never fails: unrecognized input degrades to paragraphs.
pub fn render(document: &str, mapping: &StyleMapping, config: &RenderConfig) -> String {
    render_with_library(StyleLibrary::builtin(), document, mapping, config)
}

/// Same as [`render`] with a caller-supplied catalog.
pub fn render_with_library(
    library: &StyleLibrary,
    document: &str,
    mapping: &StyleMapping,
    config: &RenderConfig,
) -> String {
    BlockRenderer::new(library, mapping, config).render(document)
}
