use crate::config::RenderConfig;
use crate::style::StyleMapping;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const BUILTIN_PRESETS: &str = include_str!("../assets/presets.json");

static BUILTIN: Lazy<Vec<ThemePreset>> = Lazy::new(|| {
    serde_json::from_str(BUILTIN_PRESETS).expect("bundled theme presets are valid")
});

/// An accent color paired with a complete style mapping.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ThemePreset {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(alias = "categoryIndices")]
    pub styles: StyleMapping,
}

impl ThemePreset {
    pub fn builtin() -> &'static [ThemePreset] {
        &BUILTIN
    }

    pub fn find(id: &str) -> Option<&'static ThemePreset> {
        Self::builtin().iter().find(|preset| preset.id == id)
    }

    /// Overwrites the accent color and the whole mapping together.
    pub fn apply(&self, config: &mut RenderConfig, mapping: &mut StyleMapping) {
        tracing::debug!(preset = %self.id, color = %self.color, "applying theme preset");
        config.theme_color.clone_from(&self.color);
        mapping.clone_from(&self.styles);
    }
}
