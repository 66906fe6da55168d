use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_THEME_COLOR: &str = "#dc2626";

/// A named font stack offered to the user.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct FontFamily {
    pub name: &'static str,
    pub value: &'static str,
}

pub const FONT_FAMILIES: [FontFamily; 5] = [
    FontFamily {
        name: "System sans-serif",
        value: "-apple-system-font, BlinkMacSystemFont, 'Helvetica Neue', 'PingFang SC', 'Hiragino Sans GB', 'Microsoft YaHei UI', 'Microsoft YaHei', Arial, sans-serif",
    },
    FontFamily {
        name: "Song / serif",
        value: "'Songti SC', 'SimSun', 'STSong', 'Times New Roman', serif",
    },
    FontFamily {
        name: "Kai / elegant",
        value: "'Kaiti SC', 'KaiTi', 'STKaiti', 'Baskerville', serif",
    },
    FontFamily {
        name: "Rounded",
        value: "'Yuanti SC', 'YouYuan', 'Varela Round', sans-serif",
    },
    FontFamily {
        name: "Monospace",
        value: "'Menlo', 'Monaco', 'Courier New', monospace",
    },
];

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    #[default]
    Justify,
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        };
        f.write_str(value)
    }
}

/// Presentational parameters threaded into templates and wrappers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub theme_color: String,
    pub font_family: String,
    pub font_size: f32,
    pub line_height: f32,
    pub letter_spacing: f32,
    pub text_align: TextAlign,
    /// Keep literal HTML from the document instead of escaping it.
    pub allow_raw_html: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme_color: DEFAULT_THEME_COLOR.to_string(),
            font_family: FONT_FAMILIES[0].value.to_string(),
            font_size: 15.0,
            line_height: 1.75,
            letter_spacing: 0.5,
            text_align: TextAlign::Justify,
            allow_raw_html: false,
        }
    }
}

impl RenderConfig {
    /// Parses a (possibly partial) TOML document; absent keys keep defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::Validation` for out-of-range values.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.theme_color.trim().is_empty() {
            return Err(ConfigError::Validation("themeColor cannot be empty".into()));
        }
        require_positive(self.font_size, "fontSize")?;
        require_positive(self.line_height, "lineHeight")?;
        if !self.letter_spacing.is_finite() {
            return Err(ConfigError::Validation(
                "letterSpacing must be a finite number".into(),
            ));
        }
        Ok(())
    }
}

fn require_positive(value: f32, field: &str) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be a positive number, got {value}"
        )));
    }
    Ok(())
}
