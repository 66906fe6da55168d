use mdskin_core::persist::Namespace;
use mdskin_core::{
    FONT_FAMILIES, RenderConfig, StyleLibrary, StyleMapping, TextAlign, ThemePreset,
    document_from_response, render, render_sanitized,
};
use mdskin_renderer::Preview;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Options passed from the editor shell; absent fields keep defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderOptions {
    preset: Option<String>,
    theme_color: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    line_height: Option<f32>,
    letter_spacing: Option<f32>,
    text_align: Option<TextAlign>,
    allow_raw_html: Option<bool>,
    sanitized: Option<bool>,
    styles: Option<StyleMapping>,
}

struct Settings {
    config: RenderConfig,
    mapping: StyleMapping,
    sanitized: bool,
}

/// Publishing targets the shell can open after copying.
const PLATFORM_EDITORS: &[(&str, &str)] = &[
    ("zhihu", "https://zhuanlan.zhihu.com/write"),
    ("juejin", "https://juejin.cn/editor/drafts/new"),
    ("csdn", "https://mp.csdn.net/mp_blog/creation/editor"),
    ("toutiao", "https://mp.toutiao.com/profile_v4/graphic/publish"),
];

#[wasm_bindgen]
pub fn render_html(source: &str, options: JsValue) -> Result<String, JsValue> {
    let settings = options_from_js(options)?;
    Ok(render_fragment(source, &settings))
}

#[wasm_bindgen]
pub fn render_article(source: &str, options: JsValue) -> Result<String, JsValue> {
    let settings = options_from_js(options)?;
    let html = render_fragment(source, &settings);
    Ok(Preview::new(&settings.config).article(&html))
}

#[wasm_bindgen]
pub fn theme_presets() -> Result<JsValue, JsValue> {
    to_js(ThemePreset::builtin())
}

#[wasm_bindgen]
pub fn style_catalog() -> Result<JsValue, JsValue> {
    to_js(StyleLibrary::builtin())
}

#[wasm_bindgen]
pub fn font_families() -> Result<JsValue, JsValue> {
    to_js(&FONT_FAMILIES)
}

/// Turns an extraction service response into a document, or an error
/// message the shell can show as-is.
#[wasm_bindgen]
pub fn document_from_extraction(json: &str) -> Result<String, JsValue> {
    document_from_response(json).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn storage_key(name: &str) -> String {
    Namespace::CURRENT.key(name)
}

#[wasm_bindgen]
pub fn platform_editor_url(id: &str) -> Option<String> {
    editor_url(id).map(str::to_string)
}

fn editor_url(id: &str) -> Option<&'static str> {
    PLATFORM_EDITORS
        .iter()
        .find(|(platform, _)| platform.eq_ignore_ascii_case(id))
        .map(|(_, url)| *url)
}

fn render_fragment(source: &str, settings: &Settings) -> String {
    if settings.sanitized {
        render_sanitized(source, &settings.mapping, &settings.config)
    } else {
        render(source, &settings.mapping, &settings.config)
    }
}

fn options_from_js(value: JsValue) -> Result<Settings, JsValue> {
    if value.is_null() || value.is_undefined() {
        return settings_from_options(RenderOptions::default()).map_err(|err| JsValue::from_str(&err));
    }
    let parsed: RenderOptions =
        serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    settings_from_options(parsed).map_err(|err| JsValue::from_str(&err))
}

/// Preset first, then individual fields, then per-category style indices.
fn settings_from_options(options: RenderOptions) -> Result<Settings, String> {
    let mut config = RenderConfig::default();
    let mut mapping = StyleMapping::default();

    if let Some(id) = options.preset.as_deref() {
        let preset = ThemePreset::find(id).ok_or_else(|| format!("unknown preset `{id}`"))?;
        preset.apply(&mut config, &mut mapping);
    }
    if let Some(color) = options.theme_color {
        config.theme_color = color;
    }
    if let Some(font_family) = options.font_family {
        config.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.font_size = font_size;
    }
    if let Some(line_height) = options.line_height {
        config.line_height = line_height;
    }
    if let Some(letter_spacing) = options.letter_spacing {
        config.letter_spacing = letter_spacing;
    }
    if let Some(text_align) = options.text_align {
        config.text_align = text_align;
    }
    if let Some(allow_raw_html) = options.allow_raw_html {
        config.allow_raw_html = allow_raw_html;
    }
    if let Some(styles) = options.styles {
        for (category, index) in styles.iter() {
            mapping.set(category, index);
        }
    }
    config.validate().map_err(|err| err.to_string())?;

    Ok(Settings {
        config,
        mapping,
        sanitized: options.sanitized.unwrap_or(false),
    })
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}
