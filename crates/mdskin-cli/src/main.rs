//! mdskin CLI: Markdown in, inline-styled HTML out.

mod error;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use mdskin_core::{
    RenderConfig, StyleCategory, StyleLibrary, StyleMapping, ThemePreset, render_with_library,
    sanitize_html,
};
use mdskin_renderer::{Preview, write_page};
use tracing_subscriber::EnvFilter;

use error::CliError;

/// Render Markdown into inline-styled HTML ready to paste into a rich-text editor.
#[derive(Parser, Debug)]
#[command(name = "mdskin", version, about)]
struct Cli {
    /// Markdown file to render (stdin when omitted).
    input: Option<PathBuf>,

    /// Theme preset id (see --list-presets).
    #[arg(long, env = "MDSKIN_PRESET")]
    preset: Option<String>,

    /// Accent color, any CSS color.
    #[arg(long)]
    color: Option<String>,

    /// Select a template for one category, e.g. `h2=3` (repeatable).
    #[arg(long = "style", value_name = "CATEGORY=INDEX")]
    styles: Vec<String>,

    /// Load the style catalog from a JSON file instead of the bundled one.
    #[arg(long = "styles", value_name = "CATALOG")]
    catalog: Option<PathBuf>,

    /// Render configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep literal HTML from the document.
    #[arg(long)]
    raw_html: bool,

    /// Clean the output with an allow-list sanitizer.
    #[arg(long)]
    sanitized: bool,

    /// Print the HTML fragment only, without the preview page.
    #[arg(long)]
    raw: bool,

    /// Append the end-of-article footer to the preview page.
    #[arg(long)]
    footer: bool,

    /// Write to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List theme presets and exit.
    #[arg(long)]
    list_presets: bool,

    /// List the templates of every category and exit.
    #[arg(long)]
    list_styles: bool,

    /// Enable info-level logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let library = match &cli.catalog {
        Some(path) => StyleLibrary::from_json(&read_file(path)?)?,
        None => StyleLibrary::builtin().clone(),
    };

    if cli.list_presets {
        print!("{}", list_presets());
        return Ok(());
    }
    if cli.list_styles {
        print!("{}", list_styles(&library));
        return Ok(());
    }

    let (config, mapping) = resolve_settings(&cli)?;
    let source = match &cli.input {
        Some(path) => read_file(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| CliError::Read {
                    path: "stdin".to_string(),
                    source,
                })?;
            buffer
        }
    };

    let mut html = render_with_library(&library, &source, &mapping, &config);
    if cli.sanitized {
        html = sanitize_html(&html);
    }
    tracing::info!(
        bytes_in = source.len(),
        bytes_out = html.len(),
        color = %config.theme_color,
        "rendered document"
    );

    let out = if cli.raw {
        html
    } else {
        let mut preview = Preview::new(&config);
        if let Some(stem) = cli.input.as_deref().and_then(Path::file_stem) {
            preview = preview.with_title(stem.to_string_lossy());
        }
        preview.embed_html(&html, cli.footer)
    };

    match &cli.output {
        Some(path) => write_page(path, &out).map_err(|source| CliError::Write {
            path: path.display().to_string(),
            source,
        })?,
        None => {
            print!("{out}");
            if !out.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

/// Config file, then preset, then `--color`, then each `--style`.
fn resolve_settings(cli: &Cli) -> Result<(RenderConfig, StyleMapping), CliError> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_toml(&read_file(path)?)?,
        None => RenderConfig::default(),
    };
    let mut mapping = StyleMapping::default();

    if let Some(id) = &cli.preset {
        let preset = ThemePreset::find(id).ok_or_else(|| CliError::UnknownPreset(id.clone()))?;
        preset.apply(&mut config, &mut mapping);
    }
    if let Some(color) = &cli.color {
        config.theme_color.clone_from(color);
    }
    for spec in &cli.styles {
        let (category, index) = parse_style(spec)?;
        mapping.set(category, index);
    }
    if cli.raw_html {
        config.allow_raw_html = true;
    }
    config.validate()?;
    Ok((config, mapping))
}

fn parse_style(spec: &str) -> Result<(StyleCategory, usize), CliError> {
    let (name, index) = spec.split_once('=').ok_or_else(|| {
        CliError::Validation(format!("--style expects CATEGORY=INDEX, got `{spec}`"))
    })?;
    let category = StyleCategory::parse(name.trim())
        .ok_or_else(|| CliError::Validation(format!("unknown style category `{name}`")))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| CliError::Validation(format!("invalid style index `{index}`")))?;
    Ok((category, index))
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn list_presets() -> String {
    let mut out = String::new();
    for preset in ThemePreset::builtin() {
        out.push_str(&format!("{}\t{}\t{}\n", preset.id, preset.color, preset.name));
    }
    out
}

fn list_styles(library: &StyleLibrary) -> String {
    let mut out = String::new();
    for category in StyleCategory::ALL {
        for (index, template) in library.templates(category).iter().enumerate() {
            let dark = if template.is_dark { " (dark)" } else { "" };
            out.push_str(&format!("{category}\t{index}\t{}{dark}\n", template.name));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{Cli, parse_style, resolve_settings};
    use clap::Parser;
    use mdskin_core::StyleCategory;

    #[test]
    fn style_spec_parses() {
        let (category, index) = parse_style("quote=4").expect("style");
        assert_eq!(category, StyleCategory::Quote);
        assert_eq!(index, 4);
        assert!(parse_style("quote").is_err());
        assert!(parse_style("h6=1").is_err());
        assert!(parse_style("h1=x").is_err());
    }

    #[test]
    fn later_sources_override_earlier_ones() {
        let cli = Cli::parse_from([
            "mdskin", "--preset", "fancy", "--color", "#000000", "--style", "h1=3",
        ]);
        let (config, mapping) = resolve_settings(&cli).expect("settings");
        assert_eq!(config.theme_color, "#000000");
        assert_eq!(mapping.index(StyleCategory::H1), 3);
        assert_eq!(mapping.index(StyleCategory::Code), 9);
    }
}
