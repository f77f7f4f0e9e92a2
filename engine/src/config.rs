use choromap_shared::colors::{Rgb, parse_hex_color};
use choromap_shared::palette::{DEFAULT_PALETTE, Palette};
use choromap_shared::scale::{BinStrategy, ScaleOptions};

pub const DEFAULT_BIN_COUNT: usize = 7;
pub const DEFAULT_FALLBACK_COLOR: Rgb = (158, 158, 158);
pub const DEFAULT_LABEL_TEMPLATE: &str = "{name}: {value}";
pub const DEFAULT_MISSING_PLACEHOLDER: &str = "No data";

/// Session-level options. Constructed once at setup; every derived scale
/// and label in the session reads from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Number of color bins, at least 1.
    pub bin_count: usize,
    pub default_palette: String,
    /// Fill for regions whose current attribute value is missing.
    pub missing_fallback: Rgb,
    pub label_template: String,
    pub missing_placeholder: String,
    pub bin_strategy: BinStrategy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bin_count: DEFAULT_BIN_COUNT,
            default_palette: DEFAULT_PALETTE.to_string(),
            missing_fallback: DEFAULT_FALLBACK_COLOR,
            label_template: DEFAULT_LABEL_TEMPLATE.to_string(),
            missing_placeholder: DEFAULT_MISSING_PLACEHOLDER.to_string(),
            bin_strategy: BinStrategy::default(),
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `CHOROMAP_*` environment variables. Invalid
    /// or unparseable values fall back to the default silently.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bin_count: env_bin_count().unwrap_or(defaults.bin_count),
            default_palette: env_palette().unwrap_or(defaults.default_palette),
            missing_fallback: env_fallback_color().unwrap_or(defaults.missing_fallback),
            label_template: env_label_template().unwrap_or(defaults.label_template),
            missing_placeholder: defaults.missing_placeholder,
            bin_strategy: env_bin_strategy().unwrap_or(defaults.bin_strategy),
        }
    }

    pub fn scale_options(&self) -> ScaleOptions {
        ScaleOptions {
            bin_count: self.bin_count.max(1),
            strategy: self.bin_strategy,
            fallback: self.missing_fallback,
        }
    }
}

fn env_bin_count() -> Option<usize> {
    std::env::var("CHOROMAP_BIN_COUNT")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value >= 1)
}

fn env_palette() -> Option<String> {
    std::env::var("CHOROMAP_PALETTE")
        .ok()
        .and_then(|value| Palette::by_name(&value).map(|p| p.name.to_string()))
}

fn env_fallback_color() -> Option<Rgb> {
    std::env::var("CHOROMAP_FALLBACK_COLOR")
        .ok()
        .and_then(|value| parse_hex_color(value.trim()))
}

fn env_label_template() -> Option<String> {
    std::env::var("CHOROMAP_LABEL_TEMPLATE")
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn env_bin_strategy() -> Option<BinStrategy> {
    std::env::var("CHOROMAP_BIN_STRATEGY")
        .ok()
        .and_then(|value| {
            match value.trim().to_ascii_lowercase().as_str() {
                "equal_width" | "equal-width" => Some(BinStrategy::EqualWidth),
                "quantile" => Some(BinStrategy::Quantile),
                _ => None,
            }
        })
}
