use crate::region::Region;
use crate::scale::ColorScale;

/// Render one region's display string from `template`.
///
/// Placeholders: `{name}`, `{id}`, `{attribute}`, `{value}`. Numbers print
/// with Rust's shortest round-trip formatting, so no precision is invented
/// beyond what the source carried; missing values print as
/// `missing_placeholder`. Total and side-effect free.
pub fn format_label(
    region: &Region,
    attribute: &str,
    template: &str,
    missing_placeholder: &str,
) -> String {
    let value = match region.attribute(attribute) {
        Some(v) => format_number(v),
        None => missing_placeholder.to_string(),
    };
    template
        .replace("{name}", &region.name)
        .replace("{id}", &region.id)
        .replace("{attribute}", attribute)
        .replace("{value}", &value)
}

pub fn format_number(value: f64) -> String {
    format!("{value}")
}

/// One legend line per bin ("low - high", or the value alone for a
/// single-point bin), plus a trailing entry for the missing fallback.
pub fn legend_entries(scale: &ColorScale, missing_placeholder: &str) -> Vec<String> {
    let mut entries: Vec<String> = scale
        .boundaries
        .windows(2)
        .map(|window| {
            if window[0] == window[1] {
                format_number(window[0])
            } else {
                format!("{} - {}", format_number(window[0]), format_number(window[1]))
            }
        })
        .collect();
    entries.push(missing_placeholder.to_string());
    entries
}
