pub type Rgb = (u8, u8, u8);

/// Parse a `#rrggbb` or `rrggbb` hex color.
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

pub fn format_hex_color((r, g, b): Rgb) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

pub fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    let value = a as f64 + (b as f64 - a as f64) * t;
    value.round().clamp(0.0, 255.0) as u8
}

/// Sample a piecewise-linear gradient at `t` in `0..=1`. Stops must be
/// ordered by position and cover 0 and 1.
pub fn sample_stops(stops: &[(f64, Rgb)], t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    for window in stops.windows(2) {
        let (left_pos, left_color) = window[0];
        let (right_pos, right_color) = window[1];
        if t >= left_pos && t <= right_pos {
            let span = (right_pos - left_pos).max(f64::EPSILON);
            let local = (t - left_pos) / span;
            return (
                lerp_u8(left_color.0, right_color.0, local),
                lerp_u8(left_color.1, right_color.1, local),
                lerp_u8(left_color.2, right_color.2, local),
            );
        }
    }

    stops.last().map(|(_, color)| *color).unwrap_or((0, 0, 0))
}
