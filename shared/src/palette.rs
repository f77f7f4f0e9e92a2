use crate::colors::{Rgb, sample_stops};

pub const DEFAULT_PALETTE: &str = "amber";

/// A named sequential color ramp, low values first.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub name: &'static str,
    stops: &'static [(f64, Rgb)],
}

pub const PALETTES: &[Palette] = &[
    Palette {
        name: "amber",
        stops: &[
            (0.0, (255, 248, 229)),
            (1.0 / 3.0, (255, 204, 128)),
            (2.0 / 3.0, (255, 152, 0)),
            (1.0, (230, 81, 0)),
        ],
    },
    Palette {
        name: "blues",
        stops: &[
            (0.0, (247, 251, 255)),
            (1.0 / 3.0, (158, 202, 225)),
            (2.0 / 3.0, (66, 146, 198)),
            (1.0, (8, 48, 107)),
        ],
    },
    Palette {
        name: "greens",
        stops: &[
            (0.0, (247, 252, 245)),
            (1.0 / 3.0, (161, 217, 155)),
            (2.0 / 3.0, (49, 163, 84)),
            (1.0, (0, 68, 27)),
        ],
    },
    Palette {
        name: "viridis",
        stops: &[
            (0.0, (68, 1, 84)),
            (0.25, (59, 82, 139)),
            (0.5, (33, 145, 140)),
            (0.75, (94, 201, 98)),
            (1.0, (253, 231, 37)),
        ],
    },
    Palette {
        name: "heat",
        stops: &[
            (0.0, (30, 80, 220)),
            (0.25, (40, 200, 240)),
            (0.5, (245, 220, 70)),
            (0.75, (245, 140, 50)),
            (1.0, (220, 40, 35)),
        ],
    },
];

impl Palette {
    /// Resolve a palette identifier, case-insensitively.
    pub fn by_name(name: &str) -> Option<&'static Palette> {
        let name = name.trim();
        PALETTES.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// `n` evenly spaced colors along the ramp. A single bin samples the
    /// ramp midpoint.
    pub fn colors(&self, n: usize) -> Vec<Rgb> {
        match n {
            0 => Vec::new(),
            1 => vec![sample_stops(self.stops, 0.5)],
            _ => (0..n)
                .map(|i| sample_stops(self.stops, i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}
