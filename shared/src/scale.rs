use serde::{Deserialize, Serialize};

use crate::colors::Rgb;
use crate::palette::Palette;
use crate::region::{AttrValue, Region};

/// How bin boundaries are placed over the value domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinStrategy {
    /// Evenly spaced edges over `[min, max]`. The default.
    #[default]
    EqualWidth,
    /// Edges at value quantiles; heavily tied data collapses to fewer bins.
    Quantile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleOptions {
    pub bin_count: usize,
    pub strategy: BinStrategy,
    /// Color for the missing sentinel and for the degenerate empty-domain
    /// scale.
    pub fallback: Rgb,
}

/// Discrete color binning for one attribute.
///
/// Bins are inclusive-lower/exclusive-upper; the last bin is closed on both
/// ends. A value equal to an interior edge belongs to the bin that edge
/// opens. An empty domain produces the degenerate scale with zero bins,
/// where every lookup resolves to the fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    pub palette: String,
    /// `bins + 1` strictly ascending edges; empty for the degenerate scale.
    pub boundaries: Vec<f64>,
    /// One color per bin.
    pub colors: Vec<Rgb>,
    pub fallback: Rgb,
}

impl ColorScale {
    /// Bin the non-missing values of `attribute` across `regions`.
    pub fn build(
        regions: &[Region],
        attribute: &str,
        palette: &Palette,
        opts: &ScaleOptions,
    ) -> ColorScale {
        let values: Vec<f64> = regions
            .iter()
            .filter_map(|region| region.attribute(attribute))
            .collect();
        Self::from_values(values, palette, opts)
    }

    fn from_values(mut values: Vec<f64>, palette: &Palette, opts: &ScaleOptions) -> ColorScale {
        if values.is_empty() {
            return ColorScale {
                palette: palette.name.to_string(),
                boundaries: Vec::new(),
                colors: Vec::new(),
                fallback: opts.fallback,
            };
        }

        values.sort_by(f64::total_cmp);
        let min = values[0];
        let max = values[values.len() - 1];
        let bin_count = opts.bin_count.max(1);

        let mut boundaries = if min == max {
            // Single bin covering that exact value.
            vec![min, max]
        } else {
            match opts.strategy {
                BinStrategy::EqualWidth => equal_width_edges(min, max, bin_count),
                BinStrategy::Quantile => quantile_edges(&values, bin_count),
            }
        };
        boundaries.dedup();

        let bins = boundaries.len() - 1;
        ColorScale {
            palette: palette.name.to_string(),
            boundaries,
            colors: palette.colors(bins),
            fallback: opts.fallback,
        }
    }

    pub fn bins(&self) -> usize {
        self.colors.len()
    }

    pub fn is_degenerate(&self) -> bool {
        self.colors.is_empty()
    }

    /// Bin index for a non-missing value; out-of-domain values clamp to the
    /// end bins so the lookup stays total.
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        if self.colors.is_empty() {
            return None;
        }
        let last = self.colors.len() - 1;
        let interior = &self.boundaries[1..self.boundaries.len() - 1];
        let idx = interior.partition_point(|edge| *edge <= value);
        Some(idx.min(last))
    }

    /// Fill color for a joined value. Missing and non-finite values resolve
    /// to the fallback, never to a bin.
    pub fn color_for(&self, value: AttrValue) -> Rgb {
        match value {
            Some(v) if v.is_finite() => self
                .bin_index(v)
                .map(|idx| self.colors[idx])
                .unwrap_or(self.fallback),
            _ => self.fallback,
        }
    }
}

fn equal_width_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let width = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| min + width * i as f64).collect();
    // Exact max, not min + width * bins: keeps the top edge free of float
    // drift so the maximum value always lands in the last bin.
    edges.push(max);
    edges
}

fn quantile_edges(sorted: &[f64], bins: usize) -> Vec<f64> {
    (0..=bins)
        .map(|i| quantile(sorted, i as f64 / bins as f64))
        .collect()
}

/// Linear-interpolated quantile of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::{BinStrategy, ColorScale, ScaleOptions};
    use crate::palette::Palette;
    use crate::region::{GeometryRef, Region};

    const FALLBACK: (u8, u8, u8) = (158, 158, 158);

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    fn opts(bin_count: usize, strategy: BinStrategy) -> ScaleOptions {
        ScaleOptions {
            bin_count,
            strategy,
            fallback: FALLBACK,
        }
    }

    fn regions_with_pop(values: &[Option<f64>]) -> Vec<Region> {
        values
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                let mut region = Region::new(idx.to_string(), format!("R{idx}"), GeometryRef(0));
                region.attributes.insert("pop".to_string(), *value);
                region
            })
            .collect()
    }

    fn palette() -> &'static Palette {
        Palette::by_name("amber").expect("palette")
    }

    #[test]
    fn two_equal_width_bins_over_100_to_200() {
        let regions = regions_with_pop(&[Some(100.0), Some(200.0), None]);
        let scale = ColorScale::build(&regions, "pop", palette(), &opts(2, BinStrategy::EqualWidth));

        assert_eq!(scale.bins(), 2);
        assert_eq!(scale.boundaries.len(), 3);
        assert_close(scale.boundaries[0], 100.0);
        assert_close(scale.boundaries[1], 150.0);
        assert_close(scale.boundaries[2], 200.0);

        assert_eq!(scale.color_for(Some(100.0)), scale.colors[0]);
        assert_eq!(scale.color_for(Some(200.0)), scale.colors[1]);
        assert_eq!(scale.color_for(None), FALLBACK);
    }

    #[test]
    fn interior_edge_value_opens_the_upper_bin() {
        let regions = regions_with_pop(&[Some(100.0), Some(150.0), Some(200.0)]);
        let scale = ColorScale::build(&regions, "pop", palette(), &opts(2, BinStrategy::EqualWidth));
        assert_eq!(scale.bin_index(150.0), Some(1));
        assert_eq!(scale.bin_index(149.999), Some(0));
    }

    #[test]
    fn every_input_value_lands_in_exactly_one_bin() {
        let values: Vec<Option<f64>> = (0..40).map(|i| Some(i as f64 * 3.7 - 20.0)).collect();
        let regions = regions_with_pop(&values);
        let scale = ColorScale::build(&regions, "pop", palette(), &opts(7, BinStrategy::EqualWidth));

        assert_eq!(scale.bins(), 7);
        for window in scale.boundaries.windows(2) {
            assert!(window[0] < window[1], "edges must ascend strictly");
        }
        for value in values.into_iter().flatten() {
            let idx = scale.bin_index(value).expect("in-domain value");
            assert!(idx < scale.bins());
            assert!(value >= scale.boundaries[idx]);
            assert!(value <= scale.boundaries[idx + 1]);
        }
    }

    #[test]
    fn empty_domain_degrades_to_all_fallback() {
        let regions = regions_with_pop(&[None, None]);
        let scale = ColorScale::build(&regions, "pop", palette(), &opts(7, BinStrategy::EqualWidth));

        assert!(scale.is_degenerate());
        assert_eq!(scale.bins(), 0);
        assert_eq!(scale.color_for(Some(42.0)), FALLBACK);
        assert_eq!(scale.color_for(None), FALLBACK);
    }

    #[test]
    fn constant_domain_collapses_to_one_exact_bin() {
        let regions = regions_with_pop(&[Some(7.0), Some(7.0), Some(7.0)]);
        let scale = ColorScale::build(&regions, "pop", palette(), &opts(5, BinStrategy::EqualWidth));

        assert_eq!(scale.bins(), 1);
        assert_close(scale.boundaries[0], 7.0);
        assert_close(scale.boundaries[1], 7.0);
        assert_eq!(scale.color_for(Some(7.0)), scale.colors[0]);
    }

    #[test]
    fn out_of_domain_lookups_clamp_to_end_bins() {
        let regions = regions_with_pop(&[Some(0.0), Some(10.0)]);
        let scale = ColorScale::build(&regions, "pop", palette(), &opts(2, BinStrategy::EqualWidth));

        assert_eq!(scale.bin_index(-5.0), Some(0));
        assert_eq!(scale.bin_index(99.0), Some(1));
    }

    #[test]
    fn non_finite_lookup_resolves_to_fallback() {
        let regions = regions_with_pop(&[Some(0.0), Some(10.0)]);
        let scale = ColorScale::build(&regions, "pop", palette(), &opts(2, BinStrategy::EqualWidth));
        assert_eq!(scale.color_for(Some(f64::NAN)), FALLBACK);
        assert_eq!(scale.color_for(Some(f64::INFINITY)), FALLBACK);
    }

    #[test]
    fn quantile_edges_follow_the_data_not_the_range() {
        // Skewed data: three small values, one huge outlier.
        let regions = regions_with_pop(&[Some(1.0), Some(2.0), Some(3.0), Some(1000.0)]);
        let scale = ColorScale::build(&regions, "pop", palette(), &opts(2, BinStrategy::Quantile));

        assert_eq!(scale.bins(), 2);
        assert_close(scale.boundaries[0], 1.0);
        assert_close(scale.boundaries[1], 2.5);
        assert_close(scale.boundaries[2], 1000.0);
        assert_eq!(scale.bin_index(3.0), Some(1));
    }

    #[test]
    fn quantile_collapses_duplicate_edges_on_tied_data() {
        let regions = regions_with_pop(&[Some(5.0), Some(5.0), Some(5.0), Some(5.0), Some(9.0)]);
        let scale = ColorScale::build(&regions, "pop", palette(), &opts(4, BinStrategy::Quantile));

        assert!(scale.bins() < 4);
        assert_eq!(scale.colors.len(), scale.boundaries.len() - 1);
        for window in scale.boundaries.windows(2) {
            assert!(window[0] < window[1]);
        }
    }

    #[test]
    fn bin_count_of_zero_is_clamped_to_one() {
        let regions = regions_with_pop(&[Some(1.0), Some(9.0)]);
        let scale = ColorScale::build(&regions, "pop", palette(), &opts(0, BinStrategy::EqualWidth));
        assert_eq!(scale.bins(), 1);
    }
}
