//! The static NDVI legend: a gradient bar with three labelled ticks.

use stressmap_types::Color;

use crate::style::color_for;

/// Legend title.
pub const LEGEND_TITLE: &str = "NDVI Legend";

/// A labelled position on the gradient bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendTick {
    /// NDVI value at the tick.
    pub value: f64,
    /// Position along the bar, `0.0` at the left end and `1.0` at the right.
    pub position: f64,
}

impl LegendTick {
    /// Tick label with one decimal, e.g. `0.5`.
    pub fn label(&self) -> String {
        format!("{:.1}", self.value)
    }
}

/// Legend of the stress map colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    ticks: Vec<LegendTick>,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            ticks: [0.0, 0.5, 1.0]
                .into_iter()
                .map(|value| LegendTick {
                    value,
                    position: value,
                })
                .collect(),
        }
    }
}

impl Legend {
    /// Title shown above the bar.
    pub fn title(&self) -> &'static str {
        LEGEND_TITLE
    }

    /// Ticks from left to right.
    pub fn ticks(&self) -> &[LegendTick] {
        &self.ticks
    }

    /// Colors of a gradient bar `width` samples wide, from `0.0` to `1.0`.
    ///
    /// Samples come from the same ramp that colors the features.
    pub fn gradient(&self, width: usize) -> Vec<Color> {
        match width {
            0 => Vec::new(),
            1 => vec![color_for(Some(0.0))],
            _ => (0..width)
                .map(|i| color_for(Some(i as f64 / (width - 1) as f64)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_ticks_with_one_decimal() {
        let legend = Legend::default();
        let labels: Vec<_> = legend.ticks().iter().map(LegendTick::label).collect();
        assert_eq!(labels, vec!["0.0", "0.5", "1.0"]);
        assert_eq!(legend.title(), "NDVI Legend");
    }

    #[test]
    fn gradient_matches_feature_ramp() {
        let gradient = Legend::default().gradient(3);
        assert_eq!(
            gradient,
            vec![Color::rgb(255, 0, 0), Color::rgb(128, 128, 0), Color::rgb(0, 255, 0)]
        );
        assert_eq!(Legend::default().gradient(150).len(), 150);
        assert!(Legend::default().gradient(0).is_empty());
    }
}
