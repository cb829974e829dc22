//! Value-keyed color ramps.
//!
//! `ColorRamp` pins a colormap to an observed value range; `CategoricalPalette`
//! assigns one color per distinct value for the static plot.

use crate::colormaps::colormap::{to_hex, Colormap, GradientColormap};
use crate::error::{GeogofError, Result};

/// Continuous color ramp over `[min, max]`
#[derive(Debug)]
pub struct ColorRamp {
    colormap: GradientColormap,
    min: f64,
    max: f64,
}

impl ColorRamp {
    /// Create a ramp spanning `[min, max]`
    pub fn new(colormap: GradientColormap, min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(GeogofError::ColorRamp {
                message: format!("Invalid ramp bounds: [{}, {}]", min, max),
            });
        }
        Ok(Self { colormap, min, max })
    }

    /// Blue → yellow → red ramp fitted to the finite values given.
    /// Fails when there is no finite value to take bounds from.
    pub fn blue_yellow_red_for(values: &[f64]) -> Result<Self> {
        let (min, max) = value_range(values).ok_or_else(|| GeogofError::EmptyDataset {
            message: "Cannot build a color ramp without any finite values".to_string(),
        })?;
        Self::new(GradientColormap::blue_yellow_red()?, min, max)
    }

    /// Lower bound (maps to the first stop)
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound (maps to the last stop)
    pub fn max(&self) -> f64 {
        self.max
    }

    /// RGBA color for a value
    pub fn color_for(&self, value: f64) -> [u8; 4] {
        self.colormap.map(value, self.min, self.max)
    }

    /// `#rrggbb` color for a value
    pub fn hex_for(&self, value: f64) -> String {
        to_hex(self.color_for(value))
    }
}

/// Minimum and maximum of the finite values, if any
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// One color per distinct value, sampled evenly from a colormap
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalPalette {
    categories: Vec<(f64, [u8; 4])>,
}

impl CategoricalPalette {
    /// Build a palette for the distinct finite values, ascending
    pub fn from_values(values: &[f64], colormap: &dyn Colormap) -> Self {
        let mut distinct: Vec<f64> = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            // fold -0.0 into 0.0 so both land in one category
            .map(|v| v + 0.0)
            .collect();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();

        let n = distinct.len();
        let categories = distinct
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let t = if n > 1 {
                    i as f64 / (n - 1) as f64
                } else {
                    0.5
                };
                (v, colormap.map_normalized(t))
            })
            .collect();

        Self { categories }
    }

    /// Categories in ascending order
    pub fn categories(&self) -> &[(f64, [u8; 4])] {
        &self.categories
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether there are no categories
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Color of the category a value belongs to
    pub fn color_for(&self, value: f64) -> Option<[u8; 4]> {
        let value = value + 0.0;
        self.categories
            .binary_search_by(|(v, _)| v.total_cmp(&value))
            .ok()
            .map(|i| self.categories[i].1)
    }
}
