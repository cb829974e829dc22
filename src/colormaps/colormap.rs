//! Colormap trait and gradient-backed implementation.
//!
//! This module defines the common interface for all colormaps.

use std::fmt;

use crate::error::{GeogofError, Result};

/// Trait for color mapping implementations
pub trait Colormap {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f64) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f64, min: f64, max: f64) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// Colormap backed by a `colorgrad` gradient over the unit domain
pub struct GradientColormap {
    name: String,
    gradient: colorgrad::Gradient,
}

impl GradientColormap {
    /// Build a colormap from CSS color names or hex codes, evenly spaced
    pub fn from_html_colors(name: &str, colors: &[&str]) -> Result<Self> {
        let gradient = colorgrad::CustomGradient::new()
            .html_colors(colors)
            .build()
            .map_err(|e| GeogofError::ColorRamp {
                message: format!("Failed to build {} gradient: {}", name, e),
            })?;

        Ok(Self {
            name: name.to_string(),
            gradient,
        })
    }

    /// Blue through yellow to red
    pub fn blue_yellow_red() -> Result<Self> {
        Self::from_html_colors("blue-yellow-red", &["blue", "yellow", "red"])
    }

    /// Matplotlib's viridis
    pub fn viridis() -> Self {
        Self {
            name: "viridis".to_string(),
            gradient: colorgrad::viridis(),
        }
    }
}

impl Colormap for GradientColormap {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.gradient.at(value).to_rgba8()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for GradientColormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientColormap")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Get a colormap by name
pub fn get_colormap(name: &str) -> Result<GradientColormap> {
    match name.to_lowercase().as_str() {
        "viridis" => Ok(GradientColormap::viridis()),
        "blue-yellow-red" | "byr" => GradientColormap::blue_yellow_red(),
        _ => Err(GeogofError::InvalidParameter {
            param: "colormap".to_string(),
            message: format!("Unknown colormap: {}", name),
        }),
    }
}

/// Format an RGBA color as a `#rrggbb` hex string
pub fn to_hex(color: [u8; 4]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}
