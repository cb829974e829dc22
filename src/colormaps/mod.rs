//! Colormap implementations for point styling.
//!
//! This module provides the continuous ramp used by the interactive layer and
//! the categorical palette used by the static plot.

pub mod colormap;
pub mod ramp;

pub use colormap::{get_colormap, to_hex, Colormap, GradientColormap};
pub use ramp::{value_range, CategoricalPalette, ColorRamp};
