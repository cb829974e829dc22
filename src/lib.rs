//! # geogof
//!
//! Point data on a map.
//!
//! A [`PointDataset`] wraps a table (or a labeled n-dimensional array) of
//! points keyed by latitude and longitude with one numeric objective column.
//! Construction validates the named columns, fills missing objective values
//! and clips them, then attaches WGS84 point geometry. From there the dataset
//! renders two ways:
//!
//! - [`PointDataset::pointplot`]: a static projected plot, optionally drawn
//!   over an outline shape, with points colored by objective category.
//! - [`PointDataset::interactive_layer`]: a styled GeoJSON layer colored by a
//!   blue → yellow → red ramp over the objective range, ready for a web map.
//!
//! The `geogof` binary exposes both as `render` and `layer` commands and can
//! serve the layer and plot over HTTP with `serve`.

pub mod colormaps;
pub mod config;
pub mod data_loader;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod handlers;
pub mod labeled;
pub mod layer;
pub mod logging;
pub mod outline;
pub mod plot;
pub mod projection;
pub mod server;
pub mod source;
pub mod state;
pub mod table;

pub use config::Config;
pub use dataset::{DatasetOptions, PointDataset};
pub use error::{GeogofError, Result};
pub use geometry::{Crs, GeoTable};
pub use labeled::{Dimension, LabeledArray};
pub use layer::{StyledGeoLayer, LAYER_NAME};
pub use logging::{
    create_http_trace_layer, generate_request_id, init_tracing, log_data_load_stats, log_error,
    log_operation_end, log_operation_start, log_request_error, log_timed_operation,
};
pub use outline::Outline;
pub use plot::{GeoAxes, PlotAxes, PlotOptions};
pub use projection::Projection;
pub use source::PointSource;
pub use state::AppState;
pub use table::{ColumnValues, RowTable};
