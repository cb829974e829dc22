//! Application state management for geogof.
//!
//! This module defines the shared state that is passed to all handlers:
//! the conditioned dataset, the optional outline, and the resolved
//! configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::dataset::PointDataset;
use crate::error::Result;
use crate::outline::Outline;
use crate::projection::Projection;

/// The main application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// The conditioned dataset
    pub dataset: PointDataset,
    /// Outline drawn beneath the points by `/plot`
    pub outline: Option<Outline>,
    /// Path the dataset was loaded from
    pub source_path: PathBuf,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        config: Config,
        dataset: PointDataset,
        outline: Option<Outline>,
        source_path: impl AsRef<Path>,
    ) -> Self {
        Self {
            config,
            dataset,
            outline,
            source_path: source_path.as_ref().to_path_buf(),
        }
    }

    /// Create a new AppState wrapped in an Arc for shared ownership
    pub fn new_shared(
        config: Config,
        dataset: PointDataset,
        outline: Option<Outline>,
        source_path: impl AsRef<Path>,
    ) -> Arc<Self> {
        Arc::new(Self::new(config, dataset, outline, source_path))
    }

    /// Projection from the render configuration, if one was set
    pub fn configured_projection(&self) -> Result<Option<Projection>> {
        self.config.render.projection()
    }

    /// Approximate bytes held by the dataset's numeric and geometry buffers
    pub fn data_memory_bytes(&self) -> usize {
        let table = self.dataset.gof_dataframe();
        let columns: usize = table
            .columns()
            .iter()
            .map(|c| match &c.values {
                crate::table::ColumnValues::Numeric(v) => v.len() * std::mem::size_of::<f64>(),
                crate::table::ColumnValues::Text(v) => v.iter().map(String::len).sum(),
            })
            .sum();
        columns + self.dataset.len() * std::mem::size_of::<geo::Point<f64>>()
    }
}
