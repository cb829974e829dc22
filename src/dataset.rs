//! The point dataset.
//!
//! `PointDataset` ingests a `PointSource`, validates the latitude, longitude
//! and objective columns, conditions the objective column (fill missing,
//! then clip), and attaches WGS84 point geometries. The result is immutable
//! and feeds both the static plot and the interactive layer.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::colormaps::{value_range, ColorRamp};
use crate::error::{GeogofError, Result};
use crate::geometry::GeoTable;
use crate::layer::StyledGeoLayer;
use crate::outline::Outline;
use crate::plot::{self, GeoAxes, PlotAxes, PlotOptions};
use crate::projection::Projection;
use crate::source::PointSource;
use crate::table::RowTable;

/// Column names and conditioning applied at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOptions {
    /// Name of the latitude column
    #[serde(default = "default_lat_name")]
    pub lat_name: String,

    /// Name of the longitude column
    #[serde(default = "default_lon_name")]
    pub lon_name: String,

    /// Name of the objective (value) column
    #[serde(default = "default_obj_name")]
    pub obj_name: String,

    /// Values below this are raised to it
    #[serde(default)]
    pub lower_clip: Option<f64>,

    /// Values above this are lowered to it
    #[serde(default)]
    pub upper_clip: Option<f64>,

    /// Replacement for missing objective values
    #[serde(default)]
    pub fill_na_value: f64,
}

impl DatasetOptions {
    pub fn lat_name(mut self, name: impl Into<String>) -> Self {
        self.lat_name = name.into();
        self
    }

    pub fn lon_name(mut self, name: impl Into<String>) -> Self {
        self.lon_name = name.into();
        self
    }

    pub fn obj_name(mut self, name: impl Into<String>) -> Self {
        self.obj_name = name.into();
        self
    }

    pub fn lower_clip(mut self, value: f64) -> Self {
        self.lower_clip = Some(value);
        self
    }

    pub fn upper_clip(mut self, value: f64) -> Self {
        self.upper_clip = Some(value);
        self
    }

    pub fn fill_na_value(mut self, value: f64) -> Self {
        self.fill_na_value = value;
        self
    }
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            lat_name: default_lat_name(),
            lon_name: default_lon_name(),
            obj_name: default_obj_name(),
            lower_clip: None,
            upper_clip: None,
            fill_na_value: 0.0,
        }
    }
}

fn default_lat_name() -> String {
    "lat".to_string()
}

fn default_lon_name() -> String {
    "lon".to_string()
}

fn default_obj_name() -> String {
    "obj".to_string()
}

/// Point data keyed by latitude/longitude, ready for plotting
#[derive(Debug, Clone)]
pub struct PointDataset {
    gof_dataframe: Arc<RowTable>,
    gdf: Arc<GeoTable>,
    lat_name: String,
    lon_name: String,
    obj_name: String,
}

impl PointDataset {
    /// Build a dataset from a table or labeled array
    pub fn new(source: impl Into<PointSource>, options: DatasetOptions) -> Result<Self> {
        let start = Instant::now();
        let mut table = source.into().into_row_table()?;

        for name in [&options.lat_name, &options.lon_name, &options.obj_name] {
            if !table.has_column(name) {
                return Err(GeogofError::MissingColumn {
                    column: name.clone(),
                });
            }
        }
        for name in [&options.lat_name, &options.lon_name] {
            table.numeric(name)?;
        }

        condition(
            table.numeric_mut(&options.obj_name)?,
            options.fill_na_value,
            options.lower_clip,
            options.upper_clip,
        );

        let gof_dataframe = Arc::new(table);
        let gdf = GeoTable::from_table(
            Arc::clone(&gof_dataframe),
            &options.lon_name,
            &options.lat_name,
        )?;

        debug!(
            rows = gof_dataframe.num_rows(),
            columns = gof_dataframe.columns().len(),
            obj = %options.obj_name,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Point dataset constructed"
        );

        Ok(Self {
            gof_dataframe,
            gdf: Arc::new(gdf),
            lat_name: options.lat_name,
            lon_name: options.lon_name,
            obj_name: options.obj_name,
        })
    }

    /// Build a dataset with the default column names and conditioning
    pub fn from_source(source: impl Into<PointSource>) -> Result<Self> {
        Self::new(source, DatasetOptions::default())
    }

    /// The conditioned row table
    pub fn gof_dataframe(&self) -> &RowTable {
        &self.gof_dataframe
    }

    /// The geometry-augmented table
    pub fn gdf(&self) -> &Arc<GeoTable> {
        &self.gdf
    }

    pub fn lat_name(&self) -> &str {
        &self.lat_name
    }

    pub fn lon_name(&self) -> &str {
        &self.lon_name
    }

    pub fn obj_name(&self) -> &str {
        &self.obj_name
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.gof_dataframe.num_rows()
    }

    /// Whether the dataset has no points
    pub fn is_empty(&self) -> bool {
        self.gof_dataframe.is_empty()
    }

    /// Conditioned objective values, in row order
    pub fn objective(&self) -> &[f64] {
        match self.gof_dataframe.numeric(&self.obj_name) {
            Ok(values) => values,
            // validated numeric at construction and never written since
            Err(_) => &[],
        }
    }

    /// Minimum and maximum of the objective column
    pub fn objective_range(&self) -> Option<(f64, f64)> {
        value_range(self.objective())
    }

    /// Static plot with the default render options
    pub fn pointplot(
        &self,
        outline_shape: Option<&Outline>,
        projection: Option<Projection>,
    ) -> Result<(PlotAxes, GeoAxes)> {
        self.pointplot_with(outline_shape, projection, &PlotOptions::default())
    }

    /// Static plot: optional outline underneath, one point per row colored by
    /// objective value category, legend enabled.
    pub fn pointplot_with(
        &self,
        outline_shape: Option<&Outline>,
        projection: Option<Projection>,
        options: &PlotOptions,
    ) -> Result<(PlotAxes, GeoAxes)> {
        let projection = projection.unwrap_or_else(|| self.default_projection(outline_shape));

        let geo_axes = GeoAxes::fit(&projection, &self.gdf, outline_shape, options)?;
        let base = match outline_shape {
            Some(outline) => Some(plot::polyplot(outline, &geo_axes, options)),
            None => None,
        };
        let axes = plot::pointplot(&self.gdf, self.objective(), &geo_axes, base, options);

        info!(
            projection = projection.name(),
            drawn = axes.drawn_points(),
            skipped = axes.skipped_points(),
            categories = axes.legend().len(),
            outline = outline_shape.is_some(),
            "Rendered point plot"
        );

        Ok((axes, geo_axes))
    }

    /// Lambert Azimuthal Equal-Area centred on the data, falling back to the
    /// outline centroid and then to (0, 0)
    pub fn default_projection(&self, outline_shape: Option<&Outline>) -> Projection {
        let center = self
            .gdf
            .mean_point()
            .or_else(|| outline_shape.and_then(Outline::centroid))
            .unwrap_or_else(|| geo::Point::new(0.0, 0.0));
        Projection::laea_centered_on(center)
    }

    /// Interactive layer colored by a blue → yellow → red ramp spanning the
    /// objective column's observed range
    pub fn interactive_layer(&self) -> Result<StyledGeoLayer> {
        if self.is_empty() {
            return Err(GeogofError::EmptyDataset {
                message: "Cannot build an interactive layer from zero rows".to_string(),
            });
        }

        let ramp = ColorRamp::blue_yellow_red_for(self.objective())?;
        debug!(
            min = ramp.min(),
            max = ramp.max(),
            rows = self.len(),
            "Built interactive layer ramp"
        );

        Ok(StyledGeoLayer::new(
            Arc::clone(&self.gdf),
            self.obj_name.clone(),
            ramp,
        ))
    }
}

/// Fill missing values, then raise values below `lower`, then lower values
/// above `upper`.
pub fn condition(values: &mut [f64], fill_na_value: f64, lower: Option<f64>, upper: Option<f64>) {
    for value in values.iter_mut() {
        if value.is_nan() {
            *value = fill_na_value;
        }
        if let Some(lower) = lower {
            if *value < lower {
                *value = lower;
            }
        }
        if let Some(upper) = upper {
            if *value > upper {
                *value = upper;
            }
        }
    }
}
