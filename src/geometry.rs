//! Geometry-augmented point table.
//!
//! Every row of the conditioned table gets a `geo::Point` built from its
//! (longitude, latitude) pair. Points are only ever derived from the
//! table, never set independently.

use geo::{BoundingRect, Point, Rect};
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::table::RowTable;

/// Coordinate reference system tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// WGS84 geographic coordinates (EPSG:4326)
    Wgs84,
}

impl Crs {
    /// EPSG code of the reference system
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// A row table with one point geometry per row
#[derive(Debug, Clone)]
pub struct GeoTable {
    table: Arc<RowTable>,
    geometry: Vec<Point<f64>>,
    crs: Crs,
}

impl GeoTable {
    /// Attach WGS84 point geometries built from the named lon/lat columns
    pub fn from_table(table: Arc<RowTable>, lon_name: &str, lat_name: &str) -> Result<Self> {
        let lons = table.numeric(lon_name)?;
        let lats = table.numeric(lat_name)?;

        let geometry = lons
            .iter()
            .zip(lats)
            .map(|(&lon, &lat)| Point::new(lon, lat))
            .collect();

        Ok(Self {
            table,
            geometry,
            crs: Crs::Wgs84,
        })
    }

    /// The attribute table
    pub fn table(&self) -> &RowTable {
        &self.table
    }

    /// Shared handle to the attribute table
    pub fn table_shared(&self) -> Arc<RowTable> {
        Arc::clone(&self.table)
    }

    /// One point per row, in row order
    pub fn geometry(&self) -> &[Point<f64>] {
        &self.geometry
    }

    /// Reference system of the geometries
    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// Points whose coordinates are both finite
    pub fn finite_points(&self) -> impl Iterator<Item = &Point<f64>> {
        self.geometry
            .iter()
            .filter(|p| p.x().is_finite() && p.y().is_finite())
    }

    /// Lon/lat bounding box of the finite points
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let points: geo::MultiPoint<f64> = self.finite_points().copied().collect();
        points.bounding_rect()
    }

    /// Mean of the finite points. Longitude is averaged on the circle, so
    /// points on both sides of the antimeridian centre near ±180.
    pub fn mean_point(&self) -> Option<Point<f64>> {
        let (mut sum_sin, mut sum_cos, mut sum_y, mut n) = (0.0, 0.0, 0.0, 0usize);
        for p in self.finite_points() {
            let (sin, cos) = p.x().to_radians().sin_cos();
            sum_sin += sin;
            sum_cos += cos;
            sum_y += p.y();
            n += 1;
        }
        if n == 0 {
            return None;
        }

        // opposite longitudes cancel out; fall back to the arithmetic mean
        let lon = if sum_sin.hypot(sum_cos) < 1e-9 * n as f64 {
            self.finite_points().map(|p| p.x()).sum::<f64>() / n as f64
        } else {
            sum_sin.atan2(sum_cos).to_degrees()
        };
        Some(Point::new(lon, sum_y / n as f64))
    }
}
