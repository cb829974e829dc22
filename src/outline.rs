//! Outline (basemap) geometry drawn beneath the points.
//!
//! Outlines are read from GeoJSON: a FeatureCollection, a single Feature, or a
//! bare Polygon/MultiPolygon geometry. Only polygonal geometries are kept.

use geo::{Centroid, Coord, LineString, MultiPolygon, Point, Polygon};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{GeogofError, Result};

/// Background polygon collection in WGS84 lon/lat
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    polygons: MultiPolygon<f64>,
}

impl Outline {
    /// Wrap an existing polygon collection
    pub fn new(polygons: MultiPolygon<f64>) -> Self {
        Self { polygons }
    }

    /// Load an outline from a GeoJSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let outline = Self::from_geojson_str(&content)?;
        debug!(
            path = %path.display(),
            polygons = outline.polygons.0.len(),
            "Loaded outline"
        );
        Ok(outline)
    }

    /// Parse an outline from GeoJSON text
    pub fn from_geojson_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        let mut polygons = Vec::new();
        collect_polygons(&value, &mut polygons)?;

        if polygons.is_empty() {
            return Err(GeogofError::InvalidParameter {
                param: "outline".to_string(),
                message: "GeoJSON contains no Polygon or MultiPolygon geometry".to_string(),
            });
        }

        Ok(Self::new(MultiPolygon::new(polygons)))
    }

    /// The polygons
    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    /// Every ring (exterior and interior) of every polygon
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.polygons
            .0
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
    }

    /// Area-weighted centroid of the outline
    pub fn centroid(&self) -> Option<Point<f64>> {
        self.polygons.centroid()
    }
}

fn collect_polygons(value: &Value, out: &mut Vec<Polygon<f64>>) -> Result<()> {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();

    match kind {
        "FeatureCollection" => {
            let features = value
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| invalid("FeatureCollection without a features array"))?;
            for feature in features {
                collect_polygons(feature, out)?;
            }
        }
        "Feature" => match value.get("geometry") {
            Some(Value::Null) | None => {}
            Some(geometry) => collect_polygons(geometry, out)?,
        },
        "GeometryCollection" => {
            let geometries = value
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or_else(|| invalid("GeometryCollection without a geometries array"))?;
            for geometry in geometries {
                collect_polygons(geometry, out)?;
            }
        }
        "Polygon" => out.push(parse_polygon(coordinates(value)?)?),
        "MultiPolygon" => {
            let polygons = coordinates(value)?
                .as_array()
                .ok_or_else(|| invalid("MultiPolygon coordinates must be an array"))?;
            for polygon in polygons {
                out.push(parse_polygon(polygon)?);
            }
        }
        "" => return Err(invalid("GeoJSON object without a type")),
        other => warn!(geometry_type = other, "Ignoring non-polygonal outline geometry"),
    }

    Ok(())
}

fn coordinates(value: &Value) -> Result<&Value> {
    value
        .get("coordinates")
        .ok_or_else(|| invalid("Geometry without coordinates"))
}

fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let rings = value
        .as_array()
        .ok_or_else(|| invalid("Polygon coordinates must be an array of rings"))?;

    let mut rings = rings.iter().map(parse_ring);
    let exterior = rings
        .next()
        .ok_or_else(|| invalid("Polygon without an exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(value: &Value) -> Result<LineString<f64>> {
    let positions = value
        .as_array()
        .ok_or_else(|| invalid("Ring must be an array of positions"))?;

    positions
        .iter()
        .map(|position| {
            let pair = position.as_array().filter(|p| p.len() >= 2);
            match pair.map(|p| (p[0].as_f64(), p[1].as_f64())) {
                Some((Some(x), Some(y))) => Ok(Coord { x, y }),
                _ => Err(invalid("Position must hold two numbers")),
            }
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

fn invalid(message: &str) -> GeogofError {
    GeogofError::InvalidParameter {
        param: "outline".to_string(),
        message: message.to_string(),
    }
}
