//! Styled interactive map layer.
//!
//! A `StyledGeoLayer` is what a Leaflet-style web map needs to draw the
//! dataset: the shared geometry table, fixed base/hover/point styles, and a
//! color ramp that resolves each feature's fill color from its objective
//! value. `to_geojson` resolves the per-feature styles and emits a
//! FeatureCollection with the style stored in each feature's properties.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::colormaps::ColorRamp;
use crate::error::Result;
use crate::geometry::GeoTable;

/// Display name of the layer
pub const LAYER_NAME: &str = "Release";

/// Base style applied to every feature
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub color: String,
    pub weight: f64,
    pub dash_array: String,
    pub fill_opacity: f64,
    pub radius: f64,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
            weight: 1.9,
            dash_array: "2".to_string(),
            fill_opacity: 0.6,
            radius: 8.0,
        }
    }
}

/// Style applied while a feature is hovered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverStyle {
    pub fill_color: String,
    pub fill_opacity: f64,
}

impl Default for HoverStyle {
    fn default() -> Self {
        Self {
            fill_color: "red".to_string(),
            fill_opacity: 0.2,
        }
    }
}

/// Marker style for individual points
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointStyle {
    pub radius: f64,
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub weight: f64,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            radius: 5.0,
            color: "red".to_string(),
            fill_color: "blue".to_string(),
            fill_opacity: 0.8,
            weight: 3.0,
        }
    }
}

/// Fully resolved style of one feature
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    #[serde(flatten)]
    pub base: LayerStyle,
    pub fill_color: String,
}

/// Interactive layer over a dataset's geometry table
#[derive(Debug)]
pub struct StyledGeoLayer {
    name: String,
    data: Arc<GeoTable>,
    obj_name: String,
    ramp: ColorRamp,
    style: LayerStyle,
    hover_style: HoverStyle,
    point_style: PointStyle,
}

impl StyledGeoLayer {
    /// Create a layer with the default styles
    pub fn new(data: Arc<GeoTable>, obj_name: impl Into<String>, ramp: ColorRamp) -> Self {
        Self {
            name: LAYER_NAME.to_string(),
            data,
            obj_name: obj_name.into(),
            ramp,
            style: LayerStyle::default(),
            hover_style: HoverStyle::default(),
            point_style: PointStyle::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The geometry table the layer draws (shared, not copied)
    pub fn data(&self) -> &Arc<GeoTable> {
        &self.data
    }

    pub fn obj_name(&self) -> &str {
        &self.obj_name
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    pub fn hover_style(&self) -> &HoverStyle {
        &self.hover_style
    }

    pub fn point_style(&self) -> &PointStyle {
        &self.point_style
    }

    /// Style of a feature with the given objective value
    pub fn style_for(&self, value: f64) -> FeatureStyle {
        FeatureStyle {
            base: self.style.clone(),
            fill_color: self.ramp.hex_for(value),
        }
    }

    /// Render the layer as a GeoJSON FeatureCollection
    pub fn to_geojson(&self) -> Result<Value> {
        let table = self.data.table();
        let values = table.numeric(&self.obj_name)?;

        let mut features = Vec::with_capacity(self.data.len());
        for (i, point) in self.data.geometry().iter().enumerate() {
            let mut properties = Map::new();
            if let Some(row) = table.row(i) {
                for (name, cell) in row {
                    properties.insert(name.to_string(), cell.to_json());
                }
            }

            let geometry = if point.x().is_finite() && point.y().is_finite() {
                json!({"type": "Point", "coordinates": [point.x(), point.y()]})
            } else {
                Value::Null
            };

            features.push(json!({
                "type": "Feature",
                "id": i,
                "properties": properties,
                "style": serde_json::to_value(self.style_for(values[i]))?,
                "geometry": geometry,
            }));
        }

        Ok(json!({
            "type": "FeatureCollection",
            "crs": {
                "type": "name",
                "properties": {"name": self.data.crs().to_string()},
            },
            "layer": {
                "name": self.name,
                "objective": self.obj_name,
                "style": self.style,
                "hover_style": self.hover_style,
                "point_style": self.point_style,
                "ramp": {
                    "colors": ["blue", "yellow", "red"],
                    "min": self.ramp.min(),
                    "max": self.ramp.max(),
                },
            },
            "features": features,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ColumnValues, RowTable};
    use pretty_assertions::assert_eq;

    fn layer() -> StyledGeoLayer {
        let table = Arc::new(
            RowTable::from_numeric(vec![
                ("lat", vec![10.0, 20.0, f64::NAN]),
                ("lon", vec![1.0, 2.0, 3.0]),
                ("obj", vec![1.0, 9.0, 5.0]),
            ])
            .unwrap(),
        );
        let gdf = Arc::new(GeoTable::from_table(table, "lon", "lat").unwrap());
        let ramp = ColorRamp::blue_yellow_red_for(&[1.0, 9.0, 5.0]).unwrap();
        StyledGeoLayer::new(gdf, "obj", ramp)
    }

    #[test]
    fn test_defaults() {
        let layer = layer();
        assert_eq!(layer.name(), "Release");
        assert_eq!(layer.style().color, "black");
        assert_eq!(layer.style().weight, 1.9);
        assert_eq!(layer.style().fill_opacity, 0.6);
        assert_eq!(layer.style().radius, 8.0);
        assert_eq!(layer.hover_style().fill_color, "red");
        assert_eq!(layer.hover_style().fill_opacity, 0.2);
        assert_eq!(layer.point_style().radius, 5.0);
        assert_eq!(layer.point_style().fill_color, "blue");
    }

    #[test]
    fn test_style_serialization() {
        let style = layer().style_for(9.0);
        let value = serde_json::to_value(&style).unwrap();
        assert_eq!(
            value,
            json!({
                "color": "black",
                "weight": 1.9,
                "dashArray": "2",
                "fillOpacity": 0.6,
                "radius": 8.0,
                "fillColor": "#ff0000",
            })
        );
    }

    #[test]
    fn test_geojson_features() {
        let geojson = layer().to_geojson().unwrap();
        let features = geojson["features"].as_array().unwrap();

        assert_eq!(features.len(), 3);
        assert_eq!(geojson["layer"]["name"], "Release");
        assert_eq!(geojson["crs"]["properties"]["name"], "EPSG:4326");

        assert_eq!(features[0]["geometry"]["coordinates"], json!([1.0, 10.0]));
        assert_eq!(features[0]["properties"]["obj"], json!(1.0));
        assert_eq!(features[0]["style"]["fillColor"], "#0000ff");
        assert_eq!(features[2]["style"]["fillColor"], "#ffff00");
        assert_eq!(features[2]["geometry"], Value::Null);
        assert_eq!(features[2]["properties"]["lat"], Value::Null);
    }

    #[test]
    fn test_style_column_kept_in_properties() {
        let mut table = RowTable::from_numeric(vec![
            ("lat", vec![10.0]),
            ("lon", vec![1.0]),
            ("obj", vec![4.0]),
        ])
        .unwrap();
        table
            .push_column("style", ColumnValues::Text(vec!["dotted".to_string()]))
            .unwrap();
        let gdf = Arc::new(GeoTable::from_table(Arc::new(table), "lon", "lat").unwrap());
        let ramp = ColorRamp::blue_yellow_red_for(&[4.0]).unwrap();
        let geojson = StyledGeoLayer::new(gdf, "obj", ramp).to_geojson().unwrap();

        let feature = &geojson["features"][0];
        assert_eq!(feature["properties"]["style"], "dotted");
        assert_eq!(feature["style"]["color"], "black");
        assert_eq!(feature["style"]["fillColor"], "#ffff00");
    }
}
