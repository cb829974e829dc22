//! Integration tests for geogof
//!
//! These tests drive the library from input files through to plots, layers
//! and the HTTP routes.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tower::ServiceExt;

use common::assertions::{assert_approx_eq, assert_hex_color, assert_slice_approx_eq};
use common::{image_utils, test_data};
use geogof::data_loader::load_source;
use geogof::{
    AppState, Config, DatasetOptions, Dimension, GeogofError, LabeledArray, Outline,
    PointDataset, Projection, RowTable, LAYER_NAME,
};

fn table(lat: Vec<f64>, lon: Vec<f64>, obj: Vec<f64>) -> RowTable {
    RowTable::from_numeric(vec![("lat", lat), ("lon", lon), ("obj", obj)]).unwrap()
}

fn europe_dataset() -> PointDataset {
    let source = geogof::data_loader::parse_records(test_data::EUROPE_POINTS).unwrap();
    PointDataset::from_source(source).unwrap()
}

#[test]
fn test_row_count_preserved() {
    for n in [1usize, 2, 17] {
        let lat: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let dataset = PointDataset::from_source(table(lat.clone(), lat.clone(), lat)).unwrap();
        assert_eq!(dataset.gof_dataframe().num_rows(), n);
        assert_eq!(dataset.gdf().len(), n);
    }
}

#[test]
fn test_each_missing_column_is_named() {
    let full = [("lat", 1.0), ("lon", 2.0), ("obj", 3.0)];
    for missing in ["lat", "lon", "obj"] {
        let columns: Vec<(&str, Vec<f64>)> = full
            .iter()
            .filter(|(name, _)| *name != missing)
            .map(|(name, v)| (*name, vec![*v]))
            .collect();
        let source = RowTable::from_numeric(columns).unwrap();

        match PointDataset::from_source(source) {
            Err(GeogofError::MissingColumn { column }) => assert_eq!(column, missing),
            other => panic!("Expected missing {} column, got {:?}", missing, other),
        }
    }
}

#[test]
fn test_missing_column_message() {
    let source = RowTable::from_numeric(vec![("lat", vec![1.0]), ("lon", vec![2.0])]).unwrap();
    let err = PointDataset::from_source(source).unwrap_err();
    assert_eq!(err.to_string(), "Column obj not found in the table");
}

#[test]
fn test_fill_then_clip() {
    let options = DatasetOptions::default()
        .lower_clip(0.0)
        .upper_clip(10.0)
        .fill_na_value(0.0);
    let dataset = PointDataset::new(
        table(vec![0.0; 4], vec![0.0; 4], vec![-5.0, 2.0, f64::NAN, 20.0]),
        options,
    )
    .unwrap();

    assert_slice_approx_eq(
        dataset.gof_dataframe().numeric("obj").unwrap(),
        &[0.0, 2.0, 0.0, 10.0],
        None,
    );
}

#[test]
fn test_grid_flattens_to_one_row_per_cell() {
    let array = LabeledArray::from_shape_vec(
        "obj",
        vec![
            Dimension::new("lat", vec![10.0, 20.0]),
            Dimension::new("lon", vec![100.0, 110.0]),
        ],
        vec![1.0, 2.0, 3.0, 4.0],
    )
    .unwrap();

    let dataset = PointDataset::from_source(array).unwrap();
    let frame = dataset.gof_dataframe();
    assert_eq!(frame.num_rows(), 4);
    assert_eq!(frame.numeric("lat").unwrap(), &[10.0, 10.0, 20.0, 20.0]);
    assert_eq!(frame.numeric("lon").unwrap(), &[100.0, 110.0, 100.0, 110.0]);
    assert_eq!(frame.numeric("obj").unwrap(), &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_layer_ramp_endpoints() {
    let dataset = PointDataset::from_source(table(
        vec![0.0, 1.0, 2.0],
        vec![0.0, 1.0, 2.0],
        vec![1.0, 5.0, 9.0],
    ))
    .unwrap();
    let layer = dataset.interactive_layer().unwrap();

    assert_eq!(layer.name(), LAYER_NAME);
    assert_approx_eq(layer.ramp().min(), 1.0, None);
    assert_approx_eq(layer.ramp().max(), 9.0, None);
    assert_hex_color(&layer.style_for(1.0).fill_color, [0, 0, 255]);
    assert_hex_color(&layer.style_for(5.0).fill_color, [255, 255, 0]);
    assert_hex_color(&layer.style_for(9.0).fill_color, [255, 0, 0]);
}

#[test]
fn test_layer_on_empty_dataset_fails() {
    let dataset = PointDataset::from_source(table(vec![], vec![], vec![])).unwrap();
    assert!(dataset.is_empty());
    assert!(matches!(
        dataset.interactive_layer(),
        Err(GeogofError::EmptyDataset { .. })
    ));
}

#[test]
fn test_pointplot_without_outline() {
    let dataset = europe_dataset();
    let (axes, geo_axes) = dataset.pointplot(None, None).unwrap();

    assert!(!axes.has_outline());
    assert_eq!(axes.drawn_points(), 5);
    assert_eq!(axes.legend().len(), 5);
    assert_eq!(geo_axes.projection().name(), "laea");
    assert_eq!(axes.image().dimensions(), (800, 600));
}

#[test]
fn test_pointplot_with_outline_and_projection() {
    let dataset = europe_dataset();
    let outline = Outline::from_geojson_str(test_data::FRANCE_OUTLINE).unwrap();
    let projection = Projection::parse_projection("platecarree").unwrap();

    let (axes, geo_axes) = dataset.pointplot(Some(&outline), Some(projection)).unwrap();
    assert!(axes.has_outline());
    assert_eq!(geo_axes.projection(), &projection);

    let png = axes.to_png().unwrap();
    assert_eq!(
        image_utils::detect_image_format(&png),
        Some(image::ImageFormat::Png)
    );
    let decoded = image_utils::load_image_from_bytes(&png).unwrap();
    assert!(image_utils::count_non_background(&decoded, [255, 255, 255, 255]) > 0);
    assert!(image_utils::contains_color(&decoded, [64, 64, 64, 255]));
}

#[test]
fn test_json_file_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let points = dir.path().join("points.json");
    test_data::write_points_json(&points).unwrap();

    let source = load_source(&points, None).unwrap();
    let dataset = PointDataset::new(source, DatasetOptions::default().upper_clip(6.0)).unwrap();

    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.objective(), &[1.0, 3.0, 5.0, 6.0, 6.0]);

    let geojson = dataset.interactive_layer().unwrap().to_geojson().unwrap();
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 5);
    assert_eq!(features[0]["properties"]["site"], "brest");
    assert_eq!(features[0]["style"]["fillColor"], "#0000ff");
    assert_eq!(features[4]["style"]["fillColor"], "#ff0000");
    assert_eq!(geojson["crs"]["properties"]["name"], "EPSG:4326");
}

#[cfg(feature = "netcdf")]
#[test]
fn test_netcdf_file_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.nc");
    test_data::create_grid_nc(&path).unwrap();

    let source = load_source(&path, Some("obj")).unwrap();
    let dataset = PointDataset::new(source, DatasetOptions::default().fill_na_value(-1.0)).unwrap();

    assert_eq!(dataset.len(), 6);
    assert_eq!(dataset.objective(), &[0.0, 1.0, 2.0, 3.0, -1.0, 5.0]);
    assert_eq!(
        dataset.gof_dataframe().numeric("lon").unwrap(),
        &[-10.0, 0.0, 10.0, -10.0, 0.0, 10.0]
    );
}

fn app(dataset: PointDataset, outline: Option<Outline>) -> axum::Router {
    let state = AppState::new_shared(Config::default(), dataset, outline, "points.json");
    geogof::server::build_router(state)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_layer_route() {
    let (status, content_type, body) = get(app(europe_dataset(), None), "/layer").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/geo+json"));

    let geojson: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(geojson["type"], "FeatureCollection");
    assert_eq!(geojson["layer"]["name"], "Release");
    assert_eq!(geojson["layer"]["style"]["dashArray"], "2");
    assert_eq!(geojson["layer"]["hover_style"]["fillColor"], "red");
    assert_eq!(geojson["features"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_layer_route_empty_dataset() {
    let dataset = PointDataset::from_source(table(vec![], vec![], vec![])).unwrap();
    let (status, _, body) = get(app(dataset, None), "/layer").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("zero rows"));
    assert!(error["request_id"].is_string());
}

#[tokio::test]
async fn test_plot_route() {
    let outline = Outline::from_geojson_str(test_data::FRANCE_OUTLINE).unwrap();
    let router = app(europe_dataset(), Some(outline));

    let (status, content_type, body) =
        get(router.clone(), "/plot?width=200&height=150&projection=laea:2,46").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    let decoded = image_utils::load_image_from_bytes(&body).unwrap();
    assert_eq!(
        image::GenericImageView::dimensions(&decoded),
        (200, 150)
    );

    let (status, _, _) = get(router.clone(), "/plot?projection=mercator").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = get(router, "/plot?width=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_index_and_heartbeat_routes() {
    let router = app(europe_dataset(), None);

    let (status, content_type, body) = get(router.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(String::from_utf8(body).unwrap().contains("leaflet"));

    let (status, _, body) = get(router, "/heartbeat").await;
    assert_eq!(status, StatusCode::OK);
    let heartbeat: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(heartbeat["status"], "healthy");
    assert_eq!(heartbeat["dataset"]["row_count"], 5);
    assert_eq!(heartbeat["dataset"]["obj_name"], "obj");
}

#[test]
fn test_shared_table_between_frame_and_geometry() {
    let dataset = europe_dataset();
    let shared = dataset.gdf().table_shared();
    assert!(std::ptr::eq(dataset.gof_dataframe(), Arc::as_ptr(&shared)));
    assert!(std::ptr::eq(dataset.gof_dataframe(), dataset.gdf().table()));
}
