//! Interactive layer endpoint handler.
//!
//! Returns the dataset as a styled GeoJSON FeatureCollection ready for a
//! web map.

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::error_response;
use crate::error::Result;
use crate::logging::generate_request_id;
use crate::state::AppState;

/// Handle GET /layer requests
pub async fn layer_handler(State(state): State<Arc<AppState>>) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    match layer_body(&state) {
        Ok(body) => {
            info!(
                endpoint = "/layer",
                request_id = %request_id,
                rows = state.dataset.len(),
                bytes = body.len(),
                duration_us = start_time.elapsed().as_micros() as u64,
                "Layer request successful"
            );

            (
                StatusCode::OK,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/geo+json"),
                )],
                body,
            )
                .into_response()
        }
        Err(error) => error_response(error, "/layer", &request_id, None),
    }
}

fn layer_body(state: &AppState) -> Result<Vec<u8>> {
    let layer = state.dataset.interactive_layer()?;
    let geojson = layer.to_geojson()?;
    Ok(serde_json::to_vec(&geojson)?)
}
