//! Static plot endpoint handler.
//!
//! Returns a PNG rendering of the dataset's points, drawn over the outline
//! when the server was started with one.

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::error_response;
use crate::error::Result;
use crate::logging::generate_request_id;
use crate::projection::Projection;
use crate::state::AppState;

/// Query parameters for the plot endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlotQuery {
    /// Image width in pixels
    pub width: Option<u32>,
    /// Image height in pixels
    pub height: Option<u32>,
    /// Projection, overriding the configured one
    pub projection: Option<String>,
}

/// Handle GET /plot requests
pub async fn plot_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlotQuery>,
) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    match render_png(&state, &params) {
        Ok(png) => {
            info!(
                endpoint = "/plot",
                request_id = %request_id,
                width = params.width.unwrap_or(state.config.render.plot.width),
                height = params.height.unwrap_or(state.config.render.plot.height),
                projection = params.projection.as_deref().unwrap_or("default"),
                bytes = png.len(),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Plot generation successful"
            );

            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, HeaderValue::from_static("image/png"))],
                png,
            )
                .into_response()
        }
        Err(error) => error_response(
            error,
            "/plot",
            &request_id,
            Some(&format!("{:?}", params)),
        ),
    }
}

fn render_png(state: &AppState, params: &PlotQuery) -> Result<Vec<u8>> {
    let mut options = state.config.render.plot.clone();
    if let Some(width) = params.width {
        options.width = width;
    }
    if let Some(height) = params.height {
        options.height = height;
    }
    options.validate()?;

    let projection = match params.projection.as_deref() {
        Some(s) => Some(Projection::parse_projection(s)?),
        None => state.configured_projection()?,
    };
    debug!(?projection, "Resolved plot projection");

    let (axes, _geo_axes) =
        state
            .dataset
            .pointplot_with(state.outline.as_ref(), projection, &options)?;
    axes.to_png()
}
