//! HTTP request handlers for the geogof map server.
//!
//! This module contains all the endpoint handlers for the web server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::GeogofError;
use crate::logging::log_request_error;

pub mod heartbeat;
pub mod index;
pub mod layer;
pub mod plot;

pub use heartbeat::heartbeat_handler;
pub use index::index_handler;
pub use layer::layer_handler;
pub use plot::plot_handler;

/// Log a failed request and turn the error into a JSON response.
///
/// Client errors map to 400, everything else to 500.
pub(crate) fn error_response(
    error: GeogofError,
    endpoint: &str,
    request_id: &str,
    params: Option<&str>,
) -> Response {
    log_request_error(&error, endpoint, request_id, params);

    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (
        status,
        Json(serde_json::json!({
            "error": error.to_string(),
            "request_id": request_id
        })),
    )
        .into_response()
}
