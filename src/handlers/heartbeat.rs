//! Heartbeat endpoint handler.
//!
//! Returns server status information, including uptime, memory usage, and dataset information.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

use crate::state::AppState;

/// Server ID, unique per process
static SERVER_ID: once_cell::sync::Lazy<String> =
    once_cell::sync::Lazy::new(|| Uuid::new_v4().to_string());

/// Server start time
static START_TIME: once_cell::sync::Lazy<SystemTime> = once_cell::sync::Lazy::new(SystemTime::now);

/// Heartbeat response structure
#[derive(Debug, Serialize)]
pub struct HeartbeatResponse {
    /// Server ID (unique per instance)
    pub server_id: String,
    /// Current timestamp (ISO 8601 format)
    pub timestamp: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Process memory usage in bytes
    pub memory_usage_bytes: Option<u64>,
    /// Dataset information
    pub dataset: DatasetInfo,
    /// Server status
    pub status: String,
}

/// Dataset information structure
#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    /// Dataset file path
    pub file_path: String,
    /// Number of points
    pub row_count: usize,
    /// Column names in table order
    pub columns: Vec<String>,
    /// Latitude column
    pub lat_name: String,
    /// Longitude column
    pub lon_name: String,
    /// Objective column
    pub obj_name: String,
    /// Minimum and maximum of the conditioned objective
    pub objective_range: Option<(f64, f64)>,
    /// Coordinate reference system of the geometry
    pub crs: String,
    /// Whether an outline was loaded for `/plot`
    pub has_outline: bool,
    /// Approximate memory usage for dataset in bytes
    pub data_memory_bytes: usize,
}

impl DatasetInfo {
    fn from_state(state: &AppState) -> Self {
        let dataset = &state.dataset;
        Self {
            file_path: state.source_path.display().to_string(),
            row_count: dataset.len(),
            columns: dataset
                .gof_dataframe()
                .column_names()
                .into_iter()
                .map(String::from)
                .collect(),
            lat_name: dataset.lat_name().to_string(),
            lon_name: dataset.lon_name().to_string(),
            obj_name: dataset.obj_name().to_string(),
            objective_range: dataset.objective_range(),
            crs: dataset.gdf().crs().to_string(),
            has_outline: state.outline.is_some(),
            data_memory_bytes: state.data_memory_bytes(),
        }
    }
}

/// Handle GET /heartbeat requests
pub async fn heartbeat_handler(State(state): State<Arc<AppState>>) -> Json<HeartbeatResponse> {
    let now = SystemTime::now();
    let timestamp = chrono::DateTime::<chrono::Utc>::from(now)
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let uptime = now
        .duration_since(*START_TIME)
        .unwrap_or(Duration::from_secs(0));

    Json(HeartbeatResponse {
        server_id: SERVER_ID.clone(),
        timestamp,
        uptime_seconds: uptime.as_secs(),
        memory_usage_bytes: get_memory_usage(),
        dataset: DatasetInfo::from_state(&state),
        status: "healthy".to_string(),
    })
}

/// Get current process memory usage (platform-dependent)
fn get_memory_usage() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        // RSS is the second field of /proc/self/statm, in pages
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let pages = statm.split_whitespace().nth(1)?.parse::<u64>().ok()?;
        Some(pages * 4096)
    }

    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}
