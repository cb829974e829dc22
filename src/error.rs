//! Error types for geogof.
//!
//! A single error enum covers every failure the library and the binary can
//! surface. All failures are terminal for the call that raised them.

use thiserror::Error;

/// The main error type for geogof operations.
#[derive(Error, Debug)]
pub enum GeogofError {
    /// A required column is absent from the input table
    #[error("Column {column} not found in the table")]
    MissingColumn { column: String },

    /// A column exists but cannot be used the way it was requested
    #[error("Invalid column type for {column}: {message}")]
    InvalidColumnType { column: String, message: String },

    /// An operation needs at least one row
    #[error("Empty dataset: {message}")]
    EmptyDataset { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Color ramp construction errors
    #[error("Color ramp error: {message}")]
    ColorRamp { message: String },

    /// Projection errors
    #[error("Projection error: {message}")]
    Projection { message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Array shape errors
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// Server errors
    #[error("Server error: {message}")]
    Server { message: String },
}

impl GeogofError {
    /// Whether the error was caused by the caller's input rather than by the
    /// environment or the process itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GeogofError::MissingColumn { .. }
                | GeogofError::InvalidColumnType { .. }
                | GeogofError::EmptyDataset { .. }
                | GeogofError::InvalidParameter { .. }
                | GeogofError::Projection { .. }
        )
    }
}

/// Convenience type alias for Results with GeogofError
pub type Result<T> = std::result::Result<T, GeogofError>;
