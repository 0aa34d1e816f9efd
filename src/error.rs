use std::io;

use thiserror::Error;

/// A render parameter was rejected before any sampling took place.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ParameterError {
    #[error("max_iter must be positive, got {0}")]
    InvalidMaxIter(i64),

    #[error("esc_radius must be greater than 1 and at most 1e150, got {0}")]
    InvalidEscapeRadius(f64),

    #[error("diameter must be a finite positive value, got {0}")]
    InvalidDiameter(f64),
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// The render was abandoned between rows; the partial raster was discarded.
    #[error("render cancelled")]
    Cancelled,
}

#[derive(Error, Debug)]
pub enum PointsError {
    #[error("failed to read points file: {0}")]
    Io(#[from] io::Error),

    #[error("malformed points file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("points file contains no points")]
    Empty,
}
