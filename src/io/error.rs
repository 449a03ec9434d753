//! Error types for pipeline operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all pipeline operations
///
/// Per-tile problems (undecodable images, corrupt table rows) are recorded as
/// data instead of being raised; only conditions that stop a stage end up here.
#[derive(Debug)]
pub enum MapError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// The input directory holds no recognized tile images
    EmptyInputSet {
        /// Directory that was searched
        path: PathBuf,
    },

    /// Reading or writing the record table failed
    RecordStore {
        /// Path of the table
        path: PathBuf,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// Configuration parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl MapError {
    /// Whether this error only signals that there was nothing to process
    pub const fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInputSet { .. })
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::EmptyInputSet { path } => {
                write!(f, "No tile images found in '{}'", path.display())
            }
            Self::RecordStore { path, source } => {
                write!(f, "Record table error on '{}': {source}", path.display())
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::RecordStore { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::EmptyInputSet { .. } | Self::InvalidParameter { .. } => None,
        }
    }
}

/// Convenience type alias for pipeline results
pub type Result<T> = std::result::Result<T, MapError>;

impl From<image::ImageError> for MapError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<csv::Error> for MapError {
    fn from(err: csv::Error) -> Self {
        Self::RecordStore {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MapError {
    MapError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error for the given path and operation
pub fn io_error(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> MapError {
    MapError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
