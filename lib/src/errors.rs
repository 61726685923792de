use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type returned from functions that can have our `Error`s.
pub type Result<T, E = T2brightError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum T2brightError {
    #[error("No supported {device} found.")]
    DeviceNotFound { device: String },

    #[error("Device path '{}' does not exist.", .0.display())]
    DevicePathMissing(PathBuf),

    #[error("Invalid brightness value provided. Please use a number (e.g., {example}).")]
    InvalidInput {
        input: String,
        example: &'static str,
    },

    #[error("Percentage cannot be greater than 100.")]
    PercentageOutOfRange { input: String },

    #[error("Maximum brightness is {max}.")]
    RawOutOfRange { input: String, max: u32 },

    #[error("{}", describe_write_failure(.path, .source))]
    PrivilegedWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    DeviceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read value from {}: {source}", .path.display())]
    DeviceParse {
        path: PathBuf,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("{0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    DBus(#[from] zbus::Error),

    #[error("{0}")]
    Other(String),
}

/// How a failure is reflected in the process exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitCategory {
    Failure,
    InvalidUsage,
}

impl T2brightError {
    pub fn category(&self) -> ExitCategory {
        match self {
            Self::InvalidInput { .. } => ExitCategory::InvalidUsage,
            _ => ExitCategory::Failure,
        }
    }
}

fn describe_write_failure(path: &Path, source: &io::Error) -> String {
    match source.kind() {
        io::ErrorKind::NotFound => format!(
            "Brightness file not found in {}.",
            path.parent().unwrap_or(path).display()
        ),
        io::ErrorKind::PermissionDenied => "Permission denied. Please run with sudo.".to_string(),
        _ => format!("Error writing to brightness file: {source}"),
    }
}

/// Attach a message to a foreign error, turning it into [`T2brightError::Other`].
pub trait ResultExt<T> {
    fn error(self, message: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn error(self, message: &str) -> Result<T> {
        self.map_err(|e| T2brightError::Other(format!("{message}: {e}")))
    }
}
