use std::path::{Path, PathBuf};

use crate::backend::Backend;
use crate::errors::*;

make_log_macro!(debug, "locator");

/// First candidate that exists as a directory.
///
/// Earlier entries win, so callers list device names newest kernel first.
/// `device` names the hardware in the "No supported ... found." error.
pub async fn locate<B, P>(backend: &B, candidates: &[P], device: &str) -> Result<PathBuf>
where
    B: Backend,
    P: AsRef<Path>,
{
    for candidate in candidates {
        let candidate = candidate.as_ref();
        if backend.is_dir(candidate).await {
            debug!("using {}", candidate.display());
            return Ok(candidate.to_path_buf());
        }
        debug!("{} does not exist", candidate.display());
    }

    Err(T2brightError::DeviceNotFound {
        device: device.to_string(),
    })
}
