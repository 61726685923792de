use std::path::Path;

use crate::backend::Backend;
use crate::consts::*;

make_log_macro!(debug, "source");

/// Pick the file that reflects the device's current brightness.
///
/// A `preferred` name wins if it exists, then `actual_brightness`, then
/// `brightness`. Never fails: a missing file surfaces when it is read.
pub async fn resolve_source<B: Backend>(
    backend: &B,
    device_path: &Path,
    preferred: Option<&str>,
) -> String {
    if let Some(name) = preferred {
        if backend.is_file(&device_path.join(name)).await {
            return name.to_string();
        }
        debug!("preferred source {name} missing in {}", device_path.display());
    }

    if backend.is_file(&device_path.join(FILE_BRIGHTNESS)).await {
        FILE_BRIGHTNESS.to_string()
    } else {
        FILE_BRIGHTNESS_WRITE.to_string()
    }
}
