use crate::backend::Backend;
use crate::consts::*;
use crate::errors::*;
use crate::source::resolve_source;

use std::path::{Path, PathBuf};

make_log_macro!(debug, "device");

/// A sysfs brightness device: one directory, a read source and a write target.
///
/// The read source and the write target may be the same file (LEDs) or
/// differ (`actual_brightness` vs `brightness` on backlights).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    pub path: PathBuf,
    pub read_brightness_file: PathBuf,
    write_brightness_file: PathBuf,
    max_brightness_file: PathBuf,
}

impl Device {
    /// Check that `path` is still a device directory and resolve its files.
    pub async fn open<B: Backend>(
        backend: &B,
        path: impl Into<PathBuf>,
        preferred_source: Option<&str>,
    ) -> Result<Self> {
        let path = path.into();
        if !backend.is_dir(&path).await {
            return Err(T2brightError::DevicePathMissing(path));
        }

        let source = resolve_source(backend, &path, preferred_source).await;
        debug!("{}: reading from {source}", path.display());

        Ok(Self {
            read_brightness_file: path.join(source),
            write_brightness_file: path.join(FILE_BRIGHTNESS_WRITE),
            max_brightness_file: path.join(FILE_MAX_BRIGHTNESS),
            path,
        })
    }

    pub fn write_brightness_file(&self) -> &Path {
        &self.write_brightness_file
    }

    /// Read a brightness value from the given path.
    async fn read_brightness_raw<B: Backend>(&self, backend: &B, device_file: &Path) -> Result<u32> {
        let val = backend
            .read_file(device_file)
            .await
            .map_err(|source| T2brightError::DeviceRead {
                path: device_file.to_path_buf(),
                source,
            })?;
        val.trim()
            .parse()
            .map_err(|source| T2brightError::DeviceParse {
                path: device_file.to_path_buf(),
                source,
            })
    }

    pub async fn max_brightness<B: Backend>(&self, backend: &B) -> Result<u32> {
        self.read_brightness_raw(backend, &self.max_brightness_file)
            .await
    }

    /// The current register value, from the resolved read source.
    pub async fn current_raw<B: Backend>(&self, backend: &B) -> Result<u32> {
        self.read_brightness_raw(backend, &self.read_brightness_file)
            .await
    }

    /// Overwrite the control file with `value`. One write, no retries.
    pub async fn write_raw<B: Backend>(&self, backend: &B, value: u32) -> Result<()> {
        debug!("{} <- {value}", self.write_brightness_file.display());
        backend
            .write_file(&self.write_brightness_file, &value.to_string())
            .await
            .map_err(|source| T2brightError::PrivilegedWriteFailed {
                path: self.write_brightness_file.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use futures::executor::block_on;

    const DEV: &str = "/sys/class/backlight/appletb_backlight";

    fn touchbar() -> MemoryBackend {
        MemoryBackend::new()
            .with_file(format!("{DEV}/max_brightness"), "2\n")
            .with_file(format!("{DEV}/actual_brightness"), "1\n")
            .with_file(format!("{DEV}/brightness"), "2\n")
    }

    #[test]
    fn read_and_write_targets_split() {
        let fake = touchbar();
        let device = block_on(Device::open(&fake, DEV, None)).unwrap();

        assert_eq!(
            device.read_brightness_file,
            PathBuf::from(format!("{DEV}/actual_brightness"))
        );
        assert_eq!(
            device.write_brightness_file(),
            Path::new(&format!("{DEV}/brightness"))
        );
        assert_eq!(block_on(device.current_raw(&fake)).unwrap(), 1);
        assert_eq!(block_on(device.max_brightness(&fake)).unwrap(), 2);
    }

    #[test]
    fn writes_go_to_brightness() {
        let fake = touchbar();
        let device = block_on(Device::open(&fake, DEV, None)).unwrap();
        block_on(device.write_raw(&fake, 0)).unwrap();

        assert_eq!(fake.contents(format!("{DEV}/brightness")).as_deref(), Some("0"));
        assert_eq!(
            fake.contents(format!("{DEV}/actual_brightness")).as_deref(),
            Some("1\n")
        );
    }

    #[test]
    fn missing_directory_is_reported() {
        let fake = MemoryBackend::new();
        let err = block_on(Device::open(&fake, DEV, None)).unwrap_err();
        assert!(matches!(err, T2brightError::DevicePathMissing(_)));
        assert_eq!(
            err.to_string(),
            format!("Device path '{DEV}' does not exist.")
        );
    }

    #[test]
    fn unreadable_values_are_errors() {
        let fake = MemoryBackend::new()
            .with_dir(DEV)
            .with_file(format!("{DEV}/brightness"), "bright");
        let device = block_on(Device::open(&fake, DEV, None)).unwrap();

        assert!(matches!(
            block_on(device.max_brightness(&fake)),
            Err(T2brightError::DeviceRead { .. })
        ));
        assert!(matches!(
            block_on(device.current_raw(&fake)),
            Err(T2brightError::DeviceParse { .. })
        ));
    }

    #[test]
    fn denied_write_keeps_os_error() {
        let fake = touchbar().deny_writes(format!("{DEV}/brightness"));
        let device = block_on(Device::open(&fake, DEV, None)).unwrap();
        let err = block_on(device.write_raw(&fake, 1)).unwrap_err();
        match err {
            T2brightError::PrivilegedWriteFailed { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected {other}"),
        }
        assert_eq!(fake.contents(format!("{DEV}/brightness")).as_deref(), Some("2\n"));
    }
}
