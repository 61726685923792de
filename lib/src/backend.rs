//! The only side-effecting boundary of the crate.
//!
//! Everything that touches device files goes through [`Backend`], so the
//! controller can run against [`Sysfs`] on real hardware or against an
//! in-memory fake in tests.

use std::io;
use std::path::Path;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use zbus::Connection;

use crate::config::WriteMethod;
use crate::consts::*;
use crate::errors::*;
use crate::util::read_file;

make_log_macro!(debug, "backend");

/// File access needed to inspect and drive a brightness device.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Contents of `path` with trailing whitespace removed.
    async fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Replace the contents of an existing file. Never creates files.
    async fn write_file(&self, path: &Path, contents: &str) -> io::Result<()>;

    async fn is_dir(&self, path: &Path) -> bool;

    async fn is_file(&self, path: &Path) -> bool;

    async fn path_exists(&self, path: &Path) -> bool {
        self.is_dir(path).await || self.is_file(path).await
    }
}

/// Plain filesystem access. Writes need whatever privilege the process already has.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sysfs;

impl Backend for Sysfs {
    async fn read_file(&self, path: &Path) -> io::Result<String> {
        read_file(path).await
    }

    async fn write_file(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .await?;
        file.write_all(contents.as_bytes()).await?;
        file.flush().await
    }

    async fn is_dir(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    async fn is_file(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }
}

#[zbus::dbus_proxy(
    interface = "org.freedesktop.login1.Session",
    default_service = "org.freedesktop.login1",
    default_path = "/org/freedesktop/login1/session/auto"
)]
trait Session {
    fn set_brightness(&self, subsystem: &str, name: &str, brightness: u32) -> zbus::Result<()>;
}

/// Writes brightness through the logind session, which lets unprivileged
/// users of the active seat change backlights. Falls back to [`Sysfs`].
#[derive(Clone)]
pub struct Logind {
    dbus_proxy: SessionProxy<'static>,
}

impl Logind {
    pub async fn new() -> Result<Self> {
        let dbus_conn = Connection::system()
            .await
            .error("Failed to open DBus system connection")?;

        Ok(Self {
            dbus_proxy: SessionProxy::new(&dbus_conn)
                .await
                .error("Failed to create SessionProxy")?,
        })
    }

    async fn set_brightness(&self, path: &Path, contents: &str) -> Result<()> {
        let (subsystem, name) =
            session_target(path).ok_or_else(|| T2brightError::Other("not a class device".into()))?;
        let value: u32 = contents
            .parse()
            .error("Brightness value is not an integer")?;
        debug!("SetBrightness({subsystem}, {name}, {value})");
        self.dbus_proxy
            .set_brightness(subsystem, name, value)
            .await
            .map_err(T2brightError::DBus)
    }
}

impl Backend for Logind {
    async fn read_file(&self, path: &Path) -> io::Result<String> {
        Sysfs.read_file(path).await
    }

    async fn write_file(&self, path: &Path, contents: &str) -> io::Result<()> {
        match self.set_brightness(path, contents).await {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!("{e}");
                // Fall back to writing to sysfs brightness file
                Sysfs.write_file(path, contents).await
            }
        }
    }

    async fn is_dir(&self, path: &Path) -> bool {
        Sysfs.is_dir(path).await
    }

    async fn is_file(&self, path: &Path) -> bool {
        Sysfs.is_file(path).await
    }
}

/// Split `/sys/class/<subsystem>/<name>/brightness` into `(subsystem, name)`.
fn session_target(path: &Path) -> Option<(&str, &str)> {
    if path.file_name()? != FILE_BRIGHTNESS_WRITE {
        return None;
    }
    let device_dir = path.parent()?;
    let name = device_dir.file_name()?.to_str()?;
    let subsystem = device_dir.parent()?.file_name()?.to_str()?;
    Some((subsystem, name))
}

/// The backend picked by the `write_method` config key.
#[derive(Clone)]
pub enum SystemBackend {
    Sysfs(Sysfs),
    Logind(Logind),
}

impl SystemBackend {
    pub async fn new(method: WriteMethod) -> Result<Self> {
        Ok(match method {
            WriteMethod::Sysfs => Self::Sysfs(Sysfs),
            WriteMethod::Logind => Self::Logind(Logind::new().await?),
        })
    }
}

impl Backend for SystemBackend {
    async fn read_file(&self, path: &Path) -> io::Result<String> {
        match self {
            Self::Sysfs(b) => b.read_file(path).await,
            Self::Logind(b) => b.read_file(path).await,
        }
    }

    async fn write_file(&self, path: &Path, contents: &str) -> io::Result<()> {
        match self {
            Self::Sysfs(b) => b.write_file(path, contents).await,
            Self::Logind(b) => b.write_file(path, contents).await,
        }
    }

    async fn is_dir(&self, path: &Path) -> bool {
        match self {
            Self::Sysfs(b) => b.is_dir(path).await,
            Self::Logind(b) => b.is_dir(path).await,
        }
    }

    async fn is_file(&self, path: &Path) -> bool {
        match self {
            Self::Sysfs(b) => b.is_file(path).await,
            Self::Logind(b) => b.is_file(path).await,
        }
    }
}

#[cfg(any(test, feature = "fake"))]
pub use fake::MemoryBackend;

#[cfg(any(test, feature = "fake"))]
#[cfg_attr(docsrs, doc(cfg(feature = "fake")))]
mod fake {
    use std::collections::{HashMap, HashSet};
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    use super::Backend;

    #[derive(Default)]
    struct State {
        dirs: HashSet<PathBuf>,
        files: HashMap<PathBuf, String>,
        read_only: HashSet<PathBuf>,
    }

    /// An in-memory [`Backend`]. Clones share the same files.
    #[derive(Clone, Default)]
    pub struct MemoryBackend {
        state: Arc<Mutex<State>>,
    }

    impl MemoryBackend {
        pub fn new() -> Self {
            Self::default()
        }

        fn state(&self) -> MutexGuard<'_, State> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Add a directory and all of its ancestors.
        pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
            {
                let mut state = self.state();
                for dir in path.as_ref().ancestors() {
                    state.dirs.insert(dir.to_path_buf());
                }
            }
            self
        }

        /// Add a file, creating its parent directories.
        pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
            let path = path.as_ref();
            let this = match path.parent() {
                Some(parent) => self.with_dir(parent),
                None => self,
            };
            this.state()
                .files
                .insert(path.to_path_buf(), contents.into());
            this
        }

        /// Make writes to `path` fail with `PermissionDenied`.
        pub fn deny_writes(self, path: impl AsRef<Path>) -> Self {
            self.state().read_only.insert(path.as_ref().to_path_buf());
            self
        }

        /// Current contents of a file, if it exists.
        pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
            self.state().files.get(path.as_ref()).cloned()
        }
    }

    impl Backend for MemoryBackend {
        async fn read_file(&self, path: &Path) -> io::Result<String> {
            self.state()
                .files
                .get(path)
                .map(|contents| contents.trim_end().to_string())
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }

        async fn write_file(&self, path: &Path, contents: &str) -> io::Result<()> {
            let mut state = self.state();
            if state.read_only.contains(path) {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            match state.files.get_mut(path) {
                Some(file) => {
                    *file = contents.to_string();
                    Ok(())
                }
                None => Err(io::Error::from(io::ErrorKind::NotFound)),
            }
        }

        async fn is_dir(&self, path: &Path) -> bool {
            self.state().dirs.contains(path)
        }

        async fn is_file(&self, path: &Path) -> bool {
            self.state().files.contains_key(path)
        }
    }
}
