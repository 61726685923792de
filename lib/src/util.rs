use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tokio::io::AsyncReadExt as _;

use crate::consts::*;
use crate::errors::*;

macro_rules! make_log_macro {
    (@wdoll $macro_name:ident, $block_name:literal, ($dol:tt)) => {
        #[allow(dead_code)]
        macro_rules! $macro_name {
            ($dol($args:tt)+) => {
                ::log::$macro_name!(target: $block_name, $dol($args)+);
            };
        }
    };
    ($macro_name:ident, $block_name:literal) => {
        make_log_macro!(@wdoll $macro_name, $block_name, ($));
    };
}

/// Look for `<root>/t2bright/<name>[.<extension>]`, trying the user's config
/// dir before the system one.
pub fn find_file(name: &str, extension: Option<&str>) -> Option<PathBuf> {
    let file = match extension {
        Some(ext) => format!("{name}.{ext}"),
        None => name.to_string(),
    };

    dirs::config_dir()
        .into_iter()
        .chain(std::iter::once(PathBuf::from(SYSTEM_CONFIG_ROOT)))
        .map(|root| root.join(CONFIG_DIR).join(&file))
        .find(|path| path.is_file())
}

pub async fn deserialize_toml_file<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let contents = read_file(path)
        .await
        .error("Failed to read config file")?;

    deserialize_toml_str(&contents).map_err(|message| {
        T2brightError::Config(format!(
            "Failed to deserialize TOML file {}{}",
            path.display(),
            message
        ))
    })
}

/// Parse TOML, rendering errors as `" at line N: message"`.
pub(crate) fn deserialize_toml_str<T: DeserializeOwned>(
    contents: &str,
) -> std::result::Result<T, String> {
    toml::from_str(contents).map_err(|err| {
        #[allow(deprecated)]
        let location_msg = err
            .span()
            .map(|span| {
                let line = 1 + contents.as_bytes()[..(span.start)]
                    .iter()
                    .filter(|b| **b == b'\n')
                    .count();
                format!(" at line {line}")
            })
            .unwrap_or_default();
        format!("{location_msg}: {}", err.message())
    })
}

pub async fn read_file(path: impl AsRef<Path>) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut content = String::new();
    file.read_to_string(&mut content).await?;
    Ok(content.trim_end().to_string())
}
