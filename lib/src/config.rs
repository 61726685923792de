use crate::consts::*;
use crate::errors::*;
use crate::util::*;

use std::path::PathBuf;

use serde::Deserialize;
use serde::Deserializer;
use smart_default::SmartDefault;

make_log_macro!(debug, "config");

/// How a brightness request is applied to the device register.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// 0-100, scaled to `[0, max_brightness]`.
    Percentage,
    /// Written verbatim, bounded by `max_brightness`.
    Raw,
    /// 0-100, quantized to the touch bar's three levels.
    Stepped,
}

/// How the privileged write reaches the device.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WriteMethod {
    #[default]
    Sysfs,
    Logind,
}

/// The device classes each front-end drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Touchbar,
    Keyboard,
    Display,
}

impl DeviceClass {
    /// Used in "No supported ... found." messages.
    pub fn description(self) -> &'static str {
        match self {
            Self::Touchbar => "touch bar backlight",
            Self::Keyboard => "keyboard backlight",
            Self::Display => "display backlight",
        }
    }

    pub fn default_paths(self) -> Vec<PathBuf> {
        let paths = match self {
            Self::Touchbar => TOUCHBAR_PATHS,
            Self::Keyboard => KEYBOARD_PATHS,
            Self::Display => DISPLAY_PATHS,
        };
        paths.iter().map(PathBuf::from).collect()
    }

    pub fn default_policy(self) -> Policy {
        match self {
            Self::Touchbar => Policy::Stepped,
            Self::Keyboard | Self::Display => Policy::Percentage,
        }
    }
}

/// Per-device overrides; anything left out falls back to the class defaults.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Candidate device directories, tried in order.
    #[serde(deserialize_with = "deserialize_paths")]
    pub paths: Option<Vec<PathBuf>>,

    /// File to read the current brightness from, instead of `actual_brightness`.
    #[serde(deserialize_with = "deserialize_source")]
    pub source: Option<String>,

    pub policy: Option<Policy>,
}

fn deserialize_paths<'de, D>(deserializer: D) -> Result<Option<Vec<PathBuf>>, D::Error>
where
    D: Deserializer<'de>,
{
    let paths: Vec<PathBuf> = Deserialize::deserialize(deserializer)?;
    debug!("{:?}", paths);

    if paths.is_empty() {
        return Err(serde::de::Error::invalid_length(
            0,
            &"at least one device path",
        ));
    }

    Ok(Some(paths))
}

fn deserialize_source<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let source: String = Deserialize::deserialize(deserializer)?;
    debug!("{:?}", source);

    if source.is_empty() || source.contains('/') {
        return Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&source),
            &"a file name inside the device directory",
        ));
    }

    Ok(Some(source))
}

#[derive(Deserialize, Clone, Debug, SmartDefault, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct T2brightConfig {
    /// Color the messages written to the terminal.
    #[default(true)]
    pub color: bool,

    pub write_method: WriteMethod,

    touchbar: DeviceConfig,
    keyboard: DeviceConfig,
    display: DeviceConfig,
}

impl T2brightConfig {
    /// Load the config file if there is one, defaults otherwise.
    pub async fn new() -> Result<Self> {
        if let Some(config_path) = find_file(CONFIG_FILE, Some("toml")) {
            debug!("loading {}", config_path.display());
            deserialize_toml_file(config_path).await
        } else {
            Ok(T2brightConfig::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        deserialize_toml_str(contents)
            .map_err(|message| T2brightError::Config(format!("Invalid config{message}")))
    }

    pub fn get_device_config(&self, class: DeviceClass) -> &DeviceConfig {
        match class {
            DeviceClass::Touchbar => &self.touchbar,
            DeviceClass::Keyboard => &self.keyboard,
            DeviceClass::Display => &self.display,
        }
    }

    pub fn candidate_paths(&self, class: DeviceClass) -> Vec<PathBuf> {
        self.get_device_config(class)
            .paths
            .clone()
            .unwrap_or_else(|| class.default_paths())
    }

    pub fn source(&self, class: DeviceClass) -> Option<&str> {
        self.get_device_config(class).source.as_deref()
    }

    pub fn policy(&self, class: DeviceClass) -> Policy {
        self.get_device_config(class)
            .policy
            .unwrap_or_else(|| class.default_policy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_class_defaults() {
        let config = T2brightConfig::from_toml("").unwrap();
        assert_eq!(config, T2brightConfig::default());
        assert!(config.color);
        assert_eq!(config.write_method, WriteMethod::Sysfs);
        assert_eq!(config.policy(DeviceClass::Touchbar), Policy::Stepped);
        assert_eq!(config.policy(DeviceClass::Keyboard), Policy::Percentage);
        assert_eq!(
            config.candidate_paths(DeviceClass::Keyboard),
            vec![PathBuf::from("/sys/class/leds/apple::kbd_backlight")]
        );
        assert_eq!(config.source(DeviceClass::Display), None);
    }

    #[test]
    fn device_tables_override_defaults() {
        let config = T2brightConfig::from_toml(
            r#"
            color = false
            write_method = "logind"

            [display]
            paths = ["/sys/class/backlight/gmux_backlight"]
            source = "brightness"
            policy = "raw"
            "#,
        )
        .unwrap();

        assert!(!config.color);
        assert_eq!(config.write_method, WriteMethod::Logind);
        assert_eq!(config.policy(DeviceClass::Display), Policy::Raw);
        assert_eq!(config.source(DeviceClass::Display), Some("brightness"));
        assert_eq!(
            config.candidate_paths(DeviceClass::Display),
            vec![PathBuf::from("/sys/class/backlight/gmux_backlight")]
        );
        // untouched tables keep their defaults
        assert_eq!(config.policy(DeviceClass::Touchbar), Policy::Stepped);
    }

    #[test]
    fn rejects_bad_values() {
        for bad in [
            "[keyboard]\npaths = []",
            "[keyboard]\nsource = \"../brightness\"",
            "[keyboard]\npolicy = \"fade\"",
            "brightness = 3",
        ] {
            let err = T2brightConfig::from_toml(bad).unwrap_err();
            assert!(matches!(err, T2brightError::Config(_)), "{bad}: {err}");
        }
    }
}
