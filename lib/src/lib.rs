#![warn(clippy::match_same_arms)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::unnecessary_wraps)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Backlight control for the touch bar, keyboard and display of T2 MacBooks.
//!
//! Devices are plain sysfs class directories. A front-end picks a
//! [`DeviceClass`], [`T2brightBuilder`] finds and opens the device, and the
//! resulting [`T2bright`] applies one request with the configured [`Policy`].

#[macro_use]
mod util;
mod backend;
mod config;
mod consts;
mod controller;
mod convert;
mod device;
mod errors;
mod frontend;
mod locator;
mod report;
mod source;
mod validate;

#[cfg(any(test, feature = "fake"))]
#[cfg_attr(docsrs, doc(cfg(feature = "fake")))]
pub use crate::backend::MemoryBackend;
pub use crate::backend::{Backend, Logind, Sysfs, SystemBackend};
pub use crate::config::{DeviceClass, DeviceConfig, Policy, T2brightConfig, WriteMethod};
pub use crate::controller::{BrightnessController, BrightnessRequest, Transition};
pub use crate::convert::{BrightnessLevel, to_percentage, to_raw};
pub use crate::device::Device;
pub use crate::errors::{ExitCategory, T2brightError};
pub use crate::frontend::{Command, run};
pub use crate::locator::locate;
pub use crate::report::{ExitCodes, Palette, Presentation, Reporter};
pub use crate::source::resolve_source;
pub use crate::validate::Validator;

use crate::errors::*;

make_log_macro!(debug, "t2bright");

/// Used to construct [`T2bright`]
pub struct T2brightBuilder {
    class: DeviceClass,
    config: Option<T2brightConfig>,
}

impl T2brightBuilder {
    /// Create a new [`T2brightBuilder`] for one class of device.
    pub fn new(class: DeviceClass) -> Self {
        Self {
            class,
            config: None,
        }
    }

    /// Defaults to [`T2brightConfig::new()`].
    pub fn with_config(mut self, config: T2brightConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Locate and open the device. Fails if none of the candidates exist.
    pub async fn build<B: Backend>(self, backend: &B) -> Result<T2bright<'_, B>> {
        let config = match self.config {
            Some(config) => config,
            None => T2brightConfig::new().await?,
        };

        let candidates = config.candidate_paths(self.class);
        let path = locate(backend, &candidates, self.class.description()).await?;
        let device = Device::open(backend, path, config.source(self.class)).await?;
        let policy = config.policy(self.class);
        debug!("{:?} with {:?} policy", device.path, policy);

        Ok(T2bright {
            class: self.class,
            policy,
            controller: BrightnessController::new(backend, device)?,
        })
    }
}

/// An opened device and the policy its requests are applied with.
pub struct T2bright<'a, B> {
    class: DeviceClass,
    policy: Policy,
    controller: BrightnessController<'a, B>,
}

impl<'a, B: Backend> T2bright<'a, B> {
    pub fn class(&self) -> DeviceClass {
        self.class
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn controller(&self) -> &BrightnessController<'a, B> {
        &self.controller
    }

    /// Apply `input` with the configured policy.
    pub async fn set_brightness(&self, input: &str) -> Result<Transition> {
        self.controller
            .apply(&BrightnessRequest::new(input, self.policy))
            .await
    }

    /// Current brightness as a percentage (0..=100).
    pub async fn get_brightness(&self) -> Result<u32> {
        self.controller.query().await
    }
}
