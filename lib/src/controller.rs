//! Applies brightness requests to a [`Device`].
//!
//! Every operation has the same shape: validate, read, compute, write once,
//! report. The first failure aborts the operation before the write.
//!
//! Nothing here locks the device. Two invocations racing on the same file
//! both write, and the last one wins. The read-compute-write sequence is not
//! atomic either, so the "old" value in a [`Transition`] can be stale if the
//! hardware or another process changed it in between.

use std::fmt;

use crate::backend::Backend;
use crate::config::Policy;
use crate::convert::*;
use crate::device::Device;
use crate::errors::*;
use crate::validate::Validator;

make_log_macro!(debug, "controller");

/// User input together with how it should be applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrightnessRequest {
    pub input: String,
    pub policy: Policy,
}

impl BrightnessRequest {
    pub fn new(input: impl Into<String>, policy: Policy) -> Self {
        Self {
            input: input.into(),
            policy,
        }
    }
}

/// What a successful write changed, old value first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Percentage {
        old_percentage: u32,
        old_raw: u32,
        new_percentage: u32,
        new_raw: u32,
    },
    Raw {
        old: u32,
        new: u32,
    },
    Stepped {
        old: BrightnessLevel,
        new: BrightnessLevel,
    },
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage {
                old_percentage,
                old_raw,
                new_percentage,
                new_raw,
            } => write!(
                f,
                "{old_percentage}% ({old_raw}) -> {new_percentage}% ({new_raw})"
            ),
            Self::Raw { old, new } => write!(f, "{old} -> {new}"),
            Self::Stepped { old, new } => write!(f, "{old} -> {new}"),
        }
    }
}

pub struct BrightnessController<'a, B> {
    backend: &'a B,
    device: Device,
    validator: Validator,
}

impl<'a, B: Backend> BrightnessController<'a, B> {
    pub fn new(backend: &'a B, device: Device) -> Result<Self> {
        Ok(Self {
            backend,
            device,
            validator: Validator::new()?,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub async fn apply(&self, request: &BrightnessRequest) -> Result<Transition> {
        debug!("{:?} on {}", request, self.device.path.display());
        match request.policy {
            Policy::Percentage => self.apply_percentage(&request.input).await,
            Policy::Raw => self.apply_raw(&request.input).await,
            Policy::Stepped => self.apply_stepped(&request.input).await,
        }
    }

    /// Scale a 0-100 request to `[0, max_brightness]`.
    pub async fn apply_percentage(&self, input: &str) -> Result<Transition> {
        let percentage = self.validator.percentage(input)?;

        let (max, old_raw) = futures::try_join!(
            self.device.max_brightness(self.backend),
            self.device.current_raw(self.backend),
        )?;
        let old_percentage = to_percentage(old_raw, max);
        let new_raw = to_raw(percentage, max);

        self.device.write_raw(self.backend, new_raw).await?;

        Ok(Transition::Percentage {
            old_percentage,
            old_raw,
            new_percentage: percentage,
            new_raw,
        })
    }

    /// Write a register value verbatim, bounded by the device maximum.
    pub async fn apply_raw(&self, input: &str) -> Result<Transition> {
        let value = self.validator.raw_number(input)?;
        let max = self.device.max_brightness(self.backend).await?;
        let new = self.validator.raw_in_range(input, value, max)?;
        let old = self.device.current_raw(self.backend).await?;

        self.device.write_raw(self.backend, new).await?;

        Ok(Transition::Raw { old, new })
    }

    /// Quantize a 0-100 request to the touch bar's levels.
    ///
    /// The register is the level itself, so `max_brightness` is never read.
    pub async fn apply_stepped(&self, input: &str) -> Result<Transition> {
        let new = BrightnessLevel::quantize(self.validator.percentage(input)?);
        let old = BrightnessLevel::from_raw(self.device.current_raw(self.backend).await?);

        self.device.write_raw(self.backend, new.raw()).await?;

        Ok(Transition::Stepped { old, new })
    }

    /// Current brightness as a percentage, whatever the device's policy.
    pub async fn query(&self) -> Result<u32> {
        let (max, raw) = futures::try_join!(
            self.device.max_brightness(self.backend),
            self.device.current_raw(self.backend),
        )?;
        Ok(to_percentage(raw, max))
    }

    /// For the raw usage hint.
    pub async fn max_brightness(&self) -> Result<u32> {
        self.device.max_brightness(self.backend).await
    }
}
