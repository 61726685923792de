//! Conversions between device units, percentages and touch bar levels.
//!
//! Both directions truncate, so `to_raw(to_percentage(raw, max), max)` may
//! land below `raw`. Brightness values must match what earlier releases of
//! the tools wrote, so this is not rounded away.

use std::fmt;

/// `floor(raw * 100 / max)`, or 0 for a device reporting `max == 0`.
pub fn to_percentage(raw: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    (u64::from(raw) * 100 / u64::from(max)) as u32
}

/// `floor(max * percentage / 100)`.
pub fn to_raw(percentage: u32, max: u32) -> u32 {
    (u64::from(max) * u64::from(percentage) / 100) as u32
}

/// The touch bar's native brightness register.
///
/// These are not points on a linear scale and never derive from `max_brightness`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BrightnessLevel {
    Off = 0,
    Dim = 1,
    Bright = 2,
}

impl BrightnessLevel {
    /// 0 is off, 1..=49 dim, anything higher bright.
    pub fn quantize(percentage: u32) -> Self {
        match percentage {
            0 => Self::Off,
            1..=49 => Self::Dim,
            _ => Self::Bright,
        }
    }

    /// Interpret a register value read back from the device.
    /// Values past the top level are reported as bright.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Off,
            1 => Self::Dim,
            _ => Self::Bright,
        }
    }

    pub fn raw(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Dim => "Dim",
            Self::Bright => "Bright",
        }
    }
}

impl fmt::Display for BrightnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.raw(), self.label())
    }
}
