use regex::Regex;

use crate::consts::*;
use crate::errors::*;

make_log_macro!(debug, "validate");

const PERCENT_EXAMPLE: &str = "50 or 50%";
const RAW_EXAMPLE: &str = "128";

/// Checks user input before anything touches the device.
#[derive(Clone, Debug)]
pub struct Validator {
    percentage: Regex,
    raw: Regex,
}

impl Validator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            percentage: Regex::new(r"^([0-9]+)%?$")?,
            raw: Regex::new(r"^[0-9]+$")?,
        })
    }

    /// Accepts `0..=100`, optionally followed by a single `%`.
    pub fn percentage(&self, input: &str) -> Result<u32> {
        let digits = self
            .percentage
            .captures(input)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| T2brightError::InvalidInput {
                input: input.to_string(),
                example: PERCENT_EXAMPLE,
            })?
            .as_str();

        match u32::try_from(parse_saturating(digits)) {
            Ok(value) if PERCENT_RANGE.contains(&value) => {
                debug!("{input:?} -> {value}%");
                Ok(value)
            }
            _ => Err(T2brightError::PercentageOutOfRange {
                input: input.to_string(),
            }),
        }
    }

    /// Accepts `0..=max`.
    pub fn raw(&self, input: &str, max: u32) -> Result<u32> {
        let value = self.raw_number(input)?;
        self.raw_in_range(input, value, max)
    }

    /// The pattern half of [`Validator::raw`]; needs no device access.
    pub fn raw_number(&self, input: &str) -> Result<u64> {
        if !self.raw.is_match(input) {
            return Err(T2brightError::InvalidInput {
                input: input.to_string(),
                example: RAW_EXAMPLE,
            });
        }
        Ok(parse_saturating(input))
    }

    /// The range half of [`Validator::raw`], once the device maximum is known.
    pub fn raw_in_range(&self, input: &str, value: u64, max: u32) -> Result<u32> {
        match u32::try_from(value) {
            Ok(value) if value <= max => {
                debug!("{input:?} -> {value} (max {max})");
                Ok(value)
            }
            _ => Err(T2brightError::RawOutOfRange {
                input: input.to_string(),
                max,
            }),
        }
    }
}

/// Digit strings too long for any integer type are still just "too big".
fn parse_saturating(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}
