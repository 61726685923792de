use std::io::Write;

use crate::config::{Policy, T2brightConfig};
use crate::controller::Transition;
use crate::errors::*;

/// ANSI sequences wrapped around messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub const ANSI: Self = Self {
        red: "\x1b[0;31m",
        green: "\x1b[0;32m",
        yellow: "\x1b[1;33m",
        reset: "\x1b[0m",
    };

    pub const PLAIN: Self = Self {
        red: "",
        green: "",
        yellow: "",
        reset: "",
    };
}

/// Process exit statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitCodes {
    pub success: u8,
    pub failure: u8,
    pub invalid_usage: u8,
}

impl ExitCodes {
    pub const STANDARD: Self = Self {
        success: 0,
        failure: 1,
        invalid_usage: 2,
    };

    pub fn for_category(&self, category: ExitCategory) -> u8 {
        match category {
            ExitCategory::Failure => self.failure,
            ExitCategory::InvalidUsage => self.invalid_usage,
        }
    }

    pub fn for_error(&self, error: &T2brightError) -> u8 {
        self.for_category(error.category())
    }
}

/// Read-only presentation settings shared by everything that prints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub palette: Palette,
    pub exit_codes: ExitCodes,
}

impl Presentation {
    pub fn new(color: bool) -> Self {
        Self {
            palette: if color { Palette::ANSI } else { Palette::PLAIN },
            exit_codes: ExitCodes::STANDARD,
        }
    }
}

impl From<&T2brightConfig> for Presentation {
    fn from(config: &T2brightConfig) -> Self {
        Self::new(config.color)
    }
}

/// Writes results to `out` and problems to `err`.
///
/// Terminal write failures are ignored: there is nowhere left to report them.
pub struct Reporter<O, E> {
    out: O,
    err: E,
    program: String,
    presentation: Presentation,
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E, program: impl Into<String>, presentation: Presentation) -> Self {
        Self {
            out,
            err,
            program: program.into(),
            presentation,
        }
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn transition(&mut self, transition: &Transition) {
        let p = self.presentation.palette;
        let _ = writeln!(self.out, "{}{transition}{}", p.green, p.reset);
    }

    /// The `--show` output, deliberately uncolored.
    pub fn percentage(&mut self, percentage: u32) {
        let _ = writeln!(self.out, "{percentage}%");
    }

    pub fn current(&mut self, percentage: u32) {
        let p = self.presentation.palette;
        let _ = writeln!(
            self.out,
            "{}Current brightness: {percentage}%{}",
            p.green, p.reset
        );
    }

    pub fn error(&mut self, error: &T2brightError) {
        let p = self.presentation.palette;
        let _ = writeln!(self.err, "{}Error: {error}{}", p.red, p.reset);
    }

    /// `max` fills in the range for raw requests when it could be read.
    pub fn usage(&mut self, policy: Policy, max: Option<u32>) {
        let p = self.presentation.palette;
        let form = match (policy, max) {
            (Policy::Raw, Some(max)) => format!("<brightness> [0-{max}]"),
            (Policy::Raw, None) => "<brightness>".to_string(),
            (Policy::Percentage | Policy::Stepped, _) => "<percentage>".to_string(),
        };
        let _ = writeln!(
            self.err,
            "{}Usage: {} {form}{}",
            p.yellow, self.program, p.reset
        );
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}
