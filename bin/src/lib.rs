//! Shared plumbing for the `btb`, `bkb` and `bdp` front-ends.

use std::io;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use t2bright::{
    Command, DeviceClass, Presentation, Reporter, SystemBackend, T2brightConfig, T2brightError,
};

/// Set or show a backlight's brightness.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(long_about = None)]
#[command(group(
            ArgGroup::new("action")
                .required(true)
                .args(["value", "show"]),
        ))]
pub struct Args {
    /// Brightness to apply, e.g. 50 or 50%.
    #[arg(value_name = "percentage", allow_negative_numbers = true)]
    pub value: Option<String>,

    /// Print the current brightness as a percentage of the maximum.
    #[arg(short, long)]
    pub show: bool,
}

impl Args {
    pub fn into_command(self) -> Command {
        match self.value {
            Some(value) if !self.show => Command::Set(value),
            _ => Command::Show,
        }
    }
}

/// Parse arguments, drive `class` and map the outcome to an exit status.
///
/// Argument errors exit through clap, with status 2.
pub async fn main(class: DeviceClass, program: &str) -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::debug!(target: "cli", "{program}: {args:?}");

    let config = match T2brightConfig::new().await {
        Ok(config) => config,
        Err(e) => return fail(program, &e),
    };

    let backend = match SystemBackend::new(config.write_method).await {
        Ok(backend) => backend,
        Err(e) => return fail(program, &e),
    };

    let mut reporter = Reporter::new(
        io::stdout().lock(),
        io::stderr().lock(),
        program,
        Presentation::from(&config),
    );
    let status = t2bright::run(class, args.into_command(), &config, &backend, &mut reporter).await;
    ExitCode::from(status)
}

fn fail(program: &str, error: &T2brightError) -> ExitCode {
    let mut reporter = Reporter::new(
        io::stdout().lock(),
        io::stderr().lock(),
        program,
        Presentation::new(true),
    );
    reporter.error(error);
    ExitCode::from(reporter.presentation().exit_codes.for_error(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("bkb").chain(args.iter().copied()))
    }

    #[test]
    fn value_or_show() {
        assert_eq!(parse(&["50%"]).unwrap().into_command(), Command::Set("50%".into()));
        assert_eq!(parse(&["-s"]).unwrap().into_command(), Command::Show);
        assert_eq!(parse(&["--show"]).unwrap().into_command(), Command::Show);
    }

    #[test]
    fn negative_numbers_reach_the_validator() {
        assert_eq!(parse(&["-5"]).unwrap().into_command(), Command::Set("-5".into()));
    }

    #[test]
    fn missing_argument_is_a_usage_error() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn value_and_show_conflict() {
        let err = parse(&["50", "--show"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_flags_are_usage_errors() {
        let err = parse(&["--fade"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_version_flag() {
        for flag in ["-V", "--version"] {
            let err = parse(&[flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownArgument);
            assert_eq!(err.exit_code(), 2);
        }
    }
}
