use std::io::Write;

use crate::backend::Backend;
use crate::config::{DeviceClass, Policy, T2brightConfig};
use crate::errors::*;
use crate::report::Reporter;
use crate::T2brightBuilder;

make_log_macro!(debug, "frontend");

/// What the user asked a front-end to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the current brightness percentage.
    Show,
    /// Apply a value with the device's policy.
    Set(String),
}

/// Run one command against one device class and return the exit status.
///
/// Everything the user sees goes through `reporter`.
pub async fn run<B, O, E>(
    class: DeviceClass,
    command: Command,
    config: &T2brightConfig,
    backend: &B,
    reporter: &mut Reporter<O, E>,
) -> u8
where
    B: Backend,
    O: Write,
    E: Write,
{
    let codes = reporter.presentation().exit_codes;
    debug!("{:?}: {:?}", class, command);

    let t2bright = match T2brightBuilder::new(class)
        .with_config(config.clone())
        .build(backend)
        .await
    {
        Ok(t2bright) => t2bright,
        Err(e) => {
            reporter.error(&e);
            return codes.for_error(&e);
        }
    };

    let input = match command {
        Command::Show => {
            return match t2bright.get_brightness().await {
                Ok(percentage) => {
                    reporter.percentage(percentage);
                    codes.success
                }
                Err(e) => {
                    reporter.error(&e);
                    codes.for_error(&e)
                }
            };
        }
        Command::Set(input) => input,
    };

    match t2bright.set_brightness(&input).await {
        Ok(transition) => {
            reporter.transition(&transition);
            codes.success
        }
        Err(e) => {
            reporter.error(&e);
            if matches!(e, T2brightError::InvalidInput { .. }) {
                match t2bright.policy() {
                    Policy::Raw => {
                        let max = t2bright.controller().max_brightness().await.ok();
                        reporter.usage(Policy::Raw, max);
                    }
                    policy @ (Policy::Percentage | Policy::Stepped) => {
                        reporter.usage(policy, None);
                        if let Ok(percentage) = t2bright.get_brightness().await {
                            reporter.current(percentage);
                        }
                    }
                }
            }
            codes.for_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::report::Presentation;
    use futures::executor::block_on;

    const TOUCHBAR: &str = "/sys/class/backlight/appletb_backlight";
    const KEYBOARD: &str = "/sys/class/leds/apple::kbd_backlight";

    struct Outcome {
        status: u8,
        stdout: String,
        stderr: String,
    }

    fn invoke(
        fake: &MemoryBackend,
        class: DeviceClass,
        command: Command,
        config: &T2brightConfig,
    ) -> Outcome {
        let mut reporter = Reporter::new(Vec::new(), Vec::new(), "prog", Presentation::new(false));
        let status = block_on(run(class, command, config, fake, &mut reporter));
        let (out, err) = reporter.into_inner();
        Outcome {
            status,
            stdout: String::from_utf8(out).unwrap(),
            stderr: String::from_utf8(err).unwrap(),
        }
    }

    fn keyboard() -> MemoryBackend {
        MemoryBackend::new()
            .with_file(format!("{KEYBOARD}/max_brightness"), "255")
            .with_file(format!("{KEYBOARD}/brightness"), "128")
    }

    fn set(value: &str) -> Command {
        Command::Set(value.to_string())
    }

    #[test]
    fn keyboard_percentage_end_to_end() {
        let fake = keyboard();
        let outcome = invoke(&fake, DeviceClass::Keyboard, set("50%"), &T2brightConfig::default());

        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.stdout, "50% (128) -> 50% (127)\n");
        assert_eq!(outcome.stderr, "");
        assert_eq!(fake.contents(format!("{KEYBOARD}/brightness")).as_deref(), Some("127"));
    }

    #[test]
    fn touchbar_stepped_end_to_end() {
        let fake = MemoryBackend::new()
            .with_file(format!("{TOUCHBAR}/max_brightness"), "2")
            .with_file(format!("{TOUCHBAR}/actual_brightness"), "1")
            .with_file(format!("{TOUCHBAR}/brightness"), "1");
        let outcome = invoke(&fake, DeviceClass::Touchbar, set("80"), &T2brightConfig::default());

        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.stdout, "1 (Dim) -> 2 (Bright)\n");
        assert_eq!(fake.contents(format!("{TOUCHBAR}/brightness")).as_deref(), Some("2"));
    }

    #[test]
    fn show_prints_percentage() {
        let outcome = invoke(&keyboard(), DeviceClass::Keyboard, Command::Show, &T2brightConfig::default());
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.stdout, "50%\n");
    }

    #[test]
    fn missing_hardware_exits_one() {
        let outcome = invoke(
            &MemoryBackend::new(),
            DeviceClass::Touchbar,
            Command::Show,
            &T2brightConfig::default(),
        );
        assert_eq!(outcome.status, 1);
        assert_eq!(outcome.stdout, "");
        assert_eq!(
            outcome.stderr,
            "Error: No supported touch bar backlight found.\n"
        );
    }

    #[test]
    fn non_numeric_input_is_usage_error() {
        let fake = keyboard();
        let outcome = invoke(&fake, DeviceClass::Keyboard, set("abc"), &T2brightConfig::default());

        assert_eq!(outcome.status, 2);
        assert_eq!(
            outcome.stderr,
            "Error: Invalid brightness value provided. Please use a number (e.g., 50 or 50%).\n\
             Usage: prog <percentage>\n"
        );
        assert_eq!(outcome.stdout, "Current brightness: 50%\n");
        assert_eq!(fake.contents(format!("{KEYBOARD}/brightness")).as_deref(), Some("128"));
    }

    #[test]
    fn out_of_range_exits_one() {
        let fake = keyboard();
        let outcome = invoke(&fake, DeviceClass::Keyboard, set("150"), &T2brightConfig::default());

        assert_eq!(outcome.status, 1);
        assert_eq!(outcome.stderr, "Error: Percentage cannot be greater than 100.\n");
        assert_eq!(outcome.stdout, "");
    }

    #[test]
    fn raw_policy_from_config() {
        let config = T2brightConfig::from_toml("[keyboard]\npolicy = \"raw\"").unwrap();
        let fake = keyboard();

        let outcome = invoke(&fake, DeviceClass::Keyboard, set("256"), &config);
        assert_eq!(outcome.status, 1);
        assert_eq!(outcome.stderr, "Error: Maximum brightness is 255.\n");

        let outcome = invoke(&fake, DeviceClass::Keyboard, set("50%"), &config);
        assert_eq!(outcome.status, 2);
        assert!(outcome.stderr.ends_with("Usage: prog <brightness> [0-255]\n"));

        let outcome = invoke(&fake, DeviceClass::Keyboard, set("255"), &config);
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.stdout, "128 -> 255\n");
    }

    #[test]
    fn raw_non_numeric_is_usage_error_without_max() {
        let config = T2brightConfig::from_toml("[keyboard]\npolicy = \"raw\"").unwrap();
        let fake = MemoryBackend::new().with_file(format!("{KEYBOARD}/brightness"), "128");

        let outcome = invoke(&fake, DeviceClass::Keyboard, set("abc"), &config);
        assert_eq!(outcome.status, 2);
        assert_eq!(
            outcome.stderr,
            "Error: Invalid brightness value provided. Please use a number (e.g., 128).\n\
             Usage: prog <brightness>\n"
        );
        assert_eq!(fake.contents(format!("{KEYBOARD}/brightness")).as_deref(), Some("128"));
    }

    #[test]
    fn denied_write_exits_one() {
        let fake = keyboard().deny_writes(format!("{KEYBOARD}/brightness"));
        let outcome = invoke(&fake, DeviceClass::Keyboard, set("10"), &T2brightConfig::default());

        assert_eq!(outcome.status, 1);
        assert_eq!(outcome.stderr, "Error: Permission denied. Please run with sudo.\n");
        assert_eq!(outcome.stdout, "");
    }
}
