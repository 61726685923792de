//! Keyboard backlight, as a percentage.

use std::process::ExitCode;

use t2bright::DeviceClass;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    t2bright_cli::main(DeviceClass::Keyboard, env!("CARGO_BIN_NAME")).await
}
