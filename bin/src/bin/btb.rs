//! Touch bar backlight: 0 is off, 1-49 dim, 50-100 bright.

use std::process::ExitCode;

use t2bright::DeviceClass;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    t2bright_cli::main(DeviceClass::Touchbar, env!("CARGO_BIN_NAME")).await
}
