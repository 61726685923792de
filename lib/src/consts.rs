use std::ops::RangeInclusive;

/// Location of the touch bar backlight
pub const TOUCHBAR_PATHS: &[&str] = &["/sys/class/backlight/appletb_backlight"];

/// Location of the keyboard backlight LED
pub const KEYBOARD_PATHS: &[&str] = &["/sys/class/leds/apple::kbd_backlight"];

/// Display panels, in order of preference
pub const DISPLAY_PATHS: &[&str] = &[
    "/sys/class/backlight/intel_backlight",
    "/sys/class/backlight/acpi_video0",
];

/// Filename for device's max brightness
pub const FILE_MAX_BRIGHTNESS: &str = "max_brightness";

/// Filename for current brightness.
/// Backlight classes expose this alongside a write target that may lag the hardware.
pub const FILE_BRIGHTNESS: &str = "actual_brightness";

/// set the requested brightness level
/// LED devices only have this one, so it doubles as the read source there.
pub const FILE_BRIGHTNESS_WRITE: &str = "brightness";

/// Range of valid values for a percentage request
pub const PERCENT_RANGE: RangeInclusive<u32> = 0..=100;

/// Name of the config directory and file, relative to the config roots
pub const CONFIG_DIR: &str = "t2bright";
pub const CONFIG_FILE: &str = "config";

/// System-wide config root, searched after the user's
pub const SYSTEM_CONFIG_ROOT: &str = "/etc";
