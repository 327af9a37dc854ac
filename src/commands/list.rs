//! List commands implementation

use d2xx_core::platform::PLATFORMS;
use d2xx_core::ClockRate;

/// List all supported platforms
pub fn list_platforms() {
    println!("Supported platforms:");
    println!();
    println!("{:<14} {:<8} {:<8} {:<8}", "Platform", "OS", "Arch", "Ext");
    println!("{}", "-".repeat(40));

    for platform in PLATFORMS {
        println!(
            "{:<14} {:<8} {:<8} {:<8}",
            platform.name(),
            format!("*{}*", platform.os_token()),
            platform.arch(),
            platform.extension()
        );
    }
}

/// List FT4222H system clock rates
pub fn list_clock_rates() {
    println!("FT4222H system clocks:");
    println!();
    for rate in ClockRate::ALL {
        println!("  {}  {:>7}", rate.ordinal(), rate.to_string());
    }
}
