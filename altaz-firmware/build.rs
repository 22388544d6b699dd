//! Build script for altaz-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates settings.cfg at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use altaz_core::config::{parse_settings, SettingsError};

fn main() {
    setup_linker();
    validate_settings();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Reject a settings.cfg the firmware would refuse at boot
fn validate_settings() {
    println!("cargo:rerun-if-changed=settings.cfg");

    let path = Path::new("settings.cfg");
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: settings.cfg not readable                                ║\n\
            ║                                                                  ║\n\
            ║  Error: {:<56} ║\n\
            ║                                                                  ║\n\
            ║  Create altaz-firmware/settings.cfg with ssid= and password=     ║\n\
            ║  lines before building.                                          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            e
        ),
    };

    let problem = match parse_settings(&content) {
        Ok(_) => return,
        Err(SettingsError::MissingSsid) => "missing or empty ssid= line",
        Err(SettingsError::ValueTooLong) => "ssid over 32 or password over 64 bytes",
        Err(SettingsError::InvalidPort) => "port must be 1-65535",
    };

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid settings.cfg                                     ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        ║  • {:<62} ║\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        problem
    );
}
