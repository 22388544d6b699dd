//! Network settings file parser
//!
//! Minimal `key=value` reader for the credentials file shipped with the
//! firmware. It does NOT attempt to be a general config format.
//!
//! Supported:
//! - `ssid=<network name>` (required)
//! - `password=<passphrase>` (empty for open networks)
//! - `port=<u16>` (optional, overrides the command link port)
//! - Blank lines and `#` comments
//!
//! Keys and values are whitespace-trimmed; unknown keys are ignored.

use heapless::String;

/// Maximum SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA2 passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Settings parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// No `ssid=` line present (or it was empty)
    MissingSsid,
    /// A value exceeded its storage capacity
    ValueTooLong,
    /// `port=` was not a valid non-zero u16
    InvalidPort,
}

/// Parsed network settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Network name to join
    pub ssid: String<MAX_SSID_LEN>,
    /// Network passphrase
    pub password: String<MAX_PASSWORD_LEN>,
    /// Command link port override
    pub port: Option<u16>,
}

impl Settings {
    /// Port to listen on, falling back to `default`
    pub fn server_port(&self, default: u16) -> u16 {
        self.port.unwrap_or(default)
    }

    /// True when no passphrase is configured
    pub fn is_open_network(&self) -> bool {
        self.password.is_empty()
    }
}

/// Parse a settings file
pub fn parse_settings(input: &str) -> Result<Settings, SettingsError> {
    let mut settings = Settings::default();

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        match key.trim() {
            "ssid" => {
                settings.ssid = bounded(value.trim())?;
            }
            "password" => {
                settings.password = bounded(value.trim())?;
            }
            "port" => {
                let port: u16 = value
                    .trim()
                    .parse()
                    .map_err(|_| SettingsError::InvalidPort)?;
                if port == 0 {
                    return Err(SettingsError::InvalidPort);
                }
                settings.port = Some(port);
            }
            _ => {}
        }
    }

    if settings.ssid.is_empty() {
        return Err(SettingsError::MissingSsid);
    }

    Ok(settings)
}

fn bounded<const N: usize>(value: &str) -> Result<String<N>, SettingsError> {
    let mut out = String::new();
    out.push_str(value)
        .map_err(|_| SettingsError::ValueTooLong)?;
    Ok(out)
}
