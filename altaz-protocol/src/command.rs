//! Mount command records
//!
//! A record carries a target pointing as two tagged decimal fields:
//!
//! ```text
//! AZ:<azimuth degrees>ALT:<altitude degrees>
//! ```
//!
//! The azimuth text is everything strictly between `AZ:` and the first
//! `ALT:` that follows it; the altitude text runs from after `ALT:` to the
//! end of the record. Numbers are read leniently: the longest numeric prefix
//! counts and anything unparsable reads as `0`.

/// Azimuth field marker
pub const AZIMUTH_MARKER: &[u8] = b"AZ:";

/// Altitude field marker
pub const ALTITUDE_MARKER: &[u8] = b"ALT:";

/// Target pointing decoded from one record
///
/// Values are passed through as sent; normalization and clamping belong to
/// the target resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MountCommand {
    /// Requested azimuth in degrees (any range)
    pub azimuth_deg: f32,
    /// Requested altitude in degrees (any range)
    pub altitude_deg: f32,
}

impl MountCommand {
    /// Create a command from raw degree values
    pub const fn new(azimuth_deg: f32, altitude_deg: f32) -> Self {
        Self {
            azimuth_deg,
            altitude_deg,
        }
    }

    /// Parse a record (terminator already stripped)
    ///
    /// Returns `None` when either marker is missing, or when `ALT:` only
    /// appears before `AZ:`.
    pub fn parse(record: &[u8]) -> Option<Self> {
        let az_start = find(record, AZIMUTH_MARKER)? + AZIMUTH_MARKER.len();
        let after_az = &record[az_start..];
        let alt_offset = find(after_az, ALTITUDE_MARKER)?;

        let azimuth_text = &after_az[..alt_offset];
        let altitude_text = &after_az[alt_offset + ALTITUDE_MARKER.len()..];

        Some(Self {
            azimuth_deg: parse_lenient_f32(azimuth_text),
            altitude_deg: parse_lenient_f32(altitude_text),
        })
    }
}

/// Locate the first occurrence of `needle` in `haystack`
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Best-effort decimal parse
///
/// Skips leading ASCII whitespace, then takes the longest prefix of the form
/// `[+-]digits[.digits][(e|E)[+-]digits]`. Returns `0.0` when there is no
/// numeric prefix or the value is not finite.
pub fn parse_lenient_f32(text: &[u8]) -> f32 {
    let mut i = 0;
    while i < text.len() && text[i].is_ascii_whitespace() {
        i += 1;
    }
    let start = i;

    if i < text.len() && (text[i] == b'+' || text[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    i = skip_digits(text, i);
    let mut digits = i - int_start;

    if i < text.len() && text[i] == b'.' {
        let frac_end = skip_digits(text, i + 1);
        let frac_digits = frac_end - (i + 1);
        if digits + frac_digits > 0 {
            digits += frac_digits;
            i = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when it carries at least one digit
    if i < text.len() && (text[i] == b'e' || text[i] == b'E') {
        let mut j = i + 1;
        if j < text.len() && (text[j] == b'+' || text[j] == b'-') {
            j += 1;
        }
        let exp_end = skip_digits(text, j);
        if exp_end > j {
            i = exp_end;
        }
    }

    core::str::from_utf8(&text[start..i])
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn skip_digits(text: &[u8], mut i: usize) -> usize {
    while i < text.len() && text[i].is_ascii_digit() {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_record() {
        assert_eq!(
            MountCommand::parse(b"AZ:10ALT:20"),
            Some(MountCommand::new(10.0, 20.0))
        );
    }

    #[test]
    fn test_parse_fractional_and_negative() {
        assert_eq!(
            MountCommand::parse(b"AZ:123.5ALT:-12.25"),
            Some(MountCommand::new(123.5, -12.25))
        );
    }

    #[test]
    fn test_missing_azimuth_marker() {
        assert_eq!(MountCommand::parse(b"ALT:20"), None);
    }

    #[test]
    fn test_missing_altitude_marker() {
        assert_eq!(MountCommand::parse(b"AZ:20"), None);
        assert_eq!(MountCommand::parse(b""), None);
    }

    #[test]
    fn test_altitude_marker_before_azimuth_is_rejected() {
        assert_eq!(MountCommand::parse(b"ALT:20AZ:10"), None);
    }

    #[test]
    fn test_separator_and_prefix_text_tolerated() {
        assert_eq!(
            MountCommand::parse(b"pos AZ: 45.0, ALT: 30.0"),
            Some(MountCommand::new(45.0, 30.0))
        );
    }

    #[test]
    fn test_malformed_numbers_read_as_zero() {
        assert_eq!(
            MountCommand::parse(b"AZ:abcALT:-"),
            Some(MountCommand::new(0.0, 0.0))
        );
    }

    #[test]
    fn test_lenient_prefix() {
        assert_eq!(parse_lenient_f32(b"12.5xyz"), 12.5);
        assert_eq!(parse_lenient_f32(b"  -7"), -7.0);
        assert_eq!(parse_lenient_f32(b"+.5"), 0.5);
        assert_eq!(parse_lenient_f32(b"3."), 3.0);
        assert_eq!(parse_lenient_f32(b"1e2"), 100.0);
        assert_eq!(parse_lenient_f32(b"1e"), 1.0);
        assert_eq!(parse_lenient_f32(b"2E-1deg"), 0.2);
    }

    #[test]
    fn test_lenient_rejects() {
        assert_eq!(parse_lenient_f32(b""), 0.0);
        assert_eq!(parse_lenient_f32(b"."), 0.0);
        assert_eq!(parse_lenient_f32(b"nan"), 0.0);
        assert_eq!(parse_lenient_f32(b"inf"), 0.0);
        assert_eq!(parse_lenient_f32(b"1e99"), 0.0);
    }
}
