// ABOUTME: Free-text duration parsing for video lengths shown on pages.
// ABOUTME: Supports plain seconds, MM:SS, HH:MM:SS, "1h 23m" unit strings, and parse_duration syntax.

use once_cell::sync::Lazy;
use regex::Regex;

static UNIT_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(\d+)\s*h(?:ours?|rs?)?)?\s*(?:(\d+)\s*m(?:in(?:utes?|s)?)?)?\s*(?:(\d+)\s*s(?:ec(?:onds?|s)?)?)?$",
    )
    .unwrap()
});

/// Parses a duration string into whole seconds.
/// Supports:
/// - Plain integers (seconds)
/// - HH:MM:SS and MM:SS, with optional fractional seconds
/// - Unit strings such as "1h 23m", "45 min", "1 hour 2 minutes 3 seconds"
/// - Anything the `parse_duration` crate understands ("1.5h", "2 days")
///
/// Returns None for empty or unparseable text so that a missing duration is
/// never reported as zero.
pub fn parse_duration_seconds(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(secs) = s.parse::<u64>() {
        return u32::try_from(secs).ok();
    }

    if s.contains(':') {
        return parse_colon_format(s);
    }

    if UNIT_DURATION.is_match(s) {
        return parse_unit_format(s);
    }

    if let Ok(duration) = parse_duration::parse(s) {
        return u32::try_from(duration.as_secs()).ok();
    }

    None
}

/// Sums hours, minutes and seconds; `None` on overflow.
fn hms_seconds(hours: u64, mins: u64, secs: u64) -> Option<u64> {
    hours
        .checked_mul(3600)?
        .checked_add(mins.checked_mul(60)?)?
        .checked_add(secs)
}

fn parse_colon_format(s: &str) -> Option<u32> {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    let (hours, mins, secs) = match parts.as_slice() {
        [m, s] => ("0", *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return None,
    };

    let hours: u64 = hours.parse().ok()?;
    let mins: u64 = mins.parse().ok()?;
    let secs: f64 = secs.parse().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }

    let total = hms_seconds(hours, mins, secs.trunc() as u64)?;
    u32::try_from(total).ok()
}

fn parse_unit_format(s: &str) -> Option<u32> {
    let caps = UNIT_DURATION.captures(s)?;
    if caps.get(1).is_none() && caps.get(2).is_none() && caps.get(3).is_none() {
        return None;
    }

    let part = |idx: usize| -> Option<u64> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    let total = hms_seconds(part(1)?, part(2)?, part(3)?)?;
    u32::try_from(total).ok()
}
