// ABOUTME: Date parsing for upload dates found in APIs and page markup.
// ABOUTME: All values are interpreted in UTC so a date never shifts to a neighbouring day.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parses an ISO-8601 timestamp such as `2024-06-24T15:30:00.000Z`.
///
/// Values without an offset are taken as UTC. Date-only values map to
/// midnight UTC. Looser formats fall back to `dateparser`, again pinned to UTC.
pub fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Some(dt) = parse_day(s) {
        return Some(dt);
    }

    dateparser::parse_with_timezone(s, &Utc).ok()
}

/// Parses a `YYYY-MM-DD` calendar date into midnight UTC of that day.
pub fn parse_day(s: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()?;
    let naive = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Formats the UTC calendar date of `dt` as digits-only `YYYYMMDD`.
pub fn upload_date_digits(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_millis() {
        let dt = parse_iso8601("2024-06-24T15:30:00.000Z").unwrap();
        assert_eq!(dt.timestamp(), 1_719_243_000);
        assert_eq!(upload_date_digits(&dt), "20240624");
    }

    #[test]
    fn offset_is_normalised_to_utc_day() {
        let dt = parse_iso8601("2024-06-24T23:30:00-02:00").unwrap();
        assert_eq!(upload_date_digits(&dt), "20240625");
    }

    #[test]
    fn naive_datetime_is_utc() {
        let dt = parse_iso8601("2024-06-24T10:00:00").unwrap();
        assert_eq!(dt.timestamp(), 1_719_223_200);
    }

    #[test]
    fn date_only_is_midnight() {
        let dt = parse_iso8601("2025-10-13").unwrap();
        assert_eq!(dt.timestamp(), 1_760_313_600);
        assert_eq!(parse_day("2025-10-13"), Some(dt));
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_iso8601("").is_none());
        assert!(parse_iso8601("not a date").is_none());
        assert!(parse_day("13/10/2025").is_none());
    }
}
