//! Date helpers: ISO-8601 rendering, lenient parsing, and the seconds-since-epoch
//! representation used by the binary layout.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// The Unix epoch, the zero-equivalent date.
pub fn epoch() -> DateTime<Utc> { DateTime::<Utc>::default() }

/// Renders a date as `yyyy-MM-ddTHH:mm:ssZ`, or as `yyyy-MM-ddTHH:mm:ss.ffZ` when the
/// millisecond component is nonzero. The fractional part is truncated to hundredths.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use llsd::date::format_date;
///
/// let dt = Utc.timestamp_opt(1_234_567_890, 0).unwrap();
/// assert_eq!(format_date(&dt), "2009-02-13T23:31:30Z");
///
/// let dt = Utc.timestamp_opt(1_234_567_890, 257_000_000).unwrap();
/// assert_eq!(format_date(&dt), "2009-02-13T23:31:30.25Z");
/// ```
pub fn format_date(dt: &DateTime<Utc>) -> String {
    // chrono reports leap seconds as millis >= 1000
    let millis = dt.timestamp_subsec_millis().min(999);
    if millis > 0 {
        format!("{}.{:02}Z", dt.format("%Y-%m-%dT%H:%M:%S"), millis / 10)
    } else {
        dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

/// Parses the date renderings accepted on the wire.
///
/// RFC 3339 text (with any offset) is converted to UTC; text without an offset is
/// taken as UTC, and a bare date is midnight UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Seconds since the epoch, including the fractional part.
pub fn to_seconds(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / NANOS_PER_SEC
}

/// The inverse of [`to_seconds`]. Non-finite or unrepresentable values give the epoch.
pub fn from_seconds(secs: f64) -> DateTime<Utc> {
    if !secs.is_finite() {
        return epoch();
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * NANOS_PER_SEC).round().min(999_999_999.0) as u32;
    if whole < i64::min_value() as f64 || whole > i64::max_value() as f64 {
        return epoch();
    }
    Utc.timestamp_opt(whole as i64, nanos)
        .single()
        .unwrap_or_else(epoch)
}
