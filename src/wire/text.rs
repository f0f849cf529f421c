//! Culture-invariant text forms of the values the wire carries as strings.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, SecondsFormat};

pub const NAN_TEXT: &str = "NaN";
pub const POSITIVE_INFINITY_TEXT: &str = "INF";
pub const NEGATIVE_INFINITY_TEXT: &str = "-INF";

/// Timestamps are written with a four-digit year.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Round-trip form with offset; UTC is written as `Z`.
pub fn format_datetime_offset(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Offset-less timestamps are stored as UTC.
pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.and_utc().to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Rejects values whose written form would not parse back to the same instant.
pub fn check_datetime_offset(value: &DateTime<FixedOffset>) -> Result<(), String> {
    check_year(value.year())?;
    if value.offset().local_minus_utc() % 60 != 0 {
        return Err(format!("offset {} is not a whole number of minutes", value.offset()));
    }
    Ok(())
}

pub fn check_datetime(value: &NaiveDateTime) -> Result<(), String> {
    check_year(value.year())
}

fn check_year(year: i32) -> Result<(), String> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(format!("year {} is outside {}..={}", year, MIN_YEAR, MAX_YEAR))
    }
}

pub fn parse_datetime_offset(text: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(text.trim()).map_err(|e| format!("invalid timestamp '{}': {}", text, e))
}

pub fn parse_datetime(text: &str) -> Result<NaiveDateTime, String> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_utc());
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| format!("invalid timestamp '{}': {}", text, e))
}

pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        NAN_TEXT.to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            POSITIVE_INFINITY_TEXT.to_string()
        } else {
            NEGATIVE_INFINITY_TEXT.to_string()
        }
    } else {
        value.to_string()
    }
}

pub fn parse_double(text: &str) -> Result<f64, String> {
    match text.trim() {
        NAN_TEXT => Ok(f64::NAN),
        POSITIVE_INFINITY_TEXT | "Infinity" => Ok(f64::INFINITY),
        NEGATIVE_INFINITY_TEXT | "-Infinity" => Ok(f64::NEG_INFINITY),
        other => other
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{}': {}", text, e)),
    }
}

pub fn parse_bool(text: &str) -> Result<bool, String> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("invalid boolean '{}'", text))
    }
}

pub fn parse_integer<T>(text: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| format!("invalid integer '{}': {}", text, e))
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(text: &str) -> Result<Vec<u8>, String> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| format!("invalid base64: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_datetime_offset_round_trip() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();

        let text = format_datetime_offset(&dt);
        assert_eq!(text, "2024-03-15T10:30:00+02:00");
        assert_eq!(parse_datetime_offset(&text).unwrap(), dt);
    }

    #[test]
    fn test_datetime_accepts_offsetless_text() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 600)
            .unwrap();

        assert_eq!(format_datetime(&expected), "2024-01-02T03:04:05.600Z");
        assert_eq!(parse_datetime("2024-01-02T03:04:05.600Z").unwrap(), expected);
        assert_eq!(parse_datetime("2024-01-02T03:04:05.6").unwrap(), expected);
        assert_eq!(parse_datetime("2024-01-02T05:04:05.6+02:00").unwrap(), expected);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_timestamp_range_checks() {
        let whole = FixedOffset::east_opt(3600).unwrap();
        let odd = FixedOffset::east_opt(3630).unwrap();
        assert!(check_datetime_offset(&whole.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()).is_ok());
        assert!(check_datetime_offset(&odd.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()).is_err());
        assert!(check_datetime_offset(&whole.with_ymd_and_hms(12000, 1, 1, 0, 0, 0).unwrap()).is_err());

        let date = |year| NaiveDate::from_ymd_opt(year, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert!(check_datetime(&date(1)).is_ok());
        assert!(check_datetime(&date(9999)).is_ok());
        assert!(check_datetime(&date(0)).is_err());
        assert!(check_datetime(&date(10000)).is_err());
        assert!(check_datetime(&date(-1)).is_err());
    }

    #[test]
    fn test_double_special_values() {
        assert!(parse_double("NaN").unwrap().is_nan());
        assert_eq!(parse_double("INF").unwrap(), f64::INFINITY);
        assert_eq!(parse_double("-Infinity").unwrap(), f64::NEG_INFINITY);
        assert_eq!(parse_double(" 1.5e3 ").unwrap(), 1500.0);
        assert_eq!(format_double(f64::NEG_INFINITY), "-INF");
        assert!(parse_double("1,5").is_err());
    }

    #[test]
    fn test_bool_and_integer_parsing() {
        assert!(parse_bool("True").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(parse_bool("yes").is_err());

        assert_eq!(parse_integer::<i64>("-42").unwrap(), -42);
        assert_eq!(parse_integer::<u64>("18446744073709551615").unwrap(), u64::MAX);
        assert!(parse_integer::<u64>("-1").is_err());
    }

    #[test]
    fn test_base64() {
        assert_eq!(encode_base64(b"ABC"), "QUJD");
        assert_eq!(decode_base64("QUJD").unwrap(), b"ABC");
        assert!(decode_base64("Binary.Null").is_err());
    }
}
