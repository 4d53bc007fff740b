//! Parsing of the representations an instant can arrive in.
//!
//! Every instant is resolved to `DateTime<Utc>` before any arithmetic happens.
//! Inputs that carry no offset are wall-clock times in the site timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{CateZileError, CateZileResult};

/// Timezone the site's schedules are published in.
pub const SITE_TIMEZONE: Tz = chrono_tz::Europe::Bucharest;

/// Wall-clock formats accepted when the string carries no offset.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying formats that RFC 3339 parsing rejects (space separator, `+0300`).
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Any representation convertible to an absolute instant.
///
/// Deserializes from either a JSON number (epoch milliseconds) or a string.
/// Strings carrying an offset land in `DateTime`; anything else is kept as
/// text and resolved later, when the timezone is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstantInput {
    EpochMillis(i64),
    DateTime(DateTime<Utc>),
    Iso(String),
}

impl From<&str> for InstantInput {
    fn from(s: &str) -> Self {
        InstantInput::Iso(s.to_string())
    }
}

impl From<String> for InstantInput {
    fn from(s: String) -> Self {
        InstantInput::Iso(s)
    }
}

impl From<i64> for InstantInput {
    fn from(ms: i64) -> Self {
        InstantInput::EpochMillis(ms)
    }
}

impl From<DateTime<Utc>> for InstantInput {
    fn from(dt: DateTime<Utc>) -> Self {
        InstantInput::DateTime(dt)
    }
}

impl InstantInput {
    /// Resolve against the site timezone.
    pub fn resolve(&self) -> CateZileResult<DateTime<Utc>> {
        self.resolve_in(SITE_TIMEZONE)
    }

    /// Resolve, reading offset-less strings as wall-clock time in `tz`.
    pub fn resolve_in(&self, tz: Tz) -> CateZileResult<DateTime<Utc>> {
        match self {
            InstantInput::Iso(s) => parse_iso(s, tz),
            InstantInput::EpochMillis(ms) => from_epoch_millis(*ms),
            InstantInput::DateTime(dt) => Ok(*dt),
        }
    }
}

fn from_epoch_millis(ms: i64) -> CateZileResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| CateZileError::invalid(format!("Epoch milliseconds out of range: {ms}")))
}

/// `1755010800000` or `-1000`: a string that is only an optionally signed
/// integer is epoch milliseconds.
fn epoch_millis_text(s: &str) -> Option<&str> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(s)
}

/// Parse any supported representation into a UTC instant (site timezone for naive input).
pub fn parse_instant(input: impl Into<InstantInput>) -> CateZileResult<DateTime<Utc>> {
    input.into().resolve()
}

/// Midnight at the start of `date` in `tz`, as a UTC instant.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> CateZileResult<DateTime<Utc>> {
    localize(date.and_time(chrono::NaiveTime::MIN), tz)
}

fn parse_iso(s: &str, tz: Tz) -> CateZileResult<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return Err(CateZileError::invalid("Empty date string"));
    }

    if let Some(text) = epoch_millis_text(s) {
        let ms = text.parse::<i64>().map_err(|_| {
            CateZileError::invalid(format!("Epoch milliseconds out of range: {}", text))
        })?;
        return from_epoch_millis(ms);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(naive, tz);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return local_midnight(date, tz);
    }

    Err(CateZileError::invalid(format!(
        "Invalid date '{}'. Expected ISO-8601 (e.g. 2025-08-12T15:00:00Z)",
        s
    )))
}

/// Attach `tz` to a wall-clock time. Folds resolve to the earlier instant; gaps are rejected.
fn localize(naive: NaiveDateTime, tz: Tz) -> CateZileResult<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            CateZileError::invalid(format!("{} does not exist in {}", naive, tz.name()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utc_and_offset_strings() {
        let expected = Utc.with_ymd_and_hms(2025, 8, 12, 15, 0, 0).unwrap();

        assert_eq!(parse_instant("2025-08-12T15:00:00Z").unwrap(), expected);
        assert_eq!(parse_instant("2025-08-12T18:00:00+03:00").unwrap(), expected);
        assert_eq!(parse_instant("2025-08-12 18:00:00+0300").unwrap(), expected);
        assert_eq!(parse_instant("2025-08-12T15:00:00.000Z").unwrap(), expected);
    }

    #[test]
    fn test_naive_strings_use_site_timezone() {
        // Bucharest is UTC+3 in August
        assert_eq!(
            parse_instant("2025-08-12T18:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 8, 12, 15, 0, 0).unwrap()
        );
        // and UTC+2 in January
        assert_eq!(
            parse_instant("2025-01-10 12:30:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 10, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_bare_date_is_local_midnight() {
        assert_eq!(
            parse_instant("2025-12-25").unwrap(),
            Utc.with_ymd_and_hms(2025, 12, 24, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_epoch_millis_and_native_values() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_instant(dt.timestamp_millis()).unwrap(), dt);
        assert_eq!(parse_instant(dt).unwrap(), dt);
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        for bad in ["", "   ", "mâine", "2025-13-01", "12/08/2025"] {
            let err = parse_instant(bad).unwrap_err();
            assert!(
                matches!(err, CateZileError::InvalidInput(_)),
                "expected InvalidInput for {:?}, got {:?}",
                bad,
                err
            );
        }
        assert!(parse_instant(i64::MAX).is_err());
        assert!(parse_instant("-").is_err());
        assert!(parse_instant("99999999999999999999").is_err());
    }

    #[test]
    fn test_digit_strings_are_epoch_millis() {
        let kickoff = Utc.with_ymd_and_hms(2025, 8, 12, 15, 0, 0).unwrap();
        assert_eq!(parse_instant("1755010800000").unwrap(), kickoff);
        assert_eq!(parse_instant(" 1755010800000 ").unwrap(), kickoff);
        assert_eq!(
            parse_instant("-1000").unwrap(),
            Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap()
        );

        let quoted: InstantInput = serde_json::from_str("\"1755010800000\"").unwrap();
        assert_eq!(quoted.resolve().unwrap(), kickoff);
    }

    #[test]
    fn test_dst_gap_is_rejected_and_fold_takes_earlier() {
        // 2025-03-30 03:00 local does not exist in Bucharest (clocks jump 03:00 -> 04:00)
        assert!(parse_instant("2025-03-30T03:30").is_err());

        // 2025-10-26 03:30 local happens twice; the first one is still EEST (UTC+3)
        assert_eq!(
            parse_instant("2025-10-26T03:30").unwrap(),
            Utc.with_ymd_and_hms(2025, 10, 26, 0, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let from_number: InstantInput = serde_json::from_str("1735725600000").unwrap();
        assert_eq!(from_number, InstantInput::EpochMillis(1_735_725_600_000));

        let from_string: InstantInput = serde_json::from_str("\"2025-01-01T10:00:00Z\"").unwrap();
        assert!(matches!(from_string, InstantInput::DateTime(_)), "{:?}", from_string);
        assert_eq!(from_number.resolve().unwrap(), from_string.resolve().unwrap());

        // No offset: kept as text so it resolves in the caller's timezone
        let naive: InstantInput = serde_json::from_str("\"2025-01-01T12:00\"").unwrap();
        assert_eq!(naive, InstantInput::Iso("2025-01-01T12:00".into()));
        assert_eq!(naive.resolve().unwrap(), from_number.resolve().unwrap());

        let native = InstantInput::from(Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap());
        let json = serde_json::to_string(&native).unwrap();
        assert_eq!(serde_json::from_str::<InstantInput>(&json).unwrap(), native);
    }
}
