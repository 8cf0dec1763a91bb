//! Timestamp normalization.
//!
//! Providers hand over timestamps as ISO-8601 text, epoch seconds, or already
//! typed instants. This module turns all of them into `DateTime<Utc>` so every
//! downstream computation compares one instant type.
//!
//! Policy for bad records:
//! - a timestamp that cannot be parsed drops **that record only** (reported in
//!   `Normalized::dropped`), the batch survives
//! - a missing mandatory value drops the record the same way (absent is not zero)
//! - a present but non-finite mandatory value is an invalid input and fails the call

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::domain::{
    GenerationSample, IntensitySample, RawGenerationRow, RawIntensityRow, RawTimestamp,
};
use crate::error::AppError;

/// Naive text layouts accepted after RFC 3339 fails. All are read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying layouts that RFC 3339 parsing rejects: a space separator,
/// or a basic `+HHMM` offset.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

/// A timestamp value that is not in any accepted representation.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedTimestamp {
    pub raw: String,
}

impl std::fmt::Display for MalformedTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed timestamp '{}'", self.raw)
    }
}

impl std::error::Error for MalformedTimestamp {}

/// A record removed during normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRecord {
    /// Position of the record in the input slice.
    pub index: usize,
    pub reason: String,
}

/// Normalization output: surviving samples in input order plus what was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub samples: Vec<T>,
    pub dropped: Vec<DroppedRecord>,
}

/// Anything carrying a canonical UTC instant.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for IntensitySample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for GenerationSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Stable ascending sort by timestamp. Equal instants keep their input order.
pub fn sort_by_timestamp<T: Timestamped>(samples: &mut [T]) {
    samples.sort_by_key(|s| s.timestamp());
}

/// Coerce one raw timestamp into a UTC instant.
pub fn normalize_timestamp(raw: &RawTimestamp) -> Result<DateTime<Utc>, MalformedTimestamp> {
    match raw {
        RawTimestamp::Utc(dt) => Ok(*dt),
        RawTimestamp::Naive(naive) => Ok(Utc.from_utc_datetime(naive)),
        RawTimestamp::Epoch(secs) => from_epoch_seconds(*secs).ok_or_else(|| MalformedTimestamp {
            raw: secs.to_string(),
        }),
        RawTimestamp::Text(text) => parse_text(text).ok_or_else(|| MalformedTimestamp {
            raw: text.clone(),
        }),
        RawTimestamp::Unsupported(raw) => Err(MalformedTimestamp { raw: raw.clone() }),
    }
}

fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    // i64 range check before the cast; chrono rejects out-of-range instants itself.
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    let nanos = ((secs - whole) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let with_minutes = expand_hour_offset(s);
    let offset_text = with_minutes.as_deref().unwrap_or(s);
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(offset_text, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    // A trailing `Z` on an otherwise naive layout (e.g. "2025-01-01 00:00:00Z").
    let naive_part = s.strip_suffix('Z').unwrap_or(s);
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_part, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(naive_part, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `...12:00:00+05` -> `...12:00:00+05:00`. Postgres renders whole-hour offsets this way.
///
/// Only applies when a time of day precedes the suffix, so a bare date such as
/// `2025-01-01` is left alone.
fn expand_hour_offset(s: &str) -> Option<String> {
    let split = s.len().checked_sub(3)?;
    let (head, suffix) = (s.get(..split)?, s.get(split..)?);
    let bytes = suffix.as_bytes();
    let signed_hours = matches!(bytes[0], b'+' | b'-') && bytes[1..].iter().all(u8::is_ascii_digit);
    let after_time = head.contains(':') && head.ends_with(|c: char| c.is_ascii_digit());
    (signed_hours && after_time).then(|| format!("{s}:00"))
}

/// Normalize CO2-intensity rows.
pub fn normalize_intensity(rows: &[RawIntensityRow]) -> Result<Normalized<IntensitySample>, AppError> {
    let mut samples = Vec::with_capacity(rows.len());
    let mut dropped = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(value) = mandatory_value(row.intensity_g_per_kwh, "co2_intensity_g_per_kwh")? else {
            dropped.push(DroppedRecord {
                index,
                reason: "missing `co2_intensity_g_per_kwh` value".to_string(),
            });
            continue;
        };
        match normalize_timestamp(&row.timestamp) {
            Ok(timestamp) => samples.push(IntensitySample {
                timestamp,
                intensity_g_per_kwh: value,
            }),
            Err(e) => dropped.push(DroppedRecord {
                index,
                reason: e.to_string(),
            }),
        }
    }

    Ok(Normalized { samples, dropped })
}

/// Normalize generation-mix rows. An all-empty breakdown becomes `None`.
pub fn normalize_generation(rows: &[RawGenerationRow]) -> Result<Normalized<GenerationSample>, AppError> {
    let mut samples = Vec::with_capacity(rows.len());
    let mut dropped = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(total) = mandatory_value(row.total_output_mw, "total_mw")? else {
            dropped.push(DroppedRecord {
                index,
                reason: "missing `total_mw` value".to_string(),
            });
            continue;
        };
        match normalize_timestamp(&row.timestamp) {
            Ok(timestamp) => samples.push(GenerationSample {
                timestamp,
                total_output_mw: total,
                breakdown: (!row.breakdown.is_empty()).then_some(row.breakdown),
            }),
            Err(e) => dropped.push(DroppedRecord {
                index,
                reason: e.to_string(),
            }),
        }
    }

    Ok(Normalized { samples, dropped })
}

fn mandatory_value(value: Option<f64>, column: &str) -> Result<Option<f64>, AppError> {
    match value {
        Some(v) if !v.is_finite() => Err(AppError::data(format!(
            "Non-finite value in mandatory column `{column}`."
        ))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceBreakdown;
    use chrono::{Datelike, Timelike};

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn accepts_each_text_layout() {
        let expected = ts(2025, 3, 1, 12, 30);
        for text in [
            "2025-03-01T12:30:00Z",
            "2025-03-01T12:30:00+00:00",
            "2025-03-01T14:30:00+02:00",
            "2025-03-01 12:30:00+00:00",
            "2025-03-01T12:30:00",
            "2025-03-01 12:30:00",
            "2025-03-01 12:30:00.000000",
            "2025-03-01 12:30",
            "  2025-03-01T12:30:00Z  ",
        ] {
            let got = normalize_timestamp(&RawTimestamp::from(text)).unwrap();
            assert_eq!(got, expected, "layout {text:?}");
        }
    }

    #[test]
    fn accepts_basic_and_hour_only_offsets() {
        let cases = [
            ("2025-01-01T00:00:00+0000", ts(2025, 1, 1, 0, 0)),
            ("2025-01-01T05:30:00+0530", ts(2025, 1, 1, 0, 0)),
            ("2025-01-01T00:00:00+00", ts(2025, 1, 1, 0, 0)),
            ("2025-01-01 00:00:00+00", ts(2025, 1, 1, 0, 0)),
            ("2025-01-01 02:00:00+02", ts(2025, 1, 1, 0, 0)),
            ("2024-12-31 19:00:00-05", ts(2025, 1, 1, 0, 0)),
            ("2025-01-01 00:00:00-0000", ts(2025, 1, 1, 0, 0)),
        ];
        for (text, expected) in cases {
            let got = normalize_timestamp(&RawTimestamp::from(text));
            assert_eq!(got, Ok(expected), "layout {text:?}");
        }

        let micros = normalize_timestamp(&RawTimestamp::from("2025-01-01 00:00:00.123456+00")).unwrap();
        assert_eq!(micros.timestamp_subsec_micros(), 123_456);
        assert_eq!(micros.timestamp(), ts(2025, 1, 1, 0, 0).timestamp());
    }

    #[test]
    fn hour_offset_expansion_ignores_bare_dates() {
        assert_eq!(expand_hour_offset("2025-01-01"), None);
        assert_eq!(expand_hour_offset("2025-01-01T00:00:00Z"), None);
        assert_eq!(
            expand_hour_offset("2025-01-01 00:00:00-03").as_deref(),
            Some("2025-01-01 00:00:00-03:00")
        );
    }

    #[test]
    fn date_only_is_midnight_utc() {
        let got = normalize_timestamp(&RawTimestamp::from("2024-12-31")).unwrap();
        assert_eq!((got.year(), got.month(), got.day(), got.hour()), (2024, 12, 31, 0));
    }

    #[test]
    fn epoch_and_typed_instants() {
        let expected = ts(2025, 3, 1, 0, 0);
        let epoch = expected.timestamp() as f64;
        assert_eq!(normalize_timestamp(&RawTimestamp::Epoch(epoch)).unwrap(), expected);
        assert_eq!(normalize_timestamp(&RawTimestamp::Utc(expected)).unwrap(), expected);
        assert_eq!(
            normalize_timestamp(&RawTimestamp::Naive(expected.naive_utc())).unwrap(),
            expected
        );

        let half = normalize_timestamp(&RawTimestamp::Epoch(epoch + 0.5)).unwrap();
        assert_eq!(half.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn rejects_garbage() {
        for text in ["", "yesterday", "2025-13-01", "12/03/2025 10:00"] {
            assert!(normalize_timestamp(&RawTimestamp::from(text)).is_err(), "{text:?}");
        }
        assert!(normalize_timestamp(&RawTimestamp::Epoch(f64::NAN)).is_err());
        assert!(normalize_timestamp(&RawTimestamp::Epoch(1e300)).is_err());
    }

    #[test]
    fn malformed_records_are_dropped_and_order_preserved() {
        let rows = vec![
            RawIntensityRow {
                timestamp: RawTimestamp::from("2025-03-01T00:30:00Z"),
                intensity_g_per_kwh: Some(200.0),
            },
            RawIntensityRow {
                timestamp: RawTimestamp::from("not a time"),
                intensity_g_per_kwh: Some(210.0),
            },
            RawIntensityRow {
                timestamp: RawTimestamp::from("2025-03-01T00:15:00Z"),
                intensity_g_per_kwh: None,
            },
            RawIntensityRow {
                timestamp: RawTimestamp::from("2025-03-01T00:00:00Z"),
                intensity_g_per_kwh: Some(190.0),
            },
        ];

        let out = normalize_intensity(&rows).unwrap();
        let values: Vec<f64> = out.samples.iter().map(|s| s.intensity_g_per_kwh).collect();
        assert_eq!(values, vec![200.0, 190.0], "survivors keep input order");
        let dropped: Vec<usize> = out.dropped.iter().map(|d| d.index).collect();
        assert_eq!(dropped, vec![1, 2]);
        assert!(out.dropped[0].reason.contains("not a time"));
    }

    #[test]
    fn unsupported_wire_timestamps_drop_only_their_rows() {
        let json = r#"[
            {"timestamp": null, "co2_intensity_g_per_kwh": 150.0},
            {"timestamp": "2025-01-01T00:00:00Z", "co2_intensity_g_per_kwh": 180.0},
            {"timestamp": true, "co2_intensity_g_per_kwh": 160.0},
            {"timestamp": 1735690500, "co2_intensity_g_per_kwh": 175.0}
        ]"#;
        let rows: Vec<RawIntensityRow> = serde_json::from_str(json).unwrap();
        let out = normalize_intensity(&rows).unwrap();

        let values: Vec<f64> = out.samples.iter().map(|s| s.intensity_g_per_kwh).collect();
        assert_eq!(values, vec![180.0, 175.0]);
        let dropped: Vec<usize> = out.dropped.iter().map(|d| d.index).collect();
        assert_eq!(dropped, vec![0, 2]);
        assert!(out.dropped[0].reason.contains("null"), "{}", out.dropped[0].reason);
    }

    #[test]
    fn non_finite_mandatory_value_fails_the_batch() {
        let rows = vec![RawIntensityRow {
            timestamp: RawTimestamp::from("2025-03-01T00:00:00Z"),
            intensity_g_per_kwh: Some(f64::NAN),
        }];
        let err = normalize_intensity(&rows).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn generation_breakdown_is_optional() {
        let rows = vec![
            RawGenerationRow {
                timestamp: RawTimestamp::from("2025-03-01T00:00:00Z"),
                total_output_mw: Some(7000.0),
                breakdown: SourceBreakdown::default(),
            },
            RawGenerationRow {
                timestamp: RawTimestamp::from("2025-03-01T00:15:00Z"),
                total_output_mw: Some(7100.0),
                breakdown: SourceBreakdown {
                    wind_mw: Some(1800.0),
                    ..SourceBreakdown::default()
                },
            },
            RawGenerationRow {
                timestamp: RawTimestamp::from("2025-03-01T00:30:00Z"),
                total_output_mw: None,
                breakdown: SourceBreakdown::default(),
            },
        ];
        let out = normalize_generation(&rows).unwrap();
        assert_eq!(out.samples.len(), 2);
        assert!(out.samples[0].breakdown.is_none());
        assert_eq!(out.samples[1].breakdown.and_then(|b| b.wind_mw), Some(1800.0));
        assert_eq!(out.dropped.len(), 1);
        assert_eq!(out.dropped[0].index, 2);
    }

    #[test]
    fn sort_is_stable_for_equal_instants() {
        let t0 = ts(2025, 1, 1, 0, 0);
        let t1 = ts(2025, 1, 1, 1, 0);
        let mut samples = vec![
            IntensitySample { timestamp: t1, intensity_g_per_kwh: 1.0 },
            IntensitySample { timestamp: t0, intensity_g_per_kwh: 2.0 },
            IntensitySample { timestamp: t1, intensity_g_per_kwh: 3.0 },
        ];
        sort_by_timestamp(&mut samples);
        let values: Vec<f64> = samples.iter().map(|s| s.intensity_g_per_kwh).collect();
        assert_eq!(values, vec![2.0, 1.0, 3.0]);
    }
}
