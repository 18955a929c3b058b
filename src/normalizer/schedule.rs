use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::Value;

use crate::app::Result;
use crate::domain::schedule::{
    DATE_FORMAT, DISPLAY_TIME_FORMAT, REMOTE_DATE_FORMAT, REMOTE_TIME_FORMAT,
};
use crate::domain::{Marker, ScheduleEntry};

/// Which [`ScheduleEntry`] field a remote value lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Date,
    Hijri,
    Marker(Marker),
}

/// How a remote value is re-rendered on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Verbatim,
    Date { from: &'static str, to: &'static str },
    Time { from: &'static str, to: &'static str },
}

impl Layout {
    /// Parse with `from` and render with `to`; the raw value is kept when it does not parse.
    pub fn convert(self, raw: &str) -> String {
        let converted = match self {
            Layout::Verbatim => None,
            Layout::Date { from, to } => NaiveDate::parse_from_str(raw, from)
                .ok()
                .map(|d| d.format(to).to_string()),
            Layout::Time { from, to } => NaiveTime::parse_from_str(raw, from)
                .ok()
                .map(|t| t.format(to).to_string()),
        };
        converted.unwrap_or_else(|| raw.to_string())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub remote: &'static str,
    pub target: Target,
    pub layout: Layout,
}

const fn marker_field(marker: Marker) -> FieldMapping {
    FieldMapping {
        remote: marker.remote_key(),
        target: Target::Marker(marker),
        layout: Layout::Time {
            from: REMOTE_TIME_FORMAT,
            to: DISPLAY_TIME_FORMAT,
        },
    }
}

/// Remote key → entry field, with the format conversion applied to each.
pub const SCHEDULE_FIELDS: [FieldMapping; 9] = [
    FieldMapping {
        remote: "hijri",
        target: Target::Hijri,
        layout: Layout::Verbatim,
    },
    FieldMapping {
        remote: "date",
        target: Target::Date,
        layout: Layout::Date {
            from: REMOTE_DATE_FORMAT,
            to: DATE_FORMAT,
        },
    },
    marker_field(Marker::Imsak),
    marker_field(Marker::Fajr),
    marker_field(Marker::Syuruk),
    marker_field(Marker::Dhuhr),
    marker_field(Marker::Asr),
    marker_field(Marker::Maghrib),
    marker_field(Marker::Isha),
];

#[derive(Debug, Deserialize)]
struct SchedulePayload {
    #[serde(rename = "prayerTime", default)]
    prayer_time: Option<Vec<HashMap<String, Value>>>,
}

/// Parse the yearly schedule payload into entries.
///
/// Entries come back without zone or id; the fetcher assigns those.
pub fn parse_schedule(body: &[u8]) -> Result<Vec<ScheduleEntry>> {
    let payload: SchedulePayload = serde_json::from_slice(body)?;
    let entries = payload
        .prayer_time
        .unwrap_or_default()
        .iter()
        .map(normalize_entry)
        .collect();
    Ok(entries)
}

fn normalize_entry(raw: &HashMap<String, Value>) -> ScheduleEntry {
    let mut entry = ScheduleEntry::default();

    for mapping in &SCHEDULE_FIELDS {
        let Some(value) = raw.get(mapping.remote).and_then(value_text) else {
            continue;
        };
        let value = mapping.layout.convert(&value);
        match mapping.target {
            Target::Date => entry.date = value,
            Target::Hijri => entry.hijri = value,
            Target::Marker(marker) => *entry.marker_mut(marker) = value,
        }
    }

    entry
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
