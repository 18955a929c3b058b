use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::period::{self, ResolvedPeriod};
use crate::domain::Zone;

/// Canonical storage and lookup format for schedule dates.
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// Date format used by the remote schedule payload (`15-Mar-2024`).
pub const REMOTE_DATE_FORMAT: &str = "%d-%b-%Y";
pub const REMOTE_TIME_FORMAT: &str = "%H:%M:%S";
/// 12-hour form the markers are stored and displayed in (`01:22PM`).
pub const DISPLAY_TIME_FORMAT: &str = "%I:%M%p";
const ID_DATE_FORMAT: &str = "%Y%m%d";

/// The seven time-of-day markers of a daily schedule, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    Imsak,
    Fajr,
    Syuruk,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Marker {
    pub const ALL: [Marker; 7] = [
        Marker::Imsak,
        Marker::Fajr,
        Marker::Syuruk,
        Marker::Dhuhr,
        Marker::Asr,
        Marker::Maghrib,
        Marker::Isha,
    ];

    /// Display label, in the authority's own language.
    pub const fn label(self) -> &'static str {
        match self {
            Marker::Imsak => "Imsak",
            Marker::Fajr => "Subuh",
            Marker::Syuruk => "Syuruk",
            Marker::Dhuhr => "Zohor",
            Marker::Asr => "Asar",
            Marker::Maghrib => "Maghrib",
            Marker::Isha => "Isyak",
        }
    }

    /// Key of this marker in the remote JSON payload.
    pub const fn remote_key(self) -> &'static str {
        match self {
            Marker::Imsak => "imsak",
            Marker::Fajr => "fajr",
            Marker::Syuruk => "syuruk",
            Marker::Dhuhr => "dhuhr",
            Marker::Asr => "asr",
            Marker::Maghrib => "maghrib",
            Marker::Isha => "isha",
        }
    }
}

/// One day of prayer times for one zone.
///
/// Identified by `{YYYYMMDD}-{zone_id}`; `date` is kept as `DD/MM/YYYY`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: String,
    pub zone_id: String,
    pub date: String,
    pub hijri: String,
    pub imsak: String,
    pub fajr: String,
    pub syuruk: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
    /// Joined on read; set by the fetcher before persisting.
    pub zone: Option<Zone>,
}

impl ScheduleEntry {
    /// Derive the composite id from a canonical `DD/MM/YYYY` date.
    ///
    /// A date that does not parse still yields an id, with the slashes stripped.
    pub fn compose_id(date: &str, zone_id: &str) -> String {
        let compact = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map(|d| d.format(ID_DATE_FORMAT).to_string())
            .unwrap_or_else(|_| date.replace('/', ""));
        format!("{compact}-{zone_id}")
    }

    /// Assign the owning zone and recompute the id.
    pub fn attach_zone(&mut self, zone_id: &str, zone: Option<&Zone>) {
        self.zone_id = zone_id.to_string();
        self.id = Self::compose_id(&self.date, zone_id);
        self.zone = zone.cloned();
    }

    pub fn marker(&self, marker: Marker) -> &str {
        match marker {
            Marker::Imsak => &self.imsak,
            Marker::Fajr => &self.fajr,
            Marker::Syuruk => &self.syuruk,
            Marker::Dhuhr => &self.dhuhr,
            Marker::Asr => &self.asr,
            Marker::Maghrib => &self.maghrib,
            Marker::Isha => &self.isha,
        }
    }

    pub fn marker_mut(&mut self, marker: Marker) -> &mut String {
        match marker {
            Marker::Imsak => &mut self.imsak,
            Marker::Fajr => &mut self.fajr,
            Marker::Syuruk => &mut self.syuruk,
            Marker::Dhuhr => &mut self.dhuhr,
            Marker::Asr => &mut self.asr,
            Marker::Maghrib => &mut self.maghrib,
            Marker::Isha => &mut self.isha,
        }
    }

    pub fn markers(&self) -> Vec<(Marker, &str)> {
        Marker::ALL.iter().map(|&m| (m, self.marker(m))).collect()
    }

    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date == day.format(DATE_FORMAT).to_string()
    }

    pub fn locations(&self) -> Option<&str> {
        self.zone.as_ref().map(|z| z.locations.as_str())
    }

    /// Resolve this day's markers against `now`.
    ///
    /// Recomputed on every call: the current flag and durations depend on the wall clock.
    pub fn periods(&self, now: DateTime<Local>) -> Vec<ResolvedPeriod> {
        match self.naive_date() {
            Some(day) => period::resolve(day, &self.markers(), now),
            None => {
                tracing::warn!("Schedule {} has an unreadable date {:?}", self.id, self.date);
                Vec::new()
            }
        }
    }
}
