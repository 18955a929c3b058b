use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta};

use crate::domain::schedule::{Marker, DISPLAY_TIME_FORMAT, REMOTE_TIME_FORMAT};

/// A marker placed on the wall clock, relative to the moment it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPeriod {
    pub key: Marker,
    pub instant: DateTime<Local>,
    pub display: String,
    /// `instant - now`, rounded to whole seconds; negative once the marker has passed.
    pub duration: TimeDelta,
    pub is_current: bool,
}

impl ResolvedPeriod {
    pub fn label(&self) -> &'static str {
        self.key.label()
    }

    pub fn is_upcoming(&self) -> bool {
        self.duration > TimeDelta::zero()
    }

    /// Remaining time as text, e.g. `2 hours 5 min`; `None` once passed.
    pub fn time_until(&self) -> Option<String> {
        self.is_upcoming().then(|| format_timespan(self.duration))
    }
}

/// Resolve a day's markers against `now`, in chronological order.
///
/// The current marker is the latest one whose instant has passed. Before the
/// first marker of the day nothing is current; the previous day's last
/// marker is not carried over. Markers whose time cannot be read are skipped.
pub fn resolve(day: NaiveDate, markers: &[(Marker, &str)], now: DateTime<Local>) -> Vec<ResolvedPeriod> {
    let mut periods: Vec<ResolvedPeriod> = markers
        .iter()
        .filter_map(|&(key, shown)| {
            let Some(instant) = marker_instant(day, shown) else {
                tracing::debug!("Skipping {} with unreadable time {:?}", key.label(), shown);
                return None;
            };
            Some(ResolvedPeriod {
                key,
                instant,
                display: shown.to_string(),
                duration: round_to_seconds(instant - now),
                is_current: false,
            })
        })
        .collect();

    if let Some(current) = periods.iter().rposition(|p| p.duration < TimeDelta::zero()) {
        periods[current].is_current = true;
    }

    periods
}

/// Combine a day with a marker's time of day in the local zone.
///
/// Accepts both the stored 12-hour form and a raw 24-hour value that was
/// passed through unconverted.
fn marker_instant(day: NaiveDate, time: &str) -> Option<DateTime<Local>> {
    let time = NaiveTime::parse_from_str(time, DISPLAY_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(time, REMOTE_TIME_FORMAT))
        .ok()?;
    day.and_time(time).and_local_timezone(Local).earliest()
}

fn round_to_seconds(delta: TimeDelta) -> TimeDelta {
    let millis = delta.num_milliseconds();
    let secs = if millis >= 0 {
        (millis + 500) / 1000
    } else {
        (millis - 500) / 1000
    };
    TimeDelta::seconds(secs)
}

/// Render a duration as `1 hour 5 min 3 sec`, omitting zero units.
pub fn format_timespan(span: TimeDelta) -> String {
    let mut rest = span.num_seconds().max(0);
    let mut parts = Vec::new();

    let hours = rest / 3600;
    rest %= 3600;
    if hours > 0 {
        parts.push(format!("{hours} {}", if hours == 1 { "hour" } else { "hours" }));
    }
    let minutes = rest / 60;
    if minutes > 0 {
        parts.push(format!("{minutes} min"));
    }
    let seconds = rest % 60;
    if seconds > 0 {
        parts.push(format!("{seconds} sec"));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .from_local_datetime(&day().and_hms_opt(hour, minute, 0).unwrap())
            .earliest()
            .unwrap()
    }

    fn six_markers() -> Vec<(Marker, &'static str)> {
        vec![
            (Marker::Imsak, "05:00AM"),
            (Marker::Fajr, "07:00AM"),
            (Marker::Dhuhr, "01:00PM"),
            (Marker::Asr, "04:00PM"),
            (Marker::Maghrib, "07:00PM"),
            (Marker::Isha, "08:00PM"),
        ]
    }

    #[test]
    fn test_current_is_latest_passed_marker() {
        let periods = resolve(day(), &six_markers(), at(14, 30));

        let displays: Vec<&str> = periods.iter().map(|p| p.display.as_str()).collect();
        assert_eq!(
            displays,
            vec!["05:00AM", "07:00AM", "01:00PM", "04:00PM", "07:00PM", "08:00PM"]
        );

        let current: Vec<bool> = periods.iter().map(|p| p.is_current).collect();
        assert_eq!(current, vec![false, false, true, false, false, false]);
        assert_eq!(periods[2].key, Marker::Dhuhr);
    }

    #[test]
    fn test_no_current_before_first_marker() {
        let periods = resolve(day(), &six_markers(), at(4, 0));
        assert_eq!(periods.len(), 6);
        assert!(periods.iter().all(|p| !p.is_current));
        assert!(periods.iter().all(|p| p.is_upcoming()));
    }

    #[test]
    fn test_last_marker_current_late_evening() {
        let periods = resolve(day(), &six_markers(), at(23, 59));
        assert!(periods[5].is_current);
        assert_eq!(periods.iter().filter(|p| p.is_current).count(), 1);
    }

    #[test]
    fn test_durations_are_signed() {
        let periods = resolve(day(), &six_markers(), at(14, 30));
        assert_eq!(periods[2].duration, TimeDelta::minutes(-90));
        assert_eq!(periods[3].duration, TimeDelta::minutes(90));
        assert_eq!(periods[3].time_until().as_deref(), Some("1 hour 30 min"));
        assert_eq!(periods[2].time_until(), None);
    }

    #[test]
    fn test_accepts_raw_24_hour_times() {
        let markers = vec![(Marker::Imsak, "05:40:00"), (Marker::Fajr, "05:50:00")];
        let periods = resolve(day(), &markers, at(5, 45));
        assert!(periods[0].is_current);
        assert!(!periods[1].is_current);
    }

    #[test]
    fn test_unreadable_marker_skipped() {
        let markers = vec![(Marker::Imsak, "05:40AM"), (Marker::Fajr, "soon")];
        let periods = resolve(day(), &markers, at(12, 0));
        assert_eq!(periods.len(), 1);
        assert!(periods[0].is_current);
    }

    #[test]
    fn test_format_timespan() {
        assert_eq!(format_timespan(TimeDelta::seconds(3723)), "1 hour 2 min 3 sec");
        assert_eq!(format_timespan(TimeDelta::hours(3)), "3 hours");
        assert_eq!(format_timespan(TimeDelta::seconds(59)), "59 sec");
        assert_eq!(format_timespan(TimeDelta::zero()), "");
        assert_eq!(format_timespan(TimeDelta::seconds(-30)), "");
    }

    #[test]
    fn test_round_to_seconds() {
        assert_eq!(round_to_seconds(TimeDelta::milliseconds(1499)), TimeDelta::seconds(1));
        assert_eq!(round_to_seconds(TimeDelta::milliseconds(1500)), TimeDelta::seconds(2));
        assert_eq!(round_to_seconds(TimeDelta::milliseconds(-1500)), TimeDelta::seconds(-2));
    }
}
