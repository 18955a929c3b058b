use chrono::{DateTime, Local};

use crate::app::{AppContext, Result, WaktuError};
use crate::config::ZONE_SETTING_KEY;
use crate::domain::{ResolvedPeriod, ScheduleEntry, Zone};
use crate::fetcher::FetchOutcome;
use crate::store::Store;

/// Range of a lookup. Only `Daily` reads the cache; the wider modes always
/// refresh the year from the remote source and report today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LookupMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Today's schedule with its markers resolved against the wall clock.
#[derive(Debug, Clone)]
pub struct DaySchedule {
    pub entry: ScheduleEntry,
    pub periods: Vec<ResolvedPeriod>,
}

impl DaySchedule {
    pub fn resolve(entry: ScheduleEntry, now: DateTime<Local>) -> Self {
        let periods = entry.periods(now);
        Self { entry, periods }
    }

    pub fn locations(&self) -> &str {
        self.entry.locations().unwrap_or_default()
    }

    pub fn current(&self) -> Option<&ResolvedPeriod> {
        self.periods.iter().find(|p| p.is_current)
    }
}

impl AppContext {
    /// Zone to use: explicit argument, then the stored preference, then the configured default.
    pub fn preferred_zone(&self, explicit: Option<&str>) -> String {
        if let Some(zone) = explicit.map(str::trim).filter(|z| !z.is_empty()) {
            return zone.to_uppercase();
        }

        match self.store.get_setting(ZONE_SETTING_KEY) {
            Ok(Some(zone)) if !zone.is_empty() => return zone.to_uppercase(),
            Ok(_) => {}
            Err(e) => tracing::warn!("Could not read the preferred zone: {}", e),
        }

        self.config.default_zone.to_uppercase()
    }

    /// Resolve today's prayer times for a zone.
    ///
    /// A cache miss, or a failed cache read, falls through to a remote fetch
    /// of the whole year. `Ok(None)` means nothing is known for today.
    pub async fn prayer_times(
        &self,
        zone: Option<&str>,
        mode: LookupMode,
        now: DateTime<Local>,
    ) -> Result<Option<DaySchedule>> {
        let zone_id = self.preferred_zone(zone);
        let zone = self
            .catalog
            .resolve_zone(&zone_id)
            .await?
            .ok_or_else(|| WaktuError::ZoneNotFound(zone_id.clone()))?;

        let today = now.date_naive();

        if mode == LookupMode::Daily {
            match self.store.lookup_schedule(&zone_id, today) {
                Ok(Some(entry)) => {
                    tracing::debug!("Cache hit for {} on {}", zone_id, entry.date);
                    return Ok(Some(DaySchedule::resolve(entry, now)));
                }
                Ok(None) => tracing::debug!("Cache miss for {} on {}", zone_id, today),
                Err(e) => tracing::warn!("Cache read for {} failed, refetching: {}", zone_id, e),
            }
        }

        let entries = self
            .schedule
            .fetch_year_schedule(&zone_id, Some(&zone))
            .await?
            .unwrap_or_default();

        Ok(entries
            .into_iter()
            .find(|e| e.is_on(today))
            .map(|e| DaySchedule::resolve(e, now)))
    }

    /// Validate a zone id and store it as the preferred zone.
    pub async fn set_default_zone(&self, zone_id: &str) -> Result<Zone> {
        let zone_id = zone_id.trim().to_uppercase();
        if zone_id.is_empty() {
            return Err(WaktuError::MissingZone);
        }

        let zone = self
            .catalog
            .resolve_zone(&zone_id)
            .await?
            .ok_or_else(|| WaktuError::ZoneNotFound(zone_id.clone()))?;

        self.store.set_setting(ZONE_SETTING_KEY, &zone.id)?;
        tracing::info!("Default zone set to {}", zone.id);
        Ok(zone)
    }

    /// Refetch the year for a zone regardless of what is cached.
    pub async fn refresh_schedule(&self, zone: Option<&str>) -> Result<(Zone, FetchOutcome<usize>)> {
        let zone_id = self.preferred_zone(zone);
        let zone = self
            .catalog
            .resolve_zone(&zone_id)
            .await?
            .ok_or_else(|| WaktuError::ZoneNotFound(zone_id.clone()))?;

        let outcome = match self.schedule.fetch_year_schedule(&zone_id, Some(&zone)).await? {
            FetchOutcome::Fetched(entries) => FetchOutcome::Fetched(entries.len()),
            FetchOutcome::Unavailable { reason } => FetchOutcome::Unavailable { reason },
        };
        Ok((zone, outcome))
    }
}
