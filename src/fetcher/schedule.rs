use std::sync::Arc;

use url::Url;

use crate::app::Result;
use crate::domain::{ScheduleEntry, Zone};
use crate::fetcher::{FetchOutcome, Fetcher};
use crate::normalizer::parse_schedule;
use crate::store::Store;

/// Period requested from the schedule endpoint; one request covers the whole year.
const SCHEDULE_PERIOD: &str = "year";

/// Downloads a zone's yearly schedule and writes it through to the cache.
pub struct ScheduleFetcher<S: Store> {
    store: Arc<S>,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    schedule_url: String,
}

impl<S: Store> ScheduleFetcher<S> {
    pub fn new(
        store: Arc<S>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        schedule_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            fetcher,
            schedule_url: schedule_url.into(),
        }
    }

    pub fn url_for(&self, zone_id: &str) -> Result<Url> {
        let url = Url::parse_with_params(
            &self.schedule_url,
            &[("period", SCHEDULE_PERIOD), ("zone", zone_id)],
        )?;
        Ok(url)
    }

    /// Fetch, normalize and cache a full year of entries for `zone_id`.
    ///
    /// Every fetched entry is upserted before returning; a failed write is
    /// returned as an error, anything on the remote side as `Unavailable`.
    pub async fn fetch_year_schedule(
        &self,
        zone_id: &str,
        zone: Option<&Zone>,
    ) -> Result<FetchOutcome<Vec<ScheduleEntry>>> {
        let url = self.url_for(zone_id)?;

        let body = match self.fetcher.fetch(url.as_str()).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to fetch schedule for {}: {}", zone_id, e);
                return Ok(FetchOutcome::unavailable(e));
            }
        };

        let mut entries = match parse_schedule(&body) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to parse schedule for {}: {}", zone_id, e);
                return Ok(FetchOutcome::unavailable(e));
            }
        };

        for entry in &mut entries {
            entry.attach_zone(zone_id, zone);
        }

        let count = self.store.upsert_schedule(&entries)?;
        tracing::info!("Cached {} schedule entries for {}", count, zone_id);

        Ok(FetchOutcome::Fetched(entries))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Region;
    use crate::fetcher::testing::StubFetcher;
    use crate::normalizer::fixtures::SCHEDULE_JSON;
    use crate::store::SqliteStore;

    const SCHEDULE_URL: &str = "https://esolat.test/index.php?r=esolatApi/takwimsolat";

    fn setup(fetcher: StubFetcher) -> (ScheduleFetcher<SqliteStore>, Arc<StubFetcher>, Arc<SqliteStore>, Zone) {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let region = Region::from_zones(
            "Wilayah Persekutuan".into(),
            vec![Zone::new("WLY01", "Kuala Lumpur, Putrajaya")],
        )
        .unwrap();
        store.upsert_regions(std::slice::from_ref(&region)).unwrap();

        let fetcher = Arc::new(fetcher);
        let schedule = ScheduleFetcher::new(store.clone(), fetcher.clone(), SCHEDULE_URL);
        (schedule, fetcher, store, region.zones[0].clone())
    }

    #[test]
    fn test_url_for_zone() {
        let (schedule, _, _, _) = setup(StubFetcher::new());
        let url = schedule.url_for("WLY01").unwrap();
        assert_eq!(
            url.as_str(),
            "https://esolat.test/index.php?r=esolatApi/takwimsolat&period=year&zone=WLY01"
        );
    }

    #[tokio::test]
    async fn test_fetch_assigns_ids_and_persists() {
        let (schedule, fetcher, store, zone) =
            setup(StubFetcher::new().route("zone=WLY01", SCHEDULE_JSON));

        let entries = schedule
            .fetch_year_schedule("WLY01", Some(&zone))
            .await
            .unwrap()
            .fetched()
            .unwrap();

        assert_eq!(
            fetcher.urls(),
            vec!["https://esolat.test/index.php?r=esolatApi/takwimsolat&period=year&zone=WLY01"]
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "20240315-WLY01");
        assert_eq!(entries[0].zone.as_ref(), Some(&zone));

        let day = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
        let cached = store.lookup_schedule("WLY01", day).unwrap().unwrap();
        assert_eq!(cached.id, "20240316-WLY01");
        assert_eq!(cached.maghrib, "07:24PM");
    }

    #[tokio::test]
    async fn test_refetch_does_not_duplicate() {
        let (schedule, _, store, zone) =
            setup(StubFetcher::new().route("zone=WLY01", SCHEDULE_JSON));

        schedule.fetch_year_schedule("WLY01", Some(&zone)).await.unwrap();
        schedule.fetch_year_schedule("WLY01", Some(&zone)).await.unwrap();

        assert_eq!(store.get_schedule("WLY01").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_source_is_unavailable() {
        let (schedule, _, store, zone) = setup(StubFetcher::new());

        let outcome = schedule.fetch_year_schedule("WLY01", Some(&zone)).await.unwrap();
        assert!(!outcome.is_fetched());
        assert!(store.get_schedule("WLY01").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_unavailable() {
        let (schedule, _, _, zone) =
            setup(StubFetcher::new().route("zone=WLY01", "<html>Service Unavailable</html>"));

        let outcome = schedule.fetch_year_schedule("WLY01", Some(&zone)).await.unwrap();
        assert!(outcome.unwrap_or_default().is_empty());
    }
}
