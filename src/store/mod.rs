pub mod sqlite;

use chrono::{Local, NaiveDate};

use crate::app::Result;
use crate::domain::{Region, ScheduleEntry, Zone};

pub use sqlite::SqliteStore;

pub trait Store {
    // Catalog operations
    fn upsert_regions(&self, regions: &[Region]) -> Result<usize>;
    fn get_regions(&self) -> Result<Vec<Region>>;
    fn get_zone(&self, id: &str) -> Result<Option<Zone>>;
    fn count_zones(&self) -> Result<i64>;

    // Schedule operations
    fn upsert_schedule(&self, entries: &[ScheduleEntry]) -> Result<usize>;
    fn lookup_schedule(&self, zone_id: &str, date: NaiveDate) -> Result<Option<ScheduleEntry>>;
    fn get_schedule(&self, zone_id: &str) -> Result<Vec<ScheduleEntry>>;

    fn lookup_today(&self, zone_id: &str) -> Result<Option<ScheduleEntry>> {
        self.lookup_schedule(zone_id, Local::now().date_naive())
    }

    // Settings
    fn get_setting(&self, key: &str) -> Result<Option<String>>;
    fn set_setting(&self, key: &str, value: &str) -> Result<()>;
}
