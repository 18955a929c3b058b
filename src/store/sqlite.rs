use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, WaktuError};
use crate::domain::schedule::DATE_FORMAT;
use crate::domain::{Region, ScheduleEntry, Zone};
use crate::store::Store;

const UPSERT_REGION: &str = "INSERT INTO regions (id, name, position) VALUES (?1, ?2, ?3)
     ON CONFLICT(id) DO UPDATE SET name = excluded.name, position = excluded.position";

const UPSERT_ZONE: &str = "INSERT INTO zones (id, locations, region_id, position) VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(id) DO UPDATE SET
        locations = excluded.locations,
        region_id = excluded.region_id,
        position = excluded.position";

// Zones attached to schedule entries carry no catalog position; keep the stored one.
const UPSERT_ATTACHED_ZONE: &str = "INSERT INTO zones (id, locations, region_id) VALUES (?1, ?2, ?3)
     ON CONFLICT(id) DO UPDATE SET locations = excluded.locations, region_id = excluded.region_id";

const UPSERT_ENTRY: &str = "INSERT INTO schedule_entries
        (id, zone_id, date, hijri, imsak, fajr, syuruk, dhuhr, asr, maghrib, isha)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
     ON CONFLICT(id) DO UPDATE SET
        zone_id = excluded.zone_id,
        date = excluded.date,
        hijri = excluded.hijri,
        imsak = excluded.imsak,
        fajr = excluded.fajr,
        syuruk = excluded.syuruk,
        dhuhr = excluded.dhuhr,
        asr = excluded.asr,
        maghrib = excluded.maghrib,
        isha = excluded.isha";

const SELECT_ENTRY: &str = "SELECT s.id, s.zone_id, s.date, s.hijri, s.imsak, s.fajr, s.syuruk,
        s.dhuhr, s.asr, s.maghrib, s.isha, z.id, z.locations, z.region_id
     FROM schedule_entries s LEFT JOIN zones z ON z.id = s.zone_id";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            WaktuError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> Result<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }

    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<ScheduleEntry> {
        let zone = match row.get::<_, Option<String>>(11)? {
            Some(id) => Some(Zone {
                id,
                locations: row.get(12)?,
                region_id: row.get(13)?,
            }),
            None => None,
        };

        Ok(ScheduleEntry {
            id: row.get(0)?,
            zone_id: row.get(1)?,
            date: row.get(2)?,
            hijri: row.get(3)?,
            imsak: row.get(4)?,
            fajr: row.get(5)?,
            syuruk: row.get(6)?,
            dhuhr: row.get(7)?,
            asr: row.get(8)?,
            maghrib: row.get(9)?,
            isha: row.get(10)?,
            zone,
        })
    }
}

impl Store for SqliteStore {
    fn upsert_regions(&self, regions: &[Region]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut zones = 0;

        for (position, region) in regions.iter().enumerate() {
            tx.execute(UPSERT_REGION, params![region.id, region.name, position as i64])?;

            for (zone_position, zone) in region.zones.iter().enumerate() {
                tx.execute(
                    UPSERT_ZONE,
                    params![zone.id, zone.locations, region.id, zone_position as i64],
                )?;
                zones += 1;
            }
        }

        tx.commit()?;
        Ok(zones)
    }

    fn get_regions(&self) -> Result<Vec<Region>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare("SELECT id, name FROM regions ORDER BY position, id")?;
        let mut regions = stmt
            .query_map([], |row| {
                Ok(Region {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    zones: Vec::new(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT id, locations, region_id FROM zones ORDER BY region_id, position, id",
        )?;
        let zones = stmt
            .query_map([], |row| {
                Ok(Zone {
                    id: row.get(0)?,
                    locations: row.get(1)?,
                    region_id: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for zone in zones {
            if let Some(region) = regions.iter_mut().find(|r| r.id == zone.region_id) {
                region.zones.push(zone);
            }
        }

        Ok(regions)
    }

    fn get_zone(&self, id: &str) -> Result<Option<Zone>> {
        let conn = self.conn()?;

        let result = conn
            .query_row(
                "SELECT id, locations, region_id FROM zones WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Zone {
                        id: row.get(0)?,
                        locations: row.get(1)?,
                        region_id: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    fn count_zones(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM zones", [], |row| row.get(0))?;
        Ok(count)
    }

    fn upsert_schedule(&self, entries: &[ScheduleEntry]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut seen_zones = HashSet::new();

        for entry in entries {
            if let Some(zone) = &entry.zone {
                if seen_zones.insert(zone.id.as_str()) {
                    tx.execute(
                        UPSERT_ATTACHED_ZONE,
                        params![zone.id, zone.locations, zone.region_id],
                    )?;
                }
            }

            tx.execute(
                UPSERT_ENTRY,
                params![
                    entry.id,
                    entry.zone_id,
                    entry.date,
                    entry.hijri,
                    entry.imsak,
                    entry.fajr,
                    entry.syuruk,
                    entry.dhuhr,
                    entry.asr,
                    entry.maghrib,
                    entry.isha
                ],
            )?;
        }

        tx.commit()?;
        Ok(entries.len())
    }

    fn lookup_schedule(&self, zone_id: &str, date: NaiveDate) -> Result<Option<ScheduleEntry>> {
        let conn = self.conn()?;

        let result = conn
            .query_row(
                &format!("{SELECT_ENTRY} WHERE s.zone_id = ?1 AND s.date = ?2 LIMIT 1"),
                params![zone_id, date.format(DATE_FORMAT).to_string()],
                Self::row_to_entry,
            )
            .optional()?;

        Ok(result)
    }

    fn get_schedule(&self, zone_id: &str) -> Result<Vec<ScheduleEntry>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!("{SELECT_ENTRY} WHERE s.zone_id = ?1 ORDER BY s.id"))?;
        let entries = stmt
            .query_map(params![zone_id], Self::row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;

        Ok(())
    }
}
