use serde::{Deserialize, Serialize};

/// A state-level grouping of zones as published in the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub zones: Vec<Zone>,
}

impl Region {
    /// Build a region from its zones.
    ///
    /// The catalog has no region codes of its own; the id is the first three
    /// characters of the first zone id (`JHR01` → `JHR`). Returns `None` for
    /// a region with no zones since no id can be derived.
    pub fn from_zones(name: String, zones: Vec<Zone>) -> Option<Self> {
        let id: String = zones.first()?.id.chars().take(3).collect();
        let zones = zones
            .into_iter()
            .map(|zone| Zone {
                region_id: id.clone(),
                ..zone
            })
            .collect();
        Some(Self { id, name, zones })
    }

    pub fn find_zone(&self, zone_id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == zone_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub locations: String,
    pub region_id: String,
}

impl Zone {
    pub fn new(id: impl Into<String>, locations: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            locations: locations.into(),
            region_id: String::new(),
        }
    }
}

/// Find a zone across a freshly fetched catalog.
pub fn find_zone<'a>(regions: &'a [Region], zone_id: &str) -> Option<&'a Zone> {
    regions.iter().find_map(|r| r.find_zone(zone_id))
}
