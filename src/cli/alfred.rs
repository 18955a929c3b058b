//! Alfred script-filter output.
//!
//! See <https://www.alfredapp.com/help/workflows/inputs/script-filter/json/>.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::app::{DaySchedule, Result};
use crate::domain::Region;

const SYSTEM_ICONS: &str = "/System/Library/CoreServices/CoreTypes.bundle/Contents/Resources/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    fn icon(self) -> AlfredIcon {
        let file = match self {
            Severity::Error => "AlertStopIcon.icns",
            Severity::Warning => "AlertCautionIcon.icns",
            Severity::Info => "AlertNoteIcon.icns",
        };
        AlfredIcon {
            path: format!("{SYSTEM_ICONS}{file}"),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct AlfredResponse {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
    pub items: Vec<AlfredItem>,
}

#[derive(Debug, Serialize)]
pub struct AlfredItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<AlfredIcon>,
}

#[derive(Debug, Serialize)]
pub struct AlfredIcon {
    pub path: String,
}

impl AlfredResponse {
    /// One item per marker, the zone's locations exported as a workflow variable.
    pub fn from_day(day: &DaySchedule) -> Self {
        let mut variables = BTreeMap::new();
        variables.insert("Locations".to_string(), day.locations().to_string());

        let items = day
            .periods
            .iter()
            .map(|period| {
                let subtitle = if period.is_current {
                    format!("{} | Current", period.display)
                } else if let Some(until) = period.time_until() {
                    format!("{} | In {}", period.display, until)
                } else {
                    period.display.clone()
                };
                AlfredItem {
                    title: period.label().to_string(),
                    subtitle: Some(subtitle),
                    arg: None,
                    valid: true,
                    icon: None,
                }
            })
            .collect();

        Self { variables, items }
    }

    pub fn from_regions(regions: &[Region]) -> Self {
        let items = regions
            .iter()
            .flat_map(|region| &region.zones)
            .map(|zone| AlfredItem {
                title: zone.id.clone(),
                subtitle: Some(zone.locations.clone()),
                arg: Some(zone.id.clone()),
                valid: true,
                icon: None,
            })
            .collect();

        Self {
            variables: BTreeMap::new(),
            items,
        }
    }

    /// A single non-actionable item, for errors and notices.
    pub fn notice(severity: Severity, title: &str, subtitle: Option<&str>) -> Self {
        Self {
            variables: BTreeMap::new(),
            items: vec![AlfredItem {
                title: title.to_string(),
                subtitle: subtitle.map(str::to_string),
                arg: None,
                valid: false,
                icon: Some(severity.icon()),
            }],
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        serde_json::to_writer(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}
