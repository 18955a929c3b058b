use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::app::DaySchedule;
use crate::domain::Region;

pub fn write_day<W: Write>(out: &mut W, day: &DaySchedule) -> io::Result<()> {
    writeln!(
        out,
        "{}\t\t: {} {}",
        "Date".blue(),
        day.entry.date,
        day.entry.hijri.as_str().magenta()
    )?;
    writeln!(out, "{}\t: {}", "Locations".blue(), day.locations())?;

    for period in &day.periods {
        let desc = if period.is_current {
            "*Current".red().to_string()
        } else {
            period.time_until().unwrap_or_default()
        };
        writeln!(
            out,
            "{}\t: {} {}",
            period.label().cyan(),
            period.display.as_str().yellow(),
            desc
        )?;
    }

    Ok(())
}

pub fn write_regions<W: Write>(out: &mut W, regions: &[Region]) -> io::Result<()> {
    for region in regions {
        writeln!(out, "{}", format!("State: {}", region.name).blue())?;
        for zone in &region.zones {
            writeln!(
                out,
                "{} - {}",
                zone.id.as_str().cyan(),
                zone.locations.as_str().yellow()
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate, TimeZone};

    use super::*;
    use crate::domain::{ScheduleEntry, Zone};

    fn sample_day() -> DaySchedule {
        let mut entry = ScheduleEntry {
            date: "15/03/2024".into(),
            hijri: "1445-09-05".into(),
            imsak: "05:58AM".into(),
            fajr: "06:08AM".into(),
            syuruk: "07:17AM".into(),
            dhuhr: "01:22PM".into(),
            asr: "04:26PM".into(),
            maghrib: "07:24PM".into(),
            isha: "08:36PM".into(),
            ..Default::default()
        };
        entry.attach_zone("WLY01", Some(&Zone::new("WLY01", "Kuala Lumpur, Putrajaya")));

        let now = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        DaySchedule::resolve(entry, Local.from_local_datetime(&now).earliest().unwrap())
    }

    #[test]
    fn test_write_day() {
        let mut out = Vec::new();
        write_day(&mut out, &sample_day()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("15/03/2024"));
        assert!(lines[1].contains("Kuala Lumpur, Putrajaya"));
        assert!(lines[5].contains("Zohor") && lines[5].contains("*Current"));
        assert!(lines[6].contains("Asar") && lines[6].contains("2 hours 26 min"));
        assert!(!lines[2].contains("*Current"));
    }

    #[test]
    fn test_write_regions() {
        let regions = vec![Region::from_zones(
            "Johor".into(),
            vec![Zone::new("JHR01", "Pulau Aur"), Zone::new("JHR02", "Kota Tinggi")],
        )
        .unwrap()];

        let mut out = Vec::new();
        write_regions(&mut out, &regions).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("State: Johor"));
        assert!(text.contains("JHR02"));
        assert!(text.contains("Kota Tinggi"));
    }
}
