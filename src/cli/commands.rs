use std::io::{self, Write};

use chrono::Local;

use crate::app::{AppContext, LookupMode, Result};
use crate::cli::alfred::{AlfredResponse, Severity};
use crate::cli::render;
use crate::fetcher::FetchOutcome;

const NO_SCHEDULE: &str = "No prayer times available for today";

pub async fn show_prayer_times(ctx: &AppContext, zone: Option<&str>, mode: LookupMode) -> Result<()> {
    let day = ctx.prayer_times(zone, mode, Local::now()).await?;
    let mut out = io::stdout().lock();

    match (day, ctx.config.is_alfred()) {
        (Some(day), false) => render::write_day(&mut out, &day)?,
        (Some(day), true) => AlfredResponse::from_day(&day).write_to(&mut out)?,
        (None, false) => eprintln!("{}", NO_SCHEDULE),
        (None, true) => AlfredResponse::notice(
            Severity::Warning,
            NO_SCHEDULE,
            Some("The schedule could not be fetched, try again later"),
        )
        .write_to(&mut out)?,
    }

    Ok(())
}

pub async fn list_zones(ctx: &AppContext) -> Result<()> {
    let regions = ctx.catalog.regions().await?;
    let mut out = io::stdout().lock();

    if ctx.config.is_alfred() {
        return AlfredResponse::from_regions(&regions).write_to(&mut out);
    }

    if regions.is_empty() {
        eprintln!("No zones available");
        return Ok(());
    }

    render::write_regions(&mut out, &regions)?;
    Ok(())
}

pub async fn set_zone(ctx: &AppContext, zone_id: Option<&str>) -> Result<()> {
    let zone = ctx.set_default_zone(zone_id.unwrap_or_default()).await?;
    let mut out = io::stdout().lock();

    if ctx.config.is_alfred() {
        let title = format!("Default zone set to {}", zone.id);
        return AlfredResponse::notice(Severity::Info, &title, Some(&zone.locations)).write_to(&mut out);
    }

    writeln!(out, "Default zone set to {} ({})", zone.id, zone.locations)?;
    Ok(())
}

pub async fn update_schedule(ctx: &AppContext, zone: Option<&str>) -> Result<()> {
    let (zone, outcome) = ctx.refresh_schedule(zone).await?;

    match outcome {
        FetchOutcome::Fetched(count) => {
            println!("Cached {} days for {} ({})", count, zone.id, zone.locations);
        }
        FetchOutcome::Unavailable { reason } => {
            eprintln!("Schedule for {} is unavailable: {}", zone.id, reason);
        }
    }

    Ok(())
}
