//! Subcommand handlers. Each writes its result to stdout.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use datables_core::{
    analytics::{format_hour, percent_change},
    export::{export_filename, render, ExportFormat},
    model::{
        DateRange, GuestId, LocationId, ReservationId, ReservationUpdate, TableId, TableUpdate,
        WaitlistEntryId, WaitlistUpdate,
    },
    notify::format_phone,
    validation::{ReservationRequest, WaitlistRequest},
    DatablesService,
};
use datables_provider_memory::{MemoryLocation, Snapshot};
use serde::Serialize;
use tracing::info;

/// Everything a command needs.
pub(crate) struct Context {
    pub(crate) service: DatablesService,
    pub(crate) locations: Vec<MemoryLocation>,
    pub(crate) snapshot: Option<PathBuf>,
    pub(crate) location: LocationId,
    pub(crate) now: NaiveDateTime,
}

impl Context {
    /// Write every location's records back to the snapshot file, if one is configured.
    async fn persist(&self) -> Result<()> {
        if let Some(path) = &self.snapshot {
            Snapshot::capture(&self.locations)
                .await
                .save(path)
                .with_context(|| format!("saving snapshot to {}", path.display()))?;
        }
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

pub(crate) fn list_locations(ctx: &Context) -> Result<()> {
    let mut out = io::stdout().lock();
    for (id, name) in ctx.service.locations() {
        let marker = if id == ctx.location { "*" } else { " " };
        writeln!(out, "{marker} {:<12} {name}", id.0)?;
    }
    Ok(())
}

pub(crate) async fn recommend(ctx: &Context, reservation: &str, limit: usize, json: bool) -> Result<()> {
    let ranked = ctx
        .service
        .recommend_tables(&ctx.location, &ReservationId::from(reservation))
        .await?;
    let top: Vec<_> = ranked.into_iter().take(limit).collect();
    if json {
        return print_json(&top);
    }

    let mut out = io::stdout().lock();
    if top.is_empty() {
        writeln!(out, "No seatable tables")?;
    }
    for rec in &top {
        writeln!(
            out,
            "Table {:<4} {:>3}  {:?}  ({}, seats {})",
            rec.table.number,
            rec.match_score,
            rec.level(),
            rec.table.section,
            rec.table.capacity
        )?;
        for reason in &rec.reasons {
            writeln!(out, "    + {reason}")?;
        }
        for warning in &rec.warnings {
            writeln!(out, "    ! {warning}")?;
        }
    }
    Ok(())
}

pub(crate) async fn assign(ctx: &Context, reservation: &str, table: &str) -> Result<()> {
    let (seated, occupied) = ctx
        .service
        .assign_table(
            &ctx.location,
            &ReservationId::from(reservation),
            &TableId::from(table),
        )
        .await?;
    ctx.persist().await?;
    writeln!(
        io::stdout().lock(),
        "Seated {} (party of {}) at table {}",
        seated.guest_name,
        seated.party_size,
        occupied.number
    )?;
    Ok(())
}

pub(crate) async fn update_reservation(ctx: &Context, reservation: &str, update: ReservationUpdate) -> Result<()> {
    let updated = ctx
        .service
        .update_reservation(&ctx.location, &ReservationId::from(reservation), update)
        .await?;
    ctx.persist().await?;
    writeln!(
        io::stdout().lock(),
        "Reservation {} ({}) is now {}",
        updated.id,
        updated.guest_name,
        updated.status
    )?;
    Ok(())
}

pub(crate) async fn update_table(ctx: &Context, table: &str, update: TableUpdate) -> Result<()> {
    let updated = ctx
        .service
        .update_table(&ctx.location, &TableId::from(table), update)
        .await?;
    ctx.persist().await?;
    writeln!(io::stdout().lock(), "Table {} is now {}", updated.number, updated.status)?;
    Ok(())
}

pub(crate) async fn analytics(ctx: &Context, json: bool) -> Result<()> {
    let report = ctx.service.location_analytics(&ctx.location, ctx.now).await?;
    if json {
        return print_json(&report);
    }

    let mut out = io::stdout().lock();
    let today = &report.today;
    let week = &report.week;
    writeln!(out, "{} as of {}", report.location_id, report.generated_at.format("%Y-%m-%d %H:%M"))?;
    writeln!(
        out,
        "Today: {} reservations, {} covers, average party {:.1}",
        today.total_reservations, today.total_covers, today.average_party_size
    )?;
    writeln!(
        out,
        "Floor: {} seated, {}% utilization, {} waiting (average quote {} min)",
        today.currently_seated, today.table_utilization, today.waitlist_depth, today.average_wait_time
    )?;
    writeln!(
        out,
        "Last 7 days: {} reservations, {} covers, {}% no-shows",
        week.total_reservations, week.total_covers, week.no_show_rate
    )?;
    if let [.., yesterday, latest] = report.trend.as_slice() {
        let change = percent_change(f64::from(latest.covers), f64::from(yesterday.covers));
        writeln!(out, "Covers vs yesterday: {}", change.display)?;
    }
    if let Some(peak) = report.hourly.peak() {
        writeln!(out, "Peak hour: {} ({} reservations)", format_hour(peak.hour), peak.reservations)?;
    }
    let sources: Vec<String> = report
        .source_breakdown
        .iter()
        .map(|share| format!("{} {}%", share.source, share.percentage))
        .collect();
    writeln!(out, "Sources: {}", sources.join(", "))?;
    Ok(())
}

/// Dates a comparison covers: explicit bounds win, otherwise the trailing `days` up to today.
pub(crate) fn comparison_range(
    today: NaiveDate,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    days: u32,
) -> DateRange {
    let end = end.unwrap_or(today);
    match start {
        Some(start) => DateRange { start, end },
        None => DateRange::trailing(end, days),
    }
}

pub(crate) async fn compare(
    ctx: &Context,
    range: DateRange,
    locations: &[String],
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let ids: Vec<LocationId> = locations.iter().map(|id| LocationId::from(id.as_str())).collect();
    let report = ctx.service.compare_locations(&ids, range).await?;
    let rendered = render(&report, format)?;

    match output {
        None => writeln!(io::stdout().lock(), "{rendered}")?,
        Some(path) => {
            let target = if path.is_dir() {
                path.join(export_filename(report.date_range, format))
            } else {
                path.to_path_buf()
            };
            fs::write(&target, rendered)
                .with_context(|| format!("writing {}", target.display()))?;
            info!(path = %target.display(), mime = format.mime_type(), "report exported");
            writeln!(io::stdout().lock(), "Wrote {}", target.display())?;
        }
    }
    Ok(())
}

pub(crate) async fn notify(ctx: &Context, entry: &str) -> Result<()> {
    let log = ctx
        .service
        .notify_waitlist_guest(&ctx.location, &WaitlistEntryId::from(entry), ctx.now)
        .await?;
    ctx.persist().await?;
    writeln!(
        io::stdout().lock(),
        "{} to {}: {}",
        log.status,
        format_phone(&log.phone),
        log.message
    )?;
    Ok(())
}

pub(crate) async fn join_waitlist(ctx: &Context, request: WaitlistRequest) -> Result<()> {
    let entry = ctx.service.join_waitlist(request, ctx.now).await?;
    ctx.persist().await?;
    writeln!(
        io::stdout().lock(),
        "Added {} (party of {}) to the waitlist, quoted {} min ({})",
        entry.guest_name,
        entry.party_size,
        entry.quoted_wait_minutes,
        entry.id
    )?;
    Ok(())
}

pub(crate) async fn update_waitlist(ctx: &Context, entry: &str, update: WaitlistUpdate) -> Result<()> {
    let updated = ctx
        .service
        .update_waitlist_entry(&ctx.location, &WaitlistEntryId::from(entry), update)
        .await?;
    ctx.persist().await?;
    writeln!(
        io::stdout().lock(),
        "Waitlist entry {} ({}) is now {}",
        updated.id,
        updated.guest_name,
        updated.status
    )?;
    Ok(())
}

pub(crate) async fn tag_guest(ctx: &Context, guest: &str, tag: &str, remove: bool) -> Result<()> {
    let guest = GuestId::from(guest);
    let profile = if remove {
        ctx.service.untag_guest(&ctx.location, &guest, tag).await?
    } else {
        ctx.service.tag_guest(&ctx.location, &guest, tag).await?
    };
    ctx.persist().await?;
    writeln!(io::stdout().lock(), "{}: [{}]", profile.name, profile.tags.join(", "))?;
    Ok(())
}

pub(crate) async fn guests(ctx: &Context, query: &str, json: bool) -> Result<()> {
    let found = ctx.service.search_guests(&ctx.location, query).await?;
    if json {
        return print_json(&found);
    }

    let mut out = io::stdout().lock();
    if found.is_empty() {
        writeln!(out, "No guests match {query:?}")?;
    }
    for guest in &found {
        let last = guest
            .last_visit
            .map_or_else(|| "never".to_owned(), |date| date.to_string());
        writeln!(
            out,
            "{:<18} {:<18} visits {:>3}  last {}  [{}]",
            guest.name,
            format_phone(&guest.phone),
            guest.total_visits,
            last,
            guest.tags.join(", ")
        )?;
    }
    Ok(())
}

pub(crate) async fn book(ctx: &Context, request: ReservationRequest) -> Result<()> {
    let booked = ctx.service.book_reservation(request).await?;
    ctx.persist().await?;
    writeln!(
        io::stdout().lock(),
        "Booked {} for {} at {} ({})",
        booked.guest_name,
        booked.party_size,
        booked.date_time.format("%Y-%m-%d %-I:%M %p"),
        booked.id
    )?;
    Ok(())
}

/// Default booking time: the next half hour after `now`.
pub(crate) fn next_half_hour(now: NaiveDateTime) -> NaiveDateTime {
    let date = now.date();
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or(now);
    let minutes = (now - midnight).num_minutes();
    midnight + Duration::minutes((minutes / 30 + 1) * 30)
}
