//! Host stand command line for Datables: recommends tables, reports analytics, and texts waitlisted guests.

mod commands;
mod config;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use datables_core::{
    export::ExportFormat,
    model::{
        LocationId, Locations, ReservationSource, ReservationUpdate, SeatingPreference, TableUpdate,
        WaitlistUpdate,
    },
    validation::{ReservationRequest, WaitlistRequest},
    DatablesService,
};
use datables_provider_memory::{demo_locations, registry, LogSmsPort, Snapshot};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use crate::commands::Context;
use crate::config::Settings;

#[derive(Parser)]
#[command(name = "datables", version, about = "Restaurant host stand tools")]
struct Cli {
    /// Settings file.
    #[arg(long, default_value = "datables.toml")]
    config: PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// Location to act on. Falls back to the config file, then Tustin.
    #[arg(long, env = "DATABLES_LOCATION")]
    location: Option<String>,

    /// Pretend the current local time is this, e.g. 2026-01-30T19:00:00.
    #[arg(long, env = "DATABLES_NOW")]
    now: Option<NaiveDateTime>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the known locations.
    Locations,
    /// Rank open tables for a reservation.
    Recommend {
        reservation: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Seat a reservation at a table.
    Assign { reservation: String, table: String },
    /// Mark a reservation as a no-show, completed, or cancelled.
    Status {
        reservation: String,
        #[arg(value_enum)]
        change: StatusChange,
    },
    /// Clear, block, or unblock a table.
    Table {
        table: String,
        #[arg(value_enum)]
        change: TableChange,
    },
    /// Today's numbers, the last week, and the hourly load.
    Analytics {
        #[arg(long)]
        json: bool,
    },
    /// Compare locations over a date range and export the report.
    Compare {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Trailing days when `--start` is not given.
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        /// File or directory to write. Prints to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Comma separated location ids. All locations when omitted.
        #[arg(long, value_delimiter = ',')]
        locations: Vec<String>,
    },
    /// Put a walk-in party on the waitlist.
    Join {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        party: u32,
        /// Quoted wait in minutes.
        #[arg(long, default_value_t = 15)]
        quote: u32,
        #[arg(long, value_enum, default_value_t = Preference::Any)]
        preference: Preference,
        #[arg(long)]
        requests: Option<String>,
    },
    /// Text a waitlisted party that their table is ready.
    Notify { entry: String },
    /// Take a party off the waitlist.
    Waitlist {
        entry: String,
        #[arg(value_enum)]
        change: WaitlistChange,
    },
    /// Add a tag to a guest profile, or remove it with `--remove`.
    Tag {
        guest: String,
        tag: String,
        #[arg(long)]
        remove: bool,
    },
    /// Search guest profiles by name, phone, or email.
    Guests {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Take a new reservation.
    Book {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        party: u32,
        /// Defaults to the next half hour.
        #[arg(long)]
        at: Option<NaiveDateTime>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, value_enum, default_value_t = Preference::Any)]
        preference: Preference,
        #[arg(long, value_enum, default_value_t = Source::Phone)]
        source: Source,
        #[arg(long)]
        requests: Option<String>,
        #[arg(long, default_value_t = 0)]
        high_chairs: u32,
        #[arg(long, default_value_t = 0)]
        kids: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Preference {
    Inside,
    Bar,
    Patio,
    Any,
}

impl From<Preference> for SeatingPreference {
    fn from(preference: Preference) -> Self {
        match preference {
            Preference::Inside => SeatingPreference::Inside,
            Preference::Bar => SeatingPreference::Bar,
            Preference::Patio => SeatingPreference::Patio,
            Preference::Any => SeatingPreference::Any,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    IosApp,
    Phone,
    WalkIn,
    Web,
}

impl From<Source> for ReservationSource {
    fn from(source: Source) -> Self {
        match source {
            Source::IosApp => ReservationSource::IosApp,
            Source::Phone => ReservationSource::Phone,
            Source::WalkIn => ReservationSource::WalkIn,
            Source::Web => ReservationSource::Web,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusChange {
    NoShow,
    Complete,
    Cancel,
}

impl From<StatusChange> for ReservationUpdate {
    fn from(change: StatusChange) -> Self {
        match change {
            StatusChange::NoShow => ReservationUpdate::NoShow,
            StatusChange::Complete => ReservationUpdate::Complete,
            StatusChange::Cancel => ReservationUpdate::Cancel,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TableChange {
    Clear,
    Block,
    Unblock,
}

impl From<TableChange> for TableUpdate {
    fn from(change: TableChange) -> Self {
        match change {
            TableChange::Clear => TableUpdate::Clear,
            TableChange::Block => TableUpdate::Block,
            TableChange::Unblock => TableUpdate::Unblock,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum WaitlistChange {
    Seat,
    Expire,
    Cancel,
}

impl From<WaitlistChange> for WaitlistUpdate {
    fn from(change: WaitlistChange) -> Self {
        match change {
            WaitlistChange::Seat => WaitlistUpdate::Seat,
            WaitlistChange::Expire => WaitlistUpdate::Expire,
            WaitlistChange::Cancel => WaitlistUpdate::Cancel,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let settings = Settings::load(&cli.config)?;
    let hours = settings.service_hours()?;
    let now = cli.now.unwrap_or_else(|| Local::now().naive_local());

    // Records come from the snapshot once one exists, demo data otherwise.
    let snapshot = settings.snapshot_path(&cli.config);
    let locations = match &snapshot {
        Some(path) if path.exists() => Snapshot::load(path)
            .and_then(|snapshot| snapshot.into_locations(now.year()))
            .with_context(|| format!("loading snapshot {}", path.display()))?,
        _ => {
            debug!("using demo data");
            demo_locations(now)
        }
    };

    let service = DatablesService::new(Arc::new(registry(&locations)), Arc::new(LogSmsPort), hours);
    let location = cli
        .location
        .map(|id| LocationId::from(id.as_str()))
        .or_else(|| settings.location.clone())
        .unwrap_or_else(|| Locations::Tustin.into());

    let ctx = Context {
        service,
        locations,
        snapshot,
        location,
        now,
    };

    match cli.command {
        Command::Locations => commands::list_locations(&ctx),
        Command::Recommend {
            reservation,
            limit,
            json,
        } => commands::recommend(&ctx, &reservation, limit, json).await,
        Command::Assign { reservation, table } => commands::assign(&ctx, &reservation, &table).await,
        Command::Status { reservation, change } => {
            commands::update_reservation(&ctx, &reservation, change.into()).await
        }
        Command::Table { table, change } => commands::update_table(&ctx, &table, change.into()).await,
        Command::Analytics { json } => commands::analytics(&ctx, json).await,
        Command::Compare {
            start,
            end,
            days,
            format,
            output,
            locations,
        } => {
            let range = commands::comparison_range(now.date(), start, end, days);
            commands::compare(&ctx, range, &locations, format, output.as_deref()).await
        }
        Command::Join {
            name,
            phone,
            party,
            quote,
            preference,
            requests,
        } => {
            let request = WaitlistRequest {
                location_id: ctx.location.clone(),
                guest_name: name,
                guest_phone: phone,
                party_size: party,
                quoted_wait_minutes: quote,
                seating_preference: preference.into(),
                special_requests: requests,
            };
            commands::join_waitlist(&ctx, request).await
        }
        Command::Notify { entry } => commands::notify(&ctx, &entry).await,
        Command::Waitlist { entry, change } => commands::update_waitlist(&ctx, &entry, change.into()).await,
        Command::Tag { guest, tag, remove } => commands::tag_guest(&ctx, &guest, &tag, remove).await,
        Command::Guests { query, json } => commands::guests(&ctx, &query, json).await,
        Command::Book {
            name,
            phone,
            party,
            at,
            email,
            preference,
            source,
            requests,
            high_chairs,
            kids,
        } => {
            let request = ReservationRequest {
                location_id: ctx.location.clone(),
                guest_name: name,
                guest_phone: phone,
                guest_email: email,
                party_size: party,
                date_time: at.unwrap_or_else(|| commands::next_half_hour(now)),
                seating_preference: preference.into(),
                special_requests: requests,
                source: source.into(),
                high_chairs,
                kids_in_party: kids,
            };
            commands::book(&ctx, request).await
        }
    }
}

/// Logs go to stderr so JSON output stays machine readable.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` picks debug over warn.
fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
