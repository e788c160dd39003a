//! JSON snapshots of every location's records.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use datables_core::{
    hours::Schedule,
    model::{GuestProfile, Location, LocationId, Reservation, Table, WaitlistEntry},
    notify::SmsTemplate,
};

use crate::store::{GuestBook, Records};
use crate::MemoryLocation;

#[derive(thiserror::Error, Debug)]
/// Errors raised while reading or writing a snapshot.
pub enum SnapshotError {
    /// Snapshot file could not be read or written.
    #[error("Snapshot {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
    /// Snapshot is not valid JSON of the expected shape.
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// A record points at a location the snapshot does not declare.
    #[error("{kind} {id} belongs to undeclared location {location}")]
    UndeclaredLocation {
        /// Record type.
        kind: &'static str,
        /// Record id.
        id: String,
        /// Location named by the record.
        location: LocationId,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Every record of every location, as stored on disk.
pub struct Snapshot {
    /// Locations in the snapshot.
    pub locations: Vec<Location>,
    /// Opening hours per location. Locations without an entry use the standard hours.
    #[serde(default)]
    pub schedules: BTreeMap<LocationId, Schedule>,
    /// Reservations of all locations.
    #[serde(default)]
    pub reservations: Vec<Reservation>,
    /// Tables of all locations.
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Waitlist entries of all locations.
    #[serde(default)]
    pub waitlist: Vec<WaitlistEntry>,
    /// Guest profiles, shared by all locations.
    #[serde(default)]
    pub guests: Vec<GuestProfile>,
    /// Message templates of all locations.
    #[serde(default)]
    pub templates: Vec<SmsTemplate>,
}

impl Snapshot {
    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] when the text is not a valid snapshot.
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let raw = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            locations = snapshot.locations.len(),
            reservations = snapshot.reservations.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Write the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] when serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    /// Gather the current records of `locations`.
    pub async fn capture(locations: &[MemoryLocation]) -> Self {
        let mut snapshot = Self::default();
        for location in locations {
            let records = location.store().records().await;
            snapshot.locations.push(location.meta().clone());
            snapshot
                .schedules
                .insert(location.meta().id.clone(), location.schedule().clone());
            snapshot.reservations.extend(records.reservations);
            snapshot.tables.extend(records.tables);
            snapshot.waitlist.extend(records.waitlist);
            for guest in location.store().guest_book().profiles().await {
                if !snapshot.guests.iter().any(|known| known.id == guest.id) {
                    snapshot.guests.push(guest);
                }
            }
            snapshot.templates.extend(location.templates().iter().cloned());
        }
        snapshot
    }

    /// Split the snapshot into one in-memory location per declared location.
    /// All of them share a single guest book.
    ///
    /// `year` picks the holidays of the standard schedule for locations without one.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::UndeclaredLocation`] when a record names a location the
    /// snapshot does not declare.
    pub fn into_locations(self, year: i32) -> Result<Vec<MemoryLocation>, SnapshotError> {
        let Snapshot {
            locations,
            mut schedules,
            reservations,
            tables,
            waitlist,
            guests,
            templates,
        } = self;

        let guests = Arc::new(GuestBook::new(guests));
        let mut buckets: BTreeMap<LocationId, (Records, Vec<SmsTemplate>)> = locations
            .iter()
            .map(|location| (location.id.clone(), (Records::default(), Vec::new())))
            .collect();

        for reservation in reservations {
            let id = reservation.id.0.clone();
            bucket(&mut buckets, &reservation.location_id, "Reservation", id)?
                .0
                .reservations
                .push(reservation);
        }
        for table in tables {
            let id = table.id.0.clone();
            bucket(&mut buckets, &table.location_id, "Table", id)?.0.tables.push(table);
        }
        for entry in waitlist {
            let id = entry.id.0.clone();
            bucket(&mut buckets, &entry.location_id, "Waitlist entry", id)?
                .0
                .waitlist
                .push(entry);
        }
        for template in templates {
            let id = template.id.clone();
            bucket(&mut buckets, &template.location_id, "Template", id)?
                .1
                .push(template);
        }

        Ok(locations
            .into_iter()
            .map(|meta| {
                let (records, templates) = buckets.remove(&meta.id).unwrap_or_default();
                let schedule = schedules
                    .remove(&meta.id)
                    .unwrap_or_else(|| Schedule::standard(year));
                MemoryLocation::new(meta, records, &guests, schedule, templates)
            })
            .collect())
    }
}

fn bucket<'buckets>(
    buckets: &'buckets mut BTreeMap<LocationId, (Records, Vec<SmsTemplate>)>,
    location: &LocationId,
    kind: &'static str,
    id: String,
) -> Result<&'buckets mut (Records, Vec<SmsTemplate>), SnapshotError> {
    buckets
        .get_mut(location)
        .ok_or_else(|| SnapshotError::UndeclaredLocation {
            kind,
            id,
            location: location.clone(),
        })
}
