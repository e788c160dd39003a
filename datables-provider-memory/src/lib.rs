//! In-memory Datables backend: demo data, JSON snapshots, and a logging SMS gateway.

use std::sync::Arc;

use datables_core::{
    hours::Schedule,
    model::Location,
    notify::SmsTemplate,
    plugin::{LocationPlugin, LocationRegistry},
};

/// Seed data for the demo locations.
pub mod demo;
/// Snapshot files holding every location's records.
pub mod snapshot;
/// Logging SMS gateway.
pub mod sms;
/// In-memory booking storage.
pub mod store;

pub use demo::demo_locations;
pub use snapshot::{Snapshot, SnapshotError};
pub use sms::LogSmsPort;
pub use store::{GuestBook, MemoryBookingPort, Records};

/// One location served from memory.
pub struct MemoryLocation {
    meta: Location,
    store: Arc<MemoryBookingPort>,
    schedule: Schedule,
    templates: Vec<SmsTemplate>,
}

impl MemoryLocation {
    /// Create a location holding `records` and sharing `guests` with its sister locations.
    #[must_use]
    pub fn new(
        meta: Location,
        records: Records,
        guests: &Arc<GuestBook>,
        schedule: Schedule,
        templates: Vec<SmsTemplate>,
    ) -> Self {
        let guests = Arc::clone(guests);
        Self {
            store: Arc::new(MemoryBookingPort::with_records(meta.clone(), records, guests)),
            meta,
            schedule,
            templates,
        }
    }

    /// Location metadata.
    #[must_use]
    pub fn meta(&self) -> &Location {
        &self.meta
    }

    /// Shared handle to the record store.
    #[must_use]
    pub fn store(&self) -> &Arc<MemoryBookingPort> {
        &self.store
    }

    /// Opening hours and closures.
    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Message templates.
    #[must_use]
    pub fn templates(&self) -> &[SmsTemplate] {
        &self.templates
    }

    /// Build the plugin bundle for this location. The plugin shares the store.
    #[must_use]
    pub fn plugin(&self) -> LocationPlugin {
        let booking = Arc::clone(&self.store);
        LocationPlugin {
            meta: self.meta.clone(),
            booking,
            schedule: self.schedule.clone(),
            templates: self.templates.clone(),
        }
    }
}

/// Registry serving every location in `locations`.
#[must_use]
pub fn registry(locations: &[MemoryLocation]) -> LocationRegistry {
    LocationRegistry::new(locations.iter().map(MemoryLocation::plugin).collect())
}
