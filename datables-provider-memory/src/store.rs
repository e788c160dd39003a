//! Booking port backed by in-process vectors.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use datables_core::{
    model::{GuestProfile, Location, LocationId, Reservation, Table, WaitlistEntry},
    ports::{BookingPort, DatablesError},
};

/// Records held for one location.
#[derive(Debug, Clone, Default)]
pub struct Records {
    /// Reservations, any status.
    pub reservations: Vec<Reservation>,
    /// Tables on the floor.
    pub tables: Vec<Table>,
    /// Waitlist entries, any status.
    pub waitlist: Vec<WaitlistEntry>,
}

/// Guest profiles shared by every location of the group.
#[derive(Debug, Default)]
pub struct GuestBook {
    profiles: RwLock<Vec<GuestProfile>>,
}

impl GuestBook {
    /// Guest book holding `profiles`.
    #[must_use]
    pub fn new(profiles: Vec<GuestProfile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    /// Copy of every profile.
    pub async fn profiles(&self) -> Vec<GuestProfile> {
        self.profiles.read().await.clone()
    }

    async fn save(&self, guest: GuestProfile) {
        let id = guest.id.clone();
        upsert(&mut *self.profiles.write().await, guest, |existing| existing.id == id);
    }
}

/// Booking storage for a single location, lost when the process exits.
pub struct MemoryBookingPort {
    meta: Location,
    reservations: RwLock<Vec<Reservation>>,
    tables: RwLock<Vec<Table>>,
    waitlist: RwLock<Vec<WaitlistEntry>>,
    guests: Arc<GuestBook>,
}

impl MemoryBookingPort {
    /// Create an empty store for `meta` with a guest book of its own.
    #[must_use]
    pub fn new(meta: Location) -> Self {
        Self::with_records(meta, Records::default(), Arc::new(GuestBook::default()))
    }

    /// Create a store preloaded with `records` that reads and writes `guests`.
    #[must_use]
    pub fn with_records(meta: Location, records: Records, guests: Arc<GuestBook>) -> Self {
        Self {
            meta,
            reservations: RwLock::new(records.reservations),
            tables: RwLock::new(records.tables),
            waitlist: RwLock::new(records.waitlist),
            guests,
        }
    }

    /// Copy of the location's own records.
    pub async fn records(&self) -> Records {
        Records {
            reservations: self.reservations.read().await.clone(),
            tables: self.tables.read().await.clone(),
            waitlist: self.waitlist.read().await.clone(),
        }
    }

    /// Guest book this store writes to.
    #[must_use]
    pub fn guest_book(&self) -> &Arc<GuestBook> {
        &self.guests
    }

    fn check_location(&self, record: &LocationId) -> Result<(), DatablesError> {
        if record == &self.meta.id {
            Ok(())
        } else {
            Err(DatablesError::Storage(format!(
                "record for {record} written to the {} store",
                self.meta.id
            )))
        }
    }
}

fn upsert<T>(records: &mut Vec<T>, record: T, same: impl Fn(&T) -> bool) {
    match records.iter_mut().find(|existing| same(existing)) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

#[async_trait]
impl BookingPort for MemoryBookingPort {
    fn location(&self) -> &Location {
        &self.meta
    }

    async fn reservations(&self) -> Result<Vec<Reservation>, DatablesError> {
        Ok(self.reservations.read().await.clone())
    }

    async fn tables(&self) -> Result<Vec<Table>, DatablesError> {
        Ok(self.tables.read().await.clone())
    }

    async fn waitlist(&self) -> Result<Vec<WaitlistEntry>, DatablesError> {
        Ok(self.waitlist.read().await.clone())
    }

    async fn guests(&self) -> Result<Vec<GuestProfile>, DatablesError> {
        Ok(self.guests.profiles().await)
    }

    async fn save_reservation(&self, reservation: Reservation) -> Result<(), DatablesError> {
        self.check_location(&reservation.location_id)?;
        debug!(location = %self.meta.id, reservation = %reservation.id, "saving reservation");
        let id = reservation.id.clone();
        upsert(&mut *self.reservations.write().await, reservation, |existing| existing.id == id);
        Ok(())
    }

    async fn save_table(&self, table: Table) -> Result<(), DatablesError> {
        self.check_location(&table.location_id)?;
        debug!(location = %self.meta.id, table = %table.id, "saving table");
        let id = table.id.clone();
        upsert(&mut *self.tables.write().await, table, |existing| existing.id == id);
        Ok(())
    }

    async fn save_waitlist_entry(&self, entry: WaitlistEntry) -> Result<(), DatablesError> {
        self.check_location(&entry.location_id)?;
        debug!(location = %self.meta.id, entry = %entry.id, "saving waitlist entry");
        let id = entry.id.clone();
        upsert(&mut *self.waitlist.write().await, entry, |existing| existing.id == id);
        Ok(())
    }

    async fn save_guest(&self, guest: GuestProfile) -> Result<(), DatablesError> {
        debug!(location = %self.meta.id, guest = %guest.id, "saving guest");
        self.guests.save(guest).await;
        Ok(())
    }
}
