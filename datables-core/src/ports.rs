//! Traits describing storage and messaging backends, plus the shared error type.

use async_trait::async_trait;

use crate::model::{
    GuestId, GuestProfile, Location, LocationId, Reservation, ReservationId, Table, TableId,
    TransitionError, WaitlistEntry, WaitlistEntryId,
};
use crate::notify::{SmsReceipt, TemplateKind};
use crate::validation::ValidationError;

#[derive(thiserror::Error, Debug)]
/// Errors raised by the service and its backends.
pub enum DatablesError {
    /// The location has no registered plugin.
    #[error("Unknown location: {0}")]
    UnknownLocation(LocationId),
    /// Reservation id not present at the location.
    #[error("Reservation not found: {0}")]
    ReservationNotFound(ReservationId),
    /// Table id not present at the location.
    #[error("Table not found: {0}")]
    TableNotFound(TableId),
    /// Waitlist entry id not present at the location.
    #[error("Waitlist entry not found: {0}")]
    WaitlistEntryNotFound(WaitlistEntryId),
    /// Guest id not present in the guest book.
    #[error("Guest not found: {0}")]
    GuestNotFound(GuestId),
    /// The location does not take bookings at the requested time.
    #[error("Location closed: {0}")]
    Closed(String),
    /// No message template of the needed kind is configured.
    #[error("No {0:?} template configured")]
    NoTemplate(TemplateKind),
    /// Input rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Status change not allowed.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// Backend failed to load or persist records.
    #[error("Storage error: {0}")]
    Storage(String),
    /// Message gateway failed.
    #[error("Delivery error: {0}")]
    Delivery(String),
}

#[async_trait]
/// Trait for per-location reservation, table, waitlist, and guest storage.
pub trait BookingPort: Send + Sync {
    /// Location served by this port.
    fn location(&self) -> &Location;

    /// All reservations of the location.
    ///
    /// # Errors
    ///
    /// Returns [`DatablesError::Storage`] when the backend cannot be read.
    async fn reservations(&self) -> Result<Vec<Reservation>, DatablesError>;

    /// All tables of the location.
    ///
    /// # Errors
    ///
    /// Returns [`DatablesError::Storage`] when the backend cannot be read.
    async fn tables(&self) -> Result<Vec<Table>, DatablesError>;

    /// All waitlist entries of the location, open or closed.
    ///
    /// # Errors
    ///
    /// Returns [`DatablesError::Storage`] when the backend cannot be read.
    async fn waitlist(&self) -> Result<Vec<WaitlistEntry>, DatablesError>;

    /// Guest profiles known to the location.
    ///
    /// # Errors
    ///
    /// Returns [`DatablesError::Storage`] when the backend cannot be read.
    async fn guests(&self) -> Result<Vec<GuestProfile>, DatablesError>;

    /// Insert or replace a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns [`DatablesError::Storage`] when the backend rejects the write.
    async fn save_reservation(&self, reservation: Reservation) -> Result<(), DatablesError>;

    /// Insert or replace a table by id.
    ///
    /// # Errors
    ///
    /// Returns [`DatablesError::Storage`] when the backend rejects the write.
    async fn save_table(&self, table: Table) -> Result<(), DatablesError>;

    /// Insert or replace a waitlist entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`DatablesError::Storage`] when the backend rejects the write.
    async fn save_waitlist_entry(&self, entry: WaitlistEntry) -> Result<(), DatablesError>;

    /// Insert or replace a guest profile by id.
    ///
    /// Profiles are shared by every location, so a write is visible everywhere.
    ///
    /// # Errors
    ///
    /// Returns [`DatablesError::Storage`] when the backend rejects the write.
    async fn save_guest(&self, guest: GuestProfile) -> Result<(), DatablesError>;
}

#[async_trait]
/// Trait for text message gateways.
pub trait SmsPort: Send + Sync {
    /// Hand `message` to the gateway for delivery to `phone`.
    ///
    /// A rejected message is reported through [`SmsReceipt::success`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`DatablesError::Delivery`] when the gateway cannot be reached.
    async fn send(&self, phone: &str, message: &str) -> Result<SmsReceipt, DatablesError>;
}
