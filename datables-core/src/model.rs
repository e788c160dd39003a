//! Domain data structures for locations, reservations, tables, the waitlist, and guests.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Restaurant locations shipped with the demo data.
pub enum Locations {
    /// Tustin, CA.
    Tustin,
    /// Santa Ana, CA.
    SantaAna,
}

impl fmt::Display for Locations {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Locations::Tustin => "tustin",
            Locations::SantaAna => "santa-ana",
        };
        write!(formatter, "{slug}")
    }
}

impl From<Locations> for LocationId {
    fn from(location: Locations) -> Self {
        LocationId(location.to_string())
    }
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }
    };
}

string_id!(
    /// Identifier for a restaurant location.
    LocationId
);
string_id!(
    /// Identifier for a reservation.
    ReservationId
);
string_id!(
    /// Identifier for a physical table.
    TableId
);
string_id!(
    /// Identifier for a waitlist entry.
    WaitlistEntryId
);
string_id!(
    /// Identifier for a guest profile.
    GuestId
);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Metadata describing a location.
pub struct Location {
    /// Unique identifier.
    pub id: LocationId,
    /// Short display name ("Tustin").
    pub name: String,
    /// Full business name.
    pub full_name: String,
    /// Street address.
    pub address: String,
    /// Front desk phone number.
    pub phone: String,
    /// IANA timezone the wall-clock times of this location are expressed in.
    pub timezone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Lifecycle of a reservation.
pub enum ReservationStatus {
    /// Requested, not yet confirmed.
    Pending,
    /// Confirmed with the guest.
    Confirmed,
    /// Party is at a table.
    Seated,
    /// Party has left.
    Completed,
    /// Party never arrived.
    NoShow,
    /// Cancelled before arrival.
    Cancelled,
}

impl ReservationStatus {
    /// Wire slug of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Seated => "seated",
            ReservationStatus::Completed => "completed",
            ReservationStatus::NoShow => "no-show",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the reservation still expects the party to arrive.
    #[must_use]
    pub fn is_upcoming(self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Channel a reservation came in through.
pub enum ReservationSource {
    /// Native iOS app.
    IosApp,
    /// Phoned in to the host stand.
    Phone,
    /// Walked in without a booking.
    WalkIn,
    /// Web booking widget.
    Web,
}

impl ReservationSource {
    /// All sources in reporting order.
    pub const ALL: [ReservationSource; 4] = [
        ReservationSource::IosApp,
        ReservationSource::Phone,
        ReservationSource::WalkIn,
        ReservationSource::Web,
    ];

    /// Wire slug of the source.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationSource::IosApp => "ios-app",
            ReservationSource::Phone => "phone",
            ReservationSource::WalkIn => "walk-in",
            ReservationSource::Web => "web",
        }
    }
}

impl fmt::Display for ReservationSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Where a guest would like to sit.
pub enum SeatingPreference {
    /// Indoor dining room.
    Inside,
    /// Bar seating.
    Bar,
    /// Outdoor patio.
    Patio,
    /// No preference.
    #[default]
    Any,
}

impl SeatingPreference {
    /// Wire slug of the preference.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SeatingPreference::Inside => "inside",
            SeatingPreference::Bar => "bar",
            SeatingPreference::Patio => "patio",
            SeatingPreference::Any => "any",
        }
    }

    /// Lowercase fragments of a section name that satisfy this preference.
    #[must_use]
    pub fn section_keywords(self) -> &'static [&'static str] {
        match self {
            SeatingPreference::Inside => &["inside", "main", "dining"],
            SeatingPreference::Bar => &["bar"],
            SeatingPreference::Patio => &["patio"],
            SeatingPreference::Any => &[],
        }
    }

    /// Whether a floor section satisfies this preference. `Any` matches every section.
    #[must_use]
    pub fn matches_section(self, section: &str) -> bool {
        if self == SeatingPreference::Any {
            return true;
        }
        let section = section.to_lowercase();
        self.section_keywords()
            .iter()
            .any(|keyword| section.contains(keyword))
    }
}

impl fmt::Display for SeatingPreference {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A booking for a party at one location.
pub struct Reservation {
    /// Unique identifier.
    pub id: ReservationId,
    /// Location the party is booked at.
    pub location_id: LocationId,
    /// Name the booking is under.
    pub guest_name: String,
    /// Contact phone.
    pub guest_phone: String,
    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
    /// Number of guests.
    pub party_size: u32,
    /// Local wall-clock time of the booking.
    pub date_time: NaiveDateTime,
    /// Current lifecycle status.
    pub status: ReservationStatus,
    /// Channel the booking came in through.
    pub source: ReservationSource,
    /// Table the party is seated at, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<TableId>,
    /// Free-form notes from the guest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    /// Requested seating area.
    #[serde(default)]
    pub seating_preference: SeatingPreference,
    /// High chairs needed at the table.
    #[serde(default)]
    pub high_chairs: u32,
    /// Children among the party.
    #[serde(default)]
    pub kids_in_party: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Whether the special requests mention a celebration.
    #[must_use]
    pub fn is_celebration(&self) -> bool {
        self.special_requests.as_deref().is_some_and(|requests| {
            let requests = requests.to_lowercase();
            requests.contains("birthday") || requests.contains("anniversary")
        })
    }

    /// Seat the party at `table_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Reservation`] unless the reservation is pending or confirmed.
    pub fn seat(&mut self, table_id: TableId) -> Result<(), TransitionError> {
        self.transition(ReservationStatus::Seated, "seated", ReservationStatus::is_upcoming)?;
        self.table_id = Some(table_id);
        Ok(())
    }

    /// Record that the party never arrived.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Reservation`] unless the reservation is pending or confirmed.
    pub fn mark_no_show(&mut self) -> Result<(), TransitionError> {
        self.transition(ReservationStatus::NoShow, "marked no-show", ReservationStatus::is_upcoming)
    }

    /// Close out a seated party.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Reservation`] unless the party is seated.
    pub fn complete(&mut self) -> Result<(), TransitionError> {
        self.transition(ReservationStatus::Completed, "completed", |status| {
            status == ReservationStatus::Seated
        })
    }

    /// Cancel a booking that has not been seated yet.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Reservation`] unless the reservation is pending or confirmed.
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.transition(ReservationStatus::Cancelled, "cancelled", ReservationStatus::is_upcoming)
    }

    fn transition(
        &mut self,
        next: ReservationStatus,
        action: &'static str,
        allowed: impl Fn(ReservationStatus) -> bool,
    ) -> Result<(), TransitionError> {
        if !allowed(self.status) {
            return Err(TransitionError::Reservation {
                id: self.id.clone(),
                status: self.status,
                action,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Occupancy state of a table.
pub enum TableStatus {
    /// Free to seat.
    Available,
    /// Held for an upcoming reservation.
    Reserved,
    /// Party at the table.
    Occupied,
    /// Party is wrapping up.
    Finishing,
    /// Taken out of service.
    Blocked,
}

impl TableStatus {
    /// Wire slug of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Reserved => "reserved",
            TableStatus::Occupied => "occupied",
            TableStatus::Finishing => "finishing",
            TableStatus::Blocked => "blocked",
        }
    }

    /// Counted as "in use" by utilization figures.
    #[must_use]
    pub fn is_in_use(self) -> bool {
        matches!(self, TableStatus::Occupied | TableStatus::Reserved)
    }

    /// Can be offered to an arriving party now or shortly.
    #[must_use]
    pub fn is_seatable(self) -> bool {
        matches!(self, TableStatus::Available | TableStatus::Finishing)
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Physical shape of a table.
pub enum TableShape {
    /// Round table.
    Circle,
    /// Square four-top.
    Square,
    /// Long table for groups.
    Rectangle,
    /// Booth seating.
    Booth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
/// Position of a table on the floor plan.
pub struct Position {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A physical table on the floor.
pub struct Table {
    /// Unique identifier.
    pub id: TableId,
    /// Location the table belongs to.
    pub location_id: LocationId,
    /// Number shown to staff ("12", "5+6").
    pub number: String,
    /// Seats at the table.
    pub capacity: u32,
    /// Physical shape.
    pub shape: TableShape,
    /// Current occupancy state.
    pub status: TableStatus,
    /// Floor section name ("Main Dining", "Patio").
    pub section: String,
    /// Reservation currently at the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_reservation_id: Option<ReservationId>,
    /// Floor plan placement.
    #[serde(default)]
    pub position: Position,
}

impl Table {
    /// Seat a reservation at this table.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Table`] when the table is blocked or already occupied.
    pub fn assign(&mut self, reservation_id: ReservationId) -> Result<(), TransitionError> {
        if matches!(self.status, TableStatus::Blocked | TableStatus::Occupied) {
            return Err(self.refuse("assigned"));
        }
        self.status = TableStatus::Occupied;
        self.current_reservation_id = Some(reservation_id);
        Ok(())
    }

    /// Reset the table after a party leaves.
    pub fn clear(&mut self) {
        self.status = TableStatus::Available;
        self.current_reservation_id = None;
    }

    /// Take the table out of service.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Table`] while a party is at the table.
    pub fn block(&mut self) -> Result<(), TransitionError> {
        if self.status == TableStatus::Occupied {
            return Err(self.refuse("blocked"));
        }
        self.status = TableStatus::Blocked;
        Ok(())
    }

    /// Put a blocked table back in service.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Table`] when the table is not blocked.
    pub fn unblock(&mut self) -> Result<(), TransitionError> {
        if self.status != TableStatus::Blocked {
            return Err(self.refuse("unblocked"));
        }
        self.status = TableStatus::Available;
        Ok(())
    }

    fn refuse(&self, action: &'static str) -> TransitionError {
        TransitionError::Table {
            number: self.number.clone(),
            status: self.status,
            action,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Lifecycle of a waitlist entry.
pub enum WaitlistStatus {
    /// In the queue.
    Waiting,
    /// Told their table is ready.
    Notified,
    /// Seated.
    Seated,
    /// Did not respond in time.
    Expired,
    /// Left the queue.
    Cancelled,
}

impl WaitlistStatus {
    /// Wire slug of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WaitlistStatus::Waiting => "waiting",
            WaitlistStatus::Notified => "notified",
            WaitlistStatus::Seated => "seated",
            WaitlistStatus::Expired => "expired",
            WaitlistStatus::Cancelled => "cancelled",
        }
    }

    /// Still in the queue or about to be seated.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, WaitlistStatus::Waiting | WaitlistStatus::Notified)
    }
}

impl fmt::Display for WaitlistStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Walk-in party waiting for a table.
pub struct WaitlistEntry {
    /// Unique identifier.
    pub id: WaitlistEntryId,
    /// Location the party is waiting at.
    pub location_id: LocationId,
    /// Name called when the table is ready.
    pub guest_name: String,
    /// Phone the ready text goes to.
    pub guest_phone: String,
    /// Number of guests.
    pub party_size: u32,
    /// Wait quoted at the host stand, in minutes.
    pub quoted_wait_minutes: u32,
    /// Local time the party joined the queue.
    pub joined_at: NaiveDateTime,
    /// Current lifecycle status.
    pub status: WaitlistStatus,
    /// Requested seating area.
    #[serde(default)]
    pub seating_preference: SeatingPreference,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    /// Local time the party was told their table is ready.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified_at: Option<NaiveDateTime>,
}

impl WaitlistEntry {
    /// Mark the party as notified at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Waitlist`] once the entry has left the queue.
    pub fn notify(&mut self, now: NaiveDateTime) -> Result<(), TransitionError> {
        self.transition(WaitlistStatus::Notified, "notified")?;
        self.notified_at = Some(now);
        Ok(())
    }

    /// Mark the party as seated.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Waitlist`] once the entry has left the queue.
    pub fn seat(&mut self) -> Result<(), TransitionError> {
        self.transition(WaitlistStatus::Seated, "seated")
    }

    /// Drop a party that did not show up after being notified.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Waitlist`] once the entry has left the queue.
    pub fn expire(&mut self) -> Result<(), TransitionError> {
        self.transition(WaitlistStatus::Expired, "expired")
    }

    /// Remove the party from the queue at their request.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Waitlist`] once the entry has left the queue.
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.transition(WaitlistStatus::Cancelled, "cancelled")
    }

    /// Minutes the party has been waiting as of `now`.
    #[must_use]
    pub fn waited_minutes(&self, now: NaiveDateTime) -> i64 {
        (now - self.joined_at).num_minutes().max(0)
    }

    fn transition(&mut self, next: WaitlistStatus, action: &'static str) -> Result<(), TransitionError> {
        if !self.status.is_open() {
            return Err(TransitionError::Waitlist {
                id: self.id.clone(),
                status: self.status,
                action,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// Standing preferences recorded for a guest.
pub struct GuestPreferences {
    /// Preferred seating area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seating: Option<SeatingPreference>,
    /// Dietary restrictions.
    #[serde(default)]
    pub dietary: Vec<String>,
    /// Staff notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One past visit of a guest.
pub struct Visit {
    /// Location visited.
    pub location_id: LocationId,
    /// Date of the visit.
    pub date: NaiveDate,
    /// Party size on that visit.
    pub party_size: u32,
    /// Table the party sat at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<TableId>,
    /// Staff notes about the visit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// CRM record of a guest across all locations.
pub struct GuestProfile {
    /// Unique identifier.
    pub id: GuestId,
    /// Full name.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Free-form tags ("VIP", "Regular").
    #[serde(default)]
    pub tags: Vec<String>,
    /// Standing preferences.
    #[serde(default)]
    pub preferences: GuestPreferences,
    /// Most recent visits first.
    #[serde(default)]
    pub visit_history: Vec<Visit>,
    /// Lifetime visit count, including visits older than the history kept.
    #[serde(default)]
    pub total_visits: u32,
    /// Date of the latest visit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Status change applied to a reservation after it was booked.
pub enum ReservationUpdate {
    /// The party never arrived.
    NoShow,
    /// The seated party has left.
    Complete,
    /// The booking was called off.
    Cancel,
}

impl Reservation {
    /// Apply `update` with the rules of the matching transition.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Reservation`] when the change is not allowed from the current status.
    pub fn apply(&mut self, update: ReservationUpdate) -> Result<(), TransitionError> {
        match update {
            ReservationUpdate::NoShow => self.mark_no_show(),
            ReservationUpdate::Complete => self.complete(),
            ReservationUpdate::Cancel => self.cancel(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Status change applied to a table by floor staff.
pub enum TableUpdate {
    /// Reset after the party left.
    Clear,
    /// Take out of service.
    Block,
    /// Put back in service.
    Unblock,
}

impl Table {
    /// Apply `update` with the rules of the matching transition.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Table`] when the change is not allowed from the current status.
    pub fn apply(&mut self, update: TableUpdate) -> Result<(), TransitionError> {
        match update {
            TableUpdate::Clear => {
                self.clear();
                Ok(())
            }
            TableUpdate::Block => self.block(),
            TableUpdate::Unblock => self.unblock(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Status change that takes a party off the waitlist.
pub enum WaitlistUpdate {
    /// The party got a table.
    Seat,
    /// The party did not come back after the text.
    Expire,
    /// The party left the queue.
    Cancel,
}

impl WaitlistEntry {
    /// Apply `update` with the rules of the matching transition.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Waitlist`] once the entry has left the queue.
    pub fn apply(&mut self, update: WaitlistUpdate) -> Result<(), TransitionError> {
        match update {
            WaitlistUpdate::Seat => self.seat(),
            WaitlistUpdate::Expire => self.expire(),
            WaitlistUpdate::Cancel => self.cancel(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Inclusive start/end range of calendar days.
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Range of `days` calendar days ending at `end`. `days` below one is treated as one.
    ///
    /// The start saturates at the earliest representable date.
    #[must_use]
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let span = Duration::days(i64::from(days.max(1)) - 1);
        Self {
            start: end.checked_sub_signed(span).unwrap_or(NaiveDate::MIN),
            end,
        }
    }

    /// Number of calendar days covered. Zero or negative when `start` is after `end`.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days() + 1
    }

    /// Whether `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every day of the range in order. Empty when `start` is after `end`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// A status change that is not allowed from the current state.
pub enum TransitionError {
    /// Reservation status change refused.
    #[error("Reservation {id} is {status} and cannot be {action}")]
    Reservation {
        /// Reservation affected.
        id: ReservationId,
        /// Status at the time of the attempt.
        status: ReservationStatus,
        /// Attempted action.
        action: &'static str,
    },
    /// Table status change refused.
    #[error("Table {number} is {status} and cannot be {action}")]
    Table {
        /// Table number shown to staff.
        number: String,
        /// Status at the time of the attempt.
        status: TableStatus,
        /// Attempted action.
        action: &'static str,
    },
    /// Waitlist status change refused.
    #[error("Waitlist entry {id} is {status} and cannot be {action}")]
    Waitlist {
        /// Entry affected.
        id: WaitlistEntryId,
        /// Status at the time of the attempt.
        status: WaitlistStatus,
        /// Attempted action.
        action: &'static str,
    },
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};

    use super::*;

    pub(crate) fn at(hour: u32, minute: u32) -> NaiveDateTime {
        day(30).and_hms_opt(hour, minute, 0).expect("valid time")
    }

    pub(crate) fn day(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).expect("valid date")
    }

    pub(crate) fn reservation(id: &str, party_size: u32) -> Reservation {
        let stamp = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).single().expect("valid stamp");
        Reservation {
            id: ReservationId::from(id),
            location_id: LocationId::from("tustin"),
            guest_name: "John Smith".to_owned(),
            guest_phone: "+17145551234".to_owned(),
            guest_email: None,
            party_size,
            date_time: at(18, 30),
            status: ReservationStatus::Confirmed,
            source: ReservationSource::Web,
            table_id: None,
            special_requests: None,
            seating_preference: SeatingPreference::Any,
            high_chairs: 0,
            kids_in_party: 0,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    pub(crate) fn table(id: &str, capacity: u32, shape: TableShape, section: &str) -> Table {
        Table {
            id: TableId::from(id),
            location_id: LocationId::from("tustin"),
            number: id.to_owned(),
            capacity,
            shape,
            status: TableStatus::Available,
            section: section.to_owned(),
            current_reservation_id: None,
            position: Position::default(),
        }
    }

    pub(crate) fn waitlist_entry(id: &str, party_size: u32, quoted: u32) -> WaitlistEntry {
        WaitlistEntry {
            id: WaitlistEntryId::from(id),
            location_id: LocationId::from("tustin"),
            guest_name: "Emily Wilson".to_owned(),
            guest_phone: "+17145557890".to_owned(),
            party_size,
            quoted_wait_minutes: quoted,
            joined_at: at(18, 0),
            status: WaitlistStatus::Waiting,
            seating_preference: SeatingPreference::Any,
            special_requests: None,
            notified_at: None,
        }
    }
}
