//! Input rules for new reservations, waitlist entries, and report ranges.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::model::{
    DateRange, LocationId, Reservation, ReservationId, ReservationSource, ReservationStatus,
    SeatingPreference, WaitlistEntry, WaitlistEntryId, WaitlistStatus,
};

const MAX_NAME_CHARS: usize = 100;
const MIN_PHONE_CHARS: usize = 10;
const MAX_PHONE_CHARS: usize = 20;
const MAX_PARTY_SIZE: u32 = 20;
const MAX_QUOTED_WAIT_MINUTES: u32 = 180;
const MAX_REQUEST_CHARS: usize = 500;
/// Longest report range accepted, in days.
pub const MAX_RANGE_DAYS: i64 = 3660;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// A rejected input field.
pub enum ValidationError {
    /// Guest name empty.
    #[error("Guest name is required")]
    MissingName,
    /// Guest name too long.
    #[error("Guest name must be at most 100 characters")]
    NameTooLong,
    /// Phone too short or too long.
    #[error("Phone must be between 10 and 20 characters, got {0}")]
    InvalidPhone(usize),
    /// Email without a local part, an `@`, or a dotted domain.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    /// Party size outside the bookable range.
    #[error("Party size must be between 1 and 20, got {0}")]
    PartySize(u32),
    /// Quoted wait beyond the maximum.
    #[error("Quoted wait must be at most 180 minutes, got {0}")]
    QuotedWait(u32),
    /// Special requests too long.
    #[error("Special requests must be at most 500 characters")]
    RequestsTooLong,
    /// Range ends before it starts.
    #[error("Date range starts {start} after it ends {end}")]
    InvertedRange {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },
    /// Range longer than [`MAX_RANGE_DAYS`].
    #[error("Date range covers {0} days, at most 3660 are allowed")]
    RangeTooLong(i64),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A booking as entered at the host stand or received from a booking channel.
pub struct ReservationRequest {
    /// Location to book at.
    pub location_id: LocationId,
    /// Name the booking is under.
    pub guest_name: String,
    /// Contact phone.
    pub guest_phone: String,
    /// Optional contact email.
    #[serde(default)]
    pub guest_email: Option<String>,
    /// Number of guests.
    pub party_size: u32,
    /// Local wall-clock time of the booking.
    pub date_time: NaiveDateTime,
    /// Requested seating area.
    #[serde(default)]
    pub seating_preference: SeatingPreference,
    /// Free-form notes.
    #[serde(default)]
    pub special_requests: Option<String>,
    /// Booking channel.
    #[serde(default = "default_source")]
    pub source: ReservationSource,
    /// High chairs needed.
    #[serde(default)]
    pub high_chairs: u32,
    /// Children among the party.
    #[serde(default)]
    pub kids_in_party: u32,
}

fn default_source() -> ReservationSource {
    ReservationSource::Web
}

impl ReservationRequest {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.guest_name)?;
        validate_phone(&self.guest_phone)?;
        if let Some(email) = &self.guest_email {
            validate_email(email)?;
        }
        validate_party_size(self.party_size)?;
        validate_requests(self.special_requests.as_deref())
    }

    /// Validate and turn the request into a confirmed reservation with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn into_reservation(self) -> Result<Reservation, ValidationError> {
        self.validate()?;
        let now = Utc::now();
        Ok(Reservation {
            id: ReservationId(Uuid::new_v4().to_string()),
            location_id: self.location_id,
            guest_name: self.guest_name.trim().to_owned(),
            guest_phone: self.guest_phone,
            guest_email: self.guest_email,
            party_size: self.party_size,
            date_time: self.date_time,
            status: ReservationStatus::Confirmed,
            source: self.source,
            table_id: None,
            special_requests: self.special_requests,
            seating_preference: self.seating_preference,
            high_chairs: self.high_chairs,
            kids_in_party: self.kids_in_party,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A walk-in party joining the waitlist.
pub struct WaitlistRequest {
    /// Location to wait at.
    pub location_id: LocationId,
    /// Name called when the table is ready.
    pub guest_name: String,
    /// Phone the ready text goes to.
    pub guest_phone: String,
    /// Number of guests.
    pub party_size: u32,
    /// Quoted wait in minutes.
    pub quoted_wait_minutes: u32,
    /// Requested seating area.
    #[serde(default)]
    pub seating_preference: SeatingPreference,
    /// Free-form notes.
    #[serde(default)]
    pub special_requests: Option<String>,
}

impl WaitlistRequest {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.guest_name)?;
        validate_phone(&self.guest_phone)?;
        validate_party_size(self.party_size)?;
        if self.quoted_wait_minutes > MAX_QUOTED_WAIT_MINUTES {
            return Err(ValidationError::QuotedWait(self.quoted_wait_minutes));
        }
        validate_requests(self.special_requests.as_deref())
    }

    /// Validate and turn the request into a waiting entry that joined at `now`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn into_entry(self, now: NaiveDateTime) -> Result<WaitlistEntry, ValidationError> {
        self.validate()?;
        Ok(WaitlistEntry {
            id: WaitlistEntryId(Uuid::new_v4().to_string()),
            location_id: self.location_id,
            guest_name: self.guest_name.trim().to_owned(),
            guest_phone: self.guest_phone,
            party_size: self.party_size,
            quoted_wait_minutes: self.quoted_wait_minutes,
            joined_at: now,
            status: WaitlistStatus::Waiting,
            seating_preference: self.seating_preference,
            special_requests: self.special_requests,
            notified_at: None,
        })
    }
}

/// Reject ranges that end before they start or span more than [`MAX_RANGE_DAYS`].
///
/// # Errors
///
/// Returns [`ValidationError::InvertedRange`] when `start` is after `end` and
/// [`ValidationError::RangeTooLong`] when the range is too long to report on.
pub fn validate_range(range: DateRange) -> Result<DateRange, ValidationError> {
    if range.start > range.end {
        return Err(ValidationError::InvertedRange {
            start: range.start,
            end: range.end,
        });
    }
    let days = range.day_count();
    if days > MAX_RANGE_DAYS {
        return Err(ValidationError::RangeTooLong(days));
    }
    Ok(range)
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let length = phone.trim().chars().count();
    if !(MIN_PHONE_CHARS..=MAX_PHONE_CHARS).contains(&length) {
        return Err(ValidationError::InvalidPhone(length));
    }
    Ok(())
}

/// Something before the `@` and a dot in the domain, as booking forms check it.
fn validate_email(email: &str) -> Result<(), ValidationError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidEmail(email.to_owned())),
    }
}

fn validate_party_size(party_size: u32) -> Result<(), ValidationError> {
    if party_size == 0 || party_size > MAX_PARTY_SIZE {
        return Err(ValidationError::PartySize(party_size));
    }
    Ok(())
}

fn validate_requests(requests: Option<&str>) -> Result<(), ValidationError> {
    if requests.is_some_and(|requests| requests.chars().count() > MAX_REQUEST_CHARS) {
        return Err(ValidationError::RequestsTooLong);
    }
    Ok(())
}
