//! High-level service facade combining all locations.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::analytics::{location_snapshot, FloorView, LocationAnalytics};
use crate::comparison::{self, ComparisonReport};
use crate::guests;
use crate::hours::ServiceHours;
use crate::model::{
    DateRange, GuestId, GuestProfile, LocationId, Reservation, ReservationId, ReservationUpdate,
    Table, TableId, TableUpdate, Visit, WaitlistEntry, WaitlistEntryId, WaitlistUpdate,
};
use crate::notify::{
    default_template, render_template, waitlist_vars, NotificationLog, TemplateKind,
};
use crate::plugin::{LocationPlugin, LocationRegistry};
use crate::ports::{DatablesError, SmsPort};
use crate::recommend::{self, TableRecommendation};
use crate::validation::{validate_range, ReservationRequest, WaitlistRequest};

/// Public entry point for host stand and reporting workflows.
pub struct DatablesService {
    registry: Arc<LocationRegistry>,
    sms: Arc<dyn SmsPort>,
    hours: ServiceHours,
}

impl DatablesService {
    /// Create a new service bound to the provided registry and message gateway.
    #[must_use]
    pub fn new(registry: Arc<LocationRegistry>, sms: Arc<dyn SmsPort>, hours: ServiceHours) -> Self {
        Self {
            registry,
            sms,
            hours,
        }
    }

    /// List all locations and their display names, ordered by id.
    #[must_use]
    pub fn locations(&self) -> Vec<(LocationId, String)> {
        self.registry
            .locations()
            .into_iter()
            .map(|meta| (meta.id, meta.name))
            .collect()
    }

    /// Validate a booking request and store it as a confirmed reservation.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the location is unknown, the request is invalid,
    /// the location is closed at the requested time, or storage fails.
    pub async fn book_reservation(&self, request: ReservationRequest) -> Result<Reservation, DatablesError> {
        let plugin = self.registry.plugin(&request.location_id)?;
        request.validate()?;
        if let Some(reason) = plugin.schedule.closure_reason(request.date_time) {
            warn!(location = %plugin.meta.id, at = %request.date_time, %reason, "booking refused");
            return Err(DatablesError::Closed(reason));
        }

        let reservation = request.into_reservation()?;
        plugin.booking.save_reservation(reservation.clone()).await?;
        info!(
            location = %reservation.location_id,
            reservation = %reservation.id,
            party_size = reservation.party_size,
            "reservation booked"
        );
        Ok(reservation)
    }

    /// Rank the location's seatable tables for a reservation, best first.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the location or reservation is unknown or storage fails.
    pub async fn recommend_tables(
        &self,
        location: &LocationId,
        reservation_id: &ReservationId,
    ) -> Result<Vec<TableRecommendation>, DatablesError> {
        let plugin = self.registry.plugin(location)?;
        let reservation = find_reservation(plugin, reservation_id).await?;
        let seatable: Vec<Table> = plugin
            .booking
            .tables()
            .await?
            .into_iter()
            .filter(|table| table.status.is_seatable())
            .collect();
        debug!(location = %location, candidates = seatable.len(), "scoring tables");
        Ok(recommend::recommend_tables(&reservation, &seatable))
    }

    /// Seat a reservation at a table, occupying the table.
    ///
    /// Nothing is stored unless both status changes are allowed. The table is written
    /// first and released again if the reservation cannot be stored.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if either record is unknown, a status change is
    /// not allowed, or storage fails.
    pub async fn assign_table(
        &self,
        location: &LocationId,
        reservation_id: &ReservationId,
        table_id: &TableId,
    ) -> Result<(Reservation, Table), DatablesError> {
        let plugin = self.registry.plugin(location)?;
        let mut reservation = find_reservation(plugin, reservation_id).await?;
        let mut table = find_table(plugin, table_id).await?;
        let released = table.clone();

        reservation.seat(table.id.clone())?;
        table.assign(reservation.id.clone())?;
        plugin.booking.save_table(table.clone()).await?;
        if let Err(error) = plugin.booking.save_reservation(reservation.clone()).await {
            warn!(location = %location, reservation = %reservation.id, %error, "seating not stored, releasing table");
            if let Err(restore) = plugin.booking.save_table(released).await {
                warn!(location = %location, table = %table.id, error = %restore, "table could not be released");
            }
            return Err(error);
        }
        info!(
            location = %location,
            reservation = %reservation.id,
            table = %table.number,
            "party seated"
        );
        Ok((reservation, table))
    }

    /// Apply a host status change to a booked reservation.
    ///
    /// Completing a seated party also frees its table and records the visit on the
    /// guest profile with the same phone number, if there is one.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the location or reservation is unknown, the change
    /// is not allowed from the current status, or storage fails.
    pub async fn update_reservation(
        &self,
        location: &LocationId,
        reservation_id: &ReservationId,
        update: ReservationUpdate,
    ) -> Result<Reservation, DatablesError> {
        let plugin = self.registry.plugin(location)?;
        let mut reservation = find_reservation(plugin, reservation_id).await?;
        reservation.apply(update)?;
        plugin.booking.save_reservation(reservation.clone()).await?;
        info!(
            location = %location,
            reservation = %reservation.id,
            status = %reservation.status,
            "reservation updated"
        );

        if update == ReservationUpdate::Complete {
            release_table(plugin, &reservation).await?;
            record_guest_visit(plugin, &reservation).await?;
        }
        Ok(reservation)
    }

    /// Clear, block, or unblock a table.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the location or table is unknown, the change is
    /// not allowed from the current status, or storage fails.
    pub async fn update_table(
        &self,
        location: &LocationId,
        table_id: &TableId,
        update: TableUpdate,
    ) -> Result<Table, DatablesError> {
        let plugin = self.registry.plugin(location)?;
        let mut table = find_table(plugin, table_id).await?;
        table.apply(update)?;
        plugin.booking.save_table(table.clone()).await?;
        info!(location = %location, table = %table.number, status = %table.status, "table updated");
        Ok(table)
    }

    /// Put a walk-in party on the waitlist as of `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the location is unknown, the request is invalid,
    /// or storage fails.
    pub async fn join_waitlist(
        &self,
        request: WaitlistRequest,
        now: NaiveDateTime,
    ) -> Result<WaitlistEntry, DatablesError> {
        let plugin = self.registry.plugin(&request.location_id)?;
        let entry = request.into_entry(now)?;
        plugin.booking.save_waitlist_entry(entry.clone()).await?;
        info!(
            location = %entry.location_id,
            entry = %entry.id,
            party_size = entry.party_size,
            quoted = entry.quoted_wait_minutes,
            "party joined the waitlist"
        );
        Ok(entry)
    }

    /// Take a party off the waitlist: seated, expired, or cancelled.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the location or entry is unknown, the entry has
    /// already left the queue, or storage fails.
    pub async fn update_waitlist_entry(
        &self,
        location: &LocationId,
        entry_id: &WaitlistEntryId,
        update: WaitlistUpdate,
    ) -> Result<WaitlistEntry, DatablesError> {
        let plugin = self.registry.plugin(location)?;
        let mut entry = plugin
            .booking
            .waitlist()
            .await?
            .into_iter()
            .find(|entry| &entry.id == entry_id)
            .ok_or_else(|| DatablesError::WaitlistEntryNotFound(entry_id.clone()))?;
        entry.apply(update)?;
        plugin.booking.save_waitlist_entry(entry.clone()).await?;
        info!(location = %location, entry = %entry.id, status = %entry.status, "waitlist entry updated");
        Ok(entry)
    }

    /// Dashboard analytics for one location as of `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the location is unknown or storage fails.
    pub async fn location_analytics(
        &self,
        location: &LocationId,
        now: NaiveDateTime,
    ) -> Result<LocationAnalytics, DatablesError> {
        let plugin = self.registry.plugin(location)?;
        let reservations = plugin.booking.reservations().await?;
        let tables = plugin.booking.tables().await?;
        let waitlist = plugin.booking.waitlist().await?;
        let floor = FloorView {
            reservations: &reservations,
            tables: &tables,
            waitlist: &waitlist,
        };
        Ok(location_snapshot(location, floor, now, self.hours))
    }

    /// Compare locations over a date range. An empty list compares every location.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the range is inverted, a location is unknown,
    /// or storage fails.
    pub async fn compare_locations(
        &self,
        locations: &[LocationId],
        range: DateRange,
    ) -> Result<ComparisonReport, DatablesError> {
        let range = validate_range(range)?;
        let ids: Vec<LocationId> = if locations.is_empty() {
            self.registry.locations().into_iter().map(|meta| meta.id).collect()
        } else {
            locations.to_vec()
        };

        let mut metas = Vec::with_capacity(ids.len());
        let mut reservations = Vec::new();
        let mut tables = Vec::new();
        for id in &ids {
            let plugin = self.registry.plugin(id)?;
            metas.push(plugin.meta.clone());
            reservations.extend(plugin.booking.reservations().await?);
            tables.extend(plugin.booking.tables().await?);
        }
        debug!(locations = ids.len(), reservations = reservations.len(), "comparing locations");
        Ok(comparison::compare_locations(&reservations, &tables, &metas, range))
    }

    /// Text a waitlist party that their table is ready.
    ///
    /// Uses the location's default waitlist-ready template. The entry is marked notified
    /// only when the gateway accepts the message; the log records either outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the location or entry is unknown, the entry is no
    /// longer open, no template is configured, the gateway is unreachable, or storage fails.
    pub async fn notify_waitlist_guest(
        &self,
        location: &LocationId,
        entry_id: &WaitlistEntryId,
        now: NaiveDateTime,
    ) -> Result<NotificationLog, DatablesError> {
        let plugin = self.registry.plugin(location)?;
        let waitlist = plugin.booking.waitlist().await?;
        let mut entry = waitlist
            .iter()
            .find(|entry| &entry.id == entry_id)
            .cloned()
            .ok_or_else(|| DatablesError::WaitlistEntryNotFound(entry_id.clone()))?;
        let template = default_template(&plugin.templates, TemplateKind::WaitlistReady)
            .ok_or(DatablesError::NoTemplate(TemplateKind::WaitlistReady))?;

        // Validate the transition before texting the guest.
        let mut checked = entry.clone();
        checked.notify(now)?;

        let mut vars = waitlist_vars(&entry);
        vars.restaurant_name = Some(plugin.meta.name.clone());
        vars.position = queue_position(&waitlist, &entry);
        let message = render_template(&template.body, &vars);

        let receipt = self.sms.send(&entry.guest_phone, &message).await?;
        if receipt.success {
            entry.notify(now)?;
            plugin.booking.save_waitlist_entry(entry.clone()).await?;
            info!(location = %location, entry = %entry.id, "waitlist guest notified");
        } else {
            warn!(location = %location, entry = %entry.id, "gateway rejected waitlist message");
        }

        Ok(NotificationLog::from_receipt(
            location.clone(),
            TemplateKind::WaitlistReady,
            &entry.guest_phone,
            message,
            &receipt,
            Some(entry.id.0.clone()),
        ))
    }

    /// Guests of a location matching `query` by name, email, or phone.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the location is unknown or storage fails.
    pub async fn search_guests(
        &self,
        location: &LocationId,
        query: &str,
    ) -> Result<Vec<GuestProfile>, DatablesError> {
        let plugin = self.registry.plugin(location)?;
        let profiles = plugin.booking.guests().await?;
        Ok(guests::search(&profiles, query).into_iter().cloned().collect())
    }

    /// Add `tag` to a guest profile. Adding a tag the guest already carries changes nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the location or guest is unknown or storage fails.
    pub async fn tag_guest(
        &self,
        location: &LocationId,
        guest_id: &GuestId,
        tag: &str,
    ) -> Result<GuestProfile, DatablesError> {
        let plugin = self.registry.plugin(location)?;
        let mut guest = find_guest(plugin, guest_id).await?;
        if guest.add_tag(tag) {
            plugin.booking.save_guest(guest.clone()).await?;
            info!(guest = %guest.id, tag, "guest tagged");
        }
        Ok(guest)
    }

    /// Remove `tag` from a guest profile.
    ///
    /// # Errors
    ///
    /// Returns a [`DatablesError`] if the location or guest is unknown or storage fails.
    pub async fn untag_guest(
        &self,
        location: &LocationId,
        guest_id: &GuestId,
        tag: &str,
    ) -> Result<GuestProfile, DatablesError> {
        let plugin = self.registry.plugin(location)?;
        let mut guest = find_guest(plugin, guest_id).await?;
        if guest.remove_tag(tag) {
            plugin.booking.save_guest(guest.clone()).await?;
            info!(guest = %guest.id, tag, "guest tag removed");
        }
        Ok(guest)
    }
}

async fn find_table(plugin: &LocationPlugin, table_id: &TableId) -> Result<Table, DatablesError> {
    plugin
        .booking
        .tables()
        .await?
        .into_iter()
        .find(|table| &table.id == table_id)
        .ok_or_else(|| DatablesError::TableNotFound(table_id.clone()))
}

async fn find_guest(plugin: &LocationPlugin, guest_id: &GuestId) -> Result<GuestProfile, DatablesError> {
    plugin
        .booking
        .guests()
        .await?
        .into_iter()
        .find(|guest| &guest.id == guest_id)
        .ok_or_else(|| DatablesError::GuestNotFound(guest_id.clone()))
}

/// Free the table a finished party sat at, unless someone else has it by now.
async fn release_table(plugin: &LocationPlugin, reservation: &Reservation) -> Result<(), DatablesError> {
    let Some(table_id) = &reservation.table_id else {
        return Ok(());
    };
    let tables = plugin.booking.tables().await?;
    let held = tables
        .into_iter()
        .find(|table| &table.id == table_id && table.current_reservation_id.as_ref() == Some(&reservation.id));
    if let Some(mut table) = held {
        table.clear();
        plugin.booking.save_table(table).await?;
        debug!(table = %table_id, "table released");
    }
    Ok(())
}

async fn record_guest_visit(plugin: &LocationPlugin, reservation: &Reservation) -> Result<(), DatablesError> {
    let profiles = plugin.booking.guests().await?;
    let Some(mut guest) = guests::find_by_phone(&profiles, &reservation.guest_phone).cloned() else {
        debug!(reservation = %reservation.id, "no guest profile for visit");
        return Ok(());
    };
    guest.record_visit(Visit {
        location_id: reservation.location_id.clone(),
        date: reservation.date_time.date(),
        party_size: reservation.party_size,
        table_id: reservation.table_id.clone(),
        notes: None,
    });
    plugin.booking.save_guest(guest).await
}

async fn find_reservation(
    plugin: &LocationPlugin,
    reservation_id: &ReservationId,
) -> Result<Reservation, DatablesError> {
    plugin
        .booking
        .reservations()
        .await?
        .into_iter()
        .find(|reservation| &reservation.id == reservation_id)
        .ok_or_else(|| DatablesError::ReservationNotFound(reservation_id.clone()))
}

/// One-based place of `entry` among open entries, earliest arrival first.
fn queue_position(waitlist: &[WaitlistEntry], entry: &WaitlistEntry) -> Option<usize> {
    let mut open: Vec<&WaitlistEntry> = waitlist
        .iter()
        .filter(|candidate| candidate.status.is_open())
        .collect();
    open.sort_by_key(|candidate| candidate.joined_at);
    open.iter()
        .position(|candidate| candidate.id == entry.id)
        .map(|index| index + 1)
}
