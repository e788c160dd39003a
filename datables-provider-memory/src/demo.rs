//! Demo floor for the two I Can Barbecue locations, laid out relative to "now".

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use datables_core::{
    hours::Schedule,
    model::{
        GuestId, GuestPreferences, GuestProfile, Location, LocationId, Locations, Position,
        Reservation, ReservationId, ReservationSource, ReservationStatus, SeatingPreference, Table,
        TableId, TableShape, TableStatus, Visit, WaitlistEntry, WaitlistEntryId, WaitlistStatus,
    },
    notify::{SmsTemplate, TemplateKind},
};

use crate::store::{GuestBook, Records};
use crate::MemoryLocation;

/// Days of completed history generated before today.
const HISTORY_DAYS: i64 = 6;

/// Both demo locations, seeded for the day of `now`.
#[must_use]
pub fn demo_locations(now: NaiveDateTime) -> Vec<MemoryLocation> {
    let today = now.date();
    let guests = Arc::new(GuestBook::new(guest_book(now)));
    [
        (tustin(), tustin_records(now)),
        (santa_ana(), santa_ana_records(today)),
    ]
    .into_iter()
    .map(|(meta, records)| {
        let templates = templates_for(&meta);
        MemoryLocation::new(meta, records, &guests, Schedule::standard(today.year()), templates)
    })
    .collect()
}

fn tustin() -> Location {
    Location {
        id: Locations::Tustin.into(),
        name: "Tustin".to_owned(),
        full_name: "I Can Barbecue - Tustin".to_owned(),
        address: "12345 Main St, Tustin, CA 92780".to_owned(),
        phone: "(714) 555-0100".to_owned(),
        timezone: "America/Los_Angeles".to_owned(),
    }
}

fn santa_ana() -> Location {
    Location {
        id: Locations::SantaAna.into(),
        name: "Santa Ana".to_owned(),
        full_name: "I Can Barbecue - Santa Ana".to_owned(),
        address: "67890 Broadway, Santa Ana, CA 92701".to_owned(),
        phone: "(714) 555-0200".to_owned(),
        timezone: "America/Los_Angeles".to_owned(),
    }
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default())
}

struct Booking<'a> {
    id: &'a str,
    name: &'a str,
    phone: &'a str,
    party_size: u32,
    date_time: NaiveDateTime,
    status: ReservationStatus,
    source: ReservationSource,
    preference: SeatingPreference,
}

impl Booking<'_> {
    fn into_reservation(self, location: &LocationId) -> Reservation {
        let stamp = (self.date_time - Duration::days(2)).and_utc();
        Reservation {
            id: ReservationId::from(self.id),
            location_id: location.clone(),
            guest_name: self.name.to_owned(),
            guest_phone: self.phone.to_owned(),
            guest_email: None,
            party_size: self.party_size,
            date_time: self.date_time,
            status: self.status,
            source: self.source,
            table_id: None,
            special_requests: None,
            seating_preference: self.preference,
            high_chairs: 0,
            kids_in_party: 0,
            created_at: stamp,
            updated_at: stamp,
        }
    }
}

fn tustin_records(now: NaiveDateTime) -> Records {
    let today = now.date();
    let location = LocationId::from(Locations::Tustin);

    let mut birthday = Booking {
        id: "1",
        name: "John Smith",
        phone: "+17145551234",
        party_size: 4,
        date_time: at(today, 18, 30),
        status: ReservationStatus::Confirmed,
        source: ReservationSource::IosApp,
        preference: SeatingPreference::Inside,
    }
    .into_reservation(&location);
    birthday.guest_email = Some("john@email.com".to_owned());
    birthday.special_requests = Some("Birthday celebration, need cake".to_owned());

    let patio = Booking {
        id: "2",
        name: "Sarah Jones",
        phone: "+17145555678",
        party_size: 2,
        date_time: at(today, 18, 45),
        status: ReservationStatus::Pending,
        source: ReservationSource::Phone,
        preference: SeatingPreference::Patio,
    }
    .into_reservation(&location);

    let mut family = Booking {
        id: "3",
        name: "Maria Garcia",
        phone: "+17145559012",
        party_size: 6,
        date_time: at(today, 19, 0),
        status: ReservationStatus::Confirmed,
        source: ReservationSource::IosApp,
        preference: SeatingPreference::Inside,
    }
    .into_reservation(&location);
    family.guest_email = Some("maria@email.com".to_owned());
    family.kids_in_party = 2;
    family.high_chairs = 1;

    let mut anniversary = Booking {
        id: "4",
        name: "David Lee",
        phone: "+17145553456",
        party_size: 8,
        date_time: at(today, 19, 30),
        status: ReservationStatus::Confirmed,
        source: ReservationSource::Web,
        preference: SeatingPreference::Inside,
    }
    .into_reservation(&location);
    anniversary.special_requests = Some("Anniversary dinner".to_owned());

    let mut reservations = vec![birthday, patio, family, anniversary];
    reservations.extend(history(&location, today, "t"));

    Records {
        reservations,
        tables: tustin_tables(&location),
        waitlist: tustin_waitlist(&location, now),
    }
}

fn tustin_tables(location: &LocationId) -> Vec<Table> {
    [
        ("1", 2, TableShape::Circle, TableStatus::Available, "Main Dining", None, (100.0, 100.0)),
        ("2", 2, TableShape::Circle, TableStatus::Available, "Main Dining", None, (200.0, 100.0)),
        ("3", 4, TableShape::Square, TableStatus::Occupied, "Main Dining", None, (300.0, 100.0)),
        ("4", 4, TableShape::Square, TableStatus::Reserved, "Main Dining", Some("2"), (400.0, 100.0)),
        ("5", 6, TableShape::Rectangle, TableStatus::Available, "Main Dining", None, (100.0, 200.0)),
        ("6", 4, TableShape::Booth, TableStatus::Finishing, "Main Dining", Some("3"), (200.0, 200.0)),
        ("7", 2, TableShape::Circle, TableStatus::Available, "Patio", None, (300.0, 200.0)),
        ("8", 4, TableShape::Square, TableStatus::Available, "Patio", None, (400.0, 200.0)),
        ("9", 2, TableShape::Circle, TableStatus::Available, "Bar", None, (500.0, 100.0)),
    ]
    .into_iter()
    .map(|(id, capacity, shape, status, section, reservation, (x, y))| Table {
        id: TableId::from(id),
        location_id: location.clone(),
        number: id.to_owned(),
        capacity,
        shape,
        status,
        section: section.to_owned(),
        current_reservation_id: reservation.map(ReservationId::from),
        position: Position { x, y },
    })
    .collect()
}

fn tustin_waitlist(location: &LocationId, now: NaiveDateTime) -> Vec<WaitlistEntry> {
    [
        ("1", "Emily Wilson", "+17145557890", 3, 15, 10, SeatingPreference::Any, None),
        ("2", "Robert Brown", "+17145551234", 2, 20, 5, SeatingPreference::Bar, None),
        (
            "3",
            "Lisa Anderson",
            "+17145555678",
            4,
            25,
            2,
            SeatingPreference::Patio,
            Some("Celebrating graduation"),
        ),
    ]
    .into_iter()
    .map(
        |(id, name, phone, party_size, quoted, minutes_ago, preference, requests)| WaitlistEntry {
            id: WaitlistEntryId::from(id),
            location_id: location.clone(),
            guest_name: name.to_owned(),
            guest_phone: phone.to_owned(),
            party_size,
            quoted_wait_minutes: quoted,
            joined_at: now - Duration::minutes(minutes_ago),
            status: WaitlistStatus::Waiting,
            seating_preference: preference,
            special_requests: requests.map(str::to_owned),
            notified_at: None,
        },
    )
    .collect()
}

fn santa_ana_records(today: NaiveDate) -> Records {
    let location = LocationId::from(Locations::SantaAna);

    let mut reservations = vec![
        Booking {
            id: "sa-1",
            name: "Kevin Nguyen",
            phone: "+17145554444",
            party_size: 10,
            date_time: at(today, 19, 0),
            status: ReservationStatus::Confirmed,
            source: ReservationSource::Phone,
            preference: SeatingPreference::Any,
        }
        .into_reservation(&location),
        Booking {
            id: "sa-2",
            name: "Angela Ruiz",
            phone: "+17145556666",
            party_size: 3,
            date_time: at(today, 17, 45),
            status: ReservationStatus::Confirmed,
            source: ReservationSource::Web,
            preference: SeatingPreference::Inside,
        }
        .into_reservation(&location),
    ];
    reservations.extend(history(&location, today, "sa"));

    let tables = [
        ("1", 2, TableShape::Circle, TableStatus::Available, "Main Dining"),
        ("2", 4, TableShape::Square, TableStatus::Occupied, "Main Dining"),
        ("3", 4, TableShape::Booth, TableStatus::Available, "Main Dining"),
        ("4", 6, TableShape::Rectangle, TableStatus::Available, "Main Dining"),
        ("10", 12, TableShape::Rectangle, TableStatus::Available, "Private Room"),
    ]
    .into_iter()
    .map(|(number, capacity, shape, status, section)| Table {
        id: TableId(format!("sa-{number}")),
        location_id: location.clone(),
        number: number.to_owned(),
        capacity,
        shape,
        status,
        section: section.to_owned(),
        current_reservation_id: None,
        position: Position::default(),
    })
    .collect();

    Records {
        reservations,
        tables,
        waitlist: Vec::new(),
    }
}

/// Closed-out reservations for the days before `today`, one in seven a no-show.
fn history(location: &LocationId, today: NaiveDate, prefix: &str) -> Vec<Reservation> {
    static SLOTS: [(u32, u32, u32, ReservationSource); 5] = [
        (12, 0, 2, ReservationSource::Web),
        (13, 30, 4, ReservationSource::Phone),
        (18, 0, 6, ReservationSource::IosApp),
        (19, 15, 3, ReservationSource::WalkIn),
        (20, 0, 2, ReservationSource::Web),
    ];

    (1..=HISTORY_DAYS)
        .flat_map(|days_ago| {
            let day = today - Duration::days(days_ago);
            let per_day = usize::try_from(3 + days_ago % 3).unwrap_or(SLOTS.len());
            SLOTS
                .iter()
                .take(per_day)
                .enumerate()
                .map(move |(slot, &(hour, minute, party_size, source))| {
                    let sequence = days_ago * 10 + i64::try_from(slot).unwrap_or_default();
                    let status = if sequence % 7 == 0 {
                        ReservationStatus::NoShow
                    } else {
                        ReservationStatus::Completed
                    };
                    (format!("{prefix}-{days_ago}-{slot}"), at(day, hour, minute), party_size, source, status)
                })
        })
        .map(|(id, date_time, party_size, source, status)| {
            Booking {
                id: &id,
                name: "Returning Guest",
                phone: "+17145550000",
                party_size,
                date_time,
                status,
                source,
                preference: SeatingPreference::Any,
            }
            .into_reservation(location)
        })
        .collect()
}

fn guest_book(now: NaiveDateTime) -> Vec<GuestProfile> {
    let today = now.date();
    let tustin = LocationId::from(Locations::Tustin);
    let visit = |days_ago: i64, party_size: u32, table: &str| Visit {
        location_id: tustin.clone(),
        date: today - Duration::days(days_ago),
        party_size,
        table_id: Some(TableId::from(table)),
        notes: None,
    };
    let profile = |id: &str,
                   name: &str,
                   phone: &str,
                   tags: &[&str],
                   preferences: GuestPreferences,
                   visits: Vec<Visit>,
                   total_visits: u32,
                   days_known: i64| GuestProfile {
        id: GuestId::from(id),
        name: name.to_owned(),
        phone: phone.to_owned(),
        email: name
            .split(' ')
            .next()
            .map(|first| format!("{}@email.com", first.to_lowercase())),
        tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
        preferences,
        last_visit: visits.first().map(|visit| visit.date),
        visit_history: visits,
        total_visits,
        created_at: (now - Duration::days(days_known)).and_utc(),
    };
    let prefers = |seating, dietary: &[&str], notes: &str| GuestPreferences {
        seating: Some(seating),
        dietary: dietary.iter().map(|item| (*item).to_owned()).collect(),
        notes: Some(notes.to_owned()),
    };

    vec![
        profile(
            "1",
            "John Smith",
            "+17145551234",
            &["VIP", "Regular"],
            prefers(
                SeatingPreference::Patio,
                &["No shellfish"],
                "Prefers spicy dishes, always orders the ribeye",
            ),
            vec![visit(5, 2, "3"), visit(12, 4, "5"), visit(20, 2, "1")],
            24,
            594,
        ),
        profile(
            "2",
            "Sarah Johnson",
            "+17145555678",
            &["Birthday"],
            prefers(SeatingPreference::Inside, &["Vegetarian"], "Celebrating birthday in February"),
            vec![visit(10, 4, "4")],
            8,
            326,
        ),
        profile(
            "3",
            "Maria Garcia",
            "+17145559012",
            &["Regular", "Family"],
            prefers(SeatingPreference::Inside, &[], "Usually brings 2 kids, needs high chairs"),
            vec![visit(2, 4, "5"), visit(15, 5, "5")],
            15,
            497,
        ),
        profile(
            "4",
            "David Lee",
            "+17145553456",
            &["VIP", "Anniversary"],
            prefers(
                SeatingPreference::Inside,
                &["Gluten-free"],
                "Anniversary dinner regular, always requests quiet table",
            ),
            vec![visit(8, 2, "6")],
            12,
            451,
        ),
        profile(
            "5",
            "Emily Chen",
            "+17145557777",
            &["Regular"],
            prefers(SeatingPreference::Bar, &[], "Prefers bar seating for quick lunches"),
            vec![visit(3, 1, "1")],
            20,
            536,
        ),
    ]
}

fn templates_for(location: &Location) -> Vec<SmsTemplate> {
    let restaurant = &location.full_name;
    [
        (
            "waitlist-ready",
            "Table Ready",
            TemplateKind::WaitlistReady,
            format!(
                "Hi {{{{guestName}}}}! Your table for {{{{partySize}}}} is ready at {restaurant}. \
                 Please check in with the host within 10 minutes."
            ),
        ),
        (
            "reservation-confirm",
            "Reservation Confirmed",
            TemplateKind::ReservationConfirm,
            format!(
                "Your reservation at {restaurant} is confirmed for {{{{date}}}} at {{{{time}}}} \
                 for {{{{partySize}}}} guests. See you soon!"
            ),
        ),
        (
            "reservation-reminder",
            "Reminder",
            TemplateKind::ReservationReminder,
            format!(
                "Reminder: You have a reservation at {restaurant} today at {{{{time}}}} \
                 for {{{{partySize}}}} guests. Reply CANCEL to cancel."
            ),
        ),
    ]
    .into_iter()
    .map(|(slug, name, kind, body)| SmsTemplate {
        id: format!("{}-{slug}", location.id),
        location_id: location.id.clone(),
        name: name.to_owned(),
        kind,
        body,
        is_default: true,
    })
    .collect()
}
