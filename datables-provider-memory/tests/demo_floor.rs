use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use datables_core::{
    hours::ServiceHours,
    model::{
        DateRange, GuestId, LocationId, ReservationId, ReservationSource, ReservationUpdate,
        SeatingPreference, TableId, WaitlistEntryId, WaitlistStatus,
    },
    notify::NotificationStatus,
    validation::ReservationRequest,
    DatablesService,
};
use datables_provider_memory::{demo_locations, registry, LogSmsPort, MemoryLocation, Snapshot};

fn friday_evening() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 30)
        .and_then(|day| day.and_hms_opt(19, 0, 0))
        .expect("valid time")
}

fn service(locations: &[MemoryLocation]) -> DatablesService {
    DatablesService::new(
        Arc::new(registry(locations)),
        Arc::new(LogSmsPort),
        ServiceHours::default(),
    )
}

fn tustin() -> LocationId {
    LocationId::from("tustin")
}

#[tokio::test]
async fn demo_floor_recommends_the_booth_for_the_birthday() {
    let locations = demo_locations(friday_evening());
    let ranked = service(&locations)
        .recommend_tables(&tustin(), &ReservationId::from("1"))
        .await
        .expect("recommendations");

    let best = ranked.first().expect("at least one table");
    assert_eq!(best.table.id, TableId::from("6"));
    assert_eq!(best.match_score, 85);
    // Occupied and reserved tables are never offered.
    assert!(ranked.iter().all(|rec| rec.table.status.is_seatable()));
}

#[tokio::test]
async fn demo_analytics_match_the_seeded_floor() {
    let locations = demo_locations(friday_evening());
    let analytics = service(&locations)
        .location_analytics(&tustin(), friday_evening())
        .await
        .expect("analytics");

    assert_eq!(analytics.today.total_reservations, 4);
    assert_eq!(analytics.today.total_covers, 20);
    assert_eq!(analytics.today.waitlist_depth, 3);
    assert_eq!(analytics.today.table_utilization, 22);
    assert_eq!(analytics.today.currently_seated, 4);
    assert_eq!(analytics.trend.len(), 7);
}

#[tokio::test]
async fn comparison_covers_both_locations() {
    let locations = demo_locations(friday_evening());
    let range = DateRange::trailing(friday_evening().date(), 7);
    let report = service(&locations)
        .compare_locations(&[], range)
        .await
        .expect("report");

    let names: Vec<&str> = report
        .locations
        .iter()
        .map(|location| location.location_name.as_str())
        .collect();
    assert_eq!(names, vec!["Santa Ana", "Tustin"]);
    assert_eq!(report.combined.total_reservations, 54);
}

#[tokio::test]
async fn notifying_uses_the_location_template() {
    let locations = demo_locations(friday_evening());
    let log = service(&locations)
        .notify_waitlist_guest(&tustin(), &WaitlistEntryId::from("1"), friday_evening())
        .await
        .expect("notified");

    assert_eq!(log.status, NotificationStatus::Delivered);
    assert!(log.message.starts_with("Hi Emily Wilson! Your table for 3 is ready at I Can Barbecue - Tustin."));

    let records = locations[0].store().records().await;
    let entry = records
        .waitlist
        .iter()
        .find(|entry| entry.id == WaitlistEntryId::from("1"))
        .expect("entry kept");
    assert_eq!(entry.status, WaitlistStatus::Notified);
}

#[tokio::test]
async fn bookings_survive_a_snapshot_on_disk() {
    let locations = demo_locations(friday_evening());
    let booked = service(&locations)
        .book_reservation(ReservationRequest {
            location_id: tustin(),
            guest_name: "Lisa Park".to_owned(),
            guest_phone: "+17145552222".to_owned(),
            guest_email: None,
            party_size: 5,
            date_time: NaiveDate::from_ymd_opt(2026, 1, 30)
                .and_then(|day| day.and_hms_opt(20, 15, 0))
                .expect("valid time"),
            seating_preference: SeatingPreference::Patio,
            special_requests: None,
            source: ReservationSource::Phone,
            high_chairs: 0,
            kids_in_party: 0,
        })
        .await
        .expect("booked");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("floor.json");
    Snapshot::capture(&locations).await.save(&path).expect("saved");

    let restored = Snapshot::load(&path)
        .and_then(|snapshot| snapshot.into_locations(2026))
        .expect("restored");
    assert_eq!(restored.len(), 2);
    let tustin = restored
        .iter()
        .find(|location| location.meta().id == tustin())
        .expect("tustin restored");
    let records = tustin.store().records().await;
    assert!(records.reservations.iter().any(|reservation| reservation.id == booked.id));
    assert_eq!(tustin.store().guest_book().profiles().await.len(), 5);
    assert_eq!(tustin.templates().len(), 3);
    assert!(Arc::ptr_eq(
        restored[0].store().guest_book(),
        restored[1].store().guest_book()
    ));
}

#[tokio::test]
async fn guest_tags_are_seen_at_every_location() {
    let locations = demo_locations(friday_evening());
    let service = service(&locations);
    service
        .tag_guest(&tustin(), &GuestId::from("5"), "VIP")
        .await
        .expect("tagged at tustin");

    let found = service
        .search_guests(&LocationId::from("santa-ana"), "emily chen")
        .await
        .expect("search");
    assert_eq!(found.len(), 1);
    assert!(found[0].has_tag("VIP"));
}

#[tokio::test]
async fn finished_parties_free_their_table() {
    let locations = demo_locations(friday_evening());
    let service = service(&locations);
    service
        .assign_table(&tustin(), &ReservationId::from("1"), &TableId::from("6"))
        .await
        .expect("seated");
    let ranked = service
        .recommend_tables(&tustin(), &ReservationId::from("2"))
        .await
        .expect("recommendations");
    assert!(ranked.iter().all(|rec| rec.table.id != TableId::from("6")));

    service
        .update_reservation(&tustin(), &ReservationId::from("1"), ReservationUpdate::Complete)
        .await
        .expect("completed");
    let ranked = service
        .recommend_tables(&tustin(), &ReservationId::from("2"))
        .await
        .expect("recommendations");
    assert!(ranked.iter().any(|rec| rec.table.id == TableId::from("6")));
}
