//! Aggregations over reservations, tables, and the waitlist.
//!
//! All functions are pure: "now" and "today" are passed in, never read from the clock.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::hours::ServiceHours;
use crate::model::{
    DateRange, LocationId, Reservation, ReservationSource, ReservationStatus, Table, TableStatus,
    WaitlistEntry, WaitlistStatus,
};

/// Fraction of an occupied table's capacity assumed to be seated.
const SEATED_CAPACITY_FACTOR: f64 = 0.8;

/// Round half up, matching how the dashboard has always rounded.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round half up to one decimal place.
pub(crate) fn round_tenths(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// `round(100 * part / whole)`, zero when `whole` is zero.
#[expect(clippy::cast_precision_loss, reason = "collection sizes stay far below 2^52")]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "result is in 0..=100")]
pub(crate) fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    round_half_up(part as f64 / whole as f64 * 100.0) as u32
}

/// Guests across all reservations.
#[must_use]
pub fn total_covers(reservations: &[Reservation]) -> u32 {
    reservations.iter().map(|reservation| reservation.party_size).sum()
}

/// Mean party size to one decimal, zero for no reservations.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "collection sizes stay far below 2^52")]
pub fn average_party_size(reservations: &[Reservation]) -> f64 {
    if reservations.is_empty() {
        return 0.0;
    }
    round_tenths(f64::from(total_covers(reservations)) / reservations.len() as f64)
}

/// Share of reservations marked no-show, as a whole percentage.
#[must_use]
pub fn no_show_rate(reservations: &[Reservation]) -> u32 {
    let no_shows = count_status(reservations, ReservationStatus::NoShow);
    percent(no_shows, reservations.len())
}

/// Share of tables occupied or reserved, as a whole percentage.
#[must_use]
pub fn table_utilization(tables: &[Table]) -> u32 {
    let in_use = tables.iter().filter(|table| table.status.is_in_use()).count();
    percent(in_use, tables.len())
}

/// Mean quoted wait in whole minutes, zero for an empty waitlist.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "mean of u32 values fits u32")]
pub fn average_wait_time(waitlist: &[WaitlistEntry]) -> u32 {
    if waitlist.is_empty() {
        return 0;
    }
    let total: u64 = waitlist.iter().map(|entry| u64::from(entry.quoted_wait_minutes)).sum();
    #[expect(clippy::cast_precision_loss, reason = "minute totals stay far below 2^52")]
    let mean = total as f64 / waitlist.len() as f64;
    round_half_up(mean) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Count and share of one reservation source.
pub struct SourceShare {
    /// Channel.
    pub source: ReservationSource,
    /// Reservations from the channel.
    pub count: usize,
    /// Whole percentage of all reservations.
    pub percentage: u32,
}

/// Reservations per source, every source listed in [`ReservationSource::ALL`] order.
/// Empty when there are no reservations.
#[must_use]
pub fn source_breakdown(reservations: &[Reservation]) -> Vec<SourceShare> {
    if reservations.is_empty() {
        return Vec::new();
    }

    ReservationSource::ALL
        .into_iter()
        .map(|source| {
            let count = reservations
                .iter()
                .filter(|reservation| reservation.source == source)
                .count();
            SourceShare {
                source,
                count,
                percentage: percent(count, reservations.len()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Reservations and covers starting within one hour.
pub struct HourlyBucket {
    /// Hour of the day, 0 to 23.
    pub hour: u32,
    /// Reservations relative to the busiest hour, as a whole percentage.
    pub utilization: u32,
    /// Reservations starting in this hour.
    pub reservations: usize,
    /// Guests across those reservations.
    pub covers: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Hourly buckets over the service window.
pub struct HourlyReport {
    /// One bucket per hour of the window, in order.
    pub buckets: Vec<HourlyBucket>,
    /// Reservations whose start time fell outside the window and were not bucketed.
    pub out_of_hours: usize,
}

impl HourlyReport {
    /// The busiest bucket, earliest hour first on ties.
    #[must_use]
    pub fn peak(&self) -> Option<&HourlyBucket> {
        self.buckets
            .iter()
            .filter(|bucket| bucket.reservations > 0)
            .fold(None, |best: Option<&HourlyBucket>, bucket| match best {
                Some(current) if current.reservations >= bucket.reservations => Some(current),
                _ => Some(bucket),
            })
    }
}

/// Bucket reservations by starting hour within `hours`.
///
/// Utilization is relative to the busiest hour of the window, so the peak hour
/// always reads 100. Reservations outside the window are counted, not bucketed.
#[must_use]
pub fn hourly_buckets(reservations: &[Reservation], hours: ServiceHours) -> HourlyReport {
    let mut buckets: Vec<HourlyBucket> = hours
        .hours()
        .map(|hour| HourlyBucket {
            hour,
            utilization: 0,
            reservations: 0,
            covers: 0,
        })
        .collect();
    let mut out_of_hours = 0;

    for reservation in reservations {
        let hour = reservation.date_time.hour();
        let slot = hour
            .checked_sub(hours.open_hour)
            .and_then(|offset| buckets.get_mut(usize::try_from(offset).ok()?));
        match slot {
            Some(bucket) => {
                bucket.reservations += 1;
                bucket.covers += reservation.party_size;
            }
            None => out_of_hours += 1,
        }
    }

    if out_of_hours > 0 {
        tracing::debug!(
            out_of_hours,
            open_hour = hours.open_hour,
            close_hour = hours.close_hour,
            "reservations outside the service window were not bucketed"
        );
    }

    let peak = buckets
        .iter()
        .map(|bucket| bucket.reservations)
        .max()
        .unwrap_or(0)
        .max(1);
    for bucket in &mut buckets {
        bucket.utilization = percent(bucket.reservations, peak);
    }

    HourlyReport {
        buckets,
        out_of_hours,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Totals for a single day.
pub struct TrendPoint {
    /// Calendar day.
    pub date: NaiveDate,
    /// Reservations on the day.
    pub reservations: usize,
    /// Guests on the day.
    pub covers: u32,
    /// No-shows on the day.
    pub no_shows: usize,
    /// Walk-ins on the day.
    pub walk_ins: usize,
}

/// One [`TrendPoint`] per day of `range`, in order.
#[must_use]
pub fn daily_trend(reservations: &[Reservation], range: DateRange) -> Vec<TrendPoint> {
    range
        .days()
        .map(|date| {
            let day: Vec<Reservation> = reservations
                .iter()
                .filter(|reservation| reservation.date_time.date() == date)
                .cloned()
                .collect();
            TrendPoint {
                date,
                reservations: day.len(),
                covers: total_covers(&day),
                no_shows: count_status(&day, ReservationStatus::NoShow),
                walk_ins: day
                    .iter()
                    .filter(|reservation| reservation.source == ReservationSource::WalkIn)
                    .count(),
            }
        })
        .collect()
}

/// Daily trend over the `days` days ending `today`. Empty when `days` is zero.
#[must_use]
pub fn trailing_trend(reservations: &[Reservation], today: NaiveDate, days: u32) -> Vec<TrendPoint> {
    if days == 0 {
        return Vec::new();
    }
    daily_trend(reservations, DateRange::trailing(today, days))
}

/// Borrowed view of one location's floor state.
#[derive(Debug, Clone, Copy)]
pub struct FloorView<'data> {
    /// Every reservation known for the location.
    pub reservations: &'data [Reservation],
    /// Every table of the location.
    pub tables: &'data [Table],
    /// Every waitlist entry of the location.
    pub waitlist: &'data [WaitlistEntry],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Figures for the current service day.
pub struct TodayMetrics {
    /// Reservations today.
    pub total_reservations: usize,
    /// Guests booked today.
    pub total_covers: u32,
    /// Mean party size today.
    pub average_party_size: f64,
    /// Guests estimated at occupied tables right now.
    pub currently_seated: u32,
    /// Table utilization right now.
    pub table_utilization: u32,
    /// Parties currently waiting.
    pub waitlist_depth: usize,
    /// Mean quoted wait of waiting parties.
    pub average_wait_time: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Figures for the trailing seven days.
pub struct WeekMetrics {
    /// Reservations in the window.
    pub total_reservations: usize,
    /// Guests in the window.
    pub total_covers: u32,
    /// No-show rate in the window.
    pub no_show_rate: u32,
    /// Mean party size in the window.
    pub average_party_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Dashboard analytics for one location.
pub struct LocationAnalytics {
    /// Location reported on.
    pub location_id: LocationId,
    /// Local time the figures were computed for.
    pub generated_at: NaiveDateTime,
    /// Current day.
    pub today: TodayMetrics,
    /// Trailing seven days.
    pub week: WeekMetrics,
    /// Source mix over the trailing seven days.
    pub source_breakdown: Vec<SourceShare>,
    /// Hourly load over the trailing seven days.
    pub hourly: HourlyReport,
    /// Daily totals for the last seven days.
    pub trend: Vec<TrendPoint>,
}

/// Compute dashboard analytics for `location_id` as of `now`.
///
/// Records belonging to other locations are ignored.
#[must_use]
pub fn location_snapshot(
    location_id: &LocationId,
    floor: FloorView<'_>,
    now: NaiveDateTime,
    hours: ServiceHours,
) -> LocationAnalytics {
    let reservations: Vec<Reservation> = floor
        .reservations
        .iter()
        .filter(|reservation| &reservation.location_id == location_id)
        .cloned()
        .collect();
    let tables: Vec<Table> = floor
        .tables
        .iter()
        .filter(|table| &table.location_id == location_id)
        .cloned()
        .collect();
    let waiting: Vec<WaitlistEntry> = floor
        .waitlist
        .iter()
        .filter(|entry| &entry.location_id == location_id && entry.status == WaitlistStatus::Waiting)
        .cloned()
        .collect();

    let today = now.date();
    let today_reservations: Vec<Reservation> = reservations
        .iter()
        .filter(|reservation| reservation.date_time.date() == today)
        .cloned()
        .collect();
    let week_start = now - Duration::days(7);
    let week_reservations: Vec<Reservation> = reservations
        .iter()
        .filter(|reservation| reservation.date_time >= week_start && reservation.date_time <= now)
        .cloned()
        .collect();

    LocationAnalytics {
        location_id: location_id.clone(),
        generated_at: now,
        today: TodayMetrics {
            total_reservations: today_reservations.len(),
            total_covers: total_covers(&today_reservations),
            average_party_size: average_party_size(&today_reservations),
            currently_seated: currently_seated(&tables),
            table_utilization: table_utilization(&tables),
            waitlist_depth: waiting.len(),
            average_wait_time: average_wait_time(&waiting),
        },
        week: WeekMetrics {
            total_reservations: week_reservations.len(),
            total_covers: total_covers(&week_reservations),
            no_show_rate: no_show_rate(&week_reservations),
            average_party_size: average_party_size(&week_reservations),
        },
        source_breakdown: source_breakdown(&week_reservations),
        hourly: hourly_buckets(&week_reservations, hours),
        trend: trailing_trend(&reservations, today, 7),
    }
}

/// Guests estimated at occupied tables, `ceil(0.8 * capacity)` per table.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "ceil of a fraction of a u32")]
pub fn currently_seated(tables: &[Table]) -> u32 {
    tables
        .iter()
        .filter(|table| table.status == TableStatus::Occupied)
        .map(|table| (f64::from(table.capacity) * SEATED_CAPACITY_FACTOR).ceil() as u32)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Relative change between two figures.
pub struct Change {
    /// Percentage change to one decimal.
    pub value: f64,
    /// Whether the change is zero or positive.
    pub is_positive: bool,
    /// Signed label such as `+12.5%`.
    pub display: String,
}

/// Percentage change from `previous` to `current`. A zero baseline reports `+0%`.
#[must_use]
pub fn percent_change(current: f64, previous: f64) -> Change {
    if previous == 0.0 {
        return Change {
            value: 0.0,
            is_positive: true,
            display: "+0%".to_owned(),
        };
    }

    let rounded = round_tenths((current - previous) / previous * 100.0);
    let is_positive = rounded >= 0.0;
    let sign = if is_positive { "+" } else { "" };
    Change {
        value: rounded,
        is_positive,
        display: format!("{sign}{rounded}%"),
    }
}

/// Twelve-hour label for an hour of the day, e.g. `5:00 PM`.
#[must_use]
pub fn format_hour(hour: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour {
        0 => 12,
        13.. => hour - 12,
        _ => hour,
    };
    format!("{display}:00 {period}")
}

fn count_status(reservations: &[Reservation], status: ReservationStatus) -> usize {
    reservations
        .iter()
        .filter(|reservation| reservation.status == status)
        .count()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::model::fixtures::{at, day, reservation, table, waitlist_entry};
    use crate::model::TableShape;

    fn booking(id: &str, party: u32, when: NaiveDateTime) -> Reservation {
        let mut booking = reservation(id, party);
        booking.date_time = when;
        booking
    }

    #[test]
    fn covers_and_average_party_size() {
        let bookings = vec![reservation("1", 4), reservation("2", 2), reservation("3", 3)];
        assert_eq!(total_covers(&bookings), 9);
        assert!((average_party_size(&bookings) - 3.0).abs() < f64::EPSILON);
        assert_eq!(total_covers(&[]), 0);
        assert!(average_party_size(&[]).abs() < f64::EPSILON);

        let uneven = vec![reservation("1", 1), reservation("2", 2), reservation("3", 2)];
        // 5 / 3 = 1.666..
        assert!((average_party_size(&uneven) - 1.7).abs() < 1e-9);
    }

    #[test]
    fn no_show_rate_rounds_and_handles_empty() {
        let mut bookings = vec![reservation("1", 2), reservation("2", 2), reservation("3", 2)];
        bookings[0].status = ReservationStatus::NoShow;
        assert_eq!(no_show_rate(&bookings), 33);
        bookings[1].status = ReservationStatus::NoShow;
        assert_eq!(no_show_rate(&bookings), 67);
        assert_eq!(no_show_rate(&[]), 0);
    }

    #[test]
    fn utilization_counts_occupied_and_reserved() {
        let mut tables: Vec<Table> = (1..=8)
            .map(|id| table(&id.to_string(), 4, TableShape::Square, "Main Dining"))
            .collect();
        tables[2].status = TableStatus::Occupied;
        tables[3].status = TableStatus::Reserved;
        tables[5].status = TableStatus::Finishing;
        tables[6].status = TableStatus::Blocked;
        assert_eq!(table_utilization(&tables), 25);
        assert_eq!(table_utilization(&[]), 0);
    }

    #[test]
    fn average_wait_rounds_half_up() {
        let waitlist = vec![waitlist_entry("1", 2, 15), waitlist_entry("2", 2, 20)];
        assert_eq!(average_wait_time(&waitlist), 18);
        assert_eq!(average_wait_time(&[]), 0);
    }

    #[test]
    fn source_breakdown_lists_every_source() {
        let mut bookings = vec![reservation("1", 2), reservation("2", 2), reservation("3", 2)];
        bookings[0].source = ReservationSource::Phone;
        bookings[1].source = ReservationSource::WalkIn;

        let shares = source_breakdown(&bookings);
        let summary: Vec<_> = shares
            .iter()
            .map(|share| (share.source, share.count, share.percentage))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ReservationSource::IosApp, 0, 0),
                (ReservationSource::Phone, 1, 33),
                (ReservationSource::WalkIn, 1, 33),
                (ReservationSource::Web, 1, 33),
            ]
        );
        assert!(source_breakdown(&[]).is_empty());
    }

    #[test]
    fn hourly_buckets_normalize_to_peak_and_count_out_of_hours() {
        let bookings = vec![
            booking("1", 4, at(18, 30)),
            booking("2", 2, at(18, 45)),
            booking("3", 6, at(19, 0)),
            booking("4", 2, at(9, 15)),
        ];

        let report = hourly_buckets(&bookings, ServiceHours::default());
        assert_eq!(report.buckets.len(), 13);
        assert_eq!(report.buckets.first().map(|bucket| bucket.hour), Some(11));
        assert_eq!(report.buckets.last().map(|bucket| bucket.hour), Some(23));
        assert_eq!(report.out_of_hours, 1);

        let six = report.buckets.iter().find(|bucket| bucket.hour == 18).expect("18:00 bucket");
        assert_eq!((six.reservations, six.covers, six.utilization), (2, 6, 100));
        let seven = report.buckets.iter().find(|bucket| bucket.hour == 19).expect("19:00 bucket");
        assert_eq!(seven.utilization, 50);
        assert_eq!(report.peak().map(|bucket| bucket.hour), Some(18));
    }

    #[test]
    fn hourly_buckets_on_empty_input_are_all_zero() {
        let report = hourly_buckets(&[], ServiceHours::default());
        assert!(report.buckets.iter().all(|bucket| bucket.utilization == 0));
        assert_eq!(report.out_of_hours, 0);
        assert!(report.peak().is_none());
    }

    #[test]
    fn daily_trend_emits_every_day_of_the_range() {
        let mut walk_in = booking("1", 3, at(12, 0));
        walk_in.source = ReservationSource::WalkIn;
        let mut no_show = booking("2", 2, day(28).and_hms_opt(19, 0, 0).expect("valid"));
        no_show.status = ReservationStatus::NoShow;
        let bookings = vec![walk_in, no_show, booking("3", 4, at(20, 0))];

        let trend = trailing_trend(&bookings, day(30), 7);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend.first().map(|point| point.date), Some(day(24)));

        let last = trend.last().expect("today");
        assert_eq!((last.reservations, last.covers, last.walk_ins, last.no_shows), (2, 7, 1, 0));
        let twenty_eighth = trend.iter().find(|point| point.date == day(28)).expect("28th");
        assert_eq!(twenty_eighth.no_shows, 1);

        assert!(trailing_trend(&bookings, day(30), 0).is_empty());
    }

    #[test]
    fn snapshot_scopes_to_location_and_windows() {
        let mut elsewhere = booking("9", 10, at(18, 0));
        elsewhere.location_id = LocationId::from("santa-ana");
        let mut last_week = booking("2", 2, day(25).and_hms_opt(19, 0, 0).expect("valid"));
        last_week.status = ReservationStatus::NoShow;
        let bookings = vec![booking("1", 4, at(12, 0)), last_week, elsewhere, booking("3", 6, at(20, 0))];

        let mut tables = vec![
            table("1", 4, TableShape::Square, "Main Dining"),
            table("2", 6, TableShape::Rectangle, "Main Dining"),
        ];
        tables[0].status = TableStatus::Occupied;
        let mut seated = waitlist_entry("2", 2, 30);
        seated.status = WaitlistStatus::Seated;
        let waitlist = vec![waitlist_entry("1", 3, 15), seated];

        let now = at(19, 0);
        let snapshot = location_snapshot(
            &LocationId::from("tustin"),
            FloorView {
                reservations: &bookings,
                tables: &tables,
                waitlist: &waitlist,
            },
            now,
            ServiceHours::default(),
        );

        // The 20:00 booking counts for today but is still ahead of `now`, so the week skips it.
        assert_eq!(snapshot.today.total_reservations, 2);
        assert_eq!(snapshot.today.total_covers, 10);
        assert_eq!(snapshot.today.currently_seated, 4);
        assert_eq!(snapshot.today.table_utilization, 50);
        assert_eq!(snapshot.today.waitlist_depth, 1);
        assert_eq!(snapshot.today.average_wait_time, 15);

        assert_eq!(snapshot.week.total_reservations, 2);
        assert_eq!(snapshot.week.no_show_rate, 50);
        assert_eq!(snapshot.trend.len(), 7);
        assert_eq!(snapshot.source_breakdown.len(), 4);
    }

    #[test]
    fn percent_change_formats_sign() {
        let up = percent_change(45.0, 40.0);
        assert!((up.value - 12.5).abs() < 1e-9);
        assert_eq!(up.display, "+12.5%");

        let down = percent_change(30.0, 40.0);
        assert!(!down.is_positive);
        assert_eq!(down.display, "-25%");

        assert_eq!(percent_change(10.0, 0.0).display, "+0%");
    }

    #[test]
    fn hour_labels_use_twelve_hour_clock() {
        assert_eq!(format_hour(0), "12:00 AM");
        assert_eq!(format_hour(11), "11:00 AM");
        assert_eq!(format_hour(12), "12:00 PM");
        assert_eq!(format_hour(17), "5:00 PM");
    }

    proptest! {
        #[test]
        fn prop_rates_stay_within_percent_bounds(
            parties in proptest::collection::vec(1u32..=20, 0..40),
            no_show_mask in proptest::collection::vec(any::<bool>(), 40),
        ) {
            let bookings: Vec<Reservation> = parties
                .iter()
                .zip(&no_show_mask)
                .enumerate()
                .map(|(index, (&party, &no_show))| {
                    let mut booking = reservation(&index.to_string(), party);
                    if no_show {
                        booking.status = ReservationStatus::NoShow;
                    }
                    booking
                })
                .collect();

            prop_assert_eq!(total_covers(&bookings), parties.iter().sum::<u32>());
            prop_assert!(no_show_rate(&bookings) <= 100);
            let average = average_party_size(&bookings);
            prop_assert!((0.0..=20.0).contains(&average));
        }

        #[test]
        fn prop_hourly_buckets_never_leave_the_window(
            hours in proptest::collection::vec(0u32..24, 0..30),
        ) {
            let bookings: Vec<Reservation> = hours
                .iter()
                .enumerate()
                .map(|(index, &hour)| booking(&index.to_string(), 2, at(hour, 0)))
                .collect();
            let window = ServiceHours::default();

            let report = hourly_buckets(&bookings, window);
            prop_assert!(report.buckets.iter().all(|bucket| window.contains(bucket.hour)));
            let bucketed: usize = report.buckets.iter().map(|bucket| bucket.reservations).sum();
            prop_assert_eq!(bucketed + report.out_of_hours, bookings.len());
            prop_assert!(report.buckets.iter().all(|bucket| bucket.utilization <= 100));
        }
    }
}
