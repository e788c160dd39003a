//! Side-by-side metrics across locations for a date range.

use serde::Serialize;

use crate::analytics::{
    average_party_size, daily_trend, no_show_rate, percent, round_half_up, table_utilization,
    total_covers, TrendPoint,
};
use crate::model::{DateRange, Location, LocationId, Reservation, ReservationSource, Table};

/// Reservations whose local date falls within `range`.
#[must_use]
pub fn filter_by_date_range(reservations: &[Reservation], range: DateRange) -> Vec<Reservation> {
    reservations
        .iter()
        .filter(|reservation| range.contains(reservation.date_time.date()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Figures compared between locations.
pub struct ComparisonMetrics {
    /// Reservations in the range.
    pub total_reservations: usize,
    /// Guests in the range.
    pub total_covers: u32,
    /// Whole-percent no-show rate.
    pub no_show_rate: u32,
    /// Mean party size to one decimal.
    pub average_party_size: f64,
    /// Current table utilization.
    pub table_utilization: u32,
    /// Whole-percent share of walk-ins.
    pub walk_in_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Metrics for one location.
pub struct LocationMetrics {
    /// Location reported on.
    pub location_id: LocationId,
    /// Display name.
    pub location_name: String,
    /// Figures for the range.
    pub metrics: ComparisonMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Totals across every compared location.
pub struct CombinedMetrics {
    /// Reservations across locations.
    pub total_reservations: usize,
    /// Guests across locations.
    pub total_covers: u32,
    /// Mean of the per-location no-show rates.
    pub average_no_show_rate: u32,
    /// Mean of the per-location utilization figures.
    pub average_utilization: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Daily series for one location.
pub struct LocationTrend {
    /// Location reported on.
    pub location_id: LocationId,
    /// Display name.
    pub location_name: String,
    /// One point per day of the range.
    pub data: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Cross-location comparison for a date range.
pub struct ComparisonReport {
    /// Range compared.
    pub date_range: DateRange,
    /// Per-location figures, in the requested order.
    pub locations: Vec<LocationMetrics>,
    /// Figures across all locations.
    pub combined: CombinedMetrics,
    /// Per-location daily series, in the requested order.
    pub trends: Vec<LocationTrend>,
}

/// Metrics for `location` over `range`. Records of other locations are ignored.
#[must_use]
pub fn location_metrics(
    reservations: &[Reservation],
    tables: &[Table],
    location: &Location,
    range: DateRange,
) -> LocationMetrics {
    let in_range: Vec<Reservation> = reservations
        .iter()
        .filter(|reservation| {
            reservation.location_id == location.id && range.contains(reservation.date_time.date())
        })
        .cloned()
        .collect();
    let location_tables: Vec<Table> = tables
        .iter()
        .filter(|table| table.location_id == location.id)
        .cloned()
        .collect();
    let walk_ins = in_range
        .iter()
        .filter(|reservation| reservation.source == ReservationSource::WalkIn)
        .count();

    LocationMetrics {
        location_id: location.id.clone(),
        location_name: location.name.clone(),
        metrics: ComparisonMetrics {
            total_reservations: in_range.len(),
            total_covers: total_covers(&in_range),
            no_show_rate: no_show_rate(&in_range),
            average_party_size: average_party_size(&in_range),
            table_utilization: table_utilization(&location_tables),
            walk_in_rate: percent(walk_ins, in_range.len()),
        },
    }
}

/// Compare `locations` over `range`.
#[must_use]
pub fn compare_locations(
    reservations: &[Reservation],
    tables: &[Table],
    locations: &[Location],
    range: DateRange,
) -> ComparisonReport {
    let metrics: Vec<LocationMetrics> = locations
        .iter()
        .map(|location| location_metrics(reservations, tables, location, range))
        .collect();

    let combined = CombinedMetrics {
        total_reservations: metrics.iter().map(|location| location.metrics.total_reservations).sum(),
        total_covers: metrics.iter().map(|location| location.metrics.total_covers).sum(),
        average_no_show_rate: mean(metrics.iter().map(|location| location.metrics.no_show_rate)),
        average_utilization: mean(metrics.iter().map(|location| location.metrics.table_utilization)),
    };

    let trends = locations
        .iter()
        .map(|location| {
            let own: Vec<Reservation> = reservations
                .iter()
                .filter(|reservation| reservation.location_id == location.id)
                .cloned()
                .collect();
            LocationTrend {
                location_id: location.id.clone(),
                location_name: location.name.clone(),
                data: daily_trend(&own, range),
            }
        })
        .collect();

    ComparisonReport {
        date_range: range,
        locations: metrics,
        combined,
        trends,
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "mean of whole percentages")]
fn mean(values: impl Iterator<Item = u32>) -> u32 {
    let (sum, count) = values.fold((0_u64, 0_u32), |(sum, count), value| {
        (sum + u64::from(value), count + 1)
    });
    if count == 0 {
        return 0;
    }
    #[expect(clippy::cast_precision_loss, reason = "sum of percentages stays far below 2^52")]
    let sum = sum as f64;
    round_half_up(sum / f64::from(count)) as u32
}
