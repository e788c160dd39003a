//! Table recommendations for an arriving reservation.
//!
//! Every candidate table gets a weighted score out of 100 built from five
//! criteria: party-size fit (30), seating preference (25), availability (20),
//! special accommodations (15) and table type (10), plus a small bonus for
//! celebrations. The raw sum can exceed 100 and is clamped.

use serde::Serialize;

use crate::model::{Reservation, SeatingPreference, Table, TableShape, TableStatus};

/// Upper bound of a match score.
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// A scored candidate table with the reasons behind its score.
pub struct TableRecommendation {
    /// Candidate table.
    pub table: Table,
    /// Score in `0..=100`.
    pub match_score: u32,
    /// Points in favour of the table.
    pub reasons: Vec<String>,
    /// Points against the table.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl TableRecommendation {
    /// Qualitative bucket of the score.
    #[must_use]
    pub fn level(&self) -> MatchLevel {
        MatchLevel::from_score(self.match_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
/// Qualitative label for a match score.
pub enum MatchLevel {
    /// 80 and above.
    Excellent,
    /// 60 to 79.
    Good,
    /// Below 60.
    Fair,
}

impl MatchLevel {
    /// Classify a score.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            MatchLevel::Excellent
        } else if score >= 60 {
            MatchLevel::Good
        } else {
            MatchLevel::Fair
        }
    }
}

#[derive(Default)]
struct Tally {
    score: u32,
    reasons: Vec<String>,
    warnings: Vec<String>,
}

impl Tally {
    fn reason(&mut self, points: u32, reason: impl Into<String>) {
        self.score += points;
        self.reasons.push(reason.into());
    }

    fn warning(&mut self, points: u32, warning: impl Into<String>) {
        self.score += points;
        self.warnings.push(warning.into());
    }
}

/// Score a single table for a reservation.
#[must_use]
pub fn score_table(table: &Table, reservation: &Reservation) -> TableRecommendation {
    let mut tally = Tally::default();
    let party = reservation.party_size;

    if table.capacity == party {
        tally.reason(30, "Perfect fit for party size");
    } else if table.capacity == party + 1 {
        tally.reason(25, format!("Fits {party} guests comfortably"));
    } else if table.capacity > party {
        tally.reason(15, format!("Can accommodate {party} guests"));
        tally.warning(0, format!("Table is sized for {} guests", table.capacity));
    } else {
        tally.warning(5, "Table may be too small");
    }

    let preference = reservation.seating_preference;
    if preference == SeatingPreference::Any {
        tally.reason(15, "Guest has no seating preference");
    } else if preference.matches_section(&table.section) {
        tally.reason(25, format!("Matches {preference} preference"));
    } else {
        tally.warning(5, format!("Guest prefers {preference} seating"));
    }

    match table.status {
        TableStatus::Available => tally.reason(20, "Available immediately"),
        TableStatus::Finishing => tally.reason(15, "Will be available soon"),
        TableStatus::Reserved | TableStatus::Occupied | TableStatus::Blocked => {}
    }

    if reservation.high_chairs > 0 {
        if table.section.to_lowercase().contains("main") {
            tally.reason(15, "Located near high chair storage");
        } else {
            tally.score += 5;
        }
    }

    if table.shape == TableShape::Booth && party <= 4 {
        tally.reason(10, "Cozy booth seating");
    } else if table.shape == TableShape::Rectangle && party >= 6 {
        tally.reason(10, "Large table for group");
    }

    if reservation.is_celebration()
        && (table.shape == TableShape::Booth || SeatingPreference::Patio.matches_section(&table.section))
    {
        tally.reason(5, "Special table for celebration");
    }

    TableRecommendation {
        table: table.clone(),
        match_score: tally.score.min(MAX_SCORE),
        reasons: tally.reasons,
        warnings: tally.warnings,
    }
}

/// Score every candidate and order them best first. Ties keep the candidate order.
#[must_use]
pub fn recommend_tables(reservation: &Reservation, candidates: &[Table]) -> Vec<TableRecommendation> {
    let mut recommendations: Vec<_> = candidates
        .iter()
        .map(|table| score_table(table, reservation))
        .collect();
    recommendations.sort_by(|left, right| right.match_score.cmp(&left.match_score));
    recommendations
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::model::fixtures::{reservation, table};

    #[test]
    fn perfect_booth_for_a_celebration_is_clamped_to_100() {
        let mut booking = reservation("1", 4);
        booking.seating_preference = SeatingPreference::Inside;
        booking.high_chairs = 1;
        booking.special_requests = Some("Birthday celebration, need cake".to_owned());
        let booth = table("12", 4, TableShape::Booth, "Main Dining");

        let rec = score_table(&booth, &booking);
        // 30 + 25 + 20 + 15 + 10 + 5 = 105
        assert_eq!(rec.match_score, 100);
        assert_eq!(rec.level(), MatchLevel::Excellent);
        assert!(rec.warnings.is_empty());
        assert!(rec.reasons.contains(&"Special table for celebration".to_owned()));
    }

    #[test]
    fn oversized_table_warns_about_capacity() {
        let booking = reservation("1", 2);
        let six_top = table("5", 6, TableShape::Rectangle, "Main Dining");

        let rec = score_table(&six_top, &booking);
        // 15 (fits) + 15 (no preference) + 20 (available)
        assert_eq!(rec.match_score, 50);
        assert_eq!(rec.warnings, vec!["Table is sized for 6 guests".to_owned()]);
        assert_eq!(rec.level(), MatchLevel::Fair);
    }

    #[test]
    fn small_table_and_wrong_section_are_warnings() {
        let mut booking = reservation("1", 6);
        booking.seating_preference = SeatingPreference::Patio;
        let mut two_top = table("1", 2, TableShape::Circle, "Main Dining");
        two_top.status = TableStatus::Occupied;

        let rec = score_table(&two_top, &booking);
        assert_eq!(rec.match_score, 10);
        assert_eq!(
            rec.warnings,
            vec!["Table may be too small".to_owned(), "Guest prefers patio seating".to_owned()]
        );
        assert!(rec.reasons.is_empty());
    }

    #[test]
    fn high_chairs_outside_main_dining_earn_partial_credit() {
        let mut booking = reservation("1", 3);
        booking.high_chairs = 2;
        let patio = table("8", 4, TableShape::Square, "Patio");
        let main = table("3", 4, TableShape::Square, "Main Dining");

        let patio_score = score_table(&patio, &booking).match_score;
        let main_score = score_table(&main, &booking).match_score;
        assert_eq!(main_score - patio_score, 10);
    }

    #[test]
    fn recommendations_are_sorted_best_first_and_stable() {
        let mut booking = reservation("1", 4);
        booking.seating_preference = SeatingPreference::Patio;
        let tables = vec![
            table("12", 4, TableShape::Booth, "Main Dining"),
            table("8", 4, TableShape::Square, "Patio"),
            table("9", 4, TableShape::Square, "Patio"),
            table("5", 6, TableShape::Rectangle, "Main Dining"),
        ];

        let ranked = recommend_tables(&booking, &tables);
        let order: Vec<_> = ranked.iter().map(|rec| rec.table.number.as_str()).collect();
        assert_eq!(order, vec!["8", "9", "12", "5"]);
        assert!(ranked.windows(2).all(|pair| pair[0].match_score >= pair[1].match_score));
    }

    #[test]
    fn finishing_tables_rank_below_available_ones() {
        let booking = reservation("1", 4);
        let available = table("3", 4, TableShape::Square, "Main Dining");
        let mut finishing = table("6", 4, TableShape::Square, "Main Dining");
        finishing.status = TableStatus::Finishing;

        let ranked = recommend_tables(&booking, &[finishing, available]);
        assert_eq!(ranked[0].table.number, "3");
        assert_eq!(ranked[0].match_score - ranked[1].match_score, 5);
    }

    fn any_shape() -> impl Strategy<Value = TableShape> {
        prop_oneof![
            Just(TableShape::Circle),
            Just(TableShape::Square),
            Just(TableShape::Rectangle),
            Just(TableShape::Booth),
        ]
    }

    fn any_status() -> impl Strategy<Value = TableStatus> {
        prop_oneof![
            Just(TableStatus::Available),
            Just(TableStatus::Reserved),
            Just(TableStatus::Occupied),
            Just(TableStatus::Finishing),
            Just(TableStatus::Blocked),
        ]
    }

    fn any_preference() -> impl Strategy<Value = SeatingPreference> {
        prop_oneof![
            Just(SeatingPreference::Inside),
            Just(SeatingPreference::Bar),
            Just(SeatingPreference::Patio),
            Just(SeatingPreference::Any),
        ]
    }

    fn any_section() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("Main Dining"), Just("Patio"), Just("Bar"), Just("Private Room")]
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded_and_deterministic(
            party in 1u32..=20,
            capacity in 1u32..=20,
            high_chairs in 0u32..=3,
            shape in any_shape(),
            status in any_status(),
            preference in any_preference(),
            section in any_section(),
            celebrate in any::<bool>(),
        ) {
            let mut booking = reservation("1", party);
            booking.high_chairs = high_chairs;
            booking.seating_preference = preference;
            if celebrate {
                booking.special_requests = Some("birthday".to_owned());
            }
            let mut candidate = table("1", capacity, shape, section);
            candidate.status = status;

            let first = score_table(&candidate, &booking);
            let second = score_table(&candidate, &booking);
            prop_assert!(first.match_score <= MAX_SCORE);
            prop_assert_eq!(first.match_score, second.match_score);
            prop_assert_eq!(first.reasons, second.reasons);
        }

        #[test]
        fn prop_exact_capacity_never_scores_below_larger_tables(
            party in 1u32..=12,
            extra in 1u32..=8,
            preference in any_preference(),
        ) {
            let mut booking = reservation("1", party);
            booking.seating_preference = preference;
            let exact = table("1", party, TableShape::Square, "Main Dining");
            let larger = table("2", party + extra, TableShape::Square, "Main Dining");

            prop_assert!(score_table(&exact, &booking).match_score >= score_table(&larger, &booking).match_score);
        }

        #[test]
        fn prop_matching_section_never_scores_below_mismatch(
            party in 1u32..=12,
            capacity in 1u32..=12,
        ) {
            let mut booking = reservation("1", party);
            booking.seating_preference = SeatingPreference::Patio;
            let patio = table("1", capacity, TableShape::Square, "Patio");
            let bar = table("2", capacity, TableShape::Square, "Bar");

            prop_assert!(score_table(&patio, &booking).match_score >= score_table(&bar, &booking).match_score);
        }
    }
}
