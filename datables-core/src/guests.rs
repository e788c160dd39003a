//! Guest CRM lookups and profile updates.

use crate::model::{GuestProfile, Visit};
use crate::notify::normalize_phone;

/// Tag marking high-value guests.
pub const VIP_TAG: &str = "VIP";

/// Guest whose phone has the same digits as `phone`.
#[must_use]
pub fn find_by_phone<'guests>(guests: &'guests [GuestProfile], phone: &str) -> Option<&'guests GuestProfile> {
    let wanted = normalize_phone(phone);
    if wanted.is_empty() {
        return None;
    }
    guests.iter().find(|guest| normalize_phone(&guest.phone) == wanted)
}

/// Guests whose name or email contains `query` (case-insensitive) or whose phone contains it verbatim.
#[must_use]
pub fn search<'guests>(guests: &'guests [GuestProfile], query: &str) -> Vec<&'guests GuestProfile> {
    let lowered = query.to_lowercase();
    guests
        .iter()
        .filter(|guest| {
            guest.name.to_lowercase().contains(&lowered)
                || guest.phone.contains(query)
                || guest
                    .email
                    .as_deref()
                    .is_some_and(|email| email.to_lowercase().contains(&lowered))
        })
        .collect()
}

/// Guests carrying `tag`.
#[must_use]
pub fn with_tag<'guests>(guests: &'guests [GuestProfile], tag: &str) -> Vec<&'guests GuestProfile> {
    guests.iter().filter(|guest| guest.has_tag(tag)).collect()
}

/// Guests tagged [`VIP_TAG`].
#[must_use]
pub fn vip(guests: &[GuestProfile]) -> Vec<&GuestProfile> {
    with_tag(guests, VIP_TAG)
}

impl GuestProfile {
    /// Whether the guest carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    /// Add `tag` unless already present. Returns whether it was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_owned());
        true
    }

    /// Remove `tag`. Returns whether it was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }

    /// Record a visit, keeping the history ordered newest first.
    pub fn record_visit(&mut self, visit: Visit) {
        if self.last_visit.is_none_or(|last| visit.date > last) {
            self.last_visit = Some(visit.date);
        }
        self.total_visits += 1;
        let slot = self
            .visit_history
            .iter()
            .position(|existing| existing.date <= visit.date)
            .unwrap_or(self.visit_history.len());
        self.visit_history.insert(slot, visit);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::fixtures::day;
    use crate::model::{GuestId, GuestPreferences, LocationId};

    fn guest(id: &str, name: &str, phone: &str, tags: &[&str]) -> GuestProfile {
        GuestProfile {
            id: GuestId::from(id),
            name: name.to_owned(),
            phone: phone.to_owned(),
            email: Some(format!("{}@email.com", name.split(' ').next().unwrap_or(name).to_lowercase())),
            tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
            preferences: GuestPreferences::default(),
            visit_history: Vec::new(),
            total_visits: 0,
            last_visit: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).single().expect("valid stamp"),
        }
    }

    fn book() -> Vec<GuestProfile> {
        vec![
            guest("1", "John Smith", "+17145551234", &["VIP", "Regular"]),
            guest("2", "Sarah Johnson", "+17145555678", &["Birthday"]),
            guest("3", "David Lee", "+17145553456", &["VIP", "Anniversary"]),
        ]
    }

    #[test]
    fn phone_lookup_ignores_formatting() {
        let guests = book();
        let found = find_by_phone(&guests, "(714) 555-5678").map(|guest| guest.name.as_str());
        // Stored numbers carry the country code, so a local number does not match.
        assert_eq!(found, None);
        let found = find_by_phone(&guests, "1-714-555-5678").map(|guest| guest.name.as_str());
        assert_eq!(found, Some("Sarah Johnson"));
        assert!(find_by_phone(&guests, "n/a").is_none());
    }

    #[test]
    fn search_matches_name_email_and_phone() {
        let guests = book();
        let names = |found: Vec<&GuestProfile>| found.into_iter().map(|guest| guest.id.0.clone()).collect::<Vec<_>>();
        assert_eq!(names(search(&guests, "john")), vec!["1", "2"]);
        assert_eq!(names(search(&guests, "david@")), vec!["3"]);
        assert_eq!(names(search(&guests, "3456")), vec!["3"]);
    }

    #[test]
    fn vip_and_tag_filters() {
        let guests = book();
        assert_eq!(vip(&guests).len(), 2);
        assert_eq!(with_tag(&guests, "Birthday").len(), 1);
    }

    #[test]
    fn tags_are_not_duplicated() {
        let mut profile = guest("5", "Emily Chen", "+17145557777", &["Regular"]);
        assert!(!profile.add_tag("Regular"));
        assert!(profile.add_tag("VIP"));
        assert!(profile.remove_tag("Regular"));
        assert!(!profile.remove_tag("Regular"));
        assert_eq!(profile.tags, vec!["VIP".to_owned()]);
    }

    #[test]
    fn recording_visits_keeps_latest_date() {
        let mut profile = guest("3", "Maria Garcia", "+17145559012", &[]);
        let visit = |date| Visit {
            location_id: LocationId::from("tustin"),
            date,
            party_size: 4,
            table_id: None,
            notes: None,
        };
        profile.record_visit(visit(day(15)));
        profile.record_visit(visit(day(28)));
        profile.record_visit(visit(day(20)));
        assert_eq!(profile.total_visits, 3);
        assert_eq!(profile.last_visit, Some(day(28)));
        let dates: Vec<_> = profile.visit_history.iter().map(|visit| visit.date).collect();
        assert_eq!(dates, vec![day(28), day(20), day(15)]);
    }
}
