//! Opening hours, blocked dates, and the hourly analytics window.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Opening hours for one day of the week.
pub struct OperatingHours {
    /// Day these hours apply to.
    pub weekday: Weekday,
    /// Whether the location opens at all on that day.
    pub is_open: bool,
    /// Opening time.
    pub open: NaiveTime,
    /// Closing time. Bookings must start before it.
    pub close: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A date on which the location is closed regardless of weekly hours.
pub struct BlockedDate {
    /// Closed day.
    pub date: NaiveDate,
    /// Reason shown to staff.
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Weekly hours plus one-off closures for a location.
pub struct Schedule {
    /// Hours per weekday. Weekdays without an entry are closed.
    #[serde(default)]
    pub weekly: Vec<OperatingHours>,
    /// One-off closures.
    #[serde(default)]
    pub blocked: Vec<BlockedDate>,
}

impl Schedule {
    /// The demo schedule: 11:00 to 21:00 Sunday through Wednesday, 22:00 Thursday,
    /// 23:00 Friday and Saturday, closed Christmas and New Year's Day.
    #[must_use]
    pub fn standard(year: i32) -> Self {
        let open = NaiveTime::from_hms_opt(11, 0, 0).unwrap_or_default();
        let weekly = [
            (Weekday::Sun, 21),
            (Weekday::Mon, 21),
            (Weekday::Tue, 21),
            (Weekday::Wed, 21),
            (Weekday::Thu, 22),
            (Weekday::Fri, 23),
            (Weekday::Sat, 23),
        ]
        .into_iter()
        .map(|(weekday, close_hour)| OperatingHours {
            weekday,
            is_open: true,
            open,
            close: NaiveTime::from_hms_opt(close_hour, 0, 0).unwrap_or_default(),
        })
        .collect();

        let blocked = [(12, 25, "Christmas Day - Closed"), (1, 1, "New Year's Day - Closed")]
            .into_iter()
            .filter_map(|(month, day, reason)| {
                NaiveDate::from_ymd_opt(year, month, day).map(|date| BlockedDate {
                    date,
                    reason: reason.to_owned(),
                })
            })
            .collect();

        Self { weekly, blocked }
    }

    /// Why the location is closed at `at`, or `None` when it is open.
    #[must_use]
    pub fn closure_reason(&self, at: NaiveDateTime) -> Option<String> {
        if let Some(blocked) = self.blocked.iter().find(|blocked| blocked.date == at.date()) {
            return Some(blocked.reason.clone());
        }

        let weekday = at.weekday();
        match self.weekly.iter().find(|hours| hours.weekday == weekday) {
            Some(hours) if hours.is_open => {
                let time = at.time();
                if time < hours.open || time >= hours.close {
                    Some(format!(
                        "Outside opening hours ({} to {})",
                        hours.open.format("%H:%M"),
                        hours.close.format("%H:%M")
                    ))
                } else {
                    None
                }
            }
            _ => Some(format!("Closed on {weekday}")),
        }
    }

    /// Whether the location accepts bookings at `at`.
    #[must_use]
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        self.closure_reason(at).is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Inclusive range of hours that hourly analytics are bucketed into.
pub struct ServiceHours {
    /// First bucketed hour.
    pub open_hour: u32,
    /// Last bucketed hour (inclusive).
    pub close_hour: u32,
}

impl Default for ServiceHours {
    fn default() -> Self {
        Self {
            open_hour: 11,
            close_hour: 23,
        }
    }
}

impl ServiceHours {
    /// Whether `hour` falls within the window.
    #[must_use]
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.open_hour && hour <= self.close_hour
    }

    /// Every hour of the window in order.
    pub fn hours(&self) -> impl Iterator<Item = u32> + use<> {
        self.open_hour..=self.close_hour
    }
}
