//! Guest text messages: templates, variables, phone formatting, and the delivery log.

use std::fmt;
use std::iter;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{LocationId, Reservation, WaitlistEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Purpose of a message template.
pub enum TemplateKind {
    /// Waitlist party's table is ready.
    WaitlistReady,
    /// Booking confirmation.
    ReservationConfirm,
    /// Day-of reminder.
    ReservationReminder,
    /// Anything else.
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A message body with `{{placeholder}}` variables.
pub struct SmsTemplate {
    /// Unique identifier.
    pub id: String,
    /// Location the template belongs to.
    pub location_id: LocationId,
    /// Name shown to staff.
    pub name: String,
    /// Purpose of the template.
    pub kind: TemplateKind,
    /// Body with placeholders such as `{{guestName}}`.
    pub body: String,
    /// Used when staff do not pick a template.
    pub is_default: bool,
}

/// Values substituted into a template. Unset values leave their placeholder untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    /// `{{guestName}}`
    pub guest_name: Option<String>,
    /// `{{partySize}}`
    pub party_size: Option<u32>,
    /// `{{time}}`
    pub time: Option<String>,
    /// `{{date}}`
    pub date: Option<String>,
    /// `{{waitTime}}`
    pub wait_time: Option<u32>,
    /// `{{position}}`
    pub position: Option<usize>,
    /// `{{restaurantName}}`
    pub restaurant_name: Option<String>,
}

impl TemplateVars {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("guestName", self.guest_name.clone()),
            ("partySize", self.party_size.map(|size| size.to_string())),
            ("time", self.time.clone()),
            ("date", self.date.clone()),
            ("waitTime", self.wait_time.map(|minutes| minutes.to_string())),
            ("position", self.position.map(|position| position.to_string())),
            ("restaurantName", self.restaurant_name.clone()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
    }
}

/// Substitute every set variable into `body`.
#[must_use]
pub fn render_template(body: &str, vars: &TemplateVars) -> String {
    vars.pairs()
        .into_iter()
        .fold(body.to_owned(), |rendered, (key, value)| {
            rendered.replace(&format!("{{{{{key}}}}}"), &value)
        })
}

/// Variables for a waitlist party.
#[must_use]
pub fn waitlist_vars(entry: &WaitlistEntry) -> TemplateVars {
    TemplateVars {
        guest_name: Some(entry.guest_name.clone()),
        party_size: Some(entry.party_size),
        wait_time: Some(entry.quoted_wait_minutes),
        ..TemplateVars::default()
    }
}

/// Variables for a reservation, with `6:30 PM` style time and `Friday, January 30` style date.
#[must_use]
pub fn reservation_vars(reservation: &Reservation) -> TemplateVars {
    TemplateVars {
        guest_name: Some(reservation.guest_name.clone()),
        party_size: Some(reservation.party_size),
        time: Some(reservation.date_time.format("%-I:%M %p").to_string()),
        date: Some(reservation.date_time.format("%A, %B %-d").to_string()),
        ..TemplateVars::default()
    }
}

/// Digits of a phone number.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// US display formatting: `(714) 555-1234`, or `+1 (714) 555-1234` with a country code.
/// Anything else is returned unchanged.
#[must_use]
pub fn format_phone(phone: &str) -> String {
    let digits = normalize_phone(phone);
    let local = match digits.len() {
        10 => Some((digits.as_str(), false)),
        11 => digits.strip_prefix('1').map(|rest| (rest, true)),
        _ => None,
    };

    match local.and_then(|(local, international)| split_us(local).map(|parts| (parts, international))) {
        Some(((area, exchange, line), true)) => format!("+1 ({area}) {exchange}-{line}"),
        Some(((area, exchange, line), false)) => format!("({area}) {exchange}-{line}"),
        None => phone.to_owned(),
    }
}

fn split_us(digits: &str) -> Option<(&str, &str, &str)> {
    let area = digits.get(0..3)?;
    let exchange = digits.get(3..6)?;
    let line = digits.get(6..)?;
    Some((area, exchange, line))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Delivery state of a message.
pub enum NotificationStatus {
    /// Handed to the carrier.
    Sent,
    /// Confirmed delivered.
    Delivered,
    /// Carrier rejected the message.
    Failed,
    /// Not yet attempted.
    Pending,
}

impl NotificationStatus {
    /// Wire slug of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationStatus::Sent => "sent",
            NotificationStatus::Delivered => "delivered",
            NotificationStatus::Failed => "failed",
            NotificationStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Result of handing a message to an SMS gateway.
pub struct SmsReceipt {
    /// Whether the gateway accepted the message.
    pub success: bool,
    /// Gateway message id, empty on failure.
    pub message_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Audit record of a message sent to a guest.
pub struct NotificationLog {
    /// Unique identifier.
    pub id: String,
    /// Location that sent the message.
    pub location_id: LocationId,
    /// Template purpose.
    pub kind: TemplateKind,
    /// Recipient.
    pub phone: String,
    /// Rendered body.
    pub message: String,
    /// Send time.
    pub sent_at: DateTime<Utc>,
    /// Delivery state.
    pub status: NotificationStatus,
    /// Reservation or waitlist entry the message concerns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
}

impl NotificationLog {
    /// Record the outcome of a send attempt.
    #[must_use]
    pub fn from_receipt(
        location_id: LocationId,
        kind: TemplateKind,
        phone: &str,
        message: String,
        receipt: &SmsReceipt,
        related_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            location_id,
            kind,
            phone: phone.to_owned(),
            message,
            sent_at: Utc::now(),
            status: if receipt.success {
                NotificationStatus::Delivered
            } else {
                NotificationStatus::Failed
            },
            related_id,
        }
    }
}

/// The default template of `kind` among `templates`, falling back to the first of that kind.
#[must_use]
pub fn default_template(templates: &[SmsTemplate], kind: TemplateKind) -> Option<&SmsTemplate> {
    let mut of_kind = templates.iter().filter(|template| template.kind == kind);
    let first = of_kind.next()?;
    Some(
        iter::once(first)
            .chain(of_kind)
            .find(|template| template.is_default)
            .unwrap_or(first),
    )
}
