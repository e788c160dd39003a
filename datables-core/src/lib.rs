//! Core types, table scoring, analytics, and service wiring for the Datables host stand.

/// Floor analytics: covers, no-shows, utilization, hourly load, and trends.
pub mod analytics;
/// Cross-location comparison reports.
pub mod comparison;
/// CSV and JSON export of comparison reports.
pub mod export;
/// Guest CRM lookups.
pub mod guests;
/// Opening hours, closures, and the analytics service window.
pub mod hours;
/// Domain models and identifiers shared by all locations.
pub mod model;
/// Guest text message templates and delivery log.
pub mod notify;
/// Registry for plugging location backends into the service.
pub mod plugin;
/// Traits describing the storage and messaging interfaces.
pub mod ports;
/// Table recommendation scoring.
pub mod recommend;
/// High-level service facade used by clients.
pub mod service;
/// Input rules for bookings, waitlist entries, and report ranges.
pub mod validation;

pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;
