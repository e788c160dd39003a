//! Registry for all location plugins and their ports.

use std::collections::HashMap;
use std::sync::Arc;

use crate::hours::Schedule;
use crate::model::{Location, LocationId};
use crate::notify::SmsTemplate;
use crate::ports::{BookingPort, DatablesError};

/// Everything the service needs to run a single location.
pub struct LocationPlugin {
    /// Static metadata describing the location.
    pub meta: Location,
    /// Storage for reservations, tables, waitlist, and guests.
    pub booking: Arc<dyn BookingPort>,
    /// Opening hours and closures.
    pub schedule: Schedule,
    /// Guest message templates.
    pub templates: Vec<SmsTemplate>,
}

/// Registry that resolves plugins by location identifier.
pub struct LocationRegistry {
    plugins: HashMap<LocationId, LocationPlugin>,
}

impl LocationRegistry {
    /// Build a registry from the provided plugin list.
    #[must_use]
    pub fn new(plugins: Vec<LocationPlugin>) -> Self {
        let plugins_map = plugins
            .into_iter()
            .map(|plugin| (plugin.meta.id.clone(), plugin))
            .collect();
        Self {
            plugins: plugins_map,
        }
    }

    /// Metadata for all registered locations, ordered by id.
    #[must_use]
    pub fn locations(&self) -> Vec<Location> {
        let mut locations: Vec<Location> = self.locations_iter().cloned().collect();
        locations.sort_by(|left, right| left.id.cmp(&right.id));
        locations
    }

    /// Iterator over location metadata, in no particular order.
    pub fn locations_iter(&self) -> impl Iterator<Item = &Location> {
        self.plugins.values().map(|plugin| &plugin.meta)
    }

    /// Look up the plugin for the given location.
    ///
    /// # Errors
    ///
    /// Returns [`DatablesError::UnknownLocation`] when no plugin is registered.
    pub fn plugin(&self, location: &LocationId) -> Result<&LocationPlugin, DatablesError> {
        self.plugins
            .get(location)
            .ok_or_else(|| DatablesError::UnknownLocation(location.clone()))
    }
}
