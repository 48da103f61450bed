//! Host-side collaborators consumed by the mapping pipeline
//!
//! The pipeline never stores anything itself: settings, location lookups and
//! the appended records all belong to the host.

use crate::Result;
use crate::app::models::{DischargeActivity, FieldVisitDetails, FieldVisitHandle, LocationInfo};
use std::collections::HashMap;

/// Key-value store holding plugin settings
pub trait SettingsStore {
    fn setting(&self, key: &str) -> Option<&str>;
}

impl SettingsStore for HashMap<String, String> {
    fn setting(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Resolves a site identifier to a location
pub trait LocationLookup {
    fn location_by_identifier(&self, identifier: &str) -> Result<LocationInfo>;
}

/// Sink for mapped records. Calls are side-effecting and never retried.
pub trait ResultsAppender {
    fn add_field_visit(
        &mut self,
        location: &LocationInfo,
        details: FieldVisitDetails,
    ) -> Result<FieldVisitHandle>;

    fn add_discharge_activity(
        &mut self,
        visit: &FieldVisitHandle,
        activity: DischargeActivity,
    ) -> Result<()>;
}

/// Everything the plugin needs from its host
pub trait FieldDataHost: SettingsStore + LocationLookup + ResultsAppender {}

impl<T: SettingsStore + LocationLookup + ResultsAppender> FieldDataHost for T {}
