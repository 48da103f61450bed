//! In-memory host that records everything appended to it
//!
//! Used by the command line tool to capture the mapped records as JSON, and by
//! tests to inspect what the pipeline emitted.

use crate::app::adapters::host::{LocationLookup, ResultsAppender, SettingsStore};
use crate::app::adapters::locations::LocationRegistry;
use crate::app::models::{DischargeActivity, FieldVisitDetails, FieldVisitHandle, LocationInfo};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A field visit together with the activities appended to it
#[derive(Debug, Clone, Serialize)]
pub struct RecordedVisit {
    pub visit: FieldVisitHandle,
    pub location_name: Option<String>,
    pub discharge_activities: Vec<DischargeActivity>,
}

/// Host backed by plain collections
#[derive(Debug, Clone, Default)]
pub struct RecordingAppender {
    settings: HashMap<String, String>,
    locations: LocationRegistry,
    visits: Vec<RecordedVisit>,
}

impl RecordingAppender {
    pub fn new(locations: LocationRegistry) -> Self {
        Self {
            locations,
            ..Default::default()
        }
    }

    /// Store a setting, replacing any previous value
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Replace all settings
    pub fn with_settings(mut self, settings: HashMap<String, String>) -> Self {
        self.settings = settings;
        self
    }

    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    /// Visits recorded so far, in append order
    pub fn visits(&self) -> &[RecordedVisit] {
        &self.visits
    }

    /// Total number of discharge activities across all visits
    pub fn activity_count(&self) -> usize {
        self.visits
            .iter()
            .map(|v| v.discharge_activities.len())
            .sum()
    }

    pub fn into_visits(self) -> Vec<RecordedVisit> {
        self.visits
    }
}

impl SettingsStore for RecordingAppender {
    fn setting(&self, key: &str) -> Option<&str> {
        self.settings.setting(key)
    }
}

impl LocationLookup for RecordingAppender {
    fn location_by_identifier(&self, identifier: &str) -> Result<LocationInfo> {
        self.locations.location_by_identifier(identifier)
    }
}

impl ResultsAppender for RecordingAppender {
    fn add_field_visit(
        &mut self,
        location: &LocationInfo,
        details: FieldVisitDetails,
    ) -> Result<FieldVisitHandle> {
        let visit = FieldVisitHandle {
            visit_id: self.visits.len() + 1,
            location_identifier: location.identifier.clone(),
            details,
        };

        debug!(
            "Recorded field visit {} for {} ({})",
            visit.visit_id, visit.location_identifier, details.period
        );

        self.visits.push(RecordedVisit {
            visit: visit.clone(),
            location_name: location.name.clone(),
            discharge_activities: Vec::new(),
        });

        Ok(visit)
    }

    fn add_discharge_activity(
        &mut self,
        visit: &FieldVisitHandle,
        activity: DischargeActivity,
    ) -> Result<()> {
        let recorded = self
            .visits
            .iter_mut()
            .find(|v| v.visit.visit_id == visit.visit_id)
            .ok_or_else(|| {
                Error::appender(format!("Unknown field visit {}", visit.visit_id))
            })?;

        recorded.discharge_activities.push(activity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::DateTimeInterval;
    use crate::units::UnitSystem;
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn details() -> FieldVisitDetails {
        let utc = FixedOffset::east_opt(0).unwrap();
        FieldVisitDetails {
            period: DateTimeInterval::new(
                utc.with_ymd_and_hms(2020, 6, 1, 8, 0, 0).unwrap(),
                utc.with_ymd_and_hms(2020, 6, 1, 9, 30, 0).unwrap(),
            ),
        }
    }

    #[test]
    fn test_settings_lookup() {
        let host = RecordingAppender::default().with_setting("Config", "{}");

        assert_eq!(host.setting("Config"), Some("{}"));
        assert_eq!(host.setting("Other"), None);
    }

    #[test]
    fn test_records_visits_and_activities() {
        let mut host = RecordingAppender::default();
        let location = LocationInfo::new("08MF005", FixedOffset::east_opt(0).unwrap())
            .with_name("Fraser River at Hope");

        let visit = host.add_field_visit(&location, details()).unwrap();
        let activity = DischargeActivity::new(visit.period(), 12.5, UnitSystem::metric());
        host.add_discharge_activity(&visit, activity).unwrap();

        assert_eq!(visit.visit_id, 1);
        assert_eq!(host.visits().len(), 1);
        assert_eq!(host.activity_count(), 1);
        assert_eq!(
            host.visits()[0].location_name.as_deref(),
            Some("Fraser River at Hope")
        );
    }

    #[test]
    fn test_activity_for_unknown_visit_rejected() {
        let mut host = RecordingAppender::default();
        let visit = FieldVisitHandle {
            visit_id: 7,
            location_identifier: "X".to_string(),
            details: details(),
        };
        let activity = DischargeActivity::new(visit.period(), 1.0, UnitSystem::imperial());

        let result = host.add_discharge_activity(&visit, activity);
        assert!(matches!(result, Err(Error::Appender { .. })));
    }

    #[test]
    fn test_recorded_visits_serialize() {
        let mut host = RecordingAppender::default();
        let location = LocationInfo::new("08MF005", FixedOffset::east_opt(0).unwrap());
        host.add_field_visit(&location, details()).unwrap();

        let json = serde_json::to_value(host.visits()).unwrap();
        assert_eq!(json[0]["visit"]["location_identifier"], "08MF005");
        let start = json[0]["visit"]["details"]["period"]["start"]
            .as_str()
            .unwrap();
        assert_eq!(
            DateTime::parse_from_rfc3339(start).unwrap(),
            details().period.start
        );
    }
}
