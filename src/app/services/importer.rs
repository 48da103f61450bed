//! Import of one parsed channel record into the host
//!
//! Runs the whole pipeline for a single survey: configuration, visit period,
//! field visit, discharge activity. Each host call is made once; the first
//! error aborts the import.

use crate::Result;
use crate::app::adapters::host::{ResultsAppender, SettingsStore};
use crate::app::models::channel::ChannelRecord;
use crate::app::models::{FieldVisitHandle, LocationInfo};
use crate::app::services::discharge_mapper::DischargeActivityMapper;
use crate::app::services::field_visit::FieldVisitMapper;
use crate::config::Config;
use tracing::{debug, info};

/// Summary of a completed import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub visit: FieldVisitHandle,
    pub discharge: f64,
    pub discharge_unit_id: &'static str,
}

/// Imports channel records for one location
pub struct VisitImporter<'a> {
    location: &'a LocationInfo,
}

impl<'a> VisitImporter<'a> {
    pub fn new(location: &'a LocationInfo) -> Self {
        Self { location }
    }

    /// Load the configuration from the host settings and import the channel
    pub fn import<H>(&self, channel: &ChannelRecord, host: &mut H) -> Result<ImportSummary>
    where
        H: SettingsStore + ResultsAppender + ?Sized,
    {
        let config = Config::load(&*host)?;
        self.import_with_config(channel, &config, host)
    }

    /// Import the channel with an already resolved configuration
    pub fn import_with_config<A>(
        &self,
        channel: &ChannelRecord,
        config: &Config,
        appender: &mut A,
    ) -> Result<ImportSummary>
    where
        A: ResultsAppender + ?Sized,
    {
        let visit_mapper = FieldVisitMapper::new(channel, self.location);
        let details = visit_mapper.map_field_visit_details(config)?;

        info!(
            "Importing field visit for {} over {}",
            self.location.identifier, details.period
        );

        let visit = appender.add_field_visit(self.location, details)?;
        debug!("Field visit {} accepted", visit.visit_id);

        let activity = DischargeActivityMapper::new(config, &visit).map(channel)?;
        let summary = ImportSummary {
            visit: visit.clone(),
            discharge: activity.discharge.value,
            discharge_unit_id: activity.discharge.unit_id,
        };

        appender.add_discharge_activity(&visit, activity)?;

        info!(
            "Imported discharge activity of {} {} for {}",
            summary.discharge, summary.discharge_unit_id, self.location.identifier
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::app::adapters::memory::RecordingAppender;
    use crate::app::models::DischargeActivity;
    use crate::app::models::channel::{ChannelSummary, DischargeSummary, Field, Transect};
    use crate::app::models::FieldVisitDetails;
    use chrono::FixedOffset;

    fn location() -> LocationInfo {
        LocationInfo::new("08MF005", FixedOffset::west_opt(8 * 3600).unwrap())
    }

    fn channel() -> ChannelRecord {
        ChannelRecord {
            software_version: Some("3.43".to_string()),
            summary: Some(ChannelSummary {
                discharge: Some(DischargeSummary {
                    total: Some(Field::with_units("12.5", "cms")),
                    middle: None,
                }),
                ..Default::default()
            }),
            transects: vec![Transect::new("6/1/2020 8:00:00", "6/1/2020 9:30:00")],
            ..Default::default()
        }
    }

    /// Appender that rejects every discharge activity
    #[derive(Default)]
    struct RejectingAppender {
        visits: usize,
    }

    impl ResultsAppender for RejectingAppender {
        fn add_field_visit(
            &mut self,
            location: &LocationInfo,
            details: FieldVisitDetails,
        ) -> Result<FieldVisitHandle> {
            self.visits += 1;
            Ok(FieldVisitHandle {
                visit_id: self.visits,
                location_identifier: location.identifier.clone(),
                details,
            })
        }

        fn add_discharge_activity(
            &mut self,
            _visit: &FieldVisitHandle,
            _activity: DischargeActivity,
        ) -> Result<()> {
            Err(Error::appender("read-only location"))
        }
    }

    #[test]
    fn test_import_appends_visit_and_activity() {
        let location = location();
        let mut host = RecordingAppender::default();

        let summary = VisitImporter::new(&location)
            .import(&channel(), &mut host)
            .unwrap();

        assert_eq!(summary.discharge, 12.5);
        assert_eq!(summary.discharge_unit_id, "m^3/s");
        assert_eq!(host.visits().len(), 1);
        assert_eq!(host.activity_count(), 1);

        let recorded = &host.visits()[0];
        let activity = &recorded.discharge_activities[0];
        assert_eq!(activity.measurement_period, recorded.visit.period());
        assert_eq!(
            recorded.visit.period().start.to_rfc3339(),
            "2020-06-01T08:00:00-08:00"
        );
    }

    #[test]
    fn test_config_error_appends_nothing() {
        let location = location();
        let mut host = RecordingAppender::default().with_setting("Config", "{not json");

        let result = VisitImporter::new(&location).import(&channel(), &mut host);

        assert!(matches!(result, Err(Error::ConfigParse { .. })));
        assert!(host.visits().is_empty());
    }

    #[test]
    fn test_no_timestamps_appends_nothing() {
        let location = location();
        let mut host = RecordingAppender::default();
        let mut channel = channel();
        channel.transects.clear();

        let result = VisitImporter::new(&location).import(&channel, &mut host);

        assert!(matches!(result, Err(Error::NoTimestamps)));
        assert!(host.visits().is_empty());
    }

    #[test]
    fn test_missing_discharge_after_visit_appended() {
        let location = location();
        let mut host = RecordingAppender::default();
        let mut channel = channel();
        channel.summary = None;

        let result = VisitImporter::new(&location).import(&channel, &mut host);

        assert!(matches!(result, Err(Error::MissingDischarge)));
        // The visit was already emitted; nothing is rolled back
        assert_eq!(host.visits().len(), 1);
        assert_eq!(host.activity_count(), 0);
    }

    #[test]
    fn test_appender_error_propagates() {
        let location = location();
        let mut appender = RejectingAppender::default();

        let result = VisitImporter::new(&location).import_with_config(
            &channel(),
            &Config::default(),
            &mut appender,
        );

        assert!(matches!(result, Err(Error::Appender { .. })));
        assert_eq!(appender.visits, 1);
    }
}
