//! Field visit mapping
//!
//! Older survey software records transect timestamps in the location's local
//! standard time; from version 4 onwards they are written in UTC.

use crate::Result;
use crate::app::models::channel::ChannelRecord;
use crate::app::models::{FieldVisitDetails, LocationInfo};
use crate::app::services::time_window::derive_visit_period;
use crate::config::Config;
use crate::constants::UTC_TIMESTAMP_MIN_VERSION;
use chrono::FixedOffset;
use std::cmp::Ordering;
use tracing::debug;

/// Maps a channel record to the field visit it belongs to
pub struct FieldVisitMapper<'a> {
    channel: &'a ChannelRecord,
    utc_offset: FixedOffset,
}

impl<'a> FieldVisitMapper<'a> {
    pub fn new(channel: &'a ChannelRecord, location: &LocationInfo) -> Self {
        let utc_offset = effective_utc_offset(channel.software_version.as_deref(), location);

        debug!(
            "Using UTC offset {} for software version {:?}",
            utc_offset, channel.software_version
        );

        Self {
            channel,
            utc_offset,
        }
    }

    pub fn map_field_visit_details(&self, config: &Config) -> Result<FieldVisitDetails> {
        let period = derive_visit_period(self.channel, config, self.utc_offset)?;
        Ok(FieldVisitDetails { period })
    }
}

/// Offset to attach to transect timestamps for a given software version.
///
/// Versions are compared as case-insensitive text; an absent version counts
/// as older than every version.
pub fn effective_utc_offset(software_version: Option<&str>, location: &LocationInfo) -> FixedOffset {
    let records_local_time = match software_version {
        None => true,
        Some(version) => {
            compare_ignore_case(version, UTC_TIMESTAMP_MIN_VERSION) == Ordering::Less
        }
    };

    if records_local_time {
        location.utc_offset
    } else {
        FixedOffset::east_opt(0).unwrap_or(location.utc_offset)
    }
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::channel::Transect;

    fn location() -> LocationInfo {
        LocationInfo::new("08MF005", FixedOffset::west_opt(8 * 3600).unwrap())
    }

    fn channel(version: Option<&str>) -> ChannelRecord {
        ChannelRecord {
            software_version: version.map(str::to_string),
            transects: vec![Transect::new("6/1/2020 8:00:00", "6/1/2020 9:30:00")],
            ..Default::default()
        }
    }

    #[test]
    fn test_older_versions_use_location_offset() {
        assert_eq!(
            effective_utc_offset(Some("3.43"), &location()),
            location().utc_offset
        );
        assert_eq!(effective_utc_offset(None, &location()), location().utc_offset);
    }

    #[test]
    fn test_newer_versions_use_utc() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(effective_utc_offset(Some("4"), &location()), utc);
        assert_eq!(effective_utc_offset(Some("4.24"), &location()), utc);
        // Text ordering, not numeric
        assert_eq!(effective_utc_offset(Some("QRev 4.24"), &location()), utc);
    }

    #[test]
    fn test_map_field_visit_details() {
        let channel = channel(Some("3.43"));
        let mapper = FieldVisitMapper::new(&channel, &location());

        let details = mapper.map_field_visit_details(&Config::default()).unwrap();

        assert_eq!(details.period.start.to_rfc3339(), "2020-06-01T08:00:00-08:00");
        assert_eq!(details.period.end.to_rfc3339(), "2020-06-01T09:30:00-08:00");
    }

    #[test]
    fn test_map_field_visit_details_utc() {
        let channel = channel(Some("4.24"));
        let mapper = FieldVisitMapper::new(&channel, &location());

        let details = mapper.map_field_visit_details(&Config::default()).unwrap();

        assert_eq!(details.period.start.to_rfc3339(), "2020-06-01T08:00:00+00:00");
    }
}
