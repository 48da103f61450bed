//! Visit period derivation from transect timestamps.
//!
//! Every transect contributes its start and end timestamp text. Each string is
//! tried against the configured patterns in order and the first match wins;
//! strings no pattern accepts are dropped. The period runs from the earliest
//! to the latest surviving instant.

use crate::app::models::DateTimeInterval;
use crate::app::models::channel::ChannelRecord;
use crate::config::{Config, DateTimePattern};
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use tracing::debug;

/// Derive the visit period of a channel, attaching `utc_offset` to each instant
pub fn derive_visit_period(
    channel: &ChannelRecord,
    config: &Config,
    utc_offset: FixedOffset,
) -> Result<DateTimeInterval> {
    let mut earliest: Option<DateTime<FixedOffset>> = None;
    let mut latest: Option<DateTime<FixedOffset>> = None;
    let mut discarded = 0usize;

    for text in channel.transect_timestamps() {
        let Some(instant) = text
            .and_then(|text| parse_timestamp(text, &config.date_time_formats))
            .and_then(|naive| attach_offset(naive, utc_offset))
        else {
            discarded += 1;
            continue;
        };

        earliest = Some(earliest.map_or(instant, |e| e.min(instant)));
        latest = Some(latest.map_or(instant, |l| l.max(instant)));
    }

    if discarded > 0 {
        debug!("Discarded {} absent or unparsable transect timestamps", discarded);
    }

    match (earliest, latest) {
        (Some(start), Some(end)) => Ok(DateTimeInterval::new(start, end)),
        _ => Err(Error::NoTimestamps),
    }
}

/// Parse one timestamp with the first pattern that accepts it
pub fn parse_timestamp(text: &str, patterns: &[DateTimePattern]) -> Option<NaiveDateTime> {
    patterns.iter().find_map(|pattern| pattern.parse(text))
}

fn attach_offset(naive: NaiveDateTime, utc_offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    utc_offset.from_local_datetime(&naive).single()
}
