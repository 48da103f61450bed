//! File-level entry points for the host
//!
//! Parses the raw survey bytes, resolves the location and runs the import,
//! then classifies the result. Errors never escape: they are logged and
//! turned into a [`ParseOutcome`].

use crate::Error;
use crate::app::adapters::document::parse_channel;
use crate::app::adapters::host::FieldDataHost;
use crate::app::models::LocationInfo;
use crate::app::models::channel::ChannelRecord;
use crate::app::services::importer::VisitImporter;
use serde::Serialize;
use std::fmt;
use tracing::{error, info};

/// Result of offering one file to the plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum ParseOutcome {
    /// The bytes are not a channel document, or its location is unknown
    CannotParse { reason: String },
    /// The document was read but could not be fully imported
    ParsedButDataInvalid { reason: String },
    /// Everything was imported
    ParsedAndDataValid,
}

impl ParseOutcome {
    pub fn cannot_parse(reason: impl Into<String>) -> Self {
        Self::CannotParse {
            reason: reason.into(),
        }
    }

    pub fn data_invalid(reason: impl Into<String>) -> Self {
        Self::ParsedButDataInvalid {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::ParsedAndDataValid)
    }
}

impl fmt::Display for ParseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CannotParse { reason } => write!(f, "Cannot parse: {}", reason),
            Self::ParsedButDataInvalid { reason } => {
                write!(f, "Parsed but data invalid: {}", reason)
            }
            Self::ParsedAndDataValid => write!(f, "Parsed and data valid"),
        }
    }
}

/// Discharge survey plugin
#[derive(Debug, Clone, Copy, Default)]
pub struct DischargePlugin;

impl DischargePlugin {
    pub fn new() -> Self {
        Self
    }

    /// Parse a file, resolving its location from the document's site identifier
    pub fn parse_file<H>(&self, bytes: &[u8], host: &mut H) -> ParseOutcome
    where
        H: FieldDataHost + ?Sized,
    {
        let channel = match parse_channel(bytes) {
            Ok(channel) => channel,
            Err(e) => return cannot_parse(e),
        };

        let Some(identifier) = channel.site_id() else {
            error!("File can be parsed but there is no SiteID specified");
            return ParseOutcome::data_invalid(Error::MissingSiteId.to_string());
        };

        let location = match host.location_by_identifier(identifier) {
            Ok(location) => location,
            Err(e) => {
                error!("Cannot find location with identifier '{}': {}", identifier, e);
                return ParseOutcome::cannot_parse(e.to_string());
            }
        };

        import(&channel, &location, host)
    }

    /// Parse a file into a location chosen by the caller; the site identifier is not consulted
    pub fn parse_file_for_location<H>(
        &self,
        bytes: &[u8],
        location: &LocationInfo,
        host: &mut H,
    ) -> ParseOutcome
    where
        H: FieldDataHost + ?Sized,
    {
        match parse_channel(bytes) {
            Ok(channel) => import(&channel, location, host),
            Err(e) => cannot_parse(e),
        }
    }
}

fn cannot_parse(e: Error) -> ParseOutcome {
    error!("Not a channel document: {}", e);
    ParseOutcome::cannot_parse(e.to_string())
}

fn import<H>(channel: &ChannelRecord, location: &LocationInfo, host: &mut H) -> ParseOutcome
where
    H: FieldDataHost + ?Sized,
{
    match VisitImporter::new(location).import(channel, host) {
        Ok(summary) => {
            info!(
                "Imported visit {} for {}",
                summary.visit.visit_id, location.identifier
            );
            ParseOutcome::ParsedAndDataValid
        }
        Err(e) => {
            error!("Import failed for {}: {}", location.identifier, e);
            ParseOutcome::data_invalid(e.to_string())
        }
    }
}
