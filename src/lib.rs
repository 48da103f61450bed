//! Discharge Mapper Library
//!
//! A Rust library for turning acoustic discharge survey records (one channel
//! document per measurement) into normalized field-visit and discharge-activity
//! records ready to be appended to a time-series data platform.
//!
//! This library provides tools for:
//! - Resolving a user-overridable configuration of method aliases and date/time patterns
//! - Selecting metric or imperial unit identifiers from the source record
//! - Deriving the visit period from per-transect timestamps
//! - Mapping the survey summary and processing parameters into a discharge activity
//! - Driving a host appender and classifying the outcome of each file

pub mod config;
pub mod constants;
pub mod units;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod discharge_mapper;
        pub mod field_visit;
        pub mod importer;
        pub mod plugin;
        pub mod time_window;
    }
    pub mod adapters {
        pub mod document;
        pub mod host;
        pub mod locations;
        pub mod memory;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::channel::ChannelRecord;
pub use app::models::{DischargeActivity, DischargeSection, FieldVisitDetails, LocationInfo};
pub use app::services::plugin::{DischargePlugin, ParseOutcome};
pub use config::Config;

/// Result type alias for the discharge mapper
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for mapping one survey document
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The configuration blob is present but is not the expected JSON shape
    #[error("Invalid Config JSON: {text}")]
    ConfigParse {
        text: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration is well-formed JSON but semantically unusable
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The survey has no total discharge value
    #[error("No total discharge amount provided")]
    MissingDischarge,

    /// None of the transect timestamps matched a configured pattern
    #[error("Can't parse any timestamps from the transects")]
    NoTimestamps,

    /// A quantity carries a unit code other than the one expected
    #[error("Expected units '{expected}' for {quantity} but found '{found}'")]
    UnitMismatch {
        quantity: String,
        expected: String,
        found: String,
    },

    /// The input bytes are not a readable channel document
    #[error("Document error: {message}")]
    Document {
        message: String,
        #[source]
        source: Option<quick_xml::DeError>,
    },

    /// The channel document does not name its site
    #[error("Missing <Channel/SiteInformation/SiteID>")]
    MissingSiteId,

    /// The host has no location with the given identifier
    #[error("Location not found: '{identifier}'")]
    LocationNotFound { identifier: String },

    /// The host rejected an appended record
    #[error("Appender error: {message}")]
    Appender { message: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a config parse error carrying the offending text
    pub fn config_parse(text: impl Into<String>, source: serde_json::Error) -> Self {
        Self::ConfigParse {
            text: text.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a unit mismatch error
    pub fn unit_mismatch(
        quantity: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnitMismatch {
            quantity: quantity.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a document error, optionally wrapping the deserializer failure
    pub fn document(message: impl Into<String>, source: Option<quick_xml::DeError>) -> Self {
        Self::Document {
            message: message.into(),
            source,
        }
    }

    /// Create a location not found error
    pub fn location_not_found(identifier: impl Into<String>) -> Self {
        Self::LocationNotFound {
            identifier: identifier.into(),
        }
    }

    /// Create an appender error
    pub fn appender(message: impl Into<String>) -> Self {
        Self::Appender {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<quick_xml::DeError> for Error {
    fn from(error: quick_xml::DeError) -> Self {
        Self::Document {
            message: "Channel document deserialization failed".to_string(),
            source: Some(error),
        }
    }
}
