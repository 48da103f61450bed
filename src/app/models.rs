//! Data models for discharge mapping
//!
//! This module contains the records exchanged with the host: the location and
//! field visit a survey belongs to, and the discharge activity produced from it.
//! The parsed input document lives in [`channel`].

pub mod channel;

use crate::units::UnitSystem;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;

// =============================================================================
// Time Interval
// =============================================================================

/// Closed interval between two instants carrying a UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateTimeInterval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateTimeInterval {
    /// Create an interval; `start` must not be after `end`
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        debug_assert!(start <= end, "interval start {start} is after end {end}");
        Self { start, end }
    }

}

impl fmt::Display for DateTimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

// =============================================================================
// Location and Field Visit
// =============================================================================

/// Location resolved from the site identifier of a survey
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInfo {
    /// Display identifier of the location
    pub identifier: String,

    /// Human-readable name (optional)
    pub name: Option<String>,

    /// UTC offset of the location's local standard time
    pub utc_offset: FixedOffset,
}

impl LocationInfo {
    pub fn new(identifier: impl Into<String>, utc_offset: FixedOffset) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
            utc_offset,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Details of a field visit to append for a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldVisitDetails {
    pub period: DateTimeInterval,
}

/// Handle returned by the appender for a field visit it accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldVisitHandle {
    pub visit_id: usize,
    pub location_identifier: String,
    pub details: FieldVisitDetails,
}

impl FieldVisitHandle {
    /// Period of the visit, shared by every activity appended to it
    pub fn period(&self) -> DateTimeInterval {
        self.details.period
    }
}

// =============================================================================
// Discharge Activity
// =============================================================================

/// A numeric value tagged with its unit identifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub value: f64,
    pub unit_id: &'static str,
}

impl Measurement {
    pub fn new(value: f64, unit_id: &'static str) -> Self {
        Self { value, unit_id }
    }
}

/// Kind of uncertainty reported for a discharge activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum UncertaintyType {
    #[default]
    None,
    Quantitative,
}

/// Reference used to measure depth during the survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DepthReference {
    BottomTrack,
    VerticalBeam,
    DepthSounder,
    Composite,
}

impl DepthReference {
    pub const ALL: [DepthReference; 4] = [
        DepthReference::BottomTrack,
        DepthReference::VerticalBeam,
        DepthReference::DepthSounder,
        DepthReference::Composite,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DepthReference::BottomTrack => "BottomTrack",
            DepthReference::VerticalBeam => "VerticalBeam",
            DepthReference::DepthSounder => "DepthSounder",
            DepthReference::Composite => "Composite",
        }
    }

    /// Match a tag against the enumerated references, ignoring case
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|reference| reference.as_str().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for DepthReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the instrument that made the measurement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MeasurementDevice {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
}

/// One measurement section of a discharge activity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DischargeSection {
    pub channel_name: String,
    pub measurement_period: DateTimeInterval,
    pub discharge: Measurement,
    pub instrument_description: Option<String>,
    pub distance_unit_id: &'static str,
    pub area_unit_id: &'static str,
    pub velocity_unit_id: &'static str,
    pub comments: Option<String>,

    pub width: Option<f64>,
    pub area: Option<f64>,
    pub velocity_average: Option<f64>,
    pub number_of_transects: Option<i32>,
    pub magnetic_variation: Option<f64>,
    pub transducer_depth: Option<f64>,
    pub discharge_coefficient_variation: Option<f64>,
    pub percent_of_discharge_measured: Option<f64>,

    pub software_version: Option<String>,
    pub firmware_version: Option<String>,
    pub measurement_device: MeasurementDevice,

    pub top_estimate_method: Option<String>,
    pub bottom_estimate_method: Option<String>,
    pub bottom_estimate_exponent: Option<f64>,
    pub depth_reference: Option<DepthReference>,
    pub navigation_method: Option<String>,
}

/// Discharge activity appended to a field visit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DischargeActivity {
    pub measurement_period: DateTimeInterval,
    pub discharge: Measurement,
    pub unit_system: UnitSystem,
    pub comments: Option<String>,
    pub quantitative_uncertainty: Option<f64>,
    pub active_uncertainty_type: UncertaintyType,
    pub sections: Vec<DischargeSection>,
}

impl DischargeActivity {
    /// Create an activity with a summary discharge and no sections yet
    pub fn new(
        measurement_period: DateTimeInterval,
        discharge_value: f64,
        unit_system: UnitSystem,
    ) -> Self {
        Self {
            measurement_period,
            discharge: Measurement::new(discharge_value, unit_system.discharge_unit_id),
            unit_system,
            comments: None,
            quantitative_uncertainty: None,
            active_uncertainty_type: UncertaintyType::None,
            sections: Vec::new(),
        }
    }
}
