//! Unit identifier selection for metric and imperial records.
//!
//! Values are never rescaled here: the survey already reports its numbers in
//! the system named by its discharge unit code, so the converter only picks
//! the identifier strings attached to the output record.

use crate::constants::unit_codes;
use serde::Serialize;
use std::fmt;

/// Physical quantity group with a metric and an imperial identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitGroup {
    Distance,
    Area,
    Velocity,
    Discharge,
    Temperature,
}

/// Measurement system of one output record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MeasurementSystem {
    Metric,
    Imperial,
}

impl UnitGroup {
    /// Get the unit identifier for this group in the given system
    pub const fn unit_id(self, system: MeasurementSystem) -> &'static str {
        match (self, system) {
            (UnitGroup::Distance, MeasurementSystem::Metric) => "m",
            (UnitGroup::Distance, MeasurementSystem::Imperial) => "ft",
            (UnitGroup::Area, MeasurementSystem::Metric) => "m^2",
            (UnitGroup::Area, MeasurementSystem::Imperial) => "ft^2",
            (UnitGroup::Velocity, MeasurementSystem::Metric) => "m/s",
            (UnitGroup::Velocity, MeasurementSystem::Imperial) => "ft/s",
            (UnitGroup::Discharge, MeasurementSystem::Metric) => "m^3/s",
            (UnitGroup::Discharge, MeasurementSystem::Imperial) => "ft^3/s",
            (UnitGroup::Temperature, MeasurementSystem::Metric) => "degC",
            (UnitGroup::Temperature, MeasurementSystem::Imperial) => "degF",
        }
    }
}

impl MeasurementSystem {
    /// Select the system from the unit code attached to the total discharge.
    ///
    /// Only the canonical metric code selects metric; anything else, including
    /// an absent code, selects imperial.
    pub fn from_discharge_units(units_code: Option<&str>) -> Self {
        match units_code {
            Some(unit_codes::CUBIC_METRES_PER_SECOND) => MeasurementSystem::Metric,
            _ => MeasurementSystem::Imperial,
        }
    }

    pub fn is_imperial(self) -> bool {
        self == MeasurementSystem::Imperial
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementSystem::Metric => write!(f, "metric"),
            MeasurementSystem::Imperial => write!(f, "imperial"),
        }
    }
}

/// Unit identifiers tagged onto one discharge activity, never mixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitSystem {
    pub system: MeasurementSystem,
    pub distance_unit_id: &'static str,
    pub area_unit_id: &'static str,
    pub velocity_unit_id: &'static str,
    pub discharge_unit_id: &'static str,
}

impl UnitSystem {
    pub const fn new(system: MeasurementSystem) -> Self {
        Self {
            system,
            distance_unit_id: UnitGroup::Distance.unit_id(system),
            area_unit_id: UnitGroup::Area.unit_id(system),
            velocity_unit_id: UnitGroup::Velocity.unit_id(system),
            discharge_unit_id: UnitGroup::Discharge.unit_id(system),
        }
    }

    pub const fn metric() -> Self {
        Self::new(MeasurementSystem::Metric)
    }

    pub const fn imperial() -> Self {
        Self::new(MeasurementSystem::Imperial)
    }
}
