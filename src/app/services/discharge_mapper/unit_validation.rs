//! Strict unit code validation
//!
//! Checks that every quantity carrying a unit code carries the internal metric
//! code expected for it. Quantities without a code are not checked. Only run
//! when the configuration asks for [`UnitValidation::Strict`].
//!
//! [`UnitValidation::Strict`]: crate::config::UnitValidation::Strict

use crate::app::models::channel::{ChannelRecord, FieldPath, paths};
use crate::constants::unit_codes;
use crate::{Error, Result};

/// Quantity name, expected unit code, path to the quantity
const EXPECTED_UNITS: &[(&str, &str, FieldPath)] = &[
    ("Total", unit_codes::CUBIC_METRES_PER_SECOND, paths::total_discharge),
    ("Middle", unit_codes::CUBIC_METRES_PER_SECOND, paths::middle_discharge),
    ("MeanWidth", unit_codes::METRES, paths::mean_width),
    ("MeanArea", unit_codes::SQUARE_METRES, paths::mean_area),
    ("MeanQoverA", unit_codes::METRES_PER_SECOND, paths::mean_velocity),
    ("MagneticVariation", unit_codes::DEGREES, paths::magnetic_variation),
    ("ADCPDepth", unit_codes::METRES, paths::adcp_depth),
];

/// Fail on the first quantity whose unit code differs from the expected one
pub fn validate_internal_metric_units(channel: &ChannelRecord) -> Result<()> {
    for &(quantity, expected, path) in EXPECTED_UNITS {
        if let Some(found) = channel.units(path) {
            if found != expected {
                return Err(Error::unit_mismatch(quantity, expected, found));
            }
        }
    }

    Ok(())
}
