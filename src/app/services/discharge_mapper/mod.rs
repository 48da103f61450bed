//! Discharge activity mapping for channel survey records
//!
//! This module turns one parsed channel record into the discharge activity
//! appended to its field visit. It is a single fail-fast pass:
//!
//! 1. **Unit selection**: the total discharge unit code alone picks metric or imperial
//! 2. **Summary**: total discharge (mandatory), comments, uncertainty
//! 3. **Section**: geometry, instrument identity and derived percent measured
//! 4. **Methods**: extrapolation methods, depth reference and navigation, aliased
//!    through the configuration
//!
//! No values are rescaled. The selected [`UnitSystem`] only supplies the unit
//! identifiers attached to the output.
//!
//! # Example Usage
//!
//! ```rust
//! use discharge_mapper::app::models::channel::ChannelRecord;
//! use discharge_mapper::app::models::FieldVisitHandle;
//! use discharge_mapper::app::services::discharge_mapper::DischargeActivityMapper;
//! use discharge_mapper::config::Config;
//!
//! # fn example(channel: &ChannelRecord, visit: &FieldVisitHandle) -> discharge_mapper::Result<()> {
//! let config = Config::default();
//! let activity = DischargeActivityMapper::new(&config, visit).map(channel)?;
//! println!("Discharge: {} {}", activity.discharge.value, activity.discharge.unit_id);
//! # Ok(())
//! # }
//! ```

pub mod methods;
pub mod unit_validation;

#[cfg(test)]
pub mod tests;

pub use methods::{
    apply_bottom_estimate_method, apply_depth_reference, apply_navigation_method,
    apply_top_estimate_method, is_composite_enabled,
};
pub use unit_validation::validate_internal_metric_units;

use crate::app::models::channel::{ChannelRecord, paths};
use crate::app::models::{
    DischargeActivity, DischargeSection, FieldVisitHandle, MeasurementDevice, UncertaintyType,
};
use crate::config::{Config, UnitValidation};
use crate::constants::DEFAULT_CHANNEL_NAME;
use crate::units::{MeasurementSystem, UnitSystem};
use crate::{Error, Result};
use tracing::{debug, warn};

/// Maps channel records to discharge activities for one field visit
pub struct DischargeActivityMapper<'a> {
    config: &'a Config,
    visit: &'a FieldVisitHandle,
}

impl<'a> DischargeActivityMapper<'a> {
    pub fn new(config: &'a Config, visit: &'a FieldVisitHandle) -> Self {
        Self { config, visit }
    }

    /// Map a channel record to a discharge activity with one section
    pub fn map(&self, channel: &ChannelRecord) -> Result<DischargeActivity> {
        if self.config.unit_validation == UnitValidation::Strict {
            validate_internal_metric_units(channel)?;
        }

        let unit_system = select_unit_system(channel);

        let mut activity = self.create_activity_with_summary(channel, unit_system)?;

        let section = self.create_discharge_section(&activity, channel);
        activity.sections.push(section);

        activity.quantitative_uncertainty = channel.quantity(paths::total_uncertainty);
        activity.active_uncertainty_type = if activity.quantitative_uncertainty.is_some() {
            UncertaintyType::Quantitative
        } else {
            UncertaintyType::None
        };

        Ok(activity)
    }

    fn create_activity_with_summary(
        &self,
        channel: &ChannelRecord,
        unit_system: UnitSystem,
    ) -> Result<DischargeActivity> {
        let total_discharge = channel
            .quantity(paths::total_discharge)
            .ok_or(Error::MissingDischarge)?;

        let mut activity = DischargeActivity::new(self.visit.period(), total_discharge, unit_system);

        activity.comments = join_comments([
            channel.text(paths::user_comment),
            channel.text(paths::qa_message),
        ]);

        Ok(activity)
    }

    fn create_discharge_section(
        &self,
        activity: &DischargeActivity,
        channel: &ChannelRecord,
    ) -> DischargeSection {
        let unit_system = activity.unit_system;

        let percent_of_discharge_measured = channel
            .quantity(paths::middle_discharge)
            .and_then(|middle| percent_of_discharge_measured(middle, activity.discharge.value));

        let manufacturer = channel.text(paths::manufacturer);
        let model = channel.text(paths::model);

        let mut section = DischargeSection {
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            measurement_period: activity.measurement_period,
            discharge: activity.discharge,
            instrument_description: instrument_description(manufacturer, model),
            distance_unit_id: unit_system.distance_unit_id,
            area_unit_id: unit_system.area_unit_id,
            velocity_unit_id: unit_system.velocity_unit_id,
            comments: activity.comments.clone(),
            width: channel.quantity(paths::mean_width),
            area: channel.quantity(paths::mean_area),
            velocity_average: channel.quantity(paths::mean_velocity),
            number_of_transects: channel.integer(paths::number_of_transects),
            magnetic_variation: channel.quantity(paths::magnetic_variation),
            transducer_depth: channel.quantity(paths::adcp_depth),
            discharge_coefficient_variation: channel.quantity(paths::coefficient_of_variation),
            percent_of_discharge_measured,
            software_version: channel
                .software_version
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            firmware_version: channel.text(paths::firmware_version).map(str::to_string),
            measurement_device: MeasurementDevice {
                manufacturer: manufacturer.map(str::to_string),
                model: model.map(str::to_string),
                serial_number: channel.text(paths::serial_number).map(str::to_string),
            },
            top_estimate_method: None,
            bottom_estimate_method: None,
            bottom_estimate_exponent: None,
            depth_reference: None,
            navigation_method: None,
        };

        let exponent = channel.quantity(paths::exponent);

        apply_bottom_estimate_method(
            &mut section,
            channel.text(paths::bottom_method),
            exponent,
            &self.config.bottom_estimate_methods,
        );
        apply_top_estimate_method(
            &mut section,
            channel.text(paths::top_method),
            exponent,
            &self.config.top_estimate_methods,
        );
        apply_depth_reference(
            &mut section,
            channel.text(paths::depth_reference),
            channel.text(paths::composite_depth),
            &self.config.depth_references,
        );
        apply_navigation_method(
            &mut section,
            channel.text(paths::navigation_reference),
            channel.text(paths::composite_track),
            &self.config.navigation_methods,
        );

        section
    }
}

/// Pick the unit system from the total discharge unit code
pub fn select_unit_system(channel: &ChannelRecord) -> UnitSystem {
    let units_code = channel.units(paths::total_discharge);
    let system = MeasurementSystem::from_discharge_units(units_code);

    debug!(
        "Selected {} units from discharge unit code {:?}",
        system, units_code
    );

    UnitSystem::new(system)
}

/// Newline-join the trimmed, non-blank comments in order
pub fn join_comments<'a>(comments: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let joined = comments
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if joined.is_empty() { None } else { Some(joined) }
}

/// Percentage of the total discharge measured in the middle section
pub fn percent_of_discharge_measured(middle_discharge: f64, total_discharge: f64) -> Option<f64> {
    let percent = 100.0 * middle_discharge / total_discharge;

    if percent.is_finite() {
        Some(percent)
    } else {
        warn!(
            "Omitting percent of discharge measured: middle {} over total {} is not finite",
            middle_discharge, total_discharge
        );
        None
    }
}

fn instrument_description(manufacturer: Option<&str>, model: Option<&str>) -> Option<String> {
    let description = [manufacturer, model]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    if description.is_empty() {
        None
    } else {
        Some(description)
    }
}
