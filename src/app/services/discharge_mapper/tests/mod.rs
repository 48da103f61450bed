//! Tests for the discharge activity mapper
//!
//! Fixtures build channel records in code so each test only spells out the
//! groups it cares about.

pub mod methods_tests;

use crate::app::models::channel::{
    ChannelRecord, ChannelSummary, Depth, DischargeSummary, Extrapolation, Field, Instrument,
    Navigation, OtherSummary, Processing, QualityAssurance, SiteInformation, UncertaintySummary,
};
use crate::app::models::{DateTimeInterval, DischargeSection, FieldVisitDetails, FieldVisitHandle};
use crate::units::UnitSystem;
use chrono::{FixedOffset, TimeZone};

/// Create a visit handle spanning 08:00 to 09:30 on 1 June 2020, UTC-8
pub fn create_test_visit() -> FieldVisitHandle {
    let offset = FixedOffset::west_opt(8 * 3600).unwrap();
    let period = DateTimeInterval::new(
        offset.with_ymd_and_hms(2020, 6, 1, 8, 0, 0).unwrap(),
        offset.with_ymd_and_hms(2020, 6, 1, 9, 30, 0).unwrap(),
    );

    FieldVisitHandle {
        visit_id: 1,
        location_identifier: "08MF005".to_string(),
        details: FieldVisitDetails { period },
    }
}

/// Create a fully populated metric channel record
pub fn create_metric_channel() -> ChannelRecord {
    ChannelRecord {
        software_version: Some("3.43".to_string()),
        site_information: Some(SiteInformation {
            site_id: Some(Field::new("08MF005")),
            station_name: Some(Field::new("Fraser River at Hope")),
        }),
        summary: Some(ChannelSummary {
            discharge: Some(DischargeSummary {
                total: Some(Field::with_units("12.5", "cms")),
                middle: Some(Field::with_units("10", "cms")),
            }),
            other: Some(OtherSummary {
                mean_width: Some(Field::with_units("42.1", "m")),
                mean_area: Some(Field::with_units("55.3", "sqm")),
                mean_q_over_a: Some(Field::with_units("0.226", "mps")),
                user_comment: Some(Field::new("Windy on the left bank")),
                number_of_transects: Some(Field::new("4")),
            }),
            uncertainty: Some(UncertaintySummary {
                total: Some(Field::new("5.2")),
                cov: Some(Field::new("1.8")),
            }),
        }),
        processing: Some(Processing {
            extrapolation: Some(Extrapolation {
                top_method: Some(Field::new("Constant")),
                bottom_method: Some(Field::new("Power")),
                exponent: Some(Field::new("0.16")),
            }),
            depth: Some(Depth {
                reference: Some(Field::new("BT")),
                composite_depth: Some(Field::new("Off")),
                adcp_depth: Some(Field::with_units("0.2", "m")),
            }),
            navigation: Some(Navigation {
                reference: Some(Field::new("GGA")),
                composite_track: Some(Field::new("Off")),
                magnetic_variation: Some(Field::with_units("16.5", "deg")),
            }),
        }),
        instrument: Some(Instrument {
            manufacturer: Some(Field::new("TRDI")),
            model: Some(Field::new("RiverRay")),
            serial_number: Some(Field::new("3122")),
            firmware_version: Some(Field::new("44.19")),
        }),
        qa: Some(QualityAssurance {
            message: Some(Field::new("Moving bed test not performed")),
        }),
        transects: Vec::new(),
    }
}

/// Create a channel record with nothing but a total discharge
pub fn create_minimal_channel(total: &str, units_code: &str) -> ChannelRecord {
    ChannelRecord {
        summary: Some(ChannelSummary {
            discharge: Some(DischargeSummary {
                total: Some(Field::with_units(total, units_code)),
                middle: None,
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Mutable access to the extrapolation group of a channel record
pub fn extrapolation_mut(channel: &mut ChannelRecord) -> &mut Extrapolation {
    channel
        .processing
        .get_or_insert_with(Processing::default)
        .extrapolation
        .get_or_insert_with(Extrapolation::default)
}

/// Create an empty metric section for exercising the method setters
pub fn create_empty_section() -> DischargeSection {
    let visit = create_test_visit();
    let unit_system = UnitSystem::metric();

    DischargeSection {
        channel_name: "Main".to_string(),
        measurement_period: visit.period(),
        discharge: crate::app::models::Measurement::new(1.0, unit_system.discharge_unit_id),
        instrument_description: None,
        distance_unit_id: unit_system.distance_unit_id,
        area_unit_id: unit_system.area_unit_id,
        velocity_unit_id: unit_system.velocity_unit_id,
        comments: None,
        width: None,
        area: None,
        velocity_average: None,
        number_of_transects: None,
        magnetic_variation: None,
        transducer_depth: None,
        discharge_coefficient_variation: None,
        percent_of_discharge_measured: None,
        software_version: None,
        firmware_version: None,
        measurement_device: Default::default(),
        top_estimate_method: None,
        bottom_estimate_method: None,
        bottom_estimate_exponent: None,
        depth_reference: None,
        navigation_method: None,
    }
}
