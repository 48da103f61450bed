//! Channel survey record as read from the input document
//!
//! The tree mirrors the survey document one group per element. Every leaf is a
//! [`Field`] holding the element text and an optional `unitsCode` attribute, so
//! every optional read goes through the same extraction operations on
//! [`ChannelRecord`] instead of ad hoc null checks.

use serde::Deserialize;
use tracing::warn;

/// One leaf element: text content plus an optional unit code
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Field {
    #[serde(rename = "@unitsCode", default)]
    pub units_code: Option<String>,

    #[serde(rename = "$text", default)]
    pub text: Option<String>,
}

impl Field {
    /// Create a text field without a unit code
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            units_code: None,
            text: Some(text.into()),
        }
    }

    /// Create a quantity field with a unit code
    pub fn with_units(text: impl Into<String>, units_code: impl Into<String>) -> Self {
        Self {
            units_code: Some(units_code.into()),
            text: Some(text.into()),
        }
    }

    /// Trimmed text, `None` when absent or blank
    pub fn value(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Numeric value, `None` when absent, blank or not a number
    pub fn number(&self) -> Option<f64> {
        let text = self.value()?;
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            Ok(_) => {
                warn!("Ignoring non-finite value '{}'", text);
                None
            }
            Err(_) => {
                warn!("Ignoring non-numeric value '{}'", text);
                None
            }
        }
    }

    /// Integer value; whole-valued decimals such as `4.0` are accepted
    pub fn integer(&self) -> Option<i32> {
        let text = self.value()?;
        text.parse::<i32>().ok().or_else(|| {
            let value = self.number()?;
            if value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX) {
                Some(value as i32)
            } else {
                warn!("Ignoring non-integer value '{}'", text);
                None
            }
        })
    }

    /// Trimmed unit code, `None` when absent or blank
    pub fn units(&self) -> Option<&str> {
        self.units_code
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Root of a channel survey document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChannelRecord {
    #[serde(rename = "@QRevVersion", default)]
    pub software_version: Option<String>,

    #[serde(rename = "SiteInformation", default)]
    pub site_information: Option<SiteInformation>,

    #[serde(rename = "ChannelSummary", default)]
    pub summary: Option<ChannelSummary>,

    #[serde(rename = "Processing", default)]
    pub processing: Option<Processing>,

    #[serde(rename = "Instrument", default)]
    pub instrument: Option<Instrument>,

    #[serde(rename = "QA", default)]
    pub qa: Option<QualityAssurance>,

    #[serde(rename = "Transect", default)]
    pub transects: Vec<Transect>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SiteInformation {
    #[serde(rename = "SiteID", default)]
    pub site_id: Option<Field>,

    #[serde(rename = "StationName", default)]
    pub station_name: Option<Field>,
}

/// Summary totals of the measurement
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChannelSummary {
    #[serde(rename = "Discharge", default)]
    pub discharge: Option<DischargeSummary>,

    #[serde(rename = "Other", default)]
    pub other: Option<OtherSummary>,

    #[serde(rename = "Uncertainty", default)]
    pub uncertainty: Option<UncertaintySummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DischargeSummary {
    #[serde(rename = "Total", default)]
    pub total: Option<Field>,

    #[serde(rename = "Middle", default)]
    pub middle: Option<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OtherSummary {
    #[serde(rename = "MeanWidth", default)]
    pub mean_width: Option<Field>,

    #[serde(rename = "MeanArea", default)]
    pub mean_area: Option<Field>,

    /// Mean velocity (discharge over area)
    #[serde(rename = "MeanQoverA", default)]
    pub mean_q_over_a: Option<Field>,

    #[serde(rename = "UserComment", default)]
    pub user_comment: Option<Field>,

    #[serde(rename = "NumberofTransects", default)]
    pub number_of_transects: Option<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UncertaintySummary {
    #[serde(rename = "Total", default)]
    pub total: Option<Field>,

    /// Coefficient of variation
    #[serde(rename = "COV", default)]
    pub cov: Option<Field>,
}

/// Processing parameters applied by the survey software
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Processing {
    #[serde(rename = "Extrapolation", default)]
    pub extrapolation: Option<Extrapolation>,

    #[serde(rename = "Depth", default)]
    pub depth: Option<Depth>,

    #[serde(rename = "Navigation", default)]
    pub navigation: Option<Navigation>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Extrapolation {
    #[serde(rename = "TopMethod", default)]
    pub top_method: Option<Field>,

    #[serde(rename = "BottomMethod", default)]
    pub bottom_method: Option<Field>,

    #[serde(rename = "Exponent", default)]
    pub exponent: Option<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Depth {
    #[serde(rename = "Reference", default)]
    pub reference: Option<Field>,

    #[serde(rename = "CompositeDepth", default)]
    pub composite_depth: Option<Field>,

    #[serde(rename = "ADCPDepth", default)]
    pub adcp_depth: Option<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Navigation {
    #[serde(rename = "Reference", default)]
    pub reference: Option<Field>,

    #[serde(rename = "CompositeTrack", default)]
    pub composite_track: Option<Field>,

    #[serde(rename = "MagneticVariation", default)]
    pub magnetic_variation: Option<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Instrument {
    #[serde(rename = "Manufacturer", default)]
    pub manufacturer: Option<Field>,

    #[serde(rename = "Model", default)]
    pub model: Option<Field>,

    #[serde(rename = "SerialNumber", default)]
    pub serial_number: Option<Field>,

    #[serde(rename = "FirmwareVersion", default)]
    pub firmware_version: Option<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QualityAssurance {
    #[serde(rename = "QRev_Message", default)]
    pub message: Option<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Transect {
    #[serde(rename = "StartDateTime", default)]
    pub start_date_time: Option<Field>,

    #[serde(rename = "EndDateTime", default)]
    pub end_date_time: Option<Field>,
}

impl Transect {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start_date_time: Some(Field::new(start)),
            end_date_time: Some(Field::new(end)),
        }
    }
}

impl ChannelRecord {
    /// Resolve a path to a leaf field, if every group along it is present
    pub fn field<F>(&self, path: F) -> Option<&Field>
    where
        F: FnOnce(&Self) -> Option<&Field>,
    {
        path(self)
    }

    /// Extract an optional numeric quantity
    pub fn quantity<F>(&self, path: F) -> Option<f64>
    where
        F: FnOnce(&Self) -> Option<&Field>,
    {
        self.field(path).and_then(Field::number)
    }

    /// Extract an optional integer
    pub fn integer<F>(&self, path: F) -> Option<i32>
    where
        F: FnOnce(&Self) -> Option<&Field>,
    {
        self.field(path).and_then(Field::integer)
    }

    /// Extract optional non-blank text
    pub fn text<F>(&self, path: F) -> Option<&str>
    where
        F: FnOnce(&Self) -> Option<&Field>,
    {
        self.field(path).and_then(Field::value)
    }

    /// Extract the unit code attached to a field
    pub fn units<F>(&self, path: F) -> Option<&str>
    where
        F: FnOnce(&Self) -> Option<&Field>,
    {
        self.field(path).and_then(Field::units)
    }

    /// Site identifier naming the location of the survey
    pub fn site_id(&self) -> Option<&str> {
        self.text(paths::site_id)
    }

    /// Start and end timestamp text of every transect, in document order
    pub fn transect_timestamps(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.transects.iter().flat_map(|t| {
            [
                t.start_date_time.as_ref().and_then(Field::value),
                t.end_date_time.as_ref().and_then(Field::value),
            ]
        })
    }
}

/// Path from the root of a channel record to one leaf field
pub type FieldPath = fn(&ChannelRecord) -> Option<&Field>;

/// Named paths to every leaf field read by the mapping pipeline
pub mod paths {
    use super::{ChannelRecord, Field};

    pub fn site_id(c: &ChannelRecord) -> Option<&Field> {
        c.site_information.as_ref()?.site_id.as_ref()
    }

    pub fn total_discharge(c: &ChannelRecord) -> Option<&Field> {
        c.summary.as_ref()?.discharge.as_ref()?.total.as_ref()
    }

    pub fn middle_discharge(c: &ChannelRecord) -> Option<&Field> {
        c.summary.as_ref()?.discharge.as_ref()?.middle.as_ref()
    }

    pub fn mean_width(c: &ChannelRecord) -> Option<&Field> {
        c.summary.as_ref()?.other.as_ref()?.mean_width.as_ref()
    }

    pub fn mean_area(c: &ChannelRecord) -> Option<&Field> {
        c.summary.as_ref()?.other.as_ref()?.mean_area.as_ref()
    }

    pub fn mean_velocity(c: &ChannelRecord) -> Option<&Field> {
        c.summary.as_ref()?.other.as_ref()?.mean_q_over_a.as_ref()
    }

    pub fn user_comment(c: &ChannelRecord) -> Option<&Field> {
        c.summary.as_ref()?.other.as_ref()?.user_comment.as_ref()
    }

    pub fn number_of_transects(c: &ChannelRecord) -> Option<&Field> {
        c.summary.as_ref()?.other.as_ref()?.number_of_transects.as_ref()
    }

    pub fn total_uncertainty(c: &ChannelRecord) -> Option<&Field> {
        c.summary.as_ref()?.uncertainty.as_ref()?.total.as_ref()
    }

    pub fn coefficient_of_variation(c: &ChannelRecord) -> Option<&Field> {
        c.summary.as_ref()?.uncertainty.as_ref()?.cov.as_ref()
    }

    pub fn top_method(c: &ChannelRecord) -> Option<&Field> {
        c.processing.as_ref()?.extrapolation.as_ref()?.top_method.as_ref()
    }

    pub fn bottom_method(c: &ChannelRecord) -> Option<&Field> {
        c.processing.as_ref()?.extrapolation.as_ref()?.bottom_method.as_ref()
    }

    pub fn exponent(c: &ChannelRecord) -> Option<&Field> {
        c.processing.as_ref()?.extrapolation.as_ref()?.exponent.as_ref()
    }

    pub fn depth_reference(c: &ChannelRecord) -> Option<&Field> {
        c.processing.as_ref()?.depth.as_ref()?.reference.as_ref()
    }

    pub fn composite_depth(c: &ChannelRecord) -> Option<&Field> {
        c.processing.as_ref()?.depth.as_ref()?.composite_depth.as_ref()
    }

    pub fn adcp_depth(c: &ChannelRecord) -> Option<&Field> {
        c.processing.as_ref()?.depth.as_ref()?.adcp_depth.as_ref()
    }

    pub fn navigation_reference(c: &ChannelRecord) -> Option<&Field> {
        c.processing.as_ref()?.navigation.as_ref()?.reference.as_ref()
    }

    pub fn composite_track(c: &ChannelRecord) -> Option<&Field> {
        c.processing.as_ref()?.navigation.as_ref()?.composite_track.as_ref()
    }

    pub fn magnetic_variation(c: &ChannelRecord) -> Option<&Field> {
        c.processing.as_ref()?.navigation.as_ref()?.magnetic_variation.as_ref()
    }

    pub fn manufacturer(c: &ChannelRecord) -> Option<&Field> {
        c.instrument.as_ref()?.manufacturer.as_ref()
    }

    pub fn model(c: &ChannelRecord) -> Option<&Field> {
        c.instrument.as_ref()?.model.as_ref()
    }

    pub fn serial_number(c: &ChannelRecord) -> Option<&Field> {
        c.instrument.as_ref()?.serial_number.as_ref()
    }

    pub fn firmware_version(c: &ChannelRecord) -> Option<&Field> {
        c.instrument.as_ref()?.firmware_version.as_ref()
    }

    pub fn qa_message(c: &ChannelRecord) -> Option<&Field> {
        c.qa.as_ref()?.message.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_trims_and_drops_blank() {
        assert_eq!(Field::new("  BT ").value(), Some("BT"));
        assert_eq!(Field::new("   ").value(), None);
        assert_eq!(Field::default().value(), None);
    }

    #[test]
    fn test_field_number() {
        assert_eq!(Field::with_units(" 12.5 ", "cms").number(), Some(12.5));
        assert_eq!(Field::new("n/a").number(), None);
        assert_eq!(Field::new("").number(), None);
    }

    #[test]
    fn test_field_number_rejects_non_finite() {
        assert_eq!(Field::new("NaN").number(), None);
        assert_eq!(Field::new("inf").number(), None);
        assert_eq!(Field::new("-Infinity").number(), None);
    }

    #[test]
    fn test_field_integer() {
        assert_eq!(Field::new("4").integer(), Some(4));
        assert_eq!(Field::new("4.0").integer(), Some(4));
        assert_eq!(Field::new("4.5").integer(), None);
    }

    #[test]
    fn test_field_units() {
        assert_eq!(Field::with_units("1", " cms ").units(), Some("cms"));
        assert_eq!(Field::with_units("1", "").units(), None);
        assert_eq!(Field::new("1").units(), None);
    }

    #[test]
    fn test_extraction_through_missing_groups() {
        let channel = ChannelRecord::default();

        assert_eq!(
            channel.quantity(|c| c.summary.as_ref()?.discharge.as_ref()?.total.as_ref()),
            None
        );
        assert_eq!(channel.site_id(), None);
    }

    #[test]
    fn test_extraction_through_present_groups() {
        let channel = ChannelRecord {
            summary: Some(ChannelSummary {
                discharge: Some(DischargeSummary {
                    total: Some(Field::with_units("3.25", "cms")),
                    middle: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert_eq!(channel.quantity(paths::total_discharge), Some(3.25));
        assert_eq!(channel.units(paths::total_discharge), Some("cms"));
        assert_eq!(channel.quantity(paths::middle_discharge), None);
    }

    #[test]
    fn test_transect_timestamps_in_document_order() {
        let channel = ChannelRecord {
            transects: vec![
                Transect::new("6/1/2020 8:00:00", "6/1/2020 8:10:00"),
                Transect {
                    start_date_time: None,
                    end_date_time: Some(Field::new(" ")),
                },
            ],
            ..Default::default()
        };

        let timestamps: Vec<_> = channel.transect_timestamps().collect();
        assert_eq!(
            timestamps,
            vec![
                Some("6/1/2020 8:00:00"),
                Some("6/1/2020 8:10:00"),
                None,
                None
            ]
        );
    }
}
