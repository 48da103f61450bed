//! Extrapolation method, depth reference and navigation aliasing
//!
//! Raw method names from the survey are replaced by the configured alias when
//! one exists and kept verbatim otherwise. Method names are matched ignoring
//! case.

use crate::app::models::{DepthReference, DischargeSection};
use crate::config::AliasTable;
use crate::constants::{
    BOTTOM_METHODS_WITH_EXPONENTS, COMPOSITE_DEPTH_REFERENCE, COMPOSITE_ENABLED,
    TOP_METHODS_WITH_EXPONENTS,
};
use tracing::debug;

/// Whether a composite depth/track flag is switched on
pub fn is_composite_enabled(flag: Option<&str>) -> bool {
    flag.is_some_and(|flag| flag.trim().eq_ignore_ascii_case(COMPOSITE_ENABLED))
}

fn has_exponent(method: &str, methods_with_exponents: &[&str]) -> bool {
    methods_with_exponents
        .iter()
        .any(|m| m.eq_ignore_ascii_case(method))
}

/// Set the bottom estimate method and, for methods with an exponent, the bottom exponent
pub fn apply_bottom_estimate_method(
    section: &mut DischargeSection,
    raw_method: Option<&str>,
    exponent: Option<f64>,
    aliases: &AliasTable,
) {
    let Some(method) = raw_method.filter(|m| !m.is_empty()) else {
        return;
    };

    if has_exponent(method, BOTTOM_METHODS_WITH_EXPONENTS) {
        section.bottom_estimate_exponent = exponent;
    }

    let code = aliases.resolve(method);
    debug!("Bottom estimate method '{}' -> '{}'", method, code);
    section.bottom_estimate_method = Some(code.to_string());
}

/// Set the top estimate method.
///
/// A top method with an exponent writes the *bottom* exponent field, replacing
/// whatever the bottom method put there (including with `None`).
pub fn apply_top_estimate_method(
    section: &mut DischargeSection,
    raw_method: Option<&str>,
    exponent: Option<f64>,
    aliases: &AliasTable,
) {
    let Some(method) = raw_method.filter(|m| !m.is_empty()) else {
        return;
    };

    if has_exponent(method, TOP_METHODS_WITH_EXPONENTS) {
        section.bottom_estimate_exponent = exponent;
    }

    let code = aliases.resolve(method);
    debug!("Top estimate method '{}' -> '{}'", method, code);
    section.top_estimate_method = Some(code.to_string());
}

/// Set the depth reference; composite depth forces the `Composite` reference
pub fn apply_depth_reference(
    section: &mut DischargeSection,
    raw_reference: Option<&str>,
    composite_depth: Option<&str>,
    aliases: &AliasTable,
) {
    let reference = if is_composite_enabled(composite_depth) {
        Some(COMPOSITE_DEPTH_REFERENCE)
    } else {
        raw_reference
    };

    let Some(reference) = reference.filter(|r| !r.is_empty()) else {
        return;
    };

    let tag = aliases.resolve(reference);

    match DepthReference::from_tag(tag) {
        Some(depth_reference) => section.depth_reference = Some(depth_reference),
        None => debug!(
            "Depth reference '{}' (alias '{}') is not a known reference, leaving unset",
            reference, tag
        ),
    }
}

/// Set the navigation method unless composite tracking is on
pub fn apply_navigation_method(
    section: &mut DischargeSection,
    raw_reference: Option<&str>,
    composite_track: Option<&str>,
    aliases: &AliasTable,
) {
    if is_composite_enabled(composite_track) {
        debug!("Composite tracking is on, navigation method left unset");
        return;
    }

    let Some(reference) = raw_reference.filter(|r| !r.is_empty()) else {
        return;
    };

    section.navigation_method = Some(aliases.resolve(reference).to_string());
}
