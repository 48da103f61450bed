//! Tests for method, depth reference and navigation aliasing

use super::*;
use crate::app::models::DepthReference;
use crate::app::services::discharge_mapper::methods::{
    apply_bottom_estimate_method, apply_depth_reference, apply_navigation_method,
    apply_top_estimate_method, is_composite_enabled,
};
use crate::config::{AliasTable, Config};

fn depth_aliases_without_composite() -> AliasTable {
    AliasTable::from_pairs("DepthReferences", [("BT", "BottomTrack")]).unwrap()
}

#[test]
fn test_is_composite_enabled() {
    assert!(is_composite_enabled(Some("On")));
    assert!(is_composite_enabled(Some("on")));
    assert!(is_composite_enabled(Some(" ON ")));
    assert!(!is_composite_enabled(Some("Off")));
    assert!(!is_composite_enabled(Some("")));
    assert!(!is_composite_enabled(None));
}

#[test]
fn test_bottom_method_with_exponent() {
    let config = Config::default();
    let mut section = create_empty_section();

    apply_bottom_estimate_method(
        &mut section,
        Some("No Slip"),
        Some(0.1667),
        &config.bottom_estimate_methods,
    );

    assert_eq!(section.bottom_estimate_method.as_deref(), Some("NSLP"));
    assert_eq!(section.bottom_estimate_exponent, Some(0.1667));
}

#[test]
fn test_method_matching_ignores_case() {
    let config = Config::default();
    let mut section = create_empty_section();

    apply_bottom_estimate_method(
        &mut section,
        Some("power"),
        Some(0.2),
        &config.bottom_estimate_methods,
    );

    assert_eq!(section.bottom_estimate_method.as_deref(), Some("POWR"));
    assert_eq!(section.bottom_estimate_exponent, Some(0.2));
}

#[test]
fn test_missing_method_leaves_section_untouched() {
    let config = Config::default();
    let mut section = create_empty_section();

    apply_bottom_estimate_method(&mut section, None, Some(0.2), &config.bottom_estimate_methods);
    apply_top_estimate_method(&mut section, Some(""), Some(0.2), &config.top_estimate_methods);

    assert_eq!(section.bottom_estimate_method, None);
    assert_eq!(section.top_estimate_method, None);
    assert_eq!(section.bottom_estimate_exponent, None);
}

#[test]
fn test_top_method_without_exponent_keeps_bottom_exponent() {
    let config = Config::default();
    let mut section = create_empty_section();

    apply_bottom_estimate_method(
        &mut section,
        Some("Power"),
        Some(0.16),
        &config.bottom_estimate_methods,
    );
    apply_top_estimate_method(
        &mut section,
        Some("3-Point"),
        Some(0.16),
        &config.top_estimate_methods,
    );

    assert_eq!(section.top_estimate_method.as_deref(), Some("3PNT"));
    assert_eq!(section.bottom_estimate_exponent, Some(0.16));
}

#[test]
fn test_top_power_writes_bottom_exponent() {
    let config = Config::default();
    let mut section = create_empty_section();

    apply_top_estimate_method(
        &mut section,
        Some("Power"),
        Some(0.25),
        &config.top_estimate_methods,
    );

    assert_eq!(section.top_estimate_method.as_deref(), Some("POWR"));
    assert_eq!(section.bottom_estimate_exponent, Some(0.25));
}

#[test]
fn test_top_power_replaces_bottom_exponent() {
    let config = Config::default();
    let mut section = create_empty_section();

    apply_bottom_estimate_method(
        &mut section,
        Some("Power"),
        Some(0.16),
        &config.bottom_estimate_methods,
    );
    assert_eq!(section.bottom_estimate_exponent, Some(0.16));

    apply_top_estimate_method(
        &mut section,
        Some("Power"),
        Some(0.3),
        &config.top_estimate_methods,
    );
    assert_eq!(section.bottom_estimate_exponent, Some(0.3));

    apply_top_estimate_method(&mut section, Some("Power"), None, &config.top_estimate_methods);
    assert_eq!(section.bottom_estimate_exponent, None);
}

#[test]
fn test_depth_reference_alias() {
    let config = Config::default();
    let mut section = create_empty_section();

    apply_depth_reference(&mut section, Some("DS"), Some("Off"), &config.depth_references);

    assert_eq!(section.depth_reference, Some(DepthReference::DepthSounder));
}

#[test]
fn test_depth_reference_unknown_tag_left_unset() {
    let config = Config::default();
    let mut section = create_empty_section();

    apply_depth_reference(&mut section, Some("Sonar"), None, &config.depth_references);

    assert_eq!(section.depth_reference, None);
}

#[test]
fn test_depth_reference_unaliased_tag_matches_enum() {
    let aliases = depth_aliases_without_composite();
    let mut section = create_empty_section();

    apply_depth_reference(&mut section, Some("verticalbeam"), None, &aliases);

    assert_eq!(section.depth_reference, Some(DepthReference::VerticalBeam));
}

#[test]
fn test_composite_depth_without_alias_still_composite() {
    let aliases = depth_aliases_without_composite();
    let mut section = create_empty_section();

    apply_depth_reference(&mut section, Some("BT"), Some("On"), &aliases);

    assert_eq!(section.depth_reference, Some(DepthReference::Composite));
}

#[test]
fn test_navigation_alias() {
    let aliases = AliasTable::from_pairs("NavigationMethods", [("BT", "BOTTOM")]).unwrap();
    let mut section = create_empty_section();

    apply_navigation_method(&mut section, Some("bt"), Some("Off"), &aliases);

    assert_eq!(section.navigation_method.as_deref(), Some("BOTTOM"));
}

#[test]
fn test_navigation_unknown_kept_verbatim() {
    let config = Config::default();
    let mut section = create_empty_section();

    apply_navigation_method(&mut section, Some("None"), None, &config.navigation_methods);

    assert_eq!(section.navigation_method.as_deref(), Some("None"));
}

#[test]
fn test_composite_track_skips_navigation() {
    let config = Config::default();
    let mut section = create_empty_section();

    apply_navigation_method(&mut section, Some("GGA"), Some("on"), &config.navigation_methods);

    assert_eq!(section.navigation_method, None);
}
