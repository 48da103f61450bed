//! Application constants for the discharge mapper
//!
//! This module contains the built-in alias tables, default date/time patterns,
//! unit codes and literal tags used throughout the mapping pipeline.

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Settings key under which the override configuration blob is stored
pub const CONFIG_SETTINGS_KEY: &str = "Config";

/// Default bottom-estimate method aliases (canonical name, alias code)
pub const DEFAULT_BOTTOM_ESTIMATE_METHODS: &[(&str, &str)] =
    &[("Power", "POWR"), ("No Slip", "NSLP")];

/// Default top-estimate method aliases (canonical name, alias code)
pub const DEFAULT_TOP_ESTIMATE_METHODS: &[(&str, &str)] =
    &[("Constant", "CNST"), ("Power", "POWR"), ("3-Point", "3PNT")];

/// Default navigation method aliases (canonical name, alias code)
pub const DEFAULT_NAVIGATION_METHODS: &[(&str, &str)] =
    &[("BT", "BT"), ("GGA", "GGA"), ("VTG", "VTG")];

/// Default depth reference aliases (canonical name, depth reference tag)
pub const DEFAULT_DEPTH_REFERENCES: &[(&str, &str)] = &[
    ("BT", "BottomTrack"),
    ("VB", "VerticalBeam"),
    ("DS", "DepthSounder"),
    ("Composite", "Composite"),
];

/// Date/time pattern used when the configuration supplies none
pub const DEFAULT_DATE_TIME_FORMAT: &str = "M/d/yyyy H:mm:ss";

// =============================================================================
// Extrapolation Methods
// =============================================================================

/// Bottom-estimate methods that carry an exponent
pub const BOTTOM_METHODS_WITH_EXPONENTS: &[&str] = &["Power", "No Slip"];

/// Top-estimate methods that carry an exponent
pub const TOP_METHODS_WITH_EXPONENTS: &[&str] = &["Power"];

// =============================================================================
// Processing Flags and Tags
// =============================================================================

/// Value of the composite depth/track flags when compositing is enabled
pub const COMPOSITE_ENABLED: &str = "On";

/// Depth reference forced when composite depth is enabled
pub const COMPOSITE_DEPTH_REFERENCE: &str = "Composite";

/// Channel name given to the single measurement section
pub const DEFAULT_CHANNEL_NAME: &str = "Main";

/// Software versions ordered below this record local-time transect timestamps
pub const UTC_TIMESTAMP_MIN_VERSION: &str = "4";

// =============================================================================
// Source Unit Codes
// =============================================================================

/// Unit codes as written in the survey document
pub mod unit_codes {
    /// Cubic metres per second, the canonical metric discharge code
    pub const CUBIC_METRES_PER_SECOND: &str = "cms";

    /// Metres
    pub const METRES: &str = "m";

    /// Square metres
    pub const SQUARE_METRES: &str = "sqm";

    /// Metres per second
    pub const METRES_PER_SECOND: &str = "mps";

    /// Degrees
    pub const DEGREES: &str = "deg";
}

/// Root element name of a channel survey document
pub const CHANNEL_ROOT_ELEMENT: &str = "Channel";
