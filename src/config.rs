//! Configuration loading and sanitization.
//!
//! The host may store an optional JSON blob overriding the method alias tables
//! and the date/time patterns used to read transect timestamps. Whatever the
//! blob omits, leaves empty or sets to null falls back to the built-in table
//! for that category; a supplied table is used as-is, never merged.

use crate::app::adapters::host::SettingsStore;
use crate::constants::{
    CONFIG_SETTINGS_KEY, DEFAULT_BOTTOM_ESTIMATE_METHODS, DEFAULT_DATE_TIME_FORMAT,
    DEFAULT_DEPTH_REFERENCES, DEFAULT_NAVIGATION_METHODS, DEFAULT_TOP_ESTIMATE_METHODS,
};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// How strictly the unit codes of individual quantities are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitValidation {
    /// Trust the total discharge unit code alone
    #[default]
    #[serde(alias = "permissive")]
    Permissive,
    /// Require every coded quantity to carry its internal metric unit code
    #[serde(alias = "strict")]
    Strict,
}

/// Alias table with case-insensitive key lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    /// Folded key -> (key as supplied, alias)
    entries: BTreeMap<String, (String, String)>,
}

impl AliasTable {
    /// Build a table from (key, alias) pairs, rejecting keys that only differ by case
    pub fn from_pairs<I, K, V>(category: &str, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = BTreeMap::new();

        for (key, alias) in pairs {
            let key = key.into();
            if let Some((existing, _)) =
                entries.insert(fold_case(&key), (key.clone(), alias.into()))
            {
                return Err(Error::configuration(format!(
                    "{} has keys '{}' and '{}' that differ only by case",
                    category, existing, key
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Look up the alias for a key, ignoring case
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&fold_case(key))
            .map(|(_, alias)| alias.as_str())
    }

    /// Substitute the alias for `value` when one exists, else keep `value`
    pub fn resolve<'a>(&'a self, value: &'a str) -> &'a str {
        self.get(value).unwrap_or(value)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate (key as supplied, alias) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .values()
            .map(|(key, alias)| (key.as_str(), alias.as_str()))
    }
}

impl Serialize for AliasTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, alias) in self.iter() {
            map.serialize_entry(key, alias)?;
        }
        map.end()
    }
}

fn fold_case(key: &str) -> String {
    key.to_lowercase()
}

/// A date/time pattern in the host's custom pattern language, compiled for chrono
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimePattern {
    pattern: String,
    format: String,
}

impl DateTimePattern {
    /// Compile a custom pattern such as `M/d/yyyy H:mm:ss`
    pub fn compile(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            format: translate_pattern(pattern),
        }
    }

    /// The pattern as configured
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parse a timestamp, tolerating surrounding whitespace.
    ///
    /// Date-only patterns yield midnight.
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        NaiveDateTime::parse_from_str(text, &self.format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, &self.format)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

impl Serialize for DateTimePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pattern)
    }
}

/// Translate a custom date/time pattern into a chrono format string.
///
/// Unrecognised letters are copied as literals, as are quoted runs and
/// backslash-escaped characters. A `%` marks a single custom specifier and
/// is dropped.
fn translate_pattern(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut format = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        match c {
            '\'' | '"' => {
                i += 1;
                while i < chars.len() && chars[i] != c {
                    push_literal(&mut format, chars[i]);
                    i += 1;
                }
                i += 1;
                continue;
            }
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    push_literal(&mut format, next);
                }
                i += 2;
                continue;
            }
            '%' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let run = chars[i..].iter().take_while(|&&ch| ch == c).count();

        let token = match (c, run) {
            ('y', 1..=2) => Some("%y"),
            ('y', _) => Some("%Y"),
            ('M', 1..=2) => Some("%m"),
            ('M', 3) => Some("%b"),
            ('M', _) => Some("%B"),
            ('d', 1..=2) => Some("%d"),
            ('d', 3) => Some("%a"),
            ('d', _) => Some("%A"),
            ('H', _) => Some("%H"),
            ('h', _) => Some("%I"),
            ('m', _) => Some("%M"),
            ('s', _) => Some("%S"),
            ('t', _) => Some("%p"),
            ('f' | 'F', 1..=3) => Some("%3f"),
            ('f' | 'F', 4..=6) => Some("%6f"),
            ('f' | 'F', _) => Some("%9f"),
            _ => None,
        };

        match token {
            Some(token) => format.push_str(token),
            None => {
                for _ in 0..run {
                    push_literal(&mut format, c);
                }
            }
        }

        i += run;
    }

    format
}

fn push_literal(format: &mut String, c: char) {
    if c == '%' {
        format.push_str("%%");
    } else {
        format.push(c);
    }
}

/// Shape of the override blob as stored by the host
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawConfig {
    #[serde(default)]
    top_estimate_methods: Option<HashMap<String, String>>,
    #[serde(default)]
    bottom_estimate_methods: Option<HashMap<String, String>>,
    #[serde(default)]
    navigation_methods: Option<HashMap<String, String>>,
    #[serde(default)]
    depth_references: Option<HashMap<String, String>>,
    #[serde(default)]
    date_time_formats: Option<Vec<String>>,
    #[serde(default)]
    unit_validation: Option<UnitValidation>,
}

/// Resolved configuration for one parse operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    pub top_estimate_methods: AliasTable,
    pub bottom_estimate_methods: AliasTable,
    pub navigation_methods: AliasTable,
    pub depth_references: AliasTable,
    pub date_time_formats: Vec<DateTimePattern>,
    pub unit_validation: UnitValidation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_estimate_methods: default_table(DEFAULT_TOP_ESTIMATE_METHODS),
            bottom_estimate_methods: default_table(DEFAULT_BOTTOM_ESTIMATE_METHODS),
            navigation_methods: default_table(DEFAULT_NAVIGATION_METHODS),
            depth_references: default_table(DEFAULT_DEPTH_REFERENCES),
            date_time_formats: vec![DateTimePattern::compile(DEFAULT_DATE_TIME_FORMAT)],
            unit_validation: UnitValidation::default(),
        }
    }
}

fn default_table(defaults: &'static [(&'static str, &'static str)]) -> AliasTable {
    debug_assert!(!defaults.is_empty(), "default alias table can't be empty");

    AliasTable {
        entries: defaults
            .iter()
            .map(|&(key, alias)| (fold_case(key), (key.to_string(), alias.to_string())))
            .collect(),
    }
}

impl Config {
    /// Load the configuration stored under the `Config` settings key
    pub fn load<S: SettingsStore + ?Sized>(settings: &S) -> Result<Self> {
        match settings.setting(CONFIG_SETTINGS_KEY) {
            Some(text) if !text.trim().is_empty() => Self::from_json(text),
            _ => {
                debug!("No configuration override found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse and sanitize a configuration blob.
    ///
    /// A blob that does not have the expected shape is an error carrying the
    /// offending text; it is never silently replaced by defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawConfig =
            serde_json::from_str(text).map_err(|e| Error::config_parse(text, e))?;

        Self::sanitize(raw)
    }

    fn sanitize(raw: RawConfig) -> Result<Self> {
        Ok(Self {
            top_estimate_methods: resolve_aliases(
                "TopEstimateMethods",
                raw.top_estimate_methods,
                DEFAULT_TOP_ESTIMATE_METHODS,
            )?,
            bottom_estimate_methods: resolve_aliases(
                "BottomEstimateMethods",
                raw.bottom_estimate_methods,
                DEFAULT_BOTTOM_ESTIMATE_METHODS,
            )?,
            navigation_methods: resolve_aliases(
                "NavigationMethods",
                raw.navigation_methods,
                DEFAULT_NAVIGATION_METHODS,
            )?,
            depth_references: resolve_aliases(
                "DepthReferences",
                raw.depth_references,
                DEFAULT_DEPTH_REFERENCES,
            )?,
            date_time_formats: resolve_patterns(raw.date_time_formats, DEFAULT_DATE_TIME_FORMAT),
            unit_validation: raw.unit_validation.unwrap_or_default(),
        })
    }

    /// Set the unit validation mode
    pub fn with_unit_validation(mut self, unit_validation: UnitValidation) -> Self {
        self.unit_validation = unit_validation;
        self
    }

    /// Replace the date/time patterns, applying the usual sanitization
    pub fn with_date_time_formats<I, P>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.date_time_formats = resolve_patterns(
            Some(patterns.into_iter().map(Into::into).collect()),
            DEFAULT_DATE_TIME_FORMAT,
        );
        self
    }
}

/// Resolve one alias category: a non-empty supplied table wins outright,
/// otherwise the category's defaults apply.
pub fn resolve_aliases(
    category: &str,
    supplied: Option<HashMap<String, String>>,
    defaults: &'static [(&'static str, &'static str)],
) -> Result<AliasTable> {
    match supplied {
        Some(table) if !table.is_empty() => AliasTable::from_pairs(category, table),
        _ => {
            debug!("Using default {} aliases", category);
            Ok(default_table(defaults))
        }
    }
}

/// Trim the supplied patterns and drop blank ones; fall back to `default` if none remain
pub fn resolve_patterns(supplied: Option<Vec<String>>, default: &str) -> Vec<DateTimePattern> {
    debug_assert!(!default.trim().is_empty(), "default pattern can't be empty");

    let patterns: Vec<DateTimePattern> = supplied
        .unwrap_or_default()
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(DateTimePattern::compile)
        .collect();

    if patterns.is_empty() {
        vec![DateTimePattern::compile(default)]
    } else {
        patterns
    }
}
