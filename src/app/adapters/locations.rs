//! Location registry for identifier lookups
//!
//! Locations are loaded from a JSON array and indexed by identifier. The
//! registry answers [`LocationLookup`] requests for hosts that keep their
//! locations in a file rather than a live platform.

use crate::app::adapters::host::LocationLookup;
use crate::app::models::LocationInfo;
use crate::{Error, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// One location as stored in the registry file
#[derive(Debug, Clone, Deserialize)]
struct LocationEntry {
    identifier: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    utc_offset_minutes: i32,
}

impl LocationEntry {
    fn into_location(self) -> Result<LocationInfo> {
        let utc_offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                Error::configuration(format!(
                    "Location '{}' has an out of range UTC offset of {} minutes",
                    self.identifier, self.utc_offset_minutes
                ))
            })?;

        let location = LocationInfo::new(self.identifier.trim(), utc_offset);

        Ok(match self.name {
            Some(name) if !name.trim().is_empty() => location.with_name(name.trim()),
            _ => location,
        })
    }
}

/// Locations indexed by identifier
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    locations: HashMap<String, LocationInfo>,
}

impl LocationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a JSON array of locations
    pub fn from_json(text: &str) -> Result<Self> {
        let entries: Vec<LocationEntry> = serde_json::from_str(text).map_err(|e| {
            Error::configuration(format!("Invalid locations JSON: {}", e))
        })?;

        let mut registry = Self::new();
        for entry in entries {
            registry.insert(entry.into_location()?)?;
        }

        debug!("Loaded {} locations", registry.len());
        Ok(registry)
    }

    /// Load a registry from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;

        let registry = Self::from_json(&text)?;
        info!(
            "Loaded {} locations from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Add a location, rejecting duplicate identifiers
    pub fn insert(&mut self, location: LocationInfo) -> Result<()> {
        if self.locations.contains_key(&location.identifier) {
            return Err(Error::configuration(format!(
                "Duplicate location identifier '{}'",
                location.identifier
            )));
        }

        self.locations.insert(location.identifier.clone(), location);
        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Option<&LocationInfo> {
        self.locations.get(identifier.trim())
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl LocationLookup for LocationRegistry {
    fn location_by_identifier(&self, identifier: &str) -> Result<LocationInfo> {
        self.get(identifier)
            .cloned()
            .ok_or_else(|| Error::location_not_found(identifier.trim()))
    }
}
