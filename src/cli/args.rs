//! Command-line argument definitions for the discharge mapper
//!
//! This module defines the CLI interface using the clap derive API.

use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// CLI arguments for the discharge survey mapper
///
/// Reads acoustic discharge survey documents and maps them into field visit
/// and discharge activity records.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "discharge-mapper",
    version,
    about = "Map acoustic discharge survey documents to field visit and discharge activity records",
    long_about = "Reads one channel survey document, resolves its location, derives the visit \
                  period from the transect timestamps and maps the survey summary into a \
                  discharge activity. The recorded results are written as JSON."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Import one survey document and write the recorded results
    Import(ImportArgs),
    /// Print the resolved configuration
    Config(ConfigArgs),
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Survey document to import
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Configuration override blob
    ///
    /// JSON object with optional alias tables, date/time patterns and unit
    /// validation mode. Takes precedence over a `Config` entry in the settings file.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Configuration override (JSON)"
    )]
    pub config_file: Option<PathBuf>,

    /// Plugin settings as a JSON object of string values
    #[arg(
        short = 's',
        long = "settings",
        value_name = "FILE",
        help = "Plugin settings (JSON object of strings)"
    )]
    pub settings_file: Option<PathBuf>,

    /// Location registry
    ///
    /// JSON array of `{"identifier", "name", "utc_offset_minutes"}` objects.
    #[arg(
        short = 'l',
        long = "locations",
        value_name = "FILE",
        help = "Location registry (JSON array)"
    )]
    pub locations_file: Option<PathBuf>,

    /// Import into this location instead of the one named by the document
    #[arg(
        long = "location",
        value_name = "IDENTIFIER",
        help = "Target location identifier, overriding the document's SiteID",
        requires = "locations_file"
    )]
    pub location: Option<String>,

    /// Output file for the recorded results
    ///
    /// If not specified, results are written to stdout.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output file for recorded results (JSON)"
    )]
    pub output_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the config command
#[derive(Debug, Clone, Parser)]
pub struct ConfigArgs {
    /// Configuration override blob
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Configuration override (JSON)"
    )]
    pub config_file: Option<PathBuf>,

    /// Plugin settings as a JSON object of string values
    #[arg(
        short = 's',
        long = "settings",
        value_name = "FILE",
        help = "Plugin settings (JSON object of strings)"
    )]
    pub settings_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if !path.is_file() {
        return Err(Error::configuration(format!(
            "{} does not exist: {}",
            what,
            path.display()
        )));
    }
    Ok(())
}

fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl ImportArgs {
    /// Check that every referenced input file exists
    pub fn validate(&self) -> Result<()> {
        require_file(&self.file, "Survey file")?;

        if let Some(config_file) = &self.config_file {
            require_file(config_file, "Config file")?;
        }
        if let Some(settings_file) = &self.settings_file {
            require_file(settings_file, "Settings file")?;
        }
        if let Some(locations_file) = &self.locations_file {
            require_file(locations_file, "Locations file")?;
        }

        if let Some(output_file) = &self.output_file {
            if let Some(parent) = output_file.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "Output file directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

impl ConfigArgs {
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            require_file(config_file, "Config file")?;
        }
        if let Some(settings_file) = &self.settings_file {
            require_file(settings_file, "Settings file")?;
        }
        Ok(())
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, false)
    }
}
