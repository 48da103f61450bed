//! Command implementations for the discharge mapper CLI
//!
//! Each command builds an in-memory host from the files named on the command
//! line, runs the library against it and reports what happened.

use crate::app::adapters::host::{LocationLookup, SettingsStore};
use crate::app::adapters::locations::LocationRegistry;
use crate::app::adapters::memory::{RecordedVisit, RecordingAppender};
use crate::app::services::plugin::{DischargePlugin, ParseOutcome};
use crate::cli::args::{Commands, ConfigArgs, ImportArgs};
use crate::config::Config;
use crate::constants::CONFIG_SETTINGS_KEY;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Everything recorded while importing one file
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub file: PathBuf,
    pub outcome: ParseOutcome,
    pub field_visits: Vec<RecordedVisit>,
}

/// Run the selected command
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Import(args) => run_import(args),
        Commands::Config(args) => run_config(args),
    }
}

/// Set up structured logging to stderr
pub fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("discharge_mapper={}", log_level)));

    let layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    // try_init: a subscriber may already be installed when commands run in tests
    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_timer(fmt::time::uptime()))
            .try_init()
    };

    if result.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Import one survey document
pub fn run_import(args: ImportArgs) -> Result<()> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet);
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let report = import_file(&args)?;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize results")?;
    match &args.output_file {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Results written to {}", path.display());
        }
        None => println!("{}", json),
    }

    if !args.quiet {
        print_summary(&report, start_time);
    }

    if report.outcome.is_valid() {
        Ok(())
    } else {
        anyhow::bail!("{}: {}", report.file.display(), report.outcome)
    }
}

/// Run the plugin against an in-memory host built from the arguments
pub fn import_file(args: &ImportArgs) -> Result<ImportReport> {
    let mut host = build_host(
        args.config_file.as_deref(),
        args.settings_file.as_deref(),
        args.locations_file.as_deref(),
    )?;

    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    info!("Importing {} ({} bytes)", args.file.display(), bytes.len());

    let plugin = DischargePlugin::new();
    let outcome = match &args.location {
        Some(identifier) => {
            let location = host
                .location_by_identifier(identifier)
                .with_context(|| format!("Unknown target location '{}'", identifier))?;
            plugin.parse_file_for_location(&bytes, &location, &mut host)
        }
        None => plugin.parse_file(&bytes, &mut host),
    };

    Ok(ImportReport {
        file: args.file.clone(),
        outcome,
        field_visits: host.into_visits(),
    })
}

/// Print the resolved configuration as JSON
pub fn run_config(args: ConfigArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false);

    args.validate()?;

    let host = build_host(
        args.config_file.as_deref(),
        args.settings_file.as_deref(),
        None,
    )?;
    let config = Config::load(&host)?;

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Assemble the in-memory host from optional settings, config and location files
pub fn build_host(
    config_file: Option<&Path>,
    settings_file: Option<&Path>,
    locations_file: Option<&Path>,
) -> Result<RecordingAppender> {
    let locations = match locations_file {
        Some(path) => LocationRegistry::load(path)?,
        None => LocationRegistry::new(),
    };

    let mut settings = match settings_file {
        Some(path) => load_settings(path)?,
        None => HashMap::new(),
    };

    if let Some(path) = config_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        settings.insert(CONFIG_SETTINGS_KEY.to_string(), text);
    }

    let host = RecordingAppender::new(locations).with_settings(settings);
    debug!(
        "Host ready with {} locations, config override: {}",
        host.locations().len(),
        host.setting(CONFIG_SETTINGS_KEY).is_some()
    );

    Ok(host)
}

/// Load plugin settings from a JSON object of string values
pub fn load_settings(path: &Path) -> Result<HashMap<String, String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&text)
        .with_context(|| format!("Settings file {} is not a JSON object of strings", path.display()))
}

fn print_summary(report: &ImportReport, start_time: Instant) {
    eprintln!();
    eprintln!("{}", "Import Summary".bold());
    eprintln!("{}", "==============".bold());
    eprintln!("File:     {}", report.file.display());

    let outcome = match &report.outcome {
        ParseOutcome::ParsedAndDataValid => report.outcome.to_string().green(),
        ParseOutcome::ParsedButDataInvalid { .. } => report.outcome.to_string().yellow(),
        ParseOutcome::CannotParse { .. } => report.outcome.to_string().red(),
    };
    eprintln!("Outcome:  {}", outcome);

    for recorded in &report.field_visits {
        let name = recorded.location_name.as_deref().unwrap_or("");
        eprintln!(
            "Visit {}:  {} {} {}",
            recorded.visit.visit_id,
            recorded.visit.location_identifier.cyan(),
            name,
            recorded.visit.period().to_string().dimmed()
        );

        for activity in &recorded.discharge_activities {
            eprintln!(
                "          discharge {} {} ({}), {} section(s)",
                activity.discharge.value,
                activity.discharge.unit_id,
                activity.unit_system.system,
                activity.sections.len()
            );
        }
    }

    eprintln!("Elapsed:  {:.2?}", start_time.elapsed());
}
