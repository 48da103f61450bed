use clap::Parser;
use discharge_mapper::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    match commands::run(command) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Discharge Mapper - Acoustic Discharge Survey Importer");
    println!("=====================================================");
    println!();
    println!("Map acoustic discharge survey documents into field visit and");
    println!("discharge activity records.");
    println!();
    println!("USAGE:");
    println!("    discharge-mapper <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    import      Import one survey document and write the recorded results");
    println!("    config      Print the resolved configuration");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Import a survey, resolving its SiteID against a location registry:");
    println!("    discharge-mapper import survey.xml --locations locations.json");
    println!();
    println!("    # Import into a chosen location with a configuration override:");
    println!("    discharge-mapper import survey.xml --locations locations.json \\");
    println!("                            --location 08MF005 --config config.json");
    println!();
    println!("    # Show the configuration in effect:");
    println!("    discharge-mapper config --config config.json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    discharge-mapper <COMMAND> --help");
}
