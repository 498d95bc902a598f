use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, info, LevelFilter};

use fitscut::fits::constants::defaults;
use fitscut::utils::logger::Logger;
use fitscut::commands::{CommandFactory, FitscutCommandFactory};

fn main() {
    let matches = ClapCommand::new("fitscut")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Cut a sub-image out of a FITS file and carry its WCS along")
        .arg(
            Arg::new("source_path")
                .help("Input FITS file (optionally gzip-compressed)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("center_row")
                .help("Row of the cutout center (zero-based), or longitude with --world")
                .required_unless_present("analyze")
                .allow_negative_numbers(true)
                .index(2),
        )
        .arg(
            Arg::new("center_col")
                .help("Column of the cutout center (zero-based), or latitude with --world")
                .required_unless_present("analyze")
                .allow_negative_numbers(true)
                .index(3),
        )
        .arg(
            Arg::new("size")
                .help("Cutout size in pixels: 'N', 'H,W' or 'HxW'")
                .required_unless_present("analyze")
                .allow_negative_numbers(true)
                .index(4),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output FITS file, overwritten if it exists")
                .value_name("FILE")
                .default_value(defaults::OUTPUT_FILE),
        )
        .arg(
            Arg::new("hdu")
                .long("hdu")
                .help("Index of the image HDU to cut from (0 = primary)")
                .value_name("N")
                .default_value("0"),
        )
        .arg(
            Arg::new("world")
                .long("world")
                .help("Interpret the center as world coordinates in degrees")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("array-output")
                .long("array-output")
                .help("Also save the cutout samples as an array")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("array-format")
                .long("array-format")
                .help("Format for array output (csv, json, npy)")
                .value_name("FORMAT")
                .default_value("csv"),
        )
        .arg(
            Arg::new("preview")
                .long("preview")
                .help("Also save a grayscale PNG preview of the cutout")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("progress")
                .long("progress")
                .help("Show a progress bar while reading the image")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("analyze")
                .short('a')
                .long("analyze")
                .help("List the HDUs of the file instead of cutting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Log file")
                .value_name("FILE")
                .default_value(defaults::LOG_FILE),
        )
        .get_matches();

    let log_file = matches.get_one::<String>("log-file")
        .cloned()
        .unwrap_or_else(|| defaults::LOG_FILE.to_string());
    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };

    if let Err(e) = Logger::init_global_logger(&log_file, level) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let logger = match Logger::new(&log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    let factory = FitscutCommandFactory::new();

    let command = match factory.create_command(&matches, &logger) {
        Ok(command) => command,
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    info!("Running {} command", command.name());
    if let Err(e) = command.execute() {
        error!("Command execution error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}
