//! Serial Sensor Logger CLI
//!
//! Command-line front end for the sensor-log-capture library. It wires up:
//! - Port activation flags from positional arguments
//! - An optional TOML port-profile table
//! - Logging verbosity
//! - Ctrl-C handling, so an interrupted run still closes every port and
//!   flushes every log file

use anyhow::{Context, Result};
use clap::Parser;
use sensor_log_capture::{PortFlags, ProfileTable, Session};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod config;

/// Serial Sensor Logger - capture timestamped frames from serial sensors
#[derive(Parser, Debug)]
#[command(name = "sensor-log-cli")]
#[command(about = "Log timestamped frames from inertial and positioning serial sensors", long_about = None)]
#[command(version)]
struct Args {
    /// Port activation flags (0 or 1) for inertial-1, inertial-2, and
    /// positional, in that order; fewer than three selects positional only
    #[arg(value_name = "FLAG")]
    ports: Vec<u8>,

    /// Path to a TOML port-profile table overriding the built-in defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory where per-port log files are written
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Serial Sensor Logger v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using capture library v{}", sensor_log_capture::VERSION);

    // Load the port profile table
    let profiles = match &args.config {
        Some(path) => config::load_profiles(path)?,
        None => ProfileTable::default(),
    };

    let flags = PortFlags::from_args(&args.ports);
    if args.ports.len() < 3 {
        log::debug!("fewer than three port flags given, defaulting to positional only");
    }

    // The handler only flips the flag; the poll loop observes it between
    // reads and unwinds through the normal teardown path
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::Relaxed))
        .context("Failed to register interrupt handler")?;

    let mut session = Session::start(flags, &profiles, &args.output_dir)
        .context("Failed to start capture session")?;
    session.run(&stop)?;

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
