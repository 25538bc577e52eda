//! Command-Line Interface Module
//!
//! Handles argument parsing and range validation for the solar-yield
//! application.

use std::path::PathBuf;

use clap::Parser;

use crate::locations::DEFAULT_LOCATION;
use crate::yield_calc::Orientation;

// ===================== CLI =====================

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Location name from the catalog (e.g. "Berlin, Germany" or just "berlin")
    #[arg(long, default_value = DEFAULT_LOCATION, env = "SOLAR_YIELD_LOCATION")]
    pub location: String,

    /// Rated system size in kWp (0.5 to 100)
    #[arg(long, default_value_t = 5.0, value_parser = parse_system_size, env = "SOLAR_YIELD_SYSTEM_SIZE")]
    pub system_size: f64,

    /// Panel efficiency in percent (15 to 25); informational only
    #[arg(long, default_value_t = 19.0, value_parser = parse_efficiency, env = "SOLAR_YIELD_PANEL_EFFICIENCY")]
    pub panel_efficiency: f64,

    /// Tilt angle in whole degrees (0 to 60); defaults to the location's latitude
    #[arg(long, value_parser = parse_tilt, env = "SOLAR_YIELD_TILT")]
    pub tilt: Option<f64>,

    /// Array orientation
    #[arg(long, value_enum, default_value_t = Orientation::South, env = "SOLAR_YIELD_ORIENTATION")]
    pub orientation: Orientation,

    /// Total system losses in whole percent (5 to 30): soiling, wiring, inverter, etc.
    #[arg(long, default_value_t = 15.0, value_parser = parse_losses, env = "SOLAR_YIELD_LOSSES")]
    pub losses: f64,

    /// TOML file replacing the built-in location dataset
    #[arg(long, env = "SOLAR_YIELD_LOCATIONS_FILE")]
    pub locations_file: Option<PathBuf>,

    /// List the available locations and exit
    #[arg(long, conflicts_with_all = ["compare", "json"])]
    pub list_locations: bool,

    /// Evaluate the same system at every location and rank by specific yield
    #[arg(long)]
    pub compare: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

// ===================== CLI VALUE PARSERS =====================

fn parse_in_range(s: &str, what: &str, min: f64, max: f64) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(min..=max).contains(&v) {
        return Err(format!("{} must be between {} and {}, got {}", what, min, max, v));
    }
    Ok(v)
}

fn parse_whole_in_range(s: &str, what: &str, min: u32, max: u32) -> Result<f64, String> {
    let v: u32 = s.parse().map_err(|_| format!("Invalid integer: {}", s))?;
    if !(min..=max).contains(&v) {
        return Err(format!("{} must be between {} and {}, got {}", what, min, max, v));
    }
    Ok(f64::from(v))
}

fn parse_system_size(s: &str) -> Result<f64, String> {
    parse_in_range(s, "System size", 0.5, 100.0)
}

fn parse_efficiency(s: &str) -> Result<f64, String> {
    parse_in_range(s, "Panel efficiency", 15.0, 25.0)
}

fn parse_tilt(s: &str) -> Result<f64, String> {
    parse_whole_in_range(s, "Tilt", 0, 60)
}

fn parse_losses(s: &str) -> Result<f64, String> {
    parse_whole_in_range(s, "System losses", 5, 30)
}

// ===================== TESTS =====================
