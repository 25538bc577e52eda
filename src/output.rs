//! Output Formatting Module
//!
//! Terminal report, monthly bar chart, location listing and JSON output.

use serde::Serialize;

use crate::error::Result;
use crate::locations::LocationCatalog;
use crate::yield_calc::{
    LocationEstimate, LocationProfile, MonthlyEnergy, SystemParameters, YieldResult,
    derive_irradiation,
};

/// Width of the longest monthly bar in characters
const CHART_WIDTH: usize = 40;

const ASSUMPTIONS: [&str; 5] = [
    "Monthly solar irradiation values are approximate, location-specific typical values (kWh/m²/month).",
    "Annual GHI is the sum of monthly values; daily GHI = annual GHI / 365.",
    "Tilt and orientation are modeled with simple multipliers, not full sun-path geometry.",
    "Performance Ratio (PR) is derived directly from the total losses: PR = 1 − losses.",
    "Capacity factor = annual energy / (rated power × 8760).",
];

// ===================== FORMATTING HELPERS =====================

/// Format daily irradiation for display
pub fn format_irradiation(kwh_per_m2_day: f64) -> String {
    format!("{:.2} kWh/m²/day", kwh_per_m2_day)
}

/// Format energy for display
pub fn format_energy(kwh: f64) -> String {
    format!("{:.0} kWh", kwh)
}

/// Format a fraction as a percentage
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*} %", decimals, fraction * 100.0)
}

// ===================== TEXT REPORT =====================

/// Print the full report for one location.
pub fn print_report(profile: &LocationProfile, params: &SystemParameters, result: &YieldResult) {
    println!("=== Solar Energy Yield Estimate ===");
    println!("Location   : {} (lat {:.1}°)", profile.name, profile.latitude);
    println!(
        "System     : {:.1} kWp @ {:.0}° tilt, {}",
        params.system_size_kw,
        params.tilt_deg,
        params.orientation.label()
    );
    println!(
        "Panels     : {:.1}% efficiency | Losses: {:.0}%",
        params.panel_efficiency_pct, params.system_losses_pct
    );
    println!();

    println!("Key Results:");
    println!(
        "  Daily irradiation (horizontal)  : {}",
        format_irradiation(result.daily_irradiation_horizontal)
    );
    println!(
        "  Daily irradiation (tilted plane): {}",
        format_irradiation(result.daily_irradiation_tilted)
    );
    println!("  Performance ratio               : {}", format_percent(result.performance_ratio, 0));
    println!("  Specific yield                  : {:.0} kWh/kWp/year", result.specific_yield);
    println!(
        "  Annual energy output            : {}/year",
        format_energy(result.annual_energy_kwh)
    );
    println!("  Capacity factor                 : {}", format_percent(result.capacity_factor, 1));
    println!();

    println!("Monthly Energy Production:");
    for line in monthly_chart(result) {
        println!("  {}", line);
    }
    println!();

    println!("Assumptions & Notes:");
    for note in ASSUMPTIONS {
        println!("  - {}", note);
    }
}

/// One line per month: label, bar scaled to the best month, kWh and kWh/day.
pub fn monthly_chart(result: &YieldResult) -> Vec<String> {
    let peak = result.monthly_energy_kwh.iter().copied().fold(0.0_f64, f64::max);

    result
        .monthly()
        .map(|m| {
            let width = if peak > 0.0 {
                ((m.energy_kwh / peak) * CHART_WIDTH as f64).round() as usize
            } else {
                0
            };
            format!(
                "{} {:<w$} {:>6.0} kWh ({:.1} kWh/day)",
                m.month,
                "█".repeat(width),
                m.energy_kwh,
                m.mean_daily_kwh,
                w = CHART_WIDTH
            )
        })
        .collect()
}

// ===================== LISTING & COMPARISON =====================

/// Print every catalog location with its latitude and annual GHI.
pub fn print_locations(catalog: &LocationCatalog) {
    println!("{:<24} {:>8} {:>18}", "Location", "Latitude", "Annual GHI");
    for profile in catalog.iter() {
        let (annual, _) = derive_irradiation(profile);
        println!("{:<24} {:>7.1}° {:>11.0} kWh/m²", profile.name, profile.latitude, annual);
    }
}

/// Print a ranking of the same system across locations.
pub fn print_comparison(estimates: &[LocationEstimate<'_>]) {
    let Some(first) = estimates.first() else {
        return;
    };

    println!("=== Location Comparison ===");
    println!(
        "System: {:.1} kWp, {}, {:.0}% losses",
        first.params.system_size_kw,
        first.params.orientation.label(),
        first.params.system_losses_pct
    );
    println!();
    println!(
        "{:>4}  {:<24} {:>5}  {:>15}  {:>14}  {:>8}",
        "Rank", "Location", "Tilt", "Specific yield", "Annual energy", "CF"
    );
    for (rank, e) in estimates.iter().enumerate() {
        println!(
            "{:>4}  {:<24} {:>4.0}°  {:>6.0} kWh/kWp  {:>14}  {:>8}",
            rank + 1,
            e.profile.name,
            e.params.tilt_deg,
            e.result.specific_yield,
            format_energy(e.result.annual_energy_kwh),
            format_percent(e.result.capacity_factor, 1)
        );
    }
}

// ===================== JSON =====================

/// Serializable view of one estimate
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub location: &'a str,
    pub latitude: f64,
    pub parameters: &'a SystemParameters,
    pub result: &'a YieldResult,
    pub monthly: Vec<MonthlyEnergy>,
}

impl<'a> Report<'a> {
    pub fn new(
        profile: &'a LocationProfile,
        params: &'a SystemParameters,
        result: &'a YieldResult,
    ) -> Self {
        Self {
            location: &profile.name,
            latitude: profile.latitude,
            parameters: params,
            result,
            monthly: result.monthly().collect(),
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yield_calc::{Orientation, compute_yield};

    fn berlin() -> &'static LocationProfile {
        LocationCatalog::builtin().get("Berlin, Germany").unwrap()
    }

    #[test]
    fn test_formatting_precision() {
        assert_eq!(format_irradiation(4.931_506), "4.93 kWh/m²/day");
        assert_eq!(format_energy(7650.4), "7650 kWh");
        assert_eq!(format_percent(0.174_657, 1), "17.5 %");
        assert_eq!(format_percent(0.85, 0), "85 %");
    }

    #[test]
    fn test_monthly_chart_scaling() {
        let profile = berlin();
        let params = SystemParameters::default().with_default_tilt(profile);
        let result = compute_yield(profile, &params);
        let lines = monthly_chart(&result);

        assert_eq!(lines.len(), 12);
        assert!(lines[0].starts_with("Jan "));
        assert!(lines[11].starts_with("Dec "));

        // June is the sunniest month in Berlin and gets the full-width bar
        let bars: Vec<usize> = lines.iter().map(|l| l.matches('█').count()).collect();
        assert_eq!(bars[5], CHART_WIDTH);
        assert!(bars.iter().all(|b| *b <= CHART_WIDTH));
        assert!(bars[11] < bars[5] / 4, "December bar {} should be short", bars[11]);
    }

    #[test]
    fn test_monthly_chart_all_zero() {
        let profile = LocationProfile::new("Dark", 80.0, &[0.0; 12]).unwrap();
        let params = SystemParameters::default().with_default_tilt(&profile);
        let result = compute_yield(&profile, &params);
        for line in monthly_chart(&result) {
            assert!(!line.contains('█'));
            assert!(line.contains(" 0 kWh"));
        }
    }

    #[test]
    fn test_json_report_shape() {
        let profile = berlin();
        let params = SystemParameters::default()
            .with_default_tilt(profile)
            .with_orientation(Orientation::EastWest);
        let result = compute_yield(profile, &params);

        let json = to_json(&Report::new(profile, &params, &result)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["location"], "Berlin, Germany");
        assert_eq!(value["parameters"]["orientation"], "east-west");
        assert_eq!(value["parameters"]["tilt_deg"], 52.0);
        assert_eq!(value["result"]["monthly_energy_kwh"].as_array().unwrap().len(), 12);
        assert_eq!(value["monthly"][0]["month"], "Jan");
        assert_eq!(value["monthly"][11]["month"], "Dec");

        let annual = value["result"]["annual_energy_kwh"].as_f64().unwrap();
        assert!((annual - result.annual_energy_kwh).abs() < 1e-9);
    }
}
