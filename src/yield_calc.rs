//! Photovoltaic Yield Calculations
//!
//! Turns a location's monthly Global Horizontal Irradiation (GHI) profile and
//! a set of system parameters into annual and monthly energy estimates.
//!
//! The model is deliberately coarse: tilt and orientation are applied as flat
//! multipliers and no sun-path geometry is involved. Specific yield treats
//! 1 kWp as 1 kW/m² of effective irradiance, so kWh/m² of plane irradiation
//! maps directly onto kWh/kWp.

use chrono::{Month, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};

// ===================== CONSTANTS =====================

/// Days in the reference (non-leap) year
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Hours in the reference (non-leap) year
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Calendar months in display order
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Non-leap year used for per-month day counts
const REFERENCE_YEAR: i32 = 2023;

/// Upper bound of the tilt range offered for a location default
const MAX_DEFAULT_TILT_DEG: f64 = 60.0;

// ===================== ORIENTATION =====================

/// Compass orientation of the array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Facing due south (ideal in the northern hemisphere)
    #[default]
    South,
    /// Facing south-east or south-west
    SouthEastWest,
    /// Split east / west array
    EastWest,
    /// Laid flat
    Flat,
}

impl Orientation {
    /// Fixed multiplier applied to horizontal irradiation.
    pub fn factor(self) -> f64 {
        match self {
            Orientation::South => 1.00,
            Orientation::SouthEastWest => 0.95,
            Orientation::EastWest => 0.90,
            Orientation::Flat => 0.88,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::South => "South (ideal in N hemisphere)",
            Orientation::SouthEastWest => "South-East / South-West",
            Orientation::EastWest => "East / West",
            Orientation::Flat => "Flat / Horizontal",
        }
    }
}

// ===================== INPUTS =====================

/// Irradiation profile of a named site
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationProfile {
    /// Display name, e.g. "Berlin, Germany"
    pub name: String,
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Monthly GHI in kWh/m², January first
    pub monthly_irradiation: [f64; 12],
}

impl LocationProfile {
    /// Build a profile, checking that the monthly series has exactly twelve
    /// finite, non-negative values and that the latitude is in range.
    pub fn new(name: impl Into<String>, latitude: f64, monthly: &[f64]) -> Result<Self> {
        let name = name.into();

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidProfile {
                name,
                message: format!("latitude must be between -90 and 90, got {}", latitude),
            });
        }

        let monthly_irradiation: [f64; 12] = match monthly.try_into() {
            Ok(values) => values,
            Err(_) => {
                return Err(Error::InvalidProfile {
                    name,
                    message: format!("expected 12 monthly values, got {}", monthly.len()),
                });
            }
        };

        if let Some((i, v)) =
            monthly_irradiation.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(Error::InvalidProfile {
                name,
                message: format!(
                    "irradiation for {} must be a non-negative number, got {}",
                    MONTHS[i].name(),
                    v
                ),
            });
        }

        Ok(Self { name, latitude, monthly_irradiation })
    }
}

/// User-selected system configuration
///
/// Ranges are enforced by the input layer; `compute_yield` assumes
/// `system_size_kw > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SystemParameters {
    /// Rated DC capacity in kWp
    pub system_size_kw: f64,
    /// Module efficiency in percent (informational, not used by the model)
    pub panel_efficiency_pct: f64,
    /// Tilt from horizontal in degrees
    pub tilt_deg: f64,
    pub orientation: Orientation,
    /// Combined soiling, wiring, inverter and other losses in percent
    pub system_losses_pct: f64,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            system_size_kw: 5.0,
            panel_efficiency_pct: 19.0,
            tilt_deg: 0.0,
            orientation: Orientation::South,
            system_losses_pct: 15.0,
        }
    }
}

impl SystemParameters {
    /// Tilt set to the site's whole-degree latitude.
    pub fn with_default_tilt(self, profile: &LocationProfile) -> Self {
        self.with_tilt(default_tilt(profile.latitude))
    }

    pub fn with_system_size(mut self, kw: f64) -> Self {
        self.system_size_kw = kw;
        self
    }

    pub fn with_panel_efficiency(mut self, pct: f64) -> Self {
        self.panel_efficiency_pct = pct;
        self
    }

    pub fn with_tilt(mut self, deg: f64) -> Self {
        self.tilt_deg = deg;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_losses(mut self, pct: f64) -> Self {
        self.system_losses_pct = pct;
        self
    }
}

/// Latitude truncated to whole degrees, limited to the offered tilt range.
pub fn default_tilt(latitude: f64) -> f64 {
    latitude.trunc().clamp(0.0, MAX_DEFAULT_TILT_DEG)
}

// ===================== RESULTS =====================

/// Output of a single yield estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldResult {
    /// Annual GHI (kWh/m²/year)
    pub annual_irradiation_horizontal: f64,
    /// Mean daily GHI (kWh/m²/day)
    pub daily_irradiation_horizontal: f64,
    /// Mean daily irradiation on the tilted plane (kWh/m²/day)
    pub daily_irradiation_tilted: f64,
    /// Fraction of energy delivered after losses
    pub performance_ratio: f64,
    /// kWh/kWp/year
    pub specific_yield: f64,
    /// kWh/year
    pub annual_energy_kwh: f64,
    /// Annual energy over rated power × 8760 h
    pub capacity_factor: f64,
    /// kWh per calendar month, January first
    pub monthly_energy_kwh: [f64; 12],
}

/// One month of the energy series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyEnergy {
    /// Three-letter month abbreviation
    pub month: &'static str,
    pub energy_kwh: f64,
    pub mean_daily_kwh: f64,
}

impl YieldResult {
    /// Monthly energy paired with month labels and per-day averages.
    pub fn monthly(&self) -> impl Iterator<Item = MonthlyEnergy> + '_ {
        MONTHS.iter().zip(self.monthly_energy_kwh.iter()).map(|(month, &energy_kwh)| {
            MonthlyEnergy {
                month: month_abbreviation(*month),
                energy_kwh,
                mean_daily_kwh: energy_kwh / f64::from(days_in_month(*month)),
            }
        })
    }
}

/// "Jan", "Feb", ...
pub fn month_abbreviation(month: Month) -> &'static str {
    &month.name()[..3]
}

/// Days in the given month of the non-leap reference year.
pub fn days_in_month(month: Month) -> u32 {
    let m = month.number_from_month();
    let first = NaiveDate::from_ymd_opt(REFERENCE_YEAR, m, 1);
    let next = if m == 12 {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, m + 1, 1)
    };
    match (first, next) {
        (Some(a), Some(b)) => b.signed_duration_since(a).num_days() as u32,
        _ => 30,
    }
}

// ===================== PIPELINE =====================

/// Annual and mean daily GHI of a profile.
///
/// # Returns
/// Tuple of (annual kWh/m², daily kWh/m²)
pub fn derive_irradiation(profile: &LocationProfile) -> (f64, f64) {
    let annual: f64 = profile.monthly_irradiation.iter().sum();
    (annual, annual / DAYS_PER_YEAR)
}

/// Shorthand for [`Orientation::factor`].
pub fn orientation_factor(orientation: Orientation) -> f64 {
    orientation.factor()
}

/// Tilt correction from the distance between tilt and latitude.
///
/// Brackets include their upper bound: a 10° difference still counts as
/// optimal and a 20° difference as near-optimal.
pub fn tilt_factor(tilt_deg: f64, latitude: f64) -> f64 {
    let d = (tilt_deg - latitude).abs();
    if d <= 10.0 {
        1.00
    } else if d <= 20.0 {
        0.96
    } else {
        0.90
    }
}

/// Share of annual irradiation falling in each month.
///
/// An all-zero profile has no meaningful shares; energy is then spread
/// evenly across the year.
pub fn monthly_fractions(profile: &LocationProfile, annual_ghi: f64) -> [f64; 12] {
    if annual_ghi > 0.0 {
        profile.monthly_irradiation.map(|m| m / annual_ghi)
    } else {
        tracing::warn!(
            location = %profile.name,
            "zero annual irradiation, using uniform monthly split"
        );
        [1.0 / 12.0; 12]
    }
}

/// Run the full estimate for one site and system.
pub fn compute_yield(profile: &LocationProfile, params: &SystemParameters) -> YieldResult {
    let (annual_ghi, daily_ghi) = derive_irradiation(profile);

    let daily_tilted = daily_ghi
        * orientation_factor(params.orientation)
        * tilt_factor(params.tilt_deg, profile.latitude);

    let performance_ratio = 1.0 - params.system_losses_pct / 100.0;
    let specific_yield = daily_tilted * DAYS_PER_YEAR * performance_ratio;
    let annual_energy_kwh = specific_yield * params.system_size_kw;
    let capacity_factor = annual_energy_kwh / (params.system_size_kw * HOURS_PER_YEAR);

    let monthly_energy_kwh =
        monthly_fractions(profile, annual_ghi).map(|fraction| annual_energy_kwh * fraction);

    tracing::debug!(
        location = %profile.name,
        annual_ghi,
        daily_tilted,
        specific_yield,
        annual_energy_kwh,
        capacity_factor,
        "computed yield"
    );

    YieldResult {
        annual_irradiation_horizontal: annual_ghi,
        daily_irradiation_horizontal: daily_ghi,
        daily_irradiation_tilted: daily_tilted,
        performance_ratio,
        specific_yield,
        annual_energy_kwh,
        capacity_factor,
        monthly_energy_kwh,
    }
}

// ===================== COMPARISON =====================

/// A single site evaluated with a given system
#[derive(Debug, Clone, PartialEq)]
pub struct LocationEstimate<'a> {
    pub profile: &'a LocationProfile,
    pub params: SystemParameters,
    pub result: YieldResult,
}

/// Evaluate `base` at every profile, best specific yield first.
///
/// Each site uses its own default tilt unless `tilt_deg` pins one.
pub fn rank_locations<'a, I>(
    profiles: I,
    base: &SystemParameters,
    tilt_deg: Option<f64>,
) -> Vec<LocationEstimate<'a>>
where
    I: IntoIterator<Item = &'a LocationProfile>,
{
    let mut estimates: Vec<LocationEstimate<'a>> = profiles
        .into_iter()
        .map(|profile| {
            let params = match tilt_deg {
                Some(deg) => base.with_tilt(deg),
                None => base.with_default_tilt(profile),
            };
            let result = compute_yield(profile, &params);
            LocationEstimate { profile, params, result }
        })
        .collect();

    // Stable sort keeps catalog order for ties
    estimates.sort_by(|a, b| b.result.specific_yield.total_cmp(&a.result.specific_yield));
    estimates
}

// ===================== TESTS =====================
