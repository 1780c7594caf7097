//! # lbsim-common
//!
//! Shared types and numeric utilities for the link budget simulator.
//!
//! This crate provides:
//! - Physical constants ([`SPEED_OF_LIGHT_M_S`], [`EARTH_RADIUS_M`], [`EARTH_MU_M3_S2`])
//! - Decibel conversions ([`lin_to_db`], [`db_to_lin`], [`sum_powers_db`])
//! - Link and orbit enumerations ([`LinkSense`], [`OrbitMode`])
//! - Simulation time ([`SimTime`])

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Physical Constants
// ============================================================================

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Mean Earth radius (m).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Standard gravitational parameter of the Earth (m³/s²).
pub const EARTH_MU_M3_S2: f64 = 3.986_004_418e14;

/// Earth rotation rate in degrees per second (one turn per solar day).
pub const EARTH_ROTATION_DEG_PER_S: f64 = 360.0 / 86_400.0;

/// Boltzmann term `-10·log10(k)` in dBW/K/Hz.
pub const BOLTZMANN_DB: f64 = 228.6;

/// Floor applied to linear values before taking a logarithm.
pub const MIN_LINEAR: f64 = 1e-30;

// ============================================================================
// Decibel Utilities
// ============================================================================

/// Convert a linear power ratio to decibels.
///
/// The argument is clamped to [`MIN_LINEAR`] so that zero or negative inputs
/// produce a very small finite number instead of `-inf`/NaN. NaN passes through.
pub fn lin_to_db(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    10.0 * x.max(MIN_LINEAR).log10()
}

/// Convert decibels to a linear power ratio.
pub fn db_to_lin(x_db: f64) -> f64 {
    10f64.powf(x_db / 10.0)
}

/// Sum powers given in dB, returning the total in dB.
///
/// NaN entries are ignored. Returns `-inf` when nothing positive remains.
pub fn sum_powers_db<I>(values_db: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let total: f64 = values_db
        .into_iter()
        .filter(|v| !v.is_nan())
        .map(db_to_lin)
        .sum();
    if total <= 0.0 {
        f64::NEG_INFINITY
    } else {
        10.0 * total.log10()
    }
}

/// Combine two carrier-to-impairment ratios (in dB) whose impairments add in power.
///
/// `1/x_tot = 1/x_1 + 1/x_2`, the relation used for C/N with C/I and for cascading hops.
pub fn combine_ratios_db(a_db: f64, b_db: f64) -> f64 {
    let inv = db_to_lin(-a_db) + db_to_lin(-b_db);
    -10.0 * inv.log10()
}

// ============================================================================
// Link and Orbit Enumerations
// ============================================================================

/// Direction of a satellite link hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LinkSense {
    /// Ground station to satellite.
    #[serde(rename = "UL", alias = "uplink")]
    Uplink,
    /// Satellite to ground station.
    #[serde(rename = "DL", alias = "downlink")]
    Downlink,
}

impl LinkSense {
    /// Both senses, uplink first.
    pub const ALL: [LinkSense; 2] = [LinkSense::Uplink, LinkSense::Downlink];

    /// Short label used in exports (`UL`/`DL`).
    pub fn label(&self) -> &'static str {
        match self {
            LinkSense::Uplink => "UL",
            LinkSense::Downlink => "DL",
        }
    }
}

impl fmt::Display for LinkSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Orbit regime of the simulated satellite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrbitMode {
    /// Low Earth orbit: the satellite moves relative to the ground station.
    #[default]
    #[serde(rename = "LEO")]
    Leo,
    /// Geostationary orbit: fixed longitude offset from the ground station.
    #[serde(rename = "GEO")]
    Geo,
}

impl OrbitMode {
    /// Label used in configuration and exports.
    pub fn label(&self) -> &'static str {
        match self {
            OrbitMode::Leo => "LEO",
            OrbitMode::Geo => "GEO",
        }
    }
}

impl fmt::Display for OrbitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrbitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEO" => Ok(OrbitMode::Leo),
            "GEO" => Ok(OrbitMode::Geo),
            other => Err(format!("unknown orbit mode '{}': expected LEO or GEO", other)),
        }
    }
}

/// Which hop drives the primary link block and the MODCOD decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActiveLink {
    /// Uplink only.
    #[serde(rename = "UL")]
    Uplink,
    /// Downlink only.
    #[default]
    #[serde(rename = "DL")]
    Downlink,
    /// End-to-end: the worse of the two hops.
    #[serde(rename = "E2E")]
    EndToEnd,
}

impl ActiveLink {
    /// The hop whose frequency and bandwidth the primary link block uses.
    ///
    /// End-to-end evaluation uses the downlink carrier.
    pub fn carrier_sense(&self) -> LinkSense {
        match self {
            ActiveLink::Uplink => LinkSense::Uplink,
            ActiveLink::Downlink | ActiveLink::EndToEnd => LinkSense::Downlink,
        }
    }
}

impl fmt::Display for ActiveLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActiveLink::Uplink => "UL",
            ActiveLink::Downlink => "DL",
            ActiveLink::EndToEnd => "E2E",
        })
    }
}

impl FromStr for ActiveLink {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UL" | "UPLINK" => Ok(ActiveLink::Uplink),
            "DL" | "DOWNLINK" => Ok(ActiveLink::Downlink),
            "E2E" | "END_TO_END" => Ok(ActiveLink::EndToEnd),
            other => Err(format!("unknown link sense '{}': expected UL, DL or E2E", other)),
        }
    }
}

// ============================================================================
// Time Types
// ============================================================================

/// Simulation time in microseconds since simulation start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SimTime(u64);

impl SimTime {
    /// Zero time.
    pub const ZERO: SimTime = SimTime(0);

    /// Create from microseconds.
    pub fn from_micros(us: u64) -> Self {
        SimTime(us)
    }

    /// Create from seconds (float). Negative or NaN inputs map to zero.
    pub fn from_secs(s: f64) -> Self {
        if s.is_nan() || s <= 0.0 {
            return SimTime::ZERO;
        }
        SimTime((s * 1_000_000.0).round() as u64)
    }

    /// Get as microseconds.
    pub fn as_micros(&self) -> u64 {
        self.0
    }

    /// Get as seconds (float).
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Advance by `dt`, saturating at `limit`.
    pub fn advance_capped(&self, dt: SimTime, limit: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(dt.0).min(limit.0))
    }
}

impl std::ops::Add for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Self) -> Self::Output {
        SimTime(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_roundtrip_values() {
        assert!((lin_to_db(100.0) - 20.0).abs() < 1e-12);
        assert!((db_to_lin(3.0) - 1.995_262_3).abs() < 1e-6);
    }

    #[test]
    fn test_lin_to_db_protects_non_positive() {
        assert!((lin_to_db(0.0) + 300.0).abs() < 1e-9);
        assert!((lin_to_db(-5.0) + 300.0).abs() < 1e-9);
        assert!(lin_to_db(f64::NAN).is_nan());
    }

    #[test]
    fn test_sum_powers_db() {
        // Two equal powers add 3.01 dB
        let total = sum_powers_db([10.0, 10.0]);
        assert!((total - 13.0103).abs() < 1e-3);

        // NaN is ignored
        let total = sum_powers_db([10.0, f64::NAN]);
        assert!((total - 10.0).abs() < 1e-9);

        // Nothing left gives -inf
        assert_eq!(sum_powers_db([f64::NAN]), f64::NEG_INFINITY);
        assert_eq!(sum_powers_db(Vec::<f64>::new()), f64::NEG_INFINITY);
    }

    #[test]
    fn test_combine_ratios_db() {
        let combined = combine_ratios_db(10.0, 10.0);
        assert!((combined - 6.9897).abs() < 1e-3);

        // A much stronger second ratio leaves the first unchanged
        let combined = combine_ratios_db(10.0, 80.0);
        assert!((combined - 10.0).abs() < 1e-3);

        // Infinite ratio contributes nothing
        assert!((combine_ratios_db(12.0, f64::INFINITY) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_link_sense_labels() {
        assert_eq!(LinkSense::Uplink.to_string(), "UL");
        assert_eq!(LinkSense::Downlink.to_string(), "DL");
        assert_eq!(ActiveLink::EndToEnd.carrier_sense(), LinkSense::Downlink);
        assert_eq!("e2e".parse::<ActiveLink>(), Ok(ActiveLink::EndToEnd));
        assert!("sideways".parse::<ActiveLink>().is_err());
    }

    #[test]
    fn test_orbit_mode_parse() {
        assert_eq!("leo".parse::<OrbitMode>(), Ok(OrbitMode::Leo));
        assert_eq!("GEO".parse::<OrbitMode>(), Ok(OrbitMode::Geo));
        assert!("MEO".parse::<OrbitMode>().is_err());
    }

    #[test]
    fn test_sim_time() {
        let t = SimTime::from_secs(1.5);
        assert_eq!(t.as_micros(), 1_500_000);
        assert_eq!(SimTime::from_secs(-3.0), SimTime::ZERO);

        let limit = SimTime::from_secs(2.0);
        let advanced = t.advance_capped(SimTime::from_secs(1.0), limit);
        assert_eq!(advanced, limit);
        assert_eq!(SimTime::from_micros(250_000) + t, SimTime::from_secs(1.75));
        assert_eq!(t.to_string(), "1.500s");
    }
}
