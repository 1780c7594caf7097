//! Link primitives and per-hop link evaluation.

use crate::geometry::GroundGeometry;
use lbsim_common::{BOLTZMANN_DB, SPEED_OF_LIGHT_M_S};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// ============================================================================
// Primitives
// ============================================================================

/// Free-space path loss in dB.
///
/// Returns `+inf` when either the distance or the frequency is not positive.
pub fn fspl_db(frequency_hz: f64, distance_m: f64) -> f64 {
    if distance_m <= 0.0 || frequency_hz <= 0.0 {
        return f64::INFINITY;
    }
    20.0 * (4.0 * PI * distance_m * frequency_hz / SPEED_OF_LIGHT_M_S).log10()
}

/// Carrier-to-noise density in dBHz: `EIRP + G/T − FSPL − losses + 228.6`.
pub fn carrier_to_noise_density_dbhz(
    eirp_dbw: f64,
    gt_dbk: f64,
    fspl_db: f64,
    extra_loss_db: f64,
) -> f64 {
    eirp_dbw + gt_dbk - fspl_db - extra_loss_db + BOLTZMANN_DB
}

/// Carrier-to-noise ratio in dB. Returns `-inf` for a non-positive bandwidth.
pub fn carrier_to_noise_db(cn0_dbhz: f64, bandwidth_hz: f64) -> f64 {
    if bandwidth_hz <= 0.0 {
        return f64::NEG_INFINITY;
    }
    cn0_dbhz - 10.0 * bandwidth_hz.log10()
}

/// Propagation delay over `distance_m` in milliseconds.
pub fn propagation_delay_ms(distance_m: f64, round_trip: bool) -> f64 {
    let factor = if round_trip { 2.0 } else { 1.0 };
    factor * distance_m / SPEED_OF_LIGHT_M_S * 1000.0
}

// ============================================================================
// Per-hop Evaluation
// ============================================================================

/// Parameters of one link hop (uplink or downlink).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkInputs {
    /// Carrier frequency (Hz).
    pub frequency_hz: f64,
    /// Occupied bandwidth (Hz).
    pub bandwidth_hz: f64,
    /// Transmit EIRP (dBW).
    pub eirp_dbw: f64,
    /// Receiver figure of merit (dB/K).
    pub gt_dbk: f64,
    /// Additional losses not covered by free space (dB).
    pub extra_loss_db: f64,
}

impl LinkInputs {
    /// Build inputs from preset units (GHz, MHz).
    pub fn from_preset(
        frequency_ghz: f64,
        bandwidth_mhz: f64,
        eirp_dbw: f64,
        gt_dbk: f64,
        extra_loss_db: f64,
    ) -> Self {
        Self {
            frequency_hz: frequency_ghz * 1e9,
            bandwidth_hz: bandwidth_mhz * 1e6,
            eirp_dbw,
            gt_dbk,
            extra_loss_db,
        }
    }

    /// Carrier frequency in GHz.
    pub fn frequency_ghz(&self) -> f64 {
        self.frequency_hz / 1e9
    }

    /// Bandwidth in MHz.
    pub fn bandwidth_mhz(&self) -> f64 {
        self.bandwidth_hz / 1e6
    }
}

/// Result of evaluating a [`LinkInputs`] against the current geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkOutputs {
    /// Free-space path loss (dB).
    pub fspl_db: f64,
    /// Carrier-to-noise density (dBHz).
    pub cn0_dbhz: f64,
    /// Carrier-to-noise ratio (dB).
    pub cn_db: f64,
    /// Whether the satellite is above the horizon.
    pub visible: bool,
    /// One-way propagation delay (ms).
    pub latency_ms: f64,
}

impl LinkOutputs {
    /// Outputs for a satellite below the horizon.
    pub fn not_visible() -> Self {
        Self {
            fspl_db: f64::NAN,
            cn0_dbhz: f64::NAN,
            cn_db: f64::NAN,
            visible: false,
            latency_ms: f64::NAN,
        }
    }
}

/// Evaluate one hop. A satellite below the horizon yields all-NaN outputs.
pub fn compute_link_outputs(inputs: &LinkInputs, geometry: &GroundGeometry) -> LinkOutputs {
    if !geometry.visible {
        return LinkOutputs::not_visible();
    }
    let distance_m = geometry.slant_range_km * 1000.0;
    let fspl = fspl_db(inputs.frequency_hz, distance_m);
    let cn0 = carrier_to_noise_density_dbhz(inputs.eirp_dbw, inputs.gt_dbk, fspl, inputs.extra_loss_db);
    LinkOutputs {
        fspl_db: fspl,
        cn0_dbhz: cn0,
        cn_db: carrier_to_noise_db(cn0, inputs.bandwidth_hz),
        visible: true,
        latency_ms: propagation_delay_ms(distance_m, false),
    }
}

// ============================================================================
// Loss Budget
// ============================================================================

/// The named scalar losses applied on top of free-space loss, all in dB.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LossBudget {
    /// Feeder (waveguide/cable) loss.
    pub rfl_feeder_db: f64,
    /// Antenna misalignment loss.
    pub aml_misalignment_db: f64,
    /// Atmospheric absorption.
    pub aa_atmos_db: f64,
    /// Rain attenuation.
    pub rain_att_db: f64,
    /// Polarization mismatch loss.
    pub pl_polarization_db: f64,
    /// Pointing loss.
    pub l_pointing_db: f64,
    /// Implementation loss.
    pub l_impl_db: f64,
}

impl LossBudget {
    /// Sum of all losses (`loss_total_extra_dB`).
    pub fn total_db(&self) -> f64 {
        self.entries().iter().map(|(_, v)| v).sum()
    }

    /// Losses paired with their export names, in a fixed order.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("RFL_feeder", self.rfl_feeder_db),
            ("AML_misalignment", self.aml_misalignment_db),
            ("AA_atmos", self.aa_atmos_db),
            ("Rain_att", self.rain_att_db),
            ("PL_polarization", self.pl_polarization_db),
            ("L_pointing", self.l_pointing_db),
            ("L_impl", self.l_impl_db),
        ]
    }
}

// ============================================================================
// Quality Classification
// ============================================================================

/// Qualitative reading of a C/N figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CnQuality {
    /// C/N above 15 dB.
    Excellent,
    /// C/N in [6, 15] dB.
    Acceptable,
    /// C/N below 6 dB.
    Critical,
    /// No C/N because the satellite is not visible.
    NotVisible,
}

impl CnQuality {
    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            CnQuality::Excellent => "Excellent",
            CnQuality::Acceptable => "Acceptable",
            CnQuality::Critical => "Critical",
            CnQuality::NotVisible => "Not visible",
        }
    }
}

/// Classify a C/N value.
pub fn classify_cn(cn_db: f64) -> CnQuality {
    if cn_db.is_nan() {
        CnQuality::NotVisible
    } else if cn_db > 15.0 {
        CnQuality::Excellent
    } else if cn_db >= 6.0 {
        CnQuality::Acceptable
    } else {
        CnQuality::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{central_angle_for_elevation, ground_geometry};
    use lbsim_common::EARTH_RADIUS_M;

    #[test]
    fn test_fspl_monotonic_in_distance() {
        let f = 30e9;
        let mut previous = fspl_db(f, 1.0);
        for d in [10.0, 1e3, 5e5, 7.5e5, 3.6e7, 4e7] {
            let current = fspl_db(f, d);
            assert!(current > previous, "FSPL must grow with distance");
            previous = current;
        }
    }

    #[test]
    fn test_fspl_undefined_inputs() {
        assert_eq!(fspl_db(30e9, 0.0), f64::INFINITY);
        assert_eq!(fspl_db(0.0, 1000.0), f64::INFINITY);
        assert_eq!(fspl_db(-1.0, 1000.0), f64::INFINITY);
        assert!(fspl_db(f64::NAN, 1000.0).is_nan());
    }

    #[test]
    fn test_carrier_to_noise_zero_bandwidth() {
        assert_eq!(carrier_to_noise_db(80.0, 0.0), f64::NEG_INFINITY);
        assert!((carrier_to_noise_db(80.0, 1e6) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_propagation_delay() {
        let one_way = propagation_delay_ms(299_792_458.0, false);
        assert!((one_way - 1000.0).abs() < 1e-9);
        assert!((propagation_delay_ms(1000.0, true) - 2.0 * propagation_delay_ms(1000.0, false)).abs() < 1e-12);
    }

    #[test]
    fn test_leo_uplink_scenario() {
        let radius = EARTH_RADIUS_M + 550_000.0;
        let delta = central_angle_for_elevation(45.0, radius);
        let geometry = ground_geometry(delta, radius);
        assert!((geometry.elevation_deg - 45.0).abs() < 1e-6);
        assert!((geometry.slant_range_km - 749.1).abs() < 1.0);

        let inputs = LinkInputs::from_preset(30.0, 20.0, 45.0, -8.0, 0.0);
        let out = compute_link_outputs(&inputs, &geometry);
        assert!(out.visible);
        // 4π·749.1 km·30 GHz/c
        assert!((out.fspl_db - 179.5).abs() < 0.2, "fspl was {}", out.fspl_db);
        assert!(out.cn0_dbhz > 0.0);
        assert!(out.cn_db.is_finite());
        assert!((out.cn_db - (out.cn0_dbhz - 10.0 * 20e6_f64.log10())).abs() < 1e-9);
    }

    #[test]
    fn test_not_visible_forces_nan() {
        let radius = EARTH_RADIUS_M + 550_000.0;
        let delta = central_angle_for_elevation(0.0, radius);
        let geometry = ground_geometry(delta + 0.5, radius);
        assert!(!geometry.visible);

        let inputs = LinkInputs::from_preset(30.0, 20.0, 45.0, -8.0, 0.0);
        let out = compute_link_outputs(&inputs, &geometry);
        assert!(!out.visible);
        assert!(out.fspl_db.is_nan());
        assert!(out.cn0_dbhz.is_nan());
        assert!(out.cn_db.is_nan());
        assert!(out.latency_ms.is_nan());
    }

    #[test]
    fn test_loss_budget_total() {
        let losses = LossBudget {
            rfl_feeder_db: 0.5,
            rain_att_db: 2.0,
            l_impl_db: 1.0,
            ..Default::default()
        };
        assert!((losses.total_db() - 3.5).abs() < 1e-12);
        assert_eq!(losses.entries()[3], ("Rain_att", 2.0));
    }

    #[test]
    fn test_classify_cn() {
        assert_eq!(classify_cn(20.0), CnQuality::Excellent);
        assert_eq!(classify_cn(15.0), CnQuality::Acceptable);
        assert_eq!(classify_cn(6.0), CnQuality::Acceptable);
        assert_eq!(classify_cn(5.9), CnQuality::Critical);
        assert_eq!(classify_cn(f64::NAN), CnQuality::NotVisible);
    }
}
