//! Per-tick jamming evaluation over a set of jammers.
//!
//! Every call is a full recomputation from the jammer configurations, the
//! current link inputs and the current satellite geometry.

use crate::config::{JammerConfig, JammerType};
use crate::discrimination::{dynamic_discrimination, DiscriminationModel, FccMask, SeparationClass};
use crate::geometry::JammerGeometry;
use crate::interference::{
    carrier_to_interference_db, cinr_with_jamming, combine_ci_db, GlobalEffectiveness,
    GlobalThresholds, JsEffectiveness, JsThresholds,
};
use crate::spectral::{detect_targets, OverlapLevel, SpectralTarget, TargetDetection};
use lbsim_common::{combine_ratios_db, lin_to_db, LinkSense};
use lbsim_link::{fspl_db, JammingContext, LinkInputs};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// Policy
// ============================================================================

/// Tunable constants of the jamming engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JammingPolicy {
    pub discrimination_model: DiscriminationModel,
    pub fcc_mask: FccMask,
    /// Cross-polarization isolation added to C/I (dB, usually negative).
    pub polarization_isolation_db: f64,
    pub js_thresholds: JsThresholds,
    pub global_thresholds: GlobalThresholds,
    /// Overlap applied by barrage and smart jammers.
    pub generic_overlap: f64,
}

impl JammingPolicy {
    /// Default polarization isolation (dB).
    pub const DEFAULT_POLARIZATION_ISOLATION_DB: f64 = -4.0;
    /// Default overlap of non-selective jammers.
    pub const DEFAULT_GENERIC_OVERLAP: f64 = 0.8;
}

impl Default for JammingPolicy {
    fn default() -> Self {
        Self {
            discrimination_model: DiscriminationModel::default(),
            fcc_mask: FccMask::default(),
            polarization_isolation_db: Self::DEFAULT_POLARIZATION_ISOLATION_DB,
            js_thresholds: JsThresholds::default(),
            global_thresholds: GlobalThresholds::default(),
            generic_overlap: Self::DEFAULT_GENERIC_OVERLAP,
        }
    }
}

// ============================================================================
// Inputs and Results
// ============================================================================

/// Link state the jammers are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JammingScene {
    pub uplink: LinkInputs,
    pub downlink: LinkInputs,
    /// Thermal uplink C/N (dB).
    pub uplink_cn_db: f64,
    /// Thermal downlink C/N (dB).
    pub downlink_cn_db: f64,
    pub slant_range_km: f64,
    pub elevation_deg: f64,
}

impl JammingScene {
    fn link(&self, sense: LinkSense) -> &LinkInputs {
        match sense {
            LinkSense::Uplink => &self.uplink,
            LinkSense::Downlink => &self.downlink,
        }
    }

    fn cn_db(&self, sense: LinkSense) -> f64 {
        match sense {
            LinkSense::Uplink => self.uplink_cn_db,
            LinkSense::Downlink => self.downlink_cn_db,
        }
    }
}

/// Effect of one jammer on one hop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JammingResult {
    pub jammer_id: String,
    pub jammer_name: String,
    pub jammer_type: JammerType,
    pub target_link: LinkSense,
    pub detection: TargetDetection,
    pub overlap_level: OverlapLevel,
    pub spectral_overlap_percent: f64,
    pub frequency_offset_mhz: f64,
    pub jammer_eirp_dbw: f64,
    /// Jammer to victim receiver (km).
    pub jammer_distance_km: f64,
    pub jammer_path_loss_db: f64,
    pub signal_path_loss_db: f64,
    pub carrier_power_dbw: f64,
    /// Received jamming power after overlap scaling (dBW).
    pub interference_power_dbw: f64,
    pub discrimination_db: f64,
    /// Off-axis or effective separation angle used for discrimination (degrees).
    pub separation_angle_deg: f64,
    /// Only set by the dynamic model.
    pub separation_class: Option<SeparationClass>,
    pub polarization_isolation_db: f64,
    pub ci_db: f64,
    /// Thermal C/N of the attacked hop (dB).
    pub cn_db: f64,
    pub cinr_with_attack_db: f64,
    pub degradation_individual_db: f64,
    pub jamming_effective: bool,
    pub effectiveness: JsEffectiveness,
    pub recommendation: &'static str,
}

/// Aggregate figures for one hop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkJamming {
    pub sense: LinkSense,
    pub cn_db: f64,
    /// `+inf` when no jammer attacks this hop.
    pub ci_total_db: f64,
    pub cinr_db: f64,
    pub degradation_db: f64,
    pub jammer_count: usize,
}

impl LinkJamming {
    fn from_results(sense: LinkSense, cn_db: f64, results: &[JammingResult]) -> Self {
        let targeting: Vec<f64> = results
            .iter()
            .filter(|r| r.target_link == sense)
            .map(|r| r.ci_db)
            .collect();
        let ci_total_db = combine_ci_db(targeting.iter().copied());
        let cinr = cinr_with_jamming(cn_db, ci_total_db);
        Self {
            sense,
            cn_db,
            ci_total_db,
            cinr_db: cinr.cinr_db,
            degradation_db: cinr.degradation_db,
            jammer_count: targeting.len(),
        }
    }
}

/// Aggregate over all active jammers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombinedJammingMetrics {
    /// C/I with every jammer's interference summed linearly (dB).
    pub ci_total_db: f64,
    /// End-to-end CINR under jamming (dB).
    pub cinr_db: f64,
    /// Thermal end-to-end C/N minus `cinr_db` (dB).
    pub degradation_db: f64,
    pub effectiveness: GlobalEffectiveness,
    pub uplink: LinkJamming,
    pub downlink: LinkJamming,
    pub active_jammers: usize,
}

impl CombinedJammingMetrics {
    /// Context handed to the end-to-end combiner.
    pub fn to_context(&self) -> JammingContext {
        JammingContext {
            cinr_db: self.cinr_db,
            caps_cinr: self.effectiveness.caps_cinr(),
        }
    }

    /// Figures for one hop.
    pub fn link(&self, sense: LinkSense) -> &LinkJamming {
        match sense {
            LinkSense::Uplink => &self.uplink,
            LinkSense::Downlink => &self.downlink,
        }
    }
}

/// Output of [`evaluate_jammers`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JammingEvaluation {
    pub results: Vec<JammingResult>,
    pub combined: CombinedJammingMetrics,
}

impl JammingEvaluation {
    /// Whether any jammer was evaluated.
    pub fn is_active(&self) -> bool {
        !self.results.is_empty()
    }

    /// Result with the strongest interference (lowest C/I).
    pub fn dominant(&self) -> Option<&JammingResult> {
        self.results
            .iter()
            .filter(|r| !r.ci_db.is_nan())
            .min_by(|a, b| a.ci_db.total_cmp(&b.ci_db))
    }
}

// ============================================================================
// Evaluation
// ============================================================================

fn evaluate_target(
    jammer: &JammerConfig,
    geometry: &JammerGeometry,
    target: &SpectralTarget,
    scene: &JammingScene,
    policy: &JammingPolicy,
) -> JammingResult {
    let link = scene.link(target.sense);
    let jammer_distance_km = match target.sense {
        LinkSense::Uplink => geometry.to_satellite_km,
        LinkSense::Downlink => geometry.to_ground_station_km,
    };

    let (discrimination_db, separation_angle_deg, separation_class) = match policy.discrimination_model {
        DiscriminationModel::Dynamic => {
            let d = dynamic_discrimination(
                jammer.distance_3d_km(),
                scene.slant_range_km,
                scene.elevation_deg,
            );
            (d.discrimination_db, d.effective_angle_deg, Some(d.class))
        }
        DiscriminationModel::Fcc => {
            let angle = match target.sense {
                LinkSense::Uplink => geometry.off_axis_at_satellite_deg,
                LinkSense::Downlink => geometry.off_axis_at_ground_deg,
            };
            (policy.fcc_mask.discrimination_db(angle), angle, None)
        }
    };

    let signal_path_loss_db = fspl_db(link.frequency_hz, scene.slant_range_km * 1000.0);
    let jammer_path_loss_db = fspl_db(link.frequency_hz, jammer_distance_km * 1000.0);
    let jammer_eirp_dbw = jammer.eirp_dbw();
    let overlap_db = lin_to_db(target.overlap);

    let ci_db = carrier_to_interference_db(
        link.eirp_dbw,
        signal_path_loss_db,
        jammer_eirp_dbw + overlap_db,
        jammer_path_loss_db,
        discrimination_db,
        policy.polarization_isolation_db,
    );
    let cn_db = scene.cn_db(target.sense);
    let cinr = cinr_with_jamming(cn_db, ci_db);
    let effectiveness = policy.js_thresholds.classify(ci_db);

    debug!(
        "Jammer {} -> {}: C/I {:.2} dB, degradation {:.2} dB ({})",
        jammer.id,
        target.sense.label(),
        ci_db,
        cinr.degradation_db,
        effectiveness.label()
    );

    JammingResult {
        jammer_id: jammer.id.clone(),
        jammer_name: jammer.name.clone(),
        jammer_type: jammer.jammer_type,
        target_link: target.sense,
        detection: target.detection,
        overlap_level: target.level,
        spectral_overlap_percent: target.overlap * 100.0,
        frequency_offset_mhz: target.frequency_offset_mhz,
        jammer_eirp_dbw,
        jammer_distance_km,
        jammer_path_loss_db,
        signal_path_loss_db,
        carrier_power_dbw: link.eirp_dbw - signal_path_loss_db,
        interference_power_dbw: jammer_eirp_dbw + overlap_db - jammer_path_loss_db,
        discrimination_db,
        separation_angle_deg,
        separation_class,
        polarization_isolation_db: policy.polarization_isolation_db,
        ci_db,
        cn_db,
        cinr_with_attack_db: cinr.cinr_db,
        degradation_individual_db: cinr.degradation_db,
        jamming_effective: cinr.jamming_effective,
        effectiveness,
        recommendation: effectiveness.recommendation(),
    }
}

/// Evaluate every active jammer against the scene and combine the results.
///
/// Interference from all jammers attacking the same hop is summed in the
/// linear domain before being combined with that hop's thermal noise.
pub fn evaluate_jammers<'a, I>(jammers: I, scene: &JammingScene, policy: &JammingPolicy) -> JammingEvaluation
where
    I: IntoIterator<Item = &'a JammerConfig>,
{
    let mut results = Vec::new();
    let mut active_jammers = 0;
    for jammer in jammers.into_iter().filter(|j| j.active) {
        active_jammers += 1;
        if jammer.bandwidth_mhz <= 0.0 {
            warn!("Jammer {} has non-positive bandwidth; spectral overlap is zero", jammer.id);
        }
        let geometry = JammerGeometry::compute(jammer, scene.slant_range_km, scene.elevation_deg);
        for target in detect_targets(jammer, &scene.uplink, &scene.downlink, policy.generic_overlap) {
            results.push(evaluate_target(jammer, &geometry, &target, scene, policy));
        }
    }

    let uplink = LinkJamming::from_results(LinkSense::Uplink, scene.uplink_cn_db, &results);
    let downlink = LinkJamming::from_results(LinkSense::Downlink, scene.downlink_cn_db, &results);
    let ci_total_db = combine_ci_db(results.iter().map(|r| r.ci_db));

    let baseline_db = combine_ratios_db(scene.uplink_cn_db, scene.downlink_cn_db);
    let cinr_db = combine_ratios_db(uplink.cinr_db, downlink.cinr_db);
    let degradation_db = if baseline_db.is_nan() || cinr_db.is_nan() {
        f64::NAN
    } else if results.is_empty() {
        0.0
    } else {
        (baseline_db - cinr_db).max(0.0)
    };
    let effectiveness = policy.global_thresholds.classify(degradation_db);

    if active_jammers > 0 {
        debug!(
            "{} active jammers: E2E CINR {:.2} dB, degradation {:.2} dB ({})",
            active_jammers,
            cinr_db,
            degradation_db,
            effectiveness.label()
        );
    }

    JammingEvaluation {
        results,
        combined: CombinedJammingMetrics {
            ci_total_db,
            cinr_db,
            degradation_db,
            effectiveness,
            uplink,
            downlink,
            active_jammers,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JammerType, TargetPreference};

    fn scene() -> JammingScene {
        JammingScene {
            uplink: LinkInputs::from_preset(30.0, 20.0, 45.0, -8.0, 0.0),
            downlink: LinkInputs::from_preset(20.0, 20.0, 48.0, 12.0, 0.0),
            uplink_cn_db: 14.0,
            downlink_cn_db: 18.0,
            slant_range_km: 749.1,
            elevation_deg: 45.0,
        }
    }

    #[test]
    fn test_no_jammers() {
        let eval = evaluate_jammers(Vec::new(), &scene(), &JammingPolicy::default());
        assert!(!eval.is_active());
        assert_eq!(eval.combined.ci_total_db, f64::INFINITY);
        assert_eq!(eval.combined.degradation_db, 0.0);
        assert_eq!(eval.combined.effectiveness, GlobalEffectiveness::Inefectivo);
        assert_eq!(eval.combined.uplink.cinr_db, 14.0);
        assert!(!eval.combined.to_context().caps_cinr);
    }

    #[test]
    fn test_inactive_jammer_ignored() {
        let mut jammer = JammerConfig::new("j1", "Spot", JammerType::Spot);
        jammer.active = false;
        let eval = evaluate_jammers([&jammer], &scene(), &JammingPolicy::default());
        assert!(eval.results.is_empty());
        assert_eq!(eval.combined.active_jammers, 0);
    }

    #[test]
    fn test_spot_jammer_hits_downlink() {
        let jammer = JammerConfig::new("j1", "Spot", JammerType::Spot);
        let s = scene();
        let eval = evaluate_jammers([&jammer], &s, &JammingPolicy::default());
        assert_eq!(eval.results.len(), 1);
        let r = &eval.results[0];
        assert_eq!(r.target_link, LinkSense::Downlink);
        assert_eq!(r.spectral_overlap_percent, 100.0);
        assert!((r.jammer_eirp_dbw - 30.0).abs() < 1e-12);
        assert!((r.jammer_distance_km - jammer.distance_3d_km()).abs() < 1e-9);
        assert!(r.degradation_individual_db >= 0.0);
        assert!((r.degradation_individual_db - (r.cn_db - r.cinr_with_attack_db)).abs() < 1e-12);
        assert_eq!(eval.combined.uplink.jammer_count, 0);
        assert_eq!(eval.combined.downlink.jammer_count, 1);
        assert_eq!(eval.combined.uplink.degradation_db, 0.0);
        assert!((eval.combined.downlink.ci_total_db - r.ci_db).abs() < 1e-9);
    }

    #[test]
    fn test_ci_matches_power_balance() {
        let jammer = JammerConfig::new("j1", "Spot", JammerType::Spot);
        let s = scene();
        let policy = JammingPolicy::default();
        let eval = evaluate_jammers([&jammer], &s, &policy);
        let r = &eval.results[0];
        let expected = r.carrier_power_dbw - r.interference_power_dbw
            + r.discrimination_db
            + policy.polarization_isolation_db;
        assert!((r.ci_db - expected).abs() < 1e-9);
        assert!(r.discrimination_db >= 10.0 && r.discrimination_db <= 29.0);
    }

    #[test]
    fn test_barrage_hits_both_links() {
        let jammer = JammerConfig::new("b1", "Barrage", JammerType::Barrage);
        let eval = evaluate_jammers([&jammer], &scene(), &JammingPolicy::default());
        assert_eq!(eval.results.len(), 2);
        assert_eq!(eval.combined.uplink.jammer_count, 1);
        assert_eq!(eval.combined.downlink.jammer_count, 1);
        assert!(eval
            .results
            .iter()
            .all(|r| (r.spectral_overlap_percent - 80.0).abs() < 1e-9));
    }

    #[test]
    fn test_two_jammers_degrade_more_than_one() {
        let a = JammerConfig::new("a", "A", JammerType::Spot);
        let b = JammerConfig::new("b", "B", JammerType::Spot);
        let s = scene();
        let policy = JammingPolicy::default();
        let single = evaluate_jammers([&a], &s, &policy);
        let double = evaluate_jammers([&a, &b], &s, &policy);
        let one = single.combined.downlink.degradation_db;
        let two = double.combined.downlink.degradation_db;
        assert!(two > one);
        assert!(two < 2.0 * one);
        assert!(double.combined.ci_total_db < single.combined.ci_total_db);
    }

    #[test]
    fn test_combined_degradation_non_negative() {
        let mut jammer = JammerConfig::new("j1", "Spot", JammerType::Spot);
        jammer.power_dbw = 60.0;
        jammer.distance_km = 5.0;
        let eval = evaluate_jammers([&jammer], &scene(), &JammingPolicy::default());
        let c = eval.combined;
        assert!(c.degradation_db > 0.0);
        let baseline = combine_ratios_db(14.0, 18.0);
        assert!((c.degradation_db - (baseline - c.cinr_db)).abs() < 1e-9);
        assert_eq!(c.effectiveness, policy_classify(c.degradation_db));
    }

    fn policy_classify(degradation_db: f64) -> GlobalEffectiveness {
        GlobalThresholds::default().classify(degradation_db)
    }

    #[test]
    fn test_forced_uplink_target() {
        let mut jammer = JammerConfig::new("j1", "Spot", JammerType::Spot);
        jammer.target_preference = TargetPreference::Uplink;
        let eval = evaluate_jammers([&jammer], &scene(), &JammingPolicy::default());
        let r = &eval.results[0];
        assert_eq!(r.target_link, LinkSense::Uplink);
        assert_eq!(r.detection, TargetDetection::Configured);
        // Uplink interference travels to the satellite.
        assert!(r.jammer_distance_km > 700.0);
    }

    #[test]
    fn test_fcc_model_uses_off_axis_angle() {
        let mut jammer = JammerConfig::new("j1", "Spot", JammerType::Spot);
        jammer.azimuth_deg = 180.0;
        let policy = JammingPolicy {
            discrimination_model: DiscriminationModel::Fcc,
            ..Default::default()
        };
        let eval = evaluate_jammers([&jammer], &scene(), &policy);
        let r = &eval.results[0];
        assert!(r.separation_class.is_none());
        assert!(r.separation_angle_deg > 48.0);
        assert_eq!(r.discrimination_db, -10.0);
    }

    #[test]
    fn test_invisible_link_propagates_nan() {
        let mut s = scene();
        s.uplink_cn_db = f64::NAN;
        s.downlink_cn_db = f64::NAN;
        let jammer = JammerConfig::new("j1", "Spot", JammerType::Spot);
        let eval = evaluate_jammers([&jammer], &s, &JammingPolicy::default());
        assert!(eval.results[0].cinr_with_attack_db.is_nan());
        assert!(eval.combined.cinr_db.is_nan());
        assert!(eval.combined.degradation_db.is_nan());
        assert_eq!(eval.combined.effectiveness, GlobalEffectiveness::Inefectivo);
    }
}
