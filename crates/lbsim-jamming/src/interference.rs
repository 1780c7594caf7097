//! Carrier-to-interference arithmetic and effectiveness classes.

use lbsim_common::{combine_ratios_db, db_to_lin};
use serde::{Deserialize, Serialize};

/// Degradation above which a single jammer counts as effective (dB).
pub const EFFECTIVE_DEGRADATION_DB: f64 = 1.0;

/// C/I at the victim receiver (dB).
///
/// `C = EIRP_sig − L_sig`, `I = EIRP_jam − L_jam`, and
/// `C/I = C − I + discrimination + polarization_isolation`.
pub fn carrier_to_interference_db(
    signal_eirp_dbw: f64,
    signal_path_loss_db: f64,
    jammer_eirp_dbw: f64,
    jammer_path_loss_db: f64,
    discrimination_db: f64,
    polarization_isolation_db: f64,
) -> f64 {
    let carrier = signal_eirp_dbw - signal_path_loss_db;
    let interference = jammer_eirp_dbw - jammer_path_loss_db;
    carrier - interference + discrimination_db + polarization_isolation_db
}

/// Combine several C/I values by summing interference in the linear domain.
///
/// NaN entries are ignored; an empty input yields `+inf` (no interference).
pub fn combine_ci_db<I>(ci_values_db: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let total: f64 = ci_values_db
        .into_iter()
        .filter(|ci| !ci.is_nan())
        .map(|ci| db_to_lin(-ci))
        .sum();
    if total <= 0.0 {
        f64::INFINITY
    } else {
        -10.0 * total.log10()
    }
}

/// CINR and degradation of one hop under interference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CinrResult {
    /// CINR (dB).
    pub cinr_db: f64,
    /// `C/N − CINR` (dB), never negative.
    pub degradation_db: f64,
    /// Degradation above [`EFFECTIVE_DEGRADATION_DB`].
    pub jamming_effective: bool,
}

/// Combine a thermal C/N with a C/I.
pub fn cinr_with_jamming(cn_db: f64, ci_db: f64) -> CinrResult {
    if cn_db.is_nan() || ci_db.is_nan() {
        return CinrResult {
            cinr_db: f64::NAN,
            degradation_db: f64::NAN,
            jamming_effective: false,
        };
    }
    if ci_db == f64::INFINITY || !cn_db.is_finite() {
        return CinrResult {
            cinr_db: cn_db,
            degradation_db: 0.0,
            jamming_effective: false,
        };
    }
    let cinr_db = combine_ratios_db(cn_db, ci_db).min(cn_db);
    let degradation_db = (cn_db - cinr_db).max(0.0);
    CinrResult {
        cinr_db,
        degradation_db,
        jamming_effective: degradation_db > EFFECTIVE_DEGRADATION_DB,
    }
}

// ============================================================================
// Per-jammer Effectiveness (J/S)
// ============================================================================

/// Effectiveness of one jammer from its J/S ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JsEffectiveness {
    /// No interference reaches the receiver.
    SinJamming,
    /// J/S below the light threshold.
    Inefectivo,
    /// J/S in [light, moderate).
    Leve,
    /// J/S in [moderate, effective).
    Moderado,
    /// J/S in [effective, critical).
    Efectivo,
    /// J/S at or above the critical threshold.
    Critico,
}

impl JsEffectiveness {
    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            JsEffectiveness::SinJamming => "SIN_JAMMING",
            JsEffectiveness::Inefectivo => "INEFECTIVO",
            JsEffectiveness::Leve => "LEVE",
            JsEffectiveness::Moderado => "MODERADO",
            JsEffectiveness::Efectivo => "EFECTIVO",
            JsEffectiveness::Critico => "CRITICO",
        }
    }

    /// Operator guidance for this class.
    pub fn recommendation(&self) -> &'static str {
        match self {
            JsEffectiveness::SinJamming | JsEffectiveness::Inefectivo => "No action required",
            JsEffectiveness::Leve => "Monitor the link; degradation is minor",
            JsEffectiveness::Moderado => "Increase link margin (EIRP or G/T) or select a more robust MODCOD",
            JsEffectiveness::Efectivo => "Switch to a robust MODCOD and raise EIRP; consider frequency change",
            JsEffectiveness::Critico => "Link denied: change frequency, relocate the terminal or null the jammer",
        }
    }
}

/// J/S thresholds (dB) for [`JsEffectiveness`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsThresholds {
    /// CRITICO at or above this J/S.
    pub critical_db: f64,
    /// EFECTIVO at or above this J/S.
    pub effective_db: f64,
    /// MODERADO at or above this J/S.
    pub moderate_db: f64,
    /// LEVE at or above this J/S.
    pub light_db: f64,
}

impl Default for JsThresholds {
    fn default() -> Self {
        Self {
            critical_db: 20.0,
            effective_db: 10.0,
            moderate_db: 3.0,
            light_db: 0.0,
        }
    }
}

impl JsThresholds {
    /// Classify from a C/I (J/S = −C/I).
    pub fn classify(&self, ci_db: f64) -> JsEffectiveness {
        if ci_db == f64::INFINITY || ci_db.is_nan() {
            return JsEffectiveness::SinJamming;
        }
        let js = -ci_db;
        if js >= self.critical_db {
            JsEffectiveness::Critico
        } else if js >= self.effective_db {
            JsEffectiveness::Efectivo
        } else if js >= self.moderate_db {
            JsEffectiveness::Moderado
        } else if js >= self.light_db {
            JsEffectiveness::Leve
        } else {
            JsEffectiveness::Inefectivo
        }
    }
}

// ============================================================================
// Global Effectiveness (combined degradation)
// ============================================================================

/// Effectiveness of all active jammers together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GlobalEffectiveness {
    /// Degradation below the limited threshold.
    Inefectivo,
    /// Degradation in [limited, moderate).
    Limitado,
    /// Degradation in [moderate, effective).
    Moderado,
    /// Degradation in [effective, critical).
    Efectivo,
    /// Degradation at or above the critical threshold.
    Critico,
}

impl GlobalEffectiveness {
    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            GlobalEffectiveness::Inefectivo => "INEFECTIVO",
            GlobalEffectiveness::Limitado => "LIMITADO",
            GlobalEffectiveness::Moderado => "MODERADO",
            GlobalEffectiveness::Efectivo => "EFECTIVO",
            GlobalEffectiveness::Critico => "CRITICO",
        }
    }

    /// Whether the jamming CINR caps the end-to-end CINR.
    pub fn caps_cinr(&self) -> bool {
        matches!(self, GlobalEffectiveness::Efectivo | GlobalEffectiveness::Critico)
    }
}

/// Degradation thresholds (dB) for [`GlobalEffectiveness`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalThresholds {
    /// CRITICO at or above this degradation.
    pub critical_db: f64,
    /// EFECTIVO at or above this degradation.
    pub effective_db: f64,
    /// MODERADO at or above this degradation.
    pub moderate_db: f64,
    /// LIMITADO at or above this degradation.
    pub limited_db: f64,
}

impl Default for GlobalThresholds {
    fn default() -> Self {
        Self {
            critical_db: 10.0,
            effective_db: 5.0,
            moderate_db: 2.0,
            limited_db: 0.5,
        }
    }
}

impl GlobalThresholds {
    /// Classify a combined degradation. NaN counts as no degradation.
    pub fn classify(&self, degradation_db: f64) -> GlobalEffectiveness {
        if degradation_db >= self.critical_db {
            GlobalEffectiveness::Critico
        } else if degradation_db >= self.effective_db {
            GlobalEffectiveness::Efectivo
        } else if degradation_db >= self.moderate_db {
            GlobalEffectiveness::Moderado
        } else if degradation_db >= self.limited_db {
            GlobalEffectiveness::Limitado
        } else {
            GlobalEffectiveness::Inefectivo
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_carrier_to_interference() {
        let ci = carrier_to_interference_db(48.0, 180.0, 30.0, 160.0, 10.0, -4.0);
        // C = −132, I = −130
        assert!((ci - (-2.0 + 10.0 - 4.0)).abs() < 1e-12);
    }

    #[test]
    fn test_cinr_no_interference() {
        let r = cinr_with_jamming(12.0, f64::INFINITY);
        assert_eq!(r.cinr_db, 12.0);
        assert_eq!(r.degradation_db, 0.0);
        assert!(!r.jamming_effective);
    }

    #[test]
    fn test_cinr_equal_noise_and_interference() {
        let r = cinr_with_jamming(10.0, 10.0);
        assert!((r.cinr_db - 6.9897).abs() < 1e-3);
        assert!((r.degradation_db - 3.0103).abs() < 1e-3);
        assert!(r.jamming_effective);
    }

    #[test]
    fn test_cinr_nan_propagates() {
        assert!(cinr_with_jamming(f64::NAN, 3.0).cinr_db.is_nan());
        assert!(cinr_with_jamming(10.0, f64::NAN).degradation_db.is_nan());
    }

    #[test]
    fn test_degradation_never_negative() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10_000 {
            let cn: f64 = rng.gen_range(-30.0..60.0);
            let ci: f64 = rng.gen_range(-60.0..120.0);
            let r = cinr_with_jamming(cn, ci);
            assert!(r.degradation_db >= 0.0, "cn={} ci={} deg={}", cn, ci, r.degradation_db);
            assert!(r.cinr_db <= cn);
        }
    }

    #[test]
    fn test_two_jammers_superlinear_but_subadditive() {
        let cn = 12.0;
        let ci = 14.0;
        let single = cinr_with_jamming(cn, ci);
        let combined_ci = combine_ci_db([ci, ci]);
        assert!(combined_ci < ci);
        assert!((combined_ci - (ci - 10.0 * 2f64.log10())).abs() < 1e-9);

        let both = cinr_with_jamming(cn, combined_ci);
        assert!(both.degradation_db > single.degradation_db);
        assert!(both.degradation_db < 2.0 * single.degradation_db);
    }

    #[test]
    fn test_combine_ci_empty() {
        assert_eq!(combine_ci_db(Vec::new()), f64::INFINITY);
        assert_eq!(combine_ci_db([f64::NAN]), f64::INFINITY);
    }

    #[test]
    fn test_js_classes() {
        let t = JsThresholds::default();
        assert_eq!(t.classify(-25.0), JsEffectiveness::Critico);
        assert_eq!(t.classify(-20.0), JsEffectiveness::Critico);
        assert_eq!(t.classify(-10.0), JsEffectiveness::Efectivo);
        assert_eq!(t.classify(-3.0), JsEffectiveness::Moderado);
        assert_eq!(t.classify(0.0), JsEffectiveness::Leve);
        assert_eq!(t.classify(5.0), JsEffectiveness::Inefectivo);
        assert_eq!(t.classify(f64::INFINITY), JsEffectiveness::SinJamming);
    }

    #[test]
    fn test_global_classes() {
        let t = GlobalThresholds::default();
        assert_eq!(t.classify(12.0), GlobalEffectiveness::Critico);
        assert_eq!(t.classify(5.0), GlobalEffectiveness::Efectivo);
        assert_eq!(t.classify(2.5), GlobalEffectiveness::Moderado);
        assert_eq!(t.classify(0.5), GlobalEffectiveness::Limitado);
        assert_eq!(t.classify(0.1), GlobalEffectiveness::Inefectivo);
        assert_eq!(t.classify(f64::NAN), GlobalEffectiveness::Inefectivo);
        assert!(GlobalEffectiveness::Efectivo.caps_cinr());
        assert!(!GlobalEffectiveness::Moderado.caps_cinr());
    }
}
