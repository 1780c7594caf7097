//! Physical plausibility checks over a computed snapshot.
//!
//! Findings are advisory: they annotate the snapshot and never alter any
//! computed value.

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Jammer range at which far-range checks apply (km).
pub const FAR_RANGE_KM: f64 = 45_000.0;

// ============================================================================
// Severity and Flags
// ============================================================================

/// Severity of a finding. Ordered so that `max` escalates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Normal,
    Advertencia,
    Critico,
}

impl Severity {
    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Normal => "NORMAL",
            Severity::Advertencia => "ADVERTENCIA",
            Severity::Critico => "CRITICO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall verdict derived from the maximum severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    #[default]
    Plausible,
    Dudoso,
    Inviable,
}

impl Verdict {
    /// Map a maximum severity to a verdict.
    pub fn from_severity(severity: Severity) -> Self {
        match severity {
            Severity::Normal => Verdict::Plausible,
            Severity::Advertencia => Verdict::Dudoso,
            Severity::Critico => Verdict::Inviable,
        }
    }

    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Plausible => "PLAUSIBLE",
            Verdict::Dudoso => "DUDOSO",
            Verdict::Inviable => "INVIABLE",
        }
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationFlag {
    /// Stable machine-readable code.
    pub code: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Human-readable detail.
    pub message: String,
}

impl ValidationFlag {
    fn new(code: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
        }
    }
}

/// Highest severity among `flags`.
pub fn max_severity(flags: &[ValidationFlag]) -> Severity {
    flags
        .iter()
        .map(|flag| flag.severity)
        .max()
        .unwrap_or_default()
}

fn any_nan(values: &[f64]) -> bool {
    values.iter().any(|v| v.is_nan())
}

// ============================================================================
// Individual Checks
// ============================================================================

/// End-to-end CINR must not beat the worse hop, and should sit near it.
pub fn validate_link_coherence(ul_cinr_db: f64, dl_cinr_db: f64, e2e_cinr_db: f64) -> Vec<ValidationFlag> {
    let mut flags = Vec::new();
    if any_nan(&[ul_cinr_db, dl_cinr_db, e2e_cinr_db]) {
        return flags;
    }
    let worst = ul_cinr_db.min(dl_cinr_db);
    if e2e_cinr_db > worst + 0.5 {
        flags.push(ValidationFlag::new(
            "E2E_MEJOR_QUE_INDIVIDUAL",
            Severity::Critico,
            format!("E2E CINR {:.2} dB exceeds worst hop {:.2} dB", e2e_cinr_db, worst),
        ));
    }
    let expected = worst - 1.0;
    if (e2e_cinr_db - expected).abs() > 3.0 {
        flags.push(ValidationFlag::new(
            "E2E_DESVIACION_EXCESIVA",
            Severity::Advertencia,
            format!("E2E CINR {:.2} dB deviates from expected {:.2} dB", e2e_cinr_db, expected),
        ));
    }
    flags
}

/// Eb/N0 margin must be achievable from the available CINR.
pub fn validate_margin_feasibility(cinr_db: f64, ebn0_margin_db: f64, ebn0_req_db: f64) -> Vec<ValidationFlag> {
    let mut flags = Vec::new();
    if any_nan(&[cinr_db, ebn0_margin_db, ebn0_req_db]) {
        return flags;
    }
    if ebn0_margin_db > cinr_db + 5.0 {
        flags.push(ValidationFlag::new(
            "MARGEN_IMPOSIBLE",
            Severity::Critico,
            format!("Eb/N0 margin {:.2} dB above CINR {:.2} dB + 5", ebn0_margin_db, cinr_db),
        ));
    }
    if cinr_db < -10.0 {
        flags.push(ValidationFlag::new(
            "ENLACE_DESTRUIDO",
            Severity::Critico,
            format!("CINR {:.2} dB below -10 dB", cinr_db),
        ));
    } else if cinr_db < 0.0 {
        flags.push(ValidationFlag::new(
            "CINR_NEGATIVO",
            Severity::Advertencia,
            format!("CINR {:.2} dB is negative", cinr_db),
        ));
    }
    if ebn0_margin_db < -20.0 {
        flags.push(ValidationFlag::new(
            "MARGEN_EXTREMO",
            Severity::Advertencia,
            format!("Eb/N0 margin {:.2} dB below -20 dB", ebn0_margin_db),
        ));
    }
    flags
}

/// Degradation claimed by one jammer must be consistent with its geometry.
pub fn validate_jamming_realism(
    ci_db: f64,
    degradation_db: f64,
    jammer_distance_km: f64,
    satellite_distance_km: f64,
) -> Vec<ValidationFlag> {
    let mut flags = Vec::new();
    if any_nan(&[ci_db, degradation_db]) {
        return flags;
    }
    if degradation_db > 25.0 {
        flags.push(ValidationFlag::new(
            "DEGRADACION_EXCESIVA",
            Severity::Advertencia,
            format!("degradation {:.2} dB above 25 dB", degradation_db),
        ));
    }
    if ci_db < -30.0 {
        flags.push(ValidationFlag::new(
            "CI_EXTREMO",
            Severity::Critico,
            format!("C/I {:.2} dB below -30 dB", ci_db),
        ));
    }

    let distances_known = jammer_distance_km > 0.0 && satellite_distance_km > 0.0;
    if !distances_known {
        return flags;
    }

    let distance_advantage_db = 20.0 * (satellite_distance_km / jammer_distance_km).log10();
    if degradation_db > distance_advantage_db + 20.0 {
        flags.push(ValidationFlag::new(
            "DEGRADACION_INCOHERENTE_DISTANCIA",
            Severity::Advertencia,
            format!(
                "degradation {:.2} dB exceeds distance advantage {:.2} dB + 20",
                degradation_db, distance_advantage_db
            ),
        ));
    }

    if jammer_distance_km >= FAR_RANGE_KM {
        let disadvantage_db = -distance_advantage_db;
        if degradation_db > 10.0 && disadvantage_db > 30.0 {
            flags.push(ValidationFlag::new(
                "SUPER_GEO_IRREALISTA",
                Severity::Critico,
                format!(
                    "far-range jammer claims {:.2} dB with {:.2} dB distance disadvantage",
                    degradation_db, disadvantage_db
                ),
            ));
        } else if degradation_db > 5.0 && disadvantage_db > 35.0 {
            flags.push(ValidationFlag::new(
                "SUPER_GEO_ALTAMENTE_IMPROBABLE",
                Severity::Advertencia,
                format!(
                    "far-range jammer claims {:.2} dB with {:.2} dB distance disadvantage",
                    degradation_db, disadvantage_db
                ),
            ));
        }
        let required_advantage_db = disadvantage_db + degradation_db;
        if required_advantage_db > 60.0 {
            flags.push(ValidationFlag::new(
                "SUPER_GEO_EIRP_IMPOSIBLE",
                Severity::Critico,
                format!("required EIRP advantage {:.2} dB above 60 dB", required_advantage_db),
            ));
        }
    }

    if jammer_distance_km > satellite_distance_km * 10.0 && degradation_db > 15.0 {
        let factor = jammer_distance_km / satellite_distance_km;
        flags.push(ValidationFlag::new(
            format!("JAMMER_EXTREMADAMENTE_DISTANTE_{}X", factor.round() as u64),
            Severity::Advertencia,
            format!("jammer {:.0}x farther than the satellite claims {:.2} dB", factor, degradation_db),
        ));
    }
    flags
}

// ============================================================================
// Power Balance Analysis
// ============================================================================

/// Coherence of a jammer's claimed effect with its power/distance balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoherenceLevel {
    #[default]
    Coherente,
    Dudoso,
    Incoherente,
}

impl CoherenceLevel {
    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            CoherenceLevel::Coherente => "COHERENTE",
            CoherenceLevel::Dudoso => "DUDOSO",
            CoherenceLevel::Incoherente => "INCOHERENTE",
        }
    }

    /// Severity reported for this level.
    pub fn severity(&self) -> Severity {
        match self {
            CoherenceLevel::Coherente => Severity::Normal,
            CoherenceLevel::Dudoso => Severity::Advertencia,
            CoherenceLevel::Incoherente => Severity::Critico,
        }
    }
}

/// Power/distance balance figures, rounded to 0.1 dB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicsMetrics {
    pub distance_factor: f64,
    pub distance_disadvantage_db: f64,
    pub eirp_advantage_db: f64,
    pub net_advantage_db: f64,
    pub expected_max_degradation_db: f64,
    /// Only at far range.
    pub required_eirp_dbw: Option<f64>,
    /// `None` without interference.
    pub js_ratio_db: Option<f64>,
}

/// Result of [`analyze_coherence_balance`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoherenceAnalysis {
    pub level: CoherenceLevel,
    pub flags: Vec<String>,
    pub recommendations: Vec<String>,
    pub metrics: PhysicsMetrics,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compare the degradation a jammer claims against what its EIRP advantage
/// and distance disadvantage allow.
///
/// `net_advantage = (EIRP_jam − EIRP_sat) − 20·log10(d_jam / d_sat)`; a claimed
/// degradation more than 15 dB beyond `max(0, net_advantage)` is incoherent,
/// more than 10 dB is doubtful.
pub fn analyze_coherence_balance(
    jammer_distance_km: f64,
    satellite_distance_km: f64,
    jammer_eirp_dbw: f64,
    satellite_eirp_dbw: f64,
    degradation_db: f64,
    ci_db: f64,
) -> CoherenceAnalysis {
    let distance_factor = jammer_distance_km / satellite_distance_km;
    let distance_disadvantage_db = 20.0 * distance_factor.log10();
    let eirp_advantage_db = jammer_eirp_dbw - satellite_eirp_dbw;
    let net_advantage_db = eirp_advantage_db - distance_disadvantage_db;
    let expected_max_degradation_db = net_advantage_db.max(0.0);
    let far_range = jammer_distance_km >= FAR_RANGE_KM;

    let mut level = CoherenceLevel::Coherente;
    let mut flags = Vec::new();
    let mut escalate = |flag: &str, to: CoherenceLevel, level: &mut CoherenceLevel| {
        flags.push(flag.to_string());
        *level = (*level).max(to);
    };

    if degradation_db > expected_max_degradation_db + 15.0 {
        escalate("DEGRADACION_EXCEDE_BALANCE_FISICO", CoherenceLevel::Incoherente, &mut level);
    } else if degradation_db > expected_max_degradation_db + 10.0 {
        escalate("DEGRADACION_ALTAMENTE_OPTIMISTA", CoherenceLevel::Dudoso, &mut level);
    }

    let required_eirp_dbw = far_range.then(|| satellite_eirp_dbw + distance_disadvantage_db + degradation_db);
    if let Some(required) = required_eirp_dbw {
        if required > 85.0 {
            escalate("EIRP_REQUERIDO_EXTREMO", CoherenceLevel::Incoherente, &mut level);
        } else if required > 75.0 {
            escalate("EIRP_REQUERIDO_MUY_ALTO", CoherenceLevel::Dudoso, &mut level);
        }
    }

    let js_ratio_db = (!ci_db.is_infinite() && !ci_db.is_nan()).then_some(-ci_db);
    if let (Some(js), true) = (js_ratio_db, far_range) {
        if js > 25.0 {
            escalate("JS_RATIO_IRREALISTA_SUPER_GEO", CoherenceLevel::Incoherente, &mut level);
        } else if js > 20.0 {
            escalate("JS_RATIO_OPTIMISTA_SUPER_GEO", CoherenceLevel::Dudoso, &mut level);
        }
    }

    let mut recommendations = Vec::new();
    if let (Some(required), true) = (required_eirp_dbw, flags.iter().any(|f| f == "EIRP_REQUERIDO_EXTREMO")) {
        recommendations.push(format!(
            "Reduce jammer range or expected degradation; required EIRP {:.1} dBW",
            required
        ));
    }
    if distance_factor > 50.0 {
        recommendations.push(format!(
            "Consider a closer jammer; distance factor {:.0}x",
            distance_factor
        ));
    }
    if degradation_db > 10.0 && far_range {
        recommendations.push("Far-range degradation above 10 dB needs unrealistic power".to_string());
    }

    CoherenceAnalysis {
        level,
        flags,
        recommendations,
        metrics: PhysicsMetrics {
            distance_factor: round1(distance_factor),
            distance_disadvantage_db: round1(distance_disadvantage_db),
            eirp_advantage_db: round1(eirp_advantage_db),
            net_advantage_db: round1(net_advantage_db),
            expected_max_degradation_db: round1(expected_max_degradation_db),
            required_eirp_dbw: required_eirp_dbw.map(round1),
            js_ratio_db: js_ratio_db.map(round1),
        },
    }
}

// ============================================================================
// Scenario Report
// ============================================================================

/// Per-jammer quantities fed to the validator.
#[derive(Debug, Clone, PartialEq)]
pub struct JammerObservation {
    pub jammer_id: String,
    pub ci_db: f64,
    pub degradation_db: f64,
    /// Distance from the jammer to the endpoint it attacks (km).
    pub jammer_distance_km: f64,
    /// Satellite slant range (km).
    pub satellite_distance_km: f64,
    pub jammer_eirp_dbw: f64,
    /// EIRP of the attacked carrier (dBW).
    pub satellite_eirp_dbw: f64,
}

/// Snapshot quantities fed to the validator.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationInputs {
    /// Uplink CINR after jamming (dB).
    pub ul_cinr_db: f64,
    /// Downlink CINR after jamming (dB).
    pub dl_cinr_db: f64,
    /// Reported end-to-end CINR (dB).
    pub e2e_cinr_db: f64,
    /// CINR of the active link (dB).
    pub cinr_db: f64,
    pub ebn0_margin_db: f64,
    pub ebn0_req_db: f64,
    pub jammers: Vec<JammerObservation>,
}

/// Balance analysis of one jammer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JammerCoherence {
    pub jammer_id: String,
    pub analysis: CoherenceAnalysis,
}

/// Full validator output attached to a snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValidationReport {
    pub verdict: Verdict,
    pub max_severity: Severity,
    pub flags: Vec<ValidationFlag>,
    pub coherence: Vec<JammerCoherence>,
}

impl ValidationReport {
    /// No findings at all.
    pub fn passed(&self) -> bool {
        self.flags.is_empty()
    }

    /// Number of findings.
    pub fn problem_count(&self) -> usize {
        self.flags.len()
    }

    /// Codes of all findings joined by `;`.
    pub fn flag_codes(&self) -> String {
        self.flags
            .iter()
            .map(|flag| flag.code.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Run every check over a snapshot.
pub fn validate_scenario(inputs: &ValidationInputs) -> ValidationReport {
    let mut flags = validate_link_coherence(inputs.ul_cinr_db, inputs.dl_cinr_db, inputs.e2e_cinr_db);
    flags.extend(validate_margin_feasibility(
        inputs.cinr_db,
        inputs.ebn0_margin_db,
        inputs.ebn0_req_db,
    ));

    let mut coherence = Vec::with_capacity(inputs.jammers.len());
    for jammer in &inputs.jammers {
        flags.extend(
            validate_jamming_realism(
                jammer.ci_db,
                jammer.degradation_db,
                jammer.jammer_distance_km,
                jammer.satellite_distance_km,
            )
            .into_iter()
            .map(|mut flag| {
                flag.message = format!("{}: {}", jammer.jammer_id, flag.message);
                flag
            }),
        );

        let analysis = analyze_coherence_balance(
            jammer.jammer_distance_km,
            jammer.satellite_distance_km,
            jammer.jammer_eirp_dbw,
            jammer.satellite_eirp_dbw,
            jammer.degradation_db,
            jammer.ci_db,
        );
        let severity = analysis.level.severity();
        if severity > Severity::Normal {
            flags.push(ValidationFlag::new(
                format!("BALANCE_{}", analysis.level.label()),
                severity,
                format!("{}: {}", jammer.jammer_id, analysis.flags.join(", ")),
            ));
        }
        coherence.push(JammerCoherence {
            jammer_id: jammer.jammer_id.clone(),
            analysis,
        });
    }

    let max_severity = max_severity(&flags);
    let verdict = Verdict::from_severity(max_severity);
    for flag in &flags {
        debug!("Validation {} [{}]: {}", flag.code, flag.severity, flag.message);
    }
    if max_severity >= Severity::Advertencia {
        warn!(
            "Scenario judged {} ({} findings): {}",
            verdict.label(),
            flags.len(),
            flags.iter().map(|f| f.code.as_str()).collect::<Vec<_>>().join(", ")
        );
    }

    ValidationReport {
        verdict,
        max_severity,
        flags,
        coherence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(flags: &[ValidationFlag]) -> Vec<&str> {
        flags.iter().map(|f| f.code.as_str()).collect()
    }

    #[test]
    fn test_link_coherence_e2e_better_than_worst() {
        let flags = validate_link_coherence(10.0, 12.0, 11.0);
        assert_eq!(codes(&flags), vec!["E2E_MEJOR_QUE_INDIVIDUAL"]);
        assert_eq!(max_severity(&flags), Severity::Critico);
    }

    #[test]
    fn test_link_coherence_consistent_combination() {
        let flags = validate_link_coherence(10.0, 12.0, 7.88);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_link_coherence_deviation() {
        let flags = validate_link_coherence(10.0, 12.0, 4.0);
        assert_eq!(codes(&flags), vec!["E2E_DESVIACION_EXCESIVA"]);
        assert_eq!(max_severity(&flags), Severity::Advertencia);
    }

    #[test]
    fn test_link_coherence_nan_skipped() {
        assert!(validate_link_coherence(f64::NAN, 12.0, 4.0).is_empty());
    }

    #[test]
    fn test_margin_feasibility() {
        let flags = validate_margin_feasibility(-12.0, -25.0, 4.0);
        assert_eq!(codes(&flags), vec!["ENLACE_DESTRUIDO", "MARGEN_EXTREMO"]);
        assert_eq!(max_severity(&flags), Severity::Critico);

        let flags = validate_margin_feasibility(-2.0, 1.0, 4.0);
        assert_eq!(codes(&flags), vec!["CINR_NEGATIVO"]);

        let flags = validate_margin_feasibility(5.0, 12.0, 4.0);
        assert_eq!(codes(&flags), vec!["MARGEN_IMPOSIBLE"]);
    }

    #[test]
    fn test_jamming_realism_severity_escalates() {
        // Severity never drops once a critical finding exists.
        let flags = validate_jamming_realism(-35.0, 26.0, 60_000.0, 1_000.0);
        let found = codes(&flags);
        assert!(found.contains(&"CI_EXTREMO"));
        assert!(found.contains(&"DEGRADACION_EXCESIVA"));
        assert!(found.contains(&"SUPER_GEO_IRREALISTA"));
        assert!(found.contains(&"JAMMER_EXTREMADAMENTE_DISTANTE_60X"));
        assert_eq!(max_severity(&flags), Severity::Critico);
    }

    #[test]
    fn test_distance_factor_rounds_to_nearest() {
        let flags = validate_jamming_realism(-5.0, 16.0, 9_090.0, 100.0);
        let found = codes(&flags);
        assert!(found.contains(&"JAMMER_EXTREMADAMENTE_DISTANTE_91X"), "{:?}", found);
    }

    #[test]
    fn test_jamming_realism_nearby_jammer_clean() {
        let flags = validate_jamming_realism(5.0, 1.5, 50.0, 750.0);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_jamming_realism_distance_incoherence() {
        // Jammer as far as the satellite, no distance advantage.
        let flags = validate_jamming_realism(-10.0, 21.0, 750.0, 750.0);
        assert_eq!(codes(&flags), vec!["DEGRADACION_INCOHERENTE_DISTANCIA"]);
    }

    #[test]
    fn test_coherence_balance_far_jammer() {
        let analysis = analyze_coherence_balance(50_000.0, 550.0, 40.0, 45.0, 20.0, -22.0);
        assert_eq!(analysis.level, CoherenceLevel::Incoherente);
        assert!(analysis.flags.contains(&"DEGRADACION_EXCEDE_BALANCE_FISICO".to_string()));
        assert!(analysis.flags.contains(&"EIRP_REQUERIDO_EXTREMO".to_string()));
        assert!(analysis.flags.contains(&"JS_RATIO_OPTIMISTA_SUPER_GEO".to_string()));
        assert_eq!(analysis.metrics.distance_factor, 90.9);
        assert_eq!(analysis.metrics.net_advantage_db, -44.2);
        assert_eq!(analysis.metrics.expected_max_degradation_db, 0.0);
        assert!(analysis.metrics.required_eirp_dbw.is_some());
        assert_eq!(analysis.recommendations.len(), 3);
    }

    #[test]
    fn test_coherence_balance_close_jammer() {
        let analysis = analyze_coherence_balance(50.0, 750.0, 30.0, 45.0, 3.0, 2.0);
        assert_eq!(analysis.level, CoherenceLevel::Coherente);
        assert!(analysis.flags.is_empty());
        assert!(analysis.metrics.required_eirp_dbw.is_none());
        assert_eq!(analysis.metrics.js_ratio_db, Some(-2.0));
    }

    #[test]
    fn test_coherence_balance_no_interference() {
        let analysis = analyze_coherence_balance(50.0, 750.0, 30.0, 45.0, 0.0, f64::INFINITY);
        assert_eq!(analysis.metrics.js_ratio_db, None);
    }

    #[test]
    fn test_validate_scenario_verdicts() {
        let clean = ValidationInputs {
            ul_cinr_db: 10.0,
            dl_cinr_db: 12.0,
            e2e_cinr_db: 7.9,
            cinr_db: 12.0,
            ebn0_margin_db: 4.0,
            ebn0_req_db: 4.03,
            jammers: Vec::new(),
        };
        let report = validate_scenario(&clean);
        assert_eq!(report.verdict, Verdict::Plausible);
        assert!(report.passed());

        let mut far = clean.clone();
        far.jammers.push(JammerObservation {
            jammer_id: "far".to_string(),
            ci_db: -22.0,
            degradation_db: 20.0,
            jammer_distance_km: 50_000.0,
            satellite_distance_km: 550.0,
            jammer_eirp_dbw: 40.0,
            satellite_eirp_dbw: 45.0,
        });
        let report = validate_scenario(&far);
        assert_eq!(report.verdict, Verdict::Inviable);
        assert!(report.flag_codes().contains("BALANCE_INCOHERENTE"));
        assert_eq!(report.coherence.len(), 1);
        assert!(report.flags.iter().all(|f| f.code.starts_with("BALANCE") || f.message.starts_with("far:")));
    }
}
