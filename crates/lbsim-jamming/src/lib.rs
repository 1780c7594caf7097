//! # lbsim-jamming
//!
//! Ground-based jamming of a satellite link.
//!
//! This crate provides:
//! - Jammer configurations and id-keyed jammer sets ([`JammerConfig`], [`JammerSet`])
//! - Angular discrimination models ([`FccMask`], [`dynamic_discrimination`])
//! - Spectral overlap and target detection ([`detect_targets`])
//! - C/I, CINR and multi-jammer combination ([`cinr_with_jamming`], [`combine_ci_db`])
//! - Per-tick evaluation of a jammer set ([`evaluate_jammers`])
//! - Physical plausibility checks ([`validate_scenario`])
//! - Spot-jamming MODCOD ladder and RTT estimate ([`spot_modcod`], [`realistic_rtt`])

pub mod adaptive;
pub mod config;
pub mod discrimination;
pub mod engine;
pub mod geometry;
pub mod interference;
pub mod spectral;
pub mod validation;

pub use adaptive::{
    realistic_rtt, spot_modcod, RttAccuracy, RttEstimate, SpotModcod, SpotModcodSelection,
    SPOT_LADDER,
};
pub use config::{AntennaType, JammerConfig, JammerError, JammerSet, JammerType, TargetPreference};
pub use discrimination::{
    dynamic_discrimination, DiscriminationModel, DynamicDiscrimination, FccMask, SeparationClass,
};
pub use engine::{
    evaluate_jammers, CombinedJammingMetrics, JammingEvaluation, JammingPolicy, JammingResult,
    JammingScene, LinkJamming,
};
pub use geometry::JammerGeometry;
pub use interference::{
    carrier_to_interference_db, cinr_with_jamming, combine_ci_db, CinrResult,
    GlobalEffectiveness, GlobalThresholds, JsEffectiveness, JsThresholds,
};
pub use spectral::{
    detect_targets, spectral_overlap_fraction, OverlapLevel, SpectralTarget, TargetDetection,
};
pub use validation::{
    analyze_coherence_balance, validate_jamming_realism, validate_link_coherence,
    validate_margin_feasibility, validate_scenario, CoherenceAnalysis, CoherenceLevel,
    JammerObservation, Severity, ValidationFlag, ValidationInputs, ValidationReport, Verdict,
};
