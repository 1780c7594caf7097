//! # lbsim-link
//!
//! Link budget computation for a single satellite link.
//!
//! This crate provides:
//! - Link primitives ([`fspl_db`], [`carrier_to_noise_density_dbhz`], [`carrier_to_noise_db`],
//!   [`propagation_delay_ms`]) and per-hop evaluation ([`compute_link_outputs`])
//! - Circular-orbit geometry ([`ground_geometry`], [`OrbitalState`])
//! - Doppler estimation ([`doppler_shift`])
//! - Transponder power and back-off ([`PowerSettings`])
//! - Noise temperature, Eb/N0, Shannon capacity and latency ([`NoiseTemperatures`],
//!   [`evaluate_performance`], [`LatencySettings`])
//! - Table-driven MODCOD selection with hysteresis ([`ModcodSelector`])
//! - Uplink/downlink combination ([`combine_end_to_end`])
//!
//! Physically undefined situations (satellite below the horizon, zero bandwidth,
//! zero distance) are encoded as NaN or ±∞ and propagate through every formula.
//! Nothing in this crate returns an error.

pub mod budget;
pub mod combiner;
pub mod doppler;
pub mod geometry;
pub mod modcod;
pub mod performance;
pub mod power;

pub use budget::{
    carrier_to_noise_db, carrier_to_noise_density_dbhz, classify_cn, compute_link_outputs,
    fspl_db, propagation_delay_ms, CnQuality, LinkInputs, LinkOutputs, LossBudget,
};
pub use combiner::{combine_end_to_end, E2EResult, E2EStatus, JammingContext};
pub use doppler::{doppler_shift, DopplerShift};
pub use geometry::{
    central_angle_for_elevation, fold_central_angle, ground_geometry, horizon_central_angle_deg,
    orbital_state, GroundGeometry, OrbitalState, GEO_ALTITUDE_M,
};
pub use modcod::{
    select_modcod, MarginStatus, ModcodEntry, ModcodMode, ModcodSelection, ModcodSelector,
};
pub use performance::{
    classify_eb_margin, evaluate_performance, latency_budget, noise_density_dbhz, EbMargin,
    LatencyBudget, LatencySettings, NoiseTemperatures, Performance,
};
pub use power::{PowerSettings, PowerState, AM_AM_COMPRESSION_DB};
