//! # lbsim-runner library
//!
//! Library interface for the link budget simulation runner.
//!
//! This crate provides:
//! - [`SimulationState`], the tick driver holding orbit, Earth rotation and
//!   MODCOD memory across ticks
//! - [`MetricsSnapshot`], the per-tick record consumed by exporters
//! - [`history`] and [`export`] for turning snapshots into CSV/JSON rows
//!
//! ## Tick Pipeline
//!
//! Each call to [`SimulationState::evaluate`] runs geometry, per-hop link
//! budgets, the jamming engine, the end-to-end combiner, MODCOD selection and
//! the performance block in that order. Nothing in the pipeline fails: a
//! satellite below the horizon shows up as NaN metrics.

pub mod export;
pub mod history;

use lbsim_common::{ActiveLink, LinkSense, OrbitMode, EARTH_ROTATION_DEG_PER_S};
pub use lbsim_common::SimTime;
use lbsim_jamming::{
    evaluate_jammers, realistic_rtt, spot_modcod, validate_scenario, JammerConfig,
    JammerObservation, JammingEvaluation, JammingScene, RttEstimate, SpotModcodSelection,
    ValidationInputs, ValidationReport,
};
use lbsim_link::geometry::angular_velocity_deg_s;
use lbsim_link::{
    classify_cn, classify_eb_margin, combine_end_to_end, compute_link_outputs, doppler_shift,
    evaluate_performance, fold_central_angle, ground_geometry, horizon_central_angle_deg,
    latency_budget, noise_density_dbhz, orbital_state, CnQuality, DopplerShift, E2EResult,
    EbMargin, GroundGeometry, LatencyBudget, LinkInputs, LinkOutputs, LossBudget, MarginStatus,
    ModcodMode, ModcodSelection, ModcodSelector, NoiseTemperatures, OrbitalState, Performance,
    PowerState,
};
use lbsim_model::PresetSource;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while loading or running a simulation.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Model error.
    #[error("Model error: {0}")]
    Model(#[from] lbsim_model::ModelError),

    /// Jammer set error.
    #[error("Jammer error: {0}")]
    Jammer(#[from] lbsim_jamming::JammerError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// ============================================================================
// Metrics Snapshot
// ============================================================================

/// One hop evaluated against the current geometry and jammers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkSnapshot {
    pub sense: LinkSense,
    pub inputs: LinkInputs,
    pub outputs: LinkOutputs,
    /// CINR after jamming (dB); equals C/N without jammers on this hop.
    pub cinr_db: f64,
    /// `C/N − CINR` (dB).
    pub degradation_db: f64,
    pub quality: CnQuality,
}

/// The active link evaluated with the transponder's effective EIRP, the
/// mode's baseline G/T and the full loss budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrimaryLink {
    /// Hop whose carrier is used.
    pub sense: LinkSense,
    pub inputs: LinkInputs,
    pub outputs: LinkOutputs,
    /// `FSPL + Σ losses` (dB).
    pub path_loss_total_db: f64,
    /// CINR driving MODCOD and the validator (dB).
    pub cinr_db: f64,
    /// Jamming degradation applied to the performance block (dB).
    pub degradation_db: f64,
    pub quality: CnQuality,
}

/// Noise temperature components and the derived system figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoiseSnapshot {
    pub temperatures: NoiseTemperatures,
    pub system_temperature_k: f64,
    /// Noise power density (dBW/Hz).
    pub noise_density_dbw_hz: f64,
}

/// Adaptive MODCOD state for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModcodSnapshot {
    /// Whether selection is automatic.
    pub auto: bool,
    /// Decision value fed to the selector (dB).
    pub decision_value_db: f64,
    /// `None` when the MODCOD table is empty.
    pub selection: Option<ModcodSelection>,
    pub status: MarginStatus,
    /// Switches since the last reset.
    pub switches: u64,
}

/// Everything computed for one tick.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub time_s: f64,
    pub mode: OrbitMode,
    pub active_link: ActiveLink,
    pub preset_source: PresetSource,
    pub orbit_angle_deg: f64,
    pub earth_rotation_deg: f64,
    pub geo_offset_deg: f64,
    pub geometry: GroundGeometry,
    pub orbital: OrbitalState,
    pub doppler: DopplerShift,
    /// Elevation at or above the coverage threshold.
    pub above_min_elevation: bool,
    pub uplink: LinkSnapshot,
    pub downlink: LinkSnapshot,
    pub end_to_end: E2EResult,
    pub primary: PrimaryLink,
    pub power: PowerState,
    pub losses: LossBudget,
    pub noise: NoiseSnapshot,
    pub performance: Performance,
    pub eb_margin: EbMargin,
    pub latency: LatencyBudget,
    pub modcod: ModcodSnapshot,
    pub jamming: JammingEvaluation,
    pub spot_modcod: SpotModcodSelection,
    pub rtt: RttEstimate,
    pub validation: ValidationReport,
}

impl MetricsSnapshot {
    /// Snapshot of one hop.
    pub fn link(&self, sense: LinkSense) -> &LinkSnapshot {
        match sense {
            LinkSense::Uplink => &self.uplink,
            LinkSense::Downlink => &self.downlink,
        }
    }

    /// Whether the satellite is above the horizon.
    pub fn visible(&self) -> bool {
        self.geometry.visible
    }
}

/// Minimum of two dB figures, NaN if either is NaN.
fn worse_db(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

// ============================================================================
// Simulation State
// ============================================================================

/// Cross-tick state of one simulated link.
///
/// The satellite position is tracked as an orbit angle (LEO) or a fixed
/// longitude offset (GEO); the ground station rotates with the Earth. The
/// central angle before the last move is kept to sign the range rate.
#[derive(Debug, Clone)]
pub struct SimulationState {
    scenario: Scenario,
    mode: OrbitMode,
    active_link: ActiveLink,
    preset_source: PresetSource,
    uplink: LinkInputs,
    downlink: LinkInputs,
    orbit_angle_deg: f64,
    earth_rotation_deg: f64,
    geo_offset_deg: f64,
    time: SimTime,
    previous_central_angle_deg: Option<f64>,
    modcod: ModcodSelector,
}

impl SimulationState {
    /// Create a state in the scenario's initial mode, positioned at t = 0.
    pub fn new(scenario: Scenario) -> Self {
        let mode = scenario.orbit_mode();
        let resolution = scenario.link_presets(mode);
        let mut state = Self {
            mode,
            active_link: scenario.active_link(),
            preset_source: resolution.source,
            uplink: resolution.presets.ul.to_inputs(),
            downlink: resolution.presets.dl.to_inputs(),
            orbit_angle_deg: 0.0,
            earth_rotation_deg: 0.0,
            geo_offset_deg: scenario.geo_longitude_offset_deg(),
            time: SimTime::ZERO,
            previous_central_angle_deg: None,
            modcod: ModcodSelector::new(scenario.modcod_hysteresis_db()),
            scenario,
        };
        state.reset();
        state
    }

    /// Return to t = 0 with the LEO satellite rising at the horizon.
    ///
    /// The GEO longitude offset and link inputs are operator settings and
    /// survive a reset.
    pub fn reset(&mut self) {
        self.orbit_angle_deg = self.initial_orbit_angle_deg();
        self.earth_rotation_deg = 0.0;
        self.time = SimTime::ZERO;
        self.previous_central_angle_deg = None;
        self.modcod.reset();
        debug!(mode = %self.mode, orbit_angle = self.orbit_angle_deg, "Simulation reset");
    }

    /// Advance simulated time by `dt_s`, capped at the scenario's maximum time.
    ///
    /// Returns the number of seconds actually applied.
    pub fn advance(&mut self, dt_s: f64) -> f64 {
        if !(dt_s > 0.0) {
            return 0.0;
        }
        let limit = SimTime::from_secs(self.scenario.max_time_s());
        let next = self.time.advance_capped(SimTime::from_secs(dt_s), limit);
        if next <= self.time {
            return 0.0;
        }
        let applied = next.as_secs_f64() - self.time.as_secs_f64();

        self.previous_central_angle_deg = Some(self.central_angle_deg());
        self.time = next;
        self.earth_rotation_deg =
            (self.earth_rotation_deg + EARTH_ROTATION_DEG_PER_S * applied).rem_euclid(360.0);
        if self.mode == OrbitMode::Leo {
            let omega = angular_velocity_deg_s(self.orbital_radius_m());
            self.orbit_angle_deg = (self.orbit_angle_deg + omega * applied).rem_euclid(360.0);
        }
        applied
    }

    /// Jump to `time_s`, recomputing positions from elapsed time.
    pub fn seek(&mut self, time_s: f64) {
        let max = self.scenario.max_time_s().max(0.0);
        let t = if time_s.is_nan() { 0.0 } else { time_s.clamp(0.0, max) };
        self.time = SimTime::from_secs(t);
        let t = self.time.as_secs_f64();

        self.previous_central_angle_deg = if t > 0.0 {
            let (orbit, earth) = self.positions_at((t - 1.0).max(0.0));
            Some(self.central_angle_from(orbit, earth))
        } else {
            None
        };
        let (orbit, earth) = self.positions_at(t);
        self.orbit_angle_deg = orbit;
        self.earth_rotation_deg = earth;
    }

    /// Switch between LEO and GEO. Presets for the new mode are reloaded and
    /// the simulation is reset.
    pub fn set_mode(&mut self, mode: OrbitMode) {
        self.mode = mode;
        let resolution = self.scenario.link_presets(mode);
        self.preset_source = resolution.source;
        self.uplink = resolution.presets.ul.to_inputs();
        self.downlink = resolution.presets.dl.to_inputs();
        self.reset();
        info!(mode = %mode, presets = resolution.source.label(), "Orbit mode changed");
    }

    /// Select which hop drives the primary link and MODCOD.
    pub fn set_active_link(&mut self, link: ActiveLink) {
        self.active_link = link;
    }

    /// Place the LEO satellite at `angle_deg` (mod 360).
    pub fn set_orbit_angle(&mut self, angle_deg: f64) {
        if !angle_deg.is_finite() {
            return;
        }
        self.previous_central_angle_deg = Some(self.central_angle_deg());
        self.orbit_angle_deg = angle_deg.rem_euclid(360.0);
    }

    /// Move the LEO satellite by `steps` manual orbit steps.
    pub fn step_orbit(&mut self, steps: i32) {
        let step = self.scenario.leo_step_deg();
        self.set_orbit_angle(self.orbit_angle_deg + f64::from(steps) * step);
    }

    /// Set the GEO longitude offset from the ground station.
    pub fn set_geo_offset(&mut self, offset_deg: f64) {
        if offset_deg.is_finite() {
            self.geo_offset_deg = offset_deg;
        }
    }

    /// Replace the inputs of one hop.
    pub fn set_link_inputs(&mut self, sense: LinkSense, inputs: LinkInputs) {
        match sense {
            LinkSense::Uplink => self.uplink = inputs,
            LinkSense::Downlink => self.downlink = inputs,
        }
    }

    /// Current inputs of one hop.
    pub fn link_inputs(&self, sense: LinkSense) -> &LinkInputs {
        match sense {
            LinkSense::Uplink => &self.uplink,
            LinkSense::Downlink => &self.downlink,
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Mutable scenario access.
    pub fn scenario_mut(&mut self) -> &mut Scenario {
        &mut self.scenario
    }

    /// Add a jammer, or replace the one with the same id. Takes effect next tick.
    pub fn upsert_jammer(&mut self, jammer: JammerConfig) {
        debug!(id = %jammer.id, active = jammer.active, "Jammer updated");
        self.scenario.jammers_mut().upsert(jammer);
    }

    /// Remove a jammer by id.
    pub fn remove_jammer(&mut self, id: &str) -> Result<JammerConfig, RunnerError> {
        let removed = self.scenario.jammers_mut().remove(id)?;
        debug!(id, "Jammer removed");
        Ok(removed)
    }

    pub fn mode(&self) -> OrbitMode {
        self.mode
    }

    pub fn active_link(&self) -> ActiveLink {
        self.active_link
    }

    pub fn preset_source(&self) -> PresetSource {
        self.preset_source
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn orbit_angle_deg(&self) -> f64 {
        self.orbit_angle_deg
    }

    pub fn earth_rotation_deg(&self) -> f64 {
        self.earth_rotation_deg
    }

    pub fn geo_offset_deg(&self) -> f64 {
        self.geo_offset_deg
    }

    /// Whether simulated time has reached the scenario's maximum.
    pub fn is_finished(&self) -> bool {
        self.time >= SimTime::from_secs(self.scenario.max_time_s())
    }

    /// Orbital radius of the current mode (m).
    pub fn orbital_radius_m(&self) -> f64 {
        self.scenario.baseline(self.mode).orbital_radius_m()
    }

    /// Folded central angle between the ground station and the sub-satellite point.
    pub fn central_angle_deg(&self) -> f64 {
        self.central_angle_from(self.orbit_angle_deg, self.earth_rotation_deg)
    }

    fn central_angle_from(&self, orbit_angle_deg: f64, earth_rotation_deg: f64) -> f64 {
        match self.mode {
            OrbitMode::Leo => fold_central_angle(orbit_angle_deg - earth_rotation_deg),
            OrbitMode::Geo => fold_central_angle(self.geo_offset_deg),
        }
    }

    fn initial_orbit_angle_deg(&self) -> f64 {
        360.0 - horizon_central_angle_deg(self.orbital_radius_m())
    }

    /// Orbit and Earth rotation angles `t` seconds after a reset.
    fn positions_at(&self, t: f64) -> (f64, f64) {
        let earth = (EARTH_ROTATION_DEG_PER_S * t).rem_euclid(360.0);
        let orbit = match self.mode {
            OrbitMode::Leo => {
                let omega = angular_velocity_deg_s(self.orbital_radius_m());
                (self.initial_orbit_angle_deg() + omega * t).rem_euclid(360.0)
            }
            OrbitMode::Geo => self.orbit_angle_deg,
        };
        (orbit, earth)
    }

    // ------------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------------

    /// Run the full pipeline for the current position.
    ///
    /// Only the MODCOD selector memory is updated; positions are untouched.
    pub fn evaluate(&mut self) -> MetricsSnapshot {
        let radius_m = self.orbital_radius_m();
        let geometry = ground_geometry(self.central_angle_deg(), radius_m);
        let orbital = orbital_state(self.mode, &geometry, self.previous_central_angle_deg, radius_m);

        let ul_out = compute_link_outputs(&self.uplink, &geometry);
        let dl_out = compute_link_outputs(&self.downlink, &geometry);

        // Jamming
        let scene = JammingScene {
            uplink: self.uplink,
            downlink: self.downlink,
            uplink_cn_db: ul_out.cn_db,
            downlink_cn_db: dl_out.cn_db,
            slant_range_km: geometry.slant_range_km,
            elevation_deg: geometry.elevation_deg,
        };
        let jamming = evaluate_jammers(
            self.scenario.jammers().iter(),
            &scene,
            self.scenario.jamming_policy(),
        );
        let jamming_active = jamming.is_active();

        let link_snapshot = |sense: LinkSense, inputs: LinkInputs, outputs: LinkOutputs| {
            let jam = jamming.combined.link(sense);
            LinkSnapshot {
                sense,
                inputs,
                outputs,
                cinr_db: jam.cinr_db,
                degradation_db: jam.degradation_db,
                quality: classify_cn(outputs.cn_db),
            }
        };
        let uplink = link_snapshot(LinkSense::Uplink, self.uplink, ul_out);
        let downlink = link_snapshot(LinkSense::Downlink, self.downlink, dl_out);

        let context = jamming.combined.to_context();
        let end_to_end = combine_end_to_end(
            ul_out.cn_db,
            dl_out.cn_db,
            jamming_active.then_some(&context),
        );

        // Primary link
        let power = self.scenario.power_settings(self.mode).evaluate();
        let losses = self.scenario.loss_budget();
        let baseline = self.scenario.baseline(self.mode);
        let carrier_sense = self.active_link.carrier_sense();
        let carrier = *self.link_inputs(carrier_sense);
        let primary_inputs = LinkInputs {
            eirp_dbw: power.eirp_dbw,
            gt_dbk: baseline.gt_dbk,
            extra_loss_db: losses.total_db(),
            ..carrier
        };
        let primary_out = compute_link_outputs(&primary_inputs, &geometry);

        let (cinr_db, degradation_db) = match self.active_link {
            ActiveLink::Uplink => (uplink.cinr_db, uplink.degradation_db),
            ActiveLink::Downlink => (downlink.cinr_db, downlink.degradation_db),
            ActiveLink::EndToEnd => (
                worse_db(uplink.cinr_db, downlink.cinr_db),
                jamming.combined.degradation_db,
            ),
        };
        let primary = PrimaryLink {
            sense: carrier_sense,
            inputs: primary_inputs,
            outputs: primary_out,
            path_loss_total_db: primary_out.fspl_db + losses.total_db(),
            cinr_db,
            degradation_db,
            quality: classify_cn(primary_out.cn_db),
        };

        // MODCOD
        let modcod_mode = self.scenario.modcod_mode();
        let selection = self.modcod.update(
            self.scenario.modcod_table(),
            &modcod_mode,
            cinr_db,
            primary_inputs.bandwidth_hz,
        );
        let throughput = self.scenario.throughput();
        let (bit_rate_bps, ebn0_req_db) = match &selection {
            Some(s) => (s.bit_rate_bps, s.ebn0_req_db),
            None => (throughput.bit_rate_bps, throughput.ebn0_req_db),
        };
        let modcod = ModcodSnapshot {
            auto: modcod_mode == ModcodMode::Auto,
            decision_value_db: cinr_db,
            status: MarginStatus::from_margin(
                selection.as_ref().map_or(f64::NAN, |s| s.decision_margin_db),
            ),
            selection,
            switches: self.modcod.switches(),
        };

        // Noise and performance
        let temperatures = self.scenario.noise();
        let system_temperature_k = temperatures.system_temperature_k();
        let noise = NoiseSnapshot {
            temperatures,
            system_temperature_k,
            noise_density_dbw_hz: noise_density_dbhz(system_temperature_k),
        };
        let jam_loss_db = if degradation_db.is_nan() { 0.0 } else { degradation_db };
        let performance = evaluate_performance(
            primary_out.cn0_dbhz - jam_loss_db,
            primary_out.cn_db - jam_loss_db,
            primary_inputs.bandwidth_hz,
            bit_rate_bps,
            ebn0_req_db,
        );
        let latency = latency_budget(primary_out.latency_ms, &self.scenario.latency());

        let doppler = doppler_shift(self.mode, &orbital, carrier.frequency_hz, geometry.visible);
        let spot = spot_modcod(cinr_db, jamming_active);
        let rtt = realistic_rtt(latency.propagation_ms, geometry.elevation_deg, jamming_active);

        let observations = jamming
            .results
            .iter()
            .map(|r| JammerObservation {
                jammer_id: r.jammer_id.clone(),
                ci_db: r.ci_db,
                degradation_db: r.degradation_individual_db,
                jammer_distance_km: r.jammer_distance_km,
                satellite_distance_km: geometry.slant_range_km,
                jammer_eirp_dbw: r.jammer_eirp_dbw,
                satellite_eirp_dbw: self.link_inputs(r.target_link).eirp_dbw,
            })
            .collect();
        let validation = validate_scenario(&ValidationInputs {
            ul_cinr_db: uplink.cinr_db,
            dl_cinr_db: downlink.cinr_db,
            e2e_cinr_db: end_to_end.cinr_total_db,
            cinr_db,
            ebn0_margin_db: performance.margin_db,
            ebn0_req_db,
            jammers: observations,
        });

        let min_elevation = self.scenario.min_elevation_deg();
        let snapshot = MetricsSnapshot {
            time_s: self.time.as_secs_f64(),
            mode: self.mode,
            active_link: self.active_link,
            preset_source: self.preset_source,
            orbit_angle_deg: self.orbit_angle_deg,
            earth_rotation_deg: self.earth_rotation_deg,
            geo_offset_deg: self.geo_offset_deg,
            above_min_elevation: geometry.visible && geometry.elevation_deg >= min_elevation,
            geometry,
            orbital,
            doppler,
            uplink,
            downlink,
            end_to_end,
            primary,
            power,
            losses,
            noise,
            eb_margin: classify_eb_margin(performance.margin_db),
            performance,
            latency,
            modcod,
            jamming,
            spot_modcod: spot,
            rtt,
            validation,
        };

        debug!(
            "t={} elev={:.2} C/N={:.2} CINR={:.2} MODCOD={}",
            self.time,
            snapshot.geometry.elevation_deg,
            snapshot.primary.outputs.cn_db,
            snapshot.primary.cinr_db,
            snapshot
                .modcod
                .selection
                .as_ref()
                .map_or("-", |s| s.name.as_str())
        );
        snapshot
    }
}

// ============================================================================
// Run Loop
// ============================================================================

/// Summary of a completed run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Snapshots produced.
    pub ticks: u64,
    /// Snapshots with the satellite above the horizon.
    pub visible_ticks: u64,
    /// Snapshots with at least one jammer producing a result.
    pub jammed_ticks: u64,
    /// MODCOD switches during the run.
    pub modcod_switches: u64,
    /// Lowest primary CINR seen (dB); NaN if never visible.
    pub min_cinr_db: f64,
    /// Simulated time at the end of the run (s).
    pub final_time_s: f64,
}

impl RunStats {
    fn record(&mut self, snapshot: &MetricsSnapshot) {
        self.ticks += 1;
        if snapshot.visible() {
            self.visible_ticks += 1;
        }
        if snapshot.jamming.is_active() {
            self.jammed_ticks += 1;
        }
        let cinr = snapshot.primary.cinr_db;
        if !cinr.is_nan() && (self.min_cinr_db.is_nan() || cinr < self.min_cinr_db) {
            self.min_cinr_db = cinr;
        }
        self.modcod_switches = snapshot.modcod.switches;
        self.final_time_s = snapshot.time_s;
    }
}

/// Evaluate the current position, then advance by `step_s` and evaluate again
/// until `duration_s` has elapsed or the scenario's maximum time is reached.
///
/// `on_tick` receives every snapshot, including the initial one.
pub fn run_with_progress<F>(
    state: &mut SimulationState,
    duration_s: f64,
    step_s: f64,
    mut on_tick: F,
) -> Result<RunStats, RunnerError>
where
    F: FnMut(&MetricsSnapshot),
{
    if !(step_s > 0.0) || !step_s.is_finite() {
        return Err(RunnerError::ConfigError(format!(
            "step must be a positive number of seconds, got {}",
            step_s
        )));
    }
    if !(duration_s >= 0.0) {
        return Err(RunnerError::ConfigError(format!(
            "duration must be non-negative, got {}",
            duration_s
        )));
    }

    let end = SimTime::from_secs(state.time().as_secs_f64() + duration_s);
    let mut stats = RunStats {
        min_cinr_db: f64::NAN,
        ..RunStats::default()
    };

    info!(
        "Running {} for {:.0} s in {:.0} s steps from t={}",
        state.mode(),
        duration_s,
        step_s,
        state.time()
    );

    let snapshot = state.evaluate();
    stats.record(&snapshot);
    on_tick(&snapshot);

    while state.time() < end {
        let remaining = end.as_secs_f64() - state.time().as_secs_f64();
        if state.advance(step_s.min(remaining)) <= 0.0 {
            debug!("Maximum simulation time reached at t={}", state.time());
            break;
        }
        let snapshot = state.evaluate();
        stats.record(&snapshot);
        on_tick(&snapshot);
    }

    info!(
        "Run finished at t={}: {} ticks, {} visible, {} MODCOD switches",
        state.time(),
        stats.ticks,
        stats.visible_ticks,
        stats.modcod_switches
    );
    Ok(stats)
}

/// Run and collect every snapshot into a [`history::History`].
pub fn run(
    state: &mut SimulationState,
    duration_s: f64,
    step_s: f64,
) -> Result<(history::History, RunStats), RunnerError> {
    let mut history = history::History::new();
    let stats = run_with_progress(state, duration_s, step_s, |snapshot| history.push(snapshot))?;
    Ok((history, stats))
}

// Re-export key types for convenience
pub use lbsim_model::{load_scenario, load_scenario_from_str, load_scenarios, Scenario};

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lbsim_jamming::JammerType;
    use lbsim_link::E2EStatus;
    use lbsim_model::load_scenario_from_str;

    fn leo_state() -> SimulationState {
        SimulationState::new(load_scenario_from_str("{}").unwrap())
    }

    fn state_from(yaml: &str) -> SimulationState {
        SimulationState::new(load_scenario_from_str(yaml).unwrap())
    }

    #[test]
    fn test_reset_starts_at_horizon() {
        let state = leo_state();
        let horizon = horizon_central_angle_deg(state.orbital_radius_m());
        assert_eq!(state.mode(), OrbitMode::Leo);
        assert!((state.orbit_angle_deg() - (360.0 - horizon)).abs() < 1e-9);
        assert!((state.central_angle_deg() - horizon).abs() < 1e-9);
        assert_eq!(state.time(), SimTime::ZERO);
    }

    #[test]
    fn test_advance_moves_satellite_and_earth() {
        let mut state = leo_state();
        let start = state.orbit_angle_deg();
        let applied = state.advance(60.0);
        assert_eq!(applied, 60.0);
        let omega = angular_velocity_deg_s(state.orbital_radius_m());
        let expected = (start + omega * 60.0).rem_euclid(360.0);
        assert!((state.orbit_angle_deg() - expected).abs() < 1e-9);
        assert!((state.earth_rotation_deg() - EARTH_ROTATION_DEG_PER_S * 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_advance_capped_at_max_time() {
        let mut state = state_from("simulation:\n  simulation:\n    max_time_s: 100\n");
        assert_eq!(state.advance(70.0), 70.0);
        assert!((state.advance(70.0) - 30.0).abs() < 1e-9);
        assert!(state.is_finished());
        assert_eq!(state.advance(70.0), 0.0);
        assert_eq!(state.advance(f64::NAN), 0.0);
        assert_eq!(state.advance(-5.0), 0.0);
    }

    #[test]
    fn test_seek_matches_incremental_advance() {
        let mut stepped = leo_state();
        for _ in 0..10 {
            stepped.advance(30.0);
        }
        let mut sought = leo_state();
        sought.seek(300.0);
        assert!((stepped.orbit_angle_deg() - sought.orbit_angle_deg()).abs() < 1e-9);
        assert!((stepped.earth_rotation_deg() - sought.earth_rotation_deg()).abs() < 1e-9);
        assert_eq!(stepped.time(), sought.time());
    }

    #[test]
    fn test_rising_pass_approaches() {
        let mut state = leo_state();
        state.advance(60.0);
        let snap = state.evaluate();
        assert!(snap.visible());
        assert!(snap.orbital.range_rate_kms < 0.0);
        assert!(snap.doppler.instantaneous_hz < 0.0);
    }

    #[test]
    fn test_overhead_pass_is_visible() {
        let mut state = leo_state();
        state.set_orbit_angle(0.0);
        let snap = state.evaluate();
        assert!(snap.visible());
        assert!(snap.above_min_elevation);
        assert!((snap.geometry.elevation_deg - 90.0).abs() < 1e-6);
        assert!(snap.uplink.outputs.cn_db.is_finite());
        assert_eq!(snap.uplink.degradation_db, 0.0);
        assert_eq!(snap.uplink.cinr_db, snap.uplink.outputs.cn_db);
        assert!(snap.modcod.selection.is_some());
        assert!(snap.performance.ebn0_db.is_finite());
        assert!(snap.latency.rtt_ms > 0.0);
        assert_ne!(snap.end_to_end.status, E2EStatus::Unavailable);
    }

    #[test]
    fn test_set_link_inputs_overrides_hop() {
        let mut state = leo_state();
        state.set_orbit_angle(0.0);
        let before = state.evaluate().downlink.outputs.cn_db;

        let mut inputs = *state.link_inputs(LinkSense::Downlink);
        inputs.eirp_dbw += 3.0;
        state.set_link_inputs(LinkSense::Downlink, inputs);
        let after = state.evaluate().downlink.outputs.cn_db;
        assert!((after - before - 3.0).abs() < 1e-9);
        assert_eq!(state.link_inputs(LinkSense::Downlink).eirp_dbw, inputs.eirp_dbw);
    }

    #[test]
    fn test_below_horizon_is_nan() {
        let mut state = leo_state();
        state.set_orbit_angle(180.0);
        let snap = state.evaluate();
        assert!(!snap.visible());
        assert!(!snap.above_min_elevation);
        assert!(snap.uplink.outputs.fspl_db.is_nan());
        assert!(snap.downlink.outputs.cn_db.is_nan());
        assert!(snap.primary.outputs.cn0_dbhz.is_nan());
        assert!(snap.primary.cinr_db.is_nan());
        assert!(snap.performance.ebn0_db.is_nan());
        assert!(snap.doppler.instantaneous_hz.is_nan());
        assert_eq!(snap.primary.quality, CnQuality::NotVisible);
        assert_eq!(snap.end_to_end.status, E2EStatus::Unavailable);
        assert_eq!(snap.orbital.visibility_remaining_s, 0.0);
    }

    #[test]
    fn test_geo_mode_is_static() {
        let mut state = leo_state();
        state.set_mode(OrbitMode::Geo);
        state.set_geo_offset(10.0);
        let before = state.evaluate();
        state.advance(3600.0);
        let after = state.evaluate();
        assert!(before.visible());
        assert!((before.geometry.central_angle_deg - 10.0).abs() < 1e-9);
        assert_eq!(before.geometry.slant_range_km, after.geometry.slant_range_km);
        assert_eq!(after.orbital.range_rate_kms, 0.0);
        assert!(after.doppler.instantaneous_hz.is_nan());
        assert!(after.orbital.visibility_remaining_s.is_nan());
        assert_eq!(after.preset_source, PresetSource::BuiltIn);
    }

    #[test]
    fn test_set_mode_reloads_presets() {
        let mut state = state_from(
            r#"
links:
  geo:
    ul: { freq_GHz: 14.0, bw_MHz: 36.0, EIRP_dBW: 55.0, GT_dBK: 2.0 }
    dl: { freq_GHz: 12.0, bw_MHz: 36.0, EIRP_dBW: 50.0, GT_dBK: 18.0 }
"#,
        );
        state.advance(100.0);
        state.set_mode(OrbitMode::Geo);
        assert_eq!(state.time(), SimTime::ZERO);
        assert_eq!(state.preset_source(), PresetSource::ModeSpecific);
        assert!((state.link_inputs(LinkSense::Uplink).frequency_ghz() - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_step_orbit_uses_configured_step() {
        let mut state = state_from("simulation:\n  orbit:\n    leo_step_deg: 2.5\n");
        let start = state.orbit_angle_deg();
        state.step_orbit(2);
        assert!((state.orbit_angle_deg() - (start + 5.0).rem_euclid(360.0)).abs() < 1e-9);
        state.step_orbit(-2);
        assert!((state.orbit_angle_deg() - start).abs() < 1e-9);
    }

    #[test]
    fn test_primary_link_uses_loss_budget() {
        let mut state = state_from("simulation:\n  losses:\n    rain_att_db: 3.0\n    l_impl_db: 1.0\n");
        state.set_orbit_angle(0.0);
        let snap = state.evaluate();
        assert_eq!(snap.primary.inputs.extra_loss_db, 4.0);
        assert!((snap.primary.path_loss_total_db - (snap.primary.outputs.fspl_db + 4.0)).abs() < 1e-9);
        assert_eq!(snap.primary.inputs.frequency_hz, snap.downlink.inputs.frequency_hz);
        assert_eq!(snap.primary.inputs.eirp_dbw, snap.power.eirp_dbw);
    }

    #[test]
    fn test_spot_jammer_degrades_active_link() {
        let mut clean = leo_state();
        clean.set_orbit_angle(0.0);
        let clean_snap = clean.evaluate();

        let mut jammed = leo_state();
        jammed.set_orbit_angle(0.0);
        let downlink = *jammed.link_inputs(LinkSense::Downlink);
        let mut jammer = JammerConfig::new("j1", "Spot", JammerType::Spot);
        jammer.center_frequency_ghz = downlink.frequency_ghz();
        jammer.power_dbw = 60.0;
        jammed.upsert_jammer(jammer);
        let snap = jammed.evaluate();

        assert!(snap.jamming.is_active());
        assert_eq!(snap.downlink.sense, LinkSense::Downlink);
        assert!(snap.downlink.degradation_db > 0.0);
        assert!(snap.primary.cinr_db < clean_snap.primary.cinr_db);
        assert!(snap.performance.shannon_capacity_bps < clean_snap.performance.shannon_capacity_bps);
        assert_eq!(snap.validation.coherence.len(), snap.jamming.results.len());

        let removed = jammed.remove_jammer("j1").unwrap();
        assert_eq!(removed.power_dbw, 60.0);
        assert!(matches!(jammed.remove_jammer("j1"), Err(RunnerError::Jammer(_))));
        let cleared = jammed.evaluate();
        assert!(!cleared.jamming.is_active());
        assert_eq!(cleared.downlink.degradation_db, 0.0);
    }

    #[test]
    fn test_end_to_end_uses_worse_hop() {
        let mut state = leo_state();
        state.set_active_link(ActiveLink::EndToEnd);
        state.set_orbit_angle(0.0);
        let snap = state.evaluate();
        let worst = snap.uplink.cinr_db.min(snap.downlink.cinr_db);
        assert_eq!(snap.primary.cinr_db, worst);
        assert_eq!(snap.primary.sense, LinkSense::Downlink);
    }

    #[test]
    fn test_empty_modcod_table_uses_throughput() {
        let mut state = state_from("modcod_table: []\n");
        state.set_orbit_angle(0.0);
        let snap = state.evaluate();
        assert!(snap.modcod.selection.is_none());
        assert_eq!(snap.modcod.status, MarginStatus::NotAvailable);
        assert_eq!(snap.performance.bit_rate_bps, 10e6);
        assert_eq!(snap.performance.ebn0_req_db, 4.0);
    }

    #[test]
    fn test_run_collects_ticks() {
        let mut state = leo_state();
        let mut times = Vec::new();
        let stats = run_with_progress(&mut state, 900.0, 300.0, |s| times.push(s.time_s)).unwrap();
        assert_eq!(times, vec![0.0, 300.0, 600.0, 900.0]);
        assert_eq!(stats.ticks, 4);
        assert_eq!(stats.final_time_s, 900.0);
        assert!(stats.visible_ticks >= 1);
    }

    #[test]
    fn test_run_rejects_bad_step() {
        let mut state = leo_state();
        assert!(matches!(
            run_with_progress(&mut state, 10.0, 0.0, |_| {}),
            Err(RunnerError::ConfigError(_))
        ));
        assert!(matches!(
            run_with_progress(&mut state, -1.0, 10.0, |_| {}),
            Err(RunnerError::ConfigError(_))
        ));
    }

    #[test]
    fn test_worse_db_propagates_nan() {
        assert_eq!(worse_db(3.0, 5.0), 3.0);
        assert!(worse_db(f64::NAN, 5.0).is_nan());
        assert!(worse_db(5.0, f64::NAN).is_nan());
    }
}
