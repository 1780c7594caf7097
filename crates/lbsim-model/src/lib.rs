//! # lbsim-model
//!
//! YAML scenario loading for the link budget simulator.
//!
//! This crate provides:
//! - YAML schema types for scenarios
//! - Scenario loading from files and strings, merging several files in order
//! - Layered link-preset resolution ([`resolve_link_presets`])
//! - Property registry for configuring scenario and jammer parameters
//!
//! ## Dynamic Property System
//!
//! Scenario settings and jammers use a dynamic property system instead of explicit
//! typed fields. Properties are stored in a flat namespace (e.g. `losses/rain_att_db`)
//! and can be:
//! - Defined as built-in defaults in the property registry
//! - Overridden in the `defaults` section of YAML files (jammers)
//! - Overridden in the `simulation` section or on individual jammers
//!
//! Properties are resolved in order: built-in → defaults → explicit values.
//!
//! Link presets and the MODCOD table are structured sections (`links:` and
//! `modcod_table:`) rather than properties.

pub mod properties;

pub use properties::{
    default_value, get_property_def, properties_by_scope, FromPropertyValue, JammerScope,
    Property, PropertyBaseType, PropertyDef, PropertyScope, PropertySetError, PropertyType,
    PropertyValue, ResolvedProperties, ScenarioScope, ScopeMarker, UnresolvedProperties,
};

use lbsim_common::{ActiveLink, OrbitMode, EARTH_RADIUS_M};
use lbsim_jamming::{
    AntennaType, DiscriminationModel, FccMask, GlobalThresholds, JammerConfig, JammerError,
    JammerSet, JammerType, JammingPolicy, JsThresholds, TargetPreference,
};
use lbsim_link::{
    LatencySettings, LinkInputs, LossBudget, ModcodEntry, ModcodMode, NoiseTemperatures,
    PowerSettings,
};
use properties::definitions::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while loading a scenario.
#[derive(Debug, Error)]
pub enum ModelError {
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A property holds a label outside its accepted set.
    #[error("Invalid value '{value}' for property '{property}'")]
    InvalidValue {
        /// Property name.
        property: String,
        /// Offending value.
        value: String,
    },

    /// Unknown jamming strategy.
    #[error("Unknown jammer type '{value}' for jammer '{jammer}': expected SPOT, BARRAGE or SMART")]
    UnknownJammerType {
        /// Jammer id.
        jammer: String,
        /// Offending value.
        value: String,
    },

    /// Two jammers in one file share an id.
    #[error("Duplicate jammer id: {0}")]
    DuplicateJammer(String),

    /// A `remove` entry names a jammer that does not exist.
    #[error("Jammer not found: {0}")]
    JammerNotFound(String),

    /// Jammer set error.
    #[error("Jammer error: {0}")]
    Jammer(#[from] JammerError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// ============================================================================
// Link Presets
// ============================================================================

/// Carrier preset for one hop, in configuration units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkPreset {
    /// Carrier frequency (GHz).
    #[serde(alias = "freq_GHz")]
    pub freq_ghz: f64,
    /// Bandwidth (MHz).
    #[serde(alias = "bw_MHz")]
    pub bw_mhz: f64,
    /// Transmit EIRP (dBW).
    #[serde(alias = "EIRP_dBW")]
    pub eirp_dbw: f64,
    /// Receiver G/T (dB/K).
    #[serde(alias = "GT_dBK")]
    pub gt_dbk: f64,
    /// Extra losses (dB).
    #[serde(default, alias = "extra_losses_dB")]
    pub extra_loss_db: f64,
}

impl LinkPreset {
    /// Create a preset.
    pub const fn new(freq_ghz: f64, bw_mhz: f64, eirp_dbw: f64, gt_dbk: f64) -> Self {
        Self {
            freq_ghz,
            bw_mhz,
            eirp_dbw,
            gt_dbk,
            extra_loss_db: 0.0,
        }
    }

    /// Link inputs in SI units.
    pub fn to_inputs(&self) -> LinkInputs {
        LinkInputs::from_preset(
            self.freq_ghz,
            self.bw_mhz,
            self.eirp_dbw,
            self.gt_dbk,
            self.extra_loss_db,
        )
    }
}

/// Uplink and downlink presets for one orbit mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkPair {
    #[serde(alias = "UL")]
    pub ul: LinkPreset,
    #[serde(alias = "DL")]
    pub dl: LinkPreset,
}

impl LinkPair {
    /// Built-in presets: Ka-band for LEO, Ku-band for GEO.
    pub fn builtin(mode: OrbitMode) -> Self {
        match mode {
            OrbitMode::Leo => LinkPair {
                ul: LinkPreset::new(30.0, 20.0, 45.0, -8.0),
                dl: LinkPreset::new(20.0, 20.0, 48.0, 12.0),
            },
            OrbitMode::Geo => LinkPair {
                ul: LinkPreset::new(14.0, 12.0, 62.0, -2.0),
                dl: LinkPreset::new(11.7, 12.0, 56.0, 8.0),
            },
        }
    }
}

/// Possibly incomplete preset pair as written in a scenario file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialLinkPair {
    #[serde(default, alias = "UL")]
    pub ul: Option<LinkPreset>,
    #[serde(default, alias = "DL")]
    pub dl: Option<LinkPreset>,
}

impl PartialLinkPair {
    fn complete(&self) -> Option<LinkPair> {
        Some(LinkPair {
            ul: self.ul?,
            dl: self.dl?,
        })
    }

    fn merge(&mut self, other: &PartialLinkPair) {
        if other.ul.is_some() {
            self.ul = other.ul;
        }
        if other.dl.is_some() {
            self.dl = other.dl;
        }
    }
}

/// The `links:` section.
///
/// ```yaml
/// links:
///   leo:
///     ul: { freq_ghz: 30, bw_mhz: 20, eirp_dbw: 45, gt_dbk: -8 }
///     dl: { freq_ghz: 20, bw_mhz: 20, eirp_dbw: 48, gt_dbk: 12 }
///   # or, for both modes:
///   ul: { ... }
///   dl: { ... }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkPresetsConfig {
    /// LEO-specific presets.
    #[serde(default, alias = "LEO")]
    pub leo: PartialLinkPair,
    /// GEO-specific presets.
    #[serde(default, alias = "GEO")]
    pub geo: PartialLinkPair,
    /// Legacy global uplink preset, used for both modes.
    #[serde(default, alias = "UL")]
    pub ul: Option<LinkPreset>,
    /// Legacy global downlink preset, used for both modes.
    #[serde(default, alias = "DL")]
    pub dl: Option<LinkPreset>,
}

impl LinkPresetsConfig {
    fn merge(&mut self, other: &LinkPresetsConfig) {
        self.leo.merge(&other.leo);
        self.geo.merge(&other.geo);
        if other.ul.is_some() {
            self.ul = other.ul;
        }
        if other.dl.is_some() {
            self.dl = other.dl;
        }
    }
}

/// Where a resolved preset pair came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PresetSource {
    /// `links.leo` / `links.geo`.
    ModeSpecific,
    /// `links.ul` / `links.dl`.
    Legacy,
    /// Compiled-in presets.
    BuiltIn,
}

impl PresetSource {
    /// Label used in logs and exports.
    pub fn label(&self) -> &'static str {
        match self {
            PresetSource::ModeSpecific => "mode-specific",
            PresetSource::Legacy => "legacy",
            PresetSource::BuiltIn => "built-in",
        }
    }
}

/// Presets for a mode plus the source they were taken from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkPresetResolution {
    pub presets: LinkPair,
    pub source: PresetSource,
}

/// Resolve the presets for `mode`: mode-specific, then legacy, then built-in.
///
/// Each level needs both hops; a half-specified level is skipped.
pub fn resolve_link_presets(config: &LinkPresetsConfig, mode: OrbitMode) -> LinkPresetResolution {
    let specific = match mode {
        OrbitMode::Leo => &config.leo,
        OrbitMode::Geo => &config.geo,
    };
    if let Some(presets) = specific.complete() {
        return LinkPresetResolution {
            presets,
            source: PresetSource::ModeSpecific,
        };
    }

    if let (Some(ul), Some(dl)) = (config.ul, config.dl) {
        warn!(mode = %mode, "No {} link presets, using legacy ul/dl presets", mode);
        return LinkPresetResolution {
            presets: LinkPair { ul, dl },
            source: PresetSource::Legacy,
        };
    }

    warn!(mode = %mode, "No link presets configured for {}, using built-in presets", mode);
    LinkPresetResolution {
        presets: LinkPair::builtin(mode),
        source: PresetSource::BuiltIn,
    }
}

// ============================================================================
// Resolved Scenario Settings
// ============================================================================

/// Altitude and baseline EIRP and G/T of one orbit mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitBaseline {
    pub altitude_km: f64,
    pub eirp_dbw: f64,
    pub gt_dbk: f64,
}

impl OrbitBaseline {
    /// GEO altitude used when none is configured (km).
    pub const DEFAULT_GEO_ALTITUDE_KM: f64 = 35_786.0;
    /// GEO EIRP used when none is configured (dBW).
    pub const DEFAULT_GEO_EIRP_DBW: f64 = 52.0;
    /// GEO G/T used when none is configured (dB/K).
    pub const DEFAULT_GEO_GT_DBK: f64 = -5.0;

    /// Orbital radius (m).
    pub fn orbital_radius_m(&self) -> f64 {
        EARTH_RADIUS_M + self.altitude_km * 1000.0
    }
}

/// Animation time base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationSettings {
    /// Simulated seconds per wall-clock second.
    pub time_scale_factor: f64,
    /// Wall-clock tick interval (ms).
    pub update_interval_ms: f64,
}

impl AnimationSettings {
    pub const DEFAULT_TIME_SCALE_FACTOR: f64 = 1000.0;
    pub const DEFAULT_UPDATE_INTERVAL_MS: f64 = 300.0;

    /// Simulated seconds advanced per tick.
    pub fn step_s(&self) -> f64 {
        self.time_scale_factor * self.update_interval_ms / 1000.0
    }
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            time_scale_factor: Self::DEFAULT_TIME_SCALE_FACTOR,
            update_interval_ms: Self::DEFAULT_UPDATE_INTERVAL_MS,
        }
    }
}

/// Bit rate and required Eb/N0 used when no MODCOD table is available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThroughputSettings {
    pub bit_rate_bps: f64,
    pub ebn0_req_db: f64,
}

/// A loaded scenario with resolved properties.
#[derive(Debug, Clone)]
pub struct Scenario {
    properties: ResolvedProperties<ScenarioScope>,
    jammers: JammerSet,
    links: LinkPresetsConfig,
    modcod_table: Vec<ModcodEntry>,
    leo: OrbitBaseline,
    geo: OrbitBaseline,
    orbit_mode: OrbitMode,
    active_link: ActiveLink,
    jamming_policy: JammingPolicy,
    animation: AnimationSettings,
}

impl Scenario {
    /// Scenario-wide properties.
    pub fn properties(&self) -> &ResolvedProperties<ScenarioScope> {
        &self.properties
    }

    /// All configured jammers, active or not.
    pub fn jammers(&self) -> &JammerSet {
        &self.jammers
    }

    /// Mutable access to the jammer set.
    pub fn jammers_mut(&mut self) -> &mut JammerSet {
        &mut self.jammers
    }

    /// Presets for `mode`, with their source.
    pub fn link_presets(&self, mode: OrbitMode) -> LinkPresetResolution {
        resolve_link_presets(&self.links, mode)
    }

    /// MODCOD table; may be empty if the scenario explicitly clears it.
    pub fn modcod_table(&self) -> &[ModcodEntry] {
        &self.modcod_table
    }

    /// Auto or manual selection.
    pub fn modcod_mode(&self) -> ModcodMode {
        if self.properties.get(&MODCOD_AUTO) {
            ModcodMode::Auto
        } else {
            ModcodMode::Manual(self.properties.get(&MODCOD_DEFAULT))
        }
    }

    /// Hysteresis for MODCOD upgrades (dB).
    pub fn modcod_hysteresis_db(&self) -> f64 {
        self.properties.get(&MODCOD_HYSTERESIS_DB)
    }

    /// Baseline of `mode`.
    pub fn baseline(&self, mode: OrbitMode) -> OrbitBaseline {
        match mode {
            OrbitMode::Leo => self.leo,
            OrbitMode::Geo => self.geo,
        }
    }

    /// Initial orbit mode.
    pub fn orbit_mode(&self) -> OrbitMode {
        self.orbit_mode
    }

    /// Link sense driving the primary link block and MODCOD.
    pub fn active_link(&self) -> ActiveLink {
        self.active_link
    }

    /// Jamming engine constants.
    pub fn jamming_policy(&self) -> &JammingPolicy {
        &self.jamming_policy
    }

    /// Time base of the tick driver.
    pub fn animation(&self) -> AnimationSettings {
        self.animation
    }

    /// Transponder power settings for `mode`. Unset EIRPs fall back to the
    /// mode's baseline.
    pub fn power_settings(&self, mode: OrbitMode) -> PowerSettings {
        let saturated_eirp_dbw = self
            .properties
            .get(&POWER_SATURATED_EIRP_DBW)
            .unwrap_or(self.baseline(mode).eirp_dbw);
        PowerSettings {
            saturated_eirp_dbw,
            input_backoff_db: self.properties.get(&POWER_INPUT_BACKOFF_DB),
            manual_override: self.properties.get(&POWER_MANUAL_OVERRIDE),
            manual_eirp_dbw: self
                .properties
                .get(&POWER_MANUAL_EIRP_DBW)
                .unwrap_or(saturated_eirp_dbw),
        }
    }

    /// The seven named losses.
    pub fn loss_budget(&self) -> LossBudget {
        LossBudget {
            rfl_feeder_db: self.properties.get(&LOSSES_RFL_FEEDER_DB),
            aml_misalignment_db: self.properties.get(&LOSSES_AML_MISALIGNMENT_DB),
            aa_atmos_db: self.properties.get(&LOSSES_AA_ATMOS_DB),
            rain_att_db: self.properties.get(&LOSSES_RAIN_ATT_DB),
            pl_polarization_db: self.properties.get(&LOSSES_PL_POLARIZATION_DB),
            l_pointing_db: self.properties.get(&LOSSES_L_POINTING_DB),
            l_impl_db: self.properties.get(&LOSSES_L_IMPL_DB),
        }
    }

    /// Noise temperature components.
    pub fn noise(&self) -> NoiseTemperatures {
        NoiseTemperatures {
            receiver_k: self.properties.get(&NOISE_RECEIVER_K),
            clear_sky_k: self.properties.get(&NOISE_CLEAR_SKY_K),
            rain_excess_k: self.properties.get(&NOISE_RAIN_EXCESS_K),
        }
    }

    /// Fixed latency contributions.
    pub fn latency(&self) -> LatencySettings {
        LatencySettings {
            processing_ms: self.properties.get(&LATENCY_PROCESSING_MS),
            switching_ms: self.properties.get(&LATENCY_SWITCHING_MS),
        }
    }

    /// Throughput settings for an empty MODCOD table.
    pub fn throughput(&self) -> ThroughputSettings {
        let rb_mbps: f64 = self.properties.get(&THROUGHPUT_RB_MBPS);
        ThroughputSettings {
            bit_rate_bps: rb_mbps * 1e6,
            ebn0_req_db: self.properties.get(&THROUGHPUT_EBN0_REQ_DB),
        }
    }

    /// Minimum elevation for the coverage flag (degrees).
    pub fn min_elevation_deg(&self) -> f64 {
        self.properties.get(&COVERAGE_MIN_ELEVATION_DEG)
    }

    /// Simulated time cap (s).
    pub fn max_time_s(&self) -> f64 {
        self.properties.get(&SIMULATION_MAX_TIME_S)
    }

    /// Manual LEO orbit step (degrees).
    pub fn leo_step_deg(&self) -> f64 {
        self.properties.get(&ORBIT_LEO_STEP_DEG)
    }

    /// Initial GEO longitude offset (degrees).
    pub fn geo_longitude_offset_deg(&self) -> f64 {
        self.properties.get(&ORBIT_GEO_LONGITUDE_OFFSET_DEG)
    }
}

// ============================================================================
// YAML Schema Types (Internal)
// ============================================================================

/// Root scenario structure (YAML schema).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioYaml {
    /// Jammer defaults, written as `defaults: { jammer: { ... } }`.
    #[serde(default)]
    defaults: UnresolvedProperties<JammerScope>,
    /// Scenario-wide properties.
    #[serde(default)]
    simulation: Option<UnresolvedProperties<ScenarioScope>>,
    /// Jammer definitions.
    #[serde(default)]
    jammers: Vec<JammerEntryYaml>,
    /// Link presets.
    #[serde(default)]
    links: LinkPresetsConfig,
    /// MODCOD table; absent means the built-in table.
    #[serde(default)]
    modcod_table: Option<Vec<ModcodEntry>>,
}

/// Jammer entry with dynamic properties.
///
/// ```yaml
/// jammers:
///   - id: J1
///     name: "Spot DL"
///     jammer:
///       type: SPOT
///       distance_km: 20
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JammerEntryYaml {
    /// Unique id.
    id: String,
    /// Display name; defaults to the id.
    #[serde(default)]
    name: Option<String>,
    /// When true, the jammer is removed during merging.
    #[serde(default)]
    remove: bool,
    #[serde(flatten)]
    properties: UnresolvedProperties<JammerScope>,
}

struct JammerDraft {
    name: String,
    properties: ResolvedProperties<JammerScope>,
}

// ============================================================================
// Scenario Loading
// ============================================================================

/// Load a scenario from a file.
pub fn load_scenario(path: &Path) -> Result<Scenario, ModelError> {
    load_scenarios(&[path])
}

/// Parse a scenario from a YAML (or JSON) string.
pub fn load_scenario_from_str(yaml_str: &str) -> Result<Scenario, ModelError> {
    load_scenarios_from_str(&[yaml_str])
}

/// Load and merge several scenario files.
///
/// Later files override earlier ones:
/// - Jammer defaults and `simulation` properties from later files win
/// - Jammers with the same id are merged property by property
/// - Link presets are replaced hop by hop
/// - A later `modcod_table` replaces the earlier one
pub fn load_scenarios(paths: &[&Path]) -> Result<Scenario, ModelError> {
    if paths.is_empty() {
        return Err(ModelError::InvalidConfig(
            "No scenario files provided".to_string(),
        ));
    }

    let yaml_strings: Result<Vec<String>, std::io::Error> =
        paths.iter().map(std::fs::read_to_string).collect();
    let yaml_strings = yaml_strings?;
    let yaml_strs: Vec<&str> = yaml_strings.iter().map(|s| s.as_str()).collect();

    load_scenarios_from_str(&yaml_strs)
}

/// Load and merge several scenarios from YAML strings. See [`load_scenarios`].
pub fn load_scenarios_from_str(yaml_strs: &[&str]) -> Result<Scenario, ModelError> {
    if yaml_strs.is_empty() {
        return Err(ModelError::InvalidConfig(
            "No scenario strings provided".to_string(),
        ));
    }

    let mut jammer_defaults: ResolvedProperties<JammerScope> = ResolvedProperties::new();

    let mut yamls = Vec::new();
    for yaml_str in yaml_strs {
        let yaml: ScenarioYaml = serde_yaml::from_str(yaml_str)?;
        jammer_defaults.apply_unresolved(&yaml.defaults);
        yamls.push(yaml);
    }

    let mut properties: ResolvedProperties<ScenarioScope> = ResolvedProperties::new();
    let mut drafts: BTreeMap<String, JammerDraft> = BTreeMap::new();
    let mut links = LinkPresetsConfig::default();
    let mut modcod_table: Option<Vec<ModcodEntry>> = None;

    for yaml in yamls {
        if let Some(simulation) = &yaml.simulation {
            properties.apply_unresolved(simulation);
        }

        let mut seen_in_file: Vec<&str> = Vec::new();
        for entry in &yaml.jammers {
            if seen_in_file.contains(&entry.id.as_str()) {
                return Err(ModelError::DuplicateJammer(entry.id.clone()));
            }
            seen_in_file.push(&entry.id);

            if entry.remove {
                if drafts.remove(&entry.id).is_none() {
                    return Err(ModelError::JammerNotFound(entry.id.clone()));
                }
            } else if let Some(existing) = drafts.get_mut(&entry.id) {
                existing.properties.apply_unresolved(&entry.properties);
                if let Some(name) = &entry.name {
                    existing.name = name.clone();
                }
            } else {
                let mut jammer_props = jammer_defaults.clone();
                jammer_props.apply_unresolved(&entry.properties);
                drafts.insert(
                    entry.id.clone(),
                    JammerDraft {
                        name: entry.name.clone().unwrap_or_else(|| entry.id.clone()),
                        properties: jammer_props,
                    },
                );
            }
        }

        links.merge(&yaml.links);
        if yaml.modcod_table.is_some() {
            modcod_table = yaml.modcod_table;
        }
    }

    let mut jammers = JammerSet::new();
    for (id, draft) in &drafts {
        jammers.add(jammer_from_properties(id, &draft.name, &draft.properties)?)?;
    }

    let modcod_table = modcod_table.unwrap_or_else(ModcodEntry::default_table);
    validate_modcod_table(&modcod_table)?;

    let scenario = Scenario {
        leo: leo_baseline(&properties),
        geo: geo_baseline(&properties),
        orbit_mode: parse_label(&properties, &ORBIT_MODE, |s| s.parse().ok())?,
        active_link: parse_label(&properties, &SIMULATION_LINK_SENSE, |s| s.parse().ok())?,
        jamming_policy: jamming_policy(&properties)?,
        animation: animation_settings(&properties),
        properties,
        jammers,
        links,
        modcod_table,
    };

    if let ModcodMode::Manual(name) = scenario.modcod_mode() {
        if !scenario.modcod_table.iter().any(|e| e.name == name) {
            warn!(modcod = %name, "Manual MODCOD not in table, the first entry will be used");
        }
    }

    debug!(
        mode = %scenario.orbit_mode,
        jammers = scenario.jammers.len(),
        modcods = scenario.modcod_table.len(),
        "Scenario loaded"
    );

    Ok(scenario)
}

// ============================================================================
// Resolution Helpers
// ============================================================================

fn parse_label<T>(
    properties: &ResolvedProperties<ScenarioScope>,
    prop: &Property<String, ScenarioScope>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ModelError> {
    let value: String = properties.get(prop);
    parse(&value).ok_or_else(|| ModelError::InvalidValue {
        property: prop.name().to_string(),
        value,
    })
}

fn leo_baseline(properties: &ResolvedProperties<ScenarioScope>) -> OrbitBaseline {
    OrbitBaseline {
        altitude_km: properties.get(&LEO_ALTITUDE_KM),
        eirp_dbw: properties.get(&LEO_EIRP_DBW),
        gt_dbk: properties.get(&LEO_GT_DBK),
    }
}

fn geo_baseline(properties: &ResolvedProperties<ScenarioScope>) -> OrbitBaseline {
    let fallback = |prop: &Property<Option<f64>, ScenarioScope>, default: f64| {
        properties.get(prop).unwrap_or_else(|| {
            warn!(property = prop.name(), default, "GEO baseline not configured, using default");
            default
        })
    };
    OrbitBaseline {
        altitude_km: fallback(&GEO_ALTITUDE_KM, OrbitBaseline::DEFAULT_GEO_ALTITUDE_KM),
        eirp_dbw: fallback(&GEO_EIRP_DBW, OrbitBaseline::DEFAULT_GEO_EIRP_DBW),
        gt_dbk: fallback(&GEO_GT_DBK, OrbitBaseline::DEFAULT_GEO_GT_DBK),
    }
}

fn animation_settings(properties: &ResolvedProperties<ScenarioScope>) -> AnimationSettings {
    let positive_or = |prop: &Property<f64, ScenarioScope>, default: f64| {
        let value: f64 = properties.get(prop);
        if value > 0.0 {
            value
        } else {
            warn!(property = prop.name(), value, default, "Invalid animation setting, using default");
            default
        }
    };
    AnimationSettings {
        time_scale_factor: positive_or(
            &ANIMATION_TIME_SCALE_FACTOR,
            AnimationSettings::DEFAULT_TIME_SCALE_FACTOR,
        ),
        update_interval_ms: positive_or(
            &ANIMATION_UPDATE_INTERVAL_MS,
            AnimationSettings::DEFAULT_UPDATE_INTERVAL_MS,
        ),
    }
}

fn jamming_policy(properties: &ResolvedProperties<ScenarioScope>) -> Result<JammingPolicy, ModelError> {
    Ok(JammingPolicy {
        discrimination_model: parse_label(
            properties,
            &JAMMING_DISCRIMINATION_MODEL,
            DiscriminationModel::parse,
        )?,
        fcc_mask: FccMask {
            boresight_deg: properties.get(&JAMMING_FCC_BORESIGHT_DEG),
            ramp_end_deg: properties.get(&JAMMING_FCC_RAMP_END_DEG),
            main_lobe_end_deg: properties.get(&JAMMING_FCC_MAIN_LOBE_END_DEG),
            plateau_end_deg: properties.get(&JAMMING_FCC_PLATEAU_END_DEG),
            sidelobe_end_deg: properties.get(&JAMMING_FCC_SIDELOBE_END_DEG),
            peak_db: properties.get(&JAMMING_FCC_PEAK_DB),
            slope_db: properties.get(&JAMMING_FCC_SLOPE_DB),
            plateau_db: properties.get(&JAMMING_FCC_PLATEAU_DB),
            sidelobe_db: properties.get(&JAMMING_FCC_SIDELOBE_DB),
            backlobe_db: properties.get(&JAMMING_FCC_BACKLOBE_DB),
        },
        polarization_isolation_db: properties.get(&JAMMING_POLARIZATION_ISOLATION_DB),
        js_thresholds: JsThresholds {
            critical_db: properties.get(&JAMMING_JS_CRITICAL_DB),
            effective_db: properties.get(&JAMMING_JS_EFFECTIVE_DB),
            moderate_db: properties.get(&JAMMING_JS_MODERATE_DB),
            light_db: properties.get(&JAMMING_JS_LIGHT_DB),
        },
        global_thresholds: GlobalThresholds {
            critical_db: properties.get(&JAMMING_GLOBAL_CRITICAL_DB),
            effective_db: properties.get(&JAMMING_GLOBAL_EFFECTIVE_DB),
            moderate_db: properties.get(&JAMMING_GLOBAL_MODERATE_DB),
            limited_db: properties.get(&JAMMING_GLOBAL_LIMITED_DB),
        },
        generic_overlap: properties.get(&JAMMING_GENERIC_OVERLAP),
    })
}

fn jammer_from_properties(
    id: &str,
    name: &str,
    props: &ResolvedProperties<JammerScope>,
) -> Result<JammerConfig, ModelError> {
    let type_label: String = props.get(&JAMMER_TYPE);
    let jammer_type =
        JammerType::parse(&type_label).ok_or_else(|| ModelError::UnknownJammerType {
            jammer: id.to_string(),
            value: type_label.clone(),
        })?;

    let antenna_label: String = props.get(&JAMMER_ANTENNA_TYPE);
    let antenna_type =
        AntennaType::parse(&antenna_label).ok_or_else(|| ModelError::InvalidValue {
            property: JAMMER_ANTENNA_TYPE.name().to_string(),
            value: antenna_label.clone(),
        })?;

    let target_label: String = props.get(&JAMMER_TARGET_PREFERENCE);
    let target_preference =
        TargetPreference::parse(&target_label).ok_or_else(|| ModelError::InvalidValue {
            property: JAMMER_TARGET_PREFERENCE.name().to_string(),
            value: target_label.clone(),
        })?;

    Ok(JammerConfig {
        id: id.to_string(),
        name: name.to_string(),
        jammer_type,
        antenna_type,
        power_dbw: props.get(&JAMMER_POWER_DBW),
        antenna_gain_dbi: props.get(&JAMMER_ANTENNA_GAIN_DBI),
        center_frequency_ghz: props.get(&JAMMER_CENTER_FREQUENCY_GHZ),
        bandwidth_mhz: props.get(&JAMMER_BANDWIDTH_MHZ),
        target_preference,
        distance_km: props.get(&JAMMER_DISTANCE_KM),
        azimuth_deg: props.get(&JAMMER_AZIMUTH_DEG),
        altitude_km: props.get(&JAMMER_ALTITUDE_KM),
        active: props.get(&JAMMER_ACTIVE),
    })
}

fn validate_modcod_table(table: &[ModcodEntry]) -> Result<(), ModelError> {
    for entry in table {
        if !(entry.bits_per_symbol > 0.0) || !(entry.code_rate > 0.0 && entry.code_rate <= 1.0) {
            return Err(ModelError::InvalidConfig(format!(
                "MODCOD '{}' needs bits_per_symbol > 0 and code_rate in (0, 1]",
                entry.name
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
