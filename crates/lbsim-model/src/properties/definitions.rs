//! Property constant definitions.
//!
//! The description string (second argument to `Property::new`) is user-facing
//! and printed by `lbsim properties`; keep it self-contained, including valid
//! values and what `null` means.
//!
//! ## Property Categories
//!
//! ### Scenario Properties
//! - **Orbit baselines** - LEO/GEO altitude, EIRP and G/T
//! - **Orbit / Animation / Simulation** - Mode, positions, time base, active link
//! - **Power / Losses / Noise** - Transponder back-off, the seven loss terms, noise temperatures
//! - **Throughput / Latency / Coverage / MODCOD** - Performance and selection settings
//! - **Jamming** - Engine policy constants
//!
//! ### Jammer Properties
//! - **Jammer** - Type, power, band, position and activity of one jammer

use super::types::{JammerScope, Property, PropertyDefault, ScenarioScope};

// ============================================================================
// Orbit Baselines (Scenario scope)
// ============================================================================

/// LEO altitude.
pub const LEO_ALTITUDE_KM: Property<f64, ScenarioScope> = Property::new(
    "leo/altitude_km",
    "Altitude of the LEO satellite above the Earth's surface",
    PropertyDefault::Float(550.0),
)
.with_unit("km");

/// LEO baseline EIRP.
pub const LEO_EIRP_DBW: Property<f64, ScenarioScope> = Property::new(
    "leo/eirp_dbw",
    "Baseline EIRP in LEO mode; also the saturated EIRP when power/saturated_eirp_dbw is null",
    PropertyDefault::Float(48.0),
)
.with_unit("dBW");

/// LEO baseline G/T.
pub const LEO_GT_DBK: Property<f64, ScenarioScope> = Property::new(
    "leo/gt_dbk",
    "Baseline receiver G/T used by the primary link in LEO mode",
    PropertyDefault::Float(12.0),
)
.with_unit("dB/K");

/// GEO altitude (nullable).
pub const GEO_ALTITUDE_KM: Property<Option<f64>, ScenarioScope> = Property::new(
    "geo/altitude_km",
    "Altitude of the GEO satellite. If null, 35786 km is used and a warning is logged",
    PropertyDefault::Null,
)
.with_unit("km");

/// GEO baseline EIRP (nullable).
pub const GEO_EIRP_DBW: Property<Option<f64>, ScenarioScope> = Property::new(
    "geo/eirp_dbw",
    "Baseline EIRP in GEO mode. If null, 52 dBW is used and a warning is logged",
    PropertyDefault::Null,
)
.with_unit("dBW");

/// GEO baseline G/T (nullable).
pub const GEO_GT_DBK: Property<Option<f64>, ScenarioScope> = Property::new(
    "geo/gt_dbk",
    "Baseline receiver G/T in GEO mode. If null, -5 dB/K is used and a warning is logged",
    PropertyDefault::Null,
)
.with_unit("dB/K");

// ============================================================================
// Orbit State (Scenario scope)
// ============================================================================

/// Initial orbit mode.
pub const ORBIT_MODE: Property<String, ScenarioScope> = Property::new(
    "orbit/mode",
    "Initial orbit mode: LEO or GEO",
    PropertyDefault::String("LEO"),
);

/// Manual orbit step.
pub const ORBIT_LEO_STEP_DEG: Property<f64, ScenarioScope> = Property::new(
    "orbit/leo_step_deg",
    "Orbit angle increment applied per manual step in LEO mode",
    PropertyDefault::Float(0.2),
)
.with_unit("degrees");

/// Initial GEO longitude offset.
pub const ORBIT_GEO_LONGITUDE_OFFSET_DEG: Property<f64, ScenarioScope> = Property::new(
    "orbit/geo_longitude_offset_deg",
    "Longitude of the GEO satellite relative to the ground station",
    PropertyDefault::Float(0.0),
)
.with_unit("degrees");

// ============================================================================
// Animation and Simulation (Scenario scope)
// ============================================================================

/// Simulated seconds per real second.
pub const ANIMATION_TIME_SCALE_FACTOR: Property<f64, ScenarioScope> = Property::new(
    "animation/time_scale_factor",
    "Simulated seconds per wall-clock second. Together with update_interval_ms this sets the default tick length. Non-positive values fall back to 1000",
    PropertyDefault::Float(1000.0),
);

/// Tick interval.
pub const ANIMATION_UPDATE_INTERVAL_MS: Property<f64, ScenarioScope> = Property::new(
    "animation/update_interval_ms",
    "Wall-clock interval between ticks. Non-positive values fall back to 300",
    PropertyDefault::Float(300.0),
)
.with_unit("ms");

/// Simulated time cap.
pub const SIMULATION_MAX_TIME_S: Property<f64, ScenarioScope> = Property::new(
    "simulation/max_time_s",
    "Simulated time is capped at this value",
    PropertyDefault::Float(7200.0),
)
.with_unit("s");

/// Link sense driving the primary link, MODCOD and performance.
pub const SIMULATION_LINK_SENSE: Property<String, ScenarioScope> = Property::new(
    "simulation/link_sense",
    "Active link: UL, DL or E2E. E2E uses the downlink carrier and the worse hop's CINR",
    PropertyDefault::String("DL"),
);

// ============================================================================
// Power (Scenario scope)
// ============================================================================

/// Saturated EIRP (nullable).
pub const POWER_SATURATED_EIRP_DBW: Property<Option<f64>, ScenarioScope> = Property::new(
    "power/saturated_eirp_dbw",
    "Saturated transponder EIRP. If null, the baseline EIRP of the current mode is used",
    PropertyDefault::Null,
)
.with_unit("dBW");

/// Input back-off.
pub const POWER_INPUT_BACKOFF_DB: Property<f64, ScenarioScope> = Property::new(
    "power/input_backoff_db",
    "Input back-off; output back-off is max(0, IBO - 5). Negative values are clamped to 0",
    PropertyDefault::Float(0.0),
)
.with_unit("dB");

/// Manual EIRP override switch.
pub const POWER_MANUAL_OVERRIDE: Property<bool, ScenarioScope> = Property::new(
    "power/manual_override",
    "When true, power/manual_eirp_dbw replaces the back-off computation",
    PropertyDefault::Bool(false),
);

/// Manual EIRP (nullable).
pub const POWER_MANUAL_EIRP_DBW: Property<Option<f64>, ScenarioScope> = Property::new(
    "power/manual_eirp_dbw",
    "EIRP used when power/manual_override is true. If null, the saturated EIRP is used",
    PropertyDefault::Null,
)
.with_unit("dBW");

// ============================================================================
// Losses (Scenario scope)
// ============================================================================

/// Feeder loss.
pub const LOSSES_RFL_FEEDER_DB: Property<f64, ScenarioScope> = Property::new(
    "losses/rfl_feeder_db",
    "RF feeder loss",
    PropertyDefault::Float(0.0),
)
.with_unit("dB");

/// Antenna misalignment loss.
pub const LOSSES_AML_MISALIGNMENT_DB: Property<f64, ScenarioScope> = Property::new(
    "losses/aml_misalignment_db",
    "Antenna misalignment loss",
    PropertyDefault::Float(0.0),
)
.with_unit("dB");

/// Atmospheric absorption.
pub const LOSSES_AA_ATMOS_DB: Property<f64, ScenarioScope> = Property::new(
    "losses/aa_atmos_db",
    "Atmospheric absorption",
    PropertyDefault::Float(0.0),
)
.with_unit("dB");

/// Rain attenuation.
pub const LOSSES_RAIN_ATT_DB: Property<f64, ScenarioScope> = Property::new(
    "losses/rain_att_db",
    "Rain attenuation",
    PropertyDefault::Float(0.0),
)
.with_unit("dB");

/// Polarization mismatch loss.
pub const LOSSES_PL_POLARIZATION_DB: Property<f64, ScenarioScope> = Property::new(
    "losses/pl_polarization_db",
    "Polarization mismatch loss",
    PropertyDefault::Float(0.0),
)
.with_unit("dB");

/// Pointing loss.
pub const LOSSES_L_POINTING_DB: Property<f64, ScenarioScope> = Property::new(
    "losses/l_pointing_db",
    "Pointing loss",
    PropertyDefault::Float(0.0),
)
.with_unit("dB");

/// Implementation loss.
pub const LOSSES_L_IMPL_DB: Property<f64, ScenarioScope> = Property::new(
    "losses/l_impl_db",
    "Implementation loss",
    PropertyDefault::Float(0.0),
)
.with_unit("dB");

// ============================================================================
// Noise (Scenario scope)
// ============================================================================

/// Receiver noise temperature.
pub const NOISE_RECEIVER_K: Property<f64, ScenarioScope> = Property::new(
    "noise/receiver_k",
    "Receiver noise temperature. Negative values are clamped to 0",
    PropertyDefault::Float(120.0),
)
.with_unit("K");

/// Clear-sky antenna temperature.
pub const NOISE_CLEAR_SKY_K: Property<f64, ScenarioScope> = Property::new(
    "noise/clear_sky_k",
    "Clear-sky antenna noise temperature. Negative values are clamped to 0",
    PropertyDefault::Float(30.0),
)
.with_unit("K");

/// Rain excess temperature.
pub const NOISE_RAIN_EXCESS_K: Property<f64, ScenarioScope> = Property::new(
    "noise/rain_excess_k",
    "Additional antenna noise temperature due to rain. Negative values are clamped to 0",
    PropertyDefault::Float(0.0),
)
.with_unit("K");

// ============================================================================
// Throughput, Latency, Coverage (Scenario scope)
// ============================================================================

/// Bit rate without a MODCOD table.
pub const THROUGHPUT_RB_MBPS: Property<f64, ScenarioScope> = Property::new(
    "throughput/rb_mbps",
    "Bit rate used when the MODCOD table is empty; otherwise Rb is derived from the active MODCOD",
    PropertyDefault::Float(10.0),
)
.with_unit("Mbps");

/// Required Eb/N0 without a MODCOD table.
pub const THROUGHPUT_EBN0_REQ_DB: Property<f64, ScenarioScope> = Property::new(
    "throughput/ebn0_req_db",
    "Required Eb/N0 used when the MODCOD table is empty",
    PropertyDefault::Float(4.0),
)
.with_unit("dB");

/// Processing delay.
pub const LATENCY_PROCESSING_MS: Property<f64, ScenarioScope> = Property::new(
    "latency/processing_ms",
    "On-board processing delay per hop. Negative values are clamped to 0",
    PropertyDefault::Float(2.0),
)
.with_unit("ms")
.with_aliases(&["latency/processing_delay_ms"]);

/// Switching delay.
pub const LATENCY_SWITCHING_MS: Property<f64, ScenarioScope> = Property::new(
    "latency/switching_ms",
    "Switching delay per hop. Negative values are clamped to 0",
    PropertyDefault::Float(1.0),
)
.with_unit("ms")
.with_aliases(&["latency/switching_delay_ms"]);

/// Minimum service elevation.
pub const COVERAGE_MIN_ELEVATION_DEG: Property<f64, ScenarioScope> = Property::new(
    "coverage/min_elevation_deg",
    "Minimum elevation for the above_min_elevation coverage flag",
    PropertyDefault::Float(10.0),
)
.with_unit("degrees");

// ============================================================================
// MODCOD (Scenario scope)
// ============================================================================

/// Automatic MODCOD selection.
pub const MODCOD_AUTO: Property<bool, ScenarioScope> = Property::new(
    "modcod/auto",
    "Select the MODCOD automatically with hysteresis. When false, modcod/default is used verbatim",
    PropertyDefault::Bool(true),
)
.with_aliases(&["modcod/auto_default"]);

/// Manual MODCOD name.
pub const MODCOD_DEFAULT: Property<String, ScenarioScope> = Property::new(
    "modcod/default",
    "Name of the MODCOD table entry used in manual mode",
    PropertyDefault::String("QPSK 1/2"),
);

/// Hysteresis for upgrades.
pub const MODCOD_HYSTERESIS_DB: Property<f64, ScenarioScope> = Property::new(
    "modcod/hysteresis_db",
    "Margin a more efficient MODCOD must clear before it is adopted",
    PropertyDefault::Float(1.0),
)
.with_unit("dB");

// ============================================================================
// Jamming Policy (Scenario scope)
// ============================================================================

/// Polarization isolation.
pub const JAMMING_POLARIZATION_ISOLATION_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/polarization_isolation_db",
    "Cross-polarization isolation added to every C/I; negative values favour the jammer",
    PropertyDefault::Float(-4.0),
)
.with_unit("dB");

/// Discrimination model.
pub const JAMMING_DISCRIMINATION_MODEL: Property<String, ScenarioScope> = Property::new(
    "jamming/discrimination_model",
    "Angular discrimination model: 'dynamic' (distance and elevation based, 10-29 dB) or 'fcc' (piecewise mask on the true off-axis angle)",
    PropertyDefault::String("dynamic"),
);

/// Generic overlap.
pub const JAMMING_GENERIC_OVERLAP: Property<f64, ScenarioScope> = Property::new(
    "jamming/generic_overlap",
    "Spectral overlap fraction applied by barrage and smart jammers to each hop",
    PropertyDefault::Float(0.8),
);

/// Mask: no discrimination below this angle.
pub const JAMMING_FCC_BORESIGHT_DEG: Property<f64, ScenarioScope> = Property::new(
    "jamming/fcc/boresight_deg",
    "FCC mask: angle below which discrimination is 0 dB",
    PropertyDefault::Float(0.1),
)
.with_unit("degrees");

/// Mask: end of the linear ramp.
pub const JAMMING_FCC_RAMP_END_DEG: Property<f64, ScenarioScope> = Property::new(
    "jamming/fcc/ramp_end_deg",
    "FCC mask: end of the linear ramp from 0 dB to peak_db",
    PropertyDefault::Float(1.0),
)
.with_unit("degrees");

/// Mask: end of the main lobe segment.
pub const JAMMING_FCC_MAIN_LOBE_END_DEG: Property<f64, ScenarioScope> = Property::new(
    "jamming/fcc/main_lobe_end_deg",
    "FCC mask: end of the peak_db - slope_db*log10(theta) segment",
    PropertyDefault::Float(7.0),
)
.with_unit("degrees");

/// Mask: end of the plateau.
pub const JAMMING_FCC_PLATEAU_END_DEG: Property<f64, ScenarioScope> = Property::new(
    "jamming/fcc/plateau_end_deg",
    "FCC mask: end of the constant plateau_db segment",
    PropertyDefault::Float(9.2),
)
.with_unit("degrees");

/// Mask: end of the sidelobe segment.
pub const JAMMING_FCC_SIDELOBE_END_DEG: Property<f64, ScenarioScope> = Property::new(
    "jamming/fcc/sidelobe_end_deg",
    "FCC mask: end of the sidelobe_db - slope_db*log10(theta) segment",
    PropertyDefault::Float(48.0),
)
.with_unit("degrees");

/// Mask: peak discrimination.
pub const JAMMING_FCC_PEAK_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/fcc/peak_db",
    "FCC mask: discrimination at the end of the ramp",
    PropertyDefault::Float(29.0),
)
.with_unit("dB");

/// Mask: logarithmic slope.
pub const JAMMING_FCC_SLOPE_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/fcc/slope_db",
    "FCC mask: logarithmic slope in dB per decade",
    PropertyDefault::Float(25.0),
)
.with_unit("dB");

/// Mask: plateau value.
pub const JAMMING_FCC_PLATEAU_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/fcc/plateau_db",
    "FCC mask: plateau discrimination",
    PropertyDefault::Float(8.0),
)
.with_unit("dB");

/// Mask: sidelobe intercept.
pub const JAMMING_FCC_SIDELOBE_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/fcc/sidelobe_db",
    "FCC mask: intercept of the sidelobe segment",
    PropertyDefault::Float(32.0),
)
.with_unit("dB");

/// Mask: backlobe value.
pub const JAMMING_FCC_BACKLOBE_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/fcc/backlobe_db",
    "FCC mask: discrimination beyond sidelobe_end_deg",
    PropertyDefault::Float(-10.0),
)
.with_unit("dB");

/// J/S threshold for CRITICO.
pub const JAMMING_JS_CRITICAL_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/js/critical_db",
    "Per-jammer J/S at or above which the jammer is CRITICO",
    PropertyDefault::Float(20.0),
)
.with_unit("dB");

/// J/S threshold for EFECTIVO.
pub const JAMMING_JS_EFFECTIVE_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/js/effective_db",
    "Per-jammer J/S at or above which the jammer is EFECTIVO",
    PropertyDefault::Float(10.0),
)
.with_unit("dB");

/// J/S threshold for MODERADO.
pub const JAMMING_JS_MODERATE_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/js/moderate_db",
    "Per-jammer J/S at or above which the jammer is MODERADO",
    PropertyDefault::Float(3.0),
)
.with_unit("dB");

/// J/S threshold for LEVE.
pub const JAMMING_JS_LIGHT_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/js/light_db",
    "Per-jammer J/S at or above which the jammer is LEVE; below it is INEFECTIVO",
    PropertyDefault::Float(0.0),
)
.with_unit("dB");

/// Combined degradation threshold for CRITICO.
pub const JAMMING_GLOBAL_CRITICAL_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/global/critical_db",
    "Combined degradation at or above which jamming is CRITICO",
    PropertyDefault::Float(10.0),
)
.with_unit("dB");

/// Combined degradation threshold for EFECTIVO.
pub const JAMMING_GLOBAL_EFFECTIVE_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/global/effective_db",
    "Combined degradation at or above which jamming is EFECTIVO and caps the end-to-end CINR",
    PropertyDefault::Float(5.0),
)
.with_unit("dB");

/// Combined degradation threshold for MODERADO.
pub const JAMMING_GLOBAL_MODERATE_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/global/moderate_db",
    "Combined degradation at or above which jamming is MODERADO",
    PropertyDefault::Float(2.0),
)
.with_unit("dB");

/// Combined degradation threshold for LIMITADO.
pub const JAMMING_GLOBAL_LIMITED_DB: Property<f64, ScenarioScope> = Property::new(
    "jamming/global/limited_db",
    "Combined degradation at or above which jamming is LIMITADO; below it is INEFECTIVO",
    PropertyDefault::Float(0.5),
)
.with_unit("dB");

// ============================================================================
// Jammer Properties (Jammer scope)
// ============================================================================

/// Jamming strategy.
pub const JAMMER_TYPE: Property<String, JammerScope> = Property::new(
    "jammer/type",
    "Jamming strategy: SPOT (frequency selective), BARRAGE or SMART (both hops, generic overlap)",
    PropertyDefault::String("SPOT"),
);

/// Antenna pattern.
pub const JAMMER_ANTENNA_TYPE: Property<String, JammerScope> = Property::new(
    "jammer/antenna_type",
    "Jammer antenna: OMNIDIRECTIONAL or DIRECTIONAL",
    PropertyDefault::String("OMNIDIRECTIONAL"),
);

/// Transmit power.
pub const JAMMER_POWER_DBW: Property<f64, JammerScope> = Property::new(
    "jammer/power_dbw",
    "Jammer transmit power; EIRP is power + antenna gain",
    PropertyDefault::Float(27.0),
)
.with_unit("dBW")
.with_aliases(&["jammer/power_tx_dbw"]);

/// Antenna gain.
pub const JAMMER_ANTENNA_GAIN_DBI: Property<f64, JammerScope> = Property::new(
    "jammer/antenna_gain_dbi",
    "Jammer antenna gain",
    PropertyDefault::Float(3.0),
)
.with_unit("dBi");

/// Centre frequency.
pub const JAMMER_CENTER_FREQUENCY_GHZ: Property<f64, JammerScope> = Property::new(
    "jammer/center_frequency_ghz",
    "Centre of the jamming band",
    PropertyDefault::Float(20.0),
)
.with_unit("GHz")
.with_aliases(&["jammer/frequency_ghz"]);

/// Bandwidth.
pub const JAMMER_BANDWIDTH_MHZ: Property<f64, JammerScope> = Property::new(
    "jammer/bandwidth_mhz",
    "Width of the jamming band",
    PropertyDefault::Float(20.0),
)
.with_unit("MHz");

/// Target hop.
pub const JAMMER_TARGET_PREFERENCE: Property<String, JammerScope> = Property::new(
    "jammer/target_preference",
    "Hop to attack: AUTO (detected from spectral overlap), UL or DL",
    PropertyDefault::String("AUTO"),
);

/// Surface distance.
pub const JAMMER_DISTANCE_KM: Property<f64, JammerScope> = Property::new(
    "jammer/distance_km",
    "Surface distance from the ground station",
    PropertyDefault::Float(50.0),
)
.with_unit("km")
.with_aliases(&["jammer/distance_from_gs_km"]);

/// Azimuth.
pub const JAMMER_AZIMUTH_DEG: Property<f64, JammerScope> = Property::new(
    "jammer/azimuth_deg",
    "Azimuth from the ground station, clockwise from the satellite's ground track",
    PropertyDefault::Float(0.0),
)
.with_unit("degrees");

/// Height above ground.
pub const JAMMER_ALTITUDE_KM: Property<f64, JammerScope> = Property::new(
    "jammer/altitude_km",
    "Height of the jammer above ground",
    PropertyDefault::Float(0.05),
)
.with_unit("km");

/// Activity flag.
pub const JAMMER_ACTIVE: Property<bool, JammerScope> = Property::new(
    "jammer/active",
    "Inactive jammers are kept but not evaluated",
    PropertyDefault::Bool(true),
);

