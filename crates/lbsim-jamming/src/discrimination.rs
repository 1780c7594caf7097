//! Angular discrimination of the victim antenna against a jammer.
//!
//! Two models are available. The FCC-style piecewise mask works on the true
//! off-axis angle between the wanted and the jamming direction. The dynamic
//! model derives an effective angle from the jammer and satellite distances,
//! widened with elevation, so discrimination varies continuously as a jammer
//! moves toward boresight.

use serde::{Deserialize, Serialize};

// ============================================================================
// Piecewise Mask
// ============================================================================

/// Constants of the FCC/ITU-R style off-axis mask (angles in degrees, gains in dB).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FccMask {
    /// Below this angle there is no discrimination.
    pub boresight_deg: f64,
    /// End of the linear ramp from 0 dB to `peak_db`.
    pub ramp_end_deg: f64,
    /// End of the first `peak_db − slope·log θ` segment.
    pub main_lobe_end_deg: f64,
    /// End of the constant `plateau_db` segment.
    pub plateau_end_deg: f64,
    /// End of the `sidelobe_db − slope·log θ` segment.
    pub sidelobe_end_deg: f64,
    /// Discrimination at the end of the ramp (dB).
    pub peak_db: f64,
    /// Logarithmic slope (dB per decade).
    pub slope_db: f64,
    /// Plateau value (dB).
    pub plateau_db: f64,
    /// Intercept of the sidelobe segment (dB).
    pub sidelobe_db: f64,
    /// Value beyond `sidelobe_end_deg` (dB).
    pub backlobe_db: f64,
}

impl Default for FccMask {
    fn default() -> Self {
        Self {
            boresight_deg: 0.1,
            ramp_end_deg: 1.0,
            main_lobe_end_deg: 7.0,
            plateau_end_deg: 9.2,
            sidelobe_end_deg: 48.0,
            peak_db: 29.0,
            slope_db: 25.0,
            plateau_db: 8.0,
            sidelobe_db: 32.0,
            backlobe_db: -10.0,
        }
    }
}

impl FccMask {
    /// Discrimination (dB) for an off-axis angle. NaN passes through.
    pub fn discrimination_db(&self, theta_deg: f64) -> f64 {
        let theta = theta_deg.abs();
        if theta.is_nan() {
            f64::NAN
        } else if theta < self.boresight_deg {
            0.0
        } else if theta < self.ramp_end_deg {
            self.peak_db * theta / self.ramp_end_deg
        } else if theta <= self.main_lobe_end_deg {
            self.peak_db - self.slope_db * theta.log10()
        } else if theta <= self.plateau_end_deg {
            self.plateau_db
        } else if theta <= self.sidelobe_end_deg {
            self.sidelobe_db - self.slope_db * theta.log10()
        } else {
            self.backlobe_db
        }
    }
}

// ============================================================================
// Dynamic Model
// ============================================================================

const ELEVATION_WEIGHT: f64 = 0.5;
const HIGH_SEPARATION_DEG: f64 = 10.0;
const MEDIUM_SEPARATION_DEG: f64 = 2.0;
const MEDIUM_REFERENCE_DB: f64 = 21.47;
const MEDIUM_SLOPE_DB_PER_DEG: f64 = 3.0;
const LOW_SLOPE_DB_PER_DEG: f64 = 15.0;
const MIN_DISCRIMINATION_DB: f64 = 10.0;
const MAX_DISCRIMINATION_DB: f64 = 29.0;

/// Angular separation class of the dynamic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeparationClass {
    /// Effective angle of at least 10°.
    #[serde(rename = "SEPARACION_ALTA")]
    High,
    /// Effective angle in [2°, 10°).
    #[serde(rename = "SEPARACION_MEDIA")]
    Medium,
    /// Effective angle below 2°.
    #[serde(rename = "SEPARACION_BAJA")]
    Low,
}

impl SeparationClass {
    /// Export label.
    pub fn label(&self) -> &'static str {
        match self {
            SeparationClass::High => "SEPARACION_ALTA",
            SeparationClass::Medium => "SEPARACION_MEDIA",
            SeparationClass::Low => "SEPARACION_BAJA",
        }
    }
}

/// Result of the dynamic discrimination model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DynamicDiscrimination {
    /// Discrimination clamped to [10, 29] dB.
    pub discrimination_db: f64,
    /// Effective separation angle (degrees).
    pub effective_angle_deg: f64,
    /// Elevation widening factor `1 + E/90·0.5`.
    pub elevation_factor: f64,
    /// Separation class.
    pub class: SeparationClass,
}

/// Dynamic discrimination from the jammer distance, the satellite slant range
/// and the satellite elevation.
pub fn dynamic_discrimination(
    jammer_distance_km: f64,
    satellite_distance_km: f64,
    elevation_deg: f64,
) -> DynamicDiscrimination {
    let base_angle = if satellite_distance_km > 0.0 {
        (jammer_distance_km / satellite_distance_km).atan().to_degrees()
    } else {
        90.0
    };
    let elevation_factor = 1.0 + elevation_deg.max(0.0) / 90.0 * ELEVATION_WEIGHT;
    let theta = base_angle * elevation_factor;

    let (raw, class) = if theta >= HIGH_SEPARATION_DEG {
        (MAX_DISCRIMINATION_DB - 25.0 * theta.log10(), SeparationClass::High)
    } else if theta >= MEDIUM_SEPARATION_DEG {
        (
            MEDIUM_REFERENCE_DB - MEDIUM_SLOPE_DB_PER_DEG * (HIGH_SEPARATION_DEG - theta),
            SeparationClass::Medium,
        )
    } else {
        (
            (MEDIUM_REFERENCE_DB - LOW_SLOPE_DB_PER_DEG * (MEDIUM_SEPARATION_DEG - theta))
                .max(MIN_DISCRIMINATION_DB),
            SeparationClass::Low,
        )
    };

    DynamicDiscrimination {
        discrimination_db: raw.clamp(MIN_DISCRIMINATION_DB, MAX_DISCRIMINATION_DB),
        effective_angle_deg: theta,
        elevation_factor,
        class,
    }
}

/// Which discrimination model the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscriminationModel {
    /// Distance/elevation based model.
    #[default]
    Dynamic,
    /// Piecewise mask on the true off-axis angle.
    Fcc,
}

impl DiscriminationModel {
    /// Parse a configuration label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "dynamic" => Some(DiscriminationModel::Dynamic),
            "fcc" | "itu" => Some(DiscriminationModel::Fcc),
            _ => None,
        }
    }
}
