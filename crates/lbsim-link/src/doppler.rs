//! Doppler shift from range rate.

use crate::geometry::OrbitalState;
use lbsim_common::{OrbitMode, SPEED_OF_LIGHT_M_S};
use serde::Serialize;

/// Instantaneous and worst-case Doppler shift for one carrier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DopplerShift {
    /// `range_rate / c · f` (Hz).
    pub instantaneous_hz: f64,
    /// `orbital_velocity / c · f` (Hz).
    pub max_hz: f64,
}

impl DopplerShift {
    /// No Doppler figure available.
    pub fn undefined() -> Self {
        Self {
            instantaneous_hz: f64::NAN,
            max_hz: f64::NAN,
        }
    }
}

/// Doppler shift of `carrier_hz` for a visible LEO satellite; NaN otherwise.
pub fn doppler_shift(
    mode: OrbitMode,
    state: &OrbitalState,
    carrier_hz: f64,
    visible: bool,
) -> DopplerShift {
    if mode != OrbitMode::Leo || !visible {
        return DopplerShift::undefined();
    }
    DopplerShift {
        instantaneous_hz: state.range_rate_kms * 1000.0 / SPEED_OF_LIGHT_M_S * carrier_hz,
        max_hz: state.orbital_velocity_kms * 1000.0 / SPEED_OF_LIGHT_M_S * carrier_hz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ground_geometry, orbital_state};
    use lbsim_common::EARTH_RADIUS_M;

    #[test]
    fn test_doppler_bounded_by_max() {
        let radius = EARTH_RADIUS_M + 550_000.0;
        let g = ground_geometry(15.0, radius);
        let state = orbital_state(OrbitMode::Leo, &g, Some(16.0), radius);
        let shift = doppler_shift(OrbitMode::Leo, &state, 20e9, g.visible);
        assert!(shift.instantaneous_hz < 0.0);
        assert!(shift.instantaneous_hz.abs() <= shift.max_hz);
        // ~7.59 km/s at 20 GHz is about 506 kHz
        assert!((shift.max_hz / 1e3 - 506.0).abs() < 2.0);
    }

    #[test]
    fn test_doppler_undefined_cases() {
        let radius = EARTH_RADIUS_M + 550_000.0;
        let g = ground_geometry(15.0, radius);
        let state = orbital_state(OrbitMode::Leo, &g, None, radius);
        assert!(doppler_shift(OrbitMode::Leo, &state, 20e9, false).instantaneous_hz.is_nan());
        assert!(doppler_shift(OrbitMode::Geo, &state, 20e9, true).max_hz.is_nan());
    }
}
