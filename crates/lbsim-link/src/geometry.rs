//! Circular-orbit geometry between a ground station and a satellite.
//!
//! Angles are in degrees at the API boundary. The central angle Δ is the
//! Earth-centred angle between the ground station and the sub-satellite point.

use lbsim_common::{OrbitMode, EARTH_MU_M3_S2, EARTH_RADIUS_M};
use serde::Serialize;
use std::f64::consts::PI;

/// Altitude of the geostationary orbit above the mean Earth radius (m).
pub const GEO_ALTITUDE_M: f64 = 35_786_000.0;

// ============================================================================
// Ground Geometry
// ============================================================================

/// Geometry of the ground-station/satellite pair for one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundGeometry {
    /// Central angle folded into [0, 180] degrees.
    pub central_angle_deg: f64,
    /// Slant range (km).
    pub slant_range_km: f64,
    /// Elevation above the local horizon (degrees).
    pub elevation_deg: f64,
    /// True when the elevation is strictly positive.
    pub visible: bool,
}

/// Fold an arbitrary angular separation onto the shortest arc, [0, 180].
pub fn fold_central_angle(delta_deg: f64) -> f64 {
    let wrapped = delta_deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        360.0 - wrapped
    } else {
        wrapped
    }
}

/// Slant range, elevation and visibility for a central angle and orbital radius.
pub fn ground_geometry(central_angle_deg: f64, orbital_radius_m: f64) -> GroundGeometry {
    let delta = fold_central_angle(central_angle_deg);
    let re_km = EARTH_RADIUS_M / 1000.0;
    let ro_km = orbital_radius_m / 1000.0;
    let cos_delta = delta.to_radians().cos();

    let slant_km = (re_km * re_km + ro_km * ro_km - 2.0 * re_km * ro_km * cos_delta)
        .max(0.0)
        .sqrt();

    let elevation_deg = if slant_km == 0.0 {
        90.0
    } else {
        let sin_e = ((ro_km * cos_delta - re_km) / slant_km).clamp(-1.0, 1.0);
        sin_e.asin().to_degrees()
    };

    GroundGeometry {
        central_angle_deg: delta,
        slant_range_km: slant_km,
        elevation_deg,
        visible: elevation_deg > 0.0,
    }
}

/// Central angle at which the satellite sits on the horizon: `acos(Re/Ro)`.
pub fn horizon_central_angle_deg(orbital_radius_m: f64) -> f64 {
    (EARTH_RADIUS_M / orbital_radius_m).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Central angle that places the satellite at `elevation_deg`.
pub fn central_angle_for_elevation(elevation_deg: f64, orbital_radius_m: f64) -> f64 {
    let e = elevation_deg.to_radians();
    let ratio = (EARTH_RADIUS_M * e.cos() / orbital_radius_m).clamp(-1.0, 1.0);
    ratio.acos().to_degrees() - elevation_deg
}

// ============================================================================
// Orbital Dynamics
// ============================================================================

/// Circular orbital speed (m/s).
pub fn orbital_velocity_m_s(orbital_radius_m: f64) -> f64 {
    (EARTH_MU_M3_S2 / orbital_radius_m).sqrt()
}

/// Angular rate of the satellite around the Earth (deg/s).
pub fn angular_velocity_deg_s(orbital_radius_m: f64) -> f64 {
    (orbital_velocity_m_s(orbital_radius_m) / orbital_radius_m).to_degrees()
}

/// Orbital period (s).
pub fn orbital_period_s(orbital_radius_m: f64) -> f64 {
    2.0 * PI * (orbital_radius_m.powi(3) / EARTH_MU_M3_S2).sqrt()
}

/// Kinematic state of the satellite relative to the ground station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitalState {
    /// Central angle (degrees).
    pub central_angle_deg: f64,
    /// Orbital radius (km).
    pub orbital_radius_km: f64,
    /// Orbital speed (km/s).
    pub orbital_velocity_kms: f64,
    /// Angular rate (deg/s).
    pub angular_velocity_deg_s: f64,
    /// Slant-range rate (km/s). Negative while approaching.
    pub range_rate_kms: f64,
    /// Orbital period (minutes).
    pub orbital_period_min: f64,
    /// Time until the satellite sets (s); zero when not visible.
    pub visibility_remaining_s: f64,
}

/// Derive the orbital state for the current geometry.
///
/// `previous_central_angle_deg` is the folded central angle of the previous tick;
/// a decreasing central angle means the satellite is approaching and the range
/// rate is reported negative. Without a previous sample the satellite is taken as
/// receding.
///
/// GEO satellites keep a fixed central angle, so their range rate is zero and
/// the visibility window is undefined (NaN).
pub fn orbital_state(
    mode: OrbitMode,
    geometry: &GroundGeometry,
    previous_central_angle_deg: Option<f64>,
    orbital_radius_m: f64,
) -> OrbitalState {
    let v_m_s = orbital_velocity_m_s(orbital_radius_m);
    let omega_rad_s = v_m_s / orbital_radius_m;
    let omega_deg_s = omega_rad_s.to_degrees();
    let delta = geometry.central_angle_deg;

    let (range_rate_kms, visibility_remaining_s) = match mode {
        OrbitMode::Leo => {
            let slant = geometry.slant_range_km;
            let rate = if slant > 0.0 {
                let re_km = EARTH_RADIUS_M / 1000.0;
                let ro_km = orbital_radius_m / 1000.0;
                let magnitude = re_km * ro_km * delta.to_radians().sin() / slant * omega_rad_s;
                match previous_central_angle_deg {
                    Some(previous) if delta < previous => -magnitude,
                    _ => magnitude,
                }
            } else {
                0.0
            };
            let remaining = if geometry.visible {
                (horizon_central_angle_deg(orbital_radius_m) - delta).max(0.0) / omega_deg_s
            } else {
                0.0
            };
            (rate, remaining)
        }
        OrbitMode::Geo => (0.0, f64::NAN),
    };

    OrbitalState {
        central_angle_deg: delta,
        orbital_radius_km: orbital_radius_m / 1000.0,
        orbital_velocity_kms: v_m_s / 1000.0,
        angular_velocity_deg_s: omega_deg_s,
        range_rate_kms,
        orbital_period_min: orbital_period_s(orbital_radius_m) / 60.0,
        visibility_remaining_s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEO_RADIUS_M: f64 = EARTH_RADIUS_M + 550_000.0;

    #[test]
    fn test_fold_central_angle() {
        assert_eq!(fold_central_angle(30.0), 30.0);
        assert_eq!(fold_central_angle(-30.0), 30.0);
        assert_eq!(fold_central_angle(350.0), 10.0);
        assert_eq!(fold_central_angle(540.0), 180.0);
    }

    #[test]
    fn test_overhead_pass() {
        let g = ground_geometry(0.0, LEO_RADIUS_M);
        assert!((g.slant_range_km - 550.0).abs() < 1e-6);
        assert!((g.elevation_deg - 90.0).abs() < 1e-6);
        assert!(g.visible);
    }

    #[test]
    fn test_visibility_boundary_at_horizon() {
        let horizon = horizon_central_angle_deg(LEO_RADIUS_M);
        let at = ground_geometry(horizon, LEO_RADIUS_M);
        assert!(at.elevation_deg.abs() < 1e-6);

        // Visibility switches on as Δ decreases through the horizon angle
        let mut was_visible = false;
        let mut switched = 0;
        for step in 0..200 {
            let delta = horizon + 1.0 - step as f64 * 0.01;
            let g = ground_geometry(delta, LEO_RADIUS_M);
            if g.visible != was_visible {
                assert!(g.visible, "visibility must only turn on while approaching");
                assert!(delta < horizon + 0.011);
                switched += 1;
            }
            was_visible = g.visible;
        }
        assert_eq!(switched, 1);
    }

    #[test]
    fn test_elevation_roundtrip() {
        for elevation in [5.0, 10.0, 45.0, 80.0] {
            let delta = central_angle_for_elevation(elevation, LEO_RADIUS_M);
            let g = ground_geometry(delta, LEO_RADIUS_M);
            assert!((g.elevation_deg - elevation).abs() < 1e-6);
        }
    }

    #[test]
    fn test_orbital_parameters_leo() {
        let g = ground_geometry(10.0, LEO_RADIUS_M);
        let state = orbital_state(OrbitMode::Leo, &g, None, LEO_RADIUS_M);
        assert!((state.orbital_velocity_kms - 7.59).abs() < 0.01);
        assert!((state.orbital_period_min - 95.6).abs() < 0.2);
        assert!(state.range_rate_kms > 0.0);
        assert!(state.visibility_remaining_s > 0.0);
    }

    #[test]
    fn test_range_rate_sign_follows_direction() {
        let g = ground_geometry(10.0, LEO_RADIUS_M);
        let receding = orbital_state(OrbitMode::Leo, &g, Some(9.0), LEO_RADIUS_M);
        let approaching = orbital_state(OrbitMode::Leo, &g, Some(11.0), LEO_RADIUS_M);
        assert!(receding.range_rate_kms > 0.0);
        assert!((approaching.range_rate_kms + receding.range_rate_kms).abs() < 1e-12);
    }

    #[test]
    fn test_not_visible_has_no_remaining_time() {
        let g = ground_geometry(60.0, LEO_RADIUS_M);
        assert!(!g.visible);
        let state = orbital_state(OrbitMode::Leo, &g, None, LEO_RADIUS_M);
        assert_eq!(state.visibility_remaining_s, 0.0);
    }

    #[test]
    fn test_geo_state() {
        let radius = EARTH_RADIUS_M + GEO_ALTITUDE_M;
        let g = ground_geometry(20.0, radius);
        assert!(g.visible);
        assert!(g.slant_range_km > GEO_ALTITUDE_M / 1000.0);
        let state = orbital_state(OrbitMode::Geo, &g, Some(19.0), radius);
        assert_eq!(state.range_rate_kms, 0.0);
        assert!(state.visibility_remaining_s.is_nan());
        assert!((state.orbital_period_min - 1436.0).abs() < 2.0);
    }
}
