//! Jammer position relative to the ground station and the satellite.
//!
//! Positions are expressed in a local east-north-up frame centred on the
//! ground station, with the satellite placed along azimuth 0 at its slant
//! range and elevation.

use crate::config::JammerConfig;
use serde::Serialize;

type Vec3 = [f64; 3];

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Angle between two vectors in degrees; 0 when either is degenerate.
fn angle_between_deg(a: Vec3, b: Vec3) -> f64 {
    let denom = norm(a) * norm(b);
    if denom <= 0.0 || denom.is_nan() {
        return 0.0;
    }
    (dot(a, b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Distances and off-axis angles of one jammer for the current geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JammerGeometry {
    /// Jammer to ground station (km); the downlink interference path.
    pub to_ground_station_km: f64,
    /// Jammer to satellite (km); the uplink interference path.
    pub to_satellite_km: f64,
    /// Angle between satellite and jammer seen from the ground station (degrees).
    pub off_axis_at_ground_deg: f64,
    /// Angle between ground station and jammer seen from the satellite (degrees).
    pub off_axis_at_satellite_deg: f64,
}

impl JammerGeometry {
    /// Compute the geometry for a satellite at `slant_range_km` and `elevation_deg`.
    ///
    /// NaN slant range or elevation yields NaN satellite-side quantities.
    pub fn compute(jammer: &JammerConfig, slant_range_km: f64, elevation_deg: f64) -> Self {
        let elevation = elevation_deg.to_radians();
        let satellite = [
            0.0,
            slant_range_km * elevation.cos(),
            slant_range_km * elevation.sin(),
        ];
        let azimuth = jammer.azimuth_deg.to_radians();
        let position = [
            jammer.distance_km * azimuth.sin(),
            jammer.distance_km * azimuth.cos(),
            jammer.altitude_km,
        ];

        let satellite_to_jammer = sub(position, satellite);
        let satellite_to_ground = sub([0.0; 3], satellite);
        let satellite_known = !(slant_range_km.is_nan() || elevation_deg.is_nan());
        let nan_unless_known = |value: f64| if satellite_known { value } else { f64::NAN };

        Self {
            to_ground_station_km: norm(position),
            to_satellite_km: nan_unless_known(norm(satellite_to_jammer)),
            off_axis_at_ground_deg: nan_unless_known(angle_between_deg(satellite, position)),
            off_axis_at_satellite_deg: nan_unless_known(angle_between_deg(
                satellite_to_ground,
                satellite_to_jammer,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JammerType;

    #[test]
    fn test_jammer_under_satellite_track() {
        let mut jammer = JammerConfig::new("j", "j", JammerType::Spot);
        jammer.distance_km = 100.0;
        jammer.altitude_km = 0.0;
        jammer.azimuth_deg = 0.0;
        let g = JammerGeometry::compute(&jammer, 1000.0, 0.0);
        assert!((g.to_ground_station_km - 100.0).abs() < 1e-9);
        assert!((g.to_satellite_km - 900.0).abs() < 1e-9);
        assert!(g.off_axis_at_ground_deg.abs() < 1e-9);
        assert!(g.off_axis_at_satellite_deg.abs() < 1e-9);
    }

    #[test]
    fn test_jammer_behind_ground_station() {
        let mut jammer = JammerConfig::new("j", "j", JammerType::Spot);
        jammer.distance_km = 100.0;
        jammer.altitude_km = 0.0;
        jammer.azimuth_deg = 180.0;
        let g = JammerGeometry::compute(&jammer, 1000.0, 0.0);
        assert!((g.to_satellite_km - 1100.0).abs() < 1e-6);
        assert!((g.off_axis_at_ground_deg - 180.0).abs() < 1e-5);
    }

    #[test]
    fn test_jammer_to_side() {
        let mut jammer = JammerConfig::new("j", "j", JammerType::Spot);
        jammer.distance_km = 50.0;
        jammer.altitude_km = 0.0;
        jammer.azimuth_deg = 90.0;
        let g = JammerGeometry::compute(&jammer, 750.0, 90.0);
        assert!((g.off_axis_at_ground_deg - 90.0).abs() < 1e-6);
        let expected = (50.0f64 / 750.0).atan().to_degrees();
        assert!((g.off_axis_at_satellite_deg - expected).abs() < 1e-6);
        assert!((g.to_satellite_km - 750.0f64.hypot(50.0)).abs() < 1e-6);
    }

    #[test]
    fn test_co_located_jammer() {
        let mut jammer = JammerConfig::new("j", "j", JammerType::Spot);
        jammer.distance_km = 0.0;
        jammer.altitude_km = 0.0;
        let g = JammerGeometry::compute(&jammer, 750.0, 45.0);
        assert_eq!(g.to_ground_station_km, 0.0);
        assert_eq!(g.off_axis_at_ground_deg, 0.0);
        assert!((g.to_satellite_km - 750.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_satellite() {
        let jammer = JammerConfig::default();
        let g = JammerGeometry::compute(&jammer, f64::NAN, 45.0);
        assert!(g.to_satellite_km.is_nan());
        assert!(g.to_ground_station_km > 0.0);
    }
}
