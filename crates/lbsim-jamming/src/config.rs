//! Jammer configuration and jammer sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised when editing or exchanging jammer sets.
#[derive(Debug, Error)]
pub enum JammerError {
    /// YAML parse or serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A jammer with this id already exists.
    #[error("Duplicate jammer id: {0}")]
    DuplicateId(String),

    /// No jammer with this id.
    #[error("Jammer not found: {0}")]
    NotFound(String),
}

// ============================================================================
// Jammer Enumerations
// ============================================================================

/// Jamming strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JammerType {
    /// Wideband blanket interference.
    Barrage,
    /// Narrowband interference aimed at one carrier.
    #[default]
    Spot,
    /// Adaptive interference following the link.
    Smart,
}

impl JammerType {
    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            JammerType::Barrage => "Barrage Jamming",
            JammerType::Spot => "Spot Jamming",
            JammerType::Smart => "Smart/Adaptive Jamming",
        }
    }

    /// Parse a configuration label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "BARRAGE" => Some(JammerType::Barrage),
            "SPOT" => Some(JammerType::Spot),
            "SMART" | "ADAPTIVE" => Some(JammerType::Smart),
            _ => None,
        }
    }
}

impl fmt::Display for JammerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JammerType::Barrage => "BARRAGE",
            JammerType::Spot => "SPOT",
            JammerType::Smart => "SMART",
        })
    }
}

/// Jammer antenna pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AntennaType {
    /// Isotropic in azimuth.
    #[default]
    Omnidirectional,
    /// Pointed at the victim.
    Directional,
}

impl AntennaType {
    /// Parse a configuration label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "OMNIDIRECTIONAL" | "OMNI" => Some(AntennaType::Omnidirectional),
            "DIRECTIONAL" => Some(AntennaType::Directional),
            _ => None,
        }
    }
}

/// Which hop a jammer is configured to attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetPreference {
    /// Decide from spectral overlap (spot) or attack both hops (barrage, smart).
    #[default]
    Auto,
    /// Always the uplink.
    #[serde(alias = "UL")]
    Uplink,
    /// Always the downlink.
    #[serde(alias = "DL")]
    Downlink,
}

impl TargetPreference {
    /// Parse a configuration label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "AUTO" => Some(TargetPreference::Auto),
            "UL" | "UPLINK" => Some(TargetPreference::Uplink),
            "DL" | "DOWNLINK" => Some(TargetPreference::Downlink),
            _ => None,
        }
    }
}

// ============================================================================
// Jammer Configuration
// ============================================================================

/// A ground-based jammer. Every field is always present; missing fields in
/// imported documents take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JammerConfig {
    /// Unique id within a set.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Jamming strategy.
    pub jammer_type: JammerType,
    /// Antenna pattern.
    pub antenna_type: AntennaType,
    /// Transmit power (dBW).
    #[serde(alias = "power_tx_dbw")]
    pub power_dbw: f64,
    /// Antenna gain (dBi).
    pub antenna_gain_dbi: f64,
    /// Centre of the jamming band (GHz).
    #[serde(alias = "frequency_ghz")]
    pub center_frequency_ghz: f64,
    /// Jamming bandwidth (MHz).
    pub bandwidth_mhz: f64,
    /// Hop to attack.
    pub target_preference: TargetPreference,
    /// Surface distance from the ground station (km).
    #[serde(alias = "distance_from_gs_km")]
    pub distance_km: f64,
    /// Azimuth from the ground station, clockwise from north (degrees).
    pub azimuth_deg: f64,
    /// Height above ground (km).
    pub altitude_km: f64,
    /// Inactive jammers are kept in the set but not evaluated.
    pub active: bool,
}

impl JammerConfig {
    /// Default transmit power (dBW).
    pub const DEFAULT_POWER_DBW: f64 = 27.0;
    /// Default antenna gain (dBi).
    pub const DEFAULT_ANTENNA_GAIN_DBI: f64 = 3.0;
    /// Default centre frequency (GHz).
    pub const DEFAULT_CENTER_FREQUENCY_GHZ: f64 = 20.0;
    /// Default bandwidth (MHz).
    pub const DEFAULT_BANDWIDTH_MHZ: f64 = 20.0;
    /// Default surface distance (km).
    pub const DEFAULT_DISTANCE_KM: f64 = 50.0;
    /// Default height above ground (km).
    pub const DEFAULT_ALTITUDE_KM: f64 = 0.05;

    /// Create a jammer with default parameters.
    pub fn new(id: &str, name: &str, jammer_type: JammerType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            jammer_type,
            ..Default::default()
        }
    }

    /// EIRP = power + gain (dBW).
    pub fn eirp_dbw(&self) -> f64 {
        self.power_dbw + self.antenna_gain_dbi
    }

    /// Straight-line distance to the ground station (km).
    pub fn distance_3d_km(&self) -> f64 {
        self.distance_km.hypot(self.altitude_km)
    }

    /// Elevation of the jammer seen from the ground station (degrees).
    pub fn elevation_deg(&self) -> f64 {
        if self.distance_km == 0.0 {
            if self.altitude_km > 0.0 {
                90.0
            } else {
                0.0
            }
        } else {
            self.altitude_km.atan2(self.distance_km).to_degrees()
        }
    }
}

impl Default for JammerConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            jammer_type: JammerType::default(),
            antenna_type: AntennaType::default(),
            power_dbw: Self::DEFAULT_POWER_DBW,
            antenna_gain_dbi: Self::DEFAULT_ANTENNA_GAIN_DBI,
            center_frequency_ghz: Self::DEFAULT_CENTER_FREQUENCY_GHZ,
            bandwidth_mhz: Self::DEFAULT_BANDWIDTH_MHZ,
            target_preference: TargetPreference::default(),
            distance_km: Self::DEFAULT_DISTANCE_KM,
            azimuth_deg: 0.0,
            altitude_km: Self::DEFAULT_ALTITUDE_KM,
            active: true,
        }
    }
}

// ============================================================================
// Jammer Set
// ============================================================================

/// Serialized form of a jammer set: a map keyed by jammer id.
#[derive(Debug, Default, Serialize, Deserialize)]
struct JammerSetDocument {
    #[serde(default)]
    jammers: BTreeMap<String, JammerConfig>,
}

/// Jammers keyed by id, iterated in id order.
#[derive(Debug, Clone, Default)]
pub struct JammerSet {
    jammers: BTreeMap<String, JammerConfig>,
}

impl JammerSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a jammer; fails if the id is already present.
    pub fn add(&mut self, jammer: JammerConfig) -> Result<(), JammerError> {
        if self.jammers.contains_key(&jammer.id) {
            return Err(JammerError::DuplicateId(jammer.id));
        }
        self.jammers.insert(jammer.id.clone(), jammer);
        Ok(())
    }

    /// Insert or replace a jammer.
    pub fn upsert(&mut self, jammer: JammerConfig) {
        self.jammers.insert(jammer.id.clone(), jammer);
    }

    /// Remove a jammer by id.
    pub fn remove(&mut self, id: &str) -> Result<JammerConfig, JammerError> {
        self.jammers
            .remove(id)
            .ok_or_else(|| JammerError::NotFound(id.to_string()))
    }

    /// Look up a jammer by id.
    pub fn get(&self, id: &str) -> Option<&JammerConfig> {
        self.jammers.get(id)
    }

    /// All jammers in id order.
    pub fn iter(&self) -> impl Iterator<Item = &JammerConfig> {
        self.jammers.values()
    }

    /// Active jammers in id order.
    pub fn active(&self) -> impl Iterator<Item = &JammerConfig> {
        self.jammers.values().filter(|j| j.active)
    }

    /// Number of jammers (active or not).
    pub fn len(&self) -> usize {
        self.jammers.len()
    }

    /// True if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.jammers.is_empty()
    }

    fn document(&self) -> JammerSetDocument {
        JammerSetDocument {
            jammers: self.jammers.clone(),
        }
    }

    /// Serialize as YAML.
    pub fn export_yaml(&self) -> Result<String, JammerError> {
        Ok(serde_yaml::to_string(&self.document())?)
    }

    /// Serialize as pretty JSON.
    pub fn export_json(&self) -> Result<String, JammerError> {
        Ok(serde_json::to_string_pretty(&self.document())?)
    }

    /// Replace the contents of this set with a YAML or JSON document.
    ///
    /// Map keys are the jammer ids; an `id` field inside an entry is overridden
    /// by its key. Returns the number of jammers loaded.
    pub fn import_str(&mut self, document: &str) -> Result<usize, JammerError> {
        let parsed: JammerSetDocument = serde_yaml::from_str(document)?;
        self.jammers.clear();
        for (id, mut jammer) in parsed.jammers {
            jammer.id = id.clone();
            if jammer.name.is_empty() {
                jammer.name = id.clone();
            }
            self.jammers.insert(id, jammer);
        }
        Ok(self.jammers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jammer_defaults() {
        let j = JammerConfig::new("j1", "Test", JammerType::Spot);
        assert_eq!(j.eirp_dbw(), 30.0);
        assert!(j.active);
        assert!((j.distance_3d_km() - (50.0f64 * 50.0 + 0.05 * 0.05).sqrt()).abs() < 1e-12);
        assert!((j.elevation_deg() - (0.05f64 / 50.0).atan().to_degrees()).abs() < 1e-12);
    }

    #[test]
    fn test_jammer_elevation_special_cases() {
        let mut j = JammerConfig::default();
        j.distance_km = 0.0;
        assert_eq!(j.elevation_deg(), 90.0);
        j.altitude_km = 0.0;
        assert_eq!(j.elevation_deg(), 0.0);
    }

    #[test]
    fn test_type_descriptions() {
        assert_eq!(JammerType::Barrage.description(), "Barrage Jamming");
        assert_eq!(JammerType::parse("adaptive"), Some(JammerType::Smart));
        assert_eq!(JammerType::parse("sweep"), None);
        assert_eq!(TargetPreference::parse("dl"), Some(TargetPreference::Downlink));
    }

    #[test]
    fn test_set_add_remove() {
        let mut set = JammerSet::new();
        set.add(JammerConfig::new("a", "A", JammerType::Spot)).unwrap();
        assert!(matches!(
            set.add(JammerConfig::new("a", "A2", JammerType::Barrage)),
            Err(JammerError::DuplicateId(_))
        ));
        let mut b = JammerConfig::new("b", "B", JammerType::Barrage);
        b.active = false;
        set.add(b).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.active().count(), 1);

        set.remove("a").unwrap();
        assert!(matches!(set.remove("a"), Err(JammerError::NotFound(_))));
    }

    #[test]
    fn test_export_import_replaces_contents() {
        let mut set = JammerSet::new();
        let mut j = JammerConfig::new("north", "North site", JammerType::Barrage);
        j.power_dbw = 40.0;
        j.azimuth_deg = 15.0;
        set.add(j.clone()).unwrap();

        let json = set.export_json().unwrap();
        let yaml = set.export_yaml().unwrap();

        let mut other = JammerSet::new();
        other.add(JammerConfig::new("stale", "Stale", JammerType::Spot)).unwrap();
        assert_eq!(other.import_str(&json).unwrap(), 1);
        assert!(other.get("stale").is_none());
        assert_eq!(other.get("north"), Some(&j));

        let mut from_yaml = JammerSet::new();
        from_yaml.import_str(&yaml).unwrap();
        assert_eq!(from_yaml.get("north"), Some(&j));
    }

    #[test]
    fn test_import_legacy_field_names() {
        let doc = r#"
jammers:
  j7:
    name: Legacy
    jammer_type: SMART
    antenna_type: DIRECTIONAL
    power_tx_dbw: 35.0
    antenna_gain_dbi: 10.0
    frequency_ghz: 14.0
    bandwidth_mhz: 36.0
    distance_from_gs_km: 12.0
    azimuth_deg: 270.0
    active: false
"#;
        let mut set = JammerSet::new();
        set.import_str(doc).unwrap();
        let j = set.get("j7").unwrap();
        assert_eq!(j.id, "j7");
        assert_eq!(j.jammer_type, JammerType::Smart);
        assert_eq!(j.antenna_type, AntennaType::Directional);
        assert_eq!(j.eirp_dbw(), 45.0);
        assert_eq!(j.center_frequency_ghz, 14.0);
        assert_eq!(j.distance_km, 12.0);
        assert_eq!(j.altitude_km, JammerConfig::DEFAULT_ALTITUDE_KM);
        assert!(!j.active);
    }
}
