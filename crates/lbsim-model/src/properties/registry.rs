//! The property table, name lookup, and the resolved/unresolved property sets.

use super::definitions::*;
use super::types::{Property, PropertyDef, PropertyScope, ScopeMarker};
use super::value::{FromPropertyValue, PropertyValue, ToPropertyValue};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::marker::PhantomData;
use thiserror::Error;

// ============================================================================
// All Properties Array (for runtime lookup)
// ============================================================================

/// All registered property definitions (for runtime lookup).
pub const ALL_PROPERTIES: &[&PropertyDef] = &[
    // Orbit baselines
    &LEO_ALTITUDE_KM.def,
    &LEO_EIRP_DBW.def,
    &LEO_GT_DBK.def,
    &GEO_ALTITUDE_KM.def,
    &GEO_EIRP_DBW.def,
    &GEO_GT_DBK.def,
    // Orbit state
    &ORBIT_MODE.def,
    &ORBIT_LEO_STEP_DEG.def,
    &ORBIT_GEO_LONGITUDE_OFFSET_DEG.def,
    // Animation and simulation
    &ANIMATION_TIME_SCALE_FACTOR.def,
    &ANIMATION_UPDATE_INTERVAL_MS.def,
    &SIMULATION_MAX_TIME_S.def,
    &SIMULATION_LINK_SENSE.def,
    // Power
    &POWER_SATURATED_EIRP_DBW.def,
    &POWER_INPUT_BACKOFF_DB.def,
    &POWER_MANUAL_OVERRIDE.def,
    &POWER_MANUAL_EIRP_DBW.def,
    // Losses
    &LOSSES_RFL_FEEDER_DB.def,
    &LOSSES_AML_MISALIGNMENT_DB.def,
    &LOSSES_AA_ATMOS_DB.def,
    &LOSSES_RAIN_ATT_DB.def,
    &LOSSES_PL_POLARIZATION_DB.def,
    &LOSSES_L_POINTING_DB.def,
    &LOSSES_L_IMPL_DB.def,
    // Noise
    &NOISE_RECEIVER_K.def,
    &NOISE_CLEAR_SKY_K.def,
    &NOISE_RAIN_EXCESS_K.def,
    // Throughput, latency, coverage
    &THROUGHPUT_RB_MBPS.def,
    &THROUGHPUT_EBN0_REQ_DB.def,
    &LATENCY_PROCESSING_MS.def,
    &LATENCY_SWITCHING_MS.def,
    &COVERAGE_MIN_ELEVATION_DEG.def,
    // MODCOD
    &MODCOD_AUTO.def,
    &MODCOD_DEFAULT.def,
    &MODCOD_HYSTERESIS_DB.def,
    // Jamming policy
    &JAMMING_POLARIZATION_ISOLATION_DB.def,
    &JAMMING_DISCRIMINATION_MODEL.def,
    &JAMMING_GENERIC_OVERLAP.def,
    &JAMMING_FCC_BORESIGHT_DEG.def,
    &JAMMING_FCC_RAMP_END_DEG.def,
    &JAMMING_FCC_MAIN_LOBE_END_DEG.def,
    &JAMMING_FCC_PLATEAU_END_DEG.def,
    &JAMMING_FCC_SIDELOBE_END_DEG.def,
    &JAMMING_FCC_PEAK_DB.def,
    &JAMMING_FCC_SLOPE_DB.def,
    &JAMMING_FCC_PLATEAU_DB.def,
    &JAMMING_FCC_SIDELOBE_DB.def,
    &JAMMING_FCC_BACKLOBE_DB.def,
    &JAMMING_JS_CRITICAL_DB.def,
    &JAMMING_JS_EFFECTIVE_DB.def,
    &JAMMING_JS_MODERATE_DB.def,
    &JAMMING_JS_LIGHT_DB.def,
    &JAMMING_GLOBAL_CRITICAL_DB.def,
    &JAMMING_GLOBAL_EFFECTIVE_DB.def,
    &JAMMING_GLOBAL_MODERATE_DB.def,
    &JAMMING_GLOBAL_LIMITED_DB.def,
    // Jammer (Jammer scope)
    &JAMMER_TYPE.def,
    &JAMMER_ANTENNA_TYPE.def,
    &JAMMER_POWER_DBW.def,
    &JAMMER_ANTENNA_GAIN_DBI.def,
    &JAMMER_CENTER_FREQUENCY_GHZ.def,
    &JAMMER_BANDWIDTH_MHZ.def,
    &JAMMER_TARGET_PREFERENCE.def,
    &JAMMER_DISTANCE_KM.def,
    &JAMMER_AZIMUTH_DEG.def,
    &JAMMER_ALTITUDE_KM.def,
    &JAMMER_ACTIVE.def,
];

// ============================================================================
// Lookup Functions
// ============================================================================

/// Look up a definition by name or alias.
pub fn get_property_def(name: &str) -> Option<&'static PropertyDef> {
    ALL_PROPERTIES.iter().copied().find(|p| p.matches(name))
}

/// Whether `name` is a registered name or alias.
pub fn is_known_property(name: &str) -> bool {
    get_property_def(name).is_some()
}

/// Sorted, de-duplicated namespaces.
pub fn known_namespaces() -> Vec<&'static str> {
    let namespaces: BTreeSet<&'static str> =
        ALL_PROPERTIES.iter().filter_map(|p| p.namespace()).collect();
    namespaces.into_iter().collect()
}

pub fn properties_by_scope(scope: PropertyScope) -> impl Iterator<Item = &'static PropertyDef> {
    ALL_PROPERTIES.iter().copied().filter(move |p| p.scope == scope)
}

pub fn properties_by_namespace(namespace: &str) -> impl Iterator<Item = &'static PropertyDef> + '_ {
    ALL_PROPERTIES
        .iter()
        .copied()
        .filter(move |p| p.namespace() == Some(namespace))
}

/// Built-in default for a property name or alias.
pub fn default_value(name: &str) -> Option<PropertyValue> {
    get_property_def(name).map(PropertyDef::default_value)
}

// ============================================================================
// Property Set Errors
// ============================================================================

/// Errors raised while filling a property set.
#[derive(Debug, Clone, Error)]
pub enum PropertySetError {
    /// No property with this name or alias.
    #[error("unknown {scope} property: '{name}'. Run \"lbsim properties\" for more details")]
    UnknownProperty { name: String, scope: PropertyScope },

    /// The property exists but belongs to the other scope.
    #[error("property '{name}' is a {actual} property, but was used in {expected} context")]
    WrongScope {
        name: String,
        actual: PropertyScope,
        expected: PropertyScope,
    },

    /// The YAML value has no property representation.
    #[error("invalid value for property '{name}': {kind}")]
    UnsupportedValue { name: String, kind: &'static str },

    #[error("type mismatch for property '{property}': expected {expected}, got {actual}")]
    TypeMismatch {
        property: String,
        expected: String,
        actual: String,
    },
}

fn check_type(def: &PropertyDef, value: &PropertyValue) -> Result<(), PropertySetError> {
    if def.value_type.matches(value) {
        Ok(())
    } else {
        Err(PropertySetError::TypeMismatch {
            property: def.name.to_string(),
            expected: def.value_type.to_string(),
            actual: value.type_name(),
        })
    }
}

// ============================================================================
// Resolved Property Set
// ============================================================================

/// Every property of scope `S`, each holding its default or an override.
#[derive(Debug, Clone)]
pub struct ResolvedProperties<S: ScopeMarker> {
    values: HashMap<&'static PropertyDef, PropertyValue>,
    _scope: PhantomData<S>,
}

impl<S: ScopeMarker> ResolvedProperties<S> {
    /// All properties of the scope at their built-in defaults.
    pub fn new() -> Self {
        Self {
            values: properties_by_scope(S::SCOPE)
                .map(|p| (p, p.default_value()))
                .collect(),
            _scope: PhantomData,
        }
    }

    pub fn scope(&self) -> PropertyScope {
        S::SCOPE
    }

    /// Override one property. `T` is fixed by the property, so this cannot mismatch.
    pub fn set<T: ToPropertyValue>(&mut self, prop: &'static Property<T, S>, value: T) {
        self.values.insert(&prop.def, value.to_property_value());
    }

    /// Typed read.
    ///
    /// ```ignore
    /// let props: ResolvedProperties<JammerScope> = ResolvedProperties::new();
    /// let power: f64 = props.get(&JAMMER_POWER_DBW);
    /// ```
    pub fn get<T: FromPropertyValue>(&self, prop: &Property<T, S>) -> T {
        let value = self.get_raw(prop);
        T::from_property_value(&value).expect("Types are validated on insertion")
    }

    pub fn get_raw<T>(&self, prop: &Property<T, S>) -> PropertyValue {
        self.values
            .get(&prop.def)
            .cloned()
            .unwrap_or_else(|| prop.def.default_value())
    }

    /// Overlay explicitly specified values.
    pub fn apply_unresolved(&mut self, unresolved: &UnresolvedProperties<S>) {
        self.values
            .extend(unresolved.values.iter().map(|(def, value)| (*def, value.clone())));
    }
}

impl<S: ScopeMarker> Default for ResolvedProperties<S> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Unresolved Property Set
// ============================================================================

/// Only the properties a scenario file spelled out, keyed by canonical definition.
///
/// Nested YAML maps flatten into `namespace/key` names:
///
/// ```yaml
/// jamming:
///   fcc:
///     peak_db: 30   # -> jamming/fcc/peak_db
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnresolvedProperties<S: ScopeMarker> {
    pub(crate) values: HashMap<&'static PropertyDef, PropertyValue>,
    _scope: PhantomData<S>,
}

impl<S: ScopeMarker> UnresolvedProperties<S> {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            _scope: PhantomData,
        }
    }

    pub fn scope(&self) -> PropertyScope {
        S::SCOPE
    }

    pub fn values(&self) -> &HashMap<&'static PropertyDef, PropertyValue> {
        &self.values
    }

    pub fn get_raw(&self, prop: &'static PropertyDef) -> Option<&PropertyValue> {
        self.values.get(prop)
    }

    pub fn contains<T>(&self, prop: &Property<T, S>) -> bool {
        self.values.contains_key(&prop.def)
    }

    /// Insert a raw value, checking it against the property's declared type.
    pub fn insert<T>(
        &mut self,
        prop: &'static Property<T, S>,
        value: PropertyValue,
    ) -> Result<(), PropertySetError> {
        check_type(&prop.def, &value)?;
        self.values.insert(&prop.def, value);
        Ok(())
    }

    /// Merge `other` into this set; `other` wins on conflicts.
    pub fn merge(&mut self, other: &UnresolvedProperties<S>) {
        self.values
            .extend(other.values.iter().map(|(def, value)| (*def, value.clone())));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a YAML mapping, flattening nested maps into `namespace/key` names.
    pub fn from_mapping(mapping: &serde_yaml::Mapping) -> Result<Self, PropertySetError> {
        let mut props = Self::new();
        props.insert_mapping("", mapping)?;
        Ok(props)
    }

    fn insert_mapping(
        &mut self,
        prefix: &str,
        mapping: &serde_yaml::Mapping,
    ) -> Result<(), PropertySetError> {
        for (key, value) in mapping {
            // Non-string keys fall through to an unknown-property error.
            let key = key
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{:?}", key));
            let name = if prefix.is_empty() {
                key
            } else {
                format!("{}/{}", prefix, key)
            };
            match value {
                serde_yaml::Value::Mapping(nested) => self.insert_mapping(&name, nested)?,
                leaf => self.insert_leaf(&name, leaf)?,
            }
        }
        Ok(())
    }

    fn insert_leaf(&mut self, name: &str, value: &serde_yaml::Value) -> Result<(), PropertySetError> {
        let def = get_property_def(name).ok_or_else(|| PropertySetError::UnknownProperty {
            name: name.to_string(),
            scope: S::SCOPE,
        })?;
        if def.scope != S::SCOPE {
            return Err(PropertySetError::WrongScope {
                name: name.to_string(),
                actual: def.scope,
                expected: S::SCOPE,
            });
        }

        let value = PropertyValue::try_from(value).map_err(|kind| {
            PropertySetError::UnsupportedValue {
                name: name.to_string(),
                kind,
            }
        })?;
        check_type(def, &value)?;
        self.values.insert(def, value);
        Ok(())
    }
}

impl<'de, S: ScopeMarker> Deserialize<'de> for UnresolvedProperties<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mapping = serde_yaml::Mapping::deserialize(deserializer)?;
        Self::from_mapping(&mapping).map_err(de::Error::custom)
    }
}

/// Serializes as a flat map of canonical names, sorted for stable output.
impl<S: ScopeMarker> Serialize for UnresolvedProperties<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        let sorted: BTreeMap<&str, &PropertyValue> =
            self.values.iter().map(|(def, value)| (def.name, value)).collect();
        sorted.serialize(serializer)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::types::{JammerScope, ScenarioScope};
    use super::*;

    #[test]
    fn test_typed_get_defaults() {
        let props: ResolvedProperties<ScenarioScope> = ResolvedProperties::new();

        let altitude: f64 = props.get(&LEO_ALTITUDE_KM);
        assert_eq!(altitude, 550.0);

        let mode: String = props.get(&ORBIT_MODE);
        assert_eq!(mode, "LEO");

        let auto: bool = props.get(&MODCOD_AUTO);
        assert!(auto);

        let isolation: f64 = props.get(&JAMMING_POLARIZATION_ISOLATION_DB);
        assert_eq!(isolation, -4.0);
    }

    #[test]
    fn test_nullable_defaults_to_none() {
        let mut props: ResolvedProperties<ScenarioScope> = ResolvedProperties::new();

        let geo_alt: Option<f64> = props.get(&GEO_ALTITUDE_KM);
        assert!(geo_alt.is_none());

        props.set(&GEO_ALTITUDE_KM, Some(35_786.0));
        let geo_alt: Option<f64> = props.get(&GEO_ALTITUDE_KM);
        assert_eq!(geo_alt, Some(35_786.0));
    }

    #[test]
    fn test_scope_filtering() {
        let jammer: ResolvedProperties<JammerScope> = ResolvedProperties::new();
        assert_eq!(jammer.scope(), PropertyScope::Jammer);
        let power: f64 = jammer.get(&JAMMER_POWER_DBW);
        assert_eq!(power, 27.0);

        assert!(properties_by_scope(PropertyScope::Jammer).all(|p| p.name.starts_with("jammer/")));
        assert!(properties_by_scope(PropertyScope::Scenario).all(|p| !p.name.starts_with("jammer/")));
    }

    #[test]
    fn test_property_lookup_and_aliases() {
        assert!(is_known_property("leo/altitude_km"));
        assert!(is_known_property("jammer/power_tx_dbw"));
        assert!(!is_known_property("unknown/property"));

        let def = get_property_def("jammer/frequency_ghz").unwrap();
        assert_eq!(def.name, "jammer/center_frequency_ghz");
        assert_eq!(default_value("latency/processing_ms"), Some(PropertyValue::Float(2.0)));
    }

    #[test]
    fn test_namespaces() {
        let namespaces = known_namespaces();
        assert!(namespaces.contains(&"jamming/fcc"));
        assert!(namespaces.contains(&"losses"));
        assert_eq!(properties_by_namespace("losses").count(), 7);
        assert_eq!(properties_by_namespace("jamming/fcc").count(), 10);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = ALL_PROPERTIES.iter().map(|p| p.name).collect();
        names.sort();
        let len = names.len();
        names.dedup();
        assert_eq!(names.len(), len);
    }

    #[test]
    fn test_unresolved_properties_deserialize_nested() {
        let yaml = r#"
            leo:
                altitude_km: 600
            jamming:
                fcc:
                    peak_db: 30.5
            power:
                manual_override: true
        "#;

        let props: UnresolvedProperties<ScenarioScope> = serde_yaml::from_str(yaml).unwrap();

        assert!(props.contains(&LEO_ALTITUDE_KM));
        assert!(props.contains(&JAMMING_FCC_PEAK_DB));
        assert!(props.contains(&POWER_MANUAL_OVERRIDE));
        assert_eq!(props.len(), 3);

        let mut resolved: ResolvedProperties<ScenarioScope> = ResolvedProperties::new();
        resolved.apply_unresolved(&props);
        // Integers are accepted for float properties.
        assert_eq!(resolved.get(&LEO_ALTITUDE_KM), 600.0);
        assert_eq!(resolved.get(&JAMMING_FCC_PEAK_DB), 30.5);
    }

    #[test]
    fn test_alias_resolves_to_canonical() {
        let yaml = "jammer:\n  power_tx_dbw: 33\n";
        let props: UnresolvedProperties<JammerScope> = serde_yaml::from_str(yaml).unwrap();
        assert!(props.contains(&JAMMER_POWER_DBW));
    }

    #[test]
    fn test_unknown_property_rejected() {
        let yaml = "leo:\n  altitud_km: 600\n";
        let err = serde_yaml::from_str::<UnresolvedProperties<ScenarioScope>>(yaml).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown scenario property: 'leo/altitud_km'"), "{}", msg);
        assert!(msg.contains("lbsim properties"));
    }

    #[test]
    fn test_wrong_scope_rejected() {
        let yaml = "jammer:\n  power_dbw: 30\n";
        let err = serde_yaml::from_str::<UnresolvedProperties<ScenarioScope>>(yaml).unwrap_err();
        assert!(err.to_string().contains("is a jammer property"));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let yaml = "leo:\n  altitude_km: high\n";
        let err = serde_yaml::from_str::<UnresolvedProperties<ScenarioScope>>(yaml).unwrap_err();
        assert!(err.to_string().contains("type mismatch"));
        assert!(err.to_string().contains("expected float"), "{}", err);

        // null only for nullable properties
        let yaml = "leo:\n  altitude_km: ~\n";
        assert!(serde_yaml::from_str::<UnresolvedProperties<ScenarioScope>>(yaml).is_err());
        let yaml = "geo:\n  altitude_km: ~\n";
        assert!(serde_yaml::from_str::<UnresolvedProperties<ScenarioScope>>(yaml).is_ok());
    }

    #[test]
    fn test_nested_mapping_value_rejected() {
        let mapping: serde_yaml::Mapping =
            serde_yaml::from_str("jammer:\n  type: [SPOT, {x: 1}]\n").unwrap();
        let err = UnresolvedProperties::<JammerScope>::from_mapping(&mapping).unwrap_err();
        assert!(matches!(
            err,
            PropertySetError::UnsupportedValue { kind: "nested mapping", .. }
        ));
    }

    #[test]
    fn test_serialize_sorted_canonical_names() {
        let yaml = "jammer:\n  power_tx_dbw: 33\n  active: false\n";
        let props: UnresolvedProperties<JammerScope> = serde_yaml::from_str(yaml).unwrap();
        let out = serde_yaml::to_string(&props).unwrap();
        assert_eq!(out, "jammer/active: false\njammer/power_dbw: 33\n");
    }

    #[test]
    fn test_insert_checks_type() {
        let mut props: UnresolvedProperties<JammerScope> = UnresolvedProperties::new();
        assert!(props
            .insert(&JAMMER_ACTIVE, PropertyValue::String("yes".into()))
            .is_err());
        props.insert(&JAMMER_ACTIVE, PropertyValue::Bool(false)).unwrap();
        assert_eq!(props.get_raw(&JAMMER_ACTIVE.def), Some(&PropertyValue::Bool(false)));
    }
}
