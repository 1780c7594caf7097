//! Property type definitions and metadata.

use super::value::PropertyValue;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

// ============================================================================
// Scopes
// ============================================================================

/// Where a property may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyScope {
    /// Scenario-wide settings (`simulation:` section).
    Scenario,
    /// Per-jammer settings (`defaults.jammer:` and `jammers:` entries).
    Jammer,
}

impl fmt::Display for PropertyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyScope::Scenario => write!(f, "scenario"),
            PropertyScope::Jammer => write!(f, "jammer"),
        }
    }
}

/// Type-level marker binding a property set to a scope.
pub trait ScopeMarker: fmt::Debug + Clone + Default + Send + Sync + 'static {
    /// The runtime scope.
    const SCOPE: PropertyScope;
}

/// Marker for scenario-scoped properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioScope;

impl ScopeMarker for ScenarioScope {
    const SCOPE: PropertyScope = PropertyScope::Scenario;
}

/// Marker for jammer-scoped properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct JammerScope;

impl ScopeMarker for JammerScope {
    const SCOPE: PropertyScope = PropertyScope::Jammer;
}

// ============================================================================
// Value Types
// ============================================================================

/// Base value type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyBaseType {
    Integer,
    Float,
    String,
    Bool,
}

/// Full value type: base type plus nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyType {
    pub base: PropertyBaseType,
    pub nullable: bool,
}

impl PropertyType {
    /// Non-nullable type.
    pub const fn new(base: PropertyBaseType) -> Self {
        Self {
            base,
            nullable: false,
        }
    }

    /// Allow `null`.
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Whether `value` is acceptable for this type. Integers are accepted
    /// where floats are expected.
    pub fn matches(&self, value: &PropertyValue) -> bool {
        match (self.base, value) {
            (_, PropertyValue::Null) => self.nullable,
            (PropertyBaseType::Integer, PropertyValue::Integer(_)) => true,
            (PropertyBaseType::Float, PropertyValue::Float(_) | PropertyValue::Integer(_)) => true,
            (PropertyBaseType::String, PropertyValue::String(_)) => true,
            (PropertyBaseType::Bool, PropertyValue::Bool(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.base {
            PropertyBaseType::Integer => "integer",
            PropertyBaseType::Float => "float",
            PropertyBaseType::String => "string",
            PropertyBaseType::Bool => "bool",
        };
        if self.nullable {
            write!(f, "{} or null", base)
        } else {
            write!(f, "{}", base)
        }
    }
}

/// Compile-time default value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyDefault {
    Integer(i64),
    Float(f64),
    String(&'static str),
    Bool(bool),
    Null,
}

impl PropertyDefault {
    const fn inferred_type(&self) -> PropertyType {
        match self {
            PropertyDefault::Integer(_) => PropertyType::new(PropertyBaseType::Integer),
            PropertyDefault::Float(_) => PropertyType::new(PropertyBaseType::Float),
            PropertyDefault::String(_) => PropertyType::new(PropertyBaseType::String),
            PropertyDefault::Bool(_) => PropertyType::new(PropertyBaseType::Bool),
            PropertyDefault::Null => PropertyType::new(PropertyBaseType::Float).nullable(),
        }
    }
}

impl fmt::Display for PropertyDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyDefault::Integer(i) => write!(f, "{}", i),
            PropertyDefault::Float(x) => write!(f, "{}", x),
            PropertyDefault::String(s) => write!(f, "\"{}\"", s),
            PropertyDefault::Bool(b) => write!(f, "{}", b),
            PropertyDefault::Null => write!(f, "null"),
        }
    }
}

// ============================================================================
// Property Definitions
// ============================================================================

/// Untyped property metadata, used for runtime lookup.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDef {
    /// Full name, `namespace/key`.
    pub name: &'static str,
    /// User-facing description printed by `lbsim properties`.
    pub description: &'static str,
    pub default: PropertyDefault,
    pub unit: Option<&'static str>,
    /// Alternative names accepted on input.
    pub aliases: &'static [&'static str],
    pub scope: PropertyScope,
    pub value_type: PropertyType,
}

impl PropertyDef {
    /// Whether `name` is this property's name or one of its aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }

    /// Namespace part of the name (everything before the last `/`).
    pub fn namespace(&self) -> Option<&'static str> {
        self.name.rsplit_once('/').map(|(ns, _)| ns)
    }

    /// Default as a runtime value.
    pub fn default_value(&self) -> PropertyValue {
        match self.default {
            PropertyDefault::Integer(i) => PropertyValue::Integer(i),
            PropertyDefault::Float(x) => PropertyValue::Float(x),
            PropertyDefault::String(s) => PropertyValue::String(s.to_string()),
            PropertyDefault::Bool(b) => PropertyValue::Bool(b),
            PropertyDefault::Null => PropertyValue::Null,
        }
    }
}

impl PartialEq for PropertyDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PropertyDef {}

impl Hash for PropertyDef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A typed property bound to a scope.
///
/// `T` is the Rust type returned by [`ResolvedProperties::get`](super::ResolvedProperties::get).
#[derive(Debug)]
pub struct Property<T, S: ScopeMarker> {
    pub def: PropertyDef,
    _marker: PhantomData<fn() -> (T, S)>,
}

impl<T, S: ScopeMarker> Property<T, S> {
    /// Define a property; the value type is inferred from the default.
    pub const fn new(name: &'static str, description: &'static str, default: PropertyDefault) -> Self {
        Self {
            def: PropertyDef {
                name,
                description,
                value_type: default.inferred_type(),
                default,
                unit: None,
                aliases: &[],
                scope: S::SCOPE,
            },
            _marker: PhantomData,
        }
    }

    /// Attach a display unit.
    pub const fn with_unit(mut self, unit: &'static str) -> Self {
        self.def.unit = Some(unit);
        self
    }

    /// Accept alternative names.
    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.def.aliases = aliases;
        self
    }

    /// Override the inferred value type.
    pub const fn with_type(mut self, value_type: PropertyType) -> Self {
        self.def.value_type = value_type;
        self
    }

    /// Full property name.
    pub fn name(&self) -> &'static str {
        self.def.name
    }
}
