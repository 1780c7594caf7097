//! # Scenario Properties
//!
//! Type-safe property registry for configuring a link budget scenario.
//! Properties apply either to the scenario as a whole or to one jammer.
//!
//! ## Module Organization
//!
//! - [`value`] - Property value types and conversion traits
//! - [`types`] - Property type definitions and metadata
//! - [`definitions`] - All property constant definitions
//! - [`registry`] - Property lookup and resolved/unresolved property sets
//!
//! ## Property Namespaces
//!
//! Properties are organized into namespaces using `/` as a separator:
//! - `leo/altitude_km` - LEO altitude
//! - `jamming/fcc/peak_db` - Peak of the FCC discrimination mask
//! - `jammer/power_dbw` - Jammer transmit power
//!
//! ## Property Resolution
//!
//! Properties are resolved in the following order (later overrides earlier):
//! 1. Built-in code defaults
//! 2. `defaults.jammer` sections of scenario files (in order loaded)
//! 3. Explicit values on jammers or in the `simulation` section
//!
//! ## Example YAML
//!
//! ```yaml
//! simulation:
//!   orbit:
//!     mode: GEO
//!   losses:
//!     rain_att_db: 3.0
//!
//! defaults:
//!   jammer:
//!     power_dbw: 30
//!
//! jammers:
//!   - id: J1
//!     jammer:
//!       distance_km: 20
//! ```

pub mod definitions;
pub mod registry;
pub mod types;
pub mod value;

pub use value::{FromPropertyValue, PropertyValue, ToPropertyValue};

pub use types::{
    JammerScope, Property, PropertyBaseType, PropertyDef, PropertyDefault, PropertyScope,
    PropertyType, ScenarioScope, ScopeMarker,
};

pub use definitions::*;

pub use registry::{
    default_value, get_property_def, is_known_property, known_namespaces, properties_by_namespace,
    properties_by_scope, PropertySetError, ResolvedProperties, UnresolvedProperties,
    ALL_PROPERTIES,
};
