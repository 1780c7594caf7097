//! Runtime property values and conversions to and from Rust types.

use serde::Serialize;

/// A property value as parsed from a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    /// Sequences are representable but no property accepts them.
    Vec(Vec<PropertyValue>),
    Null,
}

impl PropertyValue {
    /// Type name used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            PropertyValue::Integer(_) => "integer".to_string(),
            PropertyValue::Float(_) => "float".to_string(),
            PropertyValue::String(_) => "string".to_string(),
            PropertyValue::Bool(_) => "bool".to_string(),
            PropertyValue::Vec(items) => match items.first() {
                Some(first) => format!("array of {}", first.type_name()),
                None => "empty array".to_string(),
            },
            PropertyValue::Null => "null".to_string(),
        }
    }
}

/// Leaf YAML values. The error names the unsupported YAML kind.
impl TryFrom<&serde_yaml::Value> for PropertyValue {
    type Error = &'static str;

    fn try_from(value: &serde_yaml::Value) -> Result<Self, Self::Error> {
        use serde_yaml::Value;
        match value {
            Value::Null => Ok(PropertyValue::Null),
            Value::Bool(b) => Ok(PropertyValue::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(PropertyValue::Integer)
                .or_else(|| n.as_f64().map(PropertyValue::Float))
                .ok_or("number out of range"),
            Value::String(s) => Ok(PropertyValue::String(s.clone())),
            Value::Sequence(items) => items
                .iter()
                .map(PropertyValue::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(PropertyValue::Vec),
            Value::Mapping(_) => Err("nested mapping"),
            Value::Tagged(_) => Err("tagged value"),
        }
    }
}

/// Conversion from a [`PropertyValue`].
pub trait FromPropertyValue: Sized {
    /// `None` when the value has an incompatible type.
    fn from_property_value(value: &PropertyValue) -> Option<Self>;
}

/// Conversion into a [`PropertyValue`].
pub trait ToPropertyValue {
    fn to_property_value(&self) -> PropertyValue;
}

impl FromPropertyValue for f64 {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Float(x) => Some(*x),
            PropertyValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl FromPropertyValue for i64 {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromPropertyValue for bool {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromPropertyValue for String {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl<T: FromPropertyValue> FromPropertyValue for Option<T> {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Null => Some(None),
            other => T::from_property_value(other).map(Some),
        }
    }
}

impl ToPropertyValue for f64 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Float(*self)
    }
}

impl ToPropertyValue for i64 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Integer(*self)
    }
}

impl ToPropertyValue for bool {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Bool(*self)
    }
}

impl ToPropertyValue for String {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::String(self.clone())
    }
}

impl<T: ToPropertyValue> ToPropertyValue for Option<T> {
    fn to_property_value(&self) -> PropertyValue {
        match self {
            Some(v) => v.to_property_value(),
            None => PropertyValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_accepts_integer() {
        assert_eq!(f64::from_property_value(&PropertyValue::Integer(27)), Some(27.0));
        assert_eq!(f64::from_property_value(&PropertyValue::Bool(true)), None);
    }

    #[test]
    fn test_from_yaml_leaf() {
        let value: serde_yaml::Value = serde_yaml::from_str("[1, 2.5]").unwrap();
        let converted = PropertyValue::try_from(&value).unwrap();
        assert_eq!(
            converted,
            PropertyValue::Vec(vec![PropertyValue::Integer(1), PropertyValue::Float(2.5)])
        );
        assert_eq!(converted.type_name(), "array of integer");

        let tagged: serde_yaml::Value = serde_yaml::from_str("!db 3").unwrap();
        assert_eq!(PropertyValue::try_from(&tagged), Err("tagged value"));
    }

    #[test]
    fn test_option_round_trip() {
        let none: Option<f64> = None;
        assert_eq!(none.to_property_value(), PropertyValue::Null);
        assert_eq!(
            Option::<f64>::from_property_value(&PropertyValue::Null),
            Some(None)
        );
        assert_eq!(
            Option::<f64>::from_property_value(&PropertyValue::Float(1.5)),
            Some(Some(1.5))
        );
    }
}
