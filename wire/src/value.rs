use std::collections::HashMap;
use std::ops::Index;

/// Dynamic data for one protocol class instance or one of its fields.
///
/// Objects carry the name of their concrete class, which is what polymorphic
/// fields need to look up the type id written in front of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Object(String, HashMap<String, Value>),
}

impl Value {
    /// Builds an object value from `(field, value)` pairs.
    pub fn object(type_name: &str, fields: Vec<(&str, Value)>) -> Value {
        Value::Object(
            type_name.to_string(),
            fields.into_iter().map(|(name, value)| (name.to_string(), value)).collect(),
        )
    }

    /// Short description of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_)      => "bool",
            Value::Int(_)       => "int",
            Value::UInt(_)      => "uint",
            Value::Float(_)     => "float",
            Value::String(_)    => "string",
            Value::Bytes(_)     => "bytes",
            Value::Array(_)     => "array",
            Value::Object(_, _) => "object",
        }
    }

    /// Returns `false` for other value kinds.
    pub fn as_bool(&self) -> bool {
        match *self {
            Value::Bool(value) => value,
            _ => false,
        }
    }

    /// Returns `0` for other value kinds.
    pub fn as_int(&self) -> i64 {
        match *self {
            Value::Int(value) => value,
            _ => 0,
        }
    }

    /// Returns `0` for other value kinds.
    pub fn as_uint(&self) -> u64 {
        match *self {
            Value::UInt(value) => value,
            _ => 0,
        }
    }

    /// Returns `0.0` for other value kinds.
    pub fn as_float(&self) -> f64 {
        match *self {
            Value::Float(value) => value,
            _ => 0.0,
        }
    }

    /// Returns `""` for other value kinds.
    pub fn as_string(&self) -> &str {
        match self {
            Value::String(value) => value.as_str(),
            _ => "",
        }
    }

    /// Returns an empty slice for other value kinds.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Value::Bytes(value) => value.as_slice(),
            _ => &[],
        }
    }

    /// Returns an empty slice for other value kinds.
    pub fn as_array(&self) -> &[Value] {
        match self {
            Value::Array(values) => values.as_slice(),
            _ => &[],
        }
    }

    /// Concrete class name of an object, `None` for other value kinds.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Value::Object(name, _) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Value::Array(values) => values.len(),
            Value::Bytes(bytes) => bytes.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Does nothing for other value kinds.
    pub fn push(&mut self, value: Value) {
        if let Value::Array(values) = self {
            values.push(value);
        }
    }

    /// Returns `None` for other value kinds or if the field isn't present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(_, fields) => fields.get(name),
            _ => None,
        }
    }

    /// Does nothing for other value kinds.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Value::Object(_, fields) = self {
            fields.insert(name.to_string(), value);
        }
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// Panics if this value isn't an [Array](#variant.Array) or if the index
    /// is out of bounds.
    fn index(&self, index: usize) -> &Value {
        match self {
            Value::Array(values) => &values[index],
            _ => panic!("value is not an array"),
        }
    }
}

#[test]
fn object_accessors() {
    let mut value = Value::object(
        "Point",
        vec![("x", Value::Int(3)), ("tags", Value::Array(vec![Value::String("a".into())]))],
    );
    assert_eq!(value.type_name(), Some("Point"));
    assert_eq!(value.get("x").map(Value::as_int), Some(3));
    assert_eq!(value.get("tags").map(Value::len), Some(1));
    assert_eq!(value.get("tags").unwrap()[0].as_string(), "a");
    assert!(value.get("missing").is_none());

    value.set("y", Value::Int(-1));
    assert_eq!(value.get("y"), Some(&Value::Int(-1)));

    let mut array = Value::Array(vec![]);
    array.push(Value::Bool(true));
    assert_eq!(array.len(), 1);
    assert!(array[0].as_bool());
}
