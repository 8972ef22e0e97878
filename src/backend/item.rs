//! Document values of scanned and fetched rows.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::ser::{Serialize, Serializer};

use crate::key::{AttributeValue, KeyError, KeySchema, Number, PrimaryKey};

/// A full row: attribute name to value.
pub type Item = BTreeMap<String, ItemValue>;

/// Any value a row attribute can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValue {
    String(String),
    Number(Number),
    Binary(Vec<u8>),
    Bool(bool),
    Null,
    List(Vec<ItemValue>),
    Map(BTreeMap<String, ItemValue>),
    StringSet(Vec<String>),
    NumberSet(Vec<Number>),
    BinarySet(Vec<Vec<u8>>),
}

impl ItemValue {
    /// The backend's type code for this value.
    pub fn type_code(&self) -> &'static str {
        match self {
            ItemValue::String(_) => "S",
            ItemValue::Number(_) => "N",
            ItemValue::Binary(_) => "B",
            ItemValue::Bool(_) => "BOOL",
            ItemValue::Null => "NULL",
            ItemValue::List(_) => "L",
            ItemValue::Map(_) => "M",
            ItemValue::StringSet(_) => "SS",
            ItemValue::NumberSet(_) => "NS",
            ItemValue::BinarySet(_) => "BS",
        }
    }

    /// The value as a key scalar, if it is one.
    pub fn as_key_value(&self) -> Option<AttributeValue> {
        match self {
            ItemValue::String(s) => Some(AttributeValue::String(s.clone())),
            ItemValue::Number(n) => Some(AttributeValue::Number(n.clone())),
            ItemValue::Binary(b) => Some(AttributeValue::Binary(b.clone())),
            _ => None,
        }
    }
}

impl From<AttributeValue> for ItemValue {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::String(s) => ItemValue::String(s),
            AttributeValue::Number(n) => ItemValue::Number(n),
            AttributeValue::Binary(b) => ItemValue::Binary(b),
        }
    }
}

impl From<&str> for ItemValue {
    fn from(value: &str) -> Self {
        ItemValue::String(value.to_string())
    }
}

impl From<i64> for ItemValue {
    fn from(value: i64) -> Self {
        ItemValue::Number(Number::from(value))
    }
}

impl From<bool> for ItemValue {
    fn from(value: bool) -> Self {
        ItemValue::Bool(value)
    }
}

/// Extract the primary key of `item` according to `schema`.
///
/// Every key attribute must be present and hold its declared scalar type.
pub fn key_of(item: &Item, schema: &KeySchema) -> Result<PrimaryKey, KeyError> {
    let mut key = PrimaryKey::new();
    for attribute in schema.iter() {
        let value = item
            .get(&attribute.name)
            .ok_or_else(|| KeyError::MissingAttribute(attribute.name.clone()))?;
        let scalar = value
            .as_key_value()
            .filter(|v| v.scalar_type() == attribute.attr_type)
            .ok_or_else(|| KeyError::TypeMismatch {
                name: attribute.name.clone(),
                expected: attribute.attr_type,
                got: value.type_code().to_string(),
            })?;
        key.insert(attribute.name.clone(), scalar);
    }
    Ok(key)
}

/// Convert a primary key into a row holding just the key attributes.
pub fn item_from_key(key: &PrimaryKey) -> Item {
    key.iter()
        .map(|(name, value)| (name.to_string(), ItemValue::from(value.clone())))
        .collect()
}

fn serialize_number<S: Serializer>(number: &Number, serializer: S) -> Result<S::Ok, S::Error> {
    if let Some(int) = number.to_i64() {
        return serializer.serialize_i64(int);
    }
    // Only use a float when it reproduces the exact value.
    match number.to_f64() {
        Some(float) if Number::parse(&float.to_string()).ok().as_ref() == Some(number) => {
            serializer.serialize_f64(float)
        }
        _ => serializer.serialize_str(&number.to_string()),
    }
}

struct NumberRef<'a>(&'a Number);

impl Serialize for NumberRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_number(self.0, serializer)
    }
}

impl Serialize for ItemValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ItemValue::String(s) => serializer.serialize_str(s),
            ItemValue::Number(n) => serialize_number(n, serializer),
            ItemValue::Binary(b) => serializer.serialize_str(&STANDARD.encode(b)),
            ItemValue::Bool(b) => serializer.serialize_bool(*b),
            ItemValue::Null => serializer.serialize_unit(),
            ItemValue::List(values) => serializer.collect_seq(values),
            ItemValue::Map(map) => serializer.collect_map(map),
            ItemValue::StringSet(values) => serializer.collect_seq(values),
            ItemValue::NumberSet(values) => serializer.collect_seq(values.iter().map(NumberRef)),
            ItemValue::BinarySet(values) => {
                serializer.collect_seq(values.iter().map(|b| STANDARD.encode(b)))
            }
        }
    }
}
