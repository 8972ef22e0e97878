//! Key schema and primary key types.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::error::KeyError;
use super::number::Number;

/// Declared scalar type of a key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Number,
    Binary,
}

impl ScalarType {
    /// The backend's type code (`S`, `N` or `B`).
    pub fn code(&self) -> &'static str {
        match self {
            ScalarType::String => "S",
            ScalarType::Number => "N",
            ScalarType::Binary => "B",
        }
    }

    /// Parse a backend type code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(ScalarType::String),
            "N" => Some(ScalarType::Number),
            "B" => Some(ScalarType::Binary),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for ScalarType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Role of an attribute within the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    Partition,
    Sort,
}

/// One attribute of a key schema.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct KeyAttribute {
    pub name: String,
    pub role: KeyRole,
    #[serde(rename = "type")]
    pub attr_type: ScalarType,
}

impl KeyAttribute {
    pub fn partition(name: impl Into<String>, attr_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            role: KeyRole::Partition,
            attr_type,
        }
    }

    pub fn sort(name: impl Into<String>, attr_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            role: KeyRole::Sort,
            attr_type,
        }
    }
}

/// A table's primary key layout: one partition attribute and an optional sort attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    partition: KeyAttribute,
    sort: Option<KeyAttribute>,
}

impl KeySchema {
    /// Build a schema from attributes in any order.
    ///
    /// Requires exactly one partition attribute, at most one sort attribute
    /// and distinct names.
    pub fn new(attributes: Vec<KeyAttribute>) -> Result<Self, KeyError> {
        let mut partition = None;
        let mut sort = None;

        for attribute in attributes {
            let slot = match attribute.role {
                KeyRole::Partition => &mut partition,
                KeyRole::Sort => &mut sort,
            };
            if slot.is_some() {
                return Err(KeyError::InvalidSchema(format!(
                    "more than one {:?} attribute",
                    attribute.role
                )));
            }
            *slot = Some(attribute);
        }

        let partition = partition
            .ok_or_else(|| KeyError::InvalidSchema("no partition attribute".to_string()))?;

        if let Some(sort) = &sort {
            if sort.name == partition.name {
                return Err(KeyError::InvalidSchema(format!(
                    "attribute '{}' used as both partition and sort key",
                    sort.name
                )));
            }
        }

        Ok(Self { partition, sort })
    }

    /// Schema with only a partition key.
    pub fn partition_only(name: impl Into<String>, attr_type: ScalarType) -> Self {
        Self {
            partition: KeyAttribute::partition(name, attr_type),
            sort: None,
        }
    }

    /// Schema with a partition and a sort key.
    pub fn composite(
        partition: impl Into<String>,
        partition_type: ScalarType,
        sort: impl Into<String>,
        sort_type: ScalarType,
    ) -> Result<Self, KeyError> {
        Self::new(vec![
            KeyAttribute::partition(partition, partition_type),
            KeyAttribute::sort(sort, sort_type),
        ])
    }

    pub fn partition(&self) -> &KeyAttribute {
        &self.partition
    }

    pub fn sort(&self) -> Option<&KeyAttribute> {
        self.sort.as_ref()
    }

    /// Attributes in key order: partition first, then sort.
    pub fn iter(&self) -> impl Iterator<Item = &KeyAttribute> {
        std::iter::once(&self.partition).chain(self.sort.as_ref())
    }

    /// Number of key attributes (1 or 2).
    pub fn len(&self) -> usize {
        if self.sort.is_some() { 2 } else { 1 }
    }

    /// A schema always has at least a partition attribute.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Look up a key attribute by name.
    pub fn get(&self, name: &str) -> Option<&KeyAttribute> {
        self.iter().find(|a| a.name == name)
    }
}

impl Serialize for KeySchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A key attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    String(String),
    Number(Number),
    Binary(Vec<u8>),
}

impl AttributeValue {
    /// The scalar type this value carries.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            AttributeValue::String(_) => ScalarType::String,
            AttributeValue::Number(_) => ScalarType::Number,
            AttributeValue::Binary(_) => ScalarType::Binary,
        }
    }

    /// Parse decimal text into a number value.
    pub fn number(text: &str) -> Result<Self, KeyError> {
        Number::parse(text).map(AttributeValue::Number)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<Number> for AttributeValue {
    fn from(value: Number) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(Number::from(value))
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        AttributeValue::Binary(value)
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AttributeValue", 2)?;
        state.serialize_field("type", &self.scalar_type())?;
        match self {
            AttributeValue::String(s) => state.serialize_field("value", s)?,
            AttributeValue::Number(n) => state.serialize_field("value", &n.to_string())?,
            AttributeValue::Binary(b) => state.serialize_field("value", &super::escape::encode_binary(b))?,
        }
        state.end()
    }
}

/// A primary key: attribute name to value, in name order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrimaryKey {
    values: BTreeMap<String, AttributeValue>,
}

impl PrimaryKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check that the key has exactly the schema's attributes with the declared types.
    pub fn conforms_to(&self, schema: &KeySchema) -> Result<(), KeyError> {
        for attribute in schema.iter() {
            let value = self
                .get(&attribute.name)
                .ok_or_else(|| KeyError::MissingAttribute(attribute.name.clone()))?;
            if value.scalar_type() != attribute.attr_type {
                return Err(KeyError::TypeMismatch {
                    name: attribute.name.clone(),
                    expected: attribute.attr_type,
                    got: value.scalar_type().to_string(),
                });
            }
        }

        if let Some(extra) = self.values.keys().find(|name| schema.get(name).is_none()) {
            return Err(KeyError::UnexpectedAttribute(extra.clone()));
        }

        Ok(())
    }
}

impl IntoIterator for PrimaryKey {
    type Item = (String, AttributeValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl Serialize for PrimaryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.values.iter())
    }
}
