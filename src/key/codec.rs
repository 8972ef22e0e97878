//! Primary key <-> token encoding.
//!
//! A token is one segment per key attribute, in schema order, joined with
//! [`SEGMENT_DELIMITER`]. Each segment is the attribute's type code followed
//! by its escaped payload:
//!
//! ```text
//! S<escaped utf-8>     string
//! N<escaped decimal>   number, canonical text
//! B<base64url>         binary, unpadded
//! ```
//!
//! `{pk: "user#1", sk: 42}` therefore encodes as `Suser%231~N42`.

use std::fmt;

use serde::Serialize;

use super::error::KeyError;
use super::escape::{self, SEGMENT_DELIMITER};
use super::number::Number;
use super::types::{AttributeValue, KeyAttribute, KeySchema, PrimaryKey, ScalarType};

/// Opaque, URL path safe encoding of one primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyToken(String);

impl KeyToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KeyToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<KeyToken> for String {
    fn from(token: KeyToken) -> Self {
        token.0
    }
}

/// Encode a primary key into a token.
///
/// The key must hold exactly the schema's attributes with their declared types.
pub fn encode(key: &PrimaryKey, schema: &KeySchema) -> Result<KeyToken, KeyError> {
    key.conforms_to(schema)?;

    let mut token = String::new();
    for (index, attribute) in schema.iter().enumerate() {
        let value = key
            .get(&attribute.name)
            .ok_or_else(|| KeyError::MissingAttribute(attribute.name.clone()))?;
        if index > 0 {
            token.push(SEGMENT_DELIMITER);
        }
        token.push_str(attribute.attr_type.code());
        token.push_str(&encode_payload(value));
    }

    Ok(KeyToken(token))
}

/// Decode a token produced by [`encode`] with the same schema.
pub fn decode(token: &str, schema: &KeySchema) -> Result<PrimaryKey, KeyError> {
    let segments: Vec<&str> = token.split(SEGMENT_DELIMITER).collect();
    if segments.len() != schema.len() {
        return Err(KeyError::malformed(format!(
            "expected {} segment(s), found {}",
            schema.len(),
            segments.len()
        )));
    }

    let mut key = PrimaryKey::new();
    for (attribute, segment) in schema.iter().zip(segments) {
        key.insert(attribute.name.clone(), decode_segment(segment, attribute)?);
    }
    Ok(key)
}

fn encode_payload(value: &AttributeValue) -> String {
    match value {
        AttributeValue::String(s) => escape::escape(s),
        AttributeValue::Number(n) => escape::escape(&n.to_string()),
        AttributeValue::Binary(b) => escape::escape(&escape::encode_binary(b)),
    }
}

fn decode_segment(segment: &str, attribute: &KeyAttribute) -> Result<AttributeValue, KeyError> {
    let expected = attribute.attr_type.code();
    let payload = segment.strip_prefix(expected).ok_or_else(|| {
        KeyError::malformed(format!(
            "segment for '{}' is not tagged {}",
            attribute.name, expected
        ))
    })?;

    let text = escape::unescape(payload)?;

    match attribute.attr_type {
        ScalarType::String => Ok(AttributeValue::String(text)),
        ScalarType::Number => Number::parse(&text).map(AttributeValue::Number).map_err(|_| {
            KeyError::malformed(format!(
                "segment for '{}' is not a number: {}",
                attribute.name, text
            ))
        }),
        ScalarType::Binary => escape::decode_binary(&text).map(AttributeValue::Binary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_schema() -> KeySchema {
        KeySchema::partition_only("id", ScalarType::String)
    }

    fn composite_schema() -> KeySchema {
        KeySchema::composite("pk", ScalarType::String, "sk", ScalarType::Number).unwrap()
    }

    #[test]
    fn test_partition_only_string_with_slash() {
        let schema = string_schema();
        let key = PrimaryKey::new().with("id", "a/b");

        let token = encode(&key, &schema).unwrap();
        assert!(!token.as_str().contains('/'));
        assert_eq!(decode(token.as_str(), &schema).unwrap(), key);
    }

    #[test]
    fn test_composite_mixed_types() {
        let schema = composite_schema();
        let key = PrimaryKey::new().with("pk", "user#1").with("sk", 42i64);

        let token = encode(&key, &schema).unwrap();
        assert_eq!(token.as_str(), "Suser%231~N42");

        let decoded = decode(token.as_str(), &schema).unwrap();
        assert_eq!(decoded, key);
        assert_eq!(
            decoded.get("sk"),
            Some(&AttributeValue::number("42.0").unwrap())
        );
    }

    #[test]
    fn test_delimiter_inside_values() {
        let schema = KeySchema::composite("a", ScalarType::String, "b", ScalarType::String).unwrap();
        let key = PrimaryKey::new().with("a", "x~y").with("b", "~~");

        let token = encode(&key, &schema).unwrap();
        assert_eq!(token.as_str().matches(SEGMENT_DELIMITER).count(), 1);
        assert_eq!(decode(token.as_str(), &schema).unwrap(), key);
    }

    #[test]
    fn test_binary_roundtrip() {
        let schema = KeySchema::partition_only("blob", ScalarType::Binary);
        let key = PrimaryKey::new().with("blob", vec![0u8, 126, 47, 255]);

        let token = encode(&key, &schema).unwrap();
        assert!(token.as_str().starts_with('B'));
        assert_eq!(decode(token.as_str(), &schema).unwrap(), key);
    }

    #[test]
    fn test_empty_string_value() {
        let schema = string_schema();
        let key = PrimaryKey::new().with("id", "");
        let token = encode(&key, &schema).unwrap();
        assert_eq!(token.as_str(), "S");
        assert_eq!(decode(token.as_str(), &schema).unwrap(), key);
    }

    #[test]
    fn test_number_canonical_form() {
        let schema = KeySchema::partition_only("n", ScalarType::Number);
        let a = PrimaryKey::new().with("n", AttributeValue::number("-1.50").unwrap());
        let b = PrimaryKey::new().with("n", AttributeValue::number("-15e-1").unwrap());
        assert_eq!(encode(&a, &schema).unwrap(), encode(&b, &schema).unwrap());
        assert_eq!(encode(&a, &schema).unwrap().as_str(), "N-1.5");
    }

    #[test]
    fn test_encode_rejects_nonconforming_keys() {
        let schema = composite_schema();
        let missing = PrimaryKey::new().with("pk", "x");
        assert_eq!(
            encode(&missing, &schema),
            Err(KeyError::MissingAttribute("sk".to_string()))
        );

        let wrong = PrimaryKey::new().with("pk", "x").with("sk", "1");
        assert!(matches!(encode(&wrong, &schema), Err(KeyError::TypeMismatch { .. })));
    }

    #[test]
    fn test_decode_segment_count_mismatch() {
        let err = decode("Sa~N1", &string_schema()).unwrap_err();
        assert!(err.is_malformed_token());

        let err = decode("Sa", &composite_schema()).unwrap_err();
        assert!(err.is_malformed_token());

        let err = decode("Sa~N1~N2", &composite_schema()).unwrap_err();
        assert!(err.is_malformed_token());
    }

    #[test]
    fn test_normalized_delimiter_escape_is_rejected() {
        let schema = composite_schema();
        let key = PrimaryKey::new().with("pk", "user~2").with("sk", 1i64);
        let token = encode(&key, &schema).unwrap();
        assert_eq!(token.as_str(), "Suser%7E2~N1");

        // %7E rewritten to its unreserved form
        let normalized = token.as_str().replace("%7E", "~");
        assert!(decode(&normalized, &schema).unwrap_err().is_malformed_token());

        let single = KeySchema::partition_only("id", ScalarType::String);
        let token = encode(&PrimaryKey::new().with("id", "~"), &single).unwrap();
        let normalized = token.as_str().replace("%7E", "~");
        assert!(decode(&normalized, &single).unwrap_err().is_malformed_token());
    }

    #[test]
    fn test_decode_wrong_tag() {
        let err = decode("Nabc", &string_schema()).unwrap_err();
        assert!(err.is_malformed_token());
        assert!(decode("", &string_schema()).unwrap_err().is_malformed_token());
    }

    #[test]
    fn test_decode_invalid_payloads() {
        let schema = composite_schema();
        assert!(decode("Sa~Nabc", &schema).unwrap_err().is_malformed_token());
        assert!(decode("Sa%2~N1", &schema).unwrap_err().is_malformed_token());
        assert!(decode("Sa/b~N1", &schema).unwrap_err().is_malformed_token());

        let binary = KeySchema::partition_only("b", ScalarType::Binary);
        assert!(decode("B%21%21", &binary).unwrap_err().is_malformed_token());
    }

    #[test]
    fn test_encode_is_deterministic() {
        let schema = composite_schema();
        let key = PrimaryKey::new().with("pk", "same").with("sk", 7i64);
        assert_eq!(encode(&key, &schema).unwrap(), encode(&key, &schema).unwrap());
    }
}
