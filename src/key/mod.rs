//! Primary key codec.
//!
//! Maps a table's structured primary key (partition key plus optional sort
//! key, each typed `S`, `N` or `B`) to a single opaque token that can sit in
//! a URL path segment, and back. Decoding needs the same [`KeySchema`] that
//! was used to encode; tokens carry no schema of their own.
//!
//! ```
//! use dynamo_browse::key::{self, KeySchema, PrimaryKey, ScalarType};
//!
//! let schema = KeySchema::composite("pk", ScalarType::String, "sk", ScalarType::Number)?;
//! let key = PrimaryKey::new().with("pk", "user#1").with("sk", 42i64);
//!
//! let token = key::encode(&key, &schema)?;
//! assert_eq!(key::decode(token.as_str(), &schema)?, key);
//! # Ok::<(), dynamo_browse::key::KeyError>(())
//! ```

mod codec;
mod error;
pub mod escape;
mod number;
mod types;

pub use codec::{KeyToken, decode, encode};
pub use error::KeyError;
pub use number::{MAX_DECIMAL_EXPONENT, Number};
pub use types::{AttributeValue, KeyAttribute, KeyRole, KeySchema, PrimaryKey, ScalarType};
