//! Backend over the AWS SDK DynamoDB client.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::primitives::{Blob, DateTimeFormat};
use aws_sdk_dynamodb::types::{self as sdk, KeyType};
use serde::Deserialize;

use crate::key::{AttributeValue, KeyAttribute, KeySchema, Number, PrimaryKey, ScalarType};
use crate::logging::{debug, error, info, warn};

use super::error::BackendError;
use super::item::{Item, ItemValue};
use super::{AttributeDefinition, StorageBackend, TableDescription};

/// Error code the service uses for unknown tables.
const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";

/// Service error codes that mean the backend is overloaded or failing rather
/// than refusing the request itself.
const TRANSIENT_ERROR_CODES: &[&str] = &[
    "InternalServerError",
    "ServiceUnavailable",
    "ProvisionedThroughputExceededException",
    "RequestLimitExceeded",
    "ThrottlingException",
    "LimitExceededException",
];

/// Provider name attached to static credentials.
const CREDENTIALS_PROVIDER: &str = "dynamo-browse";

/// Connection settings for [`DynamoBackend`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DynamoConfig {
    /// Endpoint URL; `None` uses the regional AWS endpoint.
    pub endpoint: Option<String>,
    /// Region name.
    pub region: String,
    /// Static access key id.
    pub access_key_id: String,
    /// Static secret access key.
    pub secret_access_key: String,
}

impl Default for DynamoConfig {
    fn default() -> Self {
        Self {
            endpoint: Some("http://localhost:8000".to_string()),
            region: "us-east-1".to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: "secret".to_string(),
        }
    }
}

/// [`StorageBackend`] backed by an SDK client.
#[derive(Debug, Clone)]
pub struct DynamoBackend {
    client: Client,
}

impl DynamoBackend {
    /// Wrap an already configured client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from connection settings.
    pub async fn connect(config: &DynamoConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER,
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }

        info!(
            region = %config.region,
            endpoint = config.endpoint.as_deref().unwrap_or("default"),
            "connecting to storage backend"
        );

        Self::new(Client::new(&loader.load().await))
    }
}

#[async_trait]
impl StorageBackend for DynamoBackend {
    async fn list_tables(&self) -> Result<Vec<String>, BackendError> {
        let mut names = Vec::new();
        let mut start: Option<String> = None;

        loop {
            let output = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start.take())
                .send()
                .await
                .map_err(|e| sdk_error(None, e))?;

            names.extend(output.table_names().iter().cloned());

            match output.last_evaluated_table_name() {
                Some(last) => start = Some(last.to_string()),
                None => break,
            }
        }

        debug!(tables = names.len(), "listed tables");
        Ok(names)
    }

    async fn describe_table(&self, table: &str) -> Result<TableDescription, BackendError> {
        let output = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| sdk_error(Some(table), e))?;

        let description = output.table().ok_or_else(|| {
            error!(table = table, "describe returned no table description");
            BackendError::InvalidResponse(format!("no description returned for '{}'", table))
        })?;

        description_from_sdk(table, description)
    }

    async fn scan(&self, table: &str) -> Result<Vec<Item>, BackendError> {
        let output = self
            .client
            .scan()
            .table_name(table)
            .send()
            .await
            .map_err(|e| sdk_error(Some(table), e))?;

        if output.last_evaluated_key().is_some() {
            debug!(table = table, "scan truncated to first page");
        }

        output.items().iter().map(item_from_sdk).collect()
    }

    async fn get_item(&self, table: &str, key: &PrimaryKey) -> Result<Option<Item>, BackendError> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key_to_sdk(key)))
            .send()
            .await
            .map_err(|e| sdk_error(Some(table), e))?;

        output.item().map(item_from_sdk).transpose()
    }
}

fn sdk_error<E>(table: Option<&str>, err: SdkError<E, HttpResponse>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::ServiceError(service) => {
            let status = service.raw().status().as_u16();
            service_error(table, err.code(), status, message)
        }
        _ => {
            warn!(error = %message, "storage backend call failed");
            BackendError::Unavailable(message)
        }
    }
}

/// Classify an error the service itself returned.
///
/// Only client-side faults (4xx that are not throttling) count as rejected.
fn service_error(
    table: Option<&str>,
    code: Option<&str>,
    status: u16,
    message: String,
) -> BackendError {
    if let (Some(table), Some(RESOURCE_NOT_FOUND)) = (table, code) {
        return BackendError::TableNotFound(table.to_string());
    }

    let transient = code.is_some_and(|code| TRANSIENT_ERROR_CODES.contains(&code));
    if transient || status >= 500 {
        warn!(status = status, code = code.unwrap_or("unknown"), "storage backend failed");
        BackendError::Unavailable(message)
    } else {
        debug!(status = status, code = code.unwrap_or("unknown"), "storage backend rejected request");
        BackendError::Rejected(message)
    }
}

fn description_from_sdk(
    table: &str,
    description: &sdk::TableDescription,
) -> Result<TableDescription, BackendError> {
    let attribute_definitions = description
        .attribute_definitions()
        .iter()
        .map(|def| {
            let code = def.attribute_type().as_str();
            ScalarType::from_code(code)
                .map(|attr_type| AttributeDefinition {
                    name: def.attribute_name().to_string(),
                    attr_type,
                })
                .ok_or_else(|| {
                    BackendError::InvalidResponse(format!("unknown attribute type '{}'", code))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let key_attributes = description
        .key_schema()
        .iter()
        .map(|element| {
            let name = element.attribute_name();
            let attr_type = attribute_definitions
                .iter()
                .find(|def| def.name == name)
                .map(|def| def.attr_type)
                .ok_or_else(|| {
                    BackendError::InvalidResponse(format!("key attribute '{}' has no definition", name))
                })?;
            match element.key_type() {
                KeyType::Hash => Ok(KeyAttribute::partition(name, attr_type)),
                KeyType::Range => Ok(KeyAttribute::sort(name, attr_type)),
                other => Err(BackendError::InvalidResponse(format!(
                    "unknown key type '{}'",
                    other.as_str()
                ))),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let key_schema =
        KeySchema::new(key_attributes).map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

    let throughput = description.provisioned_throughput();

    Ok(TableDescription {
        name: description.table_name().unwrap_or(table).to_string(),
        key_schema,
        attribute_definitions,
        status: description.table_status().map(|s| s.as_str().to_string()),
        item_count: description.item_count(),
        size_bytes: description.table_size_bytes(),
        created_at: description
            .creation_date_time()
            .and_then(|t| t.fmt(DateTimeFormat::DateTime).ok()),
        arn: description.table_arn().map(str::to_string),
        global_secondary_indexes: description
            .global_secondary_indexes()
            .iter()
            .filter_map(|index| index.index_name().map(str::to_string))
            .collect(),
        local_secondary_indexes: description
            .local_secondary_indexes()
            .iter()
            .filter_map(|index| index.index_name().map(str::to_string))
            .collect(),
        read_capacity: throughput.and_then(|t| t.read_capacity_units()),
        write_capacity: throughput.and_then(|t| t.write_capacity_units()),
    })
}

fn parse_number(text: &str) -> Result<Number, BackendError> {
    Number::parse(text).map_err(|e| {
        error!(value = text, "backend returned an unreadable number");
        BackendError::InvalidResponse(e.to_string())
    })
}

fn item_from_sdk(item: &HashMap<String, sdk::AttributeValue>) -> Result<Item, BackendError> {
    item.iter()
        .map(|(name, value)| Ok((name.clone(), value_from_sdk(value)?)))
        .collect()
}

fn value_from_sdk(value: &sdk::AttributeValue) -> Result<ItemValue, BackendError> {
    Ok(match value {
        sdk::AttributeValue::S(s) => ItemValue::String(s.clone()),
        sdk::AttributeValue::N(n) => ItemValue::Number(parse_number(n)?),
        sdk::AttributeValue::B(b) => ItemValue::Binary(b.as_ref().to_vec()),
        sdk::AttributeValue::Bool(b) => ItemValue::Bool(*b),
        sdk::AttributeValue::Null(_) => ItemValue::Null,
        sdk::AttributeValue::L(values) => ItemValue::List(
            values
                .iter()
                .map(value_from_sdk)
                .collect::<Result<_, _>>()?,
        ),
        sdk::AttributeValue::M(map) => ItemValue::Map(item_from_sdk(map)?),
        sdk::AttributeValue::Ss(values) => ItemValue::StringSet(values.clone()),
        sdk::AttributeValue::Ns(values) => ItemValue::NumberSet(
            values
                .iter()
                .map(|n| parse_number(n))
                .collect::<Result<_, _>>()?,
        ),
        sdk::AttributeValue::Bs(values) => {
            ItemValue::BinarySet(values.iter().map(|b| b.as_ref().to_vec()).collect())
        }
        _ => {
            return Err(BackendError::InvalidResponse(
                "unsupported attribute value type".to_string(),
            ));
        }
    })
}

fn key_to_sdk(key: &PrimaryKey) -> HashMap<String, sdk::AttributeValue> {
    key.iter()
        .map(|(name, value)| {
            let value = match value {
                AttributeValue::String(s) => sdk::AttributeValue::S(s.clone()),
                AttributeValue::Number(n) => sdk::AttributeValue::N(n.to_string()),
                AttributeValue::Binary(b) => sdk::AttributeValue::B(Blob::new(b.clone())),
            };
            (name.to_string(), value)
        })
        .collect()
}
