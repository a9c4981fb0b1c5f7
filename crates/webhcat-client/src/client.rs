//! WebHCat client: server metadata and read-only DDL queries.

use crate::config::ClientConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{ClientError, Result};
use crate::transport::{FormBody, QueryParams, ReqwestTransport, Transport};
use crate::types::{
    Column, DatabaseDescription, PartitionDescription, PartitionSummary, ResponseBody,
    TableDescription,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// WebHCat client with busy-host failover.
///
/// Every call resolves against the active host of the pool and carries the
/// configured `user.name`. A 503 moves the client to the next host; the
/// move is shared by every caller of this instance.
pub struct WebHcatClient {
    dispatcher: Dispatcher,
}

impl WebHcatClient {
    /// Create a new client configuration builder.
    pub fn builder() -> crate::config::ClientConfigBuilder {
        crate::config::ClientConfigBuilder::new()
    }

    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends requests through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            hosts = ?config.hosts,
            port = config.port,
            user = %config.user_name,
            "Creating WebHCat client"
        );
        Ok(Self {
            dispatcher: Dispatcher::new(&config, transport)?,
        })
    }

    /// Base URL of the active host.
    pub fn base_url(&self) -> &str {
        self.dispatcher.rotator().base_url()
    }

    /// The request dispatcher, for failover state inspection.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    // =========================================================================
    // Server Metadata
    // =========================================================================

    /// Response types the server supports (`GET :version`).
    pub async fn response_types(&self) -> Result<Vec<String>> {
        self.get_field("", None, "responseTypes").await
    }

    /// Server status string, `"ok"` when healthy.
    pub async fn server_status(&self) -> Result<String> {
        self.get_field("/status", None, "status").await
    }

    /// Hive version the server runs against.
    pub async fn hive_version(&self) -> Result<String> {
        self.get_field("/version/hive", None, "version").await
    }

    /// Hadoop version the server runs against.
    pub async fn hadoop_version(&self) -> Result<String> {
        self.get_field("/version/hadoop", None, "version").await
    }

    // =========================================================================
    // Databases
    // =========================================================================

    /// List databases, optionally filtered by a `like` pattern (`*` and `|`).
    pub async fn list_databases(&self, like: Option<&str>) -> Result<Vec<String>> {
        self.get_field("/ddl/database", like_query(like), "databases")
            .await
    }

    /// Describe a database.
    pub async fn describe_database(&self, database: &str) -> Result<DatabaseDescription> {
        self.describe(&database_path(database), None).await
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// List tables in a database, optionally filtered by a `like` pattern.
    pub async fn list_tables(&self, database: &str, like: Option<&str>) -> Result<Vec<String>> {
        let path = format!("{}/table", database_path(database));
        self.get_field(&path, like_query(like), "tables").await
    }

    /// Describe a table; `extended` adds storage and file statistics.
    pub async fn describe_table(
        &self,
        database: &str,
        table: &str,
        extended: bool,
    ) -> Result<TableDescription> {
        let query = extended.then(|| query(&[("format", "extended")]));
        self.describe(&table_path(database, table), query).await
    }

    // =========================================================================
    // Partitions
    // =========================================================================

    /// List partitions of a table.
    ///
    /// An unpartitioned table is reported by the server as an error with
    /// code 10241, which is returned as-is.
    pub async fn list_partitions(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<PartitionSummary>> {
        let path = format!("{}/partition", table_path(database, table));
        self.get_field(&path, None, "partitions").await
    }

    /// Describe one partition, addressed by its spec (e.g. `dt='20120101'`).
    pub async fn describe_partition(
        &self,
        database: &str,
        table: &str,
        partition: &str,
    ) -> Result<PartitionDescription> {
        let path = format!(
            "{}/partition/{}",
            table_path(database, table),
            urlencoding::encode(partition)
        );
        self.describe(&path, None).await
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// List the columns of a table.
    pub async fn list_columns(&self, database: &str, table: &str) -> Result<Vec<Column>> {
        let path = format!("{}/column", table_path(database, table));
        self.get_field(&path, None, "columns").await
    }

    /// Describe a single column.
    pub async fn describe_column(
        &self,
        database: &str,
        table: &str,
        column: &str,
    ) -> Result<Column> {
        let path = format!(
            "{}/column/{}",
            table_path(database, table),
            urlencoding::encode(column)
        );
        self.get_field(&path, None, "column").await
    }

    // =========================================================================
    // Table Properties
    // =========================================================================

    /// List table properties.
    pub async fn list_properties(
        &self,
        database: &str,
        table: &str,
    ) -> Result<HashMap<String, String>> {
        let path = format!("{}/property", table_path(database, table));
        self.get_field(&path, None, "properties").await
    }

    /// Look up one table property; the map holds at most that key.
    pub async fn get_property(
        &self,
        database: &str,
        table: &str,
        property: &str,
    ) -> Result<HashMap<String, String>> {
        let path = format!(
            "{}/property/{}",
            table_path(database, table),
            urlencoding::encode(property)
        );
        self.get_field(&path, None, "property").await
    }

    // =========================================================================
    // Raw Requests
    // =========================================================================

    /// Issue a request to any WebHCat endpoint, returning the decoded body.
    ///
    /// Goes through the same identity injection and failover as the typed
    /// methods.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<QueryParams>,
        form: Option<FormBody>,
    ) -> Result<Value> {
        self.dispatcher.request(method, path, query, form).await
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// GET `path`, decode the whole body and keep it verbatim in `raw`.
    async fn describe<T: ResponseBody>(&self, path: &str, query: Option<QueryParams>) -> Result<T> {
        let body = self.request(Method::GET, path, query, None).await?;
        let mut described: T = decode(body.clone())?;
        described.attach_raw(body);
        Ok(described)
    }

    /// GET `path` and decode one top-level field of the body.
    async fn get_field<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<QueryParams>,
        field: &str,
    ) -> Result<T> {
        let body = self.request(Method::GET, path, query, None).await?;
        project(body, field)
    }
}

/// Arc-wrapped client for shared ownership.
pub type SharedClient = Arc<WebHcatClient>;

fn database_path(database: &str) -> String {
    format!("/ddl/database/{}", urlencoding::encode(database))
}

fn table_path(database: &str, table: &str) -> String {
    format!(
        "{}/table/{}",
        database_path(database),
        urlencoding::encode(table)
    )
}

fn query(pairs: &[(&str, &str)]) -> QueryParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn like_query(like: Option<&str>) -> Option<QueryParams> {
    like.map(|pattern| query(&[("like", pattern)]))
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body)
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to decode response: {}", e)))
}

/// Pull `field` out of a JSON object and decode it.
fn project<T: DeserializeOwned>(body: Value, field: &str) -> Result<T> {
    match body {
        Value::Object(mut map) => match map.remove(field) {
            Some(value) => decode(value),
            None => Err(ClientError::MissingField {
                field: field.to_string(),
            }),
        },
        _ => Err(ClientError::MissingField {
            field: field.to_string(),
        }),
    }
}
