//! Response types for the WebHCat DDL API.
//!
//! These mirror the JSON the server returns. Fields the server may add
//! beyond the ones modeled here are kept in `extra`. The typed fields are a
//! normalized view (absent and `null` look the same); describe results also
//! keep the response body exactly as received in `raw`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A column of a table or partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Hive type (e.g. "string", "bigint", "map<string,int>")
    #[serde(rename = "type")]
    pub data_type: String,
    /// Column comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Database description (`GET ddl/database/:db`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseDescription {
    /// Database name
    pub database: String,
    /// Storage location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Database comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Database parameters, as reported by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Any other fields the server returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Response body exactly as the server sent it
    #[serde(skip)]
    pub raw: Value,
}

/// Table description (`GET ddl/database/:db/table/:table`).
///
/// The plain form only carries `columns`; the extended form
/// (`format=extended`) adds storage and file statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescription {
    pub database: String,
    pub table: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitioned: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partition_columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_access_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_number_files: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_file_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_file_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<i64>,
    /// Any other fields the server returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Response body exactly as the server sent it
    #[serde(skip)]
    pub raw: Value,
}

/// One `column=value` pair of a partition spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionValue {
    pub column_name: String,
    pub column_value: String,
}

/// Entry of a partition listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSummary {
    /// Partition spec, e.g. `dt='20120101',country='US'`
    pub name: String,
    /// Spec broken down per partition column
    #[serde(default)]
    pub values: Vec<PartitionValue>,
}

/// Partition description
/// (`GET ddl/database/:db/table/:table/partition/:partition`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionDescription {
    pub database: String,
    pub table: String,
    pub partition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitioned: Option<bool>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partition_columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Any other fields the server returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Response body exactly as the server sent it
    #[serde(skip)]
    pub raw: Value,
}

/// Descriptor decoded from a whole response body.
pub(crate) trait ResponseBody: DeserializeOwned {
    /// Keep the undecoded body alongside the typed fields.
    fn attach_raw(&mut self, raw: Value);
}

macro_rules! impl_response_body {
    ($($ty:ty),*) => {
        $(impl ResponseBody for $ty {
            fn attach_raw(&mut self, raw: Value) {
                self.raw = raw;
            }
        })*
    };
}

impl_response_body!(DatabaseDescription, TableDescription, PartitionDescription);

/// Error body returned by WebHCat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Error message
    #[serde(default)]
    pub error: Option<String>,
    /// Service error code, e.g. 10241 for "table is not partitioned"
    #[serde(default)]
    pub error_code: Option<i64>,
}
