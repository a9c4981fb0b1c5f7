//! WebHCat Client
//!
//! An async Rust client for the WebHCat (Templeton) REST gateway in front of
//! a Hive metastore. It covers server metadata and the read-only DDL
//! endpoints: databases, tables, partitions, columns and table properties.
//!
//! # Features
//!
//! - **Host Pool Failover**: a host answering 503 is skipped and the call is
//!   retried on the next host of the pool
//! - **Identity Injection**: every request carries `user.name`
//! - **Typed Descriptors**: database, table, partition and column records
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use webhcat_client::{ClientConfig, WebHcatClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WebHcatClient::new(
//!         ClientConfig::builder()
//!             .hosts(["hcat-1.example.com", "hcat-2.example.com"])
//!             .user_name("etl")
//!             .build()?,
//!     )?;
//!
//!     println!("status: {}", client.server_status().await?);
//!
//!     for table in client.list_tables("default", Some("sales*")).await? {
//!         let desc = client.describe_table("default", &table, true).await?;
//!         println!("{}: {} columns", desc.table, desc.columns.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Failover
//!
//! The client keeps a cursor into its host pool. On a 503 it advances the
//! cursor and sends the request again to the next host, up to
//! `max_failovers` times per call (one per pooled host by default). The
//! retry keeps the path and method but sends only `user.name` as query
//! parameters and no body, unless `replay_on_failover` is enabled.
//!
//! The cursor is shared by all callers of one client instance.
//!
//! # Error Handling
//!
//! All operations return `Result<T, ClientError>`. Non-success responses
//! surface as `ClientError::Status` carrying the HTTP status and, when the
//! server sent one, WebHCat's `errorCode`. Use `ClientError::code()` to
//! check for service codes such as 10241 (table is not partitioned).

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod rotator;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{SharedClient, WebHcatClient};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use dispatcher::{Dispatcher, USER_NAME_PARAM};
pub use error::{ClientError, Result, SERVER_BUSY};
pub use reqwest::Method;
pub use rotator::{Endpoint, HostRotator, API_PREFIX};
pub use transport::{FormBody, HttpRequest, QueryParams, ReqwestTransport, Transport};
pub use types::{
    ApiError, Column, DatabaseDescription, PartitionDescription, PartitionSummary,
    PartitionValue, TableDescription,
};
