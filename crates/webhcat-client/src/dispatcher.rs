//! Request dispatch with identity injection and busy-host failover.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::rotator::HostRotator;
use crate::transport::{FormBody, HttpRequest, QueryParams, Transport};
use reqwest::Method;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Query parameter carrying the caller identity.
pub const USER_NAME_PARAM: &str = "user.name";

/// Issues requests against the active host and fails over on 503.
///
/// A failover re-sends the same path and method to the next host. Unless
/// `replay_on_failover` is set, the retry carries only `user.name`: the
/// caller's query parameters and body are dropped.
pub struct Dispatcher {
    rotator: HostRotator,
    transport: Arc<dyn Transport>,
    user_name: String,
    max_failovers: usize,
    replay_on_failover: bool,
    failovers: AtomicU64,
}

impl Dispatcher {
    /// Create a dispatcher over the configured host pool.
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let rotator = HostRotator::new(config.hosts.clone(), config.port)?;
        Ok(Self {
            rotator,
            transport,
            user_name: config.user_name.clone(),
            max_failovers: config.failover_limit(),
            replay_on_failover: config.replay_on_failover,
            failovers: AtomicU64::new(0),
        })
    }

    /// The host rotator backing this dispatcher.
    pub fn rotator(&self) -> &HostRotator {
        &self.rotator
    }

    /// Identity injected as `user.name`.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Busy-host retries performed since construction.
    ///
    /// Every retry after a 503 counts, including those where another caller
    /// had already moved the cursor, so this can exceed the number of
    /// rotations.
    pub fn failover_count(&self) -> u64 {
        self.failovers.load(Ordering::Relaxed)
    }

    /// Perform one logical request.
    ///
    /// `path` is appended to the active base URL. The decoded JSON body is
    /// returned as-is. Only a 503 from the host leads to a retry; every
    /// other error is returned unchanged.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<QueryParams>,
        form: Option<FormBody>,
    ) -> Result<Value> {
        let mut query = query;
        let mut form = form;
        let mut failovers = 0usize;

        loop {
            let endpoint = self.rotator.current();
            let request = HttpRequest {
                method: method.clone(),
                url: format!("{}{}", endpoint.base_url, path),
                query: self.with_identity(query.as_ref()),
                form: form.clone(),
            };

            match self.transport.send(request).await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_server_busy() && failovers < self.max_failovers => {
                    failovers += 1;
                    self.failovers.fetch_add(1, Ordering::Relaxed);
                    let next = self.rotator.advance_from(endpoint.index);

                    tracing::warn!(
                        method = %method,
                        path = %path,
                        busy_host = %self.rotator.hosts()[endpoint.index],
                        next_host = %self.rotator.hosts()[next],
                        failover = failovers,
                        max_failovers = self.max_failovers,
                        retry_after = ?error.retry_after(),
                        "Host busy, failing over"
                    );

                    if !self.replay_on_failover {
                        query = None;
                        form = None;
                    }
                }
                Err(error) => {
                    if error.is_server_busy() {
                        tracing::warn!(
                            method = %method,
                            path = %path,
                            failovers = failovers,
                            "Failover limit reached, giving up"
                        );
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Merge the caller's parameters with the identity, identity winning.
    fn with_identity(&self, query: Option<&QueryParams>) -> QueryParams {
        let mut merged = query.cloned().unwrap_or_default();
        merged.insert(USER_NAME_PARAM.to_string(), self.user_name.clone());
        merged
    }
}
