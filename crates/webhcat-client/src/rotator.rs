//! Host pool rotation.
//!
//! The rotator owns the ordered host pool and a cursor selecting the active
//! host. Base URLs are precomputed per host, so the "current base URL" is
//! always derived from the cursor and never stored separately.
//!
//! # Concurrency
//!
//! The cursor is an `AtomicUsize`, so a rotator can be shared freely. Callers
//! sharing one client still share one cursor: a request started on host A
//! may be retried on host C if another call rotated past host B in between.
//! [`HostRotator::advance_from`] keeps concurrent failures reported against
//! the same host from rotating more than once.

use crate::error::{ClientError, Result};
use std::borrow::Cow;
use std::net::Ipv6Addr;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Path prefix of the WebHCat v1 API.
pub const API_PREFIX: &str = "templeton/v1";

/// A host selected from the pool together with its base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Index of the host in the pool
    pub index: usize,
    /// `http://{host}:{port}/templeton/v1`
    pub base_url: String,
}

/// Host as it appears in a URL authority.
///
/// IPv6 literals are bracketed; any other host containing `:` is rejected,
/// since the port always comes from the configuration.
pub(crate) fn url_host(host: &str) -> Option<Cow<'_, str>> {
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        return inner.parse::<Ipv6Addr>().ok().map(|_| Cow::Borrowed(host));
    }
    if host.parse::<Ipv6Addr>().is_ok() {
        return Some(Cow::Owned(format!("[{}]", host)));
    }
    if host.contains(':') {
        return None;
    }
    Some(Cow::Borrowed(host))
}

/// Ordered host pool with a wrapping cursor.
#[derive(Debug)]
pub struct HostRotator {
    hosts: Vec<String>,
    base_urls: Vec<String>,
    cursor: AtomicUsize,
}

impl HostRotator {
    /// Create a rotator positioned on the first host.
    pub fn new(hosts: Vec<String>, port: u16) -> Result<Self> {
        if hosts.is_empty() {
            return Err(ClientError::Config(
                "hosts must contain at least one host".to_string(),
            ));
        }

        let base_urls = hosts
            .iter()
            .map(|host| {
                let authority = url_host(host).ok_or_else(|| {
                    ClientError::Config(format!(
                        "host '{}' must not carry a port; use the port setting",
                        host
                    ))
                })?;
                Ok(format!("http://{}:{}/{}", authority, port, API_PREFIX))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            hosts,
            base_urls,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Number of hosts in the pool.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Always false; an empty pool is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// The host pool, in rotation order.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Index of the active host.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// Base URL of the active host.
    pub fn base_url(&self) -> &str {
        &self.base_urls[self.cursor()]
    }

    /// Snapshot of the active host.
    pub fn current(&self) -> Endpoint {
        let index = self.cursor();
        Endpoint {
            index,
            base_url: self.base_urls[index].clone(),
        }
    }

    /// Move to the next host, wrapping to the first after the last.
    ///
    /// Returns the new cursor.
    pub fn advance(&self) -> usize {
        let len = self.hosts.len();
        let previous = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some((c + 1) % len))
            .unwrap_or_else(|c| c);
        (previous + 1) % len
    }

    /// Move past `observed` unless another caller already did.
    ///
    /// Returns the cursor after the call, which is the host the caller
    /// should use next.
    pub fn advance_from(&self, observed: usize) -> usize {
        let next = (observed + 1) % self.hosts.len();
        match self
            .cursor
            .compare_exchange(observed, next, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => next,
            Err(current) => current,
        }
    }
}
