//! # Transport Module
//!
//! One-shot HTTP requests to the collector.
//!
//! This module handles:
//! - Describing a POST request (URL, headers, body)
//! - The [`HttpTransport`] capability: acquire, send, read, release
//! - A blocking implementation on top of `ureq` ([`http`])
//!
//! There is no retry, redirect handling beyond the client default, or explicit
//! timeout here. One call is one exchange.

pub mod http;

use crate::error::TransportError;

pub use http::UreqTransport;

/// A single POST request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl PostRequest {
    /// Start a request to `url` with no headers and an empty body
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Add a request header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the request body
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Value of the first header matching `name` (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// `true` for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability to perform one blocking HTTP POST
///
/// Each call owns the whole exchange: the connection is acquired, the request
/// sent, the full body read, and the connection released before returning.
/// Any HTTP status, including 4xx and 5xx, is returned as `Ok`.
#[cfg_attr(test, mockall::automock)]
pub trait HttpTransport {
    fn post(&mut self, request: &PostRequest) -> Result<HttpResponse, TransportError>;
}
