//! Blocking HTTP/1.1 transport backed by `ureq`.

use tracing::debug;

use super::{HttpResponse, HttpTransport, PostRequest};
use crate::error::TransportError;

/// `ureq` agent wrapper
///
/// No request timeout is configured; the transport's own defaults bound how
/// long a POST may block.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl HttpTransport for UreqTransport {
    fn post(&mut self, request: &PostRequest) -> Result<HttpResponse, TransportError> {
        let mut req = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            req = req.set(name, value);
        }

        debug!("POST {} ({} bytes)", request.url, request.body.len());

        // ureq reports 4xx/5xx as errors; they are ordinary responses here
        let response = match req.send_string(&request.body) {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(e)) => return Err(TransportError::Request(e.to_string())),
        };

        let status = response.status();
        let body = response.into_string()?;
        Ok(HttpResponse { status, body })
    }
}
