//! Mock transport for testing.
//!
//! Replays a script of responses in order and records every request.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use crate::error::{TransportError, TransportResult};
use crate::traits::transport::{Transport, TransportRequest, TransportResponse};

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    Response(TransportResponse),
    /// Simulate a request that never produced a status
    Timeout,
}

/// Mock transport for testing.
///
/// Each call to `get` consumes the next scripted reply. When the script runs
/// out, calls fail with a timeout.
///
/// # Example
///
/// ```rust
/// use extraction::transports::MockTransport;
///
/// let mock = MockTransport::new()
///     .respond(404, "")
///     .respond(200, "<html></html>");
/// assert_eq!(mock.call_count(), 0);
/// ```
#[derive(Default)]
pub struct MockTransport {
    replies: Arc<RwLock<VecDeque<MockReply>>>,
    calls: Arc<RwLock<Vec<TransportRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn push(&self, reply: MockReply) {
        self.replies.write().unwrap().push_back(reply);
    }

    /// Queue a response with the given status and body (builder pattern).
    pub fn respond(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.push(MockReply::Response(TransportResponse::new(status, body)));
        self
    }

    /// Queue a fully built response (builder pattern).
    pub fn respond_with(self, response: TransportResponse) -> Self {
        self.push(MockReply::Response(response));
        self
    }

    /// Queue a transport failure (builder pattern).
    pub fn fail_transport(self) -> Self {
        self.push(MockReply::Timeout);
        self
    }

    /// Get the number of times `get` was called.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Get the requests that were made, in order.
    pub fn calls(&self) -> Vec<TransportRequest> {
        self.calls.read().unwrap().clone()
    }

    /// Get the requested URLs, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.calls
            .read()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            replies: Arc::clone(&self.replies),
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, request: &TransportRequest) -> TransportResult<TransportResponse> {
        self.calls.write().unwrap().push(request.clone());

        let reply = self.replies.write().unwrap().pop_front();
        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Timeout) | None => Err(TransportError::Timeout {
                url: request.url.clone(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let mock = MockTransport::new().respond(404, "").respond(200, "ok");

        let first = mock.get(&TransportRequest::new("a")).await.unwrap();
        let second = mock.get(&TransportRequest::new("b")).await.unwrap();

        assert_eq!(first.status, 404);
        assert_eq!(second.body, b"ok");
        assert_eq!(mock.requested_urls(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_exhausted_script_times_out() {
        let mock = MockTransport::new();
        let err = mock.get(&TransportRequest::new("a")).await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout { .. }));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockTransport::new().respond(200, "x");
        let clone = mock.clone();
        clone.get(&TransportRequest::new("a")).await.unwrap();
        assert_eq!(mock.call_count(), 1);
    }
}
