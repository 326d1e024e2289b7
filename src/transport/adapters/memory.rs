//! Scripted in-memory transport adapter.

use crate::transport::{
    OutboundRequest, OutboundResponse, ServiceTransport, TransportError, TransportResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

/// How the in-memory transport answers calls to one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    /// Answer immediately with the response.
    Respond(OutboundResponse),
    /// Answer with the response after a delay.
    Delayed(Duration, OutboundResponse),
    /// Fail with a connection error carrying the message.
    Fail(String),
    /// Never answer.
    Hang,
}

/// In-memory transport that answers from a script instead of the network.
///
/// Replies are keyed by URL without its query string. Calls to endpoints with
/// no script fail with a connection error. Every request is recorded so tests
/// can assert on what was sent.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceTransport {
    state: Arc<RwLock<InMemoryTransportState>>,
}

#[derive(Debug, Default)]
struct InMemoryTransportState {
    replies: HashMap<String, ScriptedReply>,
    sent: Vec<OutboundRequest>,
}

fn endpoint_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_query(None);
    key.set_fragment(None);
    key.to_string()
}

fn lock_error(err: impl std::fmt::Display) -> TransportError {
    TransportError::Unavailable(err.to_string())
}

impl InMemoryServiceTransport {
    /// Creates a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the reply for an endpoint, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unavailable`] when the endpoint is not a
    /// valid URL or lock acquisition fails.
    pub fn script(&self, endpoint: &str, reply: ScriptedReply) -> TransportResult<()> {
        let url = Url::parse(endpoint)
            .map_err(|err| TransportError::Unavailable(format!("{endpoint}: {err}")))?;
        let mut state = self.state.write().map_err(lock_error)?;
        state.replies.insert(endpoint_key(&url), reply);
        Ok(())
    }

    /// Scripts an immediate response for an endpoint.
    ///
    /// # Errors
    ///
    /// See [`InMemoryServiceTransport::script`].
    pub fn respond(&self, endpoint: &str, response: OutboundResponse) -> TransportResult<()> {
        self.script(endpoint, ScriptedReply::Respond(response))
    }

    /// Returns every request sent so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unavailable`] when lock acquisition fails.
    pub fn sent_requests(&self) -> TransportResult<Vec<OutboundRequest>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.sent.clone())
    }
}

#[async_trait]
impl ServiceTransport for InMemoryServiceTransport {
    async fn send(&self, request: OutboundRequest) -> TransportResult<OutboundResponse> {
        let url = request.url().to_string();
        let reply = {
            let mut state = self.state.write().map_err(lock_error)?;
            let reply = state.replies.get(&endpoint_key(request.url())).cloned();
            state.sent.push(request);
            reply
        };

        match reply {
            Some(ScriptedReply::Respond(response)) => Ok(response),
            Some(ScriptedReply::Delayed(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Some(ScriptedReply::Fail(message)) => Err(TransportError::Connect { url, message }),
            Some(ScriptedReply::Hang) => std::future::pending().await,
            None => Err(TransportError::Connect {
                url,
                message: "connection refused".to_owned(),
            }),
        }
    }
}
