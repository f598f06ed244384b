//! Outbound replication: one HTTP attempt per peer per write.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::PropagateError;
use crate::protocol::Message;

/// Default deadline for a single replication attempt.
///
/// Broadcast runs before the client gets its response, so a peer that never
/// answers must not hold the write open for longer than this.
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(2);

/// Delivers one replicated write to one peer.
///
/// Exactly one attempt is made per call: no retries, no backoff.
#[async_trait]
pub trait Propagator: Send + Sync {
    async fn send(&self, key: &str, value: &str, address: &str) -> Result<(), PropagateError>;
}

/// Propagator that POSTs a JSON [`Message`] to `{address}/message`.
#[derive(Clone, Debug)]
pub struct HttpPropagator {
    client: Client,
    timeout: Duration,
}

impl HttpPropagator {
    /// Builds a propagator whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    fn classify(&self, err: reqwest::Error) -> PropagateError {
        if err.is_timeout() {
            PropagateError::Timeout(self.timeout)
        } else {
            PropagateError::Transport(err)
        }
    }
}

#[async_trait]
impl Propagator for HttpPropagator {
    async fn send(&self, key: &str, value: &str, address: &str) -> Result<(), PropagateError> {
        let message = Message {
            key: key.to_string(),
            value: value.to_string(),
        };

        let response = self
            .client
            .post(message_url(address))
            .json(&message)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PropagateError::Status(status))
        }
    }
}

/// Replication endpoint for a peer address.
///
/// Peers are usually registered as `http://host:port`; a bare `host:port` is
/// treated as plain HTTP.
pub fn message_url(address: &str) -> String {
    let base = address.trim().trim_end_matches('/');
    if base.contains("://") {
        format!("{base}/message")
    } else {
        format!("http://{base}/message")
    }
}
