//! In-memory transport for tests.

use crate::protocol::Request;
use crate::transport::{Transport, TransportError};
use catan_core::{GameSnapshot, SchemaViolation};
use std::collections::VecDeque;

/// Replays queued replies in order and records every request it was sent.
///
/// Running out of replies behaves like the server hanging up.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: VecDeque<String>,
    requests: Vec<Request>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw reply document.
    pub fn push_raw(&mut self, reply: impl Into<String>) -> &mut Self {
        self.replies.push_back(reply.into());
        self
    }

    /// Queue a snapshot as its JSON reply.
    pub fn push(&mut self, snapshot: &GameSnapshot) -> Result<&mut Self, SchemaViolation> {
        let reply = snapshot.to_json()?;
        Ok(self.push_raw(reply))
    }

    pub fn with_replies<'a>(
        snapshots: impl IntoIterator<Item = &'a GameSnapshot>,
    ) -> Result<Self, SchemaViolation> {
        let mut transport = Self::new();
        for snapshot in snapshots {
            transport.push(snapshot)?;
        }
        Ok(transport)
    }

    /// Requests sent so far, oldest first.
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn calls(&self) -> usize {
        self.requests.len()
    }

    pub fn pending(&self) -> usize {
        self.replies.len()
    }
}

impl Transport for ScriptedTransport {
    fn exchange(&mut self, request: &Request) -> Result<String, TransportError> {
        self.requests.push(request.clone());
        self.replies.pop_front().ok_or(TransportError::Closed)
    }
}
