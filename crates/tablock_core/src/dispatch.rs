//! Serialized inbound queue for the coordinator.
//!
//! Requests from pages and the popup, and events from the browser, all
//! arrive on one channel. [`run`] applies them to the coordinator one at a
//! time, so no handler ever observes another mid-mutation.

use crate::coordinator::LockCoordinator;
use crate::error::{LockError, Result};
use crate::host::{BrowserEvent, BrowserHost};
use crate::protocol::{MessageSender, Request, Response};
use crate::store::PersistentStore;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::debug;

/// One unit of work for the coordinator.
#[derive(Debug)]
pub enum Inbound {
    /// A protocol request. The response goes to `reply` when present.
    Request {
        request: Request,
        sender: MessageSender,
        reply: Option<Sender<Response>>,
    },
    /// A browser event.
    Event(BrowserEvent),
}

/// Drains `inbound` until every sender is gone. Returns how many messages
/// were handled.
pub fn run<S, H>(coordinator: &mut LockCoordinator<S, H>, inbound: Receiver<Inbound>) -> usize
where
    S: PersistentStore,
    H: BrowserHost,
{
    let mut handled = 0;
    for message in inbound {
        handle(coordinator, message);
        handled += 1;
    }
    debug!(handled, "Inbound queue closed");
    handled
}

/// Applies one message to completion.
pub fn handle<S, H>(coordinator: &mut LockCoordinator<S, H>, message: Inbound)
where
    S: PersistentStore,
    H: BrowserHost,
{
    match message {
        Inbound::Request {
            request,
            sender,
            reply,
        } => {
            let action = request.action();
            let response = coordinator.handle_request(request, &sender);
            if let Some(reply) = reply {
                // The asker may have gone away; the request was still applied.
                if reply.send(response).is_err() {
                    debug!(action, "Reply receiver dropped");
                }
            }
        }
        Inbound::Event(event) => coordinator.handle_event(event),
    }
}

/// Cloneable handle for posting work to a running coordinator loop.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    inbound: Sender<Inbound>,
}

impl CoordinatorHandle {
    /// Creates a handle and the receiver to pass to [`run`].
    pub fn channel() -> (Self, Receiver<Inbound>) {
        let (inbound, receiver) = mpsc::channel();
        (Self { inbound }, receiver)
    }

    /// Sends a request and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Protocol`] if the loop has stopped.
    pub fn request(&self, request: Request, sender: MessageSender) -> Result<Response> {
        let (reply, response) = mpsc::channel();
        self.inbound
            .send(Inbound::Request {
                request,
                sender,
                reply: Some(reply),
            })
            .map_err(|_| LockError::Protocol("coordinator is not running".into()))?;
        response
            .recv()
            .map_err(|_| LockError::Protocol("coordinator dropped the request".into()))
    }

    /// Posts a browser event without waiting.
    pub fn event(&self, event: BrowserEvent) -> Result<()> {
        self.inbound
            .send(Inbound::Event(event))
            .map_err(|_| LockError::Protocol("coordinator is not running".into()))
    }
}

/// A recorded inbound message, one JSON object per line:
/// `{"event": {...}}` or `{"request": {...}, "sender": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    /// A recorded browser event.
    Event { event: BrowserEvent },
    /// A recorded request and who sent it (the popup when absent).
    Request {
        request: Request,
        #[serde(default)]
        sender: MessageSender,
    },
}

impl Envelope {
    /// Parses one recorded line.
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| LockError::Deserialization(e.to_string()))
    }

    /// Turns the record into queue work with no reply slot.
    pub fn into_inbound(self) -> Inbound {
        match self {
            Self::Event { event } => Inbound::Event(event),
            Self::Request { request, sender } => Inbound::Request {
                request,
                sender,
                reply: None,
            },
        }
    }
}
