//! Channel-backed handlers for pulling payloads instead of reacting inline.

use crate::handler::Handler;
use crossbeam_channel::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// A subscribed handler paired with the receiving end of its channel.
///
/// Dropping it unsubscribes the handler like any other.
pub struct ChannelHandler<A: 'static> {
    handler: Handler<A>,
    receiver: Receiver<A>,
}

impl<A: 'static> ChannelHandler<A> {
    pub(crate) fn new(handler: Handler<A>, receiver: Receiver<A>) -> Self {
        Self { handler, receiver }
    }

    /// The handler that feeds the channel.
    pub fn handler(&self) -> &Handler<A> {
        &self.handler
    }

    /// Receive the next payload (blocking).
    pub fn recv(&self) -> Result<A, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a payload (non-blocking).
    pub fn try_recv(&self) -> Result<A, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<A, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently buffered.
    pub fn drain(&self) -> Vec<A> {
        self.receiver.try_iter().collect()
    }

    pub fn into_parts(self) -> (Handler<A>, Receiver<A>) {
        (self.handler, self.receiver)
    }
}
