//! Events: the publisher side of a subscription.

use crate::channel::ChannelHandler;
use crate::error::Result;
use crate::handler::Handler;
use crate::reaction::Reaction;
use crate::registry::{Delivery, Registry};
use crate::types::{ChannelConfig, EventId, HandlerId};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// An ordered list of handlers notified on every invocation.
///
/// Dropping an event removes it from the subscription list of every
/// handler first. Events are not `Clone` for the same identity reasons as
/// [`Handler`].
pub struct Event<A: 'static> {
    id: EventId,
    registry: Arc<Registry<A>>,
}

impl<A: 'static> Event<A> {
    /// Create an event with no subscribers.
    pub fn new() -> Self {
        Self::register(None)
    }

    /// Create an event carrying a label for log output.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self::register(Some(label.into()))
    }

    fn register(label: Option<String>) -> Self {
        let registry = Registry::global();
        let id = registry.register_event(label);
        Self { id, registry }
    }

    /// Stable identity of this event.
    pub fn id(&self) -> EventId {
        self.id
    }

    /// The label given to [`Event::with_label`], if any.
    pub fn label(&self) -> Option<String> {
        self.registry.label(self.id)
    }

    // --- Subscriptions ---

    /// Append `handler` to the invocation order.
    ///
    /// Subscribing the same handler twice creates two independent
    /// subscriptions: it is called twice per pass and must be unsubscribed
    /// twice.
    pub fn subscribe(&self, handler: &Handler<A>) {
        self.registry.subscribe(self.id, handler.id());
    }

    /// Create a handler from `f` and subscribe it.
    ///
    /// The subscription lasts as long as the returned handler.
    #[must_use = "dropping the handler immediately unsubscribes it"]
    pub fn subscribe_fn<F, R>(&self, f: F) -> Handler<A>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        let handler = Handler::new(f);
        self.subscribe(&handler);
        handler
    }

    /// Subscribe a handler that forwards every payload into a channel.
    #[must_use = "dropping the channel handler immediately unsubscribes it"]
    pub fn subscribe_channel(&self, config: ChannelConfig) -> ChannelHandler<A>
    where
        A: Send,
    {
        let (sender, receiver) = match config.buffer_size {
            Some(size) => crossbeam_channel::bounded(size),
            None => crossbeam_channel::unbounded(),
        };
        let handler = Handler::from_reaction(Reaction::channel(sender));
        self.subscribe(&handler);
        ChannelHandler::new(handler, receiver)
    }

    /// Remove the first subscription of `handler`.
    ///
    /// Returns false, and changes nothing, if it was not subscribed.
    pub fn unsubscribe(&self, handler: &Handler<A>) -> bool {
        self.registry.unsubscribe(self.id, handler.id())
    }

    /// Remove every subscription. The handlers themselves stay usable.
    pub fn reset(&self) {
        self.registry.reset_event(self.id);
    }

    /// Exchange subscriber lists with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        trace!(a = %self.id, b = %other.id, "swapping events");
        std::mem::swap(self, other);
    }

    // --- Introspection ---

    /// Number of subscriptions, counting repeats.
    pub fn subscriber_count(&self) -> usize {
        self.registry.subscriber_count(self.id)
    }

    /// Whether no handler is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscriber_count() == 0
    }

    /// How many times `handler` is subscribed to this event.
    pub fn count(&self, handler: &Handler<A>) -> usize {
        self.registry.edge_count(self.id, handler.id())
    }

    /// Subscribed handlers in invocation order.
    pub fn handlers(&self) -> Vec<HandlerId> {
        self.registry.subscribers(self.id)
    }
}

impl<A: Clone + 'static> Event<A> {
    /// Call every subscribed handler in subscription order.
    ///
    /// The pass stops at the first reaction error, which is returned as is;
    /// handlers after the failing one are not called. A panicking reaction
    /// unwinds through this call the same way.
    ///
    /// The pass walks a snapshot of the subscriber list taken before the
    /// first call. Subscriptions added during the pass wait for the next
    /// one. A subscription removed before its turn (by unsubscribe, reset or
    /// drop) is skipped, even if the same handler is still subscribed
    /// through another registration.
    pub fn invoke(&self, args: A) -> Result<()> {
        let snapshot = self.registry.snapshot(self.id);
        trace!(event = %self.id, handlers = snapshot.deliveries.len(), "invoking");

        for Delivery {
            edge,
            handler,
            reaction,
        } in snapshot.deliveries
        {
            if !self.registry.is_live(self.id, edge, snapshot.generation) {
                trace!(event = %self.id, handler = %handler, "skipping subscription removed mid-pass");
                continue;
            }
            reaction.call(args.clone())?;
        }

        Ok(())
    }
}

impl<A: 'static> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Drop for Event<A> {
    fn drop(&mut self) {
        self.registry.release_event(self.id);
    }
}

impl<A: 'static> PartialEq for Event<A> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<A: 'static> Eq for Event<A> {}

impl<A: 'static> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("id", &self.id)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
