//! Handlers: the subscriber side of a subscription.

use crate::error::Result;
use crate::reaction::Reaction;
use crate::registry::Registry;
use crate::types::{EventId, HandlerId};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A reaction plus the set of events it is subscribed to.
///
/// Dropping a handler unsubscribes it from every event first, so an event
/// never calls a handler that no longer exists. Handlers are deliberately
/// not `Clone`: events refer to a handler by identity.
pub struct Handler<A: 'static> {
    id: HandlerId,
    reaction: Reaction<A>,
    registry: Arc<Registry<A>>,
}

impl<A: 'static> Handler<A> {
    /// Create a handler from a closure or free function.
    /// Any return value of `f` is discarded.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::from_reaction(Reaction::new(f))
    }

    /// Create a handler whose errors surface through `invoke`.
    pub fn fallible<F, E>(f: F) -> Self
    where
        F: Fn(A) -> std::result::Result<(), E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::from_reaction(Reaction::fallible(f))
    }

    /// Create a handler calling a mutating method on `target`.
    ///
    /// The handler does not keep `target` alive.
    pub fn bind<T, M, R>(target: &Arc<Mutex<T>>, method: M) -> Self
    where
        T: Send + 'static,
        M: Fn(&mut T, A) -> R + Send + Sync + 'static,
    {
        Self::from_reaction(Reaction::bind(target, method))
    }

    /// Create a handler calling a read-only method on `target`.
    pub fn bind_ref<T, M, R>(target: &Arc<T>, method: M) -> Self
    where
        T: Send + Sync + 'static,
        M: Fn(&T, A) -> R + Send + Sync + 'static,
    {
        Self::from_reaction(Reaction::bind_ref(target, method))
    }

    /// Create a handler around an existing reaction.
    pub fn from_reaction(reaction: Reaction<A>) -> Self {
        let registry = Registry::global();
        let id = registry.register_handler(reaction.clone());
        Self {
            id,
            reaction,
            registry,
        }
    }

    /// Call the reaction directly, whether or not the handler is subscribed.
    ///
    /// Errors raised by the reaction are returned untouched.
    pub fn invoke(&self, args: A) -> Result<()> {
        self.reaction.call(args)
    }

    /// Unsubscribe from every event. Calling it again is a no-op.
    pub fn reset(&self) {
        self.registry.reset_handler(self.id);
    }

    /// Exchange reactions and subscriptions with `other`.
    ///
    /// Events keep pointing at the same identities, so each event that used
    /// to call `other` now calls `self` and vice versa.
    pub fn swap(&mut self, other: &mut Self) {
        trace!(a = %self.id, b = %other.id, "swapping handlers");
        std::mem::swap(self, other);
    }

    /// Stable identity of this handler.
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Number of subscriptions, counting repeats.
    pub fn subscription_count(&self) -> usize {
        self.registry.handler_subscription_count(self.id)
    }

    /// Whether the handler is subscribed to any event.
    pub fn is_subscribed(&self) -> bool {
        self.subscription_count() > 0
    }

    /// Events this handler is subscribed to, in subscription order.
    pub fn events(&self) -> Vec<EventId> {
        self.registry.subscriptions(self.id)
    }
}

impl<A: 'static> Default for Handler<A> {
    /// A handler that ignores every payload.
    fn default() -> Self {
        Self::from_reaction(Reaction::noop())
    }
}

impl<A: 'static> Drop for Handler<A> {
    fn drop(&mut self) {
        self.registry.release_handler(self.id);
    }
}

impl<A: 'static> PartialEq for Handler<A> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<A: 'static> Eq for Handler<A> {}

impl<A: 'static> fmt::Debug for Handler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("id", &self.id)
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}
