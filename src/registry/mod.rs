//! Shared registry resolving handler and event ids.
//!
//! Handlers and events never point at each other directly. Each one holds
//! an id into the registry for its payload type, and the registry performs
//! every mirrored add and remove under a single lock.
//!
//! Reactions are never called while the lock is held, and entries taken
//! out of the graph are dropped only after it is released. Reactions
//! (and values captured by them) may therefore subscribe, unsubscribe or
//! drop handlers and events freely.

mod graph;

use crate::reaction::Reaction;
use crate::types::{next_id, EventId, HandlerId};
use graph::Graph;
pub(crate) use graph::{Delivery, EdgeId, Snapshot};
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// Registry of all handlers and events carrying payload `A`.
pub struct Registry<A> {
    graph: Mutex<Graph<A>>,
}

impl<A: 'static> Registry<A> {
    fn new() -> Self {
        Self {
            graph: Mutex::new(Graph::new()),
        }
    }

    /// The process-wide registry for payload `A`, created on first use.
    pub fn global() -> Arc<Self> {
        static REGISTRIES: OnceLock<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>> =
            OnceLock::new();

        let mut registries = REGISTRIES.get_or_init(Default::default).lock();
        if let Some(existing) = registries
            .get(&TypeId::of::<A>())
            .and_then(|r| r.downcast_ref::<Arc<Self>>())
        {
            return Arc::clone(existing);
        }

        let registry = Arc::new(Self::new());
        registries.insert(TypeId::of::<A>(), Box::new(Arc::clone(&registry)));
        trace!(payload = std::any::type_name::<A>(), "created registry");
        registry
    }

    // --- Introspection ---

    /// Number of live handlers.
    pub fn handler_count(&self) -> usize {
        self.graph.lock().handler_count()
    }

    /// Number of live events.
    pub fn event_count(&self) -> usize {
        self.graph.lock().event_count()
    }

    /// Total number of subscriptions across all events.
    pub fn subscription_count(&self) -> usize {
        self.graph.lock().total_edges()
    }

    /// Whether every subscription is mirrored on both sides.
    pub fn is_consistent(&self) -> bool {
        self.graph.lock().is_consistent()
    }

    // --- Lifecycle ---

    pub(crate) fn register_handler(&self, reaction: Reaction<A>) -> HandlerId {
        let id = HandlerId(next_id());
        self.graph.lock().insert_handler(id, reaction);
        trace!(handler = %id, "registered handler");
        id
    }

    pub(crate) fn register_event(&self, label: Option<String>) -> EventId {
        let id = EventId(next_id());
        self.graph.lock().insert_event(id, label);
        trace!(event = %id, "registered event");
        id
    }

    pub(crate) fn release_handler(&self, id: HandlerId) {
        let entry = self.graph.lock().remove_handler(id);
        if let Some(entry) = entry {
            trace!(handler = %id, subscriptions = entry.subscriptions.len(), "released handler");
        }
    }

    pub(crate) fn release_event(&self, id: EventId) {
        let entry = self.graph.lock().remove_event(id);
        if let Some(entry) = entry {
            trace!(event = %id, label = ?entry.label, "released event");
        }
    }

    // --- Edges ---

    pub(crate) fn subscribe(&self, event: EventId, handler: HandlerId) {
        if self.graph.lock().subscribe(event, handler) {
            debug!(event = %event, handler = %handler, "subscribed");
        }
    }

    pub(crate) fn unsubscribe(&self, event: EventId, handler: HandlerId) -> bool {
        let removed = self.graph.lock().unsubscribe(event, handler);
        if removed {
            debug!(event = %event, handler = %handler, "unsubscribed");
        } else {
            trace!(event = %event, handler = %handler, "unsubscribe of absent handler ignored");
        }
        removed
    }

    pub(crate) fn reset_handler(&self, id: HandlerId) {
        let removed = self.graph.lock().reset_handler(id);
        if removed > 0 {
            debug!(handler = %id, removed, "handler reset");
        }
    }

    pub(crate) fn reset_event(&self, id: EventId) {
        let removed = self.graph.lock().reset_event(id);
        if removed > 0 {
            debug!(event = %id, removed, "event reset");
        }
    }

    // --- Queries ---

    pub(crate) fn snapshot(&self, event: EventId) -> Snapshot<A> {
        self.graph.lock().snapshot(event)
    }

    pub(crate) fn is_live(&self, event: EventId, edge: EdgeId, generation: u64) -> bool {
        self.graph.lock().is_live(event, edge, generation)
    }

    pub(crate) fn edge_count(&self, event: EventId, handler: HandlerId) -> usize {
        self.graph.lock().edge_count(event, handler)
    }

    pub(crate) fn subscribers(&self, event: EventId) -> Vec<HandlerId> {
        self.graph.lock().subscribers(event)
    }

    pub(crate) fn subscriptions(&self, handler: HandlerId) -> Vec<EventId> {
        self.graph.lock().subscriptions(handler)
    }

    pub(crate) fn subscriber_count(&self, event: EventId) -> usize {
        self.graph.lock().subscriber_count(event)
    }

    pub(crate) fn handler_subscription_count(&self, handler: HandlerId) -> usize {
        self.graph.lock().subscription_count(handler)
    }

    pub(crate) fn label(&self, event: EventId) -> Option<String> {
        self.graph.lock().label(event).map(str::to_owned)
    }
}
