//! The subscription graph.
//!
//! Every edge gets its own [`EdgeId`] and is stored twice: in the event's
//! subscriber list and in the handler's subscription list. All mutation of
//! either list goes through the methods below, which always touch both
//! sides, so the two lists agree (with matching multiplicity) whenever the
//! graph is not mid-call.

use crate::reaction::Reaction;
use crate::types::{EventId, HandlerId};
use std::collections::HashMap;

/// Identity of a single subscription. Repeated subscriptions of the same
/// handler to the same event get distinct edge ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct EdgeId(u64);

/// Graph-side state of a handler.
pub(crate) struct HandlerEntry<A> {
    pub(crate) reaction: Reaction<A>,
    /// Events this handler is subscribed to, in subscription order.
    pub(crate) subscriptions: Vec<(EdgeId, EventId)>,
}

/// Graph-side state of an event.
pub(crate) struct EventEntry {
    pub(crate) label: Option<String>,
    /// Handlers to call, in invocation order.
    pub(crate) subscribers: Vec<(EdgeId, HandlerId)>,
    /// Bumped whenever `subscribers` changes.
    generation: u64,
}

impl EventEntry {
    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

/// One pending call of an invocation pass.
pub(crate) struct Delivery<A> {
    pub(crate) edge: EdgeId,
    pub(crate) handler: HandlerId,
    pub(crate) reaction: Reaction<A>,
}

/// The subscriber list of an event as of one generation.
pub(crate) struct Snapshot<A> {
    pub(crate) generation: u64,
    pub(crate) deliveries: Vec<Delivery<A>>,
}

/// Remove the entry carrying `edge` from `list`.
fn remove_edge<T>(list: &mut Vec<(EdgeId, T)>, edge: EdgeId) -> bool {
    match list.iter().position(|(id, _)| *id == edge) {
        Some(pos) => {
            list.remove(pos);
            true
        }
        None => false,
    }
}

pub(crate) struct Graph<A> {
    handlers: HashMap<HandlerId, HandlerEntry<A>>,
    events: HashMap<EventId, EventEntry>,
    next_edge: u64,
}

impl<A> Graph<A> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            events: HashMap::new(),
            next_edge: 1,
        }
    }

    pub(crate) fn insert_handler(&mut self, id: HandlerId, reaction: Reaction<A>) {
        self.handlers.insert(
            id,
            HandlerEntry {
                reaction,
                subscriptions: Vec::new(),
            },
        );
    }

    pub(crate) fn insert_event(&mut self, id: EventId, label: Option<String>) {
        self.events.insert(
            id,
            EventEntry {
                label,
                subscribers: Vec::new(),
                generation: 0,
            },
        );
    }

    /// Sever all edges of a handler and take its entry out of the graph.
    pub(crate) fn remove_handler(&mut self, id: HandlerId) -> Option<HandlerEntry<A>> {
        self.reset_handler(id);
        self.handlers.remove(&id)
    }

    /// Sever all edges of an event and take its entry out of the graph.
    pub(crate) fn remove_event(&mut self, id: EventId) -> Option<EventEntry> {
        self.reset_event(id);
        self.events.remove(&id)
    }

    /// Append one edge. Returns false if either side is unknown.
    pub(crate) fn subscribe(&mut self, event: EventId, handler: HandlerId) -> bool {
        let (Some(e), Some(h)) = (self.events.get_mut(&event), self.handlers.get_mut(&handler))
        else {
            return false;
        };
        let edge = EdgeId(self.next_edge);
        self.next_edge += 1;
        e.subscribers.push((edge, handler));
        e.touch();
        h.subscriptions.push((edge, event));
        true
    }

    /// Remove the first edge between `event` and `handler`.
    /// Returns false if there was none.
    pub(crate) fn unsubscribe(&mut self, event: EventId, handler: HandlerId) -> bool {
        let Some(e) = self.events.get_mut(&event) else {
            return false;
        };
        let Some(pos) = e.subscribers.iter().position(|(_, h)| *h == handler) else {
            return false;
        };
        let (edge, _) = e.subscribers.remove(pos);
        e.touch();
        if let Some(h) = self.handlers.get_mut(&handler) {
            remove_edge(&mut h.subscriptions, edge);
        }
        true
    }

    /// Remove every edge of a handler. Returns how many were removed.
    pub(crate) fn reset_handler(&mut self, id: HandlerId) -> usize {
        let Some(h) = self.handlers.get_mut(&id) else {
            return 0;
        };
        let subscriptions = std::mem::take(&mut h.subscriptions);
        for (edge, event) in &subscriptions {
            if let Some(e) = self.events.get_mut(event) {
                if remove_edge(&mut e.subscribers, *edge) {
                    e.touch();
                }
            }
        }
        subscriptions.len()
    }

    /// Remove every edge of an event. Returns how many were removed.
    pub(crate) fn reset_event(&mut self, id: EventId) -> usize {
        let Some(e) = self.events.get_mut(&id) else {
            return 0;
        };
        let subscribers = std::mem::take(&mut e.subscribers);
        e.touch();
        for (edge, handler) in &subscribers {
            if let Some(h) = self.handlers.get_mut(handler) {
                remove_edge(&mut h.subscriptions, *edge);
            }
        }
        subscribers.len()
    }

    /// The edges of an event paired with their reactions, in order.
    pub(crate) fn snapshot(&self, event: EventId) -> Snapshot<A> {
        let Some(e) = self.events.get(&event) else {
            return Snapshot {
                generation: 0,
                deliveries: Vec::new(),
            };
        };
        let deliveries = e
            .subscribers
            .iter()
            .filter_map(|(edge, id)| {
                self.handlers.get(id).map(|h| Delivery {
                    edge: *edge,
                    handler: *id,
                    reaction: h.reaction.clone(),
                })
            })
            .collect();
        Snapshot {
            generation: e.generation,
            deliveries,
        }
    }

    /// Whether `edge` still belongs to `event`. Only scans the subscriber
    /// list when it changed since `generation`.
    pub(crate) fn is_live(&self, event: EventId, edge: EdgeId, generation: u64) -> bool {
        match self.events.get(&event) {
            Some(e) if e.generation == generation => true,
            Some(e) => e.subscribers.iter().any(|(id, _)| *id == edge),
            None => false,
        }
    }

    /// Number of edges between `event` and `handler`.
    pub(crate) fn edge_count(&self, event: EventId, handler: HandlerId) -> usize {
        self.events.get(&event).map_or(0, |e| {
            e.subscribers.iter().filter(|(_, h)| *h == handler).count()
        })
    }

    pub(crate) fn subscribers(&self, event: EventId) -> Vec<HandlerId> {
        self.events
            .get(&event)
            .map(|e| e.subscribers.iter().map(|(_, h)| *h).collect())
            .unwrap_or_default()
    }

    pub(crate) fn subscriptions(&self, handler: HandlerId) -> Vec<EventId> {
        self.handlers
            .get(&handler)
            .map(|h| h.subscriptions.iter().map(|(_, e)| *e).collect())
            .unwrap_or_default()
    }

    pub(crate) fn subscriber_count(&self, event: EventId) -> usize {
        self.events.get(&event).map_or(0, |e| e.subscribers.len())
    }

    pub(crate) fn subscription_count(&self, handler: HandlerId) -> usize {
        self.handlers
            .get(&handler)
            .map_or(0, |h| h.subscriptions.len())
    }

    pub(crate) fn label(&self, event: EventId) -> Option<&str> {
        self.events.get(&event).and_then(|e| e.label.as_deref())
    }

    pub(crate) fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Total number of edges.
    pub(crate) fn total_edges(&self) -> usize {
        self.events.values().map(|e| e.subscribers.len()).sum()
    }

    /// Check that every edge appears exactly once on each side, joining the
    /// same event and handler, and that no list names a missing entry.
    pub(crate) fn is_consistent(&self) -> bool {
        let mut from_events: HashMap<EdgeId, (EventId, HandlerId)> = HashMap::new();
        for (event_id, e) in &self.events {
            for (edge, handler_id) in &e.subscribers {
                if !self.handlers.contains_key(handler_id)
                    || from_events.insert(*edge, (*event_id, *handler_id)).is_some()
                {
                    return false;
                }
            }
        }

        let mut from_handlers: HashMap<EdgeId, (EventId, HandlerId)> = HashMap::new();
        for (handler_id, h) in &self.handlers {
            for (edge, event_id) in &h.subscriptions {
                if !self.events.contains_key(event_id)
                    || from_handlers.insert(*edge, (*event_id, *handler_id)).is_some()
                {
                    return false;
                }
            }
        }

        from_events == from_handlers
    }
}
