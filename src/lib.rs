//! # Bilink
//!
//! Typed events and handlers whose subscriptions are tracked from both
//! sides, without either side owning the other.
//!
//! ## Core Concepts
//!
//! - **Handler**: Wraps one reaction and knows which events it is subscribed to
//! - **Event**: Holds an ordered list of handlers and calls them on `invoke`
//! - **Registry**: Per-payload-type graph that mirrors every subscription
//!
//! Dropping, resetting, moving or swapping either side keeps the other side
//! consistent: an event never calls a dropped handler, and a handler never
//! remembers a dropped event.
//!
//! ## Example
//!
//! ```
//! use bilink::{Event, Handler};
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use std::sync::Arc;
//!
//! let total = Arc::new(AtomicI32::new(0));
//! let t = Arc::clone(&total);
//!
//! let event = Event::<i32>::new();
//! let handler = Handler::new(move |i: i32| t.fetch_add(i, Ordering::SeqCst));
//!
//! event.subscribe(&handler);
//! event.invoke(5)?;
//! drop(handler);
//! event.invoke(5)?;
//!
//! assert_eq!(total.load(Ordering::SeqCst), 5);
//! # Ok::<(), bilink::Error>(())
//! ```

pub mod channel;
pub mod error;
pub mod event;
pub mod handler;
pub mod reaction;
pub mod registry;
pub mod types;

// Re-exports
pub use channel::ChannelHandler;
pub use error::{Error, Result};
pub use event::Event;
pub use handler::Handler;
pub use reaction::Reaction;
pub use registry::Registry;
pub use types::{ChannelConfig, EventId, HandlerId};
