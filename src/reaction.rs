//! Callable reactions invoked by handlers.
//!
//! Every way of reacting to a payload (closure, fallible closure, method
//! bound to an object, channel sender) is turned into the same capability:
//! "call with `A`, report whether delivery worked".

use crate::error::{Error, Result};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

type ReactionFn<A> = dyn Fn(A) -> Result<()> + Send + Sync;

/// A shareable callable accepting the payload `A`.
pub struct Reaction<A> {
    f: Arc<ReactionFn<A>>,
}

impl<A: 'static> Reaction<A> {
    /// Wrap a closure or free function. Its return value is discarded.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(move |args: A| {
                let _ = f(args);
                Ok(())
            }),
        }
    }

    /// Wrap a closure whose errors should reach the caller of `invoke`.
    pub fn fallible<F, E>(f: F) -> Self
    where
        F: Fn(A) -> std::result::Result<(), E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            f: Arc::new(move |args: A| f(args).map_err(Error::reaction)),
        }
    }

    /// Bind a mutating method to `target` without owning it.
    ///
    /// Once the target is dropped, calls report [`Error::TargetDropped`].
    /// The target's lock is held for the duration of the call, so the
    /// method must not re-enter a pass that reaches this reaction again.
    pub fn bind<T, M, R>(target: &Arc<Mutex<T>>, method: M) -> Self
    where
        T: Send + 'static,
        M: Fn(&mut T, A) -> R + Send + Sync + 'static,
    {
        let target: Weak<Mutex<T>> = Arc::downgrade(target);
        Self {
            f: Arc::new(move |args: A| {
                let target = target.upgrade().ok_or(Error::TargetDropped)?;
                let mut guard = target.lock();
                let _ = method(&mut *guard, args);
                Ok(())
            }),
        }
    }

    /// Bind a read-only method to `target` without owning it.
    pub fn bind_ref<T, M, R>(target: &Arc<T>, method: M) -> Self
    where
        T: Send + Sync + 'static,
        M: Fn(&T, A) -> R + Send + Sync + 'static,
    {
        let target: Weak<T> = Arc::downgrade(target);
        Self {
            f: Arc::new(move |args: A| {
                let target = target.upgrade().ok_or(Error::TargetDropped)?;
                let _ = method(&*target, args);
                Ok(())
            }),
        }
    }

    /// Forward every payload into a channel.
    pub fn channel(sender: Sender<A>) -> Self
    where
        A: Send,
    {
        Self {
            f: Arc::new(move |args: A| sender.try_send(args).map_err(Error::from)),
        }
    }

    /// A reaction that does nothing.
    pub fn noop() -> Self {
        Self::new(|_: A| ())
    }
}

impl<A> Reaction<A> {
    /// Call the reaction.
    pub fn call(&self, args: A) -> Result<()> {
        (self.f)(args)
    }
}

impl<A> Clone for Reaction<A> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<A> fmt::Debug for Reaction<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reaction").finish_non_exhaustive()
    }
}
