//! Error types for reaction delivery.
//!
//! Subscription bookkeeping never fails. These errors only describe what
//! happened when a reaction was called.

use thiserror::Error;

/// Error raised while delivering a payload to a reaction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Reaction failed: {0}")]
    Reaction(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Bound target was dropped")]
    TargetDropped,

    #[error("Channel buffer is full")]
    ChannelFull,

    #[error("Channel receiver disconnected")]
    ChannelClosed,
}

impl Error {
    /// Wrap an arbitrary error raised by a fallible reaction.
    pub fn reaction<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Reaction(err.into())
    }
}

impl<T> From<crossbeam_channel::TrySendError<T>> for Error {
    fn from(e: crossbeam_channel::TrySendError<T>) -> Self {
        match e {
            crossbeam_channel::TrySendError::Full(_) => Error::ChannelFull,
            crossbeam_channel::TrySendError::Disconnected(_) => Error::ChannelClosed,
        }
    }
}

/// Result type for reaction delivery.
pub type Result<T> = std::result::Result<T, Error>;
