// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, ThisError)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Engine Error: {0}")]
    Engine(#[from] EngineError),
    #[error("Host Error: {0}")]
    Host(#[from] HostError),
}

/// Failures reported by a media engine adapter.
///
/// None of these cross a controller boundary: the video surface logs them and
/// degrades to "state unchanged".
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum EngineError {
    /// The engine could not start with the supplied configuration.
    #[error("engine initialization failed: {0}")]
    InitializationFailed(String),

    /// A command was issued before `initialize` succeeded.
    #[error("engine is not initialized")]
    NotInitialized,

    /// The requested media does not exist.
    #[error("media not found: {}", .0.display())]
    MediaNotFound(PathBuf),

    /// The engine worker is gone (shut down or crashed).
    #[error("engine worker disconnected")]
    Disconnected,

    /// The engine refused an option or value.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl EngineError {
    /// Returns the notification key used when surfacing this error to the user.
    pub fn notification_key(&self) -> &'static str {
        match self {
            EngineError::InitializationFailed(_) => "notification-engine-init-failed",
            EngineError::NotInitialized => "notification-engine-not-ready",
            EngineError::MediaNotFound(_) => "notification-media-not-found",
            EngineError::Disconnected => "notification-engine-disconnected",
            EngineError::Unsupported(_) => "notification-engine-unsupported",
        }
    }
}

/// Failures of a single bus handler. Delivery to other subscribers continues.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum HandlerError {
    /// The subscriber was dropped without unsubscribing.
    #[error("subscriber {0} is gone")]
    SubscriberGone(u64),

    /// The subscriber is already borrowed further up the call stack.
    #[error("subscriber {0} is busy")]
    Busy(u64),

    /// The handler rejected the message.
    #[error("handler rejected message: {0}")]
    Rejected(String),
}

/// Failures reported by the presentation host while relocating the transport bar.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum HostError {
    #[error("fullscreen surface is not available")]
    SurfaceUnavailable,
    #[error("transport control failed to attach: {0}")]
    AttachFailed(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
