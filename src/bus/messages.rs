// SPDX-License-Identifier: MPL-2.0
//! Message contracts exchanged over the [`MessageBus`](super::MessageBus).
//!
//! Messages are named by intent and come in two flavours:
//!
//! - **Commands** ask for a change (`SeekTo`, `ChangeVolume`, ...). Issuing one
//!   says nothing about the resulting state.
//! - **Facts** announce a change that already happened (`PlaybackStateChanged`,
//!   `ProgressUpdated`, `VolumeChanged`, ...). Display state is only ever
//!   updated from facts.
//!
//! `FullscreenChanged` is both: whoever initiates a toggle publishes it with
//! the new value, and every subscriber treats it as the single authoritative
//! transition.

use crate::playback::{PlaybackRate, Volume};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// A playlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaItem {
    pub path: PathBuf,
    pub title: String,
}

impl MediaItem {
    /// Creates an item titled after the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, title }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Seek to an absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekTo {
    pub position_ms: u64,
}

/// Set the restorable volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeVolume {
    pub volume: Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleMute;

/// Request playing (`true`) or paused (`false`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPlaybackCommand {
    pub want_playing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangePlaybackSpeed {
    pub rate: PlaybackRate,
}

/// Stop playback and rewind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPlayback;

/// The new presentation mode. Published by the initiator of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenChanged {
    pub fullscreen: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSelected {
    pub item: MediaItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistUpdated {
    pub items: Vec<MediaItem>,
}

// =============================================================================
// Facts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStateChanged {
    pub is_playing: bool,
}

/// Playback progress as a 0..=1 fraction of the total duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdated {
    pub fraction: f64,
}

/// The reconciled restorable volume and mute flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeChanged {
    pub volume: Volume,
    pub muted: bool,
}

/// The engine reached the end of the current media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaEnded;

/// The engine accepted `item`. A selection the engine refused never produces this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLoaded {
    pub item: MediaItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackRateChanged {
    pub rate: PlaybackRate,
}

// =============================================================================
// Dispatch table
// =============================================================================

/// A message type that can travel over the bus.
pub trait Message: Clone + fmt::Debug + 'static {
    /// Discriminant used as the routing key.
    const KIND: MessageKind;

    /// Wraps the message into the bus-wide tagged union.
    fn wrap(self) -> BusMessage;

    /// Borrows the message back out of the union if the variant matches.
    fn peek(message: &BusMessage) -> Option<&Self>;
}

macro_rules! bus_messages {
    ($($name:ident),+ $(,)?) => {
        /// Routing key: one per message type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MessageKind {
            $($name),+
        }

        /// Every message the bus can carry.
        #[derive(Debug, Clone, PartialEq)]
        pub enum BusMessage {
            $($name($name)),+
        }

        impl BusMessage {
            #[must_use]
            pub fn kind(&self) -> MessageKind {
                match self {
                    $(BusMessage::$name(_) => MessageKind::$name),+
                }
            }
        }

        $(
            impl Message for $name {
                const KIND: MessageKind = MessageKind::$name;

                fn wrap(self) -> BusMessage {
                    BusMessage::$name(self)
                }

                fn peek(message: &BusMessage) -> Option<&Self> {
                    match message {
                        BusMessage::$name(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )+
    };
}

bus_messages! {
    SeekTo,
    ChangeVolume,
    ToggleMute,
    SetPlaybackCommand,
    ChangePlaybackSpeed,
    StopPlayback,
    FullscreenChanged,
    MediaSelected,
    PlaylistUpdated,
    PlaybackStateChanged,
    ProgressUpdated,
    VolumeChanged,
    MediaEnded,
    MediaLoaded,
    PlaybackRateChanged,
}

/// A message stamped with the instant of the input that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    message: BusMessage,
    issued_at: Instant,
}

impl Envelope {
    pub fn new<T: Message>(message: T) -> Self {
        Self::issued(message, Instant::now())
    }

    pub fn issued<T: Message>(message: T, issued_at: Instant) -> Self {
        Self {
            message: message.wrap(),
            issued_at,
        }
    }

    #[must_use]
    pub fn message(&self) -> &BusMessage {
        &self.message
    }

    #[must_use]
    pub fn kind(&self) -> MessageKind {
        self.message.kind()
    }

    #[must_use]
    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }

    /// Borrows the payload as `T` if this envelope carries one.
    #[must_use]
    pub fn get<T: Message>(&self) -> Option<&T> {
        T::peek(&self.message)
    }
}

/// Messages produced while handling input or another message.
///
/// Handlers never publish directly; they append to an outbox that the bus
/// (or the shell, for user input) flushes once the handler has returned.
///
/// Every message queued here carries the outbox's instant, so a whole
/// cascade shares the time of the input that started it.
#[derive(Debug)]
pub struct Outbox {
    pending: Vec<Envelope>,
    now: Instant,
}

impl Default for Outbox {
    fn default() -> Self {
        Self::at(Instant::now())
    }
}

impl Outbox {
    /// An outbox stamped with the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An outbox stamped with `now`.
    #[must_use]
    pub fn at(now: Instant) -> Self {
        Self {
            pending: Vec::new(),
            now,
        }
    }

    /// Instant of the input or message being handled.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Queues a message for publication.
    pub fn publish<T: Message>(&mut self, message: T) {
        self.pending.push(Envelope::issued(message, self.now));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Iterates over queued envelopes without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Envelope> {
        self.pending.iter()
    }

    /// Returns the queued messages of type `T`, in publication order.
    pub fn messages<T: Message>(&self) -> Vec<T> {
        self.pending.iter().filter_map(Envelope::get::<T>).cloned().collect()
    }

    /// Takes every queued envelope.
    pub fn drain(&mut self) -> impl Iterator<Item = Envelope> + '_ {
        self.pending.drain(..)
    }
}
