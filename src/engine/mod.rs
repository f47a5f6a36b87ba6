// SPDX-License-Identifier: MPL-2.0
//! Media engine port.
//!
//! The decode/render engine is an external collaborator. This module defines
//! the command surface the shell drives ([`MediaEngine`]) and the
//! notifications the engine emits from its own thread
//! ([`EngineNotification`]). Notifications never reach shared state
//! directly: the engine posts them through a [`NotificationSink`], and the
//! UI context drains them on its own turn.
//!
//! # Lifecycle
//!
//! 1. `initialize` with the opaque [`EngineConfig`] and a sink
//! 2. `load_media` for each selected item
//! 3. transport commands (`toggle_play_pause`, `seek`, `set_volume`, ...)
//! 4. `shutdown` on teardown; late notifications are dropped by the sink's
//!    session guard
//!
//! All commands are fire-and-forget: they return as soon as the command is
//! queued and report the outcome through notifications.

pub mod simulated;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::playback::Volume;
use crate::ui_context::UiHandle;
use std::path::Path;

pub use simulated::SimulatedEngine;

/// Events emitted by the engine from its own execution context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineNotification {
    Playing,
    Paused,
    Stopped,
    EndReached,
    /// Current playback position (ms).
    TimeChanged(u64),
    /// Media length (ms). Fires once the engine knows it.
    LengthChanged(u64),
    /// The engine's output volume (0.0 to 100.0).
    VolumeChanged(f32),
}

/// Where the engine posts its notifications.
pub type NotificationSink = UiHandle<EngineNotification>;

/// Port for the media engine adapter.
///
/// Implementations own their worker threads; the trait object itself stays
/// on the UI context.
pub trait MediaEngine {
    /// Starts the engine with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InitializationFailed`] if the engine rejects
    /// the configuration.
    fn initialize(&mut self, config: &EngineConfig, sink: NotificationSink)
        -> Result<(), EngineError>;

    fn is_initialized(&self) -> bool;

    /// Opens `path`, replacing the current media. Playback starts paused.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MediaNotFound`] if the path does not exist.
    fn load_media(&mut self, path: &Path) -> Result<(), EngineError>;

    fn toggle_play_pause(&mut self) -> Result<(), EngineError>;

    fn stop(&mut self) -> Result<(), EngineError>;

    fn seek(&mut self, position_ms: u64) -> Result<(), EngineError>;

    fn set_volume(&mut self, volume: Volume) -> Result<(), EngineError>;

    fn set_mute(&mut self, muted: bool) -> Result<(), EngineError>;

    /// Sets the playback speed multiplier (1.0 is normal speed).
    fn set_playback_rate(&mut self, multiplier: f32) -> Result<(), EngineError>;

    /// Last volume set on the engine.
    fn volume(&self) -> Volume;

    fn is_muted(&self) -> bool;

    /// Stops the worker. Idempotent.
    fn shutdown(&mut self);
}

/// In-memory engine that records commands, for controller unit tests.
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Initialize { hardware_acceleration: bool },
        Load(PathBuf),
        TogglePlayPause,
        Stop,
        Seek(u64),
        SetVolume(u8),
        SetMute(bool),
        SetRate(f32),
        Shutdown,
    }

    /// Shared view of what the engine was asked to do.
    #[derive(Debug, Default)]
    pub struct Log {
        pub calls: Vec<Call>,
    }

    #[derive(Debug)]
    pub struct FakeEngine {
        pub log: Rc<RefCell<Log>>,
        /// Number of upcoming `initialize` calls that fail.
        pub failing_inits: usize,
        pub missing_media: bool,
        /// `set_mute(false)` fails.
        pub refuse_unmute: bool,
        /// `set_playback_rate` fails.
        pub refuse_rate: bool,
        initialized: bool,
        volume: Volume,
        muted: bool,
    }

    impl FakeEngine {
        pub fn new() -> (Self, Rc<RefCell<Log>>) {
            let log = Rc::new(RefCell::new(Log::default()));
            let engine = Self {
                log: Rc::clone(&log),
                failing_inits: 0,
                missing_media: false,
                refuse_unmute: false,
                refuse_rate: false,
                initialized: false,
                volume: Volume::default(),
                muted: false,
            };
            (engine, log)
        }

        fn record(&self, call: Call) {
            self.log.borrow_mut().calls.push(call);
        }

        fn ready(&self) -> Result<(), EngineError> {
            if self.initialized {
                Ok(())
            } else {
                Err(EngineError::NotInitialized)
            }
        }
    }

    impl MediaEngine for FakeEngine {
        fn initialize(
            &mut self,
            config: &EngineConfig,
            _sink: NotificationSink,
        ) -> Result<(), EngineError> {
            self.record(Call::Initialize {
                hardware_acceleration: config.hardware_acceleration,
            });
            if self.failing_inits > 0 {
                self.failing_inits -= 1;
                return Err(EngineError::InitializationFailed("no device".into()));
            }
            self.initialized = true;
            Ok(())
        }

        fn is_initialized(&self) -> bool {
            self.initialized
        }

        fn load_media(&mut self, path: &Path) -> Result<(), EngineError> {
            self.ready()?;
            if self.missing_media {
                return Err(EngineError::MediaNotFound(path.to_path_buf()));
            }
            self.record(Call::Load(path.to_path_buf()));
            Ok(())
        }

        fn toggle_play_pause(&mut self) -> Result<(), EngineError> {
            self.ready()?;
            self.record(Call::TogglePlayPause);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), EngineError> {
            self.ready()?;
            self.record(Call::Stop);
            Ok(())
        }

        fn seek(&mut self, position_ms: u64) -> Result<(), EngineError> {
            self.ready()?;
            self.record(Call::Seek(position_ms));
            Ok(())
        }

        fn set_volume(&mut self, volume: Volume) -> Result<(), EngineError> {
            self.ready()?;
            self.volume = volume;
            self.record(Call::SetVolume(volume.value()));
            Ok(())
        }

        fn set_mute(&mut self, muted: bool) -> Result<(), EngineError> {
            self.ready()?;
            if !muted && self.refuse_unmute {
                return Err(EngineError::Unsupported("unmute".into()));
            }
            self.muted = muted;
            self.record(Call::SetMute(muted));
            Ok(())
        }

        fn set_playback_rate(&mut self, multiplier: f32) -> Result<(), EngineError> {
            self.ready()?;
            if self.refuse_rate {
                return Err(EngineError::Unsupported(format!("rate {multiplier}")));
            }
            self.record(Call::SetRate(multiplier));
            Ok(())
        }

        fn volume(&self) -> Volume {
            self.volume
        }

        fn is_muted(&self) -> bool {
            self.muted
        }

        fn shutdown(&mut self) {
            self.record(Call::Shutdown);
            self.initialized = false;
        }
    }
}
