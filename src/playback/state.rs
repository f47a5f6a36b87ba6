// SPDX-License-Identifier: MPL-2.0
//! The shared playback record.
//!
//! One [`PlaybackState`] exists per shell. Every controller receives a
//! [`SharedPlaybackState`] handle at construction; the handle is `!Send`, so
//! the record can only be touched from the UI context that created it.

use super::rate::PlaybackRate;
use super::volume::Volume;
use crate::config::paths::APP_NAME;
use std::cell::{Ref, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Everything about "what is playing and how".
///
/// Fields are read freely; writes go through the methods below so the
/// time/duration ordering and the mute/volume relationship always hold.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Progress mirror for display (0–100).
    position: f64,
    /// Restorable volume. Keeps the pre-mute level while muted.
    volume: Volume,
    is_playing: bool,
    is_muted: bool,
    is_fullscreen: bool,
    controls_enabled: bool,
    /// Empty when nothing is loaded.
    media_path: PathBuf,
    total_duration_ms: u64,
    current_time_ms: u64,
    playback_time_ms: u64,
    playback_rate: PlaybackRate,
    window_title: String,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            position: 0.0,
            volume: Volume::default(),
            is_playing: false,
            is_muted: false,
            is_fullscreen: false,
            controls_enabled: false,
            media_path: PathBuf::new(),
            total_duration_ms: 0,
            current_time_ms: 0,
            playback_time_ms: 0,
            playback_rate: PlaybackRate::default(),
            window_title: APP_NAME.to_string(),
        }
    }
}

impl PlaybackState {
    /// Creates the startup record with the given volume and rate.
    #[must_use]
    pub fn with_startup(volume: Volume, rate: PlaybackRate) -> Self {
        Self {
            volume,
            playback_rate: rate,
            ..Self::default()
        }
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Progress mirror for display, 0–100.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Restorable volume. Unchanged by muting.
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Volume the engine actually outputs: zero while muted.
    #[must_use]
    pub fn effective_volume(&self) -> Volume {
        if self.is_muted {
            Volume::ZERO
        } else {
            self.volume
        }
    }

    /// Last playing/paused state reported by the engine.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether the engine output is silenced.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    /// Current presentation mode.
    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    /// Whether the transport controls accept input. Set once playback first starts.
    #[must_use]
    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// Path of the loaded media; empty when nothing is loaded.
    #[must_use]
    pub fn media_path(&self) -> &Path {
        &self.media_path
    }

    /// Returns true once media has been loaded.
    #[must_use]
    pub fn has_media(&self) -> bool {
        !self.media_path.as_os_str().is_empty()
    }

    /// Length reported by the engine, or 0 while unknown.
    #[must_use]
    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    /// Last applied engine time, clamped to the known length.
    #[must_use]
    pub fn current_time_ms(&self) -> u64 {
        self.current_time_ms
    }

    /// Time the progress bar is drawn from. Tracks `current_time_ms`.
    #[must_use]
    pub fn playback_time_ms(&self) -> u64 {
        self.playback_time_ms
    }

    /// Speed the engine last accepted.
    #[must_use]
    pub fn playback_rate(&self) -> PlaybackRate {
        self.playback_rate
    }

    /// `<title> - MediaShell`, or the bare application name without media.
    #[must_use]
    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    /// Progress as a 0..=1 fraction. Zero until the engine reports a length.
    #[must_use]
    pub fn progress_fraction(&self) -> f64 {
        if self.total_duration_ms == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.playback_time_ms as f64 / self.total_duration_ms as f64;
        fraction.clamp(0.0, 1.0)
    }

    /// Progress as a 0..=100 percentage. Zero until the engine reports a length.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.progress_fraction() * 100.0
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    /// Records the restorable volume.
    pub fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    /// Records the mute flag. The restorable volume is left alone.
    pub fn set_muted(&mut self, muted: bool) {
        self.is_muted = muted;
    }

    /// Records the engine-confirmed playing state.
    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Records the presentation mode.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.is_fullscreen = fullscreen;
    }

    /// Enables or disables the transport controls.
    pub fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    /// Records the rate the engine accepted.
    pub fn set_playback_rate(&mut self, rate: PlaybackRate) {
        self.playback_rate = rate;
    }

    /// Records the engine-reported length and re-clamps the current time.
    pub fn set_total_duration(&mut self, total_ms: u64) {
        self.total_duration_ms = total_ms;
        self.set_current_time(self.current_time_ms);
    }

    /// Records the engine-reported time, clamped to the known length.
    pub fn set_current_time(&mut self, time_ms: u64) {
        let clamped = if self.total_duration_ms > 0 {
            time_ms.min(self.total_duration_ms)
        } else {
            time_ms
        };
        self.current_time_ms = clamped;
        self.playback_time_ms = clamped;
        self.position = self.progress_percent();
    }

    /// Rewinds time and progress to the start.
    pub fn reset_time(&mut self) {
        self.set_current_time(0);
    }

    /// Switches to new media: path, title, and a fresh timeline.
    pub fn set_media(&mut self, path: PathBuf, title: &str) {
        self.window_title = if title.is_empty() {
            APP_NAME.to_string()
        } else {
            format!("{title} - {APP_NAME}")
        };
        self.media_path = path;
        self.total_duration_ms = 0;
        self.current_time_ms = 0;
        self.playback_time_ms = 0;
        self.position = 0.0;
    }
}

/// Handle to the single shared [`PlaybackState`].
///
/// Cloning the handle shares the same record. The handle is deliberately
/// `!Send`: mutation is confined to the UI context.
#[derive(Debug, Clone, Default)]
pub struct SharedPlaybackState(Rc<RefCell<PlaybackState>>);

impl SharedPlaybackState {
    /// Wraps `state` in a new shared handle.
    #[must_use]
    pub fn new(state: PlaybackState) -> Self {
        Self(Rc::new(RefCell::new(state)))
    }

    /// Borrows the record for reading.
    ///
    /// # Panics
    ///
    /// Panics if called while [`update`](Self::update) is running on the same handle.
    #[must_use]
    pub fn read(&self) -> Ref<'_, PlaybackState> {
        self.0.borrow()
    }

    /// Applies a mutation and returns its result.
    pub fn update<R>(&self, f: impl FnOnce(&mut PlaybackState) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Returns a copy of the record.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackState {
        self.0.borrow().clone()
    }
}
