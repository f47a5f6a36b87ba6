// SPDX-License-Identifier: MPL-2.0
//! Video surface controller.
//!
//! Owns the media engine. Bus commands become engine calls; engine
//! notifications (already marshalled onto the UI context by the shell)
//! become playback state updates and fact messages. Also owns the
//! fullscreen state machine.
//!
//! Engine failures never leave this controller: they are logged and the
//! playback state stays as it was.

use super::fullscreen::{self, ControlVisibility, Effect, OverlayTimeout, SurfaceStyle};
use crate::bus::{
    ChangePlaybackSpeed, ChangeVolume, FullscreenChanged, MediaEnded, MediaLoaded, MediaSelected,
    MessageBus, Outbox, PlaybackRateChanged, PlaybackStateChanged, ProgressUpdated, SeekTo,
    SetPlaybackCommand, StopPlayback, SubscriberId, ToggleMute, VolumeChanged,
};
use crate::config::{Config, EngineConfig, DEFAULT_UNMUTE_VOLUME};
use crate::engine::{EngineNotification, MediaEngine, NotificationSink};
use crate::error::EngineError;
use crate::notifications::{Notification, Notifier};
use crate::playback::{SharedPlaybackState, UpdateThrottle, Volume};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Tunables taken from the user configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    pub engine: EngineConfig,
    pub time_update_interval: Duration,
    pub overlay_timeout: OverlayTimeout,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SurfaceOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            engine: config.engine.clone(),
            time_update_interval: config.playback.time_update_interval(),
            overlay_timeout: config
                .fullscreen
                .overlay_timeout_secs
                .map(OverlayTimeout::new)
                .unwrap_or_default(),
        }
    }
}

/// Result of [`VideoSurface::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Started with the configured options.
    Ready,
    /// Started with the reduced configuration after the first attempt failed.
    Degraded,
    /// Already running; nothing was done.
    AlreadyInitialized,
    /// Both attempts failed. The shell keeps running without playback.
    Failed,
}

pub struct VideoSurface {
    engine: Box<dyn MediaEngine>,
    engine_config: EngineConfig,
    state: SharedPlaybackState,
    throttle: UpdateThrottle,
    /// Last non-zero volume, restored by unmute.
    last_audible: Option<Volume>,
    /// Play/pause target requested but not yet confirmed by the engine.
    requested_playing: Option<bool>,
    fullscreen: fullscreen::State,
    disposed: bool,
}

impl std::fmt::Debug for VideoSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSurface")
            .field("initialized", &self.engine.is_initialized())
            .field("requested_playing", &self.requested_playing)
            .field("fullscreen", &self.fullscreen)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl VideoSurface {
    #[must_use]
    pub fn new(
        engine: Box<dyn MediaEngine>,
        state: SharedPlaybackState,
        options: SurfaceOptions,
    ) -> Self {
        let initial_volume = state.read().volume();
        Self {
            engine,
            engine_config: options.engine,
            state,
            throttle: UpdateThrottle::new(options.time_update_interval),
            last_audible: (!initial_volume.is_silent()).then_some(initial_volume),
            requested_playing: None,
            fullscreen: fullscreen::State::new(options.overlay_timeout),
            disposed: false,
        }
    }

    /// Registers the bus handlers. Returns false if any were already registered.
    pub fn subscribe(surface: &Rc<RefCell<Self>>, bus: &MessageBus, id: SubscriberId) -> bool {
        [
            bus.subscribe_weak::<SeekTo, _, _>(id, surface, |s, m, out| s.on_seek(m, out)),
            bus.subscribe_weak::<ChangeVolume, _, _>(id, surface, |s, m, out| {
                s.on_change_volume(m, out);
            }),
            bus.subscribe_weak::<ToggleMute, _, _>(id, surface, |s, _, out| s.on_toggle_mute(out)),
            bus.subscribe_weak::<SetPlaybackCommand, _, _>(id, surface, |s, m, out| {
                s.on_set_playback(m, out);
            }),
            bus.subscribe_weak::<ChangePlaybackSpeed, _, _>(id, surface, |s, m, out| {
                s.on_change_speed(m, out);
            }),
            bus.subscribe_weak::<StopPlayback, _, _>(id, surface, |s, _, out| s.on_stop(out)),
            bus.subscribe_weak::<MediaSelected, _, _>(id, surface, |s, m, out| {
                s.on_media_selected(m, out);
            }),
            bus.subscribe_weak::<FullscreenChanged, _, _>(id, surface, |s, m, out| {
                s.apply_fullscreen(m.fullscreen, out.now());
            }),
        ]
        .into_iter()
        .all(|added| added)
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Starts the engine. A second call is a no-op.
    ///
    /// On failure the reduced configuration is tried once; both outcomes are
    /// reported through `notifier`. Never returns an error.
    pub fn initialize(&mut self, sink: NotificationSink, notifier: &mut dyn Notifier) -> InitOutcome {
        if self.disposed {
            tracing::debug!("initialize ignored: surface disposed");
            return InitOutcome::Failed;
        }
        if self.engine.is_initialized() {
            tracing::debug!("engine already initialized");
            return InitOutcome::AlreadyInitialized;
        }

        let outcome = match self.engine.initialize(&self.engine_config, sink.clone()) {
            Ok(()) => InitOutcome::Ready,
            Err(first) => {
                tracing::warn!(error = %first, "engine initialization failed; retrying with reduced options");
                let degraded = self.engine_config.degraded();
                match self.engine.initialize(&degraded, sink) {
                    Ok(()) => {
                        notifier.notify(
                            Notification::warning("notification-engine-degraded")
                                .with_arg("reason", first.to_string()),
                        );
                        self.engine_config = degraded;
                        InitOutcome::Degraded
                    }
                    Err(second) => {
                        tracing::error!(error = %second, "engine initialization failed with reduced options");
                        notifier.notify(
                            Notification::error(second.notification_key())
                                .with_arg("reason", second.to_string()),
                        );
                        return InitOutcome::Failed;
                    }
                }
            }
        };

        self.sync_engine_with_state();
        tracing::info!(?outcome, "engine initialized");
        outcome
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        !self.disposed && self.engine.is_initialized()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Configuration the engine actually runs with.
    #[must_use]
    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine_config
    }

    /// Stops the hide timer and shuts the engine down. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.fullscreen.stop_timer();
        self.engine.shutdown();
        tracing::debug!("video surface disposed");
    }

    /// Pushes the startup volume, mute flag and rate to a fresh engine.
    fn sync_engine_with_state(&mut self) {
        let (volume, muted, rate) = {
            let s = self.state.read();
            (s.volume(), s.is_muted(), s.playback_rate())
        };
        let output = if muted { Volume::ZERO } else { volume };
        let result = self
            .engine
            .set_volume(output)
            .and_then(|()| self.engine.set_mute(muted))
            .and_then(|()| self.engine.set_playback_rate(rate.multiplier()));
        log_failure("sync startup settings", result);
    }

    // ---------------------------------------------------------------------
    // Media
    // ---------------------------------------------------------------------

    /// Opens `path` in the engine.
    ///
    /// Returns false without touching state when the engine is not running,
    /// the path is empty, or the media does not exist.
    pub fn load_media(&mut self, path: &Path, out: &mut Outbox) -> bool {
        if !self.is_initialized() {
            tracing::debug!(path = %path.display(), "load ignored: engine not initialized");
            return false;
        }
        if path.as_os_str().is_empty() {
            return false;
        }

        match self.engine.load_media(path) {
            Ok(()) => {}
            Err(EngineError::MediaNotFound(missing)) => {
                tracing::info!(path = %missing.display(), "media not found");
                return false;
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to load media");
                return false;
            }
        }

        self.throttle.reset();
        self.requested_playing = None;
        let was_playing = self.state.update(|s| {
            let was_playing = s.is_playing();
            s.set_playing(false);
            s.set_total_duration(0);
            s.reset_time();
            was_playing
        });
        if was_playing {
            out.publish(PlaybackStateChanged { is_playing: false });
        }
        out.publish(ProgressUpdated { fraction: 0.0 });
        true
    }

    // ---------------------------------------------------------------------
    // Bus commands
    // ---------------------------------------------------------------------

    /// Loads the selected item and confirms it with `MediaLoaded`.
    ///
    /// A refused load publishes nothing, so the current media stays selected.
    pub fn on_media_selected(&mut self, message: &MediaSelected, out: &mut Outbox) {
        if self.load_media(&message.item.path, out) {
            out.publish(MediaLoaded {
                item: message.item.clone(),
            });
        }
    }

    pub fn on_seek(&mut self, message: &SeekTo, _out: &mut Outbox) {
        let total = self.state.read().total_duration_ms();
        let target = if total > 0 {
            message.position_ms.min(total)
        } else {
            message.position_ms
        };
        if log_failure("seek", self.engine.seek(target)) {
            // A seek is a discontinuity: let the next time update through.
            self.throttle.reset();
        }
    }

    pub fn on_set_playback(&mut self, message: &SetPlaybackCommand, _out: &mut Outbox) {
        let expected = self
            .requested_playing
            .unwrap_or_else(|| self.state.read().is_playing());
        if message.want_playing == expected {
            return;
        }
        if log_failure("toggle play/pause", self.engine.toggle_play_pause()) {
            self.requested_playing = Some(message.want_playing);
        }
    }

    pub fn on_stop(&mut self, _out: &mut Outbox) {
        if log_failure("stop", self.engine.stop()) {
            self.requested_playing = Some(false);
        }
    }

    pub fn on_change_speed(&mut self, message: &ChangePlaybackSpeed, out: &mut Outbox) {
        let rate = message.rate;
        if log_failure(
            "set playback rate",
            self.engine.set_playback_rate(rate.multiplier()),
        ) {
            self.state.update(|s| s.set_playback_rate(rate));
            out.publish(PlaybackRateChanged { rate });
        }
    }

    /// Sets the restorable volume. A non-zero level while muted also unmutes;
    /// if the engine refuses the unmute its output volume is put back.
    pub fn on_change_volume(&mut self, message: &ChangeVolume, out: &mut Outbox) {
        let volume = message.volume;
        let previous_output = self.state.read().effective_volume();
        if !log_failure("set volume", self.engine.set_volume(volume)) {
            return;
        }

        let unmute = !volume.is_silent() && self.state.read().is_muted();
        if unmute && !log_failure("clear mute", self.engine.set_mute(false)) {
            log_failure("restore volume", self.engine.set_volume(previous_output));
            return;
        }
        if !volume.is_silent() {
            self.last_audible = Some(volume);
        }

        let muted = self.state.update(|s| {
            s.set_volume(volume);
            if unmute {
                s.set_muted(false);
            }
            s.is_muted()
        });
        out.publish(VolumeChanged { volume, muted });
    }

    /// Mutes (engine output to 0, restorable volume kept) or restores the
    /// last audible volume. Engine volume and mute flag are always set together.
    pub fn on_toggle_mute(&mut self, out: &mut Outbox) {
        let (muted, volume) = {
            let s = self.state.read();
            (s.is_muted(), s.volume())
        };

        if muted {
            let restore = self
                .last_audible
                .unwrap_or_else(|| Volume::new(DEFAULT_UNMUTE_VOLUME));
            let result = self
                .engine
                .set_volume(restore)
                .and_then(|()| self.engine.set_mute(false));
            if !log_failure("unmute", result) {
                return;
            }
            self.state.update(|s| {
                s.set_volume(restore);
                s.set_muted(false);
            });
            out.publish(VolumeChanged {
                volume: restore,
                muted: false,
            });
        } else {
            if !volume.is_silent() {
                self.last_audible = Some(volume);
            }
            let result = self
                .engine
                .set_volume(Volume::ZERO)
                .and_then(|()| self.engine.set_mute(true));
            if !log_failure("mute", result) {
                return;
            }
            self.state.update(|s| s.set_muted(true));
            out.publish(VolumeChanged {
                volume,
                muted: true,
            });
        }
    }

    // ---------------------------------------------------------------------
    // Engine notifications
    // ---------------------------------------------------------------------

    /// Applies one engine notification. Must run on the UI context.
    pub fn handle_engine(&mut self, notification: EngineNotification, now: Instant, out: &mut Outbox) {
        if self.disposed {
            tracing::debug!(?notification, "engine notification after dispose ignored");
            return;
        }

        match notification {
            EngineNotification::Playing => self.apply_playing(true, out),
            EngineNotification::Paused => self.apply_playing(false, out),
            EngineNotification::Stopped => {
                self.apply_playing(false, out);
                self.throttle.reset();
                self.state.update(|s| s.reset_time());
                out.publish(ProgressUpdated { fraction: 0.0 });
            }
            EngineNotification::EndReached => {
                self.apply_playing(false, out);
                let fraction = self.state.update(|s| {
                    s.set_current_time(s.total_duration_ms());
                    s.progress_fraction()
                });
                out.publish(ProgressUpdated { fraction });
                out.publish(MediaEnded);
            }
            EngineNotification::TimeChanged(time_ms) => {
                if !self.throttle.try_acquire(now) {
                    tracing::trace!(time_ms, "time update dropped");
                    return;
                }
                let fraction = self.state.update(|s| {
                    s.set_current_time(time_ms);
                    s.progress_fraction()
                });
                out.publish(ProgressUpdated { fraction });
            }
            EngineNotification::LengthChanged(length_ms) => {
                let fraction = self.state.update(|s| {
                    s.set_total_duration(length_ms);
                    s.progress_fraction()
                });
                out.publish(ProgressUpdated { fraction });
            }
            EngineNotification::VolumeChanged(level) => self.reconcile_volume(level, out),
        }
    }

    fn apply_playing(&mut self, playing: bool, out: &mut Outbox) {
        self.requested_playing = None;
        self.state.update(|s| {
            s.set_playing(playing);
            if playing {
                s.set_controls_enabled(true);
            }
        });
        out.publish(PlaybackStateChanged {
            is_playing: playing,
        });
    }

    /// Brings the state in line with the engine's current volume and mute flag.
    ///
    /// The notified level may be stale by the time it is drained; the
    /// engine's current values win. Publishes only if something changed.
    fn reconcile_volume(&mut self, reported: f32, out: &mut Outbox) {
        let muted = self.engine.is_muted();
        let volume = self.engine.volume();
        tracing::trace!(reported, current = volume.value(), muted, "engine volume changed");

        if !muted && !volume.is_silent() {
            self.last_audible = Some(volume);
        }
        let changed = self.state.update(|s| {
            let before = (s.volume(), s.is_muted());
            s.set_muted(muted);
            if !muted {
                s.set_volume(volume);
            }
            before != (s.volume(), s.is_muted())
        });
        if changed {
            let volume = self.state.read().volume();
            out.publish(VolumeChanged { volume, muted });
        }
    }

    // ---------------------------------------------------------------------
    // Fullscreen
    // ---------------------------------------------------------------------

    /// Applies the `FullscreenChanged` fact.
    pub fn apply_fullscreen(&mut self, fullscreen: bool, now: Instant) -> Effect {
        self.state.update(|s| s.set_fullscreen(fullscreen));
        self.fullscreen
            .handle(fullscreen::Message::FullscreenChanged(fullscreen), now)
    }

    pub fn pointer_moved(&mut self, now: Instant) -> Effect {
        self.fullscreen.handle(fullscreen::Message::PointerMoved, now)
    }

    pub fn pointer_entered_controls(&mut self, now: Instant) -> Effect {
        self.fullscreen
            .handle(fullscreen::Message::PointerEnteredControls, now)
    }

    pub fn pointer_left_controls(&mut self, now: Instant) -> Effect {
        self.fullscreen
            .handle(fullscreen::Message::PointerLeftControls, now)
    }

    /// Drives the auto-hide timer. Called from the UI tick.
    pub fn tick(&mut self, now: Instant) -> Effect {
        self.fullscreen.handle(fullscreen::Message::Tick, now)
    }

    #[must_use]
    pub fn controls_opacity(&self) -> f32 {
        self.fullscreen.controls_opacity()
    }

    #[must_use]
    pub fn controls_visibility(&self) -> ControlVisibility {
        self.fullscreen.visibility()
    }

    #[must_use]
    pub fn surface_style(&self) -> SurfaceStyle {
        self.fullscreen.style()
    }

    #[must_use]
    pub fn fullscreen(&self) -> &fullscreen::State {
        &self.fullscreen
    }
}

/// Logs an engine failure. Returns true on success.
fn log_failure(operation: &'static str, result: Result<(), EngineError>) -> bool {
    match result {
        Ok(()) => true,
        Err(EngineError::NotInitialized) => {
            tracing::debug!(operation, "ignored: engine not initialized");
            false
        }
        Err(err) => {
            tracing::warn!(operation, error = %err, "engine command failed");
            false
        }
    }
}
