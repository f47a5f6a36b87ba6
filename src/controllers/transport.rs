// SPDX-License-Identifier: MPL-2.0
//! Transport bar controller.
//!
//! Renders display-ready values from the shared state and turns user input
//! into commands. Display values only change in response to facts, never to
//! commands this controller issued itself.
//!
//! While the user drags the progress handle, the drag is the single
//! authority over the displayed position: incoming `ProgressUpdated` facts
//! are ignored until the drag ends.

use crate::bus::{
    ChangePlaybackSpeed, ChangeVolume, FullscreenChanged, MessageBus, Outbox,
    PlaybackRateChanged, PlaybackStateChanged, ProgressUpdated, SeekTo, SetPlaybackCommand,
    SubscriberId, ToggleMute, VolumeChanged,
};
use crate::playback::time_format::format_progress;
use crate::playback::{PlaybackRate, SharedPlaybackState, Volume};
use std::cell::RefCell;
use std::rc::Rc;

/// Volume below which the low icon is shown.
const LOW_VOLUME_THRESHOLD: u8 = 33;

/// Volume below which the medium icon is shown.
const MEDIUM_VOLUME_THRESHOLD: u8 = 66;

/// Volume icon selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeIcon {
    Muted,
    Low,
    Medium,
    High,
}

impl VolumeIcon {
    /// Icon for a restorable level and mute flag.
    #[must_use]
    pub fn for_level(volume: Volume, muted: bool) -> Self {
        let level = volume.value();
        if muted || level == 0 {
            VolumeIcon::Muted
        } else if level < LOW_VOLUME_THRESHOLD {
            VolumeIcon::Low
        } else if level < MEDIUM_VOLUME_THRESHOLD {
            VolumeIcon::Medium
        } else {
            VolumeIcon::High
        }
    }
}

/// Progress percentage (0–100) from playback time and duration.
///
/// Zero until the duration is known.
#[must_use]
pub fn display_progress(playback_time_ms: u64, total_duration_ms: u64) -> f64 {
    if total_duration_ms == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let percent = playback_time_ms as f64 / total_duration_ms as f64 * 100.0;
    percent.clamp(0.0, 100.0)
}

/// Absolute seek target for a progress percentage.
#[must_use]
pub fn seek_target(percent: f64, total_duration_ms: u64) -> u64 {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let target = (percent.clamp(0.0, 100.0) / 100.0 * total_duration_ms as f64).round() as u64;
    target
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    /// Playback was active when the drag began.
    resume: bool,
    percent: f64,
}

#[derive(Debug)]
pub struct Transport {
    state: SharedPlaybackState,
    display_progress: f64,
    is_playing: bool,
    is_fullscreen: bool,
    volume: Volume,
    muted: bool,
    speed: PlaybackRate,
    drag: Option<Drag>,
    /// Guards against emitting commands while the controller sets itself up.
    initialized: bool,
}

impl Transport {
    /// Mirrors the current state. The startup speed goes through the speed
    /// menu with the command guard still up, so construction issues nothing.
    #[must_use]
    pub fn new(state: SharedPlaybackState) -> Self {
        let snapshot = state.snapshot();
        let mut transport = Self {
            display_progress: display_progress(
                snapshot.playback_time_ms(),
                snapshot.total_duration_ms(),
            ),
            is_playing: snapshot.is_playing(),
            is_fullscreen: snapshot.is_fullscreen(),
            volume: snapshot.volume(),
            muted: snapshot.is_muted(),
            speed: PlaybackRate::default(),
            drag: None,
            initialized: false,
            state,
        };
        transport.select_speed(snapshot.playback_rate().index(), &mut Outbox::new());
        transport.initialized = true;
        transport
    }

    /// Registers the fact handlers. Returns false if any were already registered.
    pub fn subscribe(transport: &Rc<RefCell<Self>>, bus: &MessageBus, id: SubscriberId) -> bool {
        [
            bus.subscribe_weak::<PlaybackStateChanged, _, _>(id, transport, |t, m, _| {
                t.on_playback_state_changed(m);
            }),
            bus.subscribe_weak::<ProgressUpdated, _, _>(id, transport, |t, m, _| {
                t.on_progress_updated(m);
            }),
            bus.subscribe_weak::<VolumeChanged, _, _>(id, transport, |t, m, _| {
                t.on_volume_changed(m);
            }),
            bus.subscribe_weak::<PlaybackRateChanged, _, _>(id, transport, |t, m, _| {
                t.on_playback_rate_changed(m);
            }),
            bus.subscribe_weak::<FullscreenChanged, _, _>(id, transport, |t, m, _| {
                t.is_fullscreen = m.fullscreen;
            }),
        ]
        .into_iter()
        .all(|added| added)
    }

    // ---------------------------------------------------------------------
    // Derived display values
    // ---------------------------------------------------------------------

    /// Slider position, 0–100.
    #[must_use]
    pub fn display_progress(&self) -> f64 {
        self.display_progress
    }

    /// `current / total` time text.
    #[must_use]
    pub fn time_text(&self) -> String {
        let s = self.state.read();
        format_progress(s.current_time_ms(), s.total_duration_ms())
    }

    /// Icon for the last reported volume and mute flag.
    #[must_use]
    pub fn volume_icon(&self) -> VolumeIcon {
        VolumeIcon::for_level(self.volume, self.muted)
    }

    /// Last reported restorable volume.
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Whether the play/pause button shows the playing state.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    /// True between `begin_drag` and `end_drag`.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Speed the engine last confirmed.
    #[must_use]
    pub fn selected_speed(&self) -> PlaybackRate {
        self.speed
    }

    /// Speed menu label, e.g. `1.50x`.
    #[must_use]
    pub fn speed_label(&self) -> String {
        self.speed.label()
    }

    // ---------------------------------------------------------------------
    // Facts
    // ---------------------------------------------------------------------

    pub fn on_playback_state_changed(&mut self, message: &PlaybackStateChanged) {
        self.is_playing = message.is_playing;
    }

    /// Moves the slider to the shared playback time unless a drag owns it.
    pub fn on_progress_updated(&mut self, _message: &ProgressUpdated) {
        if self.drag.is_some() {
            return;
        }
        let s = self.state.read();
        self.display_progress = display_progress(s.playback_time_ms(), s.total_duration_ms());
    }

    pub fn on_volume_changed(&mut self, message: &VolumeChanged) {
        self.volume = message.volume;
        self.muted = message.muted;
    }

    pub fn on_playback_rate_changed(&mut self, message: &PlaybackRateChanged) {
        self.speed = message.rate;
    }

    // ---------------------------------------------------------------------
    // User input
    // ---------------------------------------------------------------------

    /// Requests the opposite of the last reported playing state.
    pub fn play_pause(&mut self, out: &mut Outbox) {
        out.publish(SetPlaybackCommand {
            want_playing: !self.is_playing,
        });
    }

    /// Starts a drag gesture. Pauses playback for the duration of the drag.
    pub fn begin_drag(&mut self, out: &mut Outbox) {
        if self.drag.is_some() {
            return;
        }
        let resume = self.state.read().is_playing();
        self.drag = Some(Drag {
            resume,
            percent: self.display_progress,
        });
        if resume {
            out.publish(SetPlaybackCommand {
                want_playing: false,
            });
        }
    }

    /// Moves the handle during a drag.
    pub fn drag_to(&mut self, percent: f64) {
        if let Some(drag) = self.drag.as_mut() {
            drag.percent = percent.clamp(0.0, 100.0);
            self.display_progress = drag.percent;
        }
    }

    /// Ends the drag: seeks to `percent` and resumes if playback was active before.
    ///
    /// Without a drag in progress this is a plain click-to-seek. No seek is
    /// issued until the engine has reported a length.
    pub fn end_drag(&mut self, percent: f64, out: &mut Outbox) {
        let percent = percent.clamp(0.0, 100.0);
        let drag = self.drag.take();
        let total = self.state.read().total_duration_ms();

        if total > 0 {
            self.display_progress = percent;
            out.publish(SeekTo {
                position_ms: seek_target(percent, total),
            });
        } else {
            tracing::debug!(percent, "seek skipped: duration unknown");
            self.display_progress = 0.0;
        }
        if drag.is_some_and(|d| d.resume) {
            out.publish(SetPlaybackCommand { want_playing: true });
        }
    }

    /// Requests a new restorable volume. The slider moves on the `VolumeChanged` fact.
    pub fn set_volume(&mut self, volume: Volume, out: &mut Outbox) {
        out.publish(ChangeVolume { volume });
    }

    /// Requests one volume step up from the last reported level.
    pub fn volume_up(&mut self, out: &mut Outbox) {
        self.set_volume(self.volume.increase(), out);
    }

    /// Requests one volume step down from the last reported level.
    pub fn volume_down(&mut self, out: &mut Outbox) {
        self.set_volume(self.volume.decrease(), out);
    }

    pub fn toggle_mute(&mut self, out: &mut Outbox) {
        out.publish(ToggleMute);
    }

    /// Selects an entry of the speed menu. Out-of-range indices are ignored.
    ///
    /// The label follows the `PlaybackRateChanged` fact, so a rate the
    /// engine refuses never shows. During construction the entry is applied
    /// directly and no command is issued.
    pub fn select_speed(&mut self, index: usize, out: &mut Outbox) {
        let Some(rate) = PlaybackRate::from_index(index) else {
            tracing::debug!(index, "ignoring unknown speed index");
            return;
        };
        if !self.initialized {
            self.speed = rate;
            return;
        }
        if rate != self.speed {
            out.publish(ChangePlaybackSpeed { rate });
        }
    }

    /// Requests the opposite of the shared fullscreen flag.
    pub fn toggle_fullscreen(&mut self, out: &mut Outbox) {
        let fullscreen = !self.state.read().is_fullscreen();
        out.publish(FullscreenChanged { fullscreen });
    }
}
