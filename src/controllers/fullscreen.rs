// SPDX-License-Identifier: MPL-2.0
//! Fullscreen presentation and control auto-hide.
//!
//! Two orthogonal axes:
//!
//! - presentation: windowed or fullscreen, switched only by the
//!   `FullscreenChanged` fact;
//! - control visibility: visible or hidden, meaningful only while
//!   fullscreen and driven by a restartable dwell timer.
//!
//! Surface style is derived from the presentation alone, so leaving
//! fullscreen restores exactly the windowed values.

use crate::config::{
    CONTROLS_OPACITY_HIDDEN, CONTROLS_OPACITY_VISIBLE, DEFAULT_OVERLAY_TIMEOUT_SECS,
    MAX_OVERLAY_TIMEOUT_SECS, MIN_OVERLAY_TIMEOUT_SECS, WINDOWED_BLUR_RADIUS,
    WINDOWED_CORNER_RADIUS, WINDOWED_MARGIN,
};
use crate::timer::DwellTimer;
use std::time::{Duration, Instant};

/// Auto-hide dwell in seconds, clamped to 1–30.
///
/// # Example
///
/// ```
/// use media_shell::controllers::fullscreen::OverlayTimeout;
///
/// assert_eq!(OverlayTimeout::new(5).value(), 5);
/// assert_eq!(OverlayTimeout::new(100).value(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTimeout(u32);

impl OverlayTimeout {
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(MIN_OVERLAY_TIMEOUT_SECS, MAX_OVERLAY_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }
}

impl Default for OverlayTimeout {
    fn default() -> Self {
        Self(DEFAULT_OVERLAY_TIMEOUT_SECS)
    }
}

/// Border, inset and blur of the video surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    pub corner_radius: f32,
    pub margin: f32,
    pub blur_radius: f32,
}

impl SurfaceStyle {
    /// Full bleed: no radius, no margin, no blur.
    pub const FULL_BLEED: SurfaceStyle = SurfaceStyle {
        corner_radius: 0.0,
        margin: 0.0,
        blur_radius: 0.0,
    };

    pub const WINDOWED: SurfaceStyle = SurfaceStyle {
        corner_radius: WINDOWED_CORNER_RADIUS,
        margin: WINDOWED_MARGIN,
        blur_radius: WINDOWED_BLUR_RADIUS,
    };

    #[must_use]
    pub fn for_mode(fullscreen: bool) -> Self {
        if fullscreen {
            Self::FULL_BLEED
        } else {
            Self::WINDOWED
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presentation {
    #[default]
    Windowed,
    Fullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlVisibility {
    #[default]
    Visible,
    Hidden,
}

impl ControlVisibility {
    /// Control-bar opacity. Hidden stays barely visible so the bar keeps receiving pointer input.
    #[must_use]
    pub fn opacity(self) -> f32 {
        match self {
            ControlVisibility::Visible => CONTROLS_OPACITY_VISIBLE,
            ControlVisibility::Hidden => CONTROLS_OPACITY_HIDDEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// The authoritative presentation change.
    FullscreenChanged(bool),
    /// Pointer moved over the video surface.
    PointerMoved,
    PointerEnteredControls,
    PointerLeftControls,
    /// Periodic UI tick.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    PresentationChanged(Presentation),
    VisibilityChanged(ControlVisibility),
}

/// Fullscreen state machine.
#[derive(Debug, Clone)]
pub struct State {
    presentation: Presentation,
    visibility: ControlVisibility,
    hide_timer: DwellTimer,
}

impl Default for State {
    fn default() -> Self {
        Self::new(OverlayTimeout::default())
    }
}

impl State {
    #[must_use]
    pub fn new(timeout: OverlayTimeout) -> Self {
        Self {
            presentation: Presentation::Windowed,
            visibility: ControlVisibility::Visible,
            hide_timer: DwellTimer::new(timeout.as_duration()),
        }
    }

    pub fn handle(&mut self, message: Message, now: Instant) -> Effect {
        match message {
            Message::FullscreenChanged(fullscreen) => self.set_fullscreen(fullscreen, now),
            Message::PointerMoved | Message::PointerEnteredControls => {
                if !self.is_fullscreen() {
                    return Effect::None;
                }
                self.hide_timer.restart(now);
                self.show()
            }
            Message::PointerLeftControls => {
                if self.is_fullscreen() {
                    self.hide_timer.restart(now);
                }
                Effect::None
            }
            Message::Tick => {
                if !self.hide_timer.poll_expired(now) || !self.is_fullscreen() {
                    return Effect::None;
                }
                if self.visibility == ControlVisibility::Hidden {
                    return Effect::None;
                }
                self.visibility = ControlVisibility::Hidden;
                Effect::VisibilityChanged(ControlVisibility::Hidden)
            }
        }
    }

    fn set_fullscreen(&mut self, fullscreen: bool, now: Instant) -> Effect {
        self.visibility = ControlVisibility::Visible;
        let target = if fullscreen {
            self.hide_timer.restart(now);
            Presentation::Fullscreen
        } else {
            self.hide_timer.stop();
            Presentation::Windowed
        };

        if self.presentation == target {
            return Effect::None;
        }
        self.presentation = target;
        Effect::PresentationChanged(target)
    }

    fn show(&mut self) -> Effect {
        if self.visibility == ControlVisibility::Visible {
            return Effect::None;
        }
        self.visibility = ControlVisibility::Visible;
        Effect::VisibilityChanged(ControlVisibility::Visible)
    }

    #[must_use]
    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.presentation == Presentation::Fullscreen
    }

    #[must_use]
    pub fn visibility(&self) -> ControlVisibility {
        self.visibility
    }

    #[must_use]
    pub fn controls_opacity(&self) -> f32 {
        self.visibility.opacity()
    }

    #[must_use]
    pub fn style(&self) -> SurfaceStyle {
        SurfaceStyle::for_mode(self.is_fullscreen())
    }

    #[must_use]
    pub fn hide_timer_running(&self) -> bool {
        self.hide_timer.is_running()
    }

    /// Stops the hide timer without changing presentation.
    pub fn stop_timer(&mut self) {
        self.hide_timer.stop();
    }
}
