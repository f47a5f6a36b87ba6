// SPDX-License-Identifier: MPL-2.0
//! Presentation host port.
//!
//! The window/layout layer owns two surfaces that can host the transport
//! bar: the windowed layout and the fullscreen surface. The application
//! controller tells the host where the bar lives; the host does the
//! relocation. Every operation is explicit so no controller needs to reach
//! into another's internals to show or hide anything.

use crate::error::HostError;
use std::cell::RefCell;
use std::rc::Rc;

/// Window/layout layer, as seen by the application controller.
pub trait PresentationHost {
    /// Attaches a transport bar bound to the shared state onto the fullscreen surface.
    ///
    /// Returns once the bar is attached, so the caller can hide the windowed one.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] if the fullscreen surface cannot take the bar.
    /// The windowed bar must stay visible in that case.
    fn attach_fullscreen_transport(&mut self) -> Result<(), HostError>;

    /// Removes the transport bar from the fullscreen surface. Idempotent.
    fn clear_fullscreen_transport(&mut self);

    /// Shows or hides the transport bar in the windowed layout.
    fn set_windowed_transport_visible(&mut self, visible: bool);
}

/// Step recorded by [`HeadlessHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    FullscreenAttached,
    FullscreenAttachFailed,
    FullscreenCleared,
    WindowedShown,
    WindowedHidden,
}

#[derive(Debug)]
struct HeadlessLayout {
    windowed_visible: bool,
    fullscreen_attached: bool,
    fail_attach: bool,
    /// Set if the bar was ever hosted nowhere.
    gap_observed: bool,
    events: Vec<HostEvent>,
}

impl HeadlessLayout {
    fn record(&mut self, event: HostEvent) {
        self.events.push(event);
        if !self.windowed_visible && !self.fullscreen_attached {
            self.gap_observed = true;
        }
    }
}

/// Host without a window, for the demo binary and tests.
///
/// Clones share the same layout, so a test can keep one clone to inspect
/// what the application controller did with the other.
#[derive(Debug, Clone)]
pub struct HeadlessHost(Rc<RefCell<HeadlessLayout>>);

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(HeadlessLayout {
            windowed_visible: true,
            fullscreen_attached: false,
            fail_attach: false,
            gap_observed: false,
            events: Vec::new(),
        })))
    }

    /// Makes subsequent fullscreen attaches fail.
    pub fn set_fail_attach(&self, fail: bool) {
        self.0.borrow_mut().fail_attach = fail;
    }

    #[must_use]
    pub fn windowed_visible(&self) -> bool {
        self.0.borrow().windowed_visible
    }

    #[must_use]
    pub fn fullscreen_attached(&self) -> bool {
        self.0.borrow().fullscreen_attached
    }

    /// True if at any point neither surface showed the transport bar.
    #[must_use]
    pub fn gap_observed(&self) -> bool {
        self.0.borrow().gap_observed
    }

    #[must_use]
    pub fn events(&self) -> Vec<HostEvent> {
        self.0.borrow().events.clone()
    }
}

impl PresentationHost for HeadlessHost {
    fn attach_fullscreen_transport(&mut self) -> Result<(), HostError> {
        let mut layout = self.0.borrow_mut();
        if layout.fail_attach {
            layout.record(HostEvent::FullscreenAttachFailed);
            return Err(HostError::SurfaceUnavailable);
        }
        layout.fullscreen_attached = true;
        layout.record(HostEvent::FullscreenAttached);
        Ok(())
    }

    fn clear_fullscreen_transport(&mut self) {
        let mut layout = self.0.borrow_mut();
        if !layout.fullscreen_attached {
            return;
        }
        layout.fullscreen_attached = false;
        layout.record(HostEvent::FullscreenCleared);
    }

    fn set_windowed_transport_visible(&mut self, visible: bool) {
        let mut layout = self.0.borrow_mut();
        if layout.windowed_visible == visible {
            return;
        }
        layout.windowed_visible = visible;
        layout.record(if visible {
            HostEvent::WindowedShown
        } else {
            HostEvent::WindowedHidden
        });
    }
}
