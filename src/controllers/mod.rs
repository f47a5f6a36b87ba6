// SPDX-License-Identifier: MPL-2.0
//! Presentation controllers.
//!
//! Each controller receives the shared playback state at construction and
//! talks to the others only through the message bus. Input methods take an
//! [`Outbox`](crate::bus::Outbox) instead of publishing directly, so a
//! controller is never re-entered while it is handling something.

pub mod application;
pub mod fullscreen;
pub mod transport;
pub mod video_surface;

pub use application::{Application, TransportHost};
pub use fullscreen::{ControlVisibility, OverlayTimeout, SurfaceStyle};
pub use transport::{Transport, VolumeIcon};
pub use video_surface::{InitOutcome, SurfaceOptions, VideoSurface};
