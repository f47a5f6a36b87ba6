// SPDX-License-Identifier: MPL-2.0
//! Playback domain: the shared state record and its value types.

mod rate;
mod state;
mod throttle;
pub mod time_format;
mod volume;

pub use rate::PlaybackRate;
pub use state::{PlaybackState, SharedPlaybackState};
pub use throttle::UpdateThrottle;
pub use volume::Volume;
