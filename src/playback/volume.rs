// SPDX-License-Identifier: MPL-2.0
//! Volume domain type for audio playback.
//!
//! This module provides a type-safe wrapper for volume values,
//! ensuring they are always within the valid range (0–100).

use crate::config::{DEFAULT_VOLUME, MAX_VOLUME, MIN_VOLUME, VOLUME_STEP};
use serde::{Deserialize, Serialize};

/// Volume level, guaranteed to be within valid range (0–100).
///
/// # Example
///
/// ```
/// use media_shell::playback::Volume;
///
/// let vol = Volume::new(55);
/// assert_eq!(vol.value(), 55);
///
/// // Values outside range are clamped
/// let too_loud = Volume::new(250);
/// assert_eq!(too_loud.value(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Volume(u8);

impl Volume {
    /// Silence.
    pub const ZERO: Volume = Volume(MIN_VOLUME);

    /// Creates a new volume level, clamping to valid range.
    #[must_use]
    pub fn new(volume: u8) -> Self {
        Self(volume.clamp(MIN_VOLUME, MAX_VOLUME))
    }

    /// Returns the volume value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Returns true if the level is silent.
    #[must_use]
    pub fn is_silent(self) -> bool {
        self.0 == MIN_VOLUME
    }

    /// Increases volume by one step, clamping to maximum.
    #[must_use]
    pub fn increase(self) -> Self {
        Self::new(self.0.saturating_add(VOLUME_STEP))
    }

    /// Decreases volume by one step, clamping to minimum.
    #[must_use]
    pub fn decrease(self) -> Self {
        Self::new(self.0.saturating_sub(VOLUME_STEP))
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}

impl From<u8> for Volume {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Volume> for u8 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_to_valid_range() {
        assert_eq!(Volume::new(101).value(), MAX_VOLUME);
        assert_eq!(Volume::new(255).value(), MAX_VOLUME);
        assert_eq!(Volume::new(42).value(), 42);
    }

    #[test]
    fn default_is_expected_volume() {
        assert_eq!(Volume::default().value(), DEFAULT_VOLUME);
    }

    #[test]
    fn increase_and_decrease_saturate() {
        assert_eq!(Volume::new(50).increase().value(), 50 + VOLUME_STEP);
        assert_eq!(Volume::new(MAX_VOLUME).increase().value(), MAX_VOLUME);
        assert_eq!(Volume::new(2).decrease().value(), 0);
    }

    #[test]
    fn is_silent_only_at_zero() {
        assert!(Volume::ZERO.is_silent());
        assert!(!Volume::new(1).is_silent());
    }
}
