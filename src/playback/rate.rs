// SPDX-License-Identifier: MPL-2.0
//! Playback rate domain type.
//!
//! Rates are selected from a fixed table; the type stores the table index so
//! that the index ↔ multiplier mapping cannot drift between controllers.

use crate::config::{DEFAULT_RATE_INDEX, PLAYBACK_RATES};
use serde::{Deserialize, Serialize};

/// Index into the playback rate table `{0: 0.5, 1: 1.0, 2: 1.5, 3: 2.0}`.
///
/// # Example
///
/// ```
/// use media_shell::playback::PlaybackRate;
///
/// let rate = PlaybackRate::from_index(2).unwrap();
/// assert_eq!(rate.multiplier(), 1.5);
/// assert!(PlaybackRate::from_index(9).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaybackRate(usize);

impl PlaybackRate {
    /// Returns the rate at `index`, or `None` if the index is out of the table.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        (index < PLAYBACK_RATES.len()).then_some(Self(index))
    }

    /// Returns the rate at `index`, falling back to normal speed.
    #[must_use]
    pub fn from_index_or_default(index: usize) -> Self {
        Self::from_index(index).unwrap_or_default()
    }

    /// Returns the table index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    /// Returns the speed multiplier handed to the engine.
    #[must_use]
    pub fn multiplier(self) -> f32 {
        PLAYBACK_RATES[self.0]
    }

    /// Returns the next faster rate, or self if at maximum.
    #[must_use]
    pub fn increase(self) -> Self {
        Self::from_index(self.0 + 1).unwrap_or(self)
    }

    /// Returns the next slower rate, or self if at minimum.
    #[must_use]
    pub fn decrease(self) -> Self {
        self.0.checked_sub(1).map_or(self, Self)
    }

    /// Iterates over every selectable rate.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..PLAYBACK_RATES.len()).map(Self)
    }

    /// Label shown by the speed selector, e.g. `1.50x`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{:.2}x", self.multiplier())
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self(DEFAULT_RATE_INDEX)
    }
}
