// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Volume**: Playback volume bounds and the unmute fallback
//! - **Playback rate**: The fixed rate table
//! - **Progress**: Engine time-update throttling
//! - **Overlay**: Fullscreen control auto-hide timeout and opacities
//! - **Surface style**: Windowed-mode border/inset/blur outputs
//! - **Engine**: Cache sizes handed to the media engine

// ==========================================================================
// Volume Defaults
// ==========================================================================

/// Default playback volume at startup (0 to 100).
pub const DEFAULT_VOLUME: u8 = 80;

/// Minimum volume level.
pub const MIN_VOLUME: u8 = 0;

/// Maximum volume level.
pub const MAX_VOLUME: u8 = 100;

/// Volume adjustment step per key press.
pub const VOLUME_STEP: u8 = 5;

/// Volume restored by unmute when no non-zero volume was ever recorded.
pub const DEFAULT_UNMUTE_VOLUME: u8 = 50;

// ==========================================================================
// Playback Rate Defaults
// ==========================================================================

/// Selectable playback rates, indexed by `PlaybackRate`.
pub const PLAYBACK_RATES: [f32; 4] = [0.5, 1.0, 1.5, 2.0];

/// Index of normal speed (1.0x) in [`PLAYBACK_RATES`].
pub const DEFAULT_RATE_INDEX: usize = 1;

// ==========================================================================
// Progress Defaults
// ==========================================================================

/// Minimum wall-clock spacing between applied engine time updates (ms).
pub const DEFAULT_TIME_UPDATE_INTERVAL_MS: u64 = 500;

/// Lower bound for the time update interval (ms).
pub const MIN_TIME_UPDATE_INTERVAL_MS: u64 = 50;

/// Upper bound for the time update interval (ms).
pub const MAX_TIME_UPDATE_INTERVAL_MS: u64 = 5_000;

// ==========================================================================
// Overlay/Timeout Defaults
// ==========================================================================

/// Default auto-hide timeout for fullscreen controls (in seconds).
pub const DEFAULT_OVERLAY_TIMEOUT_SECS: u32 = 3;

/// Minimum overlay timeout (in seconds).
pub const MIN_OVERLAY_TIMEOUT_SECS: u32 = 1;

/// Maximum overlay timeout (in seconds).
pub const MAX_OVERLAY_TIMEOUT_SECS: u32 = 30;

/// Control bar opacity while visible.
pub const CONTROLS_OPACITY_VISIBLE: f32 = 1.0;

/// Control bar opacity once auto-hidden. Kept above zero so the bar still
/// receives pointer events.
pub const CONTROLS_OPACITY_HIDDEN: f32 = 0.01;

// ==========================================================================
// Surface Style Defaults
// ==========================================================================

/// Corner radius of the video surface in windowed mode.
pub const WINDOWED_CORNER_RADIUS: f32 = 12.0;

/// Outer margin around the video surface in windowed mode.
pub const WINDOWED_MARGIN: f32 = 10.0;

/// Backdrop blur behind the control bar in windowed mode.
pub const WINDOWED_BLUR_RADIUS: f32 = 20.0;

// ==========================================================================
// Engine Defaults
// ==========================================================================

/// Network stream cache handed to the engine (ms).
pub const DEFAULT_NETWORK_CACHE_MS: u32 = 1_000;

/// Local file cache handed to the engine (ms).
pub const DEFAULT_FILE_CACHE_MS: u32 = 300;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Volume validation
    assert!(MAX_VOLUME > MIN_VOLUME);
    assert!(DEFAULT_VOLUME >= MIN_VOLUME);
    assert!(DEFAULT_VOLUME <= MAX_VOLUME);
    assert!(DEFAULT_UNMUTE_VOLUME > MIN_VOLUME);
    assert!(DEFAULT_UNMUTE_VOLUME <= MAX_VOLUME);
    assert!(VOLUME_STEP > 0);

    // Rate table validation
    assert!(DEFAULT_RATE_INDEX < PLAYBACK_RATES.len());

    // Progress validation
    assert!(MIN_TIME_UPDATE_INTERVAL_MS > 0);
    assert!(DEFAULT_TIME_UPDATE_INTERVAL_MS >= MIN_TIME_UPDATE_INTERVAL_MS);
    assert!(DEFAULT_TIME_UPDATE_INTERVAL_MS <= MAX_TIME_UPDATE_INTERVAL_MS);

    // Overlay timeout validation
    assert!(MIN_OVERLAY_TIMEOUT_SECS > 0);
    assert!(MAX_OVERLAY_TIMEOUT_SECS >= MIN_OVERLAY_TIMEOUT_SECS);
    assert!(DEFAULT_OVERLAY_TIMEOUT_SECS >= MIN_OVERLAY_TIMEOUT_SECS);
    assert!(DEFAULT_OVERLAY_TIMEOUT_SECS <= MAX_OVERLAY_TIMEOUT_SECS);
};
