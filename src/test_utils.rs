// SPDX-License-Identifier: MPL-2.0
//! Shared helpers for unit tests.
//!
//! Float assertions come from `approx`; use them instead of `assert_eq!` on
//! progress fractions, opacities, and rate multipliers.

pub use approx::{assert_abs_diff_eq, assert_relative_eq};

/// Tolerance for f32 comparisons (opacities, rate multipliers).
pub const F32_EPSILON: f32 = 1e-6;

/// Tolerance for f64 comparisons (progress fractions).
pub const F64_EPSILON: f64 = 1e-10;
