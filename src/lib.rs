// SPDX-License-Identifier: MPL-2.0
//! `media_shell` is the playback core of a desktop media player shell.
//!
//! It keeps a video surface, a transport bar and the application in sync
//! through a typed message bus and a single shared playback state, and
//! orchestrates the windowed/fullscreen transition with auto-hiding
//! controls. The media engine and the windowing host sit behind traits;
//! engine notifications are marshalled onto the UI context before they
//! touch any state.

#![doc(html_root_url = "https://docs.rs/media_shell/0.3.0")]

pub mod bus;
pub mod config;
pub mod controllers;
pub mod engine;
pub mod error;
pub mod logging;
pub mod notifications;
pub mod playback;
pub mod presentation;
pub mod shell;
pub mod timer;
pub mod ui_context;

#[cfg(test)]
mod test_utils;

pub use shell::Shell;
