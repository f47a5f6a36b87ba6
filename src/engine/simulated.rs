// SPDX-License-Identifier: MPL-2.0
//! Timeline-only engine running on its own worker thread.
//!
//! Nothing is decoded. The worker keeps a clock per loaded media, advances
//! it while playing (scaled by the playback rate) and emits the same
//! notifications a real engine would, from a thread that is not the UI
//! context. The demo binary and the integration tests drive the shell with it.

use super::{EngineNotification, MediaEngine, NotificationSink};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::playback::Volume;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// Length reported for every loaded media unless overridden.
pub const DEFAULT_MEDIA_LENGTH: Duration = Duration::from_secs(120);

/// Worker loop period. Time notifications fire once per tick while playing.
pub const DEFAULT_TICK: Duration = Duration::from_millis(20);

/// Raw options the simulated engine accepts in `extra_options`.
pub const SUPPORTED_OPTIONS: &[&str] = &["--no-audio", "--no-osd", "--quiet"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Load { length_ms: u64 },
    TogglePlayPause,
    Stop,
    Seek(u64),
    SetVolume(Volume),
    SetMute(bool),
    SetRate(f32),
    Shutdown,
}

/// Clock and transport state owned by the worker thread.
#[derive(Debug, Clone, PartialEq)]
struct Timeline {
    loaded: bool,
    playing: bool,
    length_ms: u64,
    position_ms: f64,
    rate: f32,
    volume: Volume,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            loaded: false,
            playing: false,
            length_ms: 0,
            position_ms: 0.0,
            rate: 1.0,
            volume: Volume::default(),
        }
    }
}

impl Timeline {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn position(&self) -> u64 {
        self.position_ms as u64
    }

    fn apply(&mut self, command: Command) -> Vec<EngineNotification> {
        match command {
            Command::Load { length_ms } => {
                let was_playing = self.playing;
                self.loaded = true;
                self.playing = false;
                self.length_ms = length_ms;
                self.position_ms = 0.0;
                let mut out = Vec::with_capacity(3);
                if was_playing {
                    out.push(EngineNotification::Stopped);
                }
                out.push(EngineNotification::LengthChanged(length_ms));
                out.push(EngineNotification::TimeChanged(0));
                out
            }
            Command::TogglePlayPause => {
                if !self.loaded {
                    return Vec::new();
                }
                if self.playing {
                    self.playing = false;
                    vec![EngineNotification::Paused]
                } else {
                    #[allow(clippy::cast_precision_loss)]
                    let end = self.length_ms as f64;
                    if self.position_ms >= end {
                        self.position_ms = 0.0;
                    }
                    self.playing = true;
                    vec![EngineNotification::Playing]
                }
            }
            Command::Stop => {
                if !self.loaded {
                    return Vec::new();
                }
                self.playing = false;
                self.position_ms = 0.0;
                vec![EngineNotification::Stopped]
            }
            Command::Seek(target) => {
                if !self.loaded {
                    return Vec::new();
                }
                let clamped = target.min(self.length_ms);
                #[allow(clippy::cast_precision_loss)]
                let position = clamped as f64;
                self.position_ms = position;
                vec![EngineNotification::TimeChanged(clamped)]
            }
            Command::SetVolume(volume) => {
                self.volume = volume;
                vec![EngineNotification::VolumeChanged(f32::from(volume.value()))]
            }
            Command::SetMute(_) => {
                vec![EngineNotification::VolumeChanged(f32::from(self.volume.value()))]
            }
            Command::SetRate(rate) => {
                self.rate = rate;
                Vec::new()
            }
            Command::Shutdown => Vec::new(),
        }
    }

    fn advance(&mut self, elapsed: Duration) -> Vec<EngineNotification> {
        if !self.playing {
            return Vec::new();
        }
        self.position_ms += elapsed.as_secs_f64() * 1_000.0 * f64::from(self.rate);
        #[allow(clippy::cast_precision_loss)]
        let end = self.length_ms as f64;
        if self.position_ms >= end {
            self.position_ms = end;
            self.playing = false;
            vec![
                EngineNotification::TimeChanged(self.length_ms),
                EngineNotification::EndReached,
            ]
        } else {
            vec![EngineNotification::TimeChanged(self.position())]
        }
    }
}

#[derive(Debug)]
struct Worker {
    commands: UnboundedSender<Command>,
    thread: Option<JoinHandle<()>>,
}

/// Engine adapter backed by a simulated timeline.
#[derive(Debug)]
pub struct SimulatedEngine {
    media_length: Duration,
    tick: Duration,
    hardware_available: bool,
    worker: Option<Worker>,
    volume: Volume,
    muted: bool,
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            media_length: DEFAULT_MEDIA_LENGTH,
            tick: DEFAULT_TICK,
            hardware_available: true,
            worker: None,
            volume: Volume::default(),
            muted: false,
        }
    }

    /// Sets the length reported for loaded media.
    #[must_use]
    pub fn with_media_length(mut self, length: Duration) -> Self {
        self.media_length = length;
        self
    }

    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Makes initialization fail whenever hardware acceleration is requested.
    #[must_use]
    pub fn without_hardware(mut self) -> Self {
        self.hardware_available = false;
        self
    }

    fn send(&self, command: Command) -> Result<(), EngineError> {
        let worker = self.worker.as_ref().ok_or(EngineError::NotInitialized)?;
        worker
            .commands
            .send(command)
            .map_err(|_| EngineError::Disconnected)
    }

    fn validate(&self, config: &EngineConfig) -> Result<(), EngineError> {
        if config.hardware_acceleration && !self.hardware_available {
            return Err(EngineError::InitializationFailed(
                "hardware decoding unavailable".to_string(),
            ));
        }
        if let Some(option) = config
            .extra_options
            .iter()
            .find(|option| !SUPPORTED_OPTIONS.contains(&option.as_str()))
        {
            return Err(EngineError::InitializationFailed(format!(
                "unrecognized option {option}"
            )));
        }
        Ok(())
    }

    fn worker_loop(
        mut commands: UnboundedReceiver<Command>,
        sink: NotificationSink,
        tick: Duration,
    ) {
        let mut timeline = Timeline::default();
        let mut last = Instant::now();

        loop {
            loop {
                match commands.try_recv() {
                    Ok(Command::Shutdown) | Err(TryRecvError::Disconnected) => return,
                    Ok(command) => {
                        for notification in timeline.apply(command) {
                            sink.post(notification);
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }

            let now = Instant::now();
            for notification in timeline.advance(now.saturating_duration_since(last)) {
                sink.post(notification);
            }
            last = now;

            if sink.is_closed() {
                return;
            }
            thread::sleep(tick);
        }
    }
}

impl MediaEngine for SimulatedEngine {
    fn initialize(
        &mut self,
        config: &EngineConfig,
        sink: NotificationSink,
    ) -> Result<(), EngineError> {
        if self.worker.is_some() {
            return Ok(());
        }
        self.validate(config)?;

        let (commands, receiver) = mpsc::unbounded_channel();
        let tick = self.tick;
        let thread = thread::Builder::new()
            .name("simulated-engine".to_string())
            .spawn(move || Self::worker_loop(receiver, sink, tick))
            .map_err(|e| EngineError::InitializationFailed(e.to_string()))?;

        tracing::debug!(
            hardware_acceleration = config.hardware_acceleration,
            file_cache_ms = config.file_cache_ms,
            deinterlace = ?config.deinterlace,
            "simulated engine started"
        );
        self.worker = Some(Worker {
            commands,
            thread: Some(thread),
        });
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.worker.is_some()
    }

    fn load_media(&mut self, path: &Path) -> Result<(), EngineError> {
        if self.worker.is_none() {
            return Err(EngineError::NotInitialized);
        }
        if !path.exists() {
            return Err(EngineError::MediaNotFound(path.to_path_buf()));
        }
        let length_ms = u64::try_from(self.media_length.as_millis()).unwrap_or(u64::MAX);
        self.send(Command::Load { length_ms })
    }

    fn toggle_play_pause(&mut self) -> Result<(), EngineError> {
        self.send(Command::TogglePlayPause)
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.send(Command::Stop)
    }

    fn seek(&mut self, position_ms: u64) -> Result<(), EngineError> {
        self.send(Command::Seek(position_ms))
    }

    fn set_volume(&mut self, volume: Volume) -> Result<(), EngineError> {
        self.send(Command::SetVolume(volume))?;
        self.volume = volume;
        Ok(())
    }

    fn set_mute(&mut self, muted: bool) -> Result<(), EngineError> {
        self.send(Command::SetMute(muted))?;
        self.muted = muted;
        Ok(())
    }

    fn set_playback_rate(&mut self, multiplier: f32) -> Result<(), EngineError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(EngineError::Unsupported(format!("rate {multiplier}")));
        }
        self.send(Command::SetRate(multiplier))
    }

    fn volume(&self) -> Volume {
        self.volume
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn shutdown(&mut self) {
        let Some(mut worker) = self.worker.take() else {
            return;
        };
        let _ = worker.commands.send(Command::Shutdown);
        if let Some(thread) = worker.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("simulated engine worker panicked");
            }
        }
        tracing::debug!("simulated engine stopped");
    }
}

impl Drop for SimulatedEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
