// SPDX-License-Identifier: MPL-2.0
//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use media_shell::config::{Config, EngineConfig};
use media_shell::engine::{EngineNotification, MediaEngine, NotificationSink};
use media_shell::error::EngineError;
use media_shell::playback::Volume;
use media_shell::presentation::HeadlessHost;
use media_shell::Shell;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

pub const MEDIA_LENGTH_MS: u64 = 120_000;

/// What the engine was told, plus the sink it reports through.
#[derive(Debug, Default)]
pub struct EngineRecord {
    pub sink: Option<NotificationSink>,
    pub loaded: Option<PathBuf>,
    pub playing: bool,
    pub output_volume: Option<Volume>,
    pub muted: bool,
    pub rate: f32,
    pub seeks: Vec<u64>,
    pub toggles: usize,
    pub shut_down: bool,
    /// Paths `load_media` reports as not found.
    pub missing: Vec<PathBuf>,
    /// `set_playback_rate` fails while set.
    pub refuse_rate: bool,
}

/// Engine that answers every command synchronously through its sink, the
/// way a real engine's callback thread would, but deterministically.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    record: Rc<RefCell<EngineRecord>>,
}

impl ScriptedEngine {
    pub fn new() -> (Self, Rc<RefCell<EngineRecord>>) {
        let record = Rc::new(RefCell::new(EngineRecord {
            rate: 1.0,
            ..EngineRecord::default()
        }));
        (
            Self {
                record: Rc::clone(&record),
            },
            record,
        )
    }

    fn post(&self, notification: EngineNotification) {
        if let Some(sink) = &self.record.borrow().sink {
            sink.post(notification);
        }
    }

    fn require_init(&self) -> Result<(), EngineError> {
        if self.record.borrow().sink.is_some() && !self.record.borrow().shut_down {
            Ok(())
        } else {
            Err(EngineError::NotInitialized)
        }
    }
}

impl EngineRecord {
    /// Posts a notification as if the engine emitted it on its own.
    pub fn emit(&self, notification: EngineNotification) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| sink.post(notification))
    }
}

impl MediaEngine for ScriptedEngine {
    fn initialize(
        &mut self,
        _config: &EngineConfig,
        sink: NotificationSink,
    ) -> Result<(), EngineError> {
        self.record.borrow_mut().sink = Some(sink);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.require_init().is_ok()
    }

    fn load_media(&mut self, path: &Path) -> Result<(), EngineError> {
        self.require_init()?;
        if self.record.borrow().missing.iter().any(|m| m == path) {
            return Err(EngineError::MediaNotFound(path.to_path_buf()));
        }
        {
            let mut record = self.record.borrow_mut();
            record.loaded = Some(path.to_path_buf());
            record.playing = false;
        }
        self.post(EngineNotification::LengthChanged(MEDIA_LENGTH_MS));
        self.post(EngineNotification::TimeChanged(0));
        Ok(())
    }

    fn toggle_play_pause(&mut self) -> Result<(), EngineError> {
        self.require_init()?;
        let playing = {
            let mut record = self.record.borrow_mut();
            record.toggles += 1;
            record.playing = !record.playing;
            record.playing
        };
        self.post(if playing {
            EngineNotification::Playing
        } else {
            EngineNotification::Paused
        });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.require_init()?;
        self.record.borrow_mut().playing = false;
        self.post(EngineNotification::Stopped);
        Ok(())
    }

    fn seek(&mut self, position_ms: u64) -> Result<(), EngineError> {
        self.require_init()?;
        self.record.borrow_mut().seeks.push(position_ms);
        self.post(EngineNotification::TimeChanged(position_ms.min(MEDIA_LENGTH_MS)));
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> Result<(), EngineError> {
        self.require_init()?;
        self.record.borrow_mut().output_volume = Some(volume);
        self.post(EngineNotification::VolumeChanged(f32::from(volume.value())));
        Ok(())
    }

    fn set_mute(&mut self, muted: bool) -> Result<(), EngineError> {
        self.require_init()?;
        let level = {
            let mut record = self.record.borrow_mut();
            record.muted = muted;
            record.output_volume.map_or(0.0, |v| f32::from(v.value()))
        };
        self.post(EngineNotification::VolumeChanged(level));
        Ok(())
    }

    fn set_playback_rate(&mut self, multiplier: f32) -> Result<(), EngineError> {
        self.require_init()?;
        if self.record.borrow().refuse_rate {
            return Err(EngineError::Unsupported(format!("rate {multiplier}")));
        }
        self.record.borrow_mut().rate = multiplier;
        Ok(())
    }

    fn volume(&self) -> Volume {
        self.record.borrow().output_volume.unwrap_or_default()
    }

    fn is_muted(&self) -> bool {
        self.record.borrow().muted
    }

    fn shutdown(&mut self) {
        self.record.borrow_mut().shut_down = true;
    }
}

/// A started shell with one two-entry playlist, first entry selected and
/// every resulting notification applied at `now`.
pub struct Fixture {
    pub shell: Shell,
    pub record: Rc<RefCell<EngineRecord>>,
    pub host: HeadlessHost,
    pub now: Instant,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let (engine, record) = ScriptedEngine::new();
        let host = HeadlessHost::new();
        let mut shell = Shell::new(config, Box::new(engine), Box::new(host.clone()));
        shell.start();
        shell.open(vec![
            PathBuf::from("/media/first.mkv"),
            PathBuf::from("/media/second.mkv"),
        ]);
        let mut fixture = Self {
            shell,
            record,
            host,
            now: Instant::now(),
        };
        fixture.pump();
        fixture
    }

    /// Applies engine notifications at `now` until none are left, including
    /// the ones posted while applying earlier ones.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.shell.pump(self.now) {
                0 => return applied,
                n => applied += n,
            }
        }
    }
}
