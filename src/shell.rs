// SPDX-License-Identifier: MPL-2.0
//! Wiring for the playback core.
//!
//! The shell owns the bus, the shared state, the three controllers and the
//! UI queue that engine notifications are marshalled through. Everything it
//! owns is `!Send`; it runs on a single UI context. The engine's worker
//! thread only ever sees the [`NotificationSink`].

use crate::bus::{MediaItem, MessageBus, Outbox, SubscriberId};
use crate::config::{Config, DEFAULT_RATE_INDEX, DEFAULT_VOLUME};
use crate::controllers::fullscreen::Effect;
use crate::controllers::{Application, InitOutcome, SurfaceOptions, Transport, VideoSurface};
use crate::engine::{EngineNotification, MediaEngine, NotificationSink};
use crate::notifications::Manager;
use crate::playback::{PlaybackRate, PlaybackState, SharedPlaybackState, Volume};
use crate::presentation::PresentationHost;
use crate::ui_context::UiContext;
use std::cell::{Ref, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Period of the UI tick driving the auto-hide timer and toast expiry.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

pub struct Shell {
    bus: Rc<MessageBus>,
    state: SharedPlaybackState,
    surface: Rc<RefCell<VideoSurface>>,
    transport: Rc<RefCell<Transport>>,
    application: Rc<RefCell<Application>>,
    subscribers: Vec<SubscriberId>,
    ui: UiContext<EngineNotification>,
    notifications: Manager,
    shut_down: bool,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("bus", &self.bus)
            .field("state", &self.state)
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}

impl Shell {
    /// Builds the core and subscribes every controller. The engine is not started yet.
    pub fn new(
        config: &Config,
        engine: Box<dyn MediaEngine>,
        host: Box<dyn PresentationHost>,
    ) -> Self {
        let volume = Volume::new(config.playback.volume.unwrap_or(DEFAULT_VOLUME));
        let rate = PlaybackRate::from_index_or_default(
            config.playback.rate_index.unwrap_or(DEFAULT_RATE_INDEX),
        );
        let state = SharedPlaybackState::new(PlaybackState::with_startup(volume, rate));
        let bus = Rc::new(MessageBus::new());

        let surface = Rc::new(RefCell::new(VideoSurface::new(
            engine,
            state.clone(),
            SurfaceOptions::from_config(config),
        )));
        let application = Rc::new(RefCell::new(Application::new(
            state.clone(),
            host,
            config.playback.auto_advance.unwrap_or(true),
        )));
        let transport = Rc::new(RefCell::new(Transport::new(state.clone())));

        let surface_id = bus.register();
        let application_id = bus.register();
        let transport_id = bus.register();
        VideoSurface::subscribe(&surface, &bus, surface_id);
        Application::subscribe(&application, &bus, application_id);
        Transport::subscribe(&transport, &bus, transport_id);

        Self {
            bus,
            state,
            surface,
            transport,
            application,
            subscribers: vec![surface_id, application_id, transport_id],
            ui: UiContext::new(),
            notifications: Manager::new(),
            shut_down: false,
        }
    }

    /// Starts the engine. Safe to call more than once.
    pub fn start(&mut self) -> InitOutcome {
        let sink = self.ui.handle();
        self.surface
            .borrow_mut()
            .initialize(sink, &mut self.notifications)
    }

    /// Replaces the playlist with `paths` and selects the first entry.
    pub fn open(&self, paths: Vec<PathBuf>) -> bool {
        let items = paths.into_iter().map(MediaItem::from_path).collect();
        self.with_application(|app, out| app.set_playlist(items, out));
        self.with_application(|app, out| app.select(0, out))
    }

    // ---------------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------------

    /// Runs transport input now and publishes what it produced.
    pub fn with_transport<R>(&self, f: impl FnOnce(&mut Transport, &mut Outbox) -> R) -> R {
        self.with_transport_at(Instant::now(), f)
    }

    /// Runs transport input that happened at `now`. Every message it causes
    /// is handled with that instant.
    pub fn with_transport_at<R>(
        &self,
        now: Instant,
        f: impl FnOnce(&mut Transport, &mut Outbox) -> R,
    ) -> R {
        let mut out = Outbox::at(now);
        let result = f(&mut self.transport.borrow_mut(), &mut out);
        self.bus.publish_all(&mut out);
        result
    }

    /// Runs application input now and publishes what it produced.
    pub fn with_application<R>(&self, f: impl FnOnce(&mut Application, &mut Outbox) -> R) -> R {
        self.with_application_at(Instant::now(), f)
    }

    /// Runs application input that happened at `now`.
    pub fn with_application_at<R>(
        &self,
        now: Instant,
        f: impl FnOnce(&mut Application, &mut Outbox) -> R,
    ) -> R {
        let mut out = Outbox::at(now);
        let result = f(&mut self.application.borrow_mut(), &mut out);
        self.bus.publish_all(&mut out);
        result
    }

    pub fn pointer_moved(&self, now: Instant) -> Effect {
        self.surface.borrow_mut().pointer_moved(now)
    }

    pub fn pointer_entered_controls(&self, now: Instant) -> Effect {
        self.surface.borrow_mut().pointer_entered_controls(now)
    }

    pub fn pointer_left_controls(&self, now: Instant) -> Effect {
        self.surface.borrow_mut().pointer_left_controls(now)
    }

    // ---------------------------------------------------------------------
    // UI context turn
    // ---------------------------------------------------------------------

    /// Applies every queued engine notification. Returns how many were applied.
    pub fn pump(&mut self, now: Instant) -> usize {
        let notifications = self.ui.drain();
        for notification in &notifications {
            self.apply_notification(*notification, now);
        }
        notifications.len()
    }

    fn apply_notification(&self, notification: EngineNotification, now: Instant) {
        let mut out = Outbox::at(now);
        self.surface
            .borrow_mut()
            .handle_engine(notification, now, &mut out);
        self.bus.publish_all(&mut out);
    }

    /// Drives timers: control auto-hide and notification expiry.
    pub fn tick(&mut self, now: Instant) {
        if let Effect::VisibilityChanged(visibility) = self.surface.borrow_mut().tick(now) {
            tracing::debug!(?visibility, "fullscreen controls");
        }
        self.notifications.tick(now);
    }

    /// Runs the UI loop for `duration`: engine notifications as they arrive,
    /// timers every [`TICK_INTERVAL`].
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = tokio::time::sleep(duration);
        tokio::pin!(deadline);
        let mut ticker = tokio::time::interval(TICK_INTERVAL);

        loop {
            let notification = tokio::select! {
                () = &mut deadline => break,
                Some(notification) = self.ui.next_event() => Some(notification),
                _ = ticker.tick() => None,
            };
            let now = Instant::now();
            match notification {
                Some(notification) => self.apply_notification(notification, now),
                None => self.tick(now),
            }
        }
    }

    /// Unsubscribes every controller, disposes the video surface, and
    /// invalidates the notification session. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        for id in &self.subscribers {
            self.bus.unsubscribe_all(*id);
        }
        self.surface.borrow_mut().dispose();
        self.ui.invalidate();
        let discarded = self.ui.drain().len();
        self.shut_down = true;
        tracing::info!(discarded, "shell shut down");
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> &SharedPlaybackState {
        &self.state
    }

    #[must_use]
    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    #[must_use]
    pub fn video_surface(&self) -> Ref<'_, VideoSurface> {
        self.surface.borrow()
    }

    #[must_use]
    pub fn transport(&self) -> Ref<'_, Transport> {
        self.transport.borrow()
    }

    #[must_use]
    pub fn application(&self) -> Ref<'_, Application> {
        self.application.borrow()
    }

    #[must_use]
    pub fn notifications(&self) -> &Manager {
        &self.notifications
    }

    /// A sink bound to the current notification session.
    #[must_use]
    pub fn notification_sink(&self) -> NotificationSink {
        self.ui.handle()
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.shutdown();
    }
}
