// SPDX-License-Identifier: MPL-2.0
//! Application controller: playlist, media selection and transport hosting.

use crate::bus::{
    FullscreenChanged, MediaEnded, MediaItem, MediaLoaded, MediaSelected, MessageBus, Outbox,
    PlaylistUpdated, SetPlaybackCommand, SubscriberId,
};
use crate::playback::SharedPlaybackState;
use crate::presentation::PresentationHost;
use std::cell::RefCell;
use std::rc::Rc;

/// Surface currently hosting the transport bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportHost {
    #[default]
    Windowed,
    Fullscreen,
}

pub struct Application {
    state: SharedPlaybackState,
    host: Box<dyn PresentationHost>,
    playlist: Vec<MediaItem>,
    current: Option<usize>,
    auto_advance: bool,
    transport_host: TransportHost,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("playlist", &self.playlist.len())
            .field("current", &self.current)
            .field("auto_advance", &self.auto_advance)
            .field("transport_host", &self.transport_host)
            .finish_non_exhaustive()
    }
}

impl Application {
    #[must_use]
    pub fn new(
        state: SharedPlaybackState,
        host: Box<dyn PresentationHost>,
        auto_advance: bool,
    ) -> Self {
        Self {
            state,
            host,
            playlist: Vec::new(),
            current: None,
            auto_advance,
            transport_host: TransportHost::Windowed,
        }
    }

    /// Registers the bus handlers. Returns false if any were already registered.
    pub fn subscribe(app: &Rc<RefCell<Self>>, bus: &MessageBus, id: SubscriberId) -> bool {
        [
            bus.subscribe_weak::<PlaylistUpdated, _, _>(id, app, |a, m, _| {
                a.on_playlist_updated(m);
            }),
            bus.subscribe_weak::<MediaLoaded, _, _>(id, app, |a, m, out| {
                a.on_media_loaded(m, out);
            }),
            bus.subscribe_weak::<MediaEnded, _, _>(id, app, |a, _, out| a.on_media_ended(out)),
            bus.subscribe_weak::<FullscreenChanged, _, _>(id, app, |a, m, _| {
                a.on_fullscreen_changed(m);
            }),
        ]
        .into_iter()
        .all(|added| added)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn playlist(&self) -> &[MediaItem] {
        &self.playlist
    }

    /// Index of the loaded entry, if it is still in the playlist.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&MediaItem> {
        self.current.and_then(|i| self.playlist.get(i))
    }

    /// Surface currently hosting the transport bar.
    #[must_use]
    pub fn transport_host(&self) -> TransportHost {
        self.transport_host
    }

    #[must_use]
    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.auto_advance = enabled;
    }

    // ---------------------------------------------------------------------
    // User input
    // ---------------------------------------------------------------------

    /// Replaces the playlist.
    pub fn set_playlist(&mut self, items: Vec<MediaItem>, out: &mut Outbox) {
        out.publish(PlaylistUpdated { items });
    }

    /// Requests the entry at `index`. Returns false if out of range.
    ///
    /// The selection only becomes current once the video surface confirms
    /// the load with `MediaLoaded`.
    pub fn select(&mut self, index: usize, out: &mut Outbox) -> bool {
        let Some(item) = self.playlist.get(index) else {
            return false;
        };
        out.publish(MediaSelected { item: item.clone() });
        true
    }

    /// Selects the following entry. Returns false at the end of the playlist.
    pub fn next(&mut self, out: &mut Outbox) -> bool {
        let index = self.current.map_or(0, |i| i + 1);
        self.select(index, out)
    }

    /// Selects the preceding entry. Returns false at the start of the playlist.
    pub fn previous(&mut self, out: &mut Outbox) -> bool {
        match self.current {
            Some(i) if i > 0 => self.select(i - 1, out),
            _ => false,
        }
    }

    /// Publishes `FullscreenChanged` with the opposite of the shared flag.
    pub fn toggle_fullscreen(&mut self, out: &mut Outbox) {
        let fullscreen = !self.state.read().is_fullscreen();
        out.publish(FullscreenChanged { fullscreen });
    }

    /// Leaves fullscreen (Escape). Does nothing when windowed.
    pub fn exit_fullscreen(&mut self, out: &mut Outbox) {
        if self.state.read().is_fullscreen() {
            out.publish(FullscreenChanged { fullscreen: false });
        }
    }

    // ---------------------------------------------------------------------
    // Bus handlers
    // ---------------------------------------------------------------------

    /// Keeps the current selection when the same path is still in the list.
    pub fn on_playlist_updated(&mut self, message: &PlaylistUpdated) {
        let current_path = self.current_item().map(|item| item.path.clone());
        self.playlist.clone_from(&message.items);
        self.current = current_path.and_then(|path| self.index_of(&path));
        tracing::debug!(
            items = self.playlist.len(),
            current = ?self.current,
            "playlist updated"
        );
    }

    /// Makes the loaded item current, titles the window and starts playback.
    pub fn on_media_loaded(&mut self, message: &MediaLoaded, out: &mut Outbox) {
        let item = &message.item;
        self.current = self.index_of(&item.path);
        self.state
            .update(|s| s.set_media(item.path.clone(), &item.title));
        tracing::info!(path = %item.path.display(), "media loaded");
        out.publish(SetPlaybackCommand { want_playing: true });
    }

    pub fn on_media_ended(&mut self, out: &mut Outbox) {
        if !self.auto_advance {
            return;
        }
        if !self.next(out) {
            tracing::debug!("end of playlist");
        }
    }

    /// Moves the transport bar between surfaces.
    ///
    /// Entering: attach to the fullscreen surface, then hide the windowed
    /// bar only once the attach succeeded. Leaving: clear the fullscreen
    /// surface, then show the windowed bar.
    pub fn on_fullscreen_changed(&mut self, message: &FullscreenChanged) {
        if message.fullscreen {
            if self.transport_host == TransportHost::Fullscreen {
                return;
            }
            match self.host.attach_fullscreen_transport() {
                Ok(()) => {
                    self.host.set_windowed_transport_visible(false);
                    self.transport_host = TransportHost::Fullscreen;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "keeping windowed transport bar");
                }
            }
        } else {
            self.host.clear_fullscreen_transport();
            self.host.set_windowed_transport_visible(true);
            self.transport_host = TransportHost::Windowed;
        }
    }

    fn index_of(&self, path: &std::path::Path) -> Option<usize> {
        self.playlist.iter().position(|item| item.path == path)
    }
}
