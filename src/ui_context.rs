// SPDX-License-Identifier: MPL-2.0
//! Marshalling from worker threads onto the UI context.
//!
//! Engine callbacks fire on the engine's own thread. They never touch shared
//! state directly; instead they post into a [`UiHandle`], and the UI context
//! drains the queue on its own turn. The receiving side ([`UiContext`]) is
//! `!Send`, so the only way to reach UI-confined state from another thread is
//! through this queue.
//!
//! Each handle is tagged with the session that created it. Once the context
//! moves to a new session (on teardown or reload), events still in flight
//! from the old session are discarded when drained.

use std::marker::PhantomData;
use std::rc::Rc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Session generation. Bumped by [`UiContext::invalidate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Session(u64);

#[derive(Debug)]
struct Posted<T> {
    session: Session,
    event: T,
}

/// Thread-safe posting side of the UI queue.
#[derive(Debug)]
pub struct UiHandle<T> {
    sender: UnboundedSender<Posted<T>>,
    session: Session,
}

impl<T> Clone for UiHandle<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            session: self.session,
        }
    }
}

impl<T: Send> UiHandle<T> {
    /// Posts an event for the UI context. Returns `false` if the context is gone.
    pub fn post(&self, event: T) -> bool {
        self.sender
            .send(Posted {
                session: self.session,
                event,
            })
            .is_ok()
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.session
    }

    /// Returns true once the receiving context has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// UI-confined receiving side of the queue.
#[derive(Debug)]
pub struct UiContext<T> {
    sender: UnboundedSender<Posted<T>>,
    receiver: UnboundedReceiver<Posted<T>>,
    session: Session,
    stale_dropped: u64,
    _not_send: PhantomData<Rc<()>>,
}

impl<T: Send> Default for UiContext<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> UiContext<T> {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            session: Session(0),
            stale_dropped: 0,
            _not_send: PhantomData,
        }
    }

    /// Returns a posting handle bound to the current session.
    #[must_use]
    pub fn handle(&self) -> UiHandle<T> {
        UiHandle {
            sender: self.sender.clone(),
            session: self.session,
        }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.session
    }

    /// Starts a new session. Events from older handles are dropped from now on.
    pub fn invalidate(&mut self) -> Session {
        self.session = Session(self.session.0 + 1);
        self.session
    }

    /// Number of stale events dropped so far.
    #[must_use]
    pub fn stale_dropped(&self) -> u64 {
        self.stale_dropped
    }

    /// Takes every event currently queued for this session, without waiting.
    pub fn drain(&mut self) -> Vec<T> {
        let mut events = Vec::new();
        while let Ok(posted) = self.receiver.try_recv() {
            if let Some(event) = self.accept(posted) {
                events.push(event);
            }
        }
        events
    }

    /// Waits for the next event of the current session.
    ///
    /// Never returns `None` while the context is alive, because the context
    /// itself holds a sender.
    pub async fn next_event(&mut self) -> Option<T> {
        loop {
            let posted = self.receiver.recv().await?;
            if let Some(event) = self.accept(posted) {
                return Some(event);
            }
        }
    }

    fn accept(&mut self, posted: Posted<T>) -> Option<T> {
        if posted.session == self.session {
            Some(posted.event)
        } else {
            self.stale_dropped += 1;
            tracing::debug!(
                posted = posted.session.0,
                current = self.session.0,
                "dropping event from stale session"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn events_posted_from_another_thread_are_drained_in_order() {
        let mut context = UiContext::<u32>::new();
        let handle = context.handle();

        thread::spawn(move || {
            for i in 0..5 {
                assert!(handle.post(i));
            }
        })
        .join()
        .expect("worker thread panicked");

        assert_eq!(context.drain(), vec![0, 1, 2, 3, 4]);
        assert!(context.drain().is_empty());
    }

    #[test]
    fn stale_session_events_are_dropped() {
        let mut context = UiContext::<&'static str>::new();
        let old = context.handle();
        old.post("before");

        context.invalidate();
        let fresh = context.handle();
        old.post("after teardown");
        fresh.post("current");

        assert_eq!(context.drain(), vec!["current"]);
        assert_eq!(context.stale_dropped(), 2);
    }

    #[test]
    fn post_fails_after_context_is_dropped() {
        let context = UiContext::<u8>::new();
        let handle = context.handle();
        drop(context);
        assert!(handle.is_closed());
        assert!(!handle.post(1));
    }

    #[tokio::test]
    async fn next_event_skips_stale_entries() {
        let mut context = UiContext::<u8>::new();
        let old = context.handle();
        context.invalidate();
        let fresh = context.handle();

        old.post(1);
        fresh.post(2);
        assert_eq!(context.next_event().await, Some(2));
    }
}
