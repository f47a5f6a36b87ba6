// SPDX-License-Identifier: MPL-2.0
//! Typed publish/subscribe channel between controllers.
//!
//! The bus lives on the UI context and is not `Send`. Delivery is
//! run-to-completion: a message is handed to every subscriber before any
//! message published in reaction to it. Handlers publish through an
//! [`Outbox`]; its contents are appended to the bus queue once the handler
//! returns, so no handler is ever re-entered while it is running.
//!
//! Subscription changes made during a delivery take effect on the next
//! message. A failing handler is logged and does not stop delivery to the
//! remaining subscribers.

pub mod messages;

pub use messages::{
    BusMessage, ChangePlaybackSpeed, ChangeVolume, Envelope, FullscreenChanged, MediaEnded,
    MediaItem, MediaLoaded, MediaSelected, Message, MessageKind, Outbox, PlaybackRateChanged,
    PlaybackStateChanged, PlaylistUpdated, ProgressUpdated, SeekTo, SetPlaybackCommand,
    StopPlayback, ToggleMute, VolumeChanged,
};

use crate::error::HandlerError;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Upper bound on deliveries triggered by one outermost publish.
///
/// Reaching it means two handlers keep answering each other; the remaining
/// queue is dropped and an error is logged.
pub const MAX_DELIVERIES_PER_PUBLISH: usize = 4_096;

/// Identity of a subscriber, used for de-duplication and unsubscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// The numeric identity, for logs and error payloads.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

type Handler = Box<dyn FnMut(&Envelope, &mut Outbox) -> Result<(), HandlerError>>;

struct Subscription {
    subscriber: SubscriberId,
    handler: RefCell<Handler>,
}

/// Outcome of a publish, counted over the whole cascade it triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Handler invocations that returned `Ok`.
    pub delivered: usize,
    /// Handler invocations that returned an error.
    pub failed: usize,
    /// True when this publish was queued behind an in-progress delivery.
    pub deferred: bool,
}

/// UI-confined message bus.
#[derive(Default)]
pub struct MessageBus {
    routes: RefCell<HashMap<MessageKind, Vec<Rc<Subscription>>>>,
    queue: RefCell<VecDeque<Envelope>>,
    dispatching: Cell<bool>,
    next_subscriber: Cell<u64>,
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus")
            .field("routes", &self.routes.borrow().len())
            .field("queued", &self.queue.borrow().len())
            .field("dispatching", &self.dispatching.get())
            .finish()
    }
}

/// Clears the dispatching flag even if a handler panics.
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl MessageBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh subscriber identity.
    pub fn register(&self) -> SubscriberId {
        let id = self.next_subscriber.get();
        self.next_subscriber.set(id + 1);
        SubscriberId(id)
    }

    /// Subscribes `handler` to messages of type `T`.
    ///
    /// Returns `false` (and keeps the existing handler) if `subscriber` is
    /// already subscribed to `T`.
    pub fn subscribe<T, F>(&self, subscriber: SubscriberId, mut handler: F) -> bool
    where
        T: Message,
        F: FnMut(&T, &mut Outbox) -> Result<(), HandlerError> + 'static,
    {
        let mut routes = self.routes.borrow_mut();
        let route = routes.entry(T::KIND).or_default();
        if route.iter().any(|s| s.subscriber == subscriber) {
            tracing::debug!(?subscriber, kind = ?T::KIND, "duplicate subscription ignored");
            return false;
        }

        let erased: Handler = Box::new(move |envelope, outbox| match envelope.get::<T>() {
            Some(message) => handler(message, outbox),
            None => Ok(()),
        });
        route.push(Rc::new(Subscription {
            subscriber,
            handler: RefCell::new(erased),
        }));
        true
    }

    /// Subscribes a method of a shared component without keeping it alive.
    ///
    /// The bus holds only a weak reference. If the component is dropped
    /// without unsubscribing, delivery fails with
    /// [`HandlerError::SubscriberGone`] and the stale subscription is pruned.
    pub fn subscribe_weak<T, S, F>(
        &self,
        subscriber: SubscriberId,
        target: &Rc<RefCell<S>>,
        mut handler: F,
    ) -> bool
    where
        T: Message,
        S: 'static,
        F: FnMut(&mut S, &T, &mut Outbox) + 'static,
    {
        let weak = Rc::downgrade(target);
        let raw = subscriber.raw();
        self.subscribe::<T, _>(subscriber, move |message, outbox| {
            let target = weak.upgrade().ok_or(HandlerError::SubscriberGone(raw))?;
            let mut target = target
                .try_borrow_mut()
                .map_err(|_| HandlerError::Busy(raw))?;
            handler(&mut target, message, outbox);
            Ok(())
        })
    }

    /// Removes every subscription held by `subscriber`. Returns how many were removed.
    pub fn unsubscribe_all(&self, subscriber: SubscriberId) -> usize {
        let mut removed = 0;
        let mut routes = self.routes.borrow_mut();
        for route in routes.values_mut() {
            let before = route.len();
            route.retain(|s| s.subscriber != subscriber);
            removed += before - route.len();
        }
        routes.retain(|_, route| !route.is_empty());
        if removed > 0 {
            tracing::debug!(?subscriber, removed, "unsubscribed");
        }
        removed
    }

    #[must_use]
    pub fn subscriber_count(&self, kind: MessageKind) -> usize {
        self.routes.borrow().get(&kind).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_subscribed(&self, subscriber: SubscriberId, kind: MessageKind) -> bool {
        self.routes
            .borrow()
            .get(&kind)
            .is_some_and(|route| route.iter().any(|s| s.subscriber == subscriber))
    }

    /// Publishes one message.
    pub fn publish<T: Message>(&self, message: T) -> DeliveryReport {
        self.publish_envelope(Envelope::new(message))
    }

    /// Publishes everything in `outbox`, in order, as one cascade.
    pub fn publish_all(&self, outbox: &mut Outbox) -> DeliveryReport {
        self.queue.borrow_mut().extend(outbox.drain());
        self.run()
    }

    pub fn publish_envelope(&self, envelope: Envelope) -> DeliveryReport {
        self.queue.borrow_mut().push_back(envelope);
        self.run()
    }

    fn run(&self) -> DeliveryReport {
        if self.dispatching.replace(true) {
            return DeliveryReport {
                deferred: true,
                ..DeliveryReport::default()
            };
        }
        let _guard = DispatchGuard(&self.dispatching);

        let mut report = DeliveryReport::default();
        let mut deliveries = 0usize;
        while let Some(envelope) = self.next_queued() {
            let snapshot = self.route_snapshot(envelope.kind());
            for subscription in snapshot {
                deliveries += 1;
                if deliveries > MAX_DELIVERIES_PER_PUBLISH {
                    let dropped = self.queue.borrow_mut().drain(..).count();
                    tracing::error!(
                        kind = ?envelope.kind(),
                        dropped,
                        "message cascade exceeded delivery limit; dropping queue"
                    );
                    return report;
                }
                self.deliver(&subscription, &envelope, &mut report);
            }
        }
        report
    }

    fn deliver(&self, subscription: &Subscription, envelope: &Envelope, report: &mut DeliveryReport) {
        let mut outbox = Outbox::at(envelope.issued_at());
        let result = match subscription.handler.try_borrow_mut() {
            Ok(mut handler) => handler(envelope, &mut outbox),
            Err(_) => Err(HandlerError::Busy(subscription.subscriber.raw())),
        };

        match result {
            Ok(()) => report.delivered += 1,
            Err(HandlerError::SubscriberGone(raw)) => {
                report.failed += 1;
                tracing::warn!(
                    subscriber = raw,
                    kind = ?envelope.kind(),
                    "subscriber dropped without unsubscribing; pruning"
                );
                self.unsubscribe_all(subscription.subscriber);
            }
            Err(err) => {
                report.failed += 1;
                tracing::warn!(
                    subscriber = subscription.subscriber.raw(),
                    kind = ?envelope.kind(),
                    error = %err,
                    "message handler failed"
                );
            }
        }

        if !outbox.is_empty() {
            self.queue.borrow_mut().extend(outbox.drain());
        }
    }

    fn next_queued(&self) -> Option<Envelope> {
        self.queue.borrow_mut().pop_front()
    }

    fn route_snapshot(&self, kind: MessageKind) -> Vec<Rc<Subscription>> {
        self.routes.borrow().get(&kind).cloned().unwrap_or_default()
    }
}
