//! A typed, cloneable event channel handed explicitly through the view tree.
//!
//! Subscribers are called synchronously from [`EventBus::publish`]. Publishing
//! from inside a subscriber is queued and delivered after the current event,
//! so handlers may freely talk back to the bus. Every delivered event is also
//! kept in a bounded queue for consumers that prefer polling with
//! [`EventBus::drain`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

pub const DEFAULT_CAPACITY: usize = 64;

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Inner<E> {
    next_id: u64,
    handlers: Vec<(Subscription, Handler<E>)>,
    queue: VecDeque<E>,
    capacity: usize,
    dispatching: bool,
    pending: VecDeque<E>,
}

pub struct EventBus<E> {
    inner: Arc<Mutex<Inner<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("EventBus")
            .field("subscribers", &inner.handlers.len())
            .field("queued", &inner.queue.len())
            .field("capacity", &inner.capacity)
            .finish()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_id: 0,
                handlers: Vec::new(),
                queue: VecDeque::new(),
                capacity: capacity.max(1),
                dispatching: false,
                pending: VecDeque::new(),
            })),
        }
    }

    pub fn subscribe(&self, handler: impl Fn(&E) + Send + Sync + 'static) -> Subscription {
        let mut inner = self.inner.lock();
        let id = Subscription(inner.next_id);
        inner.next_id += 1;
        inner.handlers.push((id, Arc::new(handler)));
        id
    }

    /// Returns `false` when the subscription was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.handlers.len();
        inner.handlers.retain(|(id, _)| *id != subscription);
        inner.handlers.len() != before
    }

    pub fn publish(&self, event: E) {
        let mut event = {
            let mut inner = self.inner.lock();
            if inner.dispatching {
                inner.pending.push_back(event);
                return;
            }
            inner.dispatching = true;
            event
        };

        loop {
            let handlers: Vec<Handler<E>> = {
                let inner = self.inner.lock();
                inner.handlers.iter().map(|(_, h)| Arc::clone(h)).collect()
            };
            for handler in &handlers {
                handler(&event);
            }

            let mut inner = self.inner.lock();
            if inner.queue.len() >= inner.capacity {
                inner.queue.pop_front();
                log::warn!("event queue full, dropping the oldest event");
            }
            inner.queue.push_back(event);
            match inner.pending.pop_front() {
                Some(next) => event = next,
                None => {
                    inner.dispatching = false;
                    return;
                }
            }
        }
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<E> {
        self.inner.lock().queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().handlers.len()
    }
}
