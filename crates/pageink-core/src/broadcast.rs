//! Topic-keyed publish/subscribe channel.
//!
//! Decouples a color picker from the surfaces it configures: the picker
//! publishes on a topic (a surface-group name such as `"home"`), every
//! subscriber of that exact topic receives the value.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::mpsc::{self, Receiver, Sender};
use uuid::Uuid;

/// Subscription handle for unsubscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

struct Subscriber<T> {
    id: SubscriptionId,
    topic: String,
    sender: Sender<T>,
}

type Registry<T> = RefCell<Vec<Subscriber<T>>>;

fn remove<T>(registry: &Registry<T>, id: SubscriptionId) -> bool {
    let Ok(mut subscribers) = registry.try_borrow_mut() else {
        log::warn!("Subscription {} not removed: subscriber list is busy", id);
        return false;
    };
    let before = subscribers.len();
    subscribers.retain(|s| s.id != id);
    let removed = subscribers.len() != before;
    if removed {
        log::debug!("Subscription {} removed", id);
    }
    removed
}

/// Synchronous fan-out bus. Clones share the same subscriber list.
///
/// Publishing with no subscriber on the topic drops the value: nothing is
/// buffered or replayed to later subscribers.
pub struct SelectionBroadcastChannel<T> {
    subscribers: Rc<Registry<T>>,
}

impl<T> Clone for SelectionBroadcastChannel<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<T> Default for SelectionBroadcastChannel<T> {
    fn default() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T> fmt::Debug for SelectionBroadcastChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionBroadcastChannel")
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<T: Clone> SelectionBroadcastChannel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to values published on exactly `topic`.
    pub fn subscribe(&self, topic: impl Into<String>) -> Subscription<T> {
        let topic = topic.into();
        let (sender, receiver) = mpsc::channel();
        let id = SubscriptionId::new();
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            topic: topic.clone(),
            sender,
        });
        log::debug!("Subscription {} added on topic {:?}", id, topic);
        Subscription {
            id,
            topic,
            receiver,
            registry: Rc::downgrade(&self.subscribers),
        }
    }

    /// Remove a subscription. Returns true if it was found.
    ///
    /// Dropping the [`Subscription`] does the same.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove(&self.subscribers, id)
    }

    /// Deliver `value` to every current subscriber of `topic`.
    ///
    /// Returns how many subscribers received it.
    pub fn publish(&self, topic: &str, value: T) -> usize {
        let subscribers = self.subscribers.borrow();
        let delivered = subscribers
            .iter()
            .filter(|s| s.topic == topic)
            .filter(|s| s.sender.send(value.clone()).is_ok())
            .count();
        log::debug!("Published on topic {:?} to {} subscribers", topic, delivered);
        delivered
    }

    /// Number of subscriptions registered for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subscribers.borrow().iter().filter(|s| s.topic == topic).count()
    }
}

/// Receiving end of one subscription. Unsubscribes when dropped.
pub struct Subscription<T> {
    id: SubscriptionId,
    topic: String,
    receiver: Receiver<T>,
    registry: Weak<Registry<T>>,
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .finish()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            remove(&registry, self.id);
        }
    }
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next pending value, if any. Never blocks.
    pub fn try_next(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// All pending values in publish order.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}
