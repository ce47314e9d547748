use hecs::Entity;

/// Messages delivered to every subscriber of a [`BroadcastBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusMessage {
    /// Drop whatever you are holding, right now
    ForceRelease,
}

/// Fan-out channel from the target registry to every pool member.
///
/// Delivery is synchronous: [`BroadcastBus::broadcast`] returns only after every
/// subscriber has handled the message. Nothing is queued.
#[derive(Debug, Default)]
pub struct BroadcastBus {
    subscribers: Vec<Entity>,
}

impl BroadcastBus {
    /// Returns false if `entity` was already subscribed.
    pub fn subscribe(&mut self, entity: Entity) -> bool {
        if self.is_subscribed(entity) {
            return false;
        }
        self.subscribers.push(entity);
        true
    }

    /// Returns false if `entity` was not subscribed.
    pub fn unsubscribe(&mut self, entity: Entity) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| *s != entity);
        self.subscribers.len() != before
    }

    pub fn is_subscribed(&self, entity: Entity) -> bool {
        self.subscribers.contains(&entity)
    }

    pub fn subscribers(&self) -> &[Entity] {
        &self.subscribers
    }

    pub fn broadcast(&self, message: BusMessage, mut deliver: impl FnMut(Entity, BusMessage)) {
        for subscriber in &self.subscribers {
            deliver(*subscriber, message);
        }
    }
}
