//! Per-wishlist realtime fan-out channel registry.
//!
//! Each wishlist with at least one live subscriber owns a broadcast
//! channel; every subscriber holds an independent receiver, so a slow or
//! dropped connection never blocks or aborts delivery to the rest.
//! Broadcasting with no subscribers is a no-op and never errors.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::models::WishlistEvent;

/// Buffered events per subscriber before a lagging receiver starts
/// dropping the oldest ones.
const CHANNEL_CAPACITY: usize = 64;

/// Process-wide registry of live wishlist channels.
///
/// The map is the only cross-request shared mutable structure in the
/// realtime path; the outer lock guards channel creation and pruning,
/// while delivery itself goes through the lock-free broadcast sender.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: RwLock<HashMap<Uuid, broadcast::Sender<WishlistEvent>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber on the wishlist channel, creating the
    /// channel on first subscription.
    pub fn subscribe(&self, wishlist_id: Uuid) -> broadcast::Receiver<WishlistEvent> {
        let mut channels = self.channels.write().expect("channel registry poisoned");
        let sender = channels
            .entry(wishlist_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        debug!(%wishlist_id, subscribers = sender.receiver_count() + 1, "subscriber registered");
        sender.subscribe()
    }

    /// Drops the wishlist channel if no subscribers remain. Safe to call
    /// repeatedly or for a wishlist that was never subscribed.
    pub fn release(&self, wishlist_id: Uuid) {
        let mut channels = self.channels.write().expect("channel registry poisoned");
        if let Some(sender) = channels.get(&wishlist_id) {
            if sender.receiver_count() == 0 {
                channels.remove(&wishlist_id);
                debug!(%wishlist_id, "channel pruned");
            }
        }
    }

    /// Delivers an event to every current subscriber of the wishlist.
    ///
    /// Returns the number of subscribers reached. Delivery problems on
    /// individual connections are a local concern of each receiver and
    /// never surface here.
    pub fn broadcast(&self, wishlist_id: Uuid, event: WishlistEvent) -> usize {
        let channels = self.channels.read().expect("channel registry poisoned");
        match channels.get(&wishlist_id) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// Current number of live subscribers on a wishlist channel.
    pub fn subscriber_count(&self, wishlist_id: Uuid) -> usize {
        let channels = self.channels.read().expect("channel registry poisoned");
        channels
            .get(&wishlist_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// Number of wishlists with a live channel.
    pub fn channel_count(&self) -> usize {
        self.channels.read().expect("channel registry poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(wishlist_id: Uuid) -> WishlistEvent {
        WishlistEvent::item_deleted(wishlist_id, Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_target_wishlist() {
        let registry = ChannelRegistry::new();
        let list_a = Uuid::new_v4();
        let list_b = Uuid::new_v4();

        let mut a1 = registry.subscribe(list_a);
        let mut a2 = registry.subscribe(list_a);
        let mut a3 = registry.subscribe(list_a);
        let mut b1 = registry.subscribe(list_b);

        let event = sample_event(list_a);
        let delivered = registry.broadcast(list_a, event.clone());
        assert_eq!(delivered, 3);

        assert_eq!(a1.recv().await.unwrap(), event);
        assert_eq!(a2.recv().await.unwrap(), event);
        assert_eq!(a3.recv().await.unwrap(), event);
        assert!(b1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dropped_subscriber_does_not_block_others() {
        let registry = ChannelRegistry::new();
        let list = Uuid::new_v4();

        let mut alive_a = registry.subscribe(list);
        let dead = registry.subscribe(list);
        let mut alive_b = registry.subscribe(list);
        drop(dead);

        let event = sample_event(list);
        let delivered = registry.broadcast(list, event.clone());
        assert_eq!(delivered, 2);

        assert_eq!(alive_a.recv().await.unwrap(), event);
        assert_eq!(alive_b.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers_is_noop() {
        let registry = ChannelRegistry::new();
        let delivered = registry.broadcast(Uuid::new_v4(), sample_event(Uuid::new_v4()));
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_release_prunes_empty_channel() {
        let registry = ChannelRegistry::new();
        let list = Uuid::new_v4();

        let rx = registry.subscribe(list);
        assert_eq!(registry.channel_count(), 1);

        // Still has a subscriber: release keeps the channel.
        registry.release(list);
        assert_eq!(registry.channel_count(), 1);

        drop(rx);
        registry.release(list);
        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_disconnect_sequence_prunes_after_last_subscriber() {
        let registry = ChannelRegistry::new();
        let list = Uuid::new_v4();

        let rx1 = registry.subscribe(list);
        let rx2 = registry.subscribe(list);

        // Each disconnect drops its receiver first, then releases, the
        // order the socket handler uses. Releasing with a live receiver
        // still registered must not prune.
        drop(rx1);
        registry.release(list);
        assert_eq!(registry.channel_count(), 1);

        drop(rx2);
        registry.release(list);
        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_release_unknown_wishlist_is_noop() {
        let registry = ChannelRegistry::new();
        registry.release(Uuid::new_v4());
        registry.release(Uuid::new_v4());
        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_resubscribe_after_prune() {
        let registry = ChannelRegistry::new();
        let list = Uuid::new_v4();

        drop(registry.subscribe(list));
        registry.release(list);

        let mut rx = registry.subscribe(list);
        let event = sample_event(list);
        assert_eq!(registry.broadcast(list, event.clone()), 1);
        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_subscriber_count() {
        let registry = ChannelRegistry::new();
        let list = Uuid::new_v4();
        assert_eq!(registry.subscriber_count(list), 0);

        let _rx1 = registry.subscribe(list);
        let _rx2 = registry.subscribe(list);
        assert_eq!(registry.subscriber_count(list), 2);
    }
}
