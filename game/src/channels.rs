use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::engine::{GameSnapshot, MoveRecord};
use crate::session::SessionObserver;

/// The observer callbacks, as values that can cross a channel
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    StateChanged(GameSnapshot),
    MoveResolved(MoveRecord),
    PowerUpOffered(GameSnapshot),
}

#[derive(Debug, Clone)]
pub struct SessionNotification {
    pub session_id: Uuid,
    pub event: SessionEvent,
}

/// Manages broadcast channels for live sessions
/// One broadcast channel per session, so renderer, audio and log consumers subscribe independently
#[derive(Debug, Clone)]
pub struct SessionChannels {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<SessionNotification>>>>,
}

impl Default for SessionChannels {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionChannels {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get or create the sender for a session
    pub async fn sender(&self, session_id: Uuid) -> broadcast::Sender<SessionNotification> {
        let mut channels = self.channels.write().await;
        channels
            .entry(session_id)
            // A full game is a few hundred events at most
            .or_insert_with(|| broadcast::channel(1024).0)
            .clone()
    }

    pub async fn subscribe(&self, session_id: Uuid) -> broadcast::Receiver<SessionNotification> {
        self.sender(session_id).await.subscribe()
    }

    /// Send to every subscriber of the notification's session
    pub async fn notify(&self, notification: SessionNotification) {
        let channels = self.channels.read().await;

        if let Some(sender) = channels.get(&notification.session_id) {
            // Ignore errors - they mean no receivers are listening
            let _ = sender.send(notification);
        }
    }

    /// Observer that forwards a session's callbacks into its channel
    pub async fn observer(&self, session_id: Uuid) -> ChannelObserver {
        ChannelObserver {
            session_id,
            sender: self.sender(session_id).await,
        }
    }

    /// Drop a session's channel if nobody is listening
    pub async fn cleanup(&self, session_id: Uuid) {
        let mut channels = self.channels.write().await;

        if let Some(sender) = channels.get(&session_id)
            && sender.receiver_count() == 0
        {
            channels.remove(&session_id);
            tracing::debug!(session_id = %session_id, "Removed session channel (no subscribers)");
        }
    }

    pub async fn remove(&self, session_id: Uuid) {
        let mut channels = self.channels.write().await;
        channels.remove(&session_id);
        tracing::debug!(session_id = %session_id, "Removed session channel");
    }
}

/// Bridges the synchronous observer hooks to a broadcast channel
pub struct ChannelObserver {
    session_id: Uuid,
    sender: broadcast::Sender<SessionNotification>,
}

impl ChannelObserver {
    fn send(&self, event: SessionEvent) {
        let _ = self.sender.send(SessionNotification {
            session_id: self.session_id,
            event,
        });
    }
}

impl SessionObserver for ChannelObserver {
    fn on_state_change(&mut self, snapshot: &GameSnapshot) {
        self.send(SessionEvent::StateChanged(snapshot.clone()));
    }

    fn on_move_resolved(&mut self, record: &MoveRecord) {
        self.send(SessionEvent::MoveResolved(record.clone()));
    }

    fn on_power_up_offered(&mut self, snapshot: &GameSnapshot) {
        self.send(SessionEvent::PowerUpOffered(snapshot.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EventKind, GameState, Rules, ScriptedRandom};
    use crate::session::Session;

    #[tokio::test]
    async fn test_subscribe_creates_channel() {
        let channels = SessionChannels::new();
        let session_id = Uuid::new_v4();

        let _receiver = channels.subscribe(session_id).await;

        assert!(channels.channels.read().await.contains_key(&session_id));
    }

    #[tokio::test]
    async fn test_notify_sends_to_subscribers() {
        let channels = SessionChannels::new();
        let session_id = Uuid::new_v4();

        let mut receiver = channels.subscribe(session_id).await;

        channels
            .notify(SessionNotification {
                session_id,
                event: SessionEvent::StateChanged(GameState::default().snapshot()),
            })
            .await;

        let notification = receiver.recv().await.unwrap();
        assert_eq!(notification.session_id, session_id);
        assert!(matches!(notification.event, SessionEvent::StateChanged(_)));
    }

    #[tokio::test]
    async fn test_observer_forwards_session_events_in_order() {
        let channels = SessionChannels::new();
        let mut session = Session::new(Rules::classic(), ScriptedRandom::new([1, 2]));
        let mut receiver = channels.subscribe(session.id()).await;
        session.add_observer(channels.observer(session.id()).await);

        session.request_roll();
        session.request_roll();

        let mut kinds = Vec::new();
        while let Ok(notification) = receiver.try_recv() {
            match notification.event {
                SessionEvent::MoveResolved(record) => kinds.push(record.event_kind),
                SessionEvent::StateChanged(snapshot) => {
                    assert_eq!(snapshot.rolls_count as usize, kinds.len())
                }
                SessionEvent::PowerUpOffered(_) => panic!("classic games never offer power-ups"),
            }
        }
        // 1 -> 2 climbs to 38, 1 -> 3 is a plain move
        assert_eq!(kinds, vec![EventKind::Ladder, EventKind::Move]);
    }

    #[tokio::test]
    async fn test_multiple_sessions_isolated() {
        let channels = SessionChannels::new();
        let session_1 = Uuid::new_v4();
        let session_2 = Uuid::new_v4();

        let mut receiver_1 = channels.subscribe(session_1).await;
        let mut receiver_2 = channels.subscribe(session_2).await;

        let mut observer = channels.observer(session_2).await;
        observer.on_state_change(&GameState::default().snapshot());

        assert!(receiver_1.try_recv().is_err());
        let notification = receiver_2.recv().await.unwrap();
        assert_eq!(notification.session_id, session_2);
    }

    #[tokio::test]
    async fn test_cleanup_removes_empty_channels() {
        let channels = SessionChannels::new();
        let session_id = Uuid::new_v4();

        {
            let _receiver = channels.subscribe(session_id).await;
        }

        channels.cleanup(session_id).await;
        assert!(!channels.channels.read().await.contains_key(&session_id));
    }

    #[tokio::test]
    async fn test_cleanup_preserves_active_channels() {
        let channels = SessionChannels::new();
        let session_id = Uuid::new_v4();

        let _receiver = channels.subscribe(session_id).await;
        channels.cleanup(session_id).await;

        assert!(channels.channels.read().await.contains_key(&session_id));

        channels.remove(session_id).await;
        assert!(!channels.channels.read().await.contains_key(&session_id));
    }

    #[test]
    fn test_session_event_serializes_with_tag() {
        let event = SessionEvent::StateChanged(GameState::default().snapshot());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "StateChanged");
        assert_eq!(json["data"]["rolls_count"], 0);
    }
}
