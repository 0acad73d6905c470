//! Session change notification
//!
//! A broadcast feed of per-session change events. Every committed write to a
//! session's rows publishes one event; subscribers react by refetching the
//! full session detail (replace-by-latest, never merge-by-delta), so a missed
//! or duplicated event only costs an extra refetch.
//!
//! ```text
//! API handler ──▶ publish() ──▶ broadcast::Sender<SessionEvent>
//!                                      │
//!                    ┌─────────────────┴─────────────────┐
//!                    ▼                                   ▼
//!        SessionSubscription (SSE)         SessionSubscription (tests)
//!        filters to its session id         dropped = unsubscribed
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// One committed change to a session's rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub event_id: Uuid,
    /// Session the change belongs to, as "sessions:key"
    pub session_id: String,
    /// Changed table: "sessions", "participants" or "orders"
    pub resource: String,
    /// "created" or "updated"
    pub action: String,
    /// Id of the changed record
    pub record_id: String,
    /// Per-session monotonically increasing version
    pub version: u64,
}

/// Change feed over all sessions, with per-session version counters
#[derive(Debug, Clone)]
pub struct SessionWatch {
    tx: broadcast::Sender<SessionEvent>,
    /// Session id -> last published version
    versions: Arc<DashMap<String, u64>>,
    shutdown: CancellationToken,
}

impl SessionWatch {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            versions: Arc::new(DashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Publish a change event and return its version.
    ///
    /// Having no subscribers is normal and not an error.
    pub fn publish(
        &self,
        session_id: &str,
        resource: &str,
        action: &str,
        record_id: &str,
    ) -> u64 {
        let version = {
            let mut entry = self.versions.entry(session_id.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };

        let event = SessionEvent {
            event_id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            resource: resource.to_string(),
            action: action.to_string(),
            record_id: record_id.to_string(),
            version,
        };

        tracing::debug!(
            session = %event.session_id,
            resource = %event.resource,
            action = %event.action,
            version,
            "session change"
        );
        let _ = self.tx.send(event);
        version
    }

    /// Subscribe to one session's events. Dropping the handle unsubscribes.
    pub fn subscribe(&self, session_id: &str) -> SessionSubscription {
        SessionSubscription {
            session_id: session_id.to_string(),
            rx: self.tx.subscribe(),
            shutdown: self.shutdown.clone(),
        }
    }

    /// Last published version for a session (0 if none)
    pub fn version(&self, session_id: &str) -> u64 {
        self.versions.get(session_id).map(|v| *v).unwrap_or(0)
    }

    /// End all subscriptions (server shutdown)
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Receiving half of [`SessionWatch::subscribe`], filtered to one session
pub struct SessionSubscription {
    session_id: String,
    rx: broadcast::Receiver<SessionEvent>,
    shutdown: CancellationToken,
}

impl SessionSubscription {
    /// Next event for this session; `None` once the watch shuts down.
    ///
    /// A lagged receiver skips ahead rather than erroring: the consumer
    /// refetches full state anyway, so dropped intermediate events are fine.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return None,
                event = self.rx.recv() => match event {
                    Ok(event) if event.session_id == self.session_id => return Some(event),
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(session = %self.session_id, skipped, "subscription lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_only_own_session_events() {
        let watch = SessionWatch::new(16);
        let mut sub = watch.subscribe("sessions:a");

        watch.publish("sessions:b", "orders", "created", "orders:1");
        watch.publish("sessions:a", "participants", "created", "participants:1");

        let event = sub.recv().await.expect("event");
        assert_eq!(event.session_id, "sessions:a");
        assert_eq!(event.resource, "participants");
        assert_eq!(event.version, 1);
    }

    #[tokio::test]
    async fn versions_increase_per_session() {
        let watch = SessionWatch::new(16);

        assert_eq!(watch.publish("sessions:a", "orders", "created", "orders:1"), 1);
        assert_eq!(watch.publish("sessions:a", "orders", "created", "orders:2"), 2);
        // Independent counter per session
        assert_eq!(watch.publish("sessions:b", "orders", "created", "orders:3"), 1);

        assert_eq!(watch.version("sessions:a"), 2);
        assert_eq!(watch.version("sessions:b"), 1);
        assert_eq!(watch.version("sessions:unknown"), 0);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let watch = SessionWatch::new(16);
        watch.publish("sessions:a", "sessions", "updated", "sessions:a");
    }

    #[tokio::test]
    async fn shutdown_ends_subscriptions() {
        let watch = SessionWatch::new(16);
        let mut sub = watch.subscribe("sessions:a");
        watch.shutdown();
        assert!(sub.recv().await.is_none());
    }
}
