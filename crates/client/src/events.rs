//! Scope-tagged unauthorized notifications.
//!
//! The connection emits an event whenever a 401 exhausts its recovery
//! path and the scope's tokens are cleared. Consumers subscribe to drive
//! logout/redirect flows; the client itself never consumes the channel.

use tokio::sync::broadcast;

use crate::tokens::TokenScope;

/// A scope's session was rejected and its tokens have been cleared.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnauthorizedEvent {
    pub scope: TokenScope,
}

/// Broadcast hub for [`UnauthorizedEvent`]s.
#[derive(Clone, Debug)]
pub struct AuthEvents {
    sender: broadcast::Sender<UnauthorizedEvent>,
}

impl AuthEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    /// `capacity` bounds how many unconsumed events a slow subscriber can
    /// lag behind before missing some.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UnauthorizedEvent> {
        self.sender.subscribe()
    }

    /// Fire-and-forget: an emission with no live subscribers is dropped.
    pub(crate) fn emit(&self, scope: TokenScope) {
        let _ignored = self.sender.send(UnauthorizedEvent { scope });
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_scope_tagged_events() {
        let events = AuthEvents::new();
        let mut first = events.subscribe();
        let mut second = events.subscribe();

        events.emit(TokenScope::Admin);

        assert_eq!(
            first.recv().await.unwrap(),
            UnauthorizedEvent {
                scope: TokenScope::Admin
            }
        );
        assert_eq!(
            second.recv().await.unwrap(),
            UnauthorizedEvent {
                scope: TokenScope::Admin
            }
        );
    }

    #[test]
    fn emitting_without_subscribers_is_a_no_op() {
        let events = AuthEvents::new();
        events.emit(TokenScope::Customer);
    }
}
