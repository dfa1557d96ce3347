//! Presence registry: who is online.
//!
//! One entry per connection that has announced itself. The snapshot is
//! ordered by connection id, so every client sees the same list order.

use std::collections::BTreeMap;

use super::protocol::UserDescriptor;
use super::registry::ConnectionId;

/// Connection id to user descriptor.
#[derive(Debug, Clone, Default)]
pub struct PresenceRegistry {
    entries: BTreeMap<ConnectionId, UserDescriptor>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace the descriptor for `conn`.
    pub fn announce(&mut self, conn: ConnectionId, user: UserDescriptor) {
        self.entries.insert(conn, user);
    }

    /// Drop `conn`'s entry. Returns whether one existed.
    pub fn remove(&mut self, conn: ConnectionId) -> bool {
        self.entries.remove(&conn).is_some()
    }

    pub fn get(&self, conn: ConnectionId) -> Option<&UserDescriptor> {
        self.entries.get(&conn)
    }

    /// Every online user, in connection order.
    pub fn snapshot(&self) -> Vec<UserDescriptor> {
        self.entries.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announce_replaces() {
        let mut presence = PresenceRegistry::new();
        presence.announce(ConnectionId(1), UserDescriptor::new("u1", "ada"));
        presence.announce(ConnectionId(1), UserDescriptor::new("u1", "ada2"));
        assert_eq!(presence.len(), 1);
        assert_eq!(presence.get(ConnectionId(1)).unwrap().username, "ada2");
    }

    #[test]
    fn test_snapshot_order() {
        let mut presence = PresenceRegistry::new();
        presence.announce(ConnectionId(7), UserDescriptor::new("u7", "grace"));
        presence.announce(ConnectionId(2), UserDescriptor::new("u2", "alan"));
        let names: Vec<_> = presence.snapshot().into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["alan", "grace"]);
    }

    #[test]
    fn test_remove() {
        let mut presence = PresenceRegistry::new();
        presence.announce(ConnectionId(1), UserDescriptor::new("u1", "ada"));
        assert!(presence.remove(ConnectionId(1)));
        assert!(!presence.remove(ConnectionId(1)));
        assert!(presence.is_empty());
    }
}
