//! Identity types for Stockroom entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Entity identifier.
///
/// Identifiers are opaque strings so that records imported from other
/// systems (and the short numeric ids used by the seed data) stay valid.
/// Freshly created records get a UUIDv7 rendered as text.
pub type EntityId = String;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new entity id (UUIDv7, timestamp-sortable).
///
/// Two ids generated within the same millisecond still differ, unlike the
/// millisecond-clock ids they replace.
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_entity_id_is_uuid() {
        let id = new_entity_id();
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }

    #[test]
    fn test_new_entity_id_unique_in_tight_loop() {
        let ids: HashSet<EntityId> = (0..1000).map(|_| new_entity_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
