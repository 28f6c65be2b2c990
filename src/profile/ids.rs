//! Identity for profile entities

use chrono::Utc;
use std::fmt;

/// Id of a service, work or team member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// Assigned by the profile service
    Remote(String),
    /// Assigned in this editor session; not yet persisted
    Local(u64),
}

impl EntityId {
    pub fn is_local(&self) -> bool {
        matches!(self, EntityId::Local(_))
    }

    /// Id as sent on save; `None` asks the service to create the entity
    pub fn wire_id(&self) -> Option<&str> {
        match self {
            EntityId::Remote(id) => Some(id),
            EntityId::Local(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Remote(id) => f.write_str(id),
            EntityId::Local(n) => write!(f, "new-{n}"),
        }
    }
}

/// Hands out local ids from the wall clock, strictly increasing even when
/// several entities are created within the same millisecond
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> EntityId {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.next_at(now)
    }

    pub fn next_at(&mut self, now_ms: u64) -> EntityId {
        self.last = now_ms.max(self.last + 1);
        EntityId::Local(self.last)
    }
}
