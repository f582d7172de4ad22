//! Request identity and priority types shared by the queue and its policies

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a submission, unique while the request is pending
///
/// Ids are assigned monotonically starting at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueuedId(u64);

impl QueuedId {
    /// First id handed out by a fresh queue
    pub const FIRST: Self = Self(1);

    /// Wrap a raw id
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Id following this one
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for QueuedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity identifier attached to requests and ray hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

/// Scheduling class of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Background queries (ambient awareness, idle checks)
    Low = 0,
    /// Regular gameplay queries
    #[default]
    Medium = 1,
    /// Queries that gate an imminent decision (cover, line of fire)
    High = 2,
    /// Queries that must be answered as soon as possible
    VeryHigh = 3,
}

impl Priority {
    /// All priority classes, lowest first
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::VeryHigh];

    /// Starting scheduling value of the class before any aging
    pub const fn base_value(self) -> f32 {
        match self {
            Self::Low => 0.0,
            Self::Medium => 10.0,
            Self::High => 20.0,
            Self::VeryHigh => 30.0,
        }
    }
}

/// Caller-supplied label attached to a request for diagnostics only
///
/// Never affects scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterDebugInfo {
    /// Free-form name of the requesting system
    pub requester: String,
    /// Free-form extra context
    pub custom: String,
    /// Entity on whose behalf the request was made
    pub entity_id: Option<EntityId>,
}

impl RequesterDebugInfo {
    /// Create a label for `requester`
    pub fn new(requester: impl Into<String>) -> Self {
        Self {
            requester: requester.into(),
            ..Self::default()
        }
    }

    /// Attach free-form context
    pub fn with_custom(mut self, custom: impl Into<String>) -> Self {
        self.custom = custom.into();
        self
    }

    /// Attach the requesting entity
    pub fn with_entity(mut self, entity_id: EntityId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }
}
