//! Output event subscriptions
//!
//! Every `load` subscribes anew before opening the resource and drops the
//! previous subscription first, so events still in flight for an abandoned
//! resource carry an id that is no longer live and are ignored.

use serde::{Deserialize, Serialize};
use std::fmt;
use vibe_core::MediaKind;

/// Identifies one engine's interest in one opened resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId {
    kind: MediaKind,
    seq: u64,
}

impl SubscriptionId {
    /// Media kind of the engine that owns this subscription
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Sequence number, unique per engine
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.seq)
    }
}

/// Subscription registry of one engine; at most one subscription is live
#[derive(Debug, Clone)]
pub struct Subscriptions {
    kind: MediaKind,
    next_seq: u64,
    live: Option<SubscriptionId>,
}

impl Subscriptions {
    /// Create an empty registry for an engine of `kind`
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            next_seq: 1,
            live: None,
        }
    }

    /// Start a new subscription, ending any live one
    pub fn subscribe(&mut self) -> SubscriptionId {
        let id = SubscriptionId {
            kind: self.kind,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.live = Some(id);
        id
    }

    /// End the live subscription, returning it
    pub fn unsubscribe(&mut self) -> Option<SubscriptionId> {
        self.live.take()
    }

    /// Whether `id` is the live subscription
    pub fn is_live(&self, id: SubscriptionId) -> bool {
        self.live == Some(id)
    }

    /// Live subscription, if any
    pub fn live(&self) -> Option<SubscriptionId> {
        self.live
    }
}
