//! Region identity, membership, bounds, and provider ordering

use crate::types::{ActorId, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Canonical identity of a region: provider name plus region id, compared
/// case-insensitively.
///
/// Two [`RegionInfo`] values describe the same region for tracking and
/// capacity purposes iff their identities match, regardless of any
/// owner/member differences between the snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionIdentity {
    provider: String,
    region: String,
}

impl RegionIdentity {
    pub fn new(provider: impl AsRef<str>, region: impl AsRef<str>) -> Self {
        Self {
            provider: provider.as_ref().to_lowercase(),
            region: region.as_ref().to_lowercase(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

impl fmt::Display for RegionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.region)
    }
}

/// Snapshot of a region at a position, as described by a provider.
///
/// Immutable to callers: the sets are private and only reachable through
/// borrowing accessors, so no caller can mutate shared state through a
/// snapshot it was handed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    region_id: String,
    provider: String,
    owners: HashSet<ActorId>,
    members: HashSet<ActorId>,
}

impl RegionInfo {
    pub fn new(provider: impl Into<String>, region_id: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            provider: provider.into(),
            owners: HashSet::new(),
            members: HashSet::new(),
        }
    }

    /// Add an owner to the snapshot.
    pub fn with_owner(mut self, owner: ActorId) -> Self {
        self.owners.insert(owner);
        self
    }

    /// Add a member to the snapshot.
    pub fn with_member(mut self, member: ActorId) -> Self {
        self.members.insert(member);
        self
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn owners(&self) -> &HashSet<ActorId> {
        &self.owners
    }

    pub fn members(&self) -> &HashSet<ActorId> {
        &self.members
    }

    /// The canonical identity used for tracking and capacity keys.
    pub fn identity(&self) -> RegionIdentity {
        RegionIdentity::new(&self.provider, &self.region_id)
    }

    pub fn is_owner(&self, actor: ActorId) -> bool {
        self.owners.contains(&actor)
    }

    pub fn is_member(&self, actor: ActorId) -> bool {
        self.members.contains(&actor)
    }

    /// The strongest role the actor holds in this region.
    pub fn role_of(&self, actor: ActorId) -> RegionRole {
        if self.is_owner(actor) {
            RegionRole::Owner
        } else if self.is_member(actor) {
            RegionRole::MemberOrOwner
        } else {
            RegionRole::Visitor
        }
    }
}

/// Minimum-role ladder used by role-gated policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionRole {
    /// The region's founder/leader/mayor tier.
    Owner,
    /// Anyone trusted into the region, owners included.
    MemberOrOwner,
    /// Merely being inside the region suffices.
    Visitor,
}

/// Axis-aligned bounding volume of a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    min: Position,
    max: Position,
}

impl RegionBounds {
    pub fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> &Position {
        &self.min
    }

    pub fn max(&self) -> &Position {
        &self.max
    }

    pub fn dimension(&self) -> Option<&str> {
        self.min.dimension.as_deref()
    }

    /// Whether the position lies inside the volume (dimension included).
    pub fn contains(&self, pos: &Position) -> bool {
        self.min.dimension == pos.dimension
            && pos.x >= self.min.x
            && pos.x <= self.max.x
            && pos.y >= self.min.y
            && pos.y <= self.max.y
            && pos.z >= self.min.z
            && pos.z <= self.max.z
    }
}

/// Consultation order of providers: higher values are asked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderPriority {
    /// Broad fallback providers, consulted last.
    Lowest,
    Low,
    /// Default for providers without a reason to be elsewhere.
    Normal,
    /// Land/claim plugins that should beat general-purpose providers.
    High,
    /// Server-wide protection providers, consulted first.
    Highest,
    /// Absolute precedence; decides or records before anything else runs.
    Monitor,
}

impl ProviderPriority {
    /// Numeric weight; higher runs earlier.
    pub fn value(&self) -> i32 {
        match self {
            ProviderPriority::Lowest => 0,
            ProviderPriority::Low => 10,
            ProviderPriority::Normal => 20,
            ProviderPriority::High => 30,
            ProviderPriority::Highest => 40,
            ProviderPriority::Monitor => 50,
        }
    }
}
