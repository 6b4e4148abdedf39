//! The closed action vocabulary checked against providers

use serde::{Deserialize, Serialize};
use std::fmt;

/// An interaction an actor can attempt at a position.
///
/// Providers translate these into their own flag/permission vocabulary;
/// the engine never interprets them beyond using the value as part of the
/// decision cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Breaking a block (mining, demolition).
    BlockBreak,
    /// Placing a block (construction).
    BlockPlace,
    /// Opening inventory-holding blocks (chests, furnaces, barrels).
    ContainerAccess,
    /// Using interactive blocks (doors, buttons, levers, pressure plates).
    Interact,
    /// Combat between actors.
    Pvp,
    /// Damaging creatures or animals.
    MobDamage,
    /// Picking up or placing liquids with a bucket.
    BucketUse,
    /// Damaging non-living entities (item frames, armor stands).
    EntityDamage,
    /// Trampling farmland crops.
    Trample,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::BlockBreak => "block_break",
            Action::BlockPlace => "block_place",
            Action::ContainerAccess => "container_access",
            Action::Interact => "interact",
            Action::Pvp => "pvp",
            Action::MobDamage => "mob_damage",
            Action::BucketUse => "bucket_use",
            Action::EntityDamage => "entity_damage",
            Action::Trample => "trample",
        };
        f.write_str(name)
    }
}
