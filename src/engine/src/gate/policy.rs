//! Declarative guard policies and operation identities

use palisade_core::{Action, RegionRole, Surface};
use std::collections::HashSet;
use std::fmt;

/// Explicit, collision-free identity of a guarded operation.
///
/// The signature component keeps overloaded operations apart: two
/// operations sharing a scope and name but differing in parameters must
/// not share a compiled pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationId {
    scope: String,
    name: String,
    signature: String,
}

impl OperationId {
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            signature: String::new(),
        }
    }

    /// Distinguish an overload by its parameter signature.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}({})", self.scope, self.name, self.signature)
    }
}

/// Physical-surface requirement: the actor must occupy (or stand on) one
/// of the allowed block tokens.
#[derive(Debug, Clone)]
pub struct SurfaceRule {
    allowed: HashSet<Surface>,
    check_ground: bool,
}

impl SurfaceRule {
    pub fn standing_in<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Surface>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            check_ground: false,
        }
    }

    pub fn standing_on<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Surface>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            check_ground: true,
        }
    }

    pub(crate) fn allows(&self, surface: &Surface) -> bool {
        self.allowed.contains(surface)
    }

    pub(crate) fn checks_ground(&self) -> bool {
        self.check_ground
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BlacklistRule {
    pub ids: Vec<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct ActionRule {
    pub action: Action,
    pub bypass_permission: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct RegionRule {
    pub region_id: String,
    pub provider: Option<String>,
}

/// Declarative policy attached to an operation.
///
/// A small closed vocabulary of markers, declared through the builder and
/// compiled once by the [`Gate`](crate::Gate). Marker order in the
/// compiled pipeline is fixed (blacklist, wilderness, action check,
/// region/role requirements), not declaration order.
#[derive(Debug, Clone, Default)]
pub struct GuardPolicy {
    pub(crate) bypass_permission: Option<String>,
    pub(crate) surface: Option<SurfaceRule>,
    pub(crate) provider_scope: Option<String>,
    pub(crate) blacklist: Option<BlacklistRule>,
    pub(crate) wilderness: bool,
    pub(crate) action_check: Option<ActionRule>,
    pub(crate) require_region: Option<RegionRule>,
    pub(crate) require_role: Option<RegionRole>,
}

impl GuardPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permission that skips this operation's guard entirely.
    pub fn bypass_permission(mut self, node: impl Into<String>) -> Self {
        self.bypass_permission = Some(node.into());
        self
    }

    /// Require the actor's surface to satisfy the rule.
    pub fn surface(mut self, rule: SurfaceRule) -> Self {
        self.surface = Some(rule);
        self
    }

    /// Fetch region info from one named provider instead of the global
    /// priority-ordered lookup.
    pub fn provider(mut self, name: impl Into<String>) -> Self {
        self.provider_scope = Some(name.into());
        self
    }

    /// Deny inside any of the named regions.
    pub fn blacklist<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = self.blacklist.take().and_then(|rule| rule.provider);
        self.blacklist = Some(BlacklistRule {
            ids: ids.into_iter().map(Into::into).collect(),
            provider,
        });
        self
    }

    /// Restrict the blacklist to regions owned by one provider.
    pub fn blacklist_provider(mut self, name: impl Into<String>) -> Self {
        let ids = self
            .blacklist
            .take()
            .map(|rule| rule.ids)
            .unwrap_or_default();
        self.blacklist = Some(BlacklistRule {
            ids,
            provider: Some(name.into()),
        });
        self
    }

    /// Require the actor to be outside any region ("wilderness").
    pub fn require_wilderness(mut self) -> Self {
        self.wilderness = true;
        self
    }

    /// Run a standard action check at the actor's position, delegating to
    /// the decision engine.
    pub fn check_action(mut self, action: Action) -> Self {
        let bypass_permission = self
            .action_check
            .take()
            .and_then(|rule| rule.bypass_permission);
        self.action_check = Some(ActionRule {
            action,
            bypass_permission,
        });
        self
    }

    /// Permission that skips only the action check, not the whole guard.
    pub fn action_bypass(mut self, node: impl Into<String>) -> Self {
        let action = self
            .action_check
            .take()
            .map(|rule| rule.action)
            .unwrap_or(Action::Interact);
        self.action_check = Some(ActionRule {
            action,
            bypass_permission: Some(node.into()),
        });
        self
    }

    /// Require the actor to be inside the named region.
    pub fn require_region(mut self, region_id: impl Into<String>) -> Self {
        let provider = self.require_region.take().and_then(|rule| rule.provider);
        self.require_region = Some(RegionRule {
            region_id: region_id.into(),
            provider,
        });
        self
    }

    /// Restrict the required region to one provider.
    pub fn require_region_provider(mut self, name: impl Into<String>) -> Self {
        let region_id = self
            .require_region
            .take()
            .map(|rule| rule.region_id)
            .unwrap_or_default();
        self.require_region = Some(RegionRule {
            region_id,
            provider: Some(name.into()),
        });
        self
    }

    /// Require a minimum role in the actor's current region.
    pub fn require_role(mut self, role: RegionRole) -> Self {
        self.require_role = Some(role);
        self
    }

    /// Layer this declaration over a coarser one: a marker declared here
    /// wins; a marker absent here falls back to `base`.
    ///
    /// Mirrors method-over-type declaration precedence: a finer
    /// declaration can add or replace markers but cannot remove one the
    /// coarser level declared.
    pub fn overlay(mut self, base: &GuardPolicy) -> Self {
        self.bypass_permission = self
            .bypass_permission
            .or_else(|| base.bypass_permission.clone());
        self.surface = self.surface.or_else(|| base.surface.clone());
        self.provider_scope = self.provider_scope.or_else(|| base.provider_scope.clone());
        self.blacklist = self.blacklist.or_else(|| base.blacklist.clone());
        self.wilderness = self.wilderness || base.wilderness;
        self.action_check = self.action_check.or_else(|| base.action_check.clone());
        self.require_region = self.require_region.or_else(|| base.require_region.clone());
        self.require_role = self.require_role.or(base.require_role);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_ids_distinguish_signatures() {
        let a = OperationId::new("shop", "open");
        let b = OperationId::new("shop", "open").with_signature("actor,page");
        assert_ne!(a, b);
        assert_eq!(b.to_string(), "shop::open(actor,page)");
    }

    #[test]
    fn overlay_prefers_the_finer_declaration() {
        let coarse = GuardPolicy::new()
            .bypass_permission("shop.bypass")
            .require_region("market");
        let fine = GuardPolicy::new()
            .require_region("market_vip")
            .overlay(&coarse);

        assert_eq!(
            fine.require_region.as_ref().map(|r| r.region_id.as_str()),
            Some("market_vip")
        );
        assert_eq!(fine.bypass_permission.as_deref(), Some("shop.bypass"));
    }

    #[test]
    fn overlay_cannot_unset_wilderness() {
        let coarse = GuardPolicy::new().require_wilderness();
        let fine = GuardPolicy::new().overlay(&coarse);
        assert!(fine.wilderness);
    }
}
