//! Plan resolver service
//!
//! [`PlanResolver`] binds the resolution pipeline to one catalog. Most
//! services build one at startup (from the built-in catalog or from
//! environment overrides) and share it; the crate-level free functions use
//! the built-in catalog directly.

use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::cache::TtlCache;
use crate::catalog::PlanCatalog;
use crate::config::{CatalogConfig, ConfigError};
use crate::entitlements::{
    rank_entitlement_candidates_in, resolve_effective_entitlements_in, ResolvedEntitlements,
};
use crate::error::PlanResult;
use crate::input::PlanResolutionInput;
use crate::personal::resolve_personal_plan;
use crate::plans::CanonicalPlan;
use crate::policies::{policies_for_entitlements, policies_for_plan, ResolvedPlanPolicies};
use crate::snapshot::ResolvedPlanSnapshot;

/// Resolves plans, entitlements and policies against a fixed catalog.
///
/// Cheap to clone; clones share the catalog.
///
/// # Examples
///
/// ```
/// use platform_plans::{CanonicalPlan, PlanResolutionInput, PlanResolver};
///
/// let resolver = PlanResolver::default();
/// let input = PlanResolutionInput::new()
///     .with_role("USER")
///     .with_subscription("ACTIVE", "my-basic_plus-plan");
///
/// let snapshot = resolver.resolve_snapshot(&input).unwrap();
/// assert_eq!(snapshot.personal_plan, CanonicalPlan::BasicPlus);
/// assert_eq!(snapshot.policies.attachment_retention_days, 60);
/// ```
#[derive(Debug, Clone)]
pub struct PlanResolver {
    catalog: Arc<PlanCatalog>,
}

impl Default for PlanResolver {
    /// Resolver over the shared built-in catalog.
    fn default() -> Self {
        Self::new(PlanCatalog::builtin_shared())
    }
}

impl PlanResolver {
    /// Create a resolver over a catalog.
    pub fn new(catalog: Arc<PlanCatalog>) -> Self {
        Self { catalog }
    }

    /// Create a resolver over a catalog built from configuration.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(Arc::new(PlanCatalog::from_config(config)?)))
    }

    /// Create a resolver from `PLAN_*` environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(&CatalogConfig::from_env()?)
    }

    /// The catalog this resolver reads.
    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    /// Resolve the user's personal plan. Does not depend on the catalog.
    pub fn resolve_personal_plan(&self, input: &PlanResolutionInput) -> PlanResult<CanonicalPlan> {
        resolve_personal_plan(input)
    }

    /// Resolve the entitlement that governs the request.
    pub fn resolve_effective_entitlements(
        &self,
        input: &PlanResolutionInput,
    ) -> PlanResult<ResolvedEntitlements> {
        resolve_effective_entitlements_in(&self.catalog, input)
    }

    /// Every candidate entitlement, best first.
    pub fn rank_entitlement_candidates(
        &self,
        input: &PlanResolutionInput,
    ) -> PlanResult<Vec<ResolvedEntitlements>> {
        rank_entitlement_candidates_in(&self.catalog, input)
    }

    /// Policies for a resolved entitlement.
    pub fn resolve_policies_for_entitlements(
        &self,
        entitlements: &ResolvedEntitlements,
    ) -> ResolvedPlanPolicies {
        policies_for_entitlements(&self.catalog, entitlements)
    }

    /// Policies for a known plan.
    pub fn resolve_policies_for_plan(&self, plan: CanonicalPlan) -> ResolvedPlanPolicies {
        policies_for_plan(&self.catalog, plan)
    }

    /// Resolve the full snapshot for a request.
    ///
    /// # Errors
    ///
    /// Propagates `PlanResolutionError` from personal plan resolution.
    #[instrument(skip(self, input), fields(user_id = ?input.user_id))]
    pub fn resolve_snapshot(&self, input: &PlanResolutionInput) -> PlanResult<ResolvedPlanSnapshot> {
        let personal_plan = self.resolve_personal_plan(input)?;
        let effective = self.resolve_effective_entitlements(input)?;
        let policies = self.resolve_policies_for_entitlements(&effective);

        debug!(
            personal_plan = %personal_plan,
            effective_plan = %effective.plan,
            model_tier = %effective.model_tier,
            source_id = %effective.source_id,
            "Resolved plan snapshot"
        );

        Ok(ResolvedPlanSnapshot {
            personal_plan,
            effective,
            policies,
        })
    }

    /// Resolve a snapshot, reusing a cached one for the same user.
    ///
    /// Entries are keyed by `user_id` and remember the input they were
    /// resolved from. A hit whose stored input differs from `input` counts as
    /// a miss and is replaced. Inputs without a user id, or with a per-request
    /// model-tier override, always resolve fresh and are not stored. Failed
    /// resolutions are never cached. Callers still invalidate the user's
    /// entry when catalog-affecting data changes outside the input.
    pub async fn resolve_snapshot_cached<C>(
        &self,
        cache: &C,
        input: &PlanResolutionInput,
        ttl: Duration,
    ) -> PlanResult<ResolvedPlanSnapshot>
    where
        C: TtlCache<CachedSnapshot> + ?Sized,
    {
        let user_id = match input.user_id.as_deref() {
            Some(user_id) if input.model_tier.is_none() => user_id,
            _ => return self.resolve_snapshot(input),
        };

        match cache.get(user_id).await {
            Some(cached) if cached.input == *input => {
                debug!(user_id, "Plan snapshot cache hit");
                return Ok(cached.snapshot);
            }
            Some(_) => debug!(user_id, "Plan snapshot cache entry is for a different input"),
            None => {}
        }

        let snapshot = self.resolve_snapshot(input)?;
        let entry = CachedSnapshot {
            input: input.clone(),
            snapshot: snapshot.clone(),
        };
        cache.set(user_id, entry, ttl).await;
        Ok(snapshot)
    }
}

/// A cached snapshot together with the input it was resolved from.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSnapshot {
    /// Input the snapshot was resolved from
    pub input: PlanResolutionInput,

    /// Resolved snapshot
    pub snapshot: ResolvedPlanSnapshot,
}
