//! # Platform Plans
//!
//! This crate decides, for every AI request on the Relay platform, which plan
//! governs the user and which operational policy applies. It reconciles the
//! user's personal subscription with any organization-granted entitlements.
//!
//! ## Overview
//!
//! The platform-plans crate handles:
//! - **Catalog**: Static per-plan limits, model routing, retention and voice policy
//! - **Personal plans**: Plan derived from role, guest flag and subscription
//! - **Entitlements**: Selection of the governing entitlement across sources
//! - **Policies**: Routing, retention and voice policy for an entitlement
//! - **Snapshots**: The combined result handed to downstream services
//!
//! ## Architecture
//!
//! ```text
//! PlanResolutionInput
//!   ├─ resolve_personal_plan ───────────→ CanonicalPlan
//!   ├─ resolve_effective_entitlements ──→ ResolvedEntitlements
//!   │     (personal │ model-tier override │ best organization source)
//!   └─ resolve_policies_for_entitlements → ResolvedPlanPolicies
//!                     │
//!                     ▼
//!            ResolvedPlanSnapshot
//! ```
//!
//! Resolution is pure and synchronous. The built-in catalog is built once per
//! process and is read-only, so resolution can run from any number of threads
//! without locking.
//!
//! ## Usage
//!
//! ```rust
//! use platform_plans::{
//!     resolve_plan_snapshot, EntitlementLimits, ModelTier, OrganizationEntitlementSource,
//!     PlanResolutionInput,
//! };
//!
//! let input = PlanResolutionInput::new()
//!     .with_user_id("user-42")
//!     .with_role("USER")
//!     .with_subscription("ACTIVE", "my-basic-plan")
//!     .with_organization_source(
//!         OrganizationEntitlementSource::new("org-enterprise", "Acme Corp")
//!             .with_model_tier(ModelTier::Enterprise)
//!             .with_limits(EntitlementLimits::new(7.0, 7000.0, 3500.0, 0.7, 7.0)),
//!     );
//!
//! let snapshot = resolve_plan_snapshot(&input).unwrap();
//! assert_eq!(snapshot.effective.model_tier, ModelTier::Enterprise);
//! assert_eq!(snapshot.policies.voice.max_per_window, 50);
//! ```
//!
//! ## Failure
//!
//! The only failure is an `ACTIVE` subscription whose plan id cannot be
//! parsed. The engine never falls back to a default plan for a paying
//! account; see [`PlanResolutionError`].

pub mod cache;
pub mod catalog;
pub mod config;
pub mod entitlements;
pub mod error;
pub mod input;
pub mod limits;
pub mod personal;
pub mod plans;
pub mod policies;
pub mod resolver;
pub mod snapshot;

// Re-export main types for convenience
pub use cache::{MemoryTtlCache, TtlCache};
pub use catalog::{ModelRouting, PlanCatalog, PlanCatalogEntry, VoicePolicy};
pub use config::{CatalogConfig, ConfigError, PlanOverrides};
pub use entitlements::{
    compare_entitlement_vectors, EntitlementSourceType, ResolvedEntitlements,
    MODEL_TIER_OVERRIDE_SOURCE_ID, PERSONAL_ADMIN_SOURCE_ID, PERSONAL_SUBSCRIPTION_SOURCE_ID,
};
pub use error::{PlanResolutionError, PlanResolutionErrorReason, PlanResult};
pub use input::{OrganizationEntitlementSource, PlanResolutionInput, ACTIVE_SUBSCRIPTION_STATUS};
pub use limits::EntitlementLimits;
pub use personal::{parse_canonical_plan_from_plan_id, resolve_personal_plan};
pub use plans::{CanonicalPlan, ModelTier, UserRole};
pub use policies::ResolvedPlanPolicies;
pub use resolver::{CachedSnapshot, PlanResolver};
pub use snapshot::ResolvedPlanSnapshot;

/// Resolve the entitlement that governs a request, using the built-in catalog.
///
/// # Errors
///
/// Propagates `PlanResolutionError` from personal plan resolution.
pub fn resolve_effective_entitlements(input: &PlanResolutionInput) -> PlanResult<ResolvedEntitlements> {
    entitlements::resolve_effective_entitlements_in(PlanCatalog::builtin(), input)
}

/// Every candidate entitlement for a request, best first, using the built-in
/// catalog. The first element is what [`resolve_effective_entitlements`]
/// returns.
pub fn rank_entitlement_candidates(input: &PlanResolutionInput) -> PlanResult<Vec<ResolvedEntitlements>> {
    entitlements::rank_entitlement_candidates_in(PlanCatalog::builtin(), input)
}

/// Policies for a resolved entitlement, using the built-in catalog.
pub fn resolve_policies_for_entitlements(entitlements: &ResolvedEntitlements) -> ResolvedPlanPolicies {
    policies::policies_for_entitlements(PlanCatalog::builtin(), entitlements)
}

/// Policies for a known plan, using the built-in catalog.
pub fn resolve_policies_for_plan(plan: CanonicalPlan) -> ResolvedPlanPolicies {
    policies::policies_for_plan(PlanCatalog::builtin(), plan)
}

/// Resolve the full plan snapshot for a request, using the built-in catalog.
///
/// This is the entry point most callers should use.
///
/// # Errors
///
/// Propagates `PlanResolutionError` from personal plan resolution.
pub fn resolve_plan_snapshot(input: &PlanResolutionInput) -> PlanResult<ResolvedPlanSnapshot> {
    PlanResolver::default().resolve_snapshot(input)
}
