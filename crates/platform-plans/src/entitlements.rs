//! Effective entitlement resolution
//!
//! Chooses the single entitlement vector that governs a request from the
//! user's personal plan, an optional direct model-tier override and any
//! organization grants.
//!
//! ## Selection
//!
//! ```text
//! guest or admin            → personal entitlement
//! model-tier override       → catalog entitlement for the override tier
//! no organization sources   → personal entitlement
//! otherwise                 → best of {personal} ∪ organization sources
//! ```
//!
//! Candidates are ordered by tier priority first, then by daily limits in a
//! fixed field order, then by the byte-wise smaller `source_id`. The result
//! does not depend on the order in which sources are supplied.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::catalog::PlanCatalog;
use crate::error::PlanResult;
use crate::input::{OrganizationEntitlementSource, PlanResolutionInput};
use crate::limits::EntitlementLimits;
use crate::personal::resolve_personal_plan;
use crate::plans::{CanonicalPlan, ModelTier};

/// Source id of the personal entitlement for platform admins.
pub const PERSONAL_ADMIN_SOURCE_ID: &str = "personal-admin";

/// Source id of the personal entitlement for everyone else.
pub const PERSONAL_SUBSCRIPTION_SOURCE_ID: &str = "personal-subscription";

/// Source id of the synthetic entitlement built from a model-tier override.
pub const MODEL_TIER_OVERRIDE_SOURCE_ID: &str = "model-tier-override";

/// Where a resolved entitlement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitlementSourceType {
    /// The user's own subscription (or staff role)
    Personal,

    /// An organization grant or a model-tier override
    Organization,
}

/// The entitlement vector that governs a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntitlements {
    /// Origin of the entitlement
    pub source_type: EntitlementSourceType,

    /// Stable source identifier
    pub source_id: String,

    /// Human-readable source label
    pub source_label: String,

    /// Plan used for retention and voice policy
    pub plan: CanonicalPlan,

    /// Tier used for priority and model routing
    pub model_tier: ModelTier,

    /// Daily limits, either verbatim from the source or from the catalog
    pub limits: EntitlementLimits,
}

impl ResolvedEntitlements {
    /// Personal entitlement for a resolved plan.
    pub(crate) fn personal(catalog: &PlanCatalog, plan: CanonicalPlan) -> Self {
        let entry = catalog.entry(plan);
        let (source_id, source_label) = if plan == CanonicalPlan::Admin {
            (PERSONAL_ADMIN_SOURCE_ID, "Platform admin")
        } else {
            (PERSONAL_SUBSCRIPTION_SOURCE_ID, "Personal subscription")
        };

        Self {
            source_type: EntitlementSourceType::Personal,
            source_id: source_id.to_string(),
            source_label: source_label.to_string(),
            plan,
            model_tier: entry.model_tier,
            limits: entry.limits,
        }
    }

    /// Synthetic entitlement for a direct model-tier override.
    ///
    /// Limits always come from the catalog of the tier's mapped plan, so an
    /// `Enterprise` override carries `Pro` limits.
    pub(crate) fn model_tier_override(catalog: &PlanCatalog, tier: ModelTier) -> Self {
        let plan = tier.canonical_plan();

        Self {
            source_type: EntitlementSourceType::Organization,
            source_id: MODEL_TIER_OVERRIDE_SOURCE_ID.to_string(),
            source_label: format!("{} model tier override", tier.display_name()),
            plan,
            model_tier: tier,
            limits: catalog.limits(plan),
        }
    }

    /// Normalize an organization grant into a comparable entitlement.
    ///
    /// Missing fields are filled from each other and the catalog:
    /// the tier falls back to the plan's catalog tier, the plan falls back to
    /// the tier's mapped plan, and limits fall back to the plan's catalog
    /// limits. Returns `None` if the grant names neither plan nor tier.
    pub(crate) fn from_organization_source(
        catalog: &PlanCatalog,
        source: &OrganizationEntitlementSource,
    ) -> Option<Self> {
        let (plan, model_tier) = match (source.plan, source.model_tier) {
            (Some(plan), Some(tier)) => (plan, tier),
            (Some(plan), None) => (plan, catalog.entry(plan).model_tier),
            (None, Some(tier)) => (tier.canonical_plan(), tier),
            (None, None) => return None,
        };

        Some(Self {
            source_type: EntitlementSourceType::Organization,
            source_id: source.source_id.clone(),
            source_label: source.source_label.clone(),
            plan,
            model_tier,
            limits: source.limits.unwrap_or_else(|| catalog.limits(plan)),
        })
    }
}

/// Compare two entitlement candidates.
///
/// `Ordering::Greater` means `a` is preferred over `b`. Tier priority
/// decides outright; equal tiers fall through to requests, input tokens,
/// output tokens, cost and context messages, each higher-is-better; a full
/// tie prefers the byte-wise smaller `source_id`.
///
/// # Examples
///
/// ```
/// use platform_plans::{compare_entitlement_vectors, resolve_effective_entitlements};
/// use platform_plans::PlanResolutionInput;
/// use std::cmp::Ordering;
///
/// let pro = resolve_effective_entitlements(
///     &PlanResolutionInput::new().with_subscription("ACTIVE", "pro"),
/// ).unwrap();
/// let trial = resolve_effective_entitlements(&PlanResolutionInput::new()).unwrap();
/// assert_eq!(compare_entitlement_vectors(&pro, &trial), Ordering::Greater);
/// ```
pub fn compare_entitlement_vectors(a: &ResolvedEntitlements, b: &ResolvedEntitlements) -> Ordering {
    a.model_tier
        .priority()
        .cmp(&b.model_tier.priority())
        .then_with(|| {
            a.limits
                .comparison_vector()
                .into_iter()
                .zip(b.limits.comparison_vector())
                .map(|(x, y)| x.total_cmp(&y))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| b.source_id.as_bytes().cmp(a.source_id.as_bytes()))
}

/// Personal entitlement plus every rankable organization source.
fn candidates(
    catalog: &PlanCatalog,
    personal: ResolvedEntitlements,
    sources: &[OrganizationEntitlementSource],
) -> Vec<ResolvedEntitlements> {
    let mut candidates = Vec::with_capacity(sources.len() + 1);
    candidates.push(personal);

    for source in sources {
        match ResolvedEntitlements::from_organization_source(catalog, source) {
            Some(candidate) => candidates.push(candidate),
            None => warn!(
                source_id = %source.source_id,
                "Organization source has neither plan nor model tier; ignoring"
            ),
        }
    }
    candidates
}

pub(crate) fn resolve_effective_entitlements_in(
    catalog: &PlanCatalog,
    input: &PlanResolutionInput,
) -> PlanResult<ResolvedEntitlements> {
    let personal_plan = resolve_personal_plan(input)?;
    let personal = ResolvedEntitlements::personal(catalog, personal_plan);

    if input.is_guest() || personal.plan == CanonicalPlan::Admin {
        debug!(plan = %personal.plan, "Guest or admin; organization sources ignored");
        return Ok(personal);
    }

    if let Some(tier) = input.model_tier {
        debug!(tier = %tier, "Applying model tier override");
        return Ok(ResolvedEntitlements::model_tier_override(catalog, tier));
    }

    let sources = input.organization_sources();
    if sources.is_empty() {
        return Ok(personal);
    }

    let winner = candidates(catalog, personal.clone(), sources)
        .into_iter()
        .max_by(compare_entitlement_vectors)
        .unwrap_or(personal);

    debug!(
        source_id = %winner.source_id,
        tier = %winner.model_tier,
        considered = sources.len() + 1,
        "Selected effective entitlement"
    );
    Ok(winner)
}

pub(crate) fn rank_entitlement_candidates_in(
    catalog: &PlanCatalog,
    input: &PlanResolutionInput,
) -> PlanResult<Vec<ResolvedEntitlements>> {
    let personal_plan = resolve_personal_plan(input)?;
    let personal = ResolvedEntitlements::personal(catalog, personal_plan);

    if input.is_guest() || personal.plan == CanonicalPlan::Admin {
        return Ok(vec![personal]);
    }
    if let Some(tier) = input.model_tier {
        return Ok(vec![ResolvedEntitlements::model_tier_override(catalog, tier)]);
    }

    let mut ranked = candidates(catalog, personal, input.organization_sources());
    ranked.sort_by(|a, b| compare_entitlement_vectors(b, a));
    Ok(ranked)
}
