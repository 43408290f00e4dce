//! Operational policy derivation
//!
//! Maps a resolved entitlement back through the catalog. Two lookups are
//! keyed differently on purpose:
//!
//! - model routing follows the entitlement's **model tier** (so `Enterprise`
//!   routes like `Pro`)
//! - attachment retention and voice follow the entitlement's **plan**
//!
//! An organization may grant a plan and a tier that do not line up, so the
//! two must not be collapsed into one lookup.

use serde::{Deserialize, Serialize};

use crate::catalog::{ModelRouting, PlanCatalog, VoicePolicy};
use crate::entitlements::ResolvedEntitlements;
use crate::plans::CanonicalPlan;

/// Policy downstream systems apply for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPlanPolicies {
    /// Models the orchestrator should use
    pub model_routing: ModelRouting,

    /// Days before uploaded attachments are swept
    pub attachment_retention_days: u32,

    /// Voice-generation policy
    pub voice: VoicePolicy,
}

pub(crate) fn policies_for_entitlements(
    catalog: &PlanCatalog,
    entitlements: &ResolvedEntitlements,
) -> ResolvedPlanPolicies {
    let routing = catalog.entry_for_tier(entitlements.model_tier);
    let plan = catalog.entry(entitlements.plan);

    ResolvedPlanPolicies {
        model_routing: routing.model_routing.clone(),
        attachment_retention_days: plan.attachment_retention_days,
        voice: plan.voice,
    }
}

pub(crate) fn policies_for_plan(catalog: &PlanCatalog, plan: CanonicalPlan) -> ResolvedPlanPolicies {
    let entry = catalog.entry(plan);

    ResolvedPlanPolicies {
        model_routing: entry.model_routing.clone(),
        attachment_retention_days: entry.attachment_retention_days,
        voice: entry.voice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlements::EntitlementSourceType;
    use crate::limits::EntitlementLimits;
    use crate::plans::ModelTier;

    fn entitlement(plan: CanonicalPlan, model_tier: ModelTier) -> ResolvedEntitlements {
        ResolvedEntitlements {
            source_type: EntitlementSourceType::Organization,
            source_id: "org-test".to_string(),
            source_label: "Test".to_string(),
            plan,
            model_tier,
            limits: EntitlementLimits::new(1.0, 1.0, 1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn test_plan_policies() {
        let catalog = PlanCatalog::builtin();
        let policies = policies_for_plan(catalog, CanonicalPlan::BasicPlus);
        assert_eq!(policies.model_routing.orchestrator, "google/gemini-2.0-flash-001");
        assert_eq!(policies.attachment_retention_days, 60);
        assert_eq!(policies.voice.max_per_window, 20);
    }

    #[test]
    fn test_routing_follows_tier_and_voice_follows_plan() {
        let catalog = PlanCatalog::builtin();
        let policies = policies_for_entitlements(catalog, &entitlement(CanonicalPlan::Basic, ModelTier::Pro));

        assert_eq!(policies.model_routing, catalog.entry(CanonicalPlan::Pro).model_routing);
        assert_eq!(policies.attachment_retention_days, 30);
        assert_eq!(policies.voice, catalog.entry(CanonicalPlan::Basic).voice);
    }

    #[test]
    fn test_enterprise_routes_as_pro() {
        let catalog = PlanCatalog::builtin();
        let policies =
            policies_for_entitlements(catalog, &entitlement(CanonicalPlan::Pro, ModelTier::Enterprise));
        assert_eq!(policies.model_routing.orchestrator, "google/gemini-2.0-flash-lite-001");
        assert_eq!(policies.voice.max_per_window, 50);
    }

    #[test]
    fn test_guest_routes_through_trial_tier() {
        let catalog = PlanCatalog::builtin();
        let guest = catalog.entry(CanonicalPlan::Guest);
        let policies = policies_for_entitlements(catalog, &entitlement(CanonicalPlan::Guest, guest.model_tier));

        assert_eq!(policies.model_routing, catalog.entry(CanonicalPlan::Trial).model_routing);
        assert_eq!(policies.attachment_retention_days, 1);
        assert!(!policies.voice.enabled);
    }
}
