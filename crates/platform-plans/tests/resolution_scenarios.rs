//! End-to-end resolution scenarios.
//!
//! These tests drive the public entry points the way request handlers do:
//! build a `PlanResolutionInput`, resolve a snapshot, and check what the
//! rate limiter, orchestrator, retention sweep and voice gate would receive.

use platform_plans::{
    rank_entitlement_candidates, resolve_effective_entitlements, resolve_personal_plan,
    resolve_plan_snapshot, CanonicalPlan, EntitlementLimits, EntitlementSourceType, ModelTier,
    OrganizationEntitlementSource, PlanCatalog, PlanResolutionErrorReason, PlanResolutionInput,
    PlanResolver, ResolvedPlanSnapshot, MODEL_TIER_OVERRIDE_SOURCE_ID,
};
use std::sync::Arc;

fn active_user(plan_id: &str) -> PlanResolutionInput {
    PlanResolutionInput::new()
        .with_user_id("user-1")
        .with_role("USER")
        .with_subscription("ACTIVE", plan_id)
}

fn enterprise_source() -> OrganizationEntitlementSource {
    OrganizationEntitlementSource::new("org-enterprise", "Enterprise Org")
        .with_model_tier(ModelTier::Enterprise)
        .with_limits(EntitlementLimits::new(7.0, 7000.0, 3500.0, 0.7, 7.0))
}

fn pro_source(id: &str) -> OrganizationEntitlementSource {
    OrganizationEntitlementSource::new(id, id)
        .with_plan(CanonicalPlan::Pro)
        .with_model_tier(ModelTier::Pro)
        .with_limits(PlanCatalog::builtin().limits(CanonicalPlan::Pro))
}

#[test]
fn test_basic_plus_subscription_snapshot() {
    let snapshot = resolve_plan_snapshot(&active_user("my-basic_plus-plan")).unwrap();

    assert_eq!(snapshot.personal_plan, CanonicalPlan::BasicPlus);
    assert_eq!(snapshot.effective.plan, CanonicalPlan::BasicPlus);
    assert_eq!(snapshot.effective.source_type, EntitlementSourceType::Personal);
    assert_eq!(snapshot.effective.source_id, "personal-subscription");
    assert_eq!(
        snapshot.policies.model_routing.orchestrator,
        "google/gemini-2.0-flash-001"
    );
    assert_eq!(snapshot.policies.attachment_retention_days, 60);
    assert_eq!(snapshot.policies.voice.max_per_window, 20);
}

#[test]
fn test_enterprise_organization_beats_basic_subscription() {
    let input = active_user("my-basic-plan").with_organization_source(enterprise_source());
    let snapshot = resolve_plan_snapshot(&input).unwrap();

    assert_eq!(snapshot.personal_plan, CanonicalPlan::Basic);
    assert_eq!(snapshot.effective.model_tier, ModelTier::Enterprise);
    assert_eq!(snapshot.effective.source_id, "org-enterprise");
    assert_eq!(snapshot.effective.source_label, "Enterprise Org");
    assert_eq!(
        snapshot.effective.limits,
        EntitlementLimits::new(7.0, 7000.0, 3500.0, 0.7, 7.0)
    );
    assert_eq!(
        snapshot.policies.model_routing.orchestrator,
        "google/gemini-2.0-flash-lite-001"
    );
    assert_eq!(snapshot.policies.voice.max_per_window, 50);
}

#[test]
fn test_lexicographic_tie_break() {
    let input = active_user("my-basic-plan")
        .with_organization_source(pro_source("org-z"))
        .with_organization_source(pro_source("org-a"));

    let effective = resolve_effective_entitlements(&input).unwrap();
    assert_eq!(effective.source_id, "org-a");
}

#[test]
fn test_model_tier_override_ignores_personal_plan() {
    let input = PlanResolutionInput::new()
        .with_subscription("ACTIVE", "my-pro-plan")
        .with_model_tier(ModelTier::Basic);
    let snapshot = resolve_plan_snapshot(&input).unwrap();

    assert_eq!(snapshot.personal_plan, CanonicalPlan::Pro);
    assert_eq!(snapshot.effective.source_id, MODEL_TIER_OVERRIDE_SOURCE_ID);
    assert_eq!(snapshot.effective.source_type, EntitlementSourceType::Organization);
    assert_eq!(snapshot.effective.model_tier, ModelTier::Basic);
    assert_eq!(snapshot.effective.plan, CanonicalPlan::Basic);
}

#[test]
fn test_guest_ignores_organization_sources() {
    let input = PlanResolutionInput::new()
        .as_guest()
        .with_organization_source(enterprise_source())
        .with_organization_source(pro_source("org-a"));

    let effective = resolve_effective_entitlements(&input).unwrap();
    assert_eq!(effective.plan, CanonicalPlan::Guest);
    assert_eq!(effective.source_type, EntitlementSourceType::Personal);
    assert_eq!(effective.limits, PlanCatalog::builtin().limits(CanonicalPlan::Guest));
}

#[test]
fn test_admin_role_wins_over_everything() {
    let input = active_user("invalid-plan")
        .with_role("SUPER_ADMIN")
        .as_guest()
        .with_model_tier(ModelTier::Trial)
        .with_organization_source(enterprise_source());

    let snapshot = resolve_plan_snapshot(&input).unwrap();
    assert_eq!(snapshot.personal_plan, CanonicalPlan::Admin);
    assert_eq!(snapshot.effective.source_id, "personal-admin");
    assert!(snapshot.effective.limits.is_unlimited());
}

#[test]
fn test_invalid_active_plan_fails_snapshot() {
    let input = active_user("invalid-plan").with_organization_source(enterprise_source());

    let err = resolve_personal_plan(&input).unwrap_err();
    assert_eq!(err.reason(), PlanResolutionErrorReason::ActiveWithInvalidPlanId);

    let err = resolve_plan_snapshot(&input).unwrap_err();
    assert_eq!(err.reason(), PlanResolutionErrorReason::ActiveWithInvalidPlanId);
    assert_eq!(err.error_code(), "ACTIVE_WITH_INVALID_PLAN_ID");
}

#[test]
fn test_inactive_subscription_resolves_to_trial() {
    for plan_id in ["my-pro-plan", "invalid-plan"] {
        let input = PlanResolutionInput::new()
            .with_role("USER")
            .with_subscription("CANCELED", plan_id);
        assert_eq!(resolve_personal_plan(&input).unwrap(), CanonicalPlan::Trial);
    }
}

#[test]
fn test_snapshot_is_idempotent() {
    let input = active_user("my-basic-plan")
        .with_organization_source(enterprise_source())
        .with_organization_source(pro_source("org-a"));

    let first = resolve_plan_snapshot(&input).unwrap();
    let second = resolve_plan_snapshot(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_source_order_does_not_change_winner() {
    let sources = vec![
        pro_source("org-m"),
        pro_source("org-c"),
        pro_source("org-x"),
        OrganizationEntitlementSource::new("org-basic", "Basic").with_plan(CanonicalPlan::Basic),
    ];

    let mut winners = Vec::new();
    for rotation in 0..sources.len() {
        let mut rotated = sources.clone();
        rotated.rotate_left(rotation);
        let mut reversed = rotated.clone();
        reversed.reverse();

        for order in [rotated, reversed] {
            let mut input = active_user("my-basic-plan");
            input.organization_sources = Some(order);
            winners.push(resolve_effective_entitlements(&input).unwrap().source_id);
        }
    }

    assert!(winners.iter().all(|id| id == "org-c"));
}

#[test]
fn test_ranking_head_matches_effective() {
    let input = active_user("my-basic_plus-plan")
        .with_organization_source(pro_source("org-b"))
        .with_organization_source(enterprise_source())
        .with_organization_source(
            OrganizationEntitlementSource::new("org-trial", "Trial").with_plan(CanonicalPlan::Trial),
        );

    let ranked = rank_entitlement_candidates(&input).unwrap();
    assert_eq!(ranked.len(), 4);
    assert_eq!(ranked[0], resolve_effective_entitlements(&input).unwrap());

    let ids: Vec<_> = ranked.iter().map(|c| c.source_id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["org-enterprise", "org-b", "personal-subscription", "org-trial"]
    );
}

#[test]
fn test_snapshot_json_round_trip_keeps_unlimited() {
    let snapshot = resolve_plan_snapshot(&PlanResolutionInput::new().with_role("ADMIN")).unwrap();
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: ResolvedPlanSnapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(back, snapshot);
    assert!(back.effective.limits.is_unlimited());
}

#[test]
fn test_input_from_json_resolves() {
    let input: PlanResolutionInput = serde_json::from_value(serde_json::json!({
        "userId": "user-7",
        "subscriptionStatus": "ACTIVE",
        "userRole": "USER",
        "planId": "my-basic-plan",
        "organizationSources": [{
            "sourceId": "org-enterprise",
            "sourceLabel": "Enterprise Org",
            "modelTier": "ENTERPRISE",
            "limits": {
                "maxRequestsPerDay": 7,
                "maxInputTokensPerDay": 7000,
                "maxOutputTokensPerDay": 3500,
                "maxCostPerDay": 0.7,
                "maxContextMessages": 7
            }
        }]
    }))
    .unwrap();

    let snapshot = resolve_plan_snapshot(&input).unwrap();
    assert_eq!(snapshot.effective.model_tier, ModelTier::Enterprise);
    assert_eq!(snapshot.effective.limits.max_cost_per_day, 0.7);
}

#[tokio::test]
async fn test_concurrent_resolution_is_consistent() {
    let resolver = Arc::new(PlanResolver::default());
    let input = Arc::new(
        active_user("my-basic-plan")
            .with_organization_source(enterprise_source())
            .with_organization_source(pro_source("org-a")),
    );
    let expected = resolver.resolve_snapshot(&input).unwrap();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            let input = Arc::clone(&input);
            tokio::spawn(async move { resolver.resolve_snapshot(&input).unwrap() })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), expected);
    }
}
