//! Personal plan resolution
//!
//! Derives the user's own plan from role, guest flag and subscription state,
//! ignoring any organization grant. The first matching rule wins:
//!
//! 1. `ADMIN` / `SUPER_ADMIN` role → `Admin`
//! 2. guest session → `Guest`
//! 3. `ACTIVE` subscription → plan parsed from the plan id, or an error
//! 4. anything else → `Trial`

use tracing::{debug, warn};

use crate::error::{PlanResolutionError, PlanResult};
use crate::input::PlanResolutionInput;
use crate::plans::CanonicalPlan;

/// Plan tokens in match order. `pro` must be tested first so an identifier
/// carrying several tokens resolves to the highest plan, and `basic_plus`
/// must precede its own prefix `basic`.
const PLAN_ID_TOKENS: [(&str, CanonicalPlan); 3] = [
    ("pro", CanonicalPlan::Pro),
    ("basic_plus", CanonicalPlan::BasicPlus),
    ("basic", CanonicalPlan::Basic),
];

/// Extract a canonical plan from a raw billing plan identifier.
///
/// Matching is a case-insensitive substring search over the ordered tokens
/// `pro`, `basic_plus`, `basic`. Never fails.
///
/// # Examples
///
/// ```
/// use platform_plans::{parse_canonical_plan_from_plan_id, CanonicalPlan};
///
/// assert_eq!(parse_canonical_plan_from_plan_id("my-pro-plan"), Some(CanonicalPlan::Pro));
/// assert_eq!(parse_canonical_plan_from_plan_id("my-basic_plus-plan"), Some(CanonicalPlan::BasicPlus));
/// assert_eq!(parse_canonical_plan_from_plan_id("unknown"), None);
/// ```
pub fn parse_canonical_plan_from_plan_id(plan_id: &str) -> Option<CanonicalPlan> {
    let normalized = plan_id.to_lowercase();
    PLAN_ID_TOKENS
        .iter()
        .find(|(token, _)| normalized.contains(token))
        .map(|(_, plan)| *plan)
}

/// Resolve the user's personal plan.
///
/// # Errors
///
/// Returns `PlanResolutionError::ActiveWithInvalidPlanId` when the
/// subscription is `ACTIVE` but the plan id is missing or unrecognized.
pub fn resolve_personal_plan(input: &PlanResolutionInput) -> PlanResult<CanonicalPlan> {
    if input.role().is_some_and(|role| role.is_platform_admin()) {
        debug!(role = ?input.user_role, "Platform role resolves to admin plan");
        return Ok(CanonicalPlan::Admin);
    }

    if input.is_guest() {
        return Ok(CanonicalPlan::Guest);
    }

    if input.has_active_subscription() {
        let parsed = input
            .plan_id
            .as_deref()
            .and_then(parse_canonical_plan_from_plan_id);

        return match parsed {
            Some(plan) => Ok(plan),
            None => {
                warn!(
                    user_id = ?input.user_id,
                    plan_id = ?input.plan_id,
                    "Active subscription with unrecognized plan id"
                );
                Err(PlanResolutionError::ActiveWithInvalidPlanId {
                    plan_id: input.plan_id.clone(),
                })
            }
        };
    }

    Ok(CanonicalPlan::Trial)
}
