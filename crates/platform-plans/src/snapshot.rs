//! Resolved plan snapshot
//!
//! The unit handed to callers: the user's personal plan, the entitlement that
//! actually governs the request, and the policies derived from it. A snapshot
//! is created per resolution and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::entitlements::{EntitlementSourceType, ResolvedEntitlements};
use crate::plans::CanonicalPlan;
use crate::policies::ResolvedPlanPolicies;

/// Result of a full plan resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPlanSnapshot {
    /// The user's own plan, before organization grants
    pub personal_plan: CanonicalPlan,

    /// The entitlement that governs the request
    pub effective: ResolvedEntitlements,

    /// Policies derived from the effective entitlement
    pub policies: ResolvedPlanPolicies,
}

impl ResolvedPlanSnapshot {
    /// Check if an organization grant or override replaced the personal plan.
    pub fn is_organization_governed(&self) -> bool {
        self.effective.source_type == EntitlementSourceType::Organization
    }

    /// Serialize for handing to downstream services.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
