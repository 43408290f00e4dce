//! Resolution input
//!
//! Everything the engine needs arrives here, already normalized by upstream
//! collaborators: billing sync supplies `subscription_status` and `plan_id`,
//! the identity layer supplies `user_role` and `is_guest`, and the
//! organization contract lookup supplies `organization_sources`.

use serde::{Deserialize, Serialize};

use crate::limits::EntitlementLimits;
use crate::plans::{CanonicalPlan, ModelTier, UserRole};

/// Subscription status string that marks a paying subscription.
pub const ACTIVE_SUBSCRIPTION_STATUS: &str = "ACTIVE";

/// One organization's contractual grant to the user.
///
/// Every field except the identifiers is optional. A grant that sets
/// neither `plan` nor `model_tier` cannot be ranked and is ignored.
///
/// # Examples
///
/// ```
/// use platform_plans::{EntitlementLimits, ModelTier, OrganizationEntitlementSource};
///
/// let source = OrganizationEntitlementSource::new("org-acme", "Acme Corp")
///     .with_model_tier(ModelTier::Enterprise)
///     .with_limits(EntitlementLimits::new(500.0, 1e6, 2.5e5, 10.0, 80.0));
/// assert!(source.plan.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationEntitlementSource {
    /// Stable identifier, also used as the final tie-break
    pub source_id: String,

    /// Human-readable label (usually the organization name)
    pub source_label: String,

    /// Plan granted by the organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<CanonicalPlan>,

    /// Model tier granted by the organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_tier: Option<ModelTier>,

    /// Contractual limits, used verbatim when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<EntitlementLimits>,
}

impl OrganizationEntitlementSource {
    /// Create a source with no grant fields set.
    pub fn new(source_id: impl Into<String>, source_label: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            source_label: source_label.into(),
            plan: None,
            model_tier: None,
            limits: None,
        }
    }

    /// Set the granted plan.
    pub fn with_plan(mut self, plan: CanonicalPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    /// Set the granted model tier.
    pub fn with_model_tier(mut self, tier: ModelTier) -> Self {
        self.model_tier = Some(tier);
        self
    }

    /// Set the contractual limits.
    pub fn with_limits(mut self, limits: EntitlementLimits) -> Self {
        self.limits = Some(limits);
        self
    }
}

/// Input to a plan resolution.
///
/// All fields are optional; an empty input resolves to the trial plan.
///
/// # Examples
///
/// ```
/// use platform_plans::PlanResolutionInput;
///
/// let input = PlanResolutionInput::new()
///     .with_user_id("user-1")
///     .with_role("USER")
///     .with_subscription("ACTIVE", "my-pro-plan");
/// assert!(input.has_active_subscription());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanResolutionInput {
    /// User the request is made for
    pub user_id: Option<String>,

    /// Subscription status from billing sync (`ACTIVE` or anything else)
    pub subscription_status: Option<String>,

    /// Platform role (`ADMIN`, `SUPER_ADMIN` or other)
    pub user_role: Option<String>,

    /// Opaque billing plan identifier
    pub plan_id: Option<String>,

    /// Whether the request comes from a guest session
    pub is_guest: Option<bool>,

    /// Direct model-tier override
    pub model_tier: Option<ModelTier>,

    /// Organization grants, in the order the membership lookup returned them
    pub organization_sources: Option<Vec<OrganizationEntitlementSource>>,
}

impl PlanResolutionInput {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user id.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the platform role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.user_role = Some(role.into());
        self
    }

    /// Set subscription status and plan id together.
    pub fn with_subscription(mut self, status: impl Into<String>, plan_id: impl Into<String>) -> Self {
        self.subscription_status = Some(status.into());
        self.plan_id = Some(plan_id.into());
        self
    }

    /// Set the subscription status only.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.subscription_status = Some(status.into());
        self
    }

    /// Mark the request as coming from a guest.
    pub fn as_guest(mut self) -> Self {
        self.is_guest = Some(true);
        self
    }

    /// Set a direct model-tier override.
    pub fn with_model_tier(mut self, tier: ModelTier) -> Self {
        self.model_tier = Some(tier);
        self
    }

    /// Append an organization source.
    pub fn with_organization_source(mut self, source: OrganizationEntitlementSource) -> Self {
        self.organization_sources
            .get_or_insert_with(Vec::new)
            .push(source);
        self
    }

    /// Check if the request comes from a guest session.
    pub fn is_guest(&self) -> bool {
        self.is_guest.unwrap_or(false)
    }

    /// Parsed platform role, if any.
    pub fn role(&self) -> Option<UserRole> {
        self.user_role.as_deref().map(UserRole::parse)
    }

    /// Check if billing reports an active subscription.
    pub fn has_active_subscription(&self) -> bool {
        self.subscription_status.as_deref() == Some(ACTIVE_SUBSCRIPTION_STATUS)
    }

    /// Organization sources, empty if none were supplied.
    pub fn organization_sources(&self) -> &[OrganizationEntitlementSource] {
        self.organization_sources.as_deref().unwrap_or_default()
    }
}
