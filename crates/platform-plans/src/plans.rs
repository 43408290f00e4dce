//! Canonical plans, model tiers and user roles
//!
//! This module defines the closed plan enumeration the engine reasons about,
//! the broader model tier used for routing and priority, and the platform
//! roles that bypass subscription state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical billing plan for a user.
///
/// Every resolution ends in exactly one of these plans. The declaration order
/// follows the commercial ladder, so `Ord` can be used for "at least" checks.
///
/// # Examples
///
/// ```
/// use platform_plans::CanonicalPlan;
///
/// assert_eq!(CanonicalPlan::parse("basic-plus"), Some(CanonicalPlan::BasicPlus));
/// assert!(CanonicalPlan::Pro > CanonicalPlan::Basic);
/// assert_eq!(CanonicalPlan::BasicPlus.as_str(), "BASIC_PLUS");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalPlan {
    /// Unauthenticated or anonymous visitor
    Guest,

    /// Signed-in user without an active subscription
    Trial,

    /// Entry paid plan
    Basic,

    /// Mid paid plan
    BasicPlus,

    /// Top paid plan
    Pro,

    /// Platform staff
    Admin,
}

impl CanonicalPlan {
    /// All plans, in ladder order.
    pub const ALL: [CanonicalPlan; 6] = [
        CanonicalPlan::Guest,
        CanonicalPlan::Trial,
        CanonicalPlan::Basic,
        CanonicalPlan::BasicPlus,
        CanonicalPlan::Pro,
        CanonicalPlan::Admin,
    ];

    /// Parse an exact plan name.
    ///
    /// Matching is case-insensitive and ignores `-` and `_`. This is not the
    /// heuristic used for raw billing plan identifiers; see
    /// [`parse_canonical_plan_from_plan_id`](crate::parse_canonical_plan_from_plan_id).
    ///
    /// # Returns
    ///
    /// `Some(CanonicalPlan)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "guest" => Some(Self::Guest),
            "trial" => Some(Self::Trial),
            "basic" => Some(Self::Basic),
            "basicplus" => Some(Self::BasicPlus),
            "pro" => Some(Self::Pro),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Get string representation of the plan.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "GUEST",
            Self::Trial => "TRIAL",
            Self::Basic => "BASIC",
            Self::BasicPlus => "BASIC_PLUS",
            Self::Pro => "PRO",
            Self::Admin => "ADMIN",
        }
    }

    /// Get a human-readable display name for the plan.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Guest => "Guest",
            Self::Trial => "Trial",
            Self::Basic => "Basic",
            Self::BasicPlus => "Basic Plus",
            Self::Pro => "Pro",
            Self::Admin => "Admin",
        }
    }

    /// Check if this plan is backed by a paying subscription.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Basic | Self::BasicPlus | Self::Pro)
    }
}

impl fmt::Display for CanonicalPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model tier used for AI routing and entitlement priority.
///
/// Tiers mirror the canonical plans except that there is no guest tier and
/// there is an extra `Enterprise` tier. Enterprise has no plan of its own:
/// it borrows `Pro` for catalog and routing lookups but keeps whatever limits
/// its organization grant declares.
///
/// The hierarchy is: Trial < Basic < BasicPlus < Pro < Enterprise < Admin
///
/// # Examples
///
/// ```
/// use platform_plans::{CanonicalPlan, ModelTier};
///
/// assert_eq!(ModelTier::Enterprise.canonical_plan(), CanonicalPlan::Pro);
/// assert!(ModelTier::Enterprise.priority() > ModelTier::Pro.priority());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelTier {
    /// Trial models
    Trial = 0,

    /// Basic models
    Basic = 1,

    /// Basic Plus models
    BasicPlus = 2,

    /// Pro models
    Pro = 3,

    /// Enterprise contract tier (routes as Pro)
    Enterprise = 4,

    /// Platform staff
    Admin = 5,
}

impl ModelTier {
    /// Priority rank of this tier. Higher ranks win entitlement comparisons
    /// regardless of numeric limits.
    pub fn priority(&self) -> u8 {
        *self as u8
    }

    /// Canonical plan whose catalog entry this tier uses for routing.
    ///
    /// `Enterprise` maps to `Pro`; every other tier maps to its namesake.
    pub fn canonical_plan(&self) -> CanonicalPlan {
        match self {
            Self::Trial => CanonicalPlan::Trial,
            Self::Basic => CanonicalPlan::Basic,
            Self::BasicPlus => CanonicalPlan::BasicPlus,
            Self::Pro | Self::Enterprise => CanonicalPlan::Pro,
            Self::Admin => CanonicalPlan::Admin,
        }
    }

    /// Parse tier from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, `-` and `_` ignored)
    ///
    /// # Returns
    ///
    /// `Some(ModelTier)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "trial" => Some(Self::Trial),
            "basic" => Some(Self::Basic),
            "basicplus" => Some(Self::BasicPlus),
            "pro" => Some(Self::Pro),
            "enterprise" => Some(Self::Enterprise),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Get string representation of the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trial => "TRIAL",
            Self::Basic => "BASIC",
            Self::BasicPlus => "BASIC_PLUS",
            Self::Pro => "PRO",
            Self::Enterprise => "ENTERPRISE",
            Self::Admin => "ADMIN",
        }
    }

    /// Get a human-readable display name for the tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Trial => "Trial",
            Self::Basic => "Basic",
            Self::BasicPlus => "Basic Plus",
            Self::Pro => "Pro",
            Self::Enterprise => "Enterprise",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform-level user role as reported by the identity layer.
///
/// Only the two staff roles influence plan resolution; every other role is
/// kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserRole {
    /// Platform administrator
    Admin,

    /// Platform super administrator
    SuperAdmin,

    /// Any non-staff role (e.g. `USER`)
    Other(String),
}

impl UserRole {
    /// Parse a role string. Staff roles are matched exactly (`ADMIN`,
    /// `SUPER_ADMIN`), as emitted by the identity layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use platform_plans::UserRole;
    ///
    /// assert_eq!(UserRole::parse("SUPER_ADMIN"), UserRole::SuperAdmin);
    /// assert!(!UserRole::parse("admin").is_platform_admin());
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "ADMIN" => Self::Admin,
            "SUPER_ADMIN" => Self::SuperAdmin,
            other => Self::Other(other.to_string()),
        }
    }

    /// Check if this role overrides subscription state with the admin plan.
    pub fn is_platform_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Other(role) => role,
        }
    }
}
