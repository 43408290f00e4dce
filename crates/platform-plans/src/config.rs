//! Catalog configuration.
//!
//! The built-in catalog needs no configuration. Deployments that route plans
//! to different models, or keep attachments for a different number of days,
//! load overrides from environment variables and build their own
//! [`PlanCatalog`](crate::PlanCatalog) once at startup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::plans::CanonicalPlan;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Per-plan overrides applied on top of the built-in catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOverrides {
    /// Orchestrator model id.
    pub orchestrator_model: Option<String>,

    /// Sub-agent model id.
    pub sub_agent_model: Option<String>,

    /// Maintenance model id.
    pub maintenance_model: Option<String>,

    /// Attachment retention in days.
    pub attachment_retention_days: Option<u32>,
}

impl PlanOverrides {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Overrides keyed by plan. Plans without an entry keep built-in values.
    #[serde(default)]
    pub plans: BTreeMap<CanonicalPlan, PlanOverrides>,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables, where `<PLAN>` is one of `GUEST`, `TRIAL`,
    /// `BASIC`, `BASIC_PLUS`, `PRO`, `ADMIN`:
    /// - `PLAN_<PLAN>_ORCHESTRATOR_MODEL`: Orchestrator model id
    /// - `PLAN_<PLAN>_SUB_AGENT_MODEL`: Sub-agent model id
    /// - `PLAN_<PLAN>_MAINTENANCE_MODEL`: Maintenance model id
    /// - `PLAN_<PLAN>_ATTACHMENT_RETENTION_DAYS`: Attachment retention in days
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a retention value is not a
    /// number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Used by [`from_env`](Self::from_env); tests pass a map instead of
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut plans = BTreeMap::new();

        for plan in CanonicalPlan::ALL {
            let prefix = format!("PLAN_{}", plan.as_str());
            let retention_key = format!("{prefix}_ATTACHMENT_RETENTION_DAYS");

            let attachment_retention_days = match lookup(&retention_key) {
                Some(raw) => Some(raw.trim().parse::<u32>().map_err(|e| ConfigError::InvalidValue {
                    key: retention_key.clone(),
                    message: e.to_string(),
                })?),
                None => None,
            };

            let overrides = PlanOverrides {
                orchestrator_model: lookup(&format!("{prefix}_ORCHESTRATOR_MODEL")),
                sub_agent_model: lookup(&format!("{prefix}_SUB_AGENT_MODEL")),
                maintenance_model: lookup(&format!("{prefix}_MAINTENANCE_MODEL")),
                attachment_retention_days,
            };

            if !overrides.is_empty() {
                plans.insert(plan, overrides);
            }
        }

        Ok(Self { plans })
    }

    /// Validate the overrides.
    ///
    /// Model ids must be non-blank and retention must be at least one day.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (plan, overrides) in &self.plans {
            let prefix = format!("PLAN_{}", plan.as_str());
            let models = [
                ("ORCHESTRATOR_MODEL", &overrides.orchestrator_model),
                ("SUB_AGENT_MODEL", &overrides.sub_agent_model),
                ("MAINTENANCE_MODEL", &overrides.maintenance_model),
            ];
            for (suffix, model) in models {
                if model.as_deref().is_some_and(|m| m.trim().is_empty()) {
                    return Err(ConfigError::InvalidValue {
                        key: format!("{prefix}_{suffix}"),
                        message: "model id must not be empty".to_string(),
                    });
                }
            }
            if overrides.attachment_retention_days == Some(0) {
                return Err(ConfigError::InvalidValue {
                    key: format!("{prefix}_ATTACHMENT_RETENTION_DAYS"),
                    message: "retention must be at least one day".to_string(),
                });
            }
        }
        Ok(())
    }
}
