//! Plan catalog
//!
//! Static table mapping every canonical plan to its model tier, daily limits,
//! attachment retention, model routing and voice policy. The built-in catalog
//! is constructed once per process and never mutated; custom catalogs are
//! built from [`CatalogConfig`] and shared behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::config::{CatalogConfig, ConfigError};
use crate::limits::EntitlementLimits;
use crate::plans::{CanonicalPlan, ModelTier};

const FLASH_LITE: &str = "google/gemini-2.0-flash-lite-001";
const FLASH: &str = "google/gemini-2.0-flash-001";
const SONNET: &str = "anthropic/claude-3.5-sonnet";

/// Voice rolling window shared by every plan.
const VOICE_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Model identifiers used by the AI orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRouting {
    /// Model that plans and answers the request
    pub orchestrator: String,

    /// Model used for delegated sub-agent calls
    pub sub_agent: String,

    /// Model used for background maintenance (summaries, titles)
    pub maintenance: String,
}

impl ModelRouting {
    fn new(orchestrator: &str, sub_agent: &str, maintenance: &str) -> Self {
        Self {
            orchestrator: orchestrator.to_string(),
            sub_agent: sub_agent.to_string(),
            maintenance: maintenance.to_string(),
        }
    }
}

/// Voice-generation policy for a plan.
///
/// The chance of generating a voice reply starts at `base_probability` and
/// is multiplied by `decay_factor` for every generation already made in the
/// rolling window, up to `max_per_window` generations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoicePolicy {
    /// Whether voice replies are available at all
    pub enabled: bool,

    /// Probability of the first generation in a window
    pub base_probability: f64,

    /// Multiplier applied per prior generation in the window
    pub decay_factor: f64,

    /// Rolling window length in seconds
    pub window_secs: u64,

    /// Maximum generations per window
    pub max_per_window: u32,
}

impl VoicePolicy {
    const fn disabled() -> Self {
        Self {
            enabled: false,
            base_probability: 0.0,
            decay_factor: 0.0,
            window_secs: VOICE_WINDOW_SECS,
            max_per_window: 0,
        }
    }

    const fn enabled(base_probability: f64, decay_factor: f64, max_per_window: u32) -> Self {
        Self {
            enabled: true,
            base_probability,
            decay_factor,
            window_secs: VOICE_WINDOW_SECS,
            max_per_window,
        }
    }

    /// Get the rolling window as a Duration.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Probability of generating one more voice reply, given how many were
    /// already generated in the current window.
    ///
    /// # Examples
    ///
    /// ```
    /// use platform_plans::resolve_policies_for_plan;
    /// use platform_plans::CanonicalPlan;
    ///
    /// let voice = resolve_policies_for_plan(CanonicalPlan::Guest).voice;
    /// assert_eq!(voice.generation_probability(0), 0.0);
    /// ```
    pub fn generation_probability(&self, generations_in_window: u32) -> f64 {
        if !self.enabled || generations_in_window >= self.max_per_window {
            return 0.0;
        }
        let exponent = i32::try_from(generations_in_window).unwrap_or(i32::MAX);
        self.base_probability * self.decay_factor.powi(exponent)
    }
}

/// Catalog entry for one canonical plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCatalogEntry {
    /// Plan this entry describes
    pub plan: CanonicalPlan,

    /// Model tier the plan competes at
    pub model_tier: ModelTier,

    /// Daily usage limits
    pub limits: EntitlementLimits,

    /// Days before uploaded attachments are swept
    pub attachment_retention_days: u32,

    /// Model routing identifiers
    pub model_routing: ModelRouting,

    /// Voice-generation policy
    pub voice: VoicePolicy,
}

impl PlanCatalogEntry {
    /// Built-in entry for a plan.
    fn builtin(plan: CanonicalPlan) -> Self {
        match plan {
            CanonicalPlan::Guest => Self {
                plan,
                model_tier: ModelTier::Trial,
                limits: EntitlementLimits::new(10.0, 20_000.0, 5_000.0, 0.05, 10.0),
                attachment_retention_days: 1,
                model_routing: ModelRouting::new(FLASH_LITE, FLASH_LITE, FLASH_LITE),
                voice: VoicePolicy::disabled(),
            },
            CanonicalPlan::Trial => Self {
                plan,
                model_tier: ModelTier::Trial,
                limits: EntitlementLimits::new(25.0, 50_000.0, 12_500.0, 0.10, 20.0),
                attachment_retention_days: 7,
                model_routing: ModelRouting::new(FLASH_LITE, FLASH_LITE, FLASH_LITE),
                voice: VoicePolicy::enabled(0.25, 0.5, 3),
            },
            CanonicalPlan::Basic => Self {
                plan,
                model_tier: ModelTier::Basic,
                limits: EntitlementLimits::new(100.0, 200_000.0, 50_000.0, 0.50, 30.0),
                attachment_retention_days: 30,
                model_routing: ModelRouting::new(FLASH_LITE, FLASH, FLASH_LITE),
                voice: VoicePolicy::enabled(0.35, 0.7, 10),
            },
            CanonicalPlan::BasicPlus => Self {
                plan,
                model_tier: ModelTier::BasicPlus,
                limits: EntitlementLimits::new(250.0, 500_000.0, 125_000.0, 1.50, 50.0),
                attachment_retention_days: 60,
                model_routing: ModelRouting::new(FLASH, FLASH, FLASH_LITE),
                voice: VoicePolicy::enabled(0.45, 0.8, 20),
            },
            // Pro orchestrates on the lite model and spends its budget on sub-agents.
            CanonicalPlan::Pro => Self {
                plan,
                model_tier: ModelTier::Pro,
                limits: EntitlementLimits::new(1_000.0, 2_000_000.0, 500_000.0, 5.00, 100.0),
                attachment_retention_days: 180,
                model_routing: ModelRouting::new(FLASH_LITE, SONNET, FLASH_LITE),
                voice: VoicePolicy::enabled(0.6, 0.9, 50),
            },
            CanonicalPlan::Admin => Self {
                plan,
                model_tier: ModelTier::Admin,
                limits: EntitlementLimits::unlimited(200.0),
                attachment_retention_days: 365,
                model_routing: ModelRouting::new(FLASH, SONNET, FLASH),
                voice: VoicePolicy::enabled(1.0, 1.0, 1_000),
            },
        }
    }
}

/// Read-only plan catalog.
///
/// # Examples
///
/// ```
/// use platform_plans::{CanonicalPlan, ModelTier, PlanCatalog};
///
/// let catalog = PlanCatalog::builtin();
/// assert_eq!(catalog.entry(CanonicalPlan::BasicPlus).attachment_retention_days, 60);
/// assert_eq!(catalog.entry_for_tier(ModelTier::Enterprise).plan, CanonicalPlan::Pro);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCatalog {
    entries: [PlanCatalogEntry; 6],
}

impl PlanCatalog {
    /// Process-wide built-in catalog, constructed on first use.
    pub fn builtin() -> &'static PlanCatalog {
        builtin_arc()
    }

    /// Shared handle to the process-wide built-in catalog.
    pub fn builtin_shared() -> Arc<PlanCatalog> {
        Arc::clone(builtin_arc())
    }

    /// Build a fresh copy of the built-in catalog.
    pub fn new() -> Self {
        Self {
            entries: CanonicalPlan::ALL.map(PlanCatalogEntry::builtin),
        }
    }

    /// Build a catalog from the built-in values with configured overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the configuration fails
    /// validation.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut catalog = Self::new();
        for (plan, overrides) in &config.plans {
            let entry = &mut catalog.entries[*plan as usize];
            if let Some(model) = &overrides.orchestrator_model {
                entry.model_routing.orchestrator = model.clone();
            }
            if let Some(model) = &overrides.sub_agent_model {
                entry.model_routing.sub_agent = model.clone();
            }
            if let Some(model) = &overrides.maintenance_model {
                entry.model_routing.maintenance = model.clone();
            }
            if let Some(days) = overrides.attachment_retention_days {
                entry.attachment_retention_days = days;
            }
        }
        Ok(catalog)
    }

    /// Catalog entry for a plan.
    pub fn entry(&self, plan: CanonicalPlan) -> &PlanCatalogEntry {
        &self.entries[plan as usize]
    }

    /// Catalog entry a model tier routes through (`Enterprise` uses `Pro`).
    pub fn entry_for_tier(&self, tier: ModelTier) -> &PlanCatalogEntry {
        self.entry(tier.canonical_plan())
    }

    /// Daily limits for a plan.
    pub fn limits(&self, plan: CanonicalPlan) -> EntitlementLimits {
        self.entry(plan).limits
    }

    /// All entries, in plan ladder order.
    pub fn entries(&self) -> impl Iterator<Item = &PlanCatalogEntry> {
        self.entries.iter()
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_arc() -> &'static Arc<PlanCatalog> {
    static BUILTIN: OnceLock<Arc<PlanCatalog>> = OnceLock::new();
    BUILTIN.get_or_init(|| Arc::new(PlanCatalog::new()))
}
