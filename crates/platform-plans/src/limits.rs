//! Daily usage limits carried by an entitlement
//!
//! Limits are plain numbers so they can be compared across sources. The admin
//! tier uses positive infinity for the daily counters; on the wire an infinite
//! value is written as `null` and read back as infinity.

use serde::{Deserialize, Serialize};

/// Daily usage limits for an entitlement.
///
/// Values are non-negative. `f64::INFINITY` means unlimited.
///
/// # Examples
///
/// ```
/// use platform_plans::EntitlementLimits;
///
/// let limits = EntitlementLimits::new(7.0, 7000.0, 3500.0, 0.7, 7.0);
/// assert!(!limits.is_unlimited());
/// assert!(EntitlementLimits::unlimited(200.0).is_unlimited());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementLimits {
    /// Requests per day
    #[serde(with = "unbounded")]
    pub max_requests_per_day: f64,

    /// Input tokens per day
    #[serde(with = "unbounded")]
    pub max_input_tokens_per_day: f64,

    /// Output tokens per day
    #[serde(with = "unbounded")]
    pub max_output_tokens_per_day: f64,

    /// Spend per day, in currency units
    #[serde(with = "unbounded")]
    pub max_cost_per_day: f64,

    /// Messages of history sent as model context
    pub max_context_messages: f64,
}

impl EntitlementLimits {
    /// Create a limits vector.
    pub const fn new(
        max_requests_per_day: f64,
        max_input_tokens_per_day: f64,
        max_output_tokens_per_day: f64,
        max_cost_per_day: f64,
        max_context_messages: f64,
    ) -> Self {
        Self {
            max_requests_per_day,
            max_input_tokens_per_day,
            max_output_tokens_per_day,
            max_cost_per_day,
            max_context_messages,
        }
    }

    /// Limits with no daily caps. Context size is always bounded.
    pub const fn unlimited(max_context_messages: f64) -> Self {
        Self::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::INFINITY,
            f64::INFINITY,
            max_context_messages,
        )
    }

    /// Check if every daily counter is uncapped.
    pub fn is_unlimited(&self) -> bool {
        self.max_requests_per_day.is_infinite()
            && self.max_input_tokens_per_day.is_infinite()
            && self.max_output_tokens_per_day.is_infinite()
            && self.max_cost_per_day.is_infinite()
    }

    /// Fields in comparison order.
    pub(crate) fn comparison_vector(&self) -> [f64; 5] {
        [
            self.max_requests_per_day,
            self.max_input_tokens_per_day,
            self.max_output_tokens_per_day,
            self.max_cost_per_day,
            self.max_context_messages,
        ]
    }
}

/// Serialize infinite limits as `null`, and `null` back to infinity.
mod unbounded {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_infinite() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_json_uses_null() {
        let json = serde_json::to_value(EntitlementLimits::unlimited(200.0)).unwrap();
        assert!(json["maxRequestsPerDay"].is_null());
        assert!(json["maxCostPerDay"].is_null());
        assert_eq!(json["maxContextMessages"], 200.0);

        let back: EntitlementLimits = serde_json::from_value(json).unwrap();
        assert!(back.is_unlimited());
        assert_eq!(back.max_context_messages, 200.0);
    }

    #[test]
    fn test_finite_limits_from_json() {
        let limits: EntitlementLimits = serde_json::from_str(
            r#"{"maxRequestsPerDay":7,"maxInputTokensPerDay":7000,
                "maxOutputTokensPerDay":3500,"maxCostPerDay":0.7,"maxContextMessages":7}"#,
        )
        .unwrap();
        assert_eq!(limits, EntitlementLimits::new(7.0, 7000.0, 3500.0, 0.7, 7.0));
        assert!(!limits.is_unlimited());
    }

    #[test]
    fn test_partially_capped_is_not_unlimited() {
        let mut limits = EntitlementLimits::unlimited(50.0);
        limits.max_cost_per_day = 10.0;
        assert!(!limits.is_unlimited());
    }
}
