use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-user filter thresholds applied by the scorer's decision table.
///
/// Created with defaults on first use; mutated only by explicit user update;
/// never deleted, only overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    pub max_source_cost: Decimal,
    pub min_sell_price: Decimal,
    pub min_margin_percent: Decimal,
    pub max_fb_ads: u32,
    pub max_shipping_days: u32,
    pub exclude_trademark_risk: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            max_source_cost: Decimal::from(15),
            min_sell_price: Decimal::from(35),
            min_margin_percent: Decimal::from(60),
            max_fb_ads: 50,
            max_shipping_days: 15,
            exclude_trademark_risk: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("filter setting {field} is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: String,
    },
}

impl FilterSettings {
    /// Validate user-supplied thresholds at the settings-update boundary.
    ///
    /// Out-of-range values are rejected here, before they can reach the
    /// scorer — never silently clamped.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::OutOfRange`] naming the offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_source_cost < Decimal::ZERO {
            return Err(SettingsError::OutOfRange {
                field: "max_source_cost",
                reason: format!("must be non-negative, got {}", self.max_source_cost),
            });
        }
        if self.min_sell_price < Decimal::ZERO {
            return Err(SettingsError::OutOfRange {
                field: "min_sell_price",
                reason: format!("must be non-negative, got {}", self.min_sell_price),
            });
        }
        if self.min_margin_percent < Decimal::ZERO || self.min_margin_percent > Decimal::from(100) {
            return Err(SettingsError::OutOfRange {
                field: "min_margin_percent",
                reason: format!("must be within 0..=100, got {}", self.min_margin_percent),
            });
        }
        Ok(())
    }
}
