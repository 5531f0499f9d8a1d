use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default GST percentage offered when tax is first switched on
pub const DEFAULT_TAX_PERCENTAGE: Decimal = Decimal::from_parts(18, 0, 0, false, 0);

/// Flat tax applied to an invoice subtotal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSetting {
    pub enabled: bool,
    /// Percentage, e.g. `18` for 18%
    pub percentage: Decimal,
}

impl TaxSetting {
    pub fn new(enabled: bool, percentage: Decimal) -> Self {
        Self {
            enabled,
            percentage,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, DEFAULT_TAX_PERCENTAGE)
    }
}

impl Default for TaxSetting {
    fn default() -> Self {
        Self::disabled()
    }
}
