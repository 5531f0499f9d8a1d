use rust_decimal::Decimal;

use crate::core::amount::non_negative;
use crate::modules::taxes::models::TaxSetting;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// TaxCalculator applies a flat percentage tax to an invoice subtotal
pub struct TaxCalculator;

impl TaxCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Tax owed on `subtotal`.
    ///
    /// Returns zero whenever tax is disabled, whatever percentage is stored.
    /// A negative percentage is treated as zero. The result is not rounded.
    pub fn calculate_tax(&self, subtotal: Decimal, setting: &TaxSetting) -> Decimal {
        if !setting.enabled {
            return Decimal::ZERO;
        }

        subtotal.saturating_mul(non_negative(setting.percentage)) / HUNDRED
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new()
    }
}
