use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Currency;

/// Monetary amounts derived from an invoice's rows and settings.
///
/// Values carry full precision; round only when formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Amounts {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    /// Informational only
    pub advance_amount: Decimal,
    pub total: Decimal,
    /// `total - received`, negative on overpayment
    pub balance_due: Decimal,
}

impl Amounts {
    pub fn formatted(&self, currency: Currency) -> FormattedAmounts {
        FormattedAmounts {
            subtotal: currency.format_amount(self.subtotal),
            tax_amount: currency.format_amount(self.tax_amount),
            advance_amount: currency.format_amount(self.advance_amount),
            total: currency.format_amount(self.total),
            balance_due: currency.format_amount(self.balance_due),
        }
    }
}

/// Display strings for [`Amounts`], e.g. `₹1180.00`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedAmounts {
    pub subtotal: String,
    pub tax_amount: String,
    pub advance_amount: String,
    pub total: String,
    pub balance_due: String,
}
