use rust_decimal::Decimal;

use crate::core::amount::non_negative;
use crate::modules::invoices::models::{AdvanceBase, AdvanceSetting, Amounts, LineItem};
use crate::modules::taxes::models::TaxSetting;
use crate::modules::taxes::services::TaxCalculator;

/// Derives invoice amounts from rows and settings.
///
/// Pure and infallible: partially entered rows contribute zero instead of
/// raising, and no intermediate value is rounded. Sums and products saturate
/// at the `Decimal` bounds.
pub struct InvoiceCalculator {
    tax_calculator: TaxCalculator,
}

impl InvoiceCalculator {
    pub fn new() -> Self {
        Self {
            tax_calculator: TaxCalculator::new(),
        }
    }

    /// Compute subtotal, tax, advance, total and balance due.
    ///
    /// * `subtotal = Σ rate × quantity` (negative or absent fields count as 0)
    /// * `total = subtotal + tax`
    /// * `advance` is taken from the subtotal or the post-tax total and is
    ///   reported only; it does not reduce `total` or `balance_due`
    /// * `balance_due = total - received`, left negative on overpayment
    pub fn compute(
        &self,
        items: &[LineItem],
        tax: &TaxSetting,
        advance: &AdvanceSetting,
        received_amount: Decimal,
    ) -> Amounts {
        let subtotal = self.subtotal(items);
        let tax_amount = self.tax_calculator.calculate_tax(subtotal, tax);
        let total = subtotal.saturating_add(tax_amount);
        let advance_amount = self.advance_amount(subtotal, total, advance);

        Amounts {
            subtotal,
            tax_amount,
            advance_amount,
            total,
            balance_due: total.saturating_sub(received_amount),
        }
    }

    pub fn subtotal(&self, items: &[LineItem]) -> Decimal {
        items
            .iter()
            .map(LineItem::amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn advance_amount(
        &self,
        subtotal: Decimal,
        total: Decimal,
        advance: &AdvanceSetting,
    ) -> Decimal {
        if !advance.enabled {
            return Decimal::ZERO;
        }

        let base = match advance.base {
            AdvanceBase::Subtotal => subtotal,
            AdvanceBase::Total => total,
        };

        base.saturating_mul(non_negative(advance.percentage)) / Decimal::ONE_HUNDRED
    }
}

impl Default for InvoiceCalculator {
    fn default() -> Self {
        Self::new()
    }
}
