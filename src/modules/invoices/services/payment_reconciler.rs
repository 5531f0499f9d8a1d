// Payment state machine for invoices.
//
// States: open -> partial -> paid, plus closed. Two events drive it:
//   PaymentRecorded(amount): status re-derived from (total, amount). This
//     applies from every state, including closed, so paying a closed invoice
//     reopens it.
//   Closed: status becomes closed; received amount untouched.
// There is no reopen event that does not involve a payment.
//
// Two thresholds exist and are kept apart:
//   exact    received >= total          -> status paid
//   display  received >= total - 0.5   -> list shows "Paid"

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Currency, Result};
use crate::modules::invoices::models::{Invoice, InvoiceStatus};

/// Slack used only when labelling invoices in lists
pub const DISPLAY_PAID_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Input events of the payment state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentEvent {
    /// Received amount set to the given (absolute, not incremental) value
    PaymentRecorded(Decimal),
    /// Invoice voided by the operator
    Closed,
}

/// Payment-related fields of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentState {
    pub received_amount: Decimal,
    pub is_fully_paid: bool,
    pub status: InvoiceStatus,
}

impl PaymentState {
    /// State of a freshly created invoice
    pub fn initial() -> Self {
        Self {
            received_amount: Decimal::ZERO,
            is_fully_paid: false,
            status: InvoiceStatus::Open,
        }
    }

    pub fn of(invoice: &Invoice) -> Self {
        Self {
            received_amount: invoice.received_amount,
            is_fully_paid: invoice.is_fully_paid,
            status: invoice.status,
        }
    }

    fn write_to(self, invoice: &mut Invoice) {
        invoice.received_amount = self.received_amount;
        invoice.is_fully_paid = self.is_fully_paid;
        invoice.status = self.status;
    }
}

/// How an invoice is labelled in lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    ClosedVoid,
    Paid,
    Partial,
    Unpaid,
}

impl DisplayStatus {
    /// Operator-facing label, e.g. `Partial (₹250.00)`
    pub fn label(&self, currency: Currency, received: Decimal) -> String {
        match self {
            DisplayStatus::ClosedVoid => "Closed (Void)".to_string(),
            DisplayStatus::Paid => "Paid".to_string(),
            DisplayStatus::Partial => format!("Partial ({})", currency.format_amount(received)),
            DisplayStatus::Unpaid => "Unpaid".to_string(),
        }
    }
}

/// Derives and transitions invoice payment state
pub struct PaymentStateReconciler;

impl PaymentStateReconciler {
    /// Canonical state for a received amount against a total, ignoring any
    /// previous status
    pub fn derive(total: Decimal, received: Decimal) -> PaymentState {
        let is_fully_paid = received >= total;
        let status = if is_fully_paid {
            InvoiceStatus::Paid
        } else if received > Decimal::ZERO {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Open
        };

        PaymentState {
            received_amount: received,
            is_fully_paid,
            status,
        }
    }

    /// Apply one event to a state.
    ///
    /// # Errors
    /// * `Validation` if a recorded payment is negative; `state` is unchanged
    pub fn transition(
        total: Decimal,
        state: PaymentState,
        event: PaymentEvent,
    ) -> Result<PaymentState> {
        match event {
            PaymentEvent::PaymentRecorded(amount) => {
                if amount < Decimal::ZERO {
                    return Err(AppError::validation(format!(
                        "Received amount cannot be negative, got: {}",
                        amount
                    )));
                }
                Ok(Self::derive(total, amount))
            }
            PaymentEvent::Closed => Ok(PaymentState {
                status: InvoiceStatus::Closed,
                ..state
            }),
        }
    }

    /// Apply an event to an invoice using its stored total.
    /// The invoice is only modified when the transition succeeds.
    pub fn apply(invoice: &mut Invoice, event: PaymentEvent) -> Result<()> {
        let next = Self::transition(invoice.total_amount, PaymentState::of(invoice), event)?;
        next.write_to(invoice);
        Ok(())
    }

    /// Set the received amount and re-derive status (reopens closed invoices)
    pub fn record_payment(invoice: &mut Invoice, amount: Decimal) -> Result<()> {
        Self::apply(invoice, PaymentEvent::PaymentRecorded(amount))
    }

    pub fn pay_in_full(invoice: &mut Invoice) -> Result<()> {
        let total = invoice.total_amount;
        Self::record_payment(invoice, total)
    }

    pub fn pay_half(invoice: &mut Invoice) -> Result<()> {
        let half = invoice.total_amount / Decimal::TWO;
        Self::record_payment(invoice, half)
    }

    /// Toggle between fully paid (received = total) and unpaid (received = 0)
    pub fn mark_paid(invoice: &mut Invoice, paid: bool) -> Result<()> {
        let amount = if paid {
            invoice.total_amount
        } else {
            Decimal::ZERO
        };
        Self::record_payment(invoice, amount)
    }

    /// Void the invoice. Idempotent; received amount is untouched.
    pub fn close(invoice: &mut Invoice) {
        let next = PaymentState {
            status: InvoiceStatus::Closed,
            ..PaymentState::of(invoice)
        };
        next.write_to(invoice);
    }

    /// Bring status back in line after an edit changed the total or the
    /// received amount. A closed invoice stays closed: editing is not a
    /// payment event.
    pub fn reconcile(invoice: &mut Invoice) -> Result<()> {
        if invoice.received_amount < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Received amount cannot be negative, got: {}",
                invoice.received_amount
            )));
        }

        let derived = Self::derive(invoice.total_amount, invoice.received_amount);
        invoice.is_fully_paid = derived.is_fully_paid;
        if !invoice.is_closed() {
            invoice.status = derived.status;
        }
        Ok(())
    }

    /// List label. Closed wins; otherwise "Paid" once the received amount is
    /// within [`DISPLAY_PAID_TOLERANCE`] of the total.
    pub fn display_status(
        total: Decimal,
        received: Decimal,
        status: InvoiceStatus,
    ) -> DisplayStatus {
        if status == InvoiceStatus::Closed {
            DisplayStatus::ClosedVoid
        } else if received >= total.saturating_sub(DISPLAY_PAID_TOLERANCE) {
            DisplayStatus::Paid
        } else if received > Decimal::ZERO {
            DisplayStatus::Partial
        } else {
            DisplayStatus::Unpaid
        }
    }

    /// Whether the remaining balance should be highlighted as due
    pub fn balance_outstanding(total: Decimal, received: Decimal) -> bool {
        total.saturating_sub(received) > DISPLAY_PAID_TOLERANCE
    }
}
