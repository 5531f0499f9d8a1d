// Invoice aggregate: client reference, metadata, rows, tax/advance/currency
// settings and payment state.
//
// `status` is derived from (total, received, closed) by the payment
// reconciler. Nothing outside the reconciler assigns it, except the
// explicit close action, which also goes through the reconciler.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::advance::AdvanceSetting;
use super::amounts::{Amounts, FormattedAmounts};
use super::line_item::{raw_field, LineItem, LineItemInput};
use crate::core::amount::{non_negative, parse_amount};
use crate::core::Currency;
use crate::modules::invoices::services::invoice_calculator::InvoiceCalculator;
use crate::modules::invoices::services::payment_reconciler::{DisplayStatus, PaymentStateReconciler};
use crate::modules::taxes::models::TaxSetting;

/// Suffix appended to the number of a duplicated invoice
pub const DUPLICATE_NUMBER_SUFFIX: &str = "-COPY";

/// Payment status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Nothing received
    #[default]
    Open,
    /// Something received, less than the total
    Partial,
    /// Received amount covers the total
    Paid,
    /// Voided; excluded from outstanding reporting until paid again
    Closed,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Open => write!(f, "open"),
            InvoiceStatus::Partial => write!(f, "partial"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "open" => Ok(InvoiceStatus::Open),
            "partial" => Ok(InvoiceStatus::Partial),
            "paid" => Ok(InvoiceStatus::Paid),
            "closed" => Ok(InvoiceStatus::Closed),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

/// A client invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Storage id, absent until first saved
    #[serde(default)]
    pub id: Option<String>,

    /// Owning client; required before a new invoice can be saved
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default)]
    pub client_contact: Option<String>,

    /// Operator-facing invoice number, e.g. `INV002`
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub remark: String,

    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub tax: TaxSetting,
    #[serde(default)]
    pub advance: AdvanceSetting,

    #[serde(default)]
    pub received_amount: Decimal,

    /// Total at last save; quick-pay actions work against this value
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub is_fully_paid: bool,
    #[serde(default)]
    pub status: InvoiceStatus,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Start a blank invoice for a client
    pub fn new(client_id: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            id: None,
            client_id: Some(client_id.into()),
            client_name: client_name.into(),
            client_address: None,
            client_contact: None,
            number: String::new(),
            issue_date: None,
            due_date: None,
            remark: String::new(),
            currency: Currency::default(),
            items: Vec::new(),
            tax: TaxSetting::default(),
            advance: AdvanceSetting::default(),
            received_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            is_fully_paid: false,
            status: InvoiceStatus::Open,
            created_at: None,
            updated_at: None,
        }
    }

    /// Derived amounts for the current rows, settings and received amount
    pub fn amounts(&self) -> Amounts {
        InvoiceCalculator::new().compute(&self.items, &self.tax, &self.advance, self.received_amount)
    }

    /// Recompute `total_amount` from the rows and return the full amounts
    pub fn refresh_total(&mut self) -> Amounts {
        let amounts = self.amounts();
        self.total_amount = amounts.total;
        amounts
    }

    /// `total_amount - received_amount`, against the stored total
    pub fn balance_due(&self) -> Decimal {
        self.total_amount.saturating_sub(self.received_amount)
    }

    pub fn is_closed(&self) -> bool {
        self.status == InvoiceStatus::Closed
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Status label for invoice lists (uses the looser display tolerance)
    pub fn display_status(&self) -> DisplayStatus {
        PaymentStateReconciler::display_status(self.total_amount, self.received_amount, self.status)
    }

    /// Unsaved copy of this invoice.
    ///
    /// The copy has no id or timestamps, its number gets a `-COPY` suffix,
    /// the issue date becomes `today` and the due date is cleared. The
    /// received amount is carried over, and the status is derived again
    /// from it rather than copied, so a closed source yields an open or
    /// partial copy.
    pub fn duplicate(&self, today: NaiveDate) -> Invoice {
        let mut copy = self.clone();
        copy.id = None;
        copy.number = format!("{}{}", self.number, DUPLICATE_NUMBER_SUFFIX);
        copy.issue_date = Some(today);
        copy.due_date = None;
        copy.created_at = None;
        copy.updated_at = None;

        copy.refresh_total();
        let state = PaymentStateReconciler::derive(copy.total_amount, copy.received_amount);
        copy.is_fully_paid = state.is_fully_paid;
        copy.status = state.status;
        copy
    }
}

/// Raw editor state sent on every change for live recalculation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculationRequest {
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub tax: TaxSetting,
    #[serde(default)]
    pub advance: AdvanceSetting,
    #[serde(default, deserialize_with = "raw_field")]
    pub received_amount: String,
    #[serde(default)]
    pub currency: Currency,
}

impl CalculationRequest {
    pub fn line_items(&self) -> Vec<LineItem> {
        self.items.iter().map(LineItem::from_input).collect()
    }

    /// Typed received amount; unparsable or negative input reads as zero
    pub fn received(&self) -> Decimal {
        non_negative(parse_amount(&self.received_amount))
    }
}

/// Result of a live recalculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub currency: Currency,
    pub symbol: String,
    /// Header label, e.g. `₹ INR (Indian Rupee)`
    pub currency_label: String,
    pub amounts: Amounts,
    pub formatted: FormattedAmounts,
    /// Per-row amounts, formatted, in row order
    pub row_amounts: Vec<String>,
}

/// Invoice as returned by the API, with list display fields attached
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub balance_due: Decimal,
    pub display_status: String,
    /// True when the remaining balance exceeds the display tolerance
    pub balance_outstanding: bool,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        let display = invoice.display_status();
        Self {
            balance_due: invoice.balance_due(),
            display_status: display.label(invoice.currency, invoice.received_amount),
            balance_outstanding: PaymentStateReconciler::balance_outstanding(
                invoice.total_amount,
                invoice.received_amount,
            ),
            invoice,
        }
    }
}
