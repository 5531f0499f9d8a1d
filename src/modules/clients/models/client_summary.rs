use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::Currency;
use crate::modules::invoices::models::{Invoice, InvoiceResponse};

/// Totals shown above a client's invoice list.
///
/// `invoice_count` counts every invoice; the money totals skip closed ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSummary {
    pub invoice_count: usize,
    pub total_amount: Decimal,
    pub total_received: Decimal,
    pub balance: Decimal,
    /// Currency of the newest invoice, used for all three totals
    pub currency: Currency,
    pub symbol: String,
}

impl ClientSummary {
    /// Summarize invoices already sorted newest first. `fallback` is the
    /// currency reported when there are no invoices.
    pub fn from_invoices(invoices: &[Invoice], fallback: Currency) -> Self {
        let (total_amount, total_received) = invoices
            .iter()
            .filter(|invoice| !invoice.is_closed())
            .fold((Decimal::ZERO, Decimal::ZERO), |(amount, received), invoice| {
                (
                    amount.saturating_add(invoice.total_amount),
                    received.saturating_add(invoice.received_amount),
                )
            });

        let currency = invoices
            .first()
            .map(|invoice| invoice.currency)
            .unwrap_or(fallback);

        Self {
            invoice_count: invoices.len(),
            total_amount,
            total_received,
            balance: total_amount.saturating_sub(total_received),
            currency,
            symbol: currency.symbol().to_string(),
        }
    }
}

/// A client's invoices, newest first, with their summary
#[derive(Debug, Clone, Serialize)]
pub struct ClientInvoices {
    pub client_id: String,
    pub summary: ClientSummary,
    pub invoices: Vec<InvoiceResponse>,
}

impl ClientInvoices {
    pub fn new(client_id: impl Into<String>, invoices: Vec<Invoice>, fallback: Currency) -> Self {
        Self {
            client_id: client_id.into(),
            summary: ClientSummary::from_invoices(&invoices, fallback),
            invoices: invoices.into_iter().map(InvoiceResponse::from).collect(),
        }
    }
}
