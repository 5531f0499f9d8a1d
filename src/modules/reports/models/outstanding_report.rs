use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::invoices::models::Invoice;

/// Bucket name for invoices without a client name
pub const UNKNOWN_CLIENT: &str = "Unknown";

/// Creation-date window for the outstanding report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    #[default]
    All,
    ThisMonth,
    LastMonth,
    ThisYear,
}

impl ReportPeriod {
    /// Whether an invoice created at `created_at` falls in this period as
    /// seen from `now`. Undated invoices only match `All`.
    pub fn contains(&self, created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        if *self == ReportPeriod::All {
            return true;
        }
        let Some(date) = created_at else {
            return false;
        };

        match self {
            ReportPeriod::All => true,
            ReportPeriod::ThisMonth => date.year() == now.year() && date.month() == now.month(),
            ReportPeriod::LastMonth => {
                let (year, month) = if now.month() == 1 {
                    (now.year() - 1, 12)
                } else {
                    (now.year(), now.month() - 1)
                };
                date.year() == year && date.month() == month
            }
            ReportPeriod::ThisYear => date.year() == now.year(),
        }
    }
}

/// Per-client outstanding figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientTotals {
    pub client_name: String,
    pub invoiced: Decimal,
    pub received: Decimal,
    pub due: Decimal,
}

/// Invoiced, received and due totals across non-closed invoices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutstandingReport {
    pub period: ReportPeriod,
    pub client: Option<String>,
    pub invoice_count: usize,
    pub total_invoiced: Decimal,
    pub total_received: Decimal,
    pub total_due: Decimal,
    /// In order of first appearance in the input
    pub clients: Vec<ClientTotals>,
}

impl OutstandingReport {
    /// Aggregate `invoices`, skipping closed ones and those outside the
    /// period or client filter. Due amounts are `total - received` and may
    /// be negative for overpaid invoices.
    pub fn build(
        invoices: &[Invoice],
        period: ReportPeriod,
        client: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut report = Self {
            period,
            client: client.map(str::to_string),
            invoice_count: 0,
            total_invoiced: Decimal::ZERO,
            total_received: Decimal::ZERO,
            total_due: Decimal::ZERO,
            clients: Vec::new(),
        };

        let included = invoices
            .iter()
            .filter(|invoice| client.is_none_or(|name| invoice.client_name == name))
            .filter(|invoice| period.contains(invoice.created_at, now))
            .filter(|invoice| !invoice.is_closed());

        for invoice in included {
            report.add(invoice);
        }

        report
    }

    fn add(&mut self, invoice: &Invoice) {
        let invoiced = invoice.total_amount;
        let received = invoice.received_amount;
        let due = invoiced.saturating_sub(received);

        self.invoice_count += 1;
        self.total_invoiced = self.total_invoiced.saturating_add(invoiced);
        self.total_received = self.total_received.saturating_add(received);
        self.total_due = self.total_due.saturating_add(due);

        let name = if invoice.client_name.trim().is_empty() {
            UNKNOWN_CLIENT
        } else {
            invoice.client_name.as_str()
        };

        match self.clients.iter_mut().find(|totals| totals.client_name == name) {
            Some(totals) => {
                totals.invoiced = totals.invoiced.saturating_add(invoiced);
                totals.received = totals.received.saturating_add(received);
                totals.due = totals.due.saturating_add(due);
            }
            None => self.clients.push(ClientTotals {
                client_name: name.to_string(),
                invoiced,
                received,
                due,
            }),
        }
    }
}
