use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::core::Result;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::reports::models::{OutstandingReport, ReportPeriod};

/// Service for outstanding-balance analytics
pub struct ReportService {
    invoice_repo: Arc<dyn InvoiceRepository>,
}

impl ReportService {
    pub fn new(invoice_repo: Arc<dyn InvoiceRepository>) -> Self {
        Self { invoice_repo }
    }

    /// Outstanding totals over every stored invoice.
    ///
    /// `client` filters by exact client name; `None` or `"all"` includes
    /// every client.
    pub async fn outstanding(
        &self,
        period: ReportPeriod,
        client: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<OutstandingReport> {
        let client = client
            .map(str::trim)
            .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case("all"));

        let invoices = self.invoice_repo.list_all().await?;
        let report = OutstandingReport::build(&invoices, period, client, now);

        info!(
            period = ?period,
            client = ?client,
            invoices = report.invoice_count,
            total_due = %report.total_due,
            "Outstanding report generated"
        );

        Ok(report)
    }
}
