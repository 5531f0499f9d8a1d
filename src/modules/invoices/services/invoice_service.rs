use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::invoices::models::{
    CalculationRequest, CalculationResponse, Invoice, InvoiceStatus,
};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::invoices::services::invoice_calculator::InvoiceCalculator;
use crate::modules::invoices::services::payment_reconciler::PaymentStateReconciler;

/// Default number of invoices in the "recent" list
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

/// Service for invoice business logic.
///
/// Every mutation loads the stored invoice, computes the complete new record
/// in memory and persists it with a single write. If loading fails, nothing
/// is written.
pub struct InvoiceService {
    invoice_repo: Arc<dyn InvoiceRepository>,
    calculator: InvoiceCalculator,
    recent_limit: u32,
}

impl InvoiceService {
    pub fn new(invoice_repo: Arc<dyn InvoiceRepository>) -> Self {
        Self::with_recent_limit(invoice_repo, DEFAULT_RECENT_LIMIT)
    }

    pub fn with_recent_limit(invoice_repo: Arc<dyn InvoiceRepository>, recent_limit: u32) -> Self {
        Self {
            invoice_repo,
            calculator: InvoiceCalculator::new(),
            recent_limit,
        }
    }

    /// Recalculate amounts for the editor from raw form input. No I/O.
    pub fn calculate(&self, request: &CalculationRequest) -> CalculationResponse {
        let items = request.line_items();
        let amounts =
            self.calculator
                .compute(&items, &request.tax, &request.advance, request.received());
        let currency = request.currency;

        CalculationResponse {
            currency,
            symbol: currency.symbol().to_string(),
            currency_label: currency.label(),
            amounts,
            formatted: amounts.formatted(currency),
            row_amounts: items
                .iter()
                .map(|item| currency.format_amount(item.amount()))
                .collect(),
        }
    }

    /// Create or update an invoice from the editor.
    ///
    /// The stored total is recomputed from the rows and the status is
    /// derived from the received amount. A status sent by the caller is
    /// ignored. Closing is only done by [`InvoiceService::close`], and an
    /// invoice that is already closed stays closed through edits.
    ///
    /// # Errors
    /// * `Validation` when a new invoice has no client or the received
    ///   amount is negative
    /// * `NotFound` when updating an id that does not exist
    pub async fn save_invoice(&self, mut invoice: Invoice) -> Result<Invoice> {
        if invoice.received_amount < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Received amount cannot be negative, got: {}",
                invoice.received_amount
            )));
        }

        let now = Utc::now();
        match &invoice.id {
            Some(id) => {
                let stored = self.load(id).await?;
                invoice.status = if stored.is_closed() {
                    InvoiceStatus::Closed
                } else {
                    InvoiceStatus::Open
                };
                invoice.created_at = stored.created_at;
            }
            None => {
                let has_client = invoice
                    .client_id
                    .as_deref()
                    .is_some_and(|id| !id.trim().is_empty());
                if !has_client {
                    return Err(AppError::validation(
                        "Cannot save a new invoice without a client",
                    ));
                }
                invoice.status = InvoiceStatus::Open;
                invoice.created_at = Some(now);
            }
        }

        invoice.refresh_total();
        PaymentStateReconciler::reconcile(&mut invoice)?;
        invoice.updated_at = Some(now);

        let id = self.invoice_repo.save(&invoice).await?;
        invoice.id = Some(id.clone());

        info!(
            invoice_id = %id,
            total = %invoice.total_amount,
            received = %invoice.received_amount,
            status = %invoice.status,
            "Invoice saved"
        );

        Ok(invoice)
    }

    /// Get invoice by ID
    pub async fn get_invoice(&self, id: &str) -> Result<Invoice> {
        self.load(id).await
    }

    /// Most recent invoices, newest first
    pub async fn list_recent(&self, limit: Option<u32>) -> Result<Vec<Invoice>> {
        let limit = limit.unwrap_or(self.recent_limit);
        self.invoice_repo.list_recent(limit).await
    }

    /// Invoices of one client, newest first
    pub async fn list_by_client(&self, client_id: &str) -> Result<Vec<Invoice>> {
        if client_id.trim().is_empty() {
            return Err(AppError::validation("Client id is required"));
        }

        let mut invoices = self.invoice_repo.find_by_client(client_id).await?;
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    /// Permanently delete an invoice
    pub async fn delete_invoice(&self, id: &str) -> Result<()> {
        self.invoice_repo.delete(id).await?;
        warn!(invoice_id = %id, "Invoice deleted");
        Ok(())
    }

    /// Set the received amount to `amount` (custom pay)
    pub async fn record_payment(&self, id: &str, amount: Decimal) -> Result<Invoice> {
        self.transition(id, "record_payment", |invoice| {
            PaymentStateReconciler::record_payment(invoice, amount)
        })
        .await
    }

    /// Quick action: received = stored total
    pub async fn pay_in_full(&self, id: &str) -> Result<Invoice> {
        self.transition(id, "pay_in_full", PaymentStateReconciler::pay_in_full)
            .await
    }

    /// Quick action: received = stored total / 2
    pub async fn pay_half(&self, id: &str) -> Result<Invoice> {
        self.transition(id, "pay_half", PaymentStateReconciler::pay_half)
            .await
    }

    /// Mark fully paid (received = total) or unpaid (received = 0)
    pub async fn mark_paid(&self, id: &str, paid: bool) -> Result<Invoice> {
        self.transition(id, "mark_paid", |invoice| {
            PaymentStateReconciler::mark_paid(invoice, paid)
        })
        .await
    }

    /// Void an invoice; only a later payment reopens it
    pub async fn close(&self, id: &str) -> Result<Invoice> {
        self.transition(id, "close", |invoice| {
            PaymentStateReconciler::close(invoice);
            Ok(())
        })
        .await
    }

    /// Build an unsaved copy of a stored invoice, dated `today`
    pub async fn duplicate(&self, id: &str, today: NaiveDate) -> Result<Invoice> {
        let source = self.load(id).await?;
        let copy = source.duplicate(today);

        info!(
            source_id = %id,
            number = %copy.number,
            received = %copy.received_amount,
            status = %copy.status,
            "Invoice duplicated"
        );

        Ok(copy)
    }

    async fn load(&self, id: &str) -> Result<Invoice> {
        self.invoice_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))
    }

    async fn transition<F>(&self, id: &str, action: &'static str, apply: F) -> Result<Invoice>
    where
        F: FnOnce(&mut Invoice) -> Result<()>,
    {
        let mut invoice = self.load(id).await?;
        let previous = invoice.status;

        apply(&mut invoice)?;
        invoice.updated_at = Some(Utc::now());
        self.invoice_repo.save(&invoice).await?;

        info!(
            invoice_id = %id,
            action,
            from = %previous,
            to = %invoice.status,
            received = %invoice.received_amount,
            total = %invoice.total_amount,
            "Payment state updated"
        );

        Ok(invoice)
    }
}
