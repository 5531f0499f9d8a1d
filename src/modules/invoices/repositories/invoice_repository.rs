// Invoice storage.
//
// Invoices are stored document-style: one row per invoice with the line
// items serialized as JSON text, mirroring how the browser client reads
// and writes whole invoice records. Amounts and percentages are stored as
// their exact decimal text, so a value reads back with the scale it was
// written with.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::core::{AppError, Currency, Result};
use crate::modules::invoices::models::{AdvanceBase, AdvanceSetting, Invoice, InvoiceStatus, LineItem};
use crate::modules::taxes::models::TaxSetting;

/// Storage collaborator for invoices.
///
/// Every call may fail with `AppError::Database` when the store is
/// unreachable or refuses the operation.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Fetch one invoice, `None` when no such id exists
    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>>;

    /// Insert when `invoice.id` is `None`, otherwise replace the stored
    /// record in a single write. Returns the invoice id.
    async fn save(&self, invoice: &Invoice) -> Result<String>;

    /// Delete one invoice; `NotFound` if it does not exist
    async fn delete(&self, id: &str) -> Result<()>;

    /// All invoices of a client, newest first
    async fn find_by_client(&self, client_id: &str) -> Result<Vec<Invoice>>;

    /// Most recently created invoices, newest first
    async fn list_recent(&self, limit: u32) -> Result<Vec<Invoice>>;

    /// Every invoice, newest first
    async fn list_all(&self) -> Result<Vec<Invoice>>;
}

/// MySQL-backed invoice repository
pub struct MySqlInvoiceRepository {
    pool: MySqlPool,
}

impl MySqlInvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, id: &str, invoice: &Invoice) -> Result<()> {
        let items = encode_items(invoice)?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, client_id, client_name, client_address, client_contact,
                number, issue_date, due_date, remark, currency, items,
                tax_enabled, tax_percentage, advance_enabled, advance_percentage, advance_base,
                received_amount, total_amount, is_fully_paid, status,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&invoice.client_id)
        .bind(&invoice.client_name)
        .bind(&invoice.client_address)
        .bind(&invoice.client_contact)
        .bind(&invoice.number)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(&invoice.remark)
        .bind(invoice.currency.code())
        .bind(items)
        .bind(invoice.tax.enabled)
        .bind(decimal_text(invoice.tax.percentage))
        .bind(invoice.advance.enabled)
        .bind(decimal_text(invoice.advance.percentage))
        .bind(advance_base_code(invoice.advance.base))
        .bind(decimal_text(invoice.received_amount))
        .bind(decimal_text(invoice.total_amount))
        .bind(invoice.is_fully_paid)
        .bind(invoice.status.to_string())
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: &str, invoice: &Invoice) -> Result<()> {
        let items = encode_items(invoice)?;

        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                client_id = ?, client_name = ?, client_address = ?, client_contact = ?,
                number = ?, issue_date = ?, due_date = ?, remark = ?, currency = ?, items = ?,
                tax_enabled = ?, tax_percentage = ?,
                advance_enabled = ?, advance_percentage = ?, advance_base = ?,
                received_amount = ?, total_amount = ?, is_fully_paid = ?, status = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&invoice.client_id)
        .bind(&invoice.client_name)
        .bind(&invoice.client_address)
        .bind(&invoice.client_contact)
        .bind(&invoice.number)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(&invoice.remark)
        .bind(invoice.currency.code())
        .bind(items)
        .bind(invoice.tax.enabled)
        .bind(decimal_text(invoice.tax.percentage))
        .bind(invoice.advance.enabled)
        .bind(decimal_text(invoice.advance.percentage))
        .bind(advance_base_code(invoice.advance.base))
        .bind(decimal_text(invoice.received_amount))
        .bind(decimal_text(invoice.total_amount))
        .bind(invoice.is_fully_paid)
        .bind(invoice.status.to_string())
        .bind(invoice.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Invoice with id '{}' not found", id)));
        }

        Ok(())
    }
}

const SELECT_INVOICE: &str = r#"
    SELECT
        id, client_id, client_name, client_address, client_contact,
        number, issue_date, due_date, remark, currency, items,
        tax_enabled, tax_percentage, advance_enabled, advance_percentage, advance_base,
        received_amount, total_amount, is_fully_paid, status,
        created_at, updated_at
    FROM invoices
"#;

#[async_trait]
impl InvoiceRepository for MySqlInvoiceRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!("{} WHERE id = ?", SELECT_INVOICE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(InvoiceRow::into_invoice).transpose()
    }

    async fn save(&self, invoice: &Invoice) -> Result<String> {
        match &invoice.id {
            Some(id) => {
                self.update(id, invoice).await?;
                Ok(id.clone())
            }
            None => {
                let id = Uuid::new_v4().to_string();
                self.insert(&id, invoice).await?;
                Ok(id)
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Invoice with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn find_by_client(&self, client_id: &str) -> Result<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "{} WHERE client_id = ? ORDER BY created_at DESC",
            SELECT_INVOICE
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InvoiceRow::into_invoice).collect()
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "{} ORDER BY created_at DESC LIMIT ?",
            SELECT_INVOICE
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InvoiceRow::into_invoice).collect()
    }

    async fn list_all(&self) -> Result<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "{} ORDER BY created_at DESC",
            SELECT_INVOICE
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InvoiceRow::into_invoice).collect()
    }
}

fn encode_items(invoice: &Invoice) -> Result<String> {
    serde_json::to_string(&invoice.items)
        .map_err(|e| AppError::Internal(format!("Failed to encode line items: {}", e)))
}

fn decimal_text(value: Decimal) -> String {
    value.to_string()
}

fn parse_stored_decimal(invoice_id: &str, column: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| {
        AppError::Internal(format!(
            "Invalid {} '{}' in database for invoice {}: {}",
            column, raw, invoice_id, e
        ))
    })
}

fn advance_base_code(base: AdvanceBase) -> &'static str {
    match base {
        AdvanceBase::Subtotal => "subtotal",
        AdvanceBase::Total => "total",
    }
}

// Helper struct for database mapping

#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: String,
    client_id: Option<String>,
    client_name: String,
    client_address: Option<String>,
    client_contact: Option<String>,
    number: String,
    issue_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    remark: String,
    currency: String,
    items: String,
    tax_enabled: bool,
    tax_percentage: String,
    advance_enabled: bool,
    advance_percentage: String,
    advance_base: String,
    received_amount: String,
    total_amount: String,
    is_fully_paid: bool,
    status: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl InvoiceRow {
    fn into_invoice(self) -> Result<Invoice> {
        let items: Vec<LineItem> = serde_json::from_str(&self.items).map_err(|e| {
            AppError::Internal(format!("Corrupt line items for invoice {}: {}", self.id, e))
        })?;
        let tax_percentage = parse_stored_decimal(&self.id, "tax_percentage", &self.tax_percentage)?;
        let advance_percentage =
            parse_stored_decimal(&self.id, "advance_percentage", &self.advance_percentage)?;
        let received_amount =
            parse_stored_decimal(&self.id, "received_amount", &self.received_amount)?;
        let total_amount = parse_stored_decimal(&self.id, "total_amount", &self.total_amount)?;
        let status = InvoiceStatus::from_str(&self.status)
            .map_err(|e| AppError::Internal(format!("Invalid status in database: {}", e)))?;
        let advance_base = match self.advance_base.as_str() {
            "subtotal" => AdvanceBase::Subtotal,
            _ => AdvanceBase::Total,
        };

        Ok(Invoice {
            id: Some(self.id),
            client_id: self.client_id,
            client_name: self.client_name,
            client_address: self.client_address,
            client_contact: self.client_contact,
            number: self.number,
            issue_date: self.issue_date,
            due_date: self.due_date,
            remark: self.remark,
            currency: Currency::from_code_or_default(&self.currency),
            items,
            tax: TaxSetting::new(self.tax_enabled, tax_percentage),
            advance: AdvanceSetting::new(self.advance_enabled, advance_percentage, advance_base),
            received_amount,
            total_amount,
            is_fully_paid: self.is_fully_paid,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
