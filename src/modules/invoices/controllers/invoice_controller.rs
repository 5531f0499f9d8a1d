use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::core::amount::parse_decimal;
use crate::core::error::AppError;
use crate::modules::invoices::models::{CalculationRequest, Invoice, InvoiceResponse};
use crate::modules::invoices::services::InvoiceService;

/// Query parameters for listing invoices
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    pub limit: Option<u32>,
}

/// Custom received amount typed by the operator
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    #[serde(deserialize_with = "crate::modules::invoices::models::raw_field")]
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkPaidRequest {
    pub paid: bool,
}

/// Live recalculation for the editor
/// POST /invoices/calculate
pub async fn calculate(
    service: web::Data<Arc<InvoiceService>>,
    request: web::Json<CalculationRequest>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.calculate(&request)))
}

/// Create or update an invoice
/// POST /invoices
pub async fn save_invoice(
    service: web::Data<Arc<InvoiceService>>,
    request: web::Json<Invoice>,
) -> Result<HttpResponse, AppError> {
    let invoice = request.into_inner();
    let is_new = invoice.id.is_none();
    let saved = service.save_invoice(invoice).await?;

    let response = InvoiceResponse::from(saved);
    if is_new {
        Ok(HttpResponse::Created().json(response))
    } else {
        Ok(HttpResponse::Ok().json(response))
    }
}

/// Get invoice by ID
/// GET /invoices/{id}
pub async fn get_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.get_invoice(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}

/// List recent invoices
/// GET /invoices
pub async fn list_invoices(
    service: web::Data<Arc<InvoiceService>>,
    query: web::Query<ListInvoicesQuery>,
) -> Result<HttpResponse, AppError> {
    let invoices = service.list_recent(query.limit).await?;
    let response: Vec<InvoiceResponse> = invoices.into_iter().map(InvoiceResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Delete invoice
/// DELETE /invoices/{id}
pub async fn delete_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_invoice(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Record a custom received amount
/// POST /invoices/{id}/payments
pub async fn record_payment(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
    request: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let amount = parse_decimal(&request.amount)
        .ok_or_else(|| AppError::validation(format!("Invalid amount: '{}'", request.amount)))?;

    let invoice = service.record_payment(&path.into_inner(), amount).await?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}

/// POST /invoices/{id}/pay-full
pub async fn pay_in_full(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.pay_in_full(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}

/// POST /invoices/{id}/pay-half
pub async fn pay_half(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.pay_half(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}

/// POST /invoices/{id}/mark-paid
pub async fn mark_paid(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
    request: web::Json<MarkPaidRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.mark_paid(&path.into_inner(), request.paid).await?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}

/// Close (void) an invoice
/// POST /invoices/{id}/close
pub async fn close_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.close(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}

/// Unsaved copy of an invoice, dated today
/// POST /invoices/{id}/duplicate
pub async fn duplicate_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let today = Utc::now().date_naive();
    let copy = service.duplicate(&path.into_inner(), today).await?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::from(copy)))
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::post().to(save_invoice))
            .route("", web::get().to(list_invoices))
            .route("/calculate", web::post().to(calculate))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}", web::delete().to(delete_invoice))
            .route("/{id}/payments", web::post().to(record_payment))
            .route("/{id}/pay-full", web::post().to(pay_in_full))
            .route("/{id}/pay-half", web::post().to(pay_half))
            .route("/{id}/mark-paid", web::post().to(mark_paid))
            .route("/{id}/close", web::post().to(close_invoice))
            .route("/{id}/duplicate", web::post().to(duplicate_invoice)),
    );
}
