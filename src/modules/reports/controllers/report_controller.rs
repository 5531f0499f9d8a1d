use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::reports::models::ReportPeriod;
use crate::modules::reports::services::ReportService;

/// Query parameters for the outstanding report
#[derive(Debug, Deserialize)]
pub struct OutstandingReportQuery {
    /// `all`, `this_month`, `last_month` or `this_year`
    #[serde(default)]
    pub period: ReportPeriod,
    /// Client name, or `all`
    #[serde(default)]
    pub client: Option<String>,
}

/// GET /reports/outstanding
///
/// Invoiced, received and due totals for non-closed invoices, overall and
/// per client.
pub async fn outstanding_report(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<OutstandingReportQuery>,
) -> Result<HttpResponse, AppError> {
    let report = service
        .outstanding(query.period, query.client.as_deref(), Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports").route("/outstanding", web::get().to(outstanding_report)),
    );
}
