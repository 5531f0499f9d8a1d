use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::clients::models::CreateClientRequest;
use crate::modules::clients::services::ClientService;

/// List clients ordered by name
/// GET /clients
pub async fn list_clients(
    service: web::Data<Arc<ClientService>>,
) -> Result<HttpResponse, AppError> {
    let clients = service.list_clients().await?;
    Ok(HttpResponse::Ok().json(clients))
}

/// Add a client
/// POST /clients
pub async fn add_client(
    service: web::Data<Arc<ClientService>>,
    request: web::Json<CreateClientRequest>,
) -> Result<HttpResponse, AppError> {
    let client = service.add_client(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(client))
}

/// Delete a client and all of its invoices
/// DELETE /clients/{id}
pub async fn delete_client(
    service: web::Data<Arc<ClientService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_client(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /clients/{id}/invoices
pub async fn client_invoices(
    service: web::Data<Arc<ClientService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = service.client_invoices(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Configure client routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clients")
            .route("", web::get().to(list_clients))
            .route("", web::post().to(add_client))
            .route("/{id}", web::delete().to(delete_client))
            .route("/{id}/invoices", web::get().to(client_invoices)),
    );
}
