//! Billbook invoicing and client-billing library
//!
//! Invoice amount calculation, payment state reconciliation, client
//! management and outstanding-balance reporting behind an HTTP API.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::clients;
pub use modules::invoices;
pub use modules::reports;
pub use modules::taxes;

use actix_web::web;

/// Mount every `/api` route group
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(invoices::controllers::configure)
            .configure(clients::controllers::configure)
            .configure(reports::controllers::configure),
    );
}
