use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use billbook::config::{AppConfig, Config};
use billbook::middleware::{json_error_handler, query_error_handler, RequestId};
use billbook::modules::clients::{ClientService, MySqlClientRepository};
use billbook::modules::health;
use billbook::modules::invoices::{InvoiceService, MySqlInvoiceRepository};
use billbook::modules::reports::ReportService;

fn init_tracing(app: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("billbook={},actix_web=info", app.log_level).into());

    if app.json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(&config.app);

    tracing::info!("Starting Billbook");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    let invoice_repo = Arc::new(MySqlInvoiceRepository::new(db_pool.clone()));
    let client_repo = Arc::new(MySqlClientRepository::new(db_pool));

    let invoice_service = Arc::new(InvoiceService::with_recent_limit(
        invoice_repo.clone(),
        config.app.recent_invoice_limit,
    ));
    let client_service = Arc::new(
        ClientService::with_cache_ttl(
            client_repo,
            invoice_service.clone(),
            chrono::Duration::seconds(config.app.client_cache_ttl_secs),
        )
        .with_default_currency(config.app.default_currency),
    );
    let report_service = Arc::new(ReportService::new(invoice_repo));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::Data::new(invoice_service.clone()))
            .app_data(web::Data::new(client_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .configure(health::controllers::configure)
            .configure(billbook::configure_api)
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
