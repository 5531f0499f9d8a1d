use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::core::{AppError, CachedValue, Currency, Result};
use crate::modules::clients::models::{Client, ClientInvoices, CreateClientRequest};
use crate::modules::clients::repositories::ClientRepository;
use crate::modules::invoices::services::InvoiceService;

/// Client list cache lifetime when none is configured
pub const DEFAULT_CLIENT_CACHE_TTL_SECS: i64 = 300;

/// Service for client management.
///
/// Owns the cached client list. Every write through this service
/// invalidates the cache.
pub struct ClientService {
    client_repo: Arc<dyn ClientRepository>,
    invoice_service: Arc<InvoiceService>,
    cache: RwLock<CachedValue<Vec<Client>>>,
    cache_ttl: Duration,
    default_currency: Currency,
}

impl ClientService {
    pub fn new(client_repo: Arc<dyn ClientRepository>, invoice_service: Arc<InvoiceService>) -> Self {
        Self::with_cache_ttl(
            client_repo,
            invoice_service,
            Duration::seconds(DEFAULT_CLIENT_CACHE_TTL_SECS),
        )
    }

    pub fn with_cache_ttl(
        client_repo: Arc<dyn ClientRepository>,
        invoice_service: Arc<InvoiceService>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            client_repo,
            invoice_service,
            cache: RwLock::new(CachedValue::new()),
            cache_ttl,
            default_currency: Currency::default(),
        }
    }

    /// Currency reported in the summary of a client with no invoices
    pub fn with_default_currency(mut self, currency: Currency) -> Self {
        self.default_currency = currency;
        self
    }

    /// All clients ordered by name, served from cache while fresh
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        self.list_clients_at(Utc::now()).await
    }

    /// Same as [`ClientService::list_clients`] with an explicit check time.
    ///
    /// A refresh holds the write lock until the fetched list is stored, so
    /// an invalidation issued by a concurrent write lands after it.
    pub async fn list_clients_at(&self, now: DateTime<Utc>) -> Result<Vec<Client>> {
        let cached = self.cache.read().await.fresh(self.cache_ttl, now);
        if let Some(clients) = cached {
            debug!(count = clients.len(), "Serving clients from cache");
            return Ok(clients);
        }

        let mut cache = self.cache.write().await;
        if let Some(clients) = cache.fresh(self.cache_ttl, now) {
            return Ok(clients);
        }

        let clients = self.client_repo.list().await?;
        cache.store(clients.clone(), now);
        debug!(count = clients.len(), "Client cache refreshed");

        Ok(clients)
    }

    /// Add a client after trimming and validating its fields
    pub async fn add_client(&self, request: CreateClientRequest) -> Result<Client> {
        let request = request.normalized()?;
        let client = self.client_repo.add(&request).await?;
        self.cache.write().await.invalidate();

        info!(client_id = %client.id, name = %client.name, "Client added");
        Ok(client)
    }

    /// Delete a client and every invoice it owns.
    ///
    /// Invoices are deleted one at a time, then the client. The first
    /// failure stops the cascade and is reported as
    /// [`AppError::CascadeIncomplete`] with the number of invoices already
    /// removed; the client record is kept in that case.
    pub async fn delete_client(&self, client_id: &str) -> Result<()> {
        if self.client_repo.find_by_id(client_id).await?.is_none() {
            return Err(AppError::not_found(format!("Client {} not found", client_id)));
        }

        let invoices = self.invoice_service.list_by_client(client_id).await?;
        let total = invoices.len();
        let incomplete = |deleted: usize, reason: AppError| {
            error!(
                client_id = %client_id,
                deleted,
                total,
                error = %reason,
                "Client cascade stopped"
            );
            AppError::CascadeIncomplete {
                client_id: client_id.to_string(),
                deleted,
                total,
                reason: reason.to_string(),
            }
        };

        for (deleted, invoice) in invoices.iter().enumerate() {
            let Some(invoice_id) = invoice.id.as_deref() else {
                let reason = AppError::internal(format!(
                    "Stored invoice {} of client {} has no id",
                    invoice.number, client_id
                ));
                return Err(incomplete(deleted, reason));
            };
            if let Err(e) = self.invoice_service.delete_invoice(invoice_id).await {
                return Err(incomplete(deleted, e));
            }
        }

        if let Err(e) = self.client_repo.delete(client_id).await {
            return Err(incomplete(total, e));
        }

        self.cache.write().await.invalidate();
        warn!(client_id = %client_id, invoices_deleted = total, "Client deleted");

        Ok(())
    }

    /// A client's invoices, newest first, with the summary totals
    pub async fn client_invoices(&self, client_id: &str) -> Result<ClientInvoices> {
        let invoices = self.invoice_service.list_by_client(client_id).await?;
        Ok(ClientInvoices::new(client_id, invoices, self.default_currency))
    }
}
