// In-memory storage collaborators for service and API tests.
//
// Include from a test crate with:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//
// Both repositories append every storage call to a shared `CallLog`, so a
// test can assert the exact sequence of writes a service performed.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use billbook::core::{AppError, Result};
use billbook::modules::clients::{Client, ClientRepository, ClientService, CreateClientRequest};
use billbook::modules::invoices::{Invoice, InvoiceRepository, InvoiceService, LineItem};
use billbook::modules::reports::ReportService;

/// Ordered record of storage calls, e.g. `"delete_invoice:inv-2"`
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Calls whose name starts with `prefix`
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

fn storage_error(call: &str) -> AppError {
    AppError::Database(sqlx::Error::Protocol(format!("storage unavailable during {}", call)))
}

/// Invoice store kept in a map, with failure injection
#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    invoices: Mutex<HashMap<String, Invoice>>,
    next_id: Mutex<u32>,
    log: CallLog,
    /// Zero-based index of the delete call that fails
    fail_delete_at: Mutex<Option<usize>>,
    deletes: Mutex<usize>,
    fail_reads: Mutex<bool>,
    fail_writes: Mutex<bool>,
}

impl InMemoryInvoiceRepository {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    /// Store an invoice as-is, bypassing the service
    pub fn seed(&self, mut invoice: Invoice) -> String {
        let id = match &invoice.id {
            Some(id) => id.clone(),
            None => self.allocate_id(),
        };
        invoice.id = Some(id.clone());
        self.invoices.lock().unwrap().insert(id.clone(), invoice);
        id
    }

    /// Store a record whose `id` field is missing, as a damaged row would
    /// read back. Returns the storage key.
    pub fn seed_without_id(&self, mut invoice: Invoice) -> String {
        let key = self.allocate_id();
        invoice.id = None;
        self.invoices.lock().unwrap().insert(key.clone(), invoice);
        key
    }

    pub fn stored(&self, id: &str) -> Option<Invoice> {
        self.invoices.lock().unwrap().get(id).cloned()
    }

    pub fn count(&self) -> usize {
        self.invoices.lock().unwrap().len()
    }

    pub fn fail_delete_at(&self, index: usize) {
        *self.fail_delete_at.lock().unwrap() = Some(index);
    }

    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    fn allocate_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("inv-{}", *next)
    }

    fn check_read(&self, call: &str) -> Result<()> {
        if *self.fail_reads.lock().unwrap() {
            return Err(storage_error(call));
        }
        Ok(())
    }

    fn newest_first(&self, mut invoices: Vec<Invoice>) -> Vec<Invoice> {
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        invoices
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        self.log.record(format!("get_invoice:{}", id));
        self.check_read("get_invoice")?;
        Ok(self.stored(id))
    }

    async fn save(&self, invoice: &Invoice) -> Result<String> {
        if *self.fail_writes.lock().unwrap() {
            self.log.record("save_invoice:failed");
            return Err(storage_error("save_invoice"));
        }

        let mut stored = invoice.clone();
        let id = match &invoice.id {
            Some(id) => {
                if !self.invoices.lock().unwrap().contains_key(id) {
                    return Err(AppError::not_found(format!("Invoice with id '{}' not found", id)));
                }
                id.clone()
            }
            None => self.allocate_id(),
        };
        stored.id = Some(id.clone());
        self.log.record(format!("save_invoice:{}", id));
        self.invoices.lock().unwrap().insert(id.clone(), stored);
        Ok(id)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let index = {
            let mut deletes = self.deletes.lock().unwrap();
            let index = *deletes;
            *deletes += 1;
            index
        };
        if *self.fail_delete_at.lock().unwrap() == Some(index) {
            self.log.record(format!("delete_invoice:{}:failed", id));
            return Err(storage_error("delete_invoice"));
        }

        self.log.record(format!("delete_invoice:{}", id));
        match self.invoices.lock().unwrap().remove(id) {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(format!("Invoice with id '{}' not found", id))),
        }
    }

    async fn find_by_client(&self, client_id: &str) -> Result<Vec<Invoice>> {
        self.log.record(format!("get_invoices_by_client:{}", client_id));
        self.check_read("get_invoices_by_client")?;
        let invoices = self
            .invoices
            .lock()
            .unwrap()
            .values()
            .filter(|invoice| invoice.client_id.as_deref() == Some(client_id))
            .cloned()
            .collect();
        Ok(self.newest_first(invoices))
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Invoice>> {
        self.log.record(format!("get_all_invoices:{}", limit));
        self.check_read("get_all_invoices")?;
        let all = self.invoices.lock().unwrap().values().cloned().collect();
        Ok(self
            .newest_first(all)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Invoice>> {
        self.log.record("get_all_invoices");
        self.check_read("get_all_invoices")?;
        let all = self.invoices.lock().unwrap().values().cloned().collect();
        Ok(self.newest_first(all))
    }
}

/// Client store kept in a vector
#[derive(Default)]
pub struct InMemoryClientRepository {
    clients: Mutex<Vec<Client>>,
    log: CallLog,
    fail_delete: Mutex<bool>,
}

impl InMemoryClientRepository {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn seed(&self, id: &str, name: &str) -> Client {
        let client = Client {
            id: id.to_string(),
            name: name.to_string(),
            address: None,
            contact: None,
            created_at: Some(Utc::now()),
        };
        self.clients.lock().unwrap().push(client.clone());
        client
    }

    pub fn exists(&self, id: &str) -> bool {
        self.clients.lock().unwrap().iter().any(|c| c.id == id)
    }

    pub fn fail_delete(&self, fail: bool) {
        *self.fail_delete.lock().unwrap() = fail;
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn list(&self) -> Result<Vec<Client>> {
        self.log.record("get_clients");
        let mut clients = self.clients.lock().unwrap().clone();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clients)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Client>> {
        self.log.record(format!("get_client:{}", id));
        Ok(self.clients.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn add(&self, request: &CreateClientRequest) -> Result<Client> {
        let id = format!("client-{}", self.clients.lock().unwrap().len() + 1);
        self.log.record(format!("add_client:{}", id));
        let client = Client {
            id,
            name: request.name.clone(),
            address: request.address.clone(),
            contact: request.contact.clone(),
            created_at: Some(Utc::now()),
        };
        self.clients.lock().unwrap().push(client.clone());
        Ok(client)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if *self.fail_delete.lock().unwrap() {
            self.log.record(format!("delete_client:{}:failed", id));
            return Err(storage_error("delete_client"));
        }

        self.log.record(format!("delete_client:{}", id));
        let mut clients = self.clients.lock().unwrap();
        let before = clients.len();
        clients.retain(|c| c.id != id);
        if clients.len() == before {
            return Err(AppError::not_found(format!("Client with id '{}' not found", id)));
        }
        Ok(())
    }
}

/// Services wired to shared in-memory repositories
pub struct TestContext {
    pub log: CallLog,
    pub invoice_repo: Arc<InMemoryInvoiceRepository>,
    pub client_repo: Arc<InMemoryClientRepository>,
    pub invoices: Arc<InvoiceService>,
    pub clients: Arc<ClientService>,
    pub reports: Arc<ReportService>,
}

impl TestContext {
    pub fn new() -> Self {
        let log = CallLog::new();
        let invoice_repo = Arc::new(InMemoryInvoiceRepository::new(log.clone()));
        let client_repo = Arc::new(InMemoryClientRepository::new(log.clone()));

        let invoices = Arc::new(InvoiceService::new(invoice_repo.clone()));
        let clients = Arc::new(ClientService::new(client_repo.clone(), invoices.clone()));
        let reports = Arc::new(ReportService::new(invoice_repo.clone()));

        Self {
            log,
            invoice_repo,
            client_repo,
            invoices,
            clients,
            reports,
        }
    }
}

/// Unsaved invoice with a single row of `rate × 1`
pub fn invoice_for(client_id: &str, client_name: &str, rate: Decimal) -> Invoice {
    let mut invoice = Invoice::new(client_id, client_name);
    invoice.number = "INV001".to_string();
    invoice.items = vec![LineItem::new("Services", rate, Decimal::ONE)];
    invoice
}

/// Stored invoice with an explicit creation time
pub fn stored_invoice(client_id: &str, client_name: &str, rate: Decimal, created_at: DateTime<Utc>) -> Invoice {
    let mut invoice = invoice_for(client_id, client_name, rate);
    invoice.refresh_total();
    invoice.created_at = Some(created_at);
    invoice.updated_at = Some(created_at);
    invoice
}

pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 30, 0).unwrap()
}
