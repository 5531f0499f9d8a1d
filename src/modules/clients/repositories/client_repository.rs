use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::clients::models::{Client, CreateClientRequest};

/// Storage collaborator for clients
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// All clients ordered by name
    async fn list(&self) -> Result<Vec<Client>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Client>>;

    /// Insert a client with a fresh id
    async fn add(&self, request: &CreateClientRequest) -> Result<Client>;

    /// Delete one client; `NotFound` if it does not exist.
    /// Does not touch the client's invoices.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// MySQL-backed client repository
pub struct MySqlClientRepository {
    pool: MySqlPool,
}

impl MySqlClientRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for MySqlClientRepository {
    async fn list(&self) -> Result<Vec<Client>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            "SELECT id, name, address, contact, created_at FROM clients ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Client::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Client>> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT id, name, address, contact, created_at FROM clients WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Client::from))
    }

    async fn add(&self, request: &CreateClientRequest) -> Result<Client> {
        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: request.name.clone(),
            address: request.address.clone(),
            contact: request.contact.clone(),
            created_at: Some(Utc::now()),
        };

        sqlx::query(
            "INSERT INTO clients (id, name, address, contact, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.address)
        .bind(&client.contact)
        .bind(client.created_at)
        .execute(&self.pool)
        .await?;

        Ok(client)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Client with id '{}' not found", id)));
        }

        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct ClientRow {
    id: String,
    name: String,
    address: Option<String>,
    contact: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            name: row.name,
            address: row.address,
            contact: row.contact,
            created_at: row.created_at,
        }
    }
}
