// Clients module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Client, ClientSummary, CreateClientRequest};
pub use repositories::{ClientRepository, MySqlClientRepository};
pub use services::ClientService;
