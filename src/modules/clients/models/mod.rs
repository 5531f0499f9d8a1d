mod client;
mod client_summary;

pub use client::{Client, CreateClientRequest};
pub use client_summary::{ClientInvoices, ClientSummary};
