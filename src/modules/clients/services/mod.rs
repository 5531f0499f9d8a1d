pub mod client_service;

pub use client_service::{ClientService, DEFAULT_CLIENT_CACHE_TTL_SECS};
