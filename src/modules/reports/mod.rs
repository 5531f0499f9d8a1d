pub mod controllers;
pub mod models;
pub mod services;

pub use models::{ClientTotals, OutstandingReport, ReportPeriod, UNKNOWN_CLIENT};
pub use services::ReportService;
