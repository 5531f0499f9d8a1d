pub mod models;
pub mod services;

pub use models::TaxSetting;
pub use services::TaxCalculator;
