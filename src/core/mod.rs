pub mod amount;
pub mod cache;
pub mod currency;
pub mod error;

pub use cache::CachedValue;
pub use currency::Currency;
pub use error::{AppError, Result};
