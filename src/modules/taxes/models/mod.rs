mod tax;

pub use tax::TaxSetting;
