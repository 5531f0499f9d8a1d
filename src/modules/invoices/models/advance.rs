use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Percentage pre-filled when advance is first switched on
pub const DEFAULT_ADVANCE_PERCENTAGE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Amount the advance percentage is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvanceBase {
    /// Pre-tax subtotal
    Subtotal,
    /// Post-tax total
    #[default]
    Total,
}

impl std::fmt::Display for AdvanceBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvanceBase::Subtotal => write!(f, "Subtotal"),
            AdvanceBase::Total => write!(f, "Total Amount"),
        }
    }
}

/// Quoted advance payment. Shown on the invoice for information only; it is
/// never deducted from the total or from the balance due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceSetting {
    pub enabled: bool,
    pub percentage: Decimal,
    #[serde(default)]
    pub base: AdvanceBase,
}

impl AdvanceSetting {
    pub fn new(enabled: bool, percentage: Decimal, base: AdvanceBase) -> Self {
        Self {
            enabled,
            percentage,
            base,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, DEFAULT_ADVANCE_PERCENTAGE, AdvanceBase::Total)
    }
}

impl Default for AdvanceSetting {
    fn default() -> Self {
        Self::disabled()
    }
}
