// A line item is one billable row on an invoice: description, rate and
// quantity. Rows are edited field by field in the browser, so construction
// from raw form input never fails; unusable numbers simply contribute zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::amount::{non_negative, parse_amount, parse_decimal};

/// A single billable row. Owned by its invoice; identified only by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: String,

    /// Price per unit
    #[serde(default)]
    pub rate: Decimal,

    /// Quantity, `None` when the field is empty or unparsable
    #[serde(default, alias = "qty")]
    pub quantity: Option<Decimal>,
}

impl LineItem {
    pub fn new(description: impl Into<String>, rate: Decimal, quantity: Decimal) -> Self {
        Self {
            description: description.into(),
            rate,
            quantity: Some(quantity),
        }
    }

    /// Build a row from raw form input.
    ///
    /// An unparsable rate becomes `0`; an unparsable quantity is left absent.
    pub fn from_input(input: &LineItemInput) -> Self {
        Self {
            description: input.description.clone(),
            rate: parse_amount(&input.rate),
            quantity: parse_decimal(&input.quantity),
        }
    }

    /// Rate as used in calculations: negatives count as zero
    pub fn effective_rate(&self) -> Decimal {
        non_negative(self.rate)
    }

    /// Quantity as used in calculations: absent or negative counts as zero
    pub fn effective_quantity(&self) -> Decimal {
        self.quantity.map(non_negative).unwrap_or(Decimal::ZERO)
    }

    /// Row amount (rate × quantity), unrounded. Saturates at `Decimal::MAX`.
    pub fn amount(&self) -> Decimal {
        self.effective_rate().saturating_mul(self.effective_quantity())
    }
}

/// Raw row as typed by the operator.
///
/// Numeric fields accept either JSON strings or numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItemInput {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "raw_field")]
    pub rate: String,
    #[serde(default, alias = "qty", deserialize_with = "raw_field")]
    pub quantity: String,
}

impl LineItemInput {
    pub fn new(
        description: impl Into<String>,
        rate: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            rate: rate.into(),
            quantity: quantity.into(),
        }
    }
}

/// Accept `"12.5"`, `12.5` or `null` for a form field, keeping the raw text
pub(crate) fn raw_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}
