use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display precision shared by every supported currency
pub const DISPLAY_SCALE: u32 = 2;

/// Supported invoice currencies.
///
/// Currency only changes how amounts are rendered; no conversion is
/// ever applied to stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    /// Indian Rupee
    #[default]
    INR,
    /// US Dollar
    USD,
    /// UAE Dirham
    AED,
    /// Saudi Riyal
    SAR,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::INR, Currency::USD, Currency::AED, Currency::SAR];

    /// ISO code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::AED => "AED",
            Currency::SAR => "SAR",
        }
    }

    /// Prefix placed directly in front of a formatted amount.
    /// AED and SAR carry their own trailing space.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "₹",
            Currency::USD => "$",
            Currency::AED => "AED ",
            Currency::SAR => "SAR ",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::INR => "Indian Rupee",
            Currency::USD => "US Dollar",
            Currency::AED => "UAE Dirham",
            Currency::SAR => "Saudi Riyal",
        }
    }

    /// Resolve a currency code, falling back to INR for anything unrecognized
    pub fn from_code_or_default(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    /// Rounds a value to display precision. Only used when rendering.
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Formats an amount as `{symbol}{amount fixed to 2 decimals}`.
    ///
    /// Negative values are rendered as-is, e.g. `₹-100.00`.
    pub fn format_amount(&self, amount: Decimal) -> String {
        format!(
            "{}{:.width$}",
            self.symbol(),
            self.round(amount),
            width = DISPLAY_SCALE as usize
        )
    }

    /// Header label used by the invoice editor, e.g. `₹ INR (Indian Rupee)`
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.symbol().trim_end(), self.code(), self.display_name())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INR" => Ok(Currency::INR),
            "USD" => Ok(Currency::USD),
            "AED" => Ok(Currency::AED),
            "SAR" => Ok(Currency::SAR),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Currency::from_code_or_default(&s)
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}
