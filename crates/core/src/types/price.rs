//! Currency codes and price formatting for decimal amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Currency symbol used as display prefix.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$ ",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Decimal separator used by the currency's home locale.
    #[must_use]
    pub const fn decimal_separator(&self) -> char {
        match self {
            Self::BRL | Self::EUR => ',',
            Self::USD | Self::GBP => '.',
        }
    }
}

/// Format a decimal amount with two fraction digits and the currency symbol.
#[must_use]
pub fn format_price(amount: Decimal, currency_code: CurrencyCode) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let localized = match currency_code.decimal_separator() {
        '.' => fixed,
        sep => fixed.replace('.', &sep.to_string()),
    };
    format!("{}{localized}", currency_code.symbol())
}
