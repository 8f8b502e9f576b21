//! Instrument catalog and base-price seeding

use crate::error::{Result, SimError};
use crate::types::Price;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display symbols offered by the dashboard, in catalog order
pub const ALL_CURRENCY_PAIRS: [&str; 45] = [
    "AED/CNY OTC", "AUD/CAD", "AUD/CAD OTC", "AUD/CHF", "AUD/CHF OTC", "AUD/JPY OTC",
    "AUD/NZD OTC", "AUD/USD", "AUD/USD OTC", "CAD/JPY OTC", "CHF/JPY OTC", "CHF/NOK OTC",
    "EUR/AUD", "EUR/CAD", "EUR/CHF OTC", "EUR/GBP", "EUR/GBP OTC", "EUR/JPY OTC",
    "EUR/NZD OTC", "EUR/RUB OTC", "EUR/USD", "EUR/USD OTC", "GBP/CAD", "GBP/USD",
    "GBP/USD OTC", "JOD/CNY OTC", "KES/USD OTC", "NGN/USD OTC", "NZD/USD", "OMR/CNY OTC",
    "QAR/CNY OTC", "TND/USD OTC", "UAH/USD OTC", "USD/CAD", "USD/CHF", "USD/DZD OTC",
    "USD/INR OTC", "USD/JPY", "USD/MXN OTC", "USD/MYR OTC", "USD/PHP OTC", "USD/PKR OTC",
    "USD/RUB OTC", "USD/SGD OTC", "YER/USD OTC",
];

/// G10 currencies treated as majors
const MAJOR_CURRENCIES: [&str; 8] = ["USD", "EUR", "GBP", "JPY", "CHF", "CAD", "AUD", "NZD"];

/// Approximate value of one unit of each currency in USD
const USD_REFERENCE: [(&str, f64); 27] = [
    ("USD", 1.0),
    ("EUR", 1.08),
    ("GBP", 1.27),
    ("JPY", 0.0067),
    ("CHF", 1.12),
    ("CAD", 0.73),
    ("AUD", 0.66),
    ("NZD", 0.61),
    ("CNY", 0.138),
    ("AED", 0.2723),
    ("NOK", 0.094),
    ("RUB", 0.011),
    ("JOD", 1.41),
    ("KES", 0.0077),
    ("NGN", 0.00066),
    ("OMR", 2.597),
    ("QAR", 0.2747),
    ("TND", 0.32),
    ("UAH", 0.024),
    ("DZD", 0.0074),
    ("INR", 0.012),
    ("MXN", 0.058),
    ("MYR", 0.213),
    ("PHP", 0.0175),
    ("PKR", 0.0036),
    ("SGD", 0.74),
    ("YER", 0.004),
];

/// Reference price used when a symbol cannot be priced from the table
pub const DEFAULT_BASE_PRICE: Price = 1.0;

/// Broad instrument class, controls the seeding spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentCategory {
    /// Both legs are G10 currencies
    Major,
    /// Anything involving an emerging-market or pegged currency
    Exotic,
}

impl InstrumentCategory {
    /// Half-width of the uniform jitter applied to the seeded base price
    pub fn seed_jitter(&self) -> f64 {
        match self {
            InstrumentCategory::Major => 0.002,
            InstrumentCategory::Exotic => 0.01,
        }
    }
}

impl fmt::Display for InstrumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentCategory::Major => write!(f, "Major"),
            InstrumentCategory::Exotic => write!(f, "Exotic"),
        }
    }
}

/// A parsed currency pair symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    /// Base currency code
    pub base: String,
    /// Quote currency code
    pub quote: String,
    /// OTC variant; mechanically identical, only a distinct symbol
    pub otc: bool,
}

impl Instrument {
    /// Parse a `BASE/QUOTE[ OTC]` symbol
    pub fn parse(symbol: &str) -> Result<Self> {
        let normalized = symbol.trim().to_uppercase();
        let (pair, otc) = match normalized.strip_suffix("OTC") {
            Some(rest) => (rest.trim_end(), true),
            None => (normalized.as_str(), false),
        };

        let (base, quote) = pair
            .split_once('/')
            .ok_or_else(|| SimError::UnknownInstrument(symbol.to_string()))?;
        let base = base.trim().to_string();
        let quote = quote.trim().to_string();

        let is_code = |code: &str| code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic());
        if !is_code(&base) || !is_code(&quote) {
            return Err(SimError::UnknownInstrument(symbol.to_string()));
        }

        Ok(Self { base, quote, otc })
    }

    /// Canonical display symbol
    pub fn symbol(&self) -> String {
        if self.otc {
            format!("{}/{} OTC", self.base, self.quote)
        } else {
            format!("{}/{}", self.base, self.quote)
        }
    }

    /// Get the instrument category
    pub fn category(&self) -> InstrumentCategory {
        let major = |code: &str| MAJOR_CURRENCIES.contains(&code);
        if major(&self.base) && major(&self.quote) {
            InstrumentCategory::Major
        } else {
            InstrumentCategory::Exotic
        }
    }

    /// Cross rate implied by the USD reference table, if both legs are known
    pub fn reference_price(&self) -> Option<Price> {
        let base = usd_value(&self.base)?;
        let quote = usd_value(&self.quote)?;
        Some(base / quote)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

fn usd_value(code: &str) -> Option<f64> {
    USD_REFERENCE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, v)| *v)
}

/// Category of an arbitrary symbol; unparseable symbols count as exotic
pub fn category_of(symbol: &str) -> InstrumentCategory {
    Instrument::parse(symbol)
        .map(|i| i.category())
        .unwrap_or(InstrumentCategory::Exotic)
}

/// Unjittered base price for a symbol, falling back to [`DEFAULT_BASE_PRICE`]
pub fn base_price(symbol: &str) -> Price {
    Instrument::parse(symbol)
        .ok()
        .and_then(|i| i.reference_price())
        .filter(|p| p.is_finite() && *p > 0.0)
        .unwrap_or(DEFAULT_BASE_PRICE)
}

/// Display decimals for a price level
pub fn price_precision(price: Price) -> usize {
    if price >= 20.0 {
        3
    } else {
        5
    }
}

/// Symbols of the default universe
pub fn default_universe() -> Vec<String> {
    ALL_CURRENCY_PAIRS.iter().map(|s| s.to_string()).collect()
}
