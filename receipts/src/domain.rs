use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque identifier assigned to a stored score
pub type ReceiptId = String;

/// Reward point total
pub type Points = u64;

/// A two-decimal currency amount held as integer cents
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    cents: u64,
}

impl Amount {
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub const fn cents(&self) -> u64 {
        self.cents
    }

    pub const fn is_positive(&self) -> bool {
        self.cents > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("amount '{0}' must look like 12.34")]
    Format(String),
    #[error("amount '{0}' is too large")]
    Overflow(String),
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Accepts `^\d+\.\d{2}$` and nothing else
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || ParseAmountError::Format(s.to_string());

        let (whole, frac) = s.split_once('.').ok_or_else(format_err)?;
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || frac.len() != 2
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(format_err());
        }

        let whole: u64 = whole
            .parse()
            .map_err(|_| ParseAmountError::Overflow(s.to_string()))?;
        let frac: u64 = frac.parse().map_err(|_| format_err())?;

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .map(Amount::from_cents)
            .ok_or_else(|| ParseAmountError::Overflow(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineItem {
    pub short_description: String,
    pub price: Amount,
}

impl LineItem {
    pub fn new(short_description: impl Into<String>, price: Amount) -> Self {
        Self {
            short_description: short_description.into(),
            price,
        }
    }
}

/// A validated purchase. Date and time stay in their wire form
/// (`YYYY-MM-DD`, `HH:MM`) so scoring can degrade on bad input instead of failing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseRecord {
    pub retailer: String,
    pub purchase_date: String,
    pub purchase_time: String,
    pub items: Vec<LineItem>,
    pub total: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!("35.35".parse::<Amount>().unwrap().cents(), 3535);
        assert_eq!("0.05".parse::<Amount>().unwrap().cents(), 5);
        assert_eq!("100.00".parse::<Amount>().unwrap().cents(), 10_000);
    }

    #[test]
    fn test_parse_amount_rejects_bad_shapes() {
        for raw in ["", "10", "10.", "10.0", "10.000", ".25", "-1.00", "1,00", "1.2a", " 1.00"] {
            assert!(
                matches!(raw.parse::<Amount>(), Err(ParseAmountError::Format(_))),
                "expected format error for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_parse_amount_overflow() {
        let result = "999999999999999999999.00".parse::<Amount>();
        assert!(matches!(result, Err(ParseAmountError::Overflow(_))));
    }

    #[test]
    fn test_amount_display() {
        assert_eq!(Amount::from_cents(3535).to_string(), "35.35");
        assert_eq!(Amount::from_cents(900).to_string(), "9.00");
        assert_eq!(Amount::from_cents(5).to_string(), "0.05");
    }
}
