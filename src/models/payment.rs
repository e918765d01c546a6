//! Checkout pricing and payment methods.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform commission in percent of the listed price.
pub const PLATFORM_FEE_PERCENT: u64 = 15;

/// How a booking's price is divided between the platform and the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Amount charged to the customer.
    pub total: u64,
    /// Platform commission.
    pub platform_fee: u64,
    /// Amount paid out to the worker.
    pub worker_earnings: u64,
}

impl FeeSplit {
    /// Splits a listed price.
    ///
    /// The fee is 15% of the price rounded to the nearest unit, halves rounding
    /// up. The worker receives the remainder, so the two parts always sum to
    /// the total. Computed in `u128`, so every `u64` price is exact.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
    pub const fn for_price(price: u64) -> Self {
        // fee <= price, so narrowing back to u64 is lossless
        let platform_fee =
            ((price as u128 * PLATFORM_FEE_PERCENT as u128 + 50) / 100) as u64;
        Self {
            total: price,
            platform_fee,
            worker_earnings: price - platform_fee,
        }
    }
}

/// Payment methods offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Safaricom mobile money.
    #[default]
    #[serde(rename = "M-Pesa")]
    MPesa,
    /// Airtel mobile money.
    #[serde(rename = "Airtel Money")]
    AirtelMoney,
    /// `PayPal` account.
    #[serde(rename = "PayPal")]
    PayPal,
    /// Cash on completion.
    #[serde(rename = "Cash")]
    Cash,
}

impl PaymentMethod {
    /// Returns all methods in checkout order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::MPesa, Self::AirtelMoney, Self::PayPal, Self::Cash]
    }

    /// Returns the display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MPesa => "M-Pesa",
            Self::AirtelMoney => "Airtel Money",
            Self::PayPal => "PayPal",
            Self::Cash => "Cash",
        }
    }

    /// Returns the two-letter badge code shown on receipts.
    #[must_use]
    pub const fn short_code(&self) -> &'static str {
        match self {
            Self::MPesa => "MP",
            Self::AirtelMoney => "AM",
            Self::PayPal => "PP",
            Self::Cash => "CS",
        }
    }

    /// Parses a method from its label or code. Case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "m-pesa" | "mpesa" | "mp" => Some(Self::MPesa),
            "airtel money" | "airtel" | "am" => Some(Self::AirtelMoney),
            "paypal" | "pp" => Some(Self::PayPal),
            "cash" | "cs" => Some(Self::Cash),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(2500, 375, 2125 ; "plumbing listing")]
    #[test_case(1500, 225, 1275 ; "tutoring listing")]
    #[test_case(1010, 152, 858 ; "half rounds up")]
    #[test_case(1003, 150, 853 ; "below half rounds down")]
    #[test_case(0, 0, 0 ; "free")]
    #[test_case(u64::MAX, 2_767_011_611_056_432_742, 15_679_732_462_653_118_873 ; "largest price")]
    fn test_fee_split(price: u64, fee: u64, earnings: u64) {
        let split = FeeSplit::for_price(price);
        assert_eq!(split.total, price);
        assert_eq!(split.platform_fee, fee);
        assert_eq!(split.worker_earnings, earnings);
    }

    #[test]
    fn test_payment_method_parse() {
        for method in PaymentMethod::all() {
            assert_eq!(PaymentMethod::parse(method.label()), Some(*method));
            assert_eq!(PaymentMethod::parse(method.short_code()), Some(*method));
        }
        assert_eq!(PaymentMethod::parse("bitcoin"), None);
    }
}
