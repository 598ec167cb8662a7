//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision,
//! and every operation that combines two amounts checks that their
//! currencies match.
//!
//! Rounding policy: Banker's Rounding (`MidpointNearestEven`), applied
//! once per computed amount at the currency's minor-unit scale. Repeated
//! rounding of intermediate values is deliberately avoided.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Indonesian Rupiah
    Idr,
    /// Singapore Dollar
    Sgd,
    /// Japanese Yen
    Jpy,
}

impl Currency {
    /// Number of minor-unit decimal places for this currency.
    ///
    /// JPY has no minor unit; everything else here uses 2.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Jpy => 0,
            Self::Usd | Self::Eur | Self::Gbp | Self::Idr | Self::Sgd => 2,
        }
    }

    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Idr => "IDR",
            Self::Sgd => "SGD",
            Self::Jpy => "JPY",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "IDR" => Ok(Self::Idr),
            "SGD" => Ok(Self::Sgd),
            "JPY" => Ok(Self::Jpy),
            _ => Err(MoneyError::UnknownCurrency(s.to_string())),
        }
    }
}

/// Errors from money arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Two amounts in different currencies were combined without conversion.
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: Currency,
        /// Currency of the right operand.
        right: Currency,
    },

    /// Currency code is not recognized.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Exchange rate must be strictly positive.
    #[error("Exchange rate must be positive, got {0}")]
    NonPositiveRate(Decimal),

    /// Amount string could not be parsed as a decimal.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
/// Arithmetic that combines two `Money` values fails with
/// [`MoneyError::CurrencyMismatch`] unless the currencies are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The decimal amount.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a Money value from integer minor units (e.g. cents).
    #[must_use]
    pub fn from_minor_units(minor: i64, currency: Currency) -> Self {
        Self {
            amount: Decimal::new(minor, currency.minor_units()),
            currency,
        }
    }

    /// Parses a Money value from a decimal string.
    pub fn parse(s: &str, currency: Currency) -> Result<Self, MoneyError> {
        let amount: Decimal = s
            .trim()
            .parse()
            .map_err(|_| MoneyError::InvalidAmount(s.to_string()))?;
        Ok(Self { amount, currency })
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Adds another amount of the same currency.
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        self.require_same_currency(other)?;
        Ok(Self {
            amount: self.amount + other.amount,
            currency: self.currency,
        })
    }

    /// Subtracts another amount of the same currency.
    pub fn checked_sub(self, other: Self) -> Result<Self, MoneyError> {
        self.require_same_currency(other)?;
        Ok(Self {
            amount: self.amount - other.amount,
            currency: self.currency,
        })
    }

    /// Multiplies by a scalar (e.g. quantity) and rounds once to the
    /// currency's minor-unit scale using Banker's Rounding.
    #[must_use]
    pub fn mul_scalar(self, scalar: Decimal) -> Self {
        Self {
            amount: round_to_scale(self.amount * scalar, self.currency.minor_units()),
            currency: self.currency,
        }
    }

    /// Compares two amounts of the same currency.
    pub fn checked_cmp(self, other: Self) -> Result<std::cmp::Ordering, MoneyError> {
        self.require_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    /// Negates the amount.
    #[must_use]
    pub fn negate(self) -> Self {
        Self {
            amount: -self.amount,
            currency: self.currency,
        }
    }

    /// Rounds to the currency's minor-unit scale (Banker's Rounding).
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            amount: round_to_scale(self.amount, self.currency.minor_units()),
            currency: self.currency,
        }
    }

    /// Converts to another currency using an exchange rate.
    ///
    /// The result is rounded once to the target currency's minor-unit
    /// scale. This is the only sanctioned way to combine amounts of
    /// different currencies.
    pub fn convert(self, rate: Decimal, target: Currency) -> Result<Self, MoneyError> {
        if rate <= Decimal::ZERO {
            return Err(MoneyError::NonPositiveRate(rate));
        }
        Ok(Self {
            amount: round_to_scale(self.amount * rate, target.minor_units()),
            currency: target,
        })
    }

    fn require_same_currency(self, other: Self) -> Result<(), MoneyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            })
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Rounds a decimal to the given scale using Banker's Rounding.
///
/// `MidpointNearestEven` minimizes cumulative bias across many lines:
/// 2.5 rounds to 2, 3.5 rounds to 4.
#[must_use]
pub fn round_to_scale(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_new() {
        let money = Money::new(dec!(100.00), Currency::Usd);
        assert_eq!(money.amount, dec!(100.00));
        assert_eq!(money.currency, Currency::Usd);
    }

    #[test]
    fn test_from_minor_units() {
        let money = Money::from_minor_units(12345, Currency::Usd);
        assert_eq!(money.amount, dec!(123.45));

        let yen = Money::from_minor_units(500, Currency::Jpy);
        assert_eq!(yen.amount, dec!(500));
    }

    #[test]
    fn test_parse() {
        let money = Money::parse("99.99", Currency::Eur).unwrap();
        assert_eq!(money.amount, dec!(99.99));

        assert!(matches!(
            Money::parse("not-a-number", Currency::Eur),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_zero_and_sign() {
        let zero = Money::zero(Currency::Usd);
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert!(!zero.is_positive());

        let neg = Money::new(dec!(-5), Currency::Usd);
        assert!(neg.is_negative());
        assert!(!neg.is_positive());
    }

    #[test]
    fn test_checked_add_same_currency() {
        let a = Money::new(dec!(100.10), Currency::Usd);
        let b = Money::new(dec!(0.90), Currency::Usd);
        let sum = a.checked_add(b).unwrap();
        assert_eq!(sum.amount, dec!(101.00));
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let usd = Money::new(dec!(100), Currency::Usd);
        let eur = Money::new(dec!(100), Currency::Eur);
        assert_eq!(
            usd.checked_add(eur),
            Err(MoneyError::CurrencyMismatch {
                left: Currency::Usd,
                right: Currency::Eur,
            })
        );
    }

    #[test]
    fn test_checked_sub() {
        let a = Money::new(dec!(100), Currency::Usd);
        let b = Money::new(dec!(40.50), Currency::Usd);
        assert_eq!(a.checked_sub(b).unwrap().amount, dec!(59.50));
        assert!(a.checked_sub(Money::zero(Currency::Jpy)).is_err());
    }

    #[test]
    fn test_mul_scalar_rounds_once() {
        // 3 * 0.335 = 1.005 -> banker's rounding at 2dp -> 1.00
        let unit = Money::new(dec!(0.335), Currency::Usd);
        assert_eq!(unit.mul_scalar(dec!(3)).amount, dec!(1.00));

        // 3 * 0.345 = 1.035 -> 1.04
        let unit = Money::new(dec!(0.345), Currency::Usd);
        assert_eq!(unit.mul_scalar(dec!(3)).amount, dec!(1.04));
    }

    #[test]
    fn test_checked_cmp() {
        let a = Money::new(dec!(10), Currency::Usd);
        let b = Money::new(dec!(20), Currency::Usd);
        assert_eq!(a.checked_cmp(b).unwrap(), std::cmp::Ordering::Less);
        assert!(a.checked_cmp(Money::zero(Currency::Idr)).is_err());
    }

    #[test]
    fn test_convert_applies_rate_and_scale() {
        let eur = Money::new(dec!(100), Currency::Eur);
        let usd = eur.convert(dec!(1.0875), Currency::Usd).unwrap();
        assert_eq!(usd.amount, dec!(108.75));
        assert_eq!(usd.currency, Currency::Usd);

        // JPY rounds to whole units
        let jpy = eur.convert(dec!(161.505), Currency::Jpy).unwrap();
        assert_eq!(jpy.amount, dec!(16150));
    }

    #[test]
    fn test_convert_rejects_non_positive_rate() {
        let eur = Money::new(dec!(100), Currency::Eur);
        assert!(matches!(
            eur.convert(dec!(0), Currency::Usd),
            Err(MoneyError::NonPositiveRate(_))
        ));
        assert!(matches!(
            eur.convert(dec!(-1.1), Currency::Usd),
            Err(MoneyError::NonPositiveRate(_))
        ));
    }

    #[test]
    fn test_bankers_rounding() {
        assert_eq!(round_to_scale(dec!(2.5), 0), dec!(2));
        assert_eq!(round_to_scale(dec!(3.5), 0), dec!(4));
        assert_eq!(round_to_scale(dec!(2.25), 1), dec!(2.2));
        assert_eq!(round_to_scale(dec!(2.35), 1), dec!(2.4));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("EUR").unwrap(), Currency::Eur);
        assert!(Currency::from_str("XXX").is_err());
    }

    #[test]
    fn test_currency_minor_units() {
        assert_eq!(Currency::Usd.minor_units(), 2);
        assert_eq!(Currency::Jpy.minor_units(), 0);
    }
}
