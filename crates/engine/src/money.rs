use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount represented as **integer centavos**.
///
/// Every monetary column in the ledger (appropriations, document values,
/// balances) is stored and compared through this type, so availability
/// checks are exact integer comparisons with no floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let valor = Money::new(1_234_500);
/// assert_eq!(valor.centavos(), 1_234_500);
/// assert_eq!(valor.to_string(), "$12345.00");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more than 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("2500".parse::<Money>().unwrap().centavos(), 250_000);
/// assert_eq!("2500,75".parse::<Money>().unwrap().centavos(), 250_075);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer centavos.
    #[must_use]
    pub const fn new(centavos: i64) -> Self {
        Self(centavos)
    }

    /// Returns the raw value in centavos.
    #[must_use]
    pub const fn centavos(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signo = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let pesos = abs / 100;
        let centavos = abs % 100;
        write!(f, "{signo}${pesos}.{centavos:02}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into centavos.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-` sign. Rejects empty strings and more than 2 fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalido = || EngineError::InvalidAmount(format!("\"{s}\" is not a valid amount"));
        let desbordado = || EngineError::InvalidAmount(format!("\"{s}\" overflows the centavo range"));

        let limpio = s.trim().replace(',', ".");
        let (negativo, cuerpo) = match limpio.strip_prefix('-') {
            Some(resto) => (true, resto),
            None => (false, limpio.strip_prefix('+').unwrap_or(&limpio)),
        };
        if cuerpo.is_empty() {
            return Err(invalido());
        }

        let (enteros, fraccion) = match cuerpo.split_once('.') {
            Some((enteros, fraccion)) => (enteros, fraccion),
            None => (cuerpo, ""),
        };
        if enteros.is_empty() || !enteros.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalido());
        }
        if fraccion.len() > 2 || !fraccion.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalido());
        }

        let pesos: i64 = enteros.parse().map_err(|_| desbordado())?;
        let centavos: i64 = match fraccion.len() {
            0 => 0,
            1 => fraccion.parse::<i64>().map_err(|_| invalido())? * 10,
            _ => fraccion.parse::<i64>().map_err(|_| invalido())?,
        };

        let total = pesos
            .checked_mul(100)
            .and_then(|v| v.checked_add(centavos))
            .ok_or_else(desbordado)?;

        Ok(Money(if negativo { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_pesos() {
        assert_eq!(Money::new(0).to_string(), "$0.00");
        assert_eq!(Money::new(7).to_string(), "$0.07");
        assert_eq!(Money::new(250_075).to_string(), "$2500.75");
        assert_eq!(Money::new(-250_075).to_string(), "-$2500.75");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("2500".parse::<Money>().unwrap().centavos(), 250_000);
        assert_eq!("2500.7".parse::<Money>().unwrap().centavos(), 250_070);
        assert_eq!("2500,75".parse::<Money>().unwrap().centavos(), 250_075);
        assert_eq!("-0.01".parse::<Money>().unwrap().centavos(), -1);
        assert_eq!("+3.00".parse::<Money>().unwrap().centavos(), 300);
        assert_eq!("  8.20 ".parse::<Money>().unwrap().centavos(), 820);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!("12.345".parse::<Money>().is_err());
        assert!("1a".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn checked_ops_detect_overflow() {
        assert_eq!(Money::new(i64::MAX).checked_add(Money::new(1)), None);
        assert_eq!(
            Money::new(2).checked_sub(Money::new(1)),
            Some(Money::new(1))
        );
    }
}
