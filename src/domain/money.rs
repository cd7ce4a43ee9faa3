use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 unit = 100 cents, so $50.00 = 5000 cents.
pub type Cents = i64;

/// Sums of many entries are kept wider than a single amount so they cannot
/// overflow.
pub type TotalCents = i128;

/// Largest magnitude a single amount may have: 10 trillion units.
///
/// Amounts are persisted as JSON numbers in currency units, and every value
/// up to this bound survives the trip through `f64` unchanged.
pub const MAX_AMOUNT_CENTS: Cents = 1_000_000_000_000_000;

/// Format cents as a plain decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: impl Into<TotalCents>) -> String {
    let cents = cents.into();
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Format cents for display with a currency symbol.
/// Example: ("$", 60000) -> "$ 600.00"
pub fn format_money(symbol: &str, cents: impl Into<TotalCents>) -> String {
    format!("{} {}", symbol, format_cents(cents))
}

/// Accept `cents` if it is within `MAX_AMOUNT_CENTS` either side of zero.
pub fn check_amount(cents: Cents) -> Result<Cents, ParseCentsError> {
    if cents.unsigned_abs() > MAX_AMOUNT_CENTS.unsigned_abs() {
        return Err(ParseCentsError::Overflow);
    }
    Ok(cents)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "-400" -> -40000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        Some(_) => (false, input),
        None => return Err(ParseCentsError::Empty),
    };

    let (units_str, decimal_str) = match digits.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (digits, ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !is_ascii_digits(units_str) || !is_ascii_digits(decimal_str) {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::Overflow)?
    };

    // Pad or truncate the fraction to exactly two digits
    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => decimal_str.parse::<i64>().map_err(|_| ParseCentsError::InvalidFormat)? * 10,
        _ => decimal_str[..2]
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseCentsError::Overflow)?;

    check_amount(if negative { -cents } else { cents })
}

/// Convert a JSON-style floating point amount into cents, rounding to the
/// nearest cent. Returns `None` for NaN, infinities and amounts beyond
/// `MAX_AMOUNT_CENTS`.
pub fn cents_from_f64(amount: f64) -> Option<Cents> {
    if !amount.is_finite() {
        return None;
    }
    let cents = (amount * 100.0).round();
    if cents.abs() > MAX_AMOUNT_CENTS as f64 {
        return None;
    }
    Some(cents as Cents)
}

/// Serde adapter: cents on the inside, currency units as a JSON number on the
/// outside. Whole amounts are written as integers.
///
/// Serializing works for single amounts and for totals; deserializing yields
/// a single amount and rejects anything beyond `MAX_AMOUNT_CENTS`.
pub mod amount_units {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Number;

    use super::{Cents, MAX_AMOUNT_CENTS, TotalCents, cents_from_f64};

    pub fn serialize<T, S>(cents: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Copy + Into<TotalCents>,
        S: Serializer,
    {
        let cents: TotalCents = (*cents).into();
        if cents % 100 == 0 {
            let units = cents / 100;
            match i64::try_from(units) {
                Ok(units) => serializer.serialize_i64(units),
                Err(_) => serializer.serialize_i128(units),
            }
        } else {
            serializer.serialize_f64(cents as f64 / 100.0)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cents, D::Error> {
        let amount = Number::deserialize(deserializer)?;

        // Integers take the exact path; only fractional amounts go through f64
        let cents = if let Some(units) = amount.as_i64() {
            units
                .checked_mul(100)
                .filter(|cents| cents.unsigned_abs() <= MAX_AMOUNT_CENTS.unsigned_abs())
        } else if amount.is_u64() {
            None
        } else {
            amount.as_f64().and_then(cents_from_f64)
        };

        cents.ok_or_else(|| D::Error::custom(format!("amount out of range: {}", amount)))
    }
}

fn is_ascii_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    Empty,
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::Empty => write!(f, "amount is empty"),
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Overflow => write!(
                f,
                "amount is too large (limit {})",
                format_cents(MAX_AMOUNT_CENTS)
            ),
        }
    }
}

impl std::error::Error for ParseCentsError {}
