//! Counter value

use std::fmt;

/// Integer counter value, or the result of coercing a non-numeric string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Count {
    Value(i64),
    NotANumber,
}

impl Count {
    pub const ZERO: Count = Count::Value(0);

    /// Integer-prefix coercion.
    ///
    /// Leading whitespace and one sign are skipped, `0x` switches to hex,
    /// then the longest run of digits is taken. No digits gives
    /// `NotANumber`; values past the `i64` range saturate.
    pub fn parse(input: &str) -> Self {
        let s = input.trim_start();
        let (negative, s) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (radix, digits) = match s.get(..2) {
            Some("0x") | Some("0X") => (16, &s[2..]),
            _ => (10, s),
        };

        let mut value: i64 = 0;
        let mut seen = false;
        for c in digits.chars() {
            let Some(digit) = c.to_digit(radix) else { break };
            seen = true;
            let digit = i64::from(digit);
            value = value.saturating_mul(i64::from(radix))
                .saturating_add(if negative { -digit } else { digit });
        }

        if seen { Count::Value(value) } else { Count::NotANumber }
    }

    /// `self + 1`, saturating; `NotANumber` stays as is
    pub fn incremented(self) -> Self {
        match self {
            Count::Value(v) => Count::Value(v.saturating_add(1)),
            Count::NotANumber => Count::NotANumber,
        }
    }

    pub fn value(self) -> Option<i64> {
        match self {
            Count::Value(v) => Some(v),
            Count::NotANumber => None,
        }
    }

    pub fn is_nan(self) -> bool {
        self == Count::NotANumber
    }
}

impl Default for Count {
    fn default() -> Self {
        Count::ZERO
    }
}

impl From<i64> for Count {
    fn from(value: i64) -> Self {
        Count::Value(value)
    }
}

impl From<&str> for Count {
    fn from(value: &str) -> Self {
        Count::parse(value)
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Count::Value(v) => write!(f, "{v}"),
            Count::NotANumber => f.write_str("NaN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!(Count::parse("0"), Count::Value(0));
        assert_eq!(Count::parse("42"), Count::Value(42));
        assert_eq!(Count::parse("-3"), Count::Value(-3));
        assert_eq!(Count::parse("+8"), Count::Value(8));
    }

    #[test]
    fn test_parse_prefix() {
        assert_eq!(Count::parse("  007"), Count::Value(7));
        assert_eq!(Count::parse("5abc"), Count::Value(5));
        assert_eq!(Count::parse("12.9"), Count::Value(12));
        assert_eq!(Count::parse("0x1f"), Count::Value(31));
    }

    #[test]
    fn test_parse_not_a_number() {
        assert_eq!(Count::parse(""), Count::NotANumber);
        assert_eq!(Count::parse("abc"), Count::NotANumber);
        assert_eq!(Count::parse("-"), Count::NotANumber);
        assert_eq!(Count::parse("0x"), Count::NotANumber);
    }

    #[test]
    fn test_parse_saturates() {
        assert_eq!(Count::parse("99999999999999999999999"), Count::Value(i64::MAX));
        assert_eq!(Count::parse("-99999999999999999999999"), Count::Value(i64::MIN));
    }

    #[test]
    fn test_increment_and_display() {
        assert_eq!(Count::ZERO.incremented(), Count::Value(1));
        assert_eq!(Count::Value(i64::MAX).incremented(), Count::Value(i64::MAX));
        assert_eq!(Count::NotANumber.incremented(), Count::NotANumber);
        assert_eq!(Count::Value(-2).to_string(), "-2");
        assert_eq!(Count::NotANumber.to_string(), "NaN");
        assert_eq!(Count::default(), Count::ZERO);
    }
}
