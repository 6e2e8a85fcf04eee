use num_bigint::BigInt;

use crate::runtime::tower::{Value, decimal::pow10};

/// Scale of a unit-name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// `10^n`.
    Decimal(i32),
    /// `2^n`.
    Binary(u32),
}

impl Scale {
    /// Exact factor as a tower value.
    pub fn factor(self) -> Value {
        match self {
            Scale::Decimal(n) if n >= 0 => Value::from_bigint(pow10(n as u64)),
            Scale::Decimal(n) => Value::from_ratio(BigInt::from(1), pow10(n.unsigned_abs() as u64)),
            Scale::Binary(n) => Value::from_bigint(BigInt::from(1) << n),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Prefix {
    pub symbol: &'static str,
    pub scale: Scale,
}

const fn dec(symbol: &'static str, exponent: i32) -> Prefix {
    Prefix {
        symbol,
        scale: Scale::Decimal(exponent),
    }
}

const fn bin(symbol: &'static str, exponent: u32) -> Prefix {
    Prefix {
        symbol,
        scale: Scale::Binary(exponent),
    }
}

/// Recognized prefixes. Two-letter prefixes come first so that the longest
/// match is tried before its one-letter head.
pub static PREFIXES: &[Prefix] = &[
    dec("da", 1),
    bin("Ki", 10),
    bin("Mi", 20),
    bin("Gi", 30),
    bin("Ti", 40),
    dec("Y", 24),
    dec("Z", 21),
    dec("E", 18),
    dec("P", 15),
    dec("T", 12),
    dec("G", 9),
    dec("M", 6),
    dec("k", 3),
    dec("h", 2),
    dec("d", -1),
    dec("c", -2),
    dec("m", -3),
    dec("µ", -6),
    dec("u", -6),
    dec("n", -9),
    dec("p", -12),
    dec("f", -15),
    dec("a", -18),
    dec("z", -21),
    dec("y", -24),
];

/// The prefix spelled exactly `symbol`.
pub fn find(symbol: &str) -> Option<&'static Prefix> {
    PREFIXES.iter().find(|prefix| prefix.symbol == symbol)
}

/// Every `(prefix, rest)` split of `name`, longest prefix first. The rest is
/// never empty.
pub fn splits(name: &str) -> impl Iterator<Item = (&'static Prefix, &str)> {
    PREFIXES.iter().filter_map(move |prefix| {
        name.strip_prefix(prefix.symbol)
            .filter(|rest| !rest.is_empty())
            .map(|rest| (prefix, rest))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_is_tried_first() {
        let first = splits("dam").next().unwrap();
        assert_eq!(first.0.symbol, "da");
        assert_eq!(first.1, "m");
        assert_eq!(splits("dam").nth(1).map(|(p, rest)| (p.symbol, rest)), Some(("d", "am")));
    }

    #[test]
    fn a_bare_prefix_is_not_a_split() {
        assert_eq!(splits("k").count(), 0);
    }

    #[test]
    fn prefixes_are_found_by_exact_symbol() {
        assert_eq!(find("Ki").map(|p| p.scale), Some(Scale::Binary(10)));
        assert_eq!(find("µ").map(|p| p.scale), Some(Scale::Decimal(-6)));
        assert!(find("K").is_none());
        assert!(find("km").is_none());
    }

    #[test]
    fn scale_factors_are_exact() {
        assert_eq!(Scale::Decimal(3).factor(), Value::Integer(1000));
        assert_eq!(
            Scale::Decimal(-2).factor(),
            Value::from_ratio(1.into(), 100.into())
        );
        assert_eq!(Scale::Binary(10).factor(), Value::Integer(1024));
    }
}
