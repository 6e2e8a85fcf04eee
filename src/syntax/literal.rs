//! Number, complex and unit literals.

use num_bigint::BigInt;
use num_traits::Zero;

use crate::{
    runtime::{
        error::{Result, RuntimeError},
        tower::{Decimal, Value},
        units::UnitTable,
    },
    syntax::algebraic::parse_unit_expression,
};

fn digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn parse_digits(text: &str) -> BigInt {
    text.bytes()
        .fold(BigInt::zero(), |acc, b| acc * 10u32 + u32::from(b - b'0'))
}

/// Parses a real number: integer, `n/d` fraction or decimal (`1.5`, `2.`,
/// `.5`, `1.5E-3`, `1E10`).
///
/// `Ok(None)` when the text is not shaped like a number at all; malformed
/// numbers (zero denominators, bad exponents) are syntax errors.
pub fn parse_real(text: &str) -> Result<Option<Value>> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let sign = |value: BigInt| if negative { -value } else { value };

    if digits(body) {
        return Ok(Some(Value::from_bigint(sign(parse_digits(body)))));
    }
    if let Some((num, den)) = body.split_once('/') {
        if !digits(num) || !digits(den) {
            return Ok(None);
        }
        let den = parse_digits(den);
        if den.is_zero() {
            return Err(RuntimeError::syntax("zero denominator", text));
        }
        return Ok(Some(Value::from_ratio(sign(parse_digits(num)), den)));
    }

    let (mantissa, exponent) = match body.find(['E', 'e']) {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let well_formed = (whole.is_empty() || digits(whole))
        && (fraction.is_empty() || digits(fraction))
        && !(whole.is_empty() && fraction.is_empty());
    if !well_formed || (exponent.is_none() && !mantissa.contains('.')) {
        return Ok(None);
    }
    let exponent = match exponent {
        None => 0,
        Some(exp) => {
            let unsigned = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            if !digits(unsigned) {
                return Err(RuntimeError::syntax("malformed exponent", text));
            }
            exp.parse::<i64>()
                .map_err(|_| RuntimeError::syntax("exponent out of range", text))?
        }
    };
    let mut all_digits = String::with_capacity(whole.len() + fraction.len());
    all_digits.push_str(whole);
    all_digits.push_str(fraction);
    let scale = i64::try_from(fraction.len())
        .map_err(|_| RuntimeError::syntax("too many digits", text))?;
    let exponent = exponent
        .checked_sub(scale)
        .ok_or_else(|| RuntimeError::syntax("exponent out of range", text))?;
    Ok(Some(Value::Decimal(Decimal::new(
        sign(parse_digits(&all_digits)),
        exponent,
    ))))
}

/// A real number with decimals converted to exact fractions, as used for
/// unit-table factors.
pub fn parse_exact_number(text: &str) -> Option<Value> {
    match parse_real(text).ok()?? {
        Value::Decimal(d) => Some(Value::from_fraction(d.to_fraction())),
        other => Some(other),
    }
}

/// Parses `(re, im)`.
pub fn parse_complex(text: &str) -> Result<Option<Value>> {
    let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
        return Ok(None);
    };
    let malformed = || RuntimeError::syntax("malformed complex number", text);
    let (re, im) = inner.split_once(',').ok_or_else(malformed)?;
    match (parse_real(re.trim())?, parse_real(im.trim())?) {
        (Some(re), Some(im)) => Ok(Some(Value::complex(re, im))),
        _ => Err(malformed()),
    }
}

fn parse_number(text: &str) -> Result<Option<Value>> {
    if text.starts_with('(') {
        parse_complex(text)
    } else {
        parse_real(text)
    }
}

/// Parses a literal word: a real, a complex or a `value_unit` object.
///
/// `Ok(None)` for words that are not literals (command names, symbols).
/// Every unit symbol must resolve in `units`.
pub fn parse_literal(word: &str, units: &UnitTable) -> Result<Option<Value>> {
    if let Some((number, unit)) = word.split_once('_') {
        let Some(value) = parse_number(number)? else {
            return Ok(None);
        };
        let unit = parse_unit_expression(unit)?;
        units.validate(&unit)?;
        return Ok(Some(Value::unit(value, unit)));
    }
    parse_number(word)
}
