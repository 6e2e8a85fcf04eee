//! Transcendental functions on [`Decimal`], correct to the requested number
//! of significant digits (up to a unit in the last place).
//!
//! Every function works internally with guard digits and rounds once at the
//! end. Arguments are reduced into a tiny interval by halving, evaluated with
//! a Taylor series there, and the result expanded back.

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use crate::runtime::tower::decimal::{Decimal, pow10};

const GUARD_DIGITS: usize = 10;

/// Largest argument exponent accepted by trigonometric reduction.
pub const MAX_TRIG_EXPONENT: i64 = 1000;

fn dec(mantissa: i64, exponent: i64) -> Decimal {
    Decimal::new(BigInt::from(mantissa), exponent)
}

fn two_pow(k: u32) -> Decimal {
    Decimal::from_bigint(BigInt::one() << k)
}

/// Halvings needed to bring a value with leading exponent `adjusted` below
/// `1e-3`.
fn halvings(adjusted: i64) -> u32 {
    if adjusted >= -3 {
        ((adjusted + 4) * 10 / 3 + 1) as u32
    } else {
        0
    }
}

/// True once `term` no longer affects a sum of magnitude `10^scale` at `wp`
/// digits.
fn negligible(term: &Decimal, scale: i64, wp: usize) -> bool {
    term.is_zero() || term.adjusted_exponent() < scale - wp as i64 - 2
}

/// A value far outside any configured exponent range, used to saturate.
fn saturated(negative_exponent: bool) -> Decimal {
    let exponent = i64::MAX / 4;
    dec(1, if negative_exponent { -exponent } else { exponent })
}

pub fn sqrt(x: &Decimal, precision: usize) -> Option<Decimal> {
    if x.is_negative() {
        return None;
    }
    if x.is_zero() {
        return Some(Decimal::zero());
    }
    let wanted = 2 * (precision as u64 + 2);
    let mut shift = wanted.saturating_sub(x.digits());
    if (x.exponent() - shift as i64).rem_euclid(2) != 0 {
        shift += 1;
    }
    let scaled = x.mantissa() * pow10(shift);
    let root = scaled.sqrt();
    let exponent = (x.exponent() - shift as i64) / 2;
    let result = if &root * &root == scaled {
        Decimal::new(root, exponent)
    } else {
        Decimal::new(root * 10 + 1, exponent - 1)
    };
    Some(result.round(precision))
}

pub fn exp(x: &Decimal, precision: usize) -> Decimal {
    if x.is_zero() {
        return Decimal::one();
    }
    if x.adjusted_exponent() > 12 {
        return saturated(x.is_negative());
    }
    let k = halvings(x.adjusted_exponent());
    let wp = precision + GUARD_DIGITS + k as usize;
    let r = x.div(&two_pow(k), wp).unwrap_or_else(Decimal::zero);

    let mut sum = Decimal::one();
    let mut term = Decimal::one();
    let mut n = 1i64;
    loop {
        term = term
            .mul(&r, wp)
            .div(&Decimal::from_i64(n), wp)
            .unwrap_or_else(Decimal::zero);
        if negligible(&term, 0, wp) {
            break;
        }
        sum = sum.add(&term, wp);
        n += 1;
    }
    for _ in 0..k {
        sum = sum.mul(&sum, wp);
        if sum.adjusted_exponent().abs() > i64::MAX / 8 {
            return saturated(x.is_negative());
        }
    }
    sum.round(precision)
}

/// Natural logarithm; `None` unless `x > 0`.
pub fn ln(x: &Decimal, precision: usize) -> Option<Decimal> {
    if x.is_zero() || x.is_negative() {
        return None;
    }
    if *x == Decimal::one() {
        return Some(Decimal::zero());
    }
    let adjusted = x.adjusted_exponent();
    let wp = precision + GUARD_DIGITS + adjusted.unsigned_abs().to_string().len();
    // x = m * 10^adjusted with 1 <= m < 10
    let m = Decimal::new(x.mantissa().clone(), x.exponent() - adjusted);
    let mut result = ln_reduced(&m, wp);
    if adjusted != 0 {
        let ln10 = ln_reduced(&Decimal::from_i64(10), wp);
        result = result.add(&ln10.mul(&Decimal::from_i64(adjusted), wp), wp);
    }
    Some(result.round(precision))
}

/// `ln(m)` for `m` in `[1, 10]`: square roots until `m` is close to one, then
/// `ln s = 2 atanh((s - 1) / (s + 1))`.
fn ln_reduced(m: &Decimal, wp: usize) -> Decimal {
    let wp = wp + 5;
    let one = Decimal::one();
    let threshold = dec(1, -3);
    let mut s = m.clone();
    let mut roots = 0u32;
    while s.sub(&one, wp).abs() > threshold {
        s = sqrt(&s, wp).unwrap_or_else(Decimal::one);
        roots += 1;
    }
    let numerator = s.sub(&one, wp);
    if numerator.is_zero() {
        return Decimal::zero();
    }
    let z = numerator
        .div(&s.add(&one, wp), wp)
        .unwrap_or_else(Decimal::zero);
    let z2 = z.mul(&z, wp);
    let scale = z.adjusted_exponent();
    let mut sum = z.clone();
    let mut power = z;
    let mut n = 1i64;
    loop {
        power = power.mul(&z2, wp);
        n += 2;
        let term = power
            .div(&Decimal::from_i64(n), wp)
            .unwrap_or_else(Decimal::zero);
        if negligible(&term, scale, wp) {
            break;
        }
        sum = sum.add(&term, wp);
    }
    sum.mul(&two_pow(roots + 1), wp)
}

pub fn atan(x: &Decimal, precision: usize) -> Decimal {
    if x.is_zero() {
        return Decimal::zero();
    }
    if x.is_negative() {
        return atan(&x.neg(), precision).neg();
    }
    let wp = precision + GUARD_DIGITS;
    let one = Decimal::one();
    let result = if *x > one {
        let inverse = one.div(x, wp).unwrap_or_else(Decimal::zero);
        let half_pi = pi(wp).div(&Decimal::from_i64(2), wp).unwrap_or_else(Decimal::zero);
        half_pi.sub(&atan_reduced(&inverse, wp), wp)
    } else {
        atan_reduced(x, wp)
    };
    result.round(precision)
}

/// `atan(x)` for `0 <= x <= 1` using `atan x = 2 atan(x / (1 + sqrt(1 + x^2)))`.
fn atan_reduced(x: &Decimal, wp: usize) -> Decimal {
    let wp = wp + 5;
    let one = Decimal::one();
    let threshold = dec(1, -3);
    let mut y = x.clone();
    let mut halvings = 0u32;
    while y > threshold {
        let root = sqrt(&one.add(&y.mul(&y, wp), wp), wp).unwrap_or_else(Decimal::one);
        y = y.div(&one.add(&root, wp), wp).unwrap_or_else(Decimal::zero);
        halvings += 1;
    }
    if y.is_zero() {
        return Decimal::zero();
    }
    let y2 = y.mul(&y, wp);
    let scale = y.adjusted_exponent();
    let mut sum = y.clone();
    let mut power = y;
    let mut n = 1i64;
    let mut negative = true;
    loop {
        power = power.mul(&y2, wp);
        n += 2;
        let term = power
            .div(&Decimal::from_i64(n), wp)
            .unwrap_or_else(Decimal::zero);
        if negligible(&term, scale, wp) {
            break;
        }
        sum = if negative {
            sum.sub(&term, wp)
        } else {
            sum.add(&term, wp)
        };
        negative = !negative;
    }
    sum.mul(&two_pow(halvings), wp)
}

pub fn pi(precision: usize) -> Decimal {
    let wp = precision + GUARD_DIGITS;
    atan_reduced(&Decimal::one(), wp)
        .mul(&Decimal::from_i64(4), wp)
        .round(precision)
}

/// Angle of the point `(x, y)` in radians, in `(-pi, pi]`.
pub fn atan2(y: &Decimal, x: &Decimal, precision: usize) -> Decimal {
    let wp = precision + GUARD_DIGITS;
    if x.is_zero() {
        if y.is_zero() {
            return Decimal::zero();
        }
        let half_pi = pi(wp).div(&Decimal::from_i64(2), wp).unwrap_or_else(Decimal::zero);
        let angle = if y.is_negative() { half_pi.neg() } else { half_pi };
        return angle.round(precision);
    }
    let base = atan(&y.div(x, wp).unwrap_or_else(Decimal::zero), wp);
    let angle = if !x.is_negative() {
        base
    } else if y.is_negative() {
        base.sub(&pi(wp), wp)
    } else {
        base.add(&pi(wp), wp)
    };
    angle.round(precision)
}

/// Sine and cosine of `x` radians. `None` when `|x| >= 10^MAX_TRIG_EXPONENT`.
pub fn sin_cos(x: &Decimal, precision: usize) -> Option<(Decimal, Decimal)> {
    if x.is_zero() {
        return Some((Decimal::zero(), Decimal::one()));
    }
    let adjusted = x.adjusted_exponent();
    if adjusted >= MAX_TRIG_EXPONENT {
        return None;
    }
    let wp0 = precision + GUARD_DIGITS + adjusted.max(0) as usize;
    let two_pi = pi(wp0).mul(&Decimal::from_i64(2), wp0);
    let half = dec(5, -1);
    let turns = x
        .div(&two_pi, wp0)
        .unwrap_or_else(Decimal::zero)
        .add(&half, wp0)
        .floor();
    let r = x.sub(&Decimal::from_bigint(turns).mul(&two_pi, wp0), wp0);
    if r.is_zero() {
        return Some((Decimal::zero(), Decimal::one()));
    }

    let k = halvings(r.adjusted_exponent());
    let wp = wp0 + k as usize;
    let h = r.div(&two_pow(k), wp).unwrap_or_else(Decimal::zero);
    let h2 = h.mul(&h, wp);

    let mut sin = h.clone();
    let mut term = h.clone();
    let mut n = 1i64;
    loop {
        term = term
            .mul(&h2, wp)
            .div(&Decimal::from_i64((n + 1) * (n + 2)), wp)
            .unwrap_or_else(Decimal::zero)
            .neg();
        n += 2;
        if negligible(&term, h.adjusted_exponent(), wp) {
            break;
        }
        sin = sin.add(&term, wp);
    }

    let mut cos = Decimal::one();
    let mut term = Decimal::one();
    let mut n = 0i64;
    loop {
        term = term
            .mul(&h2, wp)
            .div(&Decimal::from_i64((n + 1) * (n + 2)), wp)
            .unwrap_or_else(Decimal::zero)
            .neg();
        n += 2;
        if negligible(&term, 0, wp) {
            break;
        }
        cos = cos.add(&term, wp);
    }

    let one = Decimal::one();
    let two = Decimal::from_i64(2);
    for _ in 0..k {
        let s2 = sin.mul(&sin, wp);
        sin = two.mul(&sin, wp).mul(&cos, wp);
        cos = one.sub(&two.mul(&s2, wp), wp);
    }
    Some((sin.round(precision), cos.round(precision)))
}

/// `x^n` for an integer `n` by binary powering. `None` for `0^n` with `n < 0`.
pub fn powi(x: &Decimal, n: &BigInt, precision: usize) -> Option<Decimal> {
    if n.is_zero() {
        return Some(Decimal::one());
    }
    if x.is_zero() {
        return if n.is_negative() {
            None
        } else {
            Some(Decimal::zero())
        };
    }
    let wp = precision + GUARD_DIGITS + n.bits() as usize;
    let mut exponent = n.abs();
    let mut base = x.clone();
    let mut acc = Decimal::one();
    while !exponent.is_zero() {
        if exponent.bit(0) {
            acc = acc.mul(&base, wp);
        }
        exponent >>= 1;
        if !exponent.is_zero() {
            base = base.mul(&base, wp);
        }
        if base.adjusted_exponent().abs() > i64::MAX / 8 {
            let shrinking = base.adjusted_exponent() < 0;
            return Some(saturated(shrinking != n.is_negative()));
        }
    }
    if n.is_negative() {
        acc = Decimal::one().div(&acc, wp)?;
    }
    Some(acc.round(precision))
}

/// `x^y` for `x > 0` through `exp(y ln x)`. `None` for `x <= 0`.
pub fn pow(x: &Decimal, y: &Decimal, precision: usize) -> Option<Decimal> {
    let wp = precision + GUARD_DIGITS;
    let log = ln(x, wp)?;
    Some(exp(&y.mul(&log, wp), precision))
}
