//! Conversion between owned [`Value`]s and encoded heap objects.
//!
//! Numbers, symbols and commands are leaves. Complex numbers, units and
//! programs reference their components by slot; expressions embed their
//! leaves inline in postfix order. Unit expressions are shared: the heap
//! keeps a weak index from encoded expression bytes to the object, so equal
//! units typed twice point at one object for as long as either is alive.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Signed;

use crate::runtime::{
    error::Result,
    expr::{Expr, ExprOp, NEG_CODE},
    gc::{
        gc_handle::Handle,
        gc_heap::GcHeap,
        heap_object::{ObjectView, Tag, write_object, write_reference},
        leb128::{read_uleb128, unzigzag, write_uleb128, zigzag},
    },
    tower::{Decimal, Fraction, Value},
    units::UnitValue,
};

fn sign_of(negative: bool) -> Sign {
    if negative { Sign::Minus } else { Sign::Plus }
}

/// Encodes a leaf value, returning its tag. `None` for compound values.
fn encode_leaf(value: &Value, out: &mut Vec<u8>) -> Option<Tag> {
    let tag = match value {
        Value::Integer(v) => {
            write_uleb128(out, v.unsigned_abs());
            if *v < 0 { Tag::NegInteger } else { Tag::Integer }
        }
        Value::Bignum(v) => {
            out.extend_from_slice(&v.magnitude().to_bytes_le());
            if v.is_negative() {
                Tag::NegBignum
            } else {
                Tag::Bignum
            }
        }
        Value::Fraction(f) => {
            let num = f.numer().magnitude().to_bytes_le();
            write_uleb128(out, num.len() as u64);
            out.extend_from_slice(&num);
            out.extend_from_slice(&f.denom().magnitude().to_bytes_le());
            if f.is_negative() {
                Tag::NegFraction
            } else {
                Tag::Fraction
            }
        }
        Value::Decimal(d) => {
            write_uleb128(out, zigzag(d.exponent()));
            out.extend_from_slice(&d.mantissa().magnitude().to_bytes_le());
            if d.is_negative() {
                Tag::NegDecimal
            } else {
                Tag::Decimal
            }
        }
        Value::Symbol(name) => {
            out.extend_from_slice(name.as_bytes());
            Tag::Symbol
        }
        Value::Command(index) => {
            write_uleb128(out, u64::from(*index));
            Tag::Command
        }
        Value::Complex(_) | Value::Unit(_) | Value::Expression(_) | Value::Program(_) => {
            return None;
        }
    };
    Some(tag)
}

fn decode_leaf(tag: Tag, payload: &[u8]) -> Option<Value> {
    let mut cursor = 0;
    Some(match tag {
        Tag::Integer => Value::Integer(i64::try_from(read_uleb128(payload, &mut cursor)?).ok()?),
        Tag::NegInteger => {
            let magnitude = read_uleb128(payload, &mut cursor)?;
            Value::Integer(0i64.checked_sub_unsigned(magnitude)?)
        }
        Tag::Bignum | Tag::NegBignum => Value::from_bigint(BigInt::from_biguint(
            sign_of(tag == Tag::NegBignum),
            BigUint::from_bytes_le(payload),
        )),
        Tag::Fraction | Tag::NegFraction => {
            let num_len = usize::try_from(read_uleb128(payload, &mut cursor)?).ok()?;
            let num_bytes = payload.get(cursor..cursor + num_len)?;
            let den_bytes = payload.get(cursor + num_len..)?;
            let num = BigInt::from_biguint(
                sign_of(tag == Tag::NegFraction),
                BigUint::from_bytes_le(num_bytes),
            );
            let den = BigInt::from(BigUint::from_bytes_le(den_bytes));
            if den == BigInt::from(0) {
                return None;
            }
            Value::Fraction(Fraction::new(num, den))
        }
        Tag::Decimal | Tag::NegDecimal => {
            let exponent = unzigzag(read_uleb128(payload, &mut cursor)?);
            let mantissa = BigInt::from_biguint(
                sign_of(tag == Tag::NegDecimal),
                BigUint::from_bytes_le(payload.get(cursor..)?),
            );
            Value::Decimal(Decimal::new(mantissa, exponent))
        }
        Tag::Symbol => Value::Symbol(String::from_utf8(payload.to_vec()).ok()?),
        Tag::Command => Value::Command(u16::try_from(read_uleb128(payload, &mut cursor)?).ok()?),
        Tag::Complex | Tag::Unit | Tag::Expression | Tag::Program | Tag::Operator => return None,
    })
}

/// Appends the postfix encoding of `expr`.
fn encode_expr(expr: &Expr, out: &mut Vec<u8>) {
    match expr {
        Expr::Number(value) => {
            let mut payload = Vec::new();
            let tag = encode_leaf(value, &mut payload)
                .unwrap_or_else(|| panic!("encode_expr: non-leaf number {value:?}"));
            write_object(out, tag, &payload);
        }
        Expr::Symbol(name) => write_object(out, Tag::Symbol, name.as_bytes()),
        Expr::Neg(inner) => {
            encode_expr(inner, out);
            write_object(out, Tag::Operator, &[NEG_CODE]);
        }
        Expr::Binary(op, left, right) => {
            encode_expr(left, out);
            encode_expr(right, out);
            write_object(out, Tag::Operator, &[op.code()]);
        }
    }
}

fn decode_expr(payload: &[u8]) -> Option<Expr> {
    let mut stack: Vec<Expr> = Vec::new();
    let mut offset = 0;
    while offset < payload.len() {
        let (view, size) = ObjectView::read(payload, offset)?;
        offset += size;
        match view.tag {
            Tag::Operator => {
                let code = *view.payload.first()?;
                if code == NEG_CODE {
                    let inner = stack.pop()?;
                    stack.push(Expr::neg(inner));
                } else {
                    let op = ExprOp::from_code(code)?;
                    let right = stack.pop()?;
                    let left = stack.pop()?;
                    stack.push(Expr::binary(op, left, right));
                }
            }
            Tag::Symbol => stack.push(Expr::Symbol(
                String::from_utf8(view.payload.to_vec()).ok()?,
            )),
            tag => stack.push(Expr::Number(decode_leaf(tag, view.payload)?)),
        }
    }
    if stack.len() == 1 { stack.pop() } else { None }
}

impl GcHeap {
    /// Encodes `value` into the heap and returns an owning handle to it.
    ///
    /// Component objects are allocated first and stay rooted by local
    /// handles until the parent references them, so a collection triggered
    /// half way through cannot reclaim them.
    pub fn store(&mut self, value: &Value) -> Result<Handle> {
        let mut payload = Vec::new();
        if let Some(tag) = encode_leaf(value, &mut payload) {
            return self.alloc(tag, &payload);
        }
        match value {
            Value::Complex(z) => {
                let re = self.store(&z.re)?;
                let im = self.store(&z.im)?;
                write_reference(&mut payload, re.slot());
                write_reference(&mut payload, im.slot());
                self.alloc(Tag::Complex, &payload)
            }
            Value::Unit(u) => {
                let number = self.store(&u.value)?;
                let unit = self.store_interned_expr(&u.unit)?;
                write_reference(&mut payload, number.slot());
                write_reference(&mut payload, unit.slot());
                self.alloc(Tag::Unit, &payload)
            }
            Value::Expression(expr) => {
                encode_expr(expr, &mut payload);
                self.alloc(Tag::Expression, &payload)
            }
            Value::Program(items) => {
                let handles = items
                    .iter()
                    .map(|item| self.store(item))
                    .collect::<Result<Vec<_>>>()?;
                for handle in &handles {
                    write_reference(&mut payload, handle.slot());
                }
                self.alloc(Tag::Program, &payload)
            }
            _ => unreachable!("leaf values are encoded above"),
        }
    }

    /// Stores an expression, reusing a live object with identical bytes.
    fn store_interned_expr(&mut self, expr: &Expr) -> Result<Handle> {
        let mut payload = Vec::new();
        encode_expr(expr, &mut payload);
        let key = (Tag::Expression, payload);
        if let Some(handle) = self.interned.get(&key).and_then(|weak| self.upgrade(weak)) {
            return Ok(handle);
        }
        let handle = self.alloc(Tag::Expression, &key.1)?;
        let weak = self.downgrade(&handle);
        self.interned.insert(key, weak);
        Ok(handle)
    }

    /// Decodes the object behind `handle` into an owned value.
    pub fn load(&self, handle: &Handle) -> Value {
        let view = self.view(handle);
        self.decode(handle.slot(), view)
    }

    fn load_slot(&self, slot: u32) -> Value {
        self.decode(slot, self.view_slot(slot))
    }

    fn decode(&self, slot: u32, view: ObjectView<'_>) -> Value {
        match view.tag {
            Tag::Complex | Tag::Unit => {
                let refs: Vec<u32> = view.references().collect();
                let [first, second] = refs[..] else {
                    corrupt(view.tag, slot)
                };
                let first = self.load_slot(first);
                if view.tag == Tag::Complex {
                    return Value::complex(first, self.load_slot(second));
                }
                let unit_view = self.view_slot(second);
                let unit = match unit_view.tag {
                    Tag::Expression => decode_expr(unit_view.payload),
                    _ => None,
                }
                .unwrap_or_else(|| corrupt(Tag::Expression, second));
                Value::Unit(Box::new(UnitValue { value: first, unit }))
            }
            Tag::Program => Value::Program(
                view.references()
                    .map(|child| self.load_slot(child))
                    .collect(),
            ),
            Tag::Expression => match decode_expr(view.payload) {
                Some(expr) => Value::Expression(Box::new(expr)),
                None => corrupt(view.tag, slot),
            },
            tag => decode_leaf(tag, view.payload).unwrap_or_else(|| corrupt(tag, slot)),
        }
    }
}

fn corrupt(tag: Tag, slot: u32) -> ! {
    panic!("GcHeap::load: corrupt {tag:?} object in slot {slot}")
}
