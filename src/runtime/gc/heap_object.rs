use std::fmt;

use crate::runtime::gc::leb128::{read_uleb128, uleb128_len, write_uleb128};

/// Type tag stored in the first byte of every heap object.
///
/// The set is closed: the heap refuses to decode bytes carrying any other
/// value. Signs live in the tag so magnitudes can be stored unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Integer = 1,
    NegInteger = 2,
    Bignum = 3,
    NegBignum = 4,
    Fraction = 5,
    NegFraction = 6,
    Decimal = 7,
    NegDecimal = 8,
    /// Two slot references: real part, imaginary part.
    Complex = 9,
    /// Two slot references: numeric value, unit expression.
    Unit = 10,
    Symbol = 11,
    /// Inline RPN sequence of leaf objects and operator tokens.
    Expression = 12,
    /// Sequence of slot references.
    Program = 13,
    Command = 14,
    /// Operator token, only ever found inline inside an expression.
    Operator = 15,
}

impl Tag {
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            1 => Tag::Integer,
            2 => Tag::NegInteger,
            3 => Tag::Bignum,
            4 => Tag::NegBignum,
            5 => Tag::Fraction,
            6 => Tag::NegFraction,
            7 => Tag::Decimal,
            8 => Tag::NegDecimal,
            9 => Tag::Complex,
            10 => Tag::Unit,
            11 => Tag::Symbol,
            12 => Tag::Expression,
            13 => Tag::Program,
            14 => Tag::Command,
            15 => Tag::Operator,
            _ => return None,
        })
    }

    /// Canonical user-visible type label, stable across releases.
    pub fn type_name(self) -> &'static str {
        match self {
            Tag::Integer | Tag::NegInteger => "Integer",
            Tag::Bignum | Tag::NegBignum => "Big integer",
            Tag::Fraction | Tag::NegFraction => "Fraction",
            Tag::Decimal | Tag::NegDecimal => "Decimal",
            Tag::Complex => "Complex",
            Tag::Unit => "Unit",
            Tag::Symbol => "Symbol",
            Tag::Expression => "Expression",
            Tag::Program => "Program",
            Tag::Command => "Command",
            Tag::Operator => "Operator",
        }
    }

    /// Returns `true` for tags whose payload embeds slot references.
    pub fn has_references(self) -> bool {
        matches!(self, Tag::Complex | Tag::Unit | Tag::Program)
    }

    /// Upper bound on the payload length accepted for this tag.
    pub fn max_payload(self, limits: &PayloadLimits) -> usize {
        match self {
            Tag::Integer | Tag::NegInteger => 10,
            Tag::Bignum | Tag::NegBignum => limits.max_bignum_bytes,
            Tag::Fraction | Tag::NegFraction => 2 * limits.max_bignum_bytes + 10,
            Tag::Decimal | Tag::NegDecimal => limits.max_decimal_bytes + 10,
            Tag::Complex | Tag::Unit => 8,
            Tag::Symbol => 255,
            Tag::Command | Tag::Operator => 4,
            Tag::Expression | Tag::Program => limits.max_payload_bytes,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Per-tag payload bounds derived from the runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLimits {
    pub max_bignum_bytes: usize,
    /// Decimal mantissa bound; at least the bignum bound and large enough
    /// for the working precision.
    pub max_decimal_bytes: usize,
    pub max_payload_bytes: usize,
}

impl Default for PayloadLimits {
    fn default() -> Self {
        Self {
            max_bignum_bytes: 512,
            max_decimal_bytes: 512,
            max_payload_bytes: 4096,
        }
    }
}

/// Bytes needed for the magnitude of any mantissa of `digits` decimal
/// digits (log2(10) < 3.322).
pub fn decimal_mantissa_bytes(digits: usize) -> usize {
    (digits * 3322).div_ceil(8000)
}

/// Borrowed view of one encoded object: its tag and payload bytes.
///
/// A view borrows the heap immutably, so it can never survive an allocation
/// (and therefore a compaction).
#[derive(Debug, Clone, Copy)]
pub struct ObjectView<'a> {
    pub tag: Tag,
    pub payload: &'a [u8],
}

impl<'a> ObjectView<'a> {
    /// Decodes the object starting at `offset`, returning the view and the
    /// total encoded size (header plus payload).
    pub fn read(bytes: &'a [u8], offset: usize) -> Option<(Self, usize)> {
        let tag = Tag::from_byte(*bytes.get(offset)?)?;
        let mut cursor = offset + 1;
        let len = usize::try_from(read_uleb128(bytes, &mut cursor)?).ok()?;
        let payload = bytes.get(cursor..cursor + len)?;
        Some((Self { tag, payload }, cursor + len - offset))
    }

    /// Slot references embedded in the payload, for tags that carry them.
    pub fn references(&self) -> impl Iterator<Item = u32> + 'a {
        let chunks: &'a [u8] = if self.tag.has_references() {
            self.payload
        } else {
            &[]
        };
        chunks
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
    }
}

/// Encoded size of an object with a payload of `payload_len` bytes.
pub fn encoded_size(payload_len: usize) -> usize {
    1 + uleb128_len(payload_len as u64) + payload_len
}

/// Appends a complete object (header and payload) to `out`.
pub fn write_object(out: &mut Vec<u8>, tag: Tag, payload: &[u8]) {
    out.push(tag as u8);
    write_uleb128(out, payload.len() as u64);
    out.extend_from_slice(payload);
}

/// Appends a slot reference to a payload under construction.
pub fn write_reference(out: &mut Vec<u8>, slot: u32) {
    out.extend_from_slice(&slot.to_le_bytes());
}
