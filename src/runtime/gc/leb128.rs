//! LEB128 varints used by object headers and integer payloads.

/// Reads an unsigned LEB128 integer, advancing `offset`.
///
/// Returns `None` on truncated input or a varint longer than ten bytes.
pub fn read_uleb128(bytes: &[u8], offset: &mut usize) -> Option<u64> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    for i in 0..10 {
        let b = *bytes.get(*offset)?;
        *offset += 1;

        let payload = b & 0x7f;
        if i == 9 && payload > 1 {
            return None;
        }
        value |= u64::from(payload) << shift;
        if (b & 0x80) == 0 {
            return Some(value);
        }
        shift += 7;
    }
    None
}

/// Appends an unsigned LEB128 integer.
pub fn write_uleb128(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut b = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            b |= 0x80;
        }
        out.push(b);
        if value == 0 {
            break;
        }
    }
}

/// Number of bytes `write_uleb128` emits for `value`.
pub fn uleb128_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Zigzag-maps a signed value so small magnitudes stay short.
pub fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
