//! Memcomparable value encoding.
//!
//! Encoded bytes of two values of the same kind compare in the same order
//! as the values themselves, which makes the encoding usable both as a
//! sort key and as a canonical hash key.

use crate::types::Datum;
use byteorder::{BigEndian, ByteOrder};

pub const NIL_FLAG: u8 = 0;
pub const BYTES_FLAG: u8 = 1;
pub const COMPACT_BYTES_FLAG: u8 = 2;
pub const INT_FLAG: u8 = 3;
pub const FLOAT_FLAG: u8 = 5;

const SIGN_MASK: u64 = 0x8000_0000_0000_0000;
const ENC_GROUP_SIZE: usize = 8;
const ENC_MARKER: u8 = 0xFF;
const ENC_PAD: u8 = 0x00;

/// Append the flagged encoding of `d` to `buf`
pub fn encode_value(buf: &mut Vec<u8>, d: &Datum) {
    match d {
        Datum::Null => buf.push(NIL_FLAG),
        Datum::Int(v) => {
            buf.push(INT_FLAG);
            encode_int(buf, *v);
        }
        Datum::Float(v) => {
            buf.push(FLOAT_FLAG);
            encode_float(buf, *v);
        }
        Datum::String(s) => {
            buf.push(BYTES_FLAG);
            encode_bytes(buf, s.as_bytes());
        }
    }
}

pub fn encode_int(buf: &mut Vec<u8>, v: i64) {
    let mut tmp = [0u8; 8];
    BigEndian::write_u64(&mut tmp, (v as u64) ^ SIGN_MASK);
    buf.extend_from_slice(&tmp);
}

pub fn encode_uint(buf: &mut Vec<u8>, v: u64) {
    let mut tmp = [0u8; 8];
    BigEndian::write_u64(&mut tmp, v);
    buf.extend_from_slice(&tmp);
}

pub fn encode_float(buf: &mut Vec<u8>, v: f64) {
    // -0.0 and 0.0 share one encoding
    let v = if v == 0.0 { 0.0 } else { v };
    let bits = v.to_bits();
    let bits = if v >= 0.0 { bits | SIGN_MASK } else { !bits };
    encode_uint(buf, bits);
}

/// Group-padded byte encoding: every 8 bytes are followed by a marker
/// recording how many of them are padding.
pub fn encode_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    let groups = data.len() / ENC_GROUP_SIZE + 1;
    buf.reserve(groups * (ENC_GROUP_SIZE + 1));
    for chunk_start in (0..=data.len()).step_by(ENC_GROUP_SIZE) {
        let chunk_end = (chunk_start + ENC_GROUP_SIZE).min(data.len());
        let chunk = &data[chunk_start..chunk_end];
        let pad = ENC_GROUP_SIZE - chunk.len();
        buf.extend_from_slice(chunk);
        buf.extend(std::iter::repeat(ENC_PAD).take(pad));
        buf.push(ENC_MARKER - pad as u8);
    }
}

/// Length-prefixed encoding for identifiers; not order preserving
pub fn encode_compact_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    buf.push(COMPACT_BYTES_FLAG);
    let mut tmp = [0u8; 4];
    BigEndian::write_u32(&mut tmp, data.len() as u32);
    buf.extend_from_slice(&tmp);
    buf.extend_from_slice(data);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(d: Datum) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_value(&mut buf, &d);
        buf
    }

    #[test]
    fn test_int_order_preserved() {
        let values = [i64::MIN, -100, -1, 0, 1, 42, i64::MAX];
        for pair in values.windows(2) {
            assert!(encoded(Datum::Int(pair[0])) < encoded(Datum::Int(pair[1])));
        }
    }

    #[test]
    fn test_float_order_preserved() {
        let values = [f64::MIN, -2.5, -0.1, 0.0, 0.1, 3.0, f64::MAX];
        for pair in values.windows(2) {
            assert!(encoded(Datum::Float(pair[0])) < encoded(Datum::Float(pair[1])));
        }
        assert_eq!(encoded(Datum::Float(-0.0)), encoded(Datum::Float(0.0)));
    }

    #[test]
    fn test_bytes_groups() {
        let mut buf = Vec::new();
        encode_bytes(&mut buf, b"");
        assert_eq!(buf, vec![0, 0, 0, 0, 0, 0, 0, 0, 0xF7]);

        let mut buf = Vec::new();
        encode_bytes(&mut buf, b"12345678");
        assert_eq!(buf.len(), 18);
        assert_eq!(buf[8], 0xFF);
        assert_eq!(buf[17], 0xF7);

        assert!(encoded(Datum::from("ab")) < encoded(Datum::from("abc")));
        assert!(encoded(Datum::from("abcdefgh")) < encoded(Datum::from("abcdefghi")));
        assert!(encoded(Datum::from("b")) > encoded(Datum::from("abcdefghi")));
    }

    #[test]
    fn test_null_first() {
        assert_eq!(encoded(Datum::Null), vec![NIL_FLAG]);
        assert!(encoded(Datum::Null) < encoded(Datum::Int(i64::MIN)));
    }
}
