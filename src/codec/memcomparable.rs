//! Memcomparable byte encoding
//!
//! Encodes arbitrary byte strings so that the encoded form sorts the same
//! way as the input and can be concatenated with other encoded parts.
//!
//! ## Group Format
//! ```text
//! ┌──────────────────────────────┬────────────┐
//! │ 8 data bytes (zero padded)   │ Marker (1) │
//! └──────────────────────────────┴────────────┘
//! Marker = 0xFF - pad_count
//! ```
//! A padded group always terminates the encoding, so an input whose length
//! is a multiple of 8 ends with an all-zero group marked `0xF7`.

use crate::error::{CatalogError, Result};

/// Data bytes per group
const ENC_GROUP_SIZE: usize = 8;

/// Marker of a group with no padding
const ENC_MARKER: u8 = 0xFF;

const ENC_PAD: u8 = 0x00;

/// Size of the encoded form of `len` input bytes
pub fn encoded_len(len: usize) -> usize {
    (len / ENC_GROUP_SIZE + 1) * (ENC_GROUP_SIZE + 1)
}

/// Append the memcomparable encoding of `data` to `out`
pub fn encode_bytes(out: &mut Vec<u8>, data: &[u8]) {
    out.reserve(encoded_len(data.len()));

    let mut idx = 0;
    loop {
        let remain = data.len() - idx;
        if remain >= ENC_GROUP_SIZE {
            out.extend_from_slice(&data[idx..idx + ENC_GROUP_SIZE]);
            out.push(ENC_MARKER);
            idx += ENC_GROUP_SIZE;
        } else {
            let pad_count = ENC_GROUP_SIZE - remain;
            out.extend_from_slice(&data[idx..]);
            out.extend(std::iter::repeat(ENC_PAD).take(pad_count));
            out.push(ENC_MARKER - pad_count as u8);
            return;
        }
    }
}

/// Decode one memcomparable-encoded byte string from the front of `input`
///
/// Returns the decoded bytes and the unconsumed remainder.
pub fn decode_bytes(input: &[u8]) -> Result<(Vec<u8>, &[u8])> {
    let mut decoded = Vec::with_capacity(input.len());
    let mut rest = input;

    loop {
        if rest.len() < ENC_GROUP_SIZE + 1 {
            return Err(CatalogError::Codec(format!(
                "Truncated byte group: expected {} bytes, got {}",
                ENC_GROUP_SIZE + 1,
                rest.len()
            )));
        }

        let (group, tail) = rest.split_at(ENC_GROUP_SIZE + 1);
        rest = tail;

        let marker = group[ENC_GROUP_SIZE];
        let pad_count = (ENC_MARKER - marker) as usize;
        if pad_count > ENC_GROUP_SIZE {
            return Err(CatalogError::Codec(format!(
                "Invalid group marker: 0x{:02x}",
                marker
            )));
        }

        let real_len = ENC_GROUP_SIZE - pad_count;
        decoded.extend_from_slice(&group[..real_len]);

        if pad_count != 0 {
            if group[real_len..ENC_GROUP_SIZE].iter().any(|&b| b != ENC_PAD) {
                return Err(CatalogError::Codec(format!(
                    "Non-zero padding in byte group ending with marker 0x{:02x}",
                    marker
                )));
            }
            return Ok((decoded, rest));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        encode_bytes(&mut out, data);
        out
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(b""), vec![0, 0, 0, 0, 0, 0, 0, 0, 0xF7]);
    }

    #[test]
    fn test_encode_short() {
        assert_eq!(encode(b"DBs"), vec![b'D', b'B', b's', 0, 0, 0, 0, 0, 0xFA]);
    }

    #[test]
    fn test_encode_full_group_gets_terminator() {
        let encoded = encode(b"12345678");
        assert_eq!(encoded.len(), 18);
        assert_eq!(encoded[8], ENC_MARKER);
        assert_eq!(&encoded[9..], &[0, 0, 0, 0, 0, 0, 0, 0, 0xF7]);
    }

    #[test]
    fn test_decode_returns_remainder() {
        let mut encoded = encode(b"SchemaVersionKey");
        encoded.extend_from_slice(b"tail");

        let (decoded, rest) = decode_bytes(&encoded).unwrap();
        assert_eq!(decoded, b"SchemaVersionKey");
        assert_eq!(rest, b"tail");
    }

    #[test]
    fn test_encoding_preserves_order() {
        let mut keys: Vec<&[u8]> = vec![
            &b"Table:2"[..],
            &b"DB:10"[..],
            &b"Table:10"[..],
            &b"DB:1"[..],
            &b""[..],
            &b"TID"[..],
        ];
        let mut encoded: Vec<Vec<u8>> = keys.iter().map(|k| encode(k)).collect();

        keys.sort();
        encoded.sort();

        let decoded: Vec<Vec<u8>> = encoded
            .iter()
            .map(|e| decode_bytes(e).unwrap().0)
            .collect();
        let expected: Vec<Vec<u8>> = keys.iter().map(|k| k.to_vec()).collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_decode_truncated() {
        let encoded = encode(b"abc");
        assert!(decode_bytes(&encoded[..5]).is_err());
    }

    #[test]
    fn test_decode_bad_marker() {
        let mut encoded = encode(b"abc");
        let last = encoded.len() - 1;
        encoded[last] = 0x10;
        assert!(decode_bytes(&encoded).is_err());
    }

    #[test]
    fn test_decode_dirty_padding() {
        let mut encoded = encode(b"abc");
        encoded[6] = 0x01;
        assert!(decode_bytes(&encoded).is_err());
    }
}
