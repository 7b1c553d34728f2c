use sha2::{Digest, Sha256};

/// A 256-bit SHA-256 digest.
pub type Hash = [u8; 32];

/// SHA-256 of `bytes`.
pub fn sha256(bytes: &[u8]) -> Hash {
    Sha256::digest(bytes).into()
}

/// Big-endian 8-byte encoding of a signed integer.
pub fn be64(value: i64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Serialize a block header for hashing:
/// `prev_hash ∥ data ∥ BE64(timestamp) ∥ BE64(difficulty_bits) ∥ BE64(nonce)`.
///
/// `nonce` must not exceed `i64::MAX`; within that range its unsigned and
/// signed big-endian encodings are the same bytes.
pub fn prepare_data(
    prev_hash: &[u8],
    data: &[u8],
    timestamp: i64,
    difficulty_bits: u32,
    nonce: u64,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(prev_hash.len() + data.len() + 24);
    buf.extend_from_slice(prev_hash);
    buf.extend_from_slice(data);
    buf.extend_from_slice(&be64(timestamp));
    buf.extend_from_slice(&be64(i64::from(difficulty_bits)));
    buf.extend_from_slice(&nonce.to_be_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn header_layout_is_bit_exact() {
        let bytes = prepare_data(&[0xAA, 0xBB], b"hi", 1, 24, 258);
        let expected: Vec<u8> = [
            &[0xAA, 0xBB][..],
            &b"hi"[..],
            &[0, 0, 0, 0, 0, 0, 0, 1][..],
            &[0, 0, 0, 0, 0, 0, 0, 24][..],
            &[0, 0, 0, 0, 0, 0, 1, 2][..],
        ]
        .concat();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn negative_timestamp_uses_twos_complement() {
        assert_eq!(be64(-1), [0xFF; 8]);
    }
}
