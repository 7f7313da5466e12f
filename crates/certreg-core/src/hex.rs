//! Lowercase hex encoding and decoding (no external hex crate dependency).

use crate::error::ValidationError;

/// Render bytes as lowercase hex without a prefix.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Render bytes as `0x`-prefixed lowercase hex.
pub fn encode_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", encode(bytes))
}

/// Decode a hex string, accepting an optional `0x`/`0X` prefix and
/// surrounding whitespace.
pub fn decode(s: &str) -> Result<Vec<u8>, ValidationError> {
    let s = strip_prefix(s.trim());
    if s.len() % 2 != 0 {
        return Err(ValidationError::InvalidHex(format!(
            "hex string has odd length: {}",
            s.len()
        )));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            s.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ValidationError::InvalidHex(format!("invalid hex at position {i}")))
        })
        .collect()
}

/// Decode a hex string into a fixed-size array.
pub fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], ValidationError> {
    let bytes = decode(s)?;
    if bytes.len() != N {
        return Err(ValidationError::InvalidHex(format!(
            "expected {N} bytes, got {}",
            bytes.len()
        )));
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// First four bytes as hex, for `Debug` output that must not dump secrets
/// or long values.
pub fn prefix(bytes: &[u8]) -> String {
    bytes.iter().take(4).map(|b| format!("{b:02x}")).collect()
}

fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_lowercase() {
        assert_eq!(encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
        assert_eq!(encode_prefixed(&[0x00, 0x0a]), "0x000a");
    }

    #[test]
    fn test_decode_accepts_prefix_and_case() {
        assert_eq!(decode("0xDEADbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode("  0Xff ").unwrap(), vec![0xff]);
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_rejects_odd_length() {
        assert!(matches!(decode("abc"), Err(ValidationError::InvalidHex(_))));
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        assert!(decode("zz").is_err());
        // Multi-byte UTF-8 must not panic on slicing.
        assert!(decode("aéb").is_err());
    }

    #[test]
    fn test_decode_fixed_length_mismatch() {
        assert!(decode_fixed::<4>("aabbcc").is_err());
        assert_eq!(decode_fixed::<2>("aabb").unwrap(), [0xaa, 0xbb]);
    }
}
