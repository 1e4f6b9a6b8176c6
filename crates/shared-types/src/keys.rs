//! Deterministic `_key` derivation for blocks and spans created by the normalizer

use sha2::{Digest, Sha256};

/// Length of a derived key, in hex characters
pub const DERIVED_KEY_LEN: usize = 12;

/// Derive a fresh block key from the key of the block it replaces.
///
/// The same `(original, role)` pair always yields the same key, so re-running
/// a split against an unchanged document produces identical output.
pub fn derive_key(original: &str, role: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(original.as_bytes());
    hasher.update(b":");
    hasher.update(role.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..DERIVED_KEY_LEN].to_string()
}

/// Key for the `n`th span created inside a block
pub fn span_key(block_key: &str, n: usize) -> String {
    format!("{}-{}", block_key, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_is_stable() {
        assert_eq!(derive_key("abc123", "heading"), derive_key("abc123", "heading"));
        assert_eq!(derive_key("abc123", "heading").len(), DERIVED_KEY_LEN);
    }

    #[test]
    fn test_derive_key_differs_by_role() {
        assert_ne!(derive_key("abc123", "heading"), derive_key("abc123", "body"));
        assert_ne!(derive_key("abc123", "heading"), derive_key("abc124", "heading"));
    }

    #[test]
    fn test_span_key_format() {
        assert_eq!(span_key("blk", 2), "blk-2");
    }
}
