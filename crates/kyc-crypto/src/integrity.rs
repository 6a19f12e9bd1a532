//! SHA-256 content digests for upload/download integrity checks
//!
//! The digest is computed over the plaintext and stored by the caller next to
//! the object reference; it never goes inside the container.

use sha2::{Digest, Sha256};

/// SHA-256 of `data` as 64 lowercase hex chars.
pub fn generate_file_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Recompute the digest of `data` and compare it with `expected_hex`.
///
/// Malformed hex (wrong length, non-hex chars) is a mismatch, not an error.
/// Comparison is not constant-time: this guards against storage corruption,
/// not a timing adversary.
pub fn verify_file_integrity(data: &[u8], expected_hex: &str) -> bool {
    match hex::decode(expected_hex) {
        Ok(expected) => Sha256::digest(data).as_slice() == expected.as_slice(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            generate_file_hash(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn empty_digest() {
        assert_eq!(
            generate_file_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn verify_accepts_matching_digest() {
        let data = b"%PDF-1.4\n1 0 obj\n<<\n/Type /Catalog\n>>\nendobj";
        let hash = generate_file_hash(data);
        assert!(verify_file_integrity(data, &hash));
    }

    #[test]
    fn verify_rejects_other_content() {
        let hash = generate_file_hash(b"passport-scan-v1");
        assert!(!verify_file_integrity(b"passport-scan-v2", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hex() {
        let data = b"id card";
        assert!(!verify_file_integrity(data, ""));
        assert!(!verify_file_integrity(data, "not-hex-at-all"));
        assert!(!verify_file_integrity(data, "abc"));
        // Valid hex but truncated digest
        let hash = generate_file_hash(data);
        assert!(!verify_file_integrity(data, &hash[..62]));
    }

    proptest! {
        #[test]
        fn hash_is_deterministic(data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
            prop_assert_eq!(generate_file_hash(&data), generate_file_hash(&data));
        }

        #[test]
        fn hash_is_lowercase_hex(data in proptest::collection::vec(any::<u8>(), 0..=512)) {
            let hash = generate_file_hash(&data);
            prop_assert_eq!(hash.len(), 64);
            prop_assert!(hash.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }

        #[test]
        fn appended_byte_changes_hash(
            data in proptest::collection::vec(any::<u8>(), 0..=1024),
            extra in any::<u8>(),
        ) {
            let mut longer = data.clone();
            longer.push(extra);
            prop_assert_ne!(generate_file_hash(&data), generate_file_hash(&longer));
        }
    }
}
