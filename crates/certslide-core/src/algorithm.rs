//! Algorithm identifier canonicalization and policy lookup keys.
//!
//! Algorithm expiration dates are keyed by a canonical short name, but
//! diagnostic data may carry any equivalent identifier for the same
//! algorithm: an OID, a hyphenated name, or a bare name. Canonicalization
//! collapses the known equivalents before the policy lookup; identifiers
//! outside the known set pass through unchanged and simply never match a
//! policy entry.

/// Canonicalizes a digest algorithm identifier.
///
/// Accepts OIDs and common name spellings (`SHA-256`, `sha256`,
/// `2.16.840.1.101.3.4.2.1`) and returns the canonical short name
/// (`SHA256`). Unknown identifiers are returned trimmed but otherwise
/// unchanged.
#[must_use]
pub fn canonical_digest_name(identifier: &str) -> String {
    let trimmed = identifier.trim();
    match trimmed.to_ascii_uppercase().as_str() {
        "1.3.14.3.2.26" | "SHA-1" | "SHA1" => "SHA1".to_string(),
        "2.16.840.1.101.3.4.2.4" | "SHA-224" | "SHA224" => "SHA224".to_string(),
        "2.16.840.1.101.3.4.2.1" | "SHA-256" | "SHA256" => "SHA256".to_string(),
        "2.16.840.1.101.3.4.2.2" | "SHA-384" | "SHA384" => "SHA384".to_string(),
        "2.16.840.1.101.3.4.2.3" | "SHA-512" | "SHA512" => "SHA512".to_string(),
        "1.3.36.3.2.1" | "RIPEMD-160" | "RIPEMD160" => "RIPEMD160".to_string(),
        "1.2.840.113549.2.5" | "MD5" => "MD5".to_string(),
        "1.2.840.113549.2.2" | "MD2" => "MD2".to_string(),
        _ => trimmed.to_string(),
    }
}

/// Canonicalizes an encryption (public-key) algorithm identifier.
///
/// Unknown identifiers are returned trimmed but otherwise unchanged.
#[must_use]
pub fn canonical_encryption_name(identifier: &str) -> String {
    let trimmed = identifier.trim();
    match trimmed.to_ascii_uppercase().as_str() {
        "1.2.840.113549.1.1.1" | "RSA" => "RSA".to_string(),
        "1.2.840.10040.4.1" | "DSA" => "DSA".to_string(),
        "1.2.840.10045.2.1" | "EC" | "ECC" | "ECDSA" => "ECDSA".to_string(),
        _ => trimmed.to_string(),
    }
}

/// Builds the policy lookup key for an encryption algorithm and key length.
///
/// The key is the canonical encryption name with the key length appended
/// (`RSA2048`). Without a key length the bare canonical name is used, which
/// only matches a policy entry that expires the algorithm regardless of key
/// size.
#[must_use]
pub fn encryption_lookup_key(identifier: &str, key_length: Option<u32>) -> String {
    let name = canonical_encryption_name(identifier);
    match key_length {
        Some(length) => format!("{name}{length}"),
        None => name,
    }
}
