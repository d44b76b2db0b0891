//! Payment webhook signature verification.
//!
//! The provider signs every webhook body with HMAC-SHA512 keyed by the
//! account secret and sends the lowercase hex digest in a header. The digest
//! covers the body exactly as it travelled on the wire, so verification must
//! run on the untouched bytes before anything parses them.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha512;
use subtle::ConstantTimeEq;

type HmacSha512 = Hmac<Sha512>;

/// Verifies `claimed_signature` against HMAC-SHA512(`secret`, `payload`).
///
/// Returns `false` when the signature is absent or empty, when it does not
/// match, or when the secret is empty. An unset secret never lets a request
/// through.
pub fn verify_signature(secret: &str, payload: &[u8], claimed_signature: Option<&str>) -> bool {
    if secret.is_empty() {
        return false;
    }

    let claimed = match claimed_signature {
        Some(signature) if !signature.is_empty() => signature,
        _ => return false,
    };

    let expected = sign_payload(secret, payload);
    constant_time_compare(expected.as_bytes(), claimed.as_bytes())
}

/// Computes the lowercase hex HMAC-SHA512 of `payload` keyed by `secret`.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Holds the webhook signing secret for the lifetime of the process.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: SecretString,
}

impl WebhookVerifier {
    /// Creates a verifier for the given signing secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Verifies a raw webhook body against the signature header value.
    pub fn verify(&self, payload: &[u8], claimed_signature: Option<&str>) -> bool {
        verify_signature(self.secret.expose_secret(), payload, claimed_signature)
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "sk_test_secret_12345";
    const PAYLOAD: &str = r#"{"event":"charge.success","data":{"reference":"ref-123"}}"#;

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature() {
        let signature = sign_payload(TEST_SECRET, PAYLOAD.as_bytes());

        assert!(verify_signature(TEST_SECRET, PAYLOAD.as_bytes(), Some(&signature)));
    }

    #[test]
    fn signature_is_lowercase_hex_of_sha512_length() {
        let signature = sign_payload(TEST_SECRET, PAYLOAD.as_bytes());

        assert_eq!(signature.len(), 128);
        assert!(signature
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn known_vector_matches() {
        // RFC 4231 test case 2
        let signature = sign_payload("Jefe", b"what do ya want for nothing?");

        assert_eq!(
            signature,
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea2505549758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }

    #[test]
    fn verify_missing_signature_fails() {
        assert!(!verify_signature(TEST_SECRET, PAYLOAD.as_bytes(), None));
    }

    #[test]
    fn verify_empty_signature_fails() {
        assert!(!verify_signature(TEST_SECRET, PAYLOAD.as_bytes(), Some("")));
    }

    #[test]
    fn verify_empty_secret_fails_even_with_matching_signature() {
        let signature = sign_payload("", PAYLOAD.as_bytes());

        assert!(!verify_signature("", PAYLOAD.as_bytes(), Some(&signature)));
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let signature = sign_payload(TEST_SECRET, PAYLOAD.as_bytes());

        assert!(!verify_signature("wrong_secret", PAYLOAD.as_bytes(), Some(&signature)));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let signature = sign_payload(TEST_SECRET, PAYLOAD.as_bytes());
        let tampered = PAYLOAD.replace("ref-123", "ref-999");

        assert!(!verify_signature(TEST_SECRET, tampered.as_bytes(), Some(&signature)));
    }

    #[test]
    fn verify_reserialized_payload_fails() {
        let original = "{\n  \"event\": \"charge.success\"\n}";
        let signature = sign_payload(TEST_SECRET, original.as_bytes());
        let value: serde_json::Value = serde_json::from_str(original).unwrap();
        let reserialized = serde_json::to_vec(&value).unwrap();

        assert!(!verify_signature(TEST_SECRET, &reserialized, Some(&signature)));
    }

    #[test]
    fn verify_uppercase_signature_fails() {
        let signature = sign_payload(TEST_SECRET, PAYLOAD.as_bytes()).to_uppercase();

        assert!(!verify_signature(TEST_SECRET, PAYLOAD.as_bytes(), Some(&signature)));
    }

    #[test]
    fn verifier_struct_delegates_to_function() {
        let verifier = WebhookVerifier::new(TEST_SECRET);
        let signature = sign_payload(TEST_SECRET, PAYLOAD.as_bytes());

        assert!(verifier.verify(PAYLOAD.as_bytes(), Some(&signature)));
        assert!(!verifier.verify(PAYLOAD.as_bytes(), Some("deadbeef")));
    }

    #[test]
    fn verifier_debug_redacts_secret() {
        let verifier = WebhookVerifier::new(TEST_SECRET);
        let debug = format!("{:?}", verifier);

        assert!(!debug.contains(TEST_SECRET));
        assert!(debug.contains("REDACTED"));
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Comparison Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_equal_values() {
        assert!(constant_time_compare(&[1, 2, 3], &[1, 2, 3]));
    }

    #[test]
    fn constant_time_compare_different_values() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 4]));
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
    }
}
