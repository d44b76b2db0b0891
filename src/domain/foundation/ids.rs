//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Opaque identifier of a user resolved through the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Creates a UserId from a users-table UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider-assigned identifier of a single payment transaction.
///
/// References are compared byte-for-byte; no case folding or trimming is
/// applied beyond rejecting blank values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    /// Creates a new reference, returning error if blank.
    pub fn new(reference: impl Into<String>) -> Result<Self, ValidationError> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(ValidationError::empty_field("reference"));
        }
        Ok(Self(reference))
    }

    /// Generates a fresh reference for a locally initiated payment.
    pub fn generate() -> Self {
        Self(format!("ph_{}", Uuid::new_v4().simple()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
    }

    #[test]
    fn user_id_from_uuid_uses_hyphenated_form() {
        let uuid = Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        assert_eq!(id.as_str(), uuid.to_string());
    }

    #[test]
    fn reference_preserves_value() {
        let reference = PaymentReference::new("ref-123").unwrap();
        assert_eq!(reference.as_str(), "ref-123");
        assert_eq!(reference.to_string(), "ref-123");
    }

    #[test]
    fn reference_rejects_blank() {
        assert!(matches!(
            PaymentReference::new(" "),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn generated_references_are_unique() {
        let a = PaymentReference::generate();
        let b = PaymentReference::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("ph_"));
    }

    #[test]
    fn reference_serializes_transparently() {
        let reference = PaymentReference::new("ref-9").unwrap();
        assert_eq!(serde_json::to_string(&reference).unwrap(), "\"ref-9\"");
    }
}
