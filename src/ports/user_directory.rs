//! User directory port - Resolves payer emails to user identities.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};

/// Read-only lookup of users by email.
///
/// Matching is case-insensitive on the whole address.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the user registered with `email`, or `None`.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserId>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_directory_is_object_safe() {
        fn _accepts_dyn(_directory: &dyn UserDirectory) {}
    }
}
