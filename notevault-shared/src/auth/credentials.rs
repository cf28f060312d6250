/// Credential verification for login
///
/// Checks an email/password pair against the stored user records. Unknown
/// emails and wrong passwords fail with the same [`CredentialError::InvalidCredentials`],
/// and both paths run one Argon2 verification, so neither the response nor
/// its timing reveals which accounts exist.
///
/// # Example
///
/// ```no_run
/// use notevault_shared::auth::credentials::CredentialVerifier;
/// use notevault_shared::store::NoteStore;
/// use std::sync::Arc;
///
/// # async fn example(store: Arc<dyn NoteStore>) -> Result<(), Box<dyn std::error::Error>> {
/// let verifier = CredentialVerifier::new(store);
/// let identity = verifier.verify("admin@acme.test", "password").await?;
/// println!("{} is {} in {}", identity.email, identity.role, identity.tenant_slug);
/// # Ok(())
/// # }
/// ```

use std::sync::{Arc, OnceLock};
use uuid::Uuid;

use super::password::{hash_password, verify_password_blocking, PasswordError};
use crate::models::user::UserRole;
use crate::store::{NoteStore, StoreError};

/// Error type for credential verification
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Email or password missing
    #[error("{0}")]
    Validation(String),

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Stored hash unusable
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Storage failure during lookup
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Identity established by a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub tenant_slug: String,
}

/// Verifies login credentials against the store
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn NoteStore>,
}

// Hash verified against when the email is unknown
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| hash_password("notevault-dummy-password").ok())
        .as_deref()
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Verifies an email/password pair
    ///
    /// The email is matched exactly (no case folding).
    ///
    /// # Errors
    ///
    /// - `CredentialError::Validation` if either field is empty
    /// - `CredentialError::InvalidCredentials` for an unknown email or a wrong
    ///   password
    /// - `CredentialError::Password` if the stored hash can't be parsed
    pub async fn verify(&self, email: &str, password: &str) -> Result<UserIdentity, CredentialError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(CredentialError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let Some(login) = self.store.find_login_by_email(email).await? else {
            if let Some(hash) = dummy_hash() {
                let _ = verify_password_blocking(password.to_owned(), hash.to_owned()).await;
            }
            tracing::debug!("Login attempt for unknown email");
            return Err(CredentialError::InvalidCredentials);
        };

        if !verify_password_blocking(password.to_owned(), login.password_hash.clone()).await? {
            tracing::debug!(user_id = %login.id, "Login attempt with wrong password");
            return Err(CredentialError::InvalidCredentials);
        }

        Ok(UserIdentity {
            user_id: login.id,
            email: login.email,
            role: login.role,
            tenant_slug: login.tenant_slug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::models::tenant::{CreateTenant, TenantPlan};
    use crate::models::user::CreateUser;
    use crate::store::memory::MemoryStore;

    async fn setup() -> CredentialVerifier {
        let store = Arc::new(MemoryStore::new());
        let tenant = store
            .create_tenant(CreateTenant {
                slug: "acme".to_string(),
                name: "Acme".to_string(),
                plan: TenantPlan::Free,
            })
            .await
            .unwrap();
        store
            .create_user(CreateUser {
                email: "admin@acme.test".to_string(),
                password_hash: hash_password("hunter2").unwrap(),
                role: UserRole::Admin,
                tenant_id: tenant.id,
            })
            .await
            .unwrap();

        CredentialVerifier::new(store)
    }

    #[tokio::test]
    async fn test_verify_success() {
        let verifier = setup().await;

        let identity = verifier.verify("admin@acme.test", "hunter2").await.unwrap();
        assert_eq!(identity.email, "admin@acme.test");
        assert_eq!(identity.role, UserRole::Admin);
        assert_eq!(identity.tenant_slug, "acme");
    }

    #[tokio::test]
    async fn test_verify_empty_fields() {
        let verifier = setup().await;

        assert!(matches!(
            verifier.verify("", "hunter2").await,
            Err(CredentialError::Validation(_))
        ));
        assert!(matches!(
            verifier.verify("admin@acme.test", "").await,
            Err(CredentialError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_alike() {
        let verifier = setup().await;

        let unknown = verifier.verify("nobody@acme.test", "hunter2").await.unwrap_err();
        let wrong = verifier.verify("admin@acme.test", "hunter3").await.unwrap_err();

        assert!(matches!(unknown, CredentialError::InvalidCredentials));
        assert!(matches!(wrong, CredentialError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_email_match_is_exact() {
        let verifier = setup().await;

        assert!(matches!(
            verifier.verify("ADMIN@acme.test", "hunter2").await,
            Err(CredentialError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_dummy_hash_is_valid() {
        let hash = dummy_hash().unwrap();
        assert!(!verify_password("password", hash).unwrap());
    }
}
