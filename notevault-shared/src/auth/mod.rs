/// Authentication and authorization
///
/// Everything a request passes through before it reaches note storage:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`credentials`]: Email/password login checks
/// - [`jwt`]: Session token issuance and validation
/// - [`middleware`]: Authorization header parsing into an identity
/// - [`authorization`]: Role and tenant policy for actions
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id, PHC string format
/// - **Session Tokens**: HS256, fixed 8 hour lifetime, injected secret
/// - **Login Failures**: One message and one hash computation for every failure
/// - **Tenant Isolation**: Admin actions are limited to the admin's own tenant
///
/// # Example
///
/// ```
/// use notevault_shared::auth::authorization::{authorize, Action};
/// use notevault_shared::auth::jwt::{StaticSecret, TokenService};
/// use notevault_shared::auth::middleware::authenticate;
/// use notevault_shared::models::user::UserRole;
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new(Arc::new(StaticSecret::new("a-secret-of-at-least-32-bytes!!!")));
/// let token = tokens.issue(Uuid::new_v4(), UserRole::Member, "acme")?;
///
/// let identity = authenticate(Some(&format!("Bearer {}", token)), &tokens)?;
/// authorize(&identity, Action::CreateNote, "acme")?;
/// assert!(authorize(&identity, Action::InviteUser, "acme").is_err());
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod password;
