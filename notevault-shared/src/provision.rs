/// Demo data provisioning
///
/// Creates two free-plan tenants (`acme` and `globex`), each with one admin
/// and one member, all using the invited-user password. Tenants that already
/// exist are left alone, so running it on every start is safe.
///
/// | Email | Role | Tenant |
/// |---|---|---|
/// | admin@acme.test | admin | acme |
/// | user@acme.test | member | acme |
/// | admin@globex.test | admin | globex |
/// | user@globex.test | member | globex |

use tracing::info;

use crate::auth::password::{hash_password, PasswordError, INVITED_USER_PASSWORD};
use crate::models::tenant::{CreateTenant, TenantPlan};
use crate::models::user::{CreateUser, UserRole};
use crate::store::{NoteStore, StoreError};

const DEMO_TENANTS: [(&str, &str); 2] = [("acme", "Acme"), ("globex", "Globex")];

/// Error type for provisioning
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Seeds the demo tenants and users, returning how many tenants were created
pub async fn seed_demo_data(store: &dyn NoteStore) -> Result<usize, ProvisionError> {
    let password_hash = hash_password(INVITED_USER_PASSWORD)?;
    let mut created = 0;

    for (slug, name) in DEMO_TENANTS {
        if store.find_tenant_by_slug(slug).await?.is_some() {
            continue;
        }

        let tenant = store
            .create_tenant(CreateTenant {
                slug: slug.to_string(),
                name: name.to_string(),
                plan: TenantPlan::Free,
            })
            .await?;

        for (local, role) in [("admin", UserRole::Admin), ("user", UserRole::Member)] {
            store
                .create_user(CreateUser {
                    email: format!("{}@{}.test", local, slug),
                    password_hash: password_hash.clone(),
                    role,
                    tenant_id: tenant.id,
                })
                .await?;
        }

        info!(tenant = slug, "Provisioned demo tenant");
        created += 1;
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::CredentialVerifier;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = MemoryStore::new();

        assert_eq!(seed_demo_data(&store).await.unwrap(), 2);
        assert_eq!(seed_demo_data(&store).await.unwrap(), 0);

        let acme = store.find_tenant_by_slug("acme").await.unwrap().unwrap();
        assert_eq!(acme.plan, TenantPlan::Free);
    }

    #[tokio::test]
    async fn test_seeded_users_can_log_in() {
        let store = Arc::new(MemoryStore::new());
        seed_demo_data(store.as_ref()).await.unwrap();

        let verifier = CredentialVerifier::new(store);
        let admin = verifier.verify("admin@globex.test", "password").await.unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.tenant_slug, "globex");

        let member = verifier.verify("user@acme.test", "password").await.unwrap();
        assert_eq!(member.role, UserRole::Member);
    }
}
