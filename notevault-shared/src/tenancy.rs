/// Tenant resolution
///
/// Maps a tenant slug to its stored record. Internal tenant IDs used to scope
/// note and user queries come only from here, never from client input.

use std::sync::Arc;

use crate::models::tenant::Tenant;
use crate::store::{NoteStore, StoreError};

/// Error type for tenant resolution
#[derive(Debug, thiserror::Error)]
pub enum TenancyError {
    /// No tenant with this slug
    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves tenant slugs through the store
#[derive(Clone)]
pub struct TenantResolver {
    store: Arc<dyn NoteStore>,
}

impl TenantResolver {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Loads the tenant identified by `slug`
    ///
    /// # Errors
    ///
    /// Returns `TenancyError::TenantNotFound` if no tenant has this slug
    pub async fn resolve(&self, slug: &str) -> Result<Tenant, TenancyError> {
        self.store
            .find_tenant_by_slug(slug)
            .await?
            .ok_or_else(|| TenancyError::TenantNotFound(slug.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tenant::{CreateTenant, TenantPlan};
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_resolve_known_and_unknown() {
        let store = Arc::new(MemoryStore::new());
        let acme = store
            .create_tenant(CreateTenant {
                slug: "acme".to_string(),
                name: "Acme".to_string(),
                plan: TenantPlan::Free,
            })
            .await
            .unwrap();

        let resolver = TenantResolver::new(store);

        assert_eq!(resolver.resolve("acme").await.unwrap(), acme);
        assert!(matches!(
            resolver.resolve("globex").await,
            Err(TenancyError::TenantNotFound(slug)) if slug == "globex"
        ));
    }
}
