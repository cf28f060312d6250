/// Quota enforcement for plan-based note limits
///
/// A tenant's plan bounds how many notes it may hold:
///
/// | Plan | Notes |
/// |------|-------|
/// | Free | 3 |
/// | Pro  | unlimited |
///
/// The decision itself ([`QuotaLimits::check`]) is pure. [`QuotaEnforcer`]
/// answers the advisory question "may this tenant create another note right
/// now?", but an answer obtained that way can be stale by the time an insert
/// runs. Creation therefore goes through [`NoteStore::create_note`], which
/// repeats the same check and the insert as one atomic step.
///
/// # Example
///
/// ```no_run
/// use notevault_shared::quota::QuotaEnforcer;
/// use notevault_shared::store::NoteStore;
/// use notevault_shared::models::tenant::Tenant;
/// use std::sync::Arc;
///
/// # async fn example(store: Arc<dyn NoteStore>, tenant: Tenant) -> Result<(), Box<dyn std::error::Error>> {
/// let enforcer = QuotaEnforcer::new(store);
///
/// let result = enforcer.check_create_allowed(&tenant).await?;
/// println!("{} notes, {:?} remaining", result.current, result.remaining);
/// # Ok(())
/// # }
/// ```
///
/// [`NoteStore::create_note`]: crate::store::NoteStore::create_note

use crate::models::tenant::{Tenant, TenantPlan};
use crate::store::{NoteStore, StoreError};
use std::sync::Arc;

/// Maximum number of notes a free-plan tenant may hold
pub const FREE_PLAN_NOTE_LIMIT: u64 = 3;

/// Quota enforcement error
#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    /// Note limit reached for the tenant's plan
    #[error("Note limit reached for {plan} plan ({current}/{limit}). Upgrade to Pro.")]
    LimitExceeded {
        plan: TenantPlan,
        limit: u64,
        current: u64,
    },

    /// Storage failure while counting
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Note limits for a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    /// Maximum number of notes, `None` when unbounded
    pub max_notes: Option<u64>,
}

impl QuotaLimits {
    /// Gets the limits for a tenant plan
    pub fn for_plan(plan: TenantPlan) -> Self {
        match plan {
            TenantPlan::Free => QuotaLimits {
                max_notes: Some(FREE_PLAN_NOTE_LIMIT),
            },
            TenantPlan::Pro => QuotaLimits { max_notes: None },
        }
    }

    /// Decides whether one more note fits given the current count
    pub fn check(&self, current: u64) -> QuotaCheckResult {
        match self.max_notes {
            Some(limit) if current >= limit => QuotaCheckResult::exceeded(current, limit),
            Some(limit) => QuotaCheckResult::allowed(current, Some(limit)),
            None => QuotaCheckResult::allowed(current, None),
        }
    }
}

/// Result of quota check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaCheckResult {
    /// Whether another note may be created
    pub allowed: bool,

    /// Current number of notes
    pub current: u64,

    /// Maximum allowed, `None` when unbounded
    pub limit: Option<u64>,

    /// Notes that can still be created, `None` when unbounded
    pub remaining: Option<u64>,
}

impl QuotaCheckResult {
    /// Creates a result indicating quota is available
    pub fn allowed(current: u64, limit: Option<u64>) -> Self {
        QuotaCheckResult {
            allowed: true,
            current,
            limit,
            remaining: limit.map(|l| l.saturating_sub(current)),
        }
    }

    /// Creates a result indicating quota is exhausted
    pub fn exceeded(current: u64, limit: u64) -> Self {
        QuotaCheckResult {
            allowed: false,
            current,
            limit: Some(limit),
            remaining: Some(0),
        }
    }
}

/// Checks a tenant against its plan given an already known note count
///
/// # Errors
///
/// Returns `QuotaError::LimitExceeded` when the tenant is full
pub fn ensure_within_quota(plan: TenantPlan, current: u64) -> Result<QuotaCheckResult, QuotaError> {
    let result = QuotaLimits::for_plan(plan).check(current);

    if !result.allowed {
        return Err(QuotaError::LimitExceeded {
            plan,
            limit: result.limit.unwrap_or(current),
            current,
        });
    }

    Ok(result)
}

/// Quota enforcement service
///
/// Counts a tenant's notes through the store and applies the plan limit.
#[derive(Clone)]
pub struct QuotaEnforcer {
    store: Arc<dyn NoteStore>,
}

impl QuotaEnforcer {
    /// Creates a new quota enforcer
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        QuotaEnforcer { store }
    }

    /// Checks whether the tenant may create another note
    ///
    /// Pro tenants are allowed without counting.
    ///
    /// # Errors
    ///
    /// Returns `QuotaError::LimitExceeded` if a free tenant already holds
    /// [`FREE_PLAN_NOTE_LIMIT`] notes, or `QuotaError::Store` if counting fails
    pub async fn check_create_allowed(&self, tenant: &Tenant) -> Result<QuotaCheckResult, QuotaError> {
        if QuotaLimits::for_plan(tenant.plan).max_notes.is_none() {
            return Ok(QuotaCheckResult::allowed(0, None));
        }

        let current = self.store.count_notes(tenant.id).await?;
        ensure_within_quota(tenant.plan, current)
    }
}
