//! Bridges the pure access policy in `atelier_core::policy` to handler
//! plumbing: loads the caller's company memberships and converts a denial
//! into a `Forbidden` error.

use atelier_core::error::CoreError;
use atelier_core::policy::AccessDecision;
use atelier_core::types::DbId;
use atelier_db::repositories::CompanyRepo;
use atelier_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// IDs of every company the caller belongs to.
pub async fn membership_ids(pool: &DbPool, auth: &AuthUser) -> AppResult<Vec<DbId>> {
    Ok(CompanyRepo::member_company_ids(pool, auth.user_id).await?)
}

/// Convert a policy decision into `Ok(())` or a `Forbidden` error carrying
/// the policy's reason.
pub fn ensure_allowed(decision: AccessDecision) -> AppResult<()> {
    if decision.allowed {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            decision.reason.to_string(),
        )))
    }
}
