//! Project access policy.
//!
//! All company-scoped access checks go through this single policy instead
//! of ad-hoc role/membership conditionals in each handler. The policy is a
//! pure function over the caller's role and company memberships, so it is
//! tested independently of any handler or database state.

use crate::roles;
use crate::types::DbId;

/// The outcome of an access-policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    /// Human-readable reason, surfaced in `Forbidden` errors when denied.
    pub reason: &'static str,
}

impl AccessDecision {
    fn allow(reason: &'static str) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    fn deny(reason: &'static str) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// Can the caller read entities under the given project's company?
///
/// Admins see everything; everyone else must be a member of the owning
/// company, whatever their role.
pub fn project_read(role: &str, member_company_ids: &[DbId], company_id: DbId) -> AccessDecision {
    if role == roles::ROLE_ADMIN {
        return AccessDecision::allow("admin");
    }
    if member_company_ids.contains(&company_id) {
        return AccessDecision::allow("company member");
    }
    AccessDecision::deny("caller is not a member of the project's company")
}

/// Can the caller perform staff mutations (create/update/sign off) under
/// the given project's company?
///
/// Requires an internal team role in addition to company membership.
pub fn project_staff_write(
    role: &str,
    member_company_ids: &[DbId],
    company_id: DbId,
) -> AccessDecision {
    if role == roles::ROLE_ADMIN {
        return AccessDecision::allow("admin");
    }
    if !roles::is_staff(role) {
        return AccessDecision::deny("caller does not have an internal team role");
    }
    if member_company_ids.contains(&company_id) {
        return AccessDecision::allow("company staff member");
    }
    AccessDecision::deny("caller is not a member of the project's company")
}

/// Can the caller decide (approve/reject) a milestone under the given
/// project's company?
///
/// The approval gate belongs to client-role members of the company; admins
/// may decide on any milestone.
pub fn milestone_decide(
    role: &str,
    member_company_ids: &[DbId],
    company_id: DbId,
) -> AccessDecision {
    if role == roles::ROLE_ADMIN {
        return AccessDecision::allow("admin");
    }
    if role != roles::ROLE_CLIENT {
        return AccessDecision::deny("only client users may approve or reject milestones");
    }
    if member_company_ids.contains(&company_id) {
        return AccessDecision::allow("client of the owning company");
    }
    AccessDecision::deny("caller is not a member of the project's company")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_ADMIN, ROLE_CLIENT, ROLE_CONTENT_CREATOR, ROLE_MODERATOR};

    #[test]
    fn test_admin_allowed_without_membership() {
        assert!(project_read(ROLE_ADMIN, &[], 7).allowed);
        assert!(project_staff_write(ROLE_ADMIN, &[], 7).allowed);
        assert!(milestone_decide(ROLE_ADMIN, &[], 7).allowed);
    }

    #[test]
    fn test_member_can_read() {
        assert!(project_read(ROLE_CLIENT, &[3, 7], 7).allowed);
    }

    #[test]
    fn test_non_member_denied_read() {
        let decision = project_read(ROLE_MODERATOR, &[3], 7);
        assert!(!decision.allowed);
        assert!(decision.reason.contains("not a member"));
    }

    #[test]
    fn test_client_cannot_staff_write_even_as_member() {
        let decision = project_staff_write(ROLE_CLIENT, &[7], 7);
        assert!(!decision.allowed);
        assert!(decision.reason.contains("internal team role"));
    }

    #[test]
    fn test_staff_member_can_write() {
        assert!(project_staff_write(ROLE_CONTENT_CREATOR, &[7], 7).allowed);
        assert!(project_staff_write(ROLE_MODERATOR, &[7], 7).allowed);
    }

    #[test]
    fn test_staff_non_member_denied_write() {
        assert!(!project_staff_write(ROLE_MODERATOR, &[3], 7).allowed);
    }

    #[test]
    fn test_staff_cannot_decide() {
        let decision = milestone_decide(ROLE_CONTENT_CREATOR, &[7], 7);
        assert!(!decision.allowed);
        assert!(decision.reason.contains("client"));
    }

    #[test]
    fn test_client_member_can_decide() {
        assert!(milestone_decide(ROLE_CLIENT, &[7], 7).allowed);
    }

    #[test]
    fn test_client_non_member_cannot_decide() {
        assert!(!milestone_decide(ROLE_CLIENT, &[], 7).allowed);
    }
}
