//! Well-known role name constants.
//!
//! Roles are stored as plain text on the `users` table; these constants are
//! the single source of truth for the accepted values.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_CONTENT_CREATOR: &str = "content_creator";
pub const ROLE_CLIENT: &str = "client";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[
    ROLE_ADMIN,
    ROLE_MODERATOR,
    ROLE_CONTENT_CREATOR,
    ROLE_CLIENT,
];

/// Internal team roles. These are the users notified when a client decides
/// on a milestone, and the only roles allowed to sign milestones off.
pub const STAFF_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MODERATOR, ROLE_CONTENT_CREATOR];

/// Whether a role is an internal team role (as opposed to a client).
pub fn is_staff(role: &str) -> bool {
    STAFF_ROLES.contains(&role)
}

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}
