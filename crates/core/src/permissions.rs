//! Permission constants and effective-permission resolution.
//!
//! Every user carries a role plus an optional list of additional
//! permissions. The effective set is the role's default permission set
//! (or an admin-managed role-template override) unioned with the user's
//! additional permissions. Admins implicitly hold every permission.

use std::collections::BTreeSet;

use crate::roles;

/// Known permission names.
pub mod names {
    pub const ARTICLES_MANAGE: &str = "articles.manage";
    pub const ARTICLES_TRANSLATE: &str = "articles.translate";
    pub const PROJECTS_MANAGE: &str = "projects.manage";
    pub const MILESTONES_SIGN_OFF: &str = "milestones.sign_off";
    pub const MILESTONES_APPROVE: &str = "milestones.approve";
    pub const ASSETS_MANAGE: &str = "assets.manage";
    pub const ASSETS_DOWNLOAD: &str = "assets.download";
    pub const LEADS_MANAGE: &str = "leads.manage";
    pub const USERS_MANAGE: &str = "users.manage";
    pub const AUDIT_VIEW: &str = "audit.view";
}

/// All known permission names, for input validation.
pub const ALL_PERMISSIONS: &[&str] = &[
    names::ARTICLES_MANAGE,
    names::ARTICLES_TRANSLATE,
    names::PROJECTS_MANAGE,
    names::MILESTONES_SIGN_OFF,
    names::MILESTONES_APPROVE,
    names::ASSETS_MANAGE,
    names::ASSETS_DOWNLOAD,
    names::LEADS_MANAGE,
    names::USERS_MANAGE,
    names::AUDIT_VIEW,
];

/// Hardcoded default permission set for a role.
///
/// Used when no role template override exists for the role. Unknown roles
/// default to no permissions.
pub fn default_permissions(role: &str) -> &'static [&'static str] {
    match role {
        roles::ROLE_ADMIN => ALL_PERMISSIONS,
        roles::ROLE_MODERATOR => &[
            names::ARTICLES_MANAGE,
            names::ARTICLES_TRANSLATE,
            names::PROJECTS_MANAGE,
            names::MILESTONES_SIGN_OFF,
            names::ASSETS_MANAGE,
            names::ASSETS_DOWNLOAD,
            names::LEADS_MANAGE,
        ],
        roles::ROLE_CONTENT_CREATOR => &[
            names::ARTICLES_MANAGE,
            names::ARTICLES_TRANSLATE,
            names::MILESTONES_SIGN_OFF,
            names::ASSETS_MANAGE,
        ],
        roles::ROLE_CLIENT => &[names::MILESTONES_APPROVE, names::ASSETS_DOWNLOAD],
        _ => &[],
    }
}

/// Validate that every name in a permission list is known.
pub fn validate_permissions(permissions: &[String]) -> Result<(), String> {
    for p in permissions {
        if !ALL_PERMISSIONS.contains(&p.as_str()) {
            return Err(format!("Unknown permission '{p}'"));
        }
    }
    Ok(())
}

/// Resolve a user's effective permission set.
///
/// `template_override`, when present, replaces the hardcoded defaults for
/// the role; the user's `additional` permissions are then unioned in. The
/// result is deduplicated and ordered.
pub fn effective_permissions(
    role: &str,
    template_override: Option<&[String]>,
    additional: &[String],
) -> BTreeSet<String> {
    let mut set: BTreeSet<String> = match template_override {
        Some(template) => template.iter().cloned().collect(),
        None => default_permissions(role)
            .iter()
            .map(|p| (*p).to_string())
            .collect(),
    };
    set.extend(additional.iter().cloned());
    set
}
