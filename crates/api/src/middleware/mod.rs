//! Request extractors enforcing authentication and role gates.

pub mod auth;
pub mod rbac;
