//! Audit logging constants and integrity-chain helpers.
//!
//! Audit entries are append-only. Each entry carries a SHA-256 hash over
//! its canonical data and the previous entry's hash, forming a chain that
//! the admin integrity check can walk to detect tampering.

use sha2::{Digest, Sha256};

// ---------------------------------------------------------------------------
// Action type constants
// ---------------------------------------------------------------------------

/// Known action types for audit log entries.
pub mod action_types {
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const SIGN_OFF: &str = "sign_off";
    pub const APPROVE: &str = "approve";
    pub const REJECT: &str = "reject";
    pub const PERMISSION_CHANGE: &str = "permission_change";
    pub const DOWNLOAD_ACCESS_CHANGE: &str = "download_access_change";
    pub const ROLE_TEMPLATE_UPSERT: &str = "role_template_upsert";
    pub const ROLE_TEMPLATE_DELETE: &str = "role_template_delete";
    pub const ENTITY_CREATE: &str = "entity_create";
    pub const ENTITY_UPDATE: &str = "entity_update";
    pub const ENTITY_DELETE: &str = "entity_delete";
}

// ---------------------------------------------------------------------------
// Entity type constants
// ---------------------------------------------------------------------------

/// Known entity types referenced by audit entries.
pub mod entity_types {
    pub const USER: &str = "user";
    pub const COMPANY: &str = "company";
    pub const PROJECT: &str = "project";
    pub const MILESTONE: &str = "milestone";
    pub const ARTICLE: &str = "article";
    pub const TRANSLATION_REQUEST: &str = "translation_request";
    pub const ROLE_TEMPLATE: &str = "role_template";
    pub const ASSET: &str = "asset";
    pub const LEAD: &str = "lead";
}

// ---------------------------------------------------------------------------
// Integrity hash computation
// ---------------------------------------------------------------------------

/// Seed value hashed into the first entry of the chain.
const GENESIS_SEED: &str = "atelier-audit-genesis";

/// Compute the integrity hash for an audit entry.
///
/// The hash covers the previous entry's hash (or the genesis seed for the
/// first entry) concatenated with the entry's canonical data.
pub fn compute_integrity_hash(prev_hash: Option<&str>, entry_data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prev_hash.unwrap_or(GENESIS_SEED).as_bytes());
    hasher.update(b"|");
    hasher.update(entry_data.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Build the canonical data string hashed for an audit entry.
///
/// Field order is fixed; changing it invalidates every existing chain.
pub fn canonical_entry_data(
    timestamp_rfc3339: &str,
    user_id: Option<i64>,
    action_type: &str,
    entity_type: &str,
    entity_id: Option<i64>,
) -> String {
    format!(
        "{timestamp_rfc3339}|{}|{action_type}|{entity_type}|{}",
        user_id.map_or(String::new(), |id| id.to_string()),
        entity_id.map_or(String::new(), |id| id.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = compute_integrity_hash(None, "entry");
        let b = compute_integrity_hash(None, "entry");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        let hash = compute_integrity_hash(None, "entry");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_chained_hash_differs_from_genesis() {
        let first = compute_integrity_hash(None, "entry");
        let second = compute_integrity_hash(Some(&first), "entry");
        assert_ne!(first, second);
    }

    #[test]
    fn test_canonical_data_field_order() {
        let data = canonical_entry_data("2026-01-01T00:00:00Z", Some(5), "approve", "milestone", Some(9));
        assert_eq!(data, "2026-01-01T00:00:00Z|5|approve|milestone|9");
    }

    #[test]
    fn test_canonical_data_empty_optionals() {
        let data = canonical_entry_data("2026-01-01T00:00:00Z", None, "login", "user", None);
        assert_eq!(data, "2026-01-01T00:00:00Z||login|user|");
    }
}
