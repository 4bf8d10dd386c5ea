//! Repository for the `role_templates` table.

use sqlx::{PgConnection, PgPool};

use crate::models::role_template::RoleTemplate;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, role, permissions, created_at, updated_at";

/// Provides operations for role permission templates.
pub struct RoleTemplateRepo;

impl RoleTemplateRepo {
    /// List all templates ordered by role.
    pub async fn list(pool: &PgPool) -> Result<Vec<RoleTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM role_templates ORDER BY role");
        sqlx::query_as::<_, RoleTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find the template for a role, if one exists.
    pub async fn find_by_role(
        pool: &PgPool,
        role: &str,
    ) -> Result<Option<RoleTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM role_templates WHERE role = $1");
        sqlx::query_as::<_, RoleTemplate>(&query)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the template for a role. Runs inside the caller's
    /// transaction so the audit append commits atomically with it.
    pub async fn upsert(
        conn: &mut PgConnection,
        role: &str,
        permissions: &[String],
    ) -> Result<RoleTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO role_templates (role, permissions)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_role_templates_role DO UPDATE SET
                permissions = EXCLUDED.permissions
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RoleTemplate>(&query)
            .bind(role)
            .bind(permissions)
            .fetch_one(conn)
            .await
    }

    /// Delete the template for a role, restoring the hardcoded defaults.
    /// Runs inside the caller's transaction. Returns the removed row, or
    /// `None` if no template existed.
    pub async fn delete(
        conn: &mut PgConnection,
        role: &str,
    ) -> Result<Option<RoleTemplate>, sqlx::Error> {
        let query = format!("DELETE FROM role_templates WHERE role = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, RoleTemplate>(&query)
            .bind(role)
            .fetch_optional(conn)
            .await
    }
}
