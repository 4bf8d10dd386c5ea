//! Repository for the `users` table.

use sqlx::{PgConnection, PgPool};
use atelier_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User, UserSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, display_name, role, additional_permissions, \
                       download_access, is_active, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, display_name, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.display_name)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Minimal summary of a user for embedding in other payloads.
    pub async fn summary_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT id, display_name, email FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update a user's profile fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                display_name = COALESCE($3, display_name),
                role = COALESCE($4, role),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.role)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's additional permissions. Runs inside the caller's
    /// transaction so the audit append commits atomically with it.
    pub async fn set_permissions(
        conn: &mut PgConnection,
        id: DbId,
        permissions: &[String],
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET additional_permissions = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(permissions)
            .fetch_optional(conn)
            .await
    }

    /// Toggle a user's download access. Runs inside the caller's
    /// transaction so the audit append commits atomically with it.
    pub async fn set_download_access(
        conn: &mut PgConnection,
        id: DbId,
        enabled: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        let query =
            format!("UPDATE users SET download_access = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(enabled)
            .fetch_optional(conn)
            .await
    }

    /// IDs of active users with one of the given roles who are members of
    /// the company. Used for notification fan-out.
    pub async fn ids_by_roles_for_company(
        pool: &PgPool,
        company_id: DbId,
        roles: &[&str],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let roles: Vec<String> = roles.iter().map(|r| (*r).to_string()).collect();
        sqlx::query_scalar::<_, DbId>(
            "SELECT u.id
             FROM users u
             JOIN company_members cm ON cm.user_id = u.id
             WHERE cm.company_id = $1 AND u.role = ANY($2) AND u.is_active
             ORDER BY u.id",
        )
        .bind(company_id)
        .bind(&roles)
        .fetch_all(pool)
        .await
    }
}
