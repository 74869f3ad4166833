//! Group repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entities::{GroupEntity, GroupStatusDb};
use crate::metrics::QueryTimer;

/// Repository for the groups table.
pub struct GroupRepository;

impl GroupRepository {
    /// Create a new group with zeroed counters.
    pub async fn insert(
        conn: &mut PgConnection,
        owner_user_id: Uuid,
        group_name: &str,
        invitation_code: &str,
        status: GroupStatusDb,
    ) -> Result<GroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_group");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            INSERT INTO groups (owner_user_id, group_name, invitation_code, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_user_id, group_name, invitation_code, suggestions_count,
                      status, storage_id, image_url, created_at, updated_at
            "#,
        )
        .bind(owner_user_id)
        .bind(group_name)
        .bind(invitation_code)
        .bind(status)
        .fetch_one(conn)
        .await;
        timer.record();
        result
    }

    /// Find a group by ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_id");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, owner_user_id, group_name, invitation_code, suggestions_count,
                   status, storage_id, image_url, created_at, updated_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// Find a group by its current invitation code.
    pub async fn find_by_code(
        conn: &mut PgConnection,
        invitation_code: &str,
    ) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_code");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, owner_user_id, group_name, invitation_code, suggestions_count,
                   status, storage_id, image_url, created_at, updated_at
            FROM groups
            WHERE invitation_code = $1
            "#,
        )
        .bind(invitation_code)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// Groups owned by a user, newest first.
    pub async fn list_by_owner(
        conn: &mut PgConnection,
        owner_user_id: Uuid,
    ) -> Result<Vec<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_groups_by_owner");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, owner_user_id, group_name, invitation_code, suggestions_count,
                   status, storage_id, image_url, created_at, updated_at
            FROM groups
            WHERE owner_user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_user_id)
        .fetch_all(conn)
        .await;
        timer.record();
        result
    }

    /// Write every mutable column. Returns rows affected.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        group_name: &str,
        invitation_code: &str,
        suggestions_count: i64,
        status: GroupStatusDb,
        storage_id: Option<&str>,
        image_url: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_group");
        let result = sqlx::query(
            r#"
            UPDATE groups
            SET group_name = $2, invitation_code = $3, suggestions_count = $4,
                status = $5, storage_id = $6, image_url = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(group_name)
        .bind(invitation_code)
        .bind(suggestions_count)
        .bind(status)
        .bind(storage_id)
        .bind(image_url)
        .bind(updated_at)
        .execute(conn)
        .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }

    /// Delete a group row. Children must already be gone.
    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_group");
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }
}
