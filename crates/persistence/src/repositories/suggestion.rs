//! Suggestion repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entities::{SuggestionEntity, SuggestionStatusDb};
use crate::metrics::QueryTimer;

/// Repository for the suggestions table.
pub struct SuggestionRepository;

impl SuggestionRepository {
    /// Create a new suggestion with zeroed counters.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        conn: &mut PgConnection,
        owner_user_id: Uuid,
        group_id: Uuid,
        invitation_code: &str,
        title: &str,
        description: &str,
        end_goal: i64,
        status: SuggestionStatusDb,
    ) -> Result<SuggestionEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_suggestion");
        let result = sqlx::query_as::<_, SuggestionEntity>(
            r#"
            INSERT INTO suggestions (owner_user_id, group_id, invitation_code, title, description, end_goal, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner_user_id, group_id, invitation_code, title, description,
                      comments_count, likes_count, end_goal, status, storage_id, image_url,
                      created_at, updated_at
            "#,
        )
        .bind(owner_user_id)
        .bind(group_id)
        .bind(invitation_code)
        .bind(title)
        .bind(description)
        .bind(end_goal)
        .bind(status)
        .fetch_one(conn)
        .await;
        timer.record();
        result
    }

    /// Find a suggestion by ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<SuggestionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_suggestion_by_id");
        let result = sqlx::query_as::<_, SuggestionEntity>(
            r#"
            SELECT id, owner_user_id, group_id, invitation_code, title, description,
                   comments_count, likes_count, end_goal, status, storage_id, image_url,
                   created_at, updated_at
            FROM suggestions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// Find a suggestion by its current invitation code.
    pub async fn find_by_code(
        conn: &mut PgConnection,
        invitation_code: &str,
    ) -> Result<Option<SuggestionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_suggestion_by_code");
        let result = sqlx::query_as::<_, SuggestionEntity>(
            r#"
            SELECT id, owner_user_id, group_id, invitation_code, title, description,
                   comments_count, likes_count, end_goal, status, storage_id, image_url,
                   created_at, updated_at
            FROM suggestions
            WHERE invitation_code = $1
            "#,
        )
        .bind(invitation_code)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// Suggestions of a group, newest first.
    pub async fn list_for_group(
        conn: &mut PgConnection,
        group_id: Uuid,
    ) -> Result<Vec<SuggestionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_suggestions_for_group");
        let result = sqlx::query_as::<_, SuggestionEntity>(
            r#"
            SELECT id, owner_user_id, group_id, invitation_code, title, description,
                   comments_count, likes_count, end_goal, status, storage_id, image_url,
                   created_at, updated_at
            FROM suggestions
            WHERE group_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(group_id)
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
        invitation_code: &str,
        comments_count: i64,
        likes_count: i64,
        end_goal: i64,
        status: SuggestionStatusDb,
        storage_id: Option<&str>,
        image_url: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_suggestion");
        let result = sqlx::query(
            r#"
            UPDATE suggestions
            SET invitation_code = $2, comments_count = $3, likes_count = $4, end_goal = $5,
                status = $6, storage_id = $7, image_url = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(invitation_code)
        .bind(comments_count)
        .bind(likes_count)
        .bind(end_goal)
        .bind(status)
        .bind(storage_id)
        .bind(image_url)
        .bind(updated_at)
        .execute(conn)
        .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }

    /// Delete a suggestion row. Children must already be gone.
    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_suggestion");
        let result = sqlx::query("DELETE FROM suggestions WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }
}
