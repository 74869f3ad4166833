//! Comment repository.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::entities::{CommentEntity, CommentWithAuthorEntity};
use crate::metrics::QueryTimer;

/// Repository for the comments table.
pub struct CommentRepository;

impl CommentRepository {
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: Uuid,
        suggestion_id: Uuid,
        content: &str,
    ) -> Result<CommentEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_comment");
        let result = sqlx::query_as::<_, CommentEntity>(
            r#"
            INSERT INTO comments (user_id, suggestion_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, suggestion_id, content, created_at
            "#,
        )
        .bind(user_id)
        .bind(suggestion_id)
        .bind(content)
        .fetch_one(conn)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<CommentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_comment_by_id");
        let result = sqlx::query_as::<_, CommentEntity>(
            r#"
            SELECT id, user_id, suggestion_id, content, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// Comments on a suggestion with author name and image, newest first.
    pub async fn list_with_author(
        conn: &mut PgConnection,
        suggestion_id: Uuid,
    ) -> Result<Vec<CommentWithAuthorEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_comments_with_author");
        let result = sqlx::query_as::<_, CommentWithAuthorEntity>(
            r#"
            SELECT c.id, c.user_id, c.suggestion_id, c.content, c.created_at,
                   u.username, u.image AS user_image
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.suggestion_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(suggestion_id)
        .fetch_all(conn)
        .await;
        timer.record();
        result
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_comment");
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }

    pub async fn delete_for_suggestion(
        conn: &mut PgConnection,
        suggestion_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_comments_for_suggestion");
        let result = sqlx::query("DELETE FROM comments WHERE suggestion_id = $1")
            .bind(suggestion_id)
            .execute(conn)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }
}
