//! Like repository.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::entities::LikeEntity;
use crate::metrics::QueryTimer;

/// Repository for the likes table.
pub struct LikeRepository;

impl LikeRepository {
    pub async fn find(
        conn: &mut PgConnection,
        user_id: Uuid,
        suggestion_id: Uuid,
    ) -> Result<Option<LikeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_like");
        let result = sqlx::query_as::<_, LikeEntity>(
            r#"
            SELECT id, user_id, suggestion_id, created_at
            FROM likes
            WHERE user_id = $1 AND suggestion_id = $2
            "#,
        )
        .bind(user_id)
        .bind(suggestion_id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// Insert a like. Returns `None` if the user already likes the suggestion.
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: Uuid,
        suggestion_id: Uuid,
    ) -> Result<Option<LikeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("insert_like");
        let result = sqlx::query_as::<_, LikeEntity>(
            r#"
            INSERT INTO likes (user_id, suggestion_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, suggestion_id) DO NOTHING
            RETURNING id, user_id, suggestion_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(suggestion_id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_like");
        let result = sqlx::query("DELETE FROM likes WHERE id = $1")
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
        let timer = QueryTimer::new("delete_likes_for_suggestion");
        let result = sqlx::query("DELETE FROM likes WHERE suggestion_id = $1")
            .bind(suggestion_id)
            .execute(conn)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }
}
