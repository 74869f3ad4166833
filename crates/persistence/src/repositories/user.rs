//! User repository for database operations.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for the users table. Every call runs on the caller's connection,
/// which is normally an open transaction.
pub struct UserRepository;

impl UserRepository {
    /// Find a user by their identity-provider subject.
    pub async fn find_by_external_id(
        conn: &mut PgConnection,
        external_id: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_external_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, external_id, username, fullname, email, image,
                   suggestions_count, comments_count, created_at
            FROM users
            WHERE external_id = $1
            "#,
        )
        .bind(external_id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, external_id, username, fullname, email, image,
                   suggestions_count, comments_count, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// Insert a user. Returns `None` when the external id is already taken.
    pub async fn insert(
        conn: &mut PgConnection,
        external_id: &str,
        username: &str,
        fullname: &str,
        email: &str,
        image: Option<&str>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("insert_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (external_id, username, fullname, email, image)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (external_id) DO NOTHING
            RETURNING id, external_id, username, fullname, email, image,
                      suggestions_count, comments_count, created_at
            "#,
        )
        .bind(external_id)
        .bind(username)
        .bind(fullname)
        .bind(email)
        .bind(image)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// Write profile fields and counters. Returns rows affected.
    pub async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        username: &str,
        fullname: &str,
        image: Option<&str>,
        suggestions_count: i64,
        comments_count: i64,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, fullname = $3, image = $4,
                suggestions_count = $5, comments_count = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(fullname)
        .bind(image)
        .bind(suggestions_count)
        .bind(comments_count)
        .execute(conn)
        .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }
}
