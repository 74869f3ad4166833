//! Suggestion invitation repository.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::entities::SuggestionInvitationEntity;
use crate::metrics::QueryTimer;

/// Repository for the suggestion_invitations table.
pub struct SuggestionInvitationRepository;

impl SuggestionInvitationRepository {
    /// Insert an invitation. Returns `None` if the pair already exists.
    pub async fn insert(
        conn: &mut PgConnection,
        suggestion_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<SuggestionInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("insert_suggestion_invitation");
        let result = sqlx::query_as::<_, SuggestionInvitationEntity>(
            r#"
            INSERT INTO suggestion_invitations (suggestion_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (suggestion_id, user_id) DO NOTHING
            RETURNING id, suggestion_id, user_id, created_at
            "#,
        )
        .bind(suggestion_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    pub async fn find(
        conn: &mut PgConnection,
        suggestion_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<SuggestionInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_suggestion_invitation");
        let result = sqlx::query_as::<_, SuggestionInvitationEntity>(
            r#"
            SELECT id, suggestion_id, user_id, created_at
            FROM suggestion_invitations
            WHERE suggestion_id = $1 AND user_id = $2
            "#,
        )
        .bind(suggestion_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// A user's suggestion invitations, newest first.
    pub async fn list_for_user(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<SuggestionInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_suggestion_invitations_for_user");
        let result = sqlx::query_as::<_, SuggestionInvitationEntity>(
            r#"
            SELECT id, suggestion_id, user_id, created_at
            FROM suggestion_invitations
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(conn)
        .await;
        timer.record();
        result
    }

    pub async fn delete_for_suggestion(
        conn: &mut PgConnection,
        suggestion_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_suggestion_invitations_for_suggestion");
        let result = sqlx::query("DELETE FROM suggestion_invitations WHERE suggestion_id = $1")
            .bind(suggestion_id)
            .execute(conn)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }
}
