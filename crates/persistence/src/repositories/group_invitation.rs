//! Group membership repository.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::entities::GroupInvitationEntity;
use crate::metrics::QueryTimer;

/// Repository for the group_invitations table.
pub struct GroupInvitationRepository;

impl GroupInvitationRepository {
    /// Insert or promote a membership.
    ///
    /// Uses ON CONFLICT on (group_id, user_id) so concurrent joins leave one
    /// row. `all_suggestions` is OR-ed in and never reset to false.
    pub async fn upsert(
        conn: &mut PgConnection,
        group_id: Uuid,
        user_id: Uuid,
        all_suggestions: bool,
    ) -> Result<GroupInvitationEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_group_invitation");
        let result = sqlx::query_as::<_, GroupInvitationEntity>(
            r#"
            INSERT INTO group_invitations (group_id, user_id, all_suggestions)
            VALUES ($1, $2, $3)
            ON CONFLICT (group_id, user_id) DO UPDATE
            SET all_suggestions = group_invitations.all_suggestions OR EXCLUDED.all_suggestions
            RETURNING id, group_id, user_id, all_suggestions, created_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(all_suggestions)
        .fetch_one(conn)
        .await;
        timer.record();
        result
    }

    pub async fn find(
        conn: &mut PgConnection,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_invitation");
        let result = sqlx::query_as::<_, GroupInvitationEntity>(
            r#"
            SELECT id, group_id, user_id, all_suggestions, created_at
            FROM group_invitations
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    /// A user's memberships, newest first.
    pub async fn list_for_user(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<GroupInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_group_invitations_for_user");
        let result = sqlx::query_as::<_, GroupInvitationEntity>(
            r#"
            SELECT id, group_id, user_id, all_suggestions, created_at
            FROM group_invitations
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

    pub async fn delete_for_group(
        conn: &mut PgConnection,
        group_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_group_invitations_for_group");
        let result = sqlx::query("DELETE FROM group_invitations WHERE group_id = $1")
            .bind(group_id)
            .execute(conn)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }
}
