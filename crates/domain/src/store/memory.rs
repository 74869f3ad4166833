//! In-memory [`Store`] for tests and local development.
//!
//! The whole state sits behind one async mutex. A transaction holds the lock
//! for its lifetime and works on a private copy that replaces the shared state
//! on commit, so transactions are serializable and rollback is a drop.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, StoreTransaction};
use crate::models::{
    Comment, CommentWithAuthor, Group, GroupInvitation, Like, NewComment, NewGroup,
    NewSuggestion, NewUser, Suggestion, SuggestionInvitation, User,
};

/// All records, each table in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub group_invitations: Vec<GroupInvitation>,
    pub suggestions: Vec<Suggestion>,
    pub suggestion_invitations: Vec<SuggestionInvitation>,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed state.
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, working }))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

fn missing(table: &str, id: Uuid) -> StoreError {
    StoreError::Missing(format!("{} {}", table, id))
}

fn retain_counting<T>(rows: &mut Vec<T>, keep: impl Fn(&T) -> bool) -> u64 {
    let before = rows.len();
    rows.retain(keep);
    (before - rows.len()) as u64
}

#[async_trait::async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn find_user_by_external_id(&mut self, external_id: &str) -> StoreResult<Option<User>> {
        Ok(self
            .working
            .users
            .iter()
            .find(|u| u.external_id == external_id)
            .cloned())
    }

    async fn find_user(&mut self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.working.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&mut self, user: NewUser) -> StoreResult<Option<User>> {
        if self
            .working
            .users
            .iter()
            .any(|u| u.external_id == user.external_id)
        {
            return Ok(None);
        }
        if self.working.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("Email already registered".into()));
        }

        let row = User {
            id: Uuid::new_v4(),
            external_id: user.external_id,
            username: user.username,
            fullname: user.fullname,
            email: user.email,
            image: user.image,
            suggestions_count: 0,
            comments_count: 0,
            created_at: Utc::now(),
        };
        self.working.users.push(row.clone());
        Ok(Some(row))
    }

    async fn update_user(&mut self, user: &User) -> StoreResult<()> {
        let row = self
            .working
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| missing("user", user.id))?;
        *row = user.clone();
        Ok(())
    }

    async fn insert_group(&mut self, group: NewGroup) -> StoreResult<Group> {
        if self
            .working
            .groups
            .iter()
            .any(|g| g.invitation_code == group.invitation_code)
        {
            return Err(StoreError::Conflict("Invitation code already in use".into()));
        }

        let now = Utc::now();
        let row = Group {
            id: Uuid::new_v4(),
            owner_user_id: group.owner_user_id,
            group_name: group.group_name,
            invitation_code: group.invitation_code,
            suggestions_count: 0,
            status: group.status,
            storage_id: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        self.working.groups.push(row.clone());
        Ok(row)
    }

    async fn find_group(&mut self, id: Uuid) -> StoreResult<Option<Group>> {
        Ok(self.working.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn find_group_by_code(&mut self, invitation_code: &str) -> StoreResult<Option<Group>> {
        Ok(self
            .working
            .groups
            .iter()
            .find(|g| g.invitation_code == invitation_code)
            .cloned())
    }

    async fn list_groups_by_owner(&mut self, owner_user_id: Uuid) -> StoreResult<Vec<Group>> {
        Ok(self
            .working
            .groups
            .iter()
            .rev()
            .filter(|g| g.owner_user_id == owner_user_id)
            .cloned()
            .collect())
    }

    async fn update_group(&mut self, group: &Group) -> StoreResult<()> {
        if self
            .working
            .groups
            .iter()
            .any(|g| g.id != group.id && g.invitation_code == group.invitation_code)
        {
            return Err(StoreError::Conflict("Invitation code already in use".into()));
        }
        let row = self
            .working
            .groups
            .iter_mut()
            .find(|g| g.id == group.id)
            .ok_or_else(|| missing("group", group.id))?;
        *row = group.clone();
        Ok(())
    }

    async fn delete_group(&mut self, id: Uuid) -> StoreResult<()> {
        match retain_counting(&mut self.working.groups, |g| g.id != id) {
            0 => Err(missing("group", id)),
            _ => Ok(()),
        }
    }

    async fn upsert_group_invitation(
        &mut self,
        group_id: Uuid,
        user_id: Uuid,
        all_suggestions: bool,
    ) -> StoreResult<GroupInvitation> {
        if let Some(existing) = self
            .working
            .group_invitations
            .iter_mut()
            .find(|i| i.group_id == group_id && i.user_id == user_id)
        {
            existing.all_suggestions |= all_suggestions;
            return Ok(existing.clone());
        }

        let row = GroupInvitation {
            id: Uuid::new_v4(),
            group_id,
            user_id,
            all_suggestions,
            created_at: Utc::now(),
        };
        self.working.group_invitations.push(row.clone());
        Ok(row)
    }

    async fn find_group_invitation(
        &mut self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<GroupInvitation>> {
        Ok(self
            .working
            .group_invitations
            .iter()
            .find(|i| i.group_id == group_id && i.user_id == user_id)
            .cloned())
    }

    async fn list_group_invitations_for_user(
        &mut self,
        user_id: Uuid,
    ) -> StoreResult<Vec<GroupInvitation>> {
        Ok(self
            .working
            .group_invitations
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_group_invitations_for_group(&mut self, group_id: Uuid) -> StoreResult<u64> {
        Ok(retain_counting(&mut self.working.group_invitations, |i| {
            i.group_id != group_id
        }))
    }

    async fn insert_suggestion(&mut self, suggestion: NewSuggestion) -> StoreResult<Suggestion> {
        if !self
            .working
            .groups
            .iter()
            .any(|g| g.id == suggestion.group_id)
        {
            return Err(missing("group", suggestion.group_id));
        }
        if self
            .working
            .suggestions
            .iter()
            .any(|s| s.invitation_code == suggestion.invitation_code)
        {
            return Err(StoreError::Conflict("Invitation code already in use".into()));
        }

        let now = Utc::now();
        let row = Suggestion {
            id: Uuid::new_v4(),
            owner_user_id: suggestion.owner_user_id,
            group_id: suggestion.group_id,
            invitation_code: suggestion.invitation_code,
            title: suggestion.title,
            description: suggestion.description,
            comments_count: 0,
            likes_count: 0,
            end_goal: suggestion.end_goal,
            status: suggestion.status,
            storage_id: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        self.working.suggestions.push(row.clone());
        Ok(row)
    }

    async fn find_suggestion(&mut self, id: Uuid) -> StoreResult<Option<Suggestion>> {
        Ok(self.working.suggestions.iter().find(|s| s.id == id).cloned())
    }

    async fn find_suggestion_by_code(
        &mut self,
        invitation_code: &str,
    ) -> StoreResult<Option<Suggestion>> {
        Ok(self
            .working
            .suggestions
            .iter()
            .find(|s| s.invitation_code == invitation_code)
            .cloned())
    }

    async fn list_suggestions_for_group(&mut self, group_id: Uuid) -> StoreResult<Vec<Suggestion>> {
        Ok(self
            .working
            .suggestions
            .iter()
            .rev()
            .filter(|s| s.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn update_suggestion(&mut self, suggestion: &Suggestion) -> StoreResult<()> {
        if self
            .working
            .suggestions
            .iter()
            .any(|s| s.id != suggestion.id && s.invitation_code == suggestion.invitation_code)
        {
            return Err(StoreError::Conflict("Invitation code already in use".into()));
        }
        let row = self
            .working
            .suggestions
            .iter_mut()
            .find(|s| s.id == suggestion.id)
            .ok_or_else(|| missing("suggestion", suggestion.id))?;
        *row = suggestion.clone();
        Ok(())
    }

    async fn delete_suggestion(&mut self, id: Uuid) -> StoreResult<()> {
        match retain_counting(&mut self.working.suggestions, |s| s.id != id) {
            0 => Err(missing("suggestion", id)),
            _ => Ok(()),
        }
    }

    async fn insert_suggestion_invitation(
        &mut self,
        suggestion_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<SuggestionInvitation>> {
        if self
            .working
            .suggestion_invitations
            .iter()
            .any(|i| i.suggestion_id == suggestion_id && i.user_id == user_id)
        {
            return Ok(None);
        }

        let row = SuggestionInvitation {
            id: Uuid::new_v4(),
            suggestion_id,
            user_id,
            created_at: Utc::now(),
        };
        self.working.suggestion_invitations.push(row.clone());
        Ok(Some(row))
    }

    async fn find_suggestion_invitation(
        &mut self,
        suggestion_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<SuggestionInvitation>> {
        Ok(self
            .working
            .suggestion_invitations
            .iter()
            .find(|i| i.suggestion_id == suggestion_id && i.user_id == user_id)
            .cloned())
    }

    async fn list_suggestion_invitations_for_user(
        &mut self,
        user_id: Uuid,
    ) -> StoreResult<Vec<SuggestionInvitation>> {
        Ok(self
            .working
            .suggestion_invitations
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_suggestion_invitations_for_suggestion(
        &mut self,
        suggestion_id: Uuid,
    ) -> StoreResult<u64> {
        Ok(retain_counting(&mut self.working.suggestion_invitations, |i| {
            i.suggestion_id != suggestion_id
        }))
    }

    async fn find_like(&mut self, user_id: Uuid, suggestion_id: Uuid) -> StoreResult<Option<Like>> {
        Ok(self
            .working
            .likes
            .iter()
            .find(|l| l.user_id == user_id && l.suggestion_id == suggestion_id)
            .cloned())
    }

    async fn insert_like(&mut self, user_id: Uuid, suggestion_id: Uuid) -> StoreResult<Option<Like>> {
        if self
            .working
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.suggestion_id == suggestion_id)
        {
            return Ok(None);
        }

        let row = Like {
            id: Uuid::new_v4(),
            user_id,
            suggestion_id,
            created_at: Utc::now(),
        };
        self.working.likes.push(row.clone());
        Ok(Some(row))
    }

    async fn delete_like(&mut self, id: Uuid) -> StoreResult<()> {
        match retain_counting(&mut self.working.likes, |l| l.id != id) {
            0 => Err(missing("like", id)),
            _ => Ok(()),
        }
    }

    async fn delete_likes_for_suggestion(&mut self, suggestion_id: Uuid) -> StoreResult<u64> {
        Ok(retain_counting(&mut self.working.likes, |l| {
            l.suggestion_id != suggestion_id
        }))
    }

    async fn insert_comment(&mut self, comment: NewComment) -> StoreResult<Comment> {
        let row = Comment {
            id: Uuid::new_v4(),
            user_id: comment.user_id,
            suggestion_id: comment.suggestion_id,
            content: comment.content,
            created_at: Utc::now(),
        };
        self.working.comments.push(row.clone());
        Ok(row)
    }

    async fn find_comment(&mut self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(self.working.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_comments_for_suggestion(
        &mut self,
        suggestion_id: Uuid,
    ) -> StoreResult<Vec<CommentWithAuthor>> {
        let users = &self.working.users;
        Ok(self
            .working
            .comments
            .iter()
            .rev()
            .filter(|c| c.suggestion_id == suggestion_id)
            .filter_map(|c| {
                users.iter().find(|u| u.id == c.user_id).map(|u| CommentWithAuthor {
                    comment: c.clone(),
                    username: u.username.clone(),
                    user_image: u.image.clone(),
                })
            })
            .collect())
    }

    async fn delete_comment(&mut self, id: Uuid) -> StoreResult<()> {
        match retain_counting(&mut self.working.comments, |c| c.id != id) {
            0 => Err(missing("comment", id)),
            _ => Ok(()),
        }
    }

    async fn delete_comments_for_suggestion(&mut self, suggestion_id: Uuid) -> StoreResult<u64> {
        Ok(retain_counting(&mut self.working.comments, |c| {
            c.suggestion_id != suggestion_id
        }))
    }
}
