//! Port for the `comments` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    AccessScope, Comment, CommentFilter, CommentView, NewComment, Page, PageRequest,
};

use super::BackendError;

/// Comment persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Filtered listing, newest first, with an exact total.
    async fn list(
        &self,
        scope: &AccessScope,
        filter: &CommentFilter,
        page: PageRequest,
    ) -> Result<Page<CommentView>, BackendError>;

    /// Every comment on a post, newest first.
    async fn list_for_post(
        &self,
        scope: &AccessScope,
        post_id: Uuid,
    ) -> Result<Vec<CommentView>, BackendError>;

    /// A comment with its author badge.
    async fn find_view(
        &self,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<CommentView>, BackendError>;

    /// The bare comment row.
    async fn find(&self, scope: &AccessScope, id: Uuid) -> Result<Option<Comment>, BackendError>;

    /// Insert a comment and return it with its author badge.
    async fn insert(
        &self,
        scope: &AccessScope,
        comment: &NewComment,
    ) -> Result<CommentView, BackendError>;

    /// Replace a comment's content. Returns `None` when no row matched.
    async fn update_content(
        &self,
        scope: &AccessScope,
        id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<CommentView>, BackendError>;

    /// Delete a comment together with its replies.
    async fn delete(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError>;

    /// Number of comments on a post.
    async fn count_for_post(
        &self,
        scope: &AccessScope,
        post_id: Uuid,
    ) -> Result<u64, BackendError>;
}
