//! Port for `posts` and `post_likes`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    AccessScope, CounterColumn, LikeRef, NewPost, Page, PageRequest, Post, PostChanges,
    PostFilter, PostLike, PostView, UserId,
};

use super::BackendError;

/// Post and like persistence.
///
/// Every [`PostView`] carries counts computed from the like and comment
/// relations, never the stored counter columns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Filtered listing, newest first, with an exact total.
    async fn list(
        &self,
        scope: &AccessScope,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, BackendError>;

    /// Posts by any of `authors`, newest first.
    async fn list_by_authors(
        &self,
        scope: &AccessScope,
        authors: &[UserId],
        page: PageRequest,
    ) -> Result<Page<PostView>, BackendError>;

    /// Posts by stored `like_count` then `created_at`, both descending.
    async fn popular(
        &self,
        scope: &AccessScope,
        page: PageRequest,
    ) -> Result<Page<PostView>, BackendError>;

    /// A post with badges and counts.
    async fn find_view(
        &self,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<PostView>, BackendError>;

    /// The bare post row.
    async fn find(&self, scope: &AccessScope, id: Uuid) -> Result<Option<Post>, BackendError>;

    /// Every post by `author`, newest first.
    async fn list_for_author(
        &self,
        scope: &AccessScope,
        author: &UserId,
    ) -> Result<Vec<PostView>, BackendError>;

    /// Insert a post and return the stored row.
    async fn insert(&self, scope: &AccessScope, post: &NewPost) -> Result<Post, BackendError>;

    /// Apply a partial update. Returns `None` when no row matched.
    async fn update(
        &self,
        scope: &AccessScope,
        id: Uuid,
        changes: &PostChanges,
    ) -> Result<Option<Post>, BackendError>;

    /// Delete a post together with its likes and comments.
    async fn delete(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError>;

    /// Likes on a post.
    async fn likes(&self, scope: &AccessScope, post_id: Uuid) -> Result<Vec<LikeRef>, BackendError>;

    /// The like `user` placed on `post_id`, if any.
    async fn find_like(
        &self,
        scope: &AccessScope,
        post_id: Uuid,
        user: &UserId,
    ) -> Result<Option<PostLike>, BackendError>;

    /// Record a like.
    async fn insert_like(
        &self,
        scope: &AccessScope,
        post_id: Uuid,
        user: &UserId,
        created_at: DateTime<Utc>,
    ) -> Result<PostLike, BackendError>;

    /// Remove a like.
    async fn delete_like(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError>;

    /// Number of likes on a post.
    async fn count_likes(&self, scope: &AccessScope, post_id: Uuid) -> Result<u64, BackendError>;

    /// Overwrite a stored counter column, optionally stamping `updated_at`.
    async fn set_counter(
        &self,
        scope: &AccessScope,
        post_id: Uuid,
        column: CounterColumn,
        value: u64,
        updated_at: Option<DateTime<Utc>>,
    ) -> Result<(), BackendError>;
}
