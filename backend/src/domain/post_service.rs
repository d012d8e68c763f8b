//! Community posts: listings, the personal feed, likes and moderation.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{BackendError, CommentRepository, PostRepository, UserRepository};
use crate::domain::{
    AccessScope, Caller, CounterColumn, Error, LikeToggle, NewPost, Page, PageRequest, Post,
    PostChanges, PostDetail, PostFilter, PostView,
};

const NOT_OWNED: &str = "Post not found or access denied";

/// Caller-supplied fields for a new post.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    /// Headline.
    pub title: String,
    /// Body.
    pub content: String,
    /// Destination written about.
    pub destination_id: Option<Uuid>,
    /// Gallery, empty when omitted.
    pub images: Option<Vec<String>>,
    /// Rating.
    pub rating: Option<f64>,
    /// Visibility, public when omitted.
    pub is_public: Option<bool>,
}

/// Service behind the `/api/posts` routes.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl PostService {
    /// Create a service over the given repositories.
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            comments,
            users,
            clock,
        }
    }

    /// Filtered, paginated listing, newest first.
    pub async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Page<PostView>, Error> {
        self.posts
            .list(&AccessScope::Anonymous, filter, page)
            .await
            .map_err(|err| err.into_internal("Failed to fetch posts"))
    }

    /// Posts by members the caller follows. When that page is empty the
    /// most-liked posts are returned instead, with their own total.
    pub async fn feed(&self, caller: &Caller, page: PageRequest) -> Result<Page<PostView>, Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to fetch feed");

        let followed = self
            .users
            .list_followed(&scope, caller.id())
            .await
            .map_err(failed)?;
        if !followed.is_empty() {
            let feed = self
                .posts
                .list_by_authors(&scope, &followed, page)
                .await
                .map_err(failed)?;
            if !feed.is_empty() {
                return Ok(feed);
            }
        }

        debug!(user_id = %caller.id(), "feed empty, falling back to popular posts");
        self.posts.popular(&scope, page).await.map_err(failed)
    }

    /// A post with counts, comments, likes and the caller's like state.
    pub async fn detail(&self, caller: Option<&Caller>, id: Uuid) -> Result<PostDetail, Error> {
        self.load_detail(caller, id, "Failed to fetch post")
            .await?
            .ok_or_else(|| Error::not_found("Post not found"))
    }

    /// Publish a post as the caller.
    pub async fn create(&self, caller: &Caller, draft: PostDraft) -> Result<PostDetail, Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to create post");
        let post = NewPost {
            user_id: *caller.id(),
            title: draft.title,
            content: draft.content,
            destination_id: draft.destination_id,
            images: draft.images.unwrap_or_default(),
            rating: draft.rating,
            is_public: draft.is_public.unwrap_or(true),
            created_at: self.clock.utc(),
        };
        let stored = self.posts.insert(&scope, &post).await.map_err(failed)?;
        let view = self
            .posts
            .find_view(&scope, stored.id)
            .await
            .map_err(failed)?
            .unwrap_or_else(|| PostView {
                post: stored,
                users: None,
                destinations: None,
                like_count: 0,
                comment_count: 0,
            });
        Ok(PostDetail::fresh(view))
    }

    /// Apply a partial update to one of the caller's posts.
    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<PostDetail, Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to update post");
        let owned = self
            .posts
            .find(&scope, id)
            .await
            .map_err(failed)?
            .filter(|post| post.user_id == *caller.id());
        if owned.is_none() {
            return Err(Error::not_found(NOT_OWNED));
        }

        let changes = PostChanges {
            title: changes.title.filter(|title| !title.trim().is_empty()),
            content: changes.content.filter(|content| !content.trim().is_empty()),
            updated_at: Some(self.clock.utc()),
            ..changes
        };
        self.posts
            .update(&scope, id, &changes)
            .await
            .map_err(failed)?
            .ok_or_else(|| Error::not_found(NOT_OWNED))?;

        self.load_detail(Some(caller), id, "Failed to update post")
            .await?
            .ok_or_else(|| Error::not_found(NOT_OWNED))
    }

    /// Delete a post. Authors may delete their own; moderators and admins
    /// may delete any.
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to delete post");
        let post = self
            .posts
            .find(&scope, id)
            .await
            .map_err(failed)?
            .ok_or_else(|| Error::not_found("Post not found"))?;
        if !may_remove(caller, &post) {
            return Err(Error::forbidden("Not authorized to delete this post"));
        }
        self.posts.delete(&scope, id).await.map_err(failed)
    }

    /// Like the post, or remove the caller's like when present.
    pub async fn toggle_like(&self, caller: &Caller, id: Uuid) -> Result<LikeToggle, Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to toggle like");
        if self
            .posts
            .find(&scope, id)
            .await
            .map_err(failed)?
            .is_none()
        {
            return Err(Error::not_found("Post not found"));
        }

        let liked = match self
            .posts
            .find_like(&scope, id, caller.id())
            .await
            .map_err(failed)?
        {
            Some(like) => {
                self.posts
                    .delete_like(&scope, like.id)
                    .await
                    .map_err(failed)?;
                false
            }
            None => {
                self.posts
                    .insert_like(&scope, id, caller.id(), self.clock.utc())
                    .await
                    .map_err(failed)?;
                true
            }
        };

        let like_count = self.posts.count_likes(&scope, id).await.map_err(failed)?;
        self.posts
            .set_counter(&scope, id, CounterColumn::Likes, like_count, None)
            .await
            .map_err(failed)?;
        Ok(LikeToggle { liked, like_count })
    }

    async fn load_detail(
        &self,
        caller: Option<&Caller>,
        id: Uuid,
        failure: &'static str,
    ) -> Result<Option<PostDetail>, Error> {
        let scope = caller.map_or(AccessScope::Anonymous, Caller::scope);
        let failed = |err: BackendError| err.into_internal(failure);

        let Some(view) = self.posts.find_view(&scope, id).await.map_err(failed)? else {
            return Ok(None);
        };
        let comments = self
            .comments
            .list_for_post(&scope, id)
            .await
            .map_err(failed)?;
        let likes = self.posts.likes(&scope, id).await.map_err(failed)?;
        let user_liked =
            caller.is_some_and(|caller| likes.iter().any(|like| like.user_id == *caller.id()));

        Ok(Some(PostDetail {
            view,
            user_liked,
            comments,
            likes,
        }))
    }
}

fn may_remove(caller: &Caller, post: &Post) -> bool {
    post.user_id == *caller.id() || caller.role().can_moderate()
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
