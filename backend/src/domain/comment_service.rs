//! Comments on posts, keeping `posts.comment_count` in step.
//!
//! Every insert, edit and delete is followed by a recount of the post's
//! comments and a write of the stored counter. The recount is not atomic
//! with the mutation.

use std::sync::Arc;

use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{BackendError, CommentRepository, PostRepository};
use crate::domain::{
    AccessScope, Caller, Comment, CommentFilter, CommentView, CounterColumn, Error, NewComment,
    Page, PageRequest,
};

/// Caller-supplied fields for a new comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    /// Post commented on.
    pub post_id: Uuid,
    /// Body.
    pub content: String,
    /// Comment replied to.
    pub parent_comment_id: Option<Uuid>,
}

/// Service behind the `/api/comments` routes.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
}

impl CommentService {
    /// Create a service over the given repositories.
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            comments,
            posts,
            clock,
        }
    }

    /// Comments on a post or by an author, newest first.
    pub async fn list(
        &self,
        filter: &CommentFilter,
        page: PageRequest,
    ) -> Result<Page<CommentView>, Error> {
        if !filter.is_scoped() {
            return Err(Error::invalid_request(
                "Missing query parameter: post_id or user_id is required",
            ));
        }
        self.comments
            .list(&AccessScope::Anonymous, filter, page)
            .await
            .map_err(|err| err.into_internal("Failed to fetch comments"))
    }

    /// One comment with its author badge.
    pub async fn detail(&self, id: Uuid) -> Result<CommentView, Error> {
        self.comments
            .find_view(&AccessScope::Anonymous, id)
            .await
            .map_err(|err| err.into_internal("Failed to fetch comment"))?
            .ok_or_else(|| Error::not_found("Comment not found"))
    }

    /// Comment on a post as the caller.
    pub async fn create(&self, caller: &Caller, draft: CommentDraft) -> Result<CommentView, Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to create comment");

        if self
            .posts
            .find(&scope, draft.post_id)
            .await
            .map_err(failed)?
            .is_none()
        {
            return Err(Error::not_found("Post not found"));
        }
        if let Some(parent_id) = draft.parent_comment_id {
            if self
                .comments
                .find(&scope, parent_id)
                .await
                .map_err(failed)?
                .is_none()
            {
                return Err(Error::not_found("Parent comment not found"));
            }
        }

        let comment = NewComment {
            post_id: draft.post_id,
            user_id: *caller.id(),
            parent_comment_id: draft.parent_comment_id,
            content: draft.content,
            created_at: self.clock.utc(),
        };
        let view = self
            .comments
            .insert(&scope, &comment)
            .await
            .map_err(failed)?;
        self.recount(&scope, draft.post_id).await.map_err(failed)?;
        Ok(view)
    }

    /// Replace the content of one of the caller's comments.
    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        content: &str,
    ) -> Result<CommentView, Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to update comment");
        let existing = self.require(&scope, id, failed).await?;
        if existing.user_id != *caller.id() {
            return Err(Error::forbidden("Not authorized to update this comment"));
        }

        let view = self
            .comments
            .update_content(&scope, id, content, self.clock.utc())
            .await
            .map_err(failed)?
            .ok_or_else(|| Error::not_found("Comment not found"))?;
        self.recount(&scope, existing.post_id)
            .await
            .map_err(failed)?;
        Ok(view)
    }

    /// Delete a comment and its replies. Authors may delete their own;
    /// moderators and admins may delete any.
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), Error> {
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to delete comment");
        let existing = self.require(&scope, id, failed).await?;
        if existing.user_id != *caller.id() && !caller.role().can_moderate() {
            return Err(Error::forbidden("Not authorized to delete this comment"));
        }

        self.comments.delete(&scope, id).await.map_err(failed)?;
        self.recount(&scope, existing.post_id).await.map_err(failed)
    }

    async fn require(
        &self,
        scope: &AccessScope,
        id: Uuid,
        failed: impl FnOnce(BackendError) -> Error,
    ) -> Result<Comment, Error> {
        self.comments
            .find(scope, id)
            .await
            .map_err(failed)?
            .ok_or_else(|| Error::not_found("Comment not found"))
    }

    async fn recount(&self, scope: &AccessScope, post_id: Uuid) -> Result<(), BackendError> {
        let count = self.comments.count_for_post(scope, post_id).await?;
        self.posts
            .set_counter(
                scope,
                post_id,
                CounterColumn::Comments,
                count,
                Some(self.clock.utc()),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::UserRole;
    use crate::domain::ports::{MockCommentRepository, MockPostRepository};
    use crate::domain::test_fixtures::{
        caller, caller_with_role, comment_by, comment_view, fixture_clock, fixture_timestamp,
        post_by,
    };
    use crate::domain::UserId;
    use rstest::rstest;

    fn make_service(comments: MockCommentRepository, posts: MockPostRepository) -> CommentService {
        CommentService::new(Arc::new(comments), Arc::new(posts), fixture_clock())
    }

    fn expect_recount(posts: &mut MockPostRepository, post_id: Uuid, count: u64) {
        posts
            .expect_set_counter()
            .withf(move |_, id, column, value, updated_at| {
                *id == post_id
                    && *column == CounterColumn::Comments
                    && *value == count
                    && *updated_at == Some(fixture_timestamp())
            })
            .times(1)
            .return_once(|_, _, _, _, _| Ok(()));
    }

    #[tokio::test]
    async fn unscoped_listing_is_rejected() {
        let err = make_service(MockCommentRepository::new(), MockPostRepository::new())
            .list(&CommentFilter::default(), PageRequest::default())
            .await
            .expect_err("unscoped");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn create_recounts_the_posts_comments() {
        let me = caller();
        let post = post_by(UserId::random());
        let post_id = post.id;
        let author = *me.id();
        let mut posts = MockPostRepository::new();
        posts.expect_find().return_once(move |_, _| Ok(Some(post)));
        expect_recount(&mut posts, post_id, 3);
        let mut comments = MockCommentRepository::new();
        comments
            .expect_insert()
            .return_once(move |_, _| Ok(comment_view(comment_by(author, post_id))));
        comments.expect_count_for_post().return_once(|_, _| Ok(3));

        let draft = CommentDraft {
            post_id,
            content: "Adding this to my list".to_owned(),
            parent_comment_id: None,
        };
        let view = make_service(comments, posts)
            .create(&me, draft)
            .await
            .expect("comment created");
        assert_eq!(view.comment.post_id, post_id);
    }

    #[tokio::test]
    async fn replying_to_a_missing_parent_is_not_found() {
        let post = post_by(UserId::random());
        let post_id = post.id;
        let mut posts = MockPostRepository::new();
        posts.expect_find().return_once(move |_, _| Ok(Some(post)));
        let mut comments = MockCommentRepository::new();
        comments.expect_find().return_once(|_, _| Ok(None));
        comments.expect_insert().never();

        let draft = CommentDraft {
            post_id,
            content: "Agreed".to_owned(),
            parent_comment_id: Some(Uuid::new_v4()),
        };
        let err = make_service(comments, posts)
            .create(&caller(), draft)
            .await
            .expect_err("missing parent");
        assert_eq!(err.message(), "Parent comment not found");
    }

    #[tokio::test]
    async fn strangers_cannot_edit_comments() {
        let existing = comment_by(UserId::random(), Uuid::new_v4());
        let id = existing.id;
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find()
            .return_once(move |_, _| Ok(Some(existing)));
        comments.expect_update_content().never();

        let err = make_service(comments, MockPostRepository::new())
            .update(&caller(), id, "edited")
            .await
            .expect_err("not the author");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "Not authorized to update this comment");
    }

    #[rstest]
    #[case::stranger(UserRole::Traveler, false)]
    #[case::moderator(UserRole::Moderator, true)]
    #[tokio::test]
    async fn delete_requires_author_or_moderator(#[case] role: UserRole, #[case] allowed: bool) {
        let existing = comment_by(UserId::random(), Uuid::new_v4());
        let id = existing.id;
        let post_id = existing.post_id;
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find()
            .return_once(move |_, _| Ok(Some(existing)));
        comments
            .expect_delete()
            .times(usize::from(allowed))
            .returning(|_, _| Ok(()));
        comments
            .expect_count_for_post()
            .times(usize::from(allowed))
            .returning(|_, _| Ok(0));
        let mut posts = MockPostRepository::new();
        if allowed {
            expect_recount(&mut posts, post_id, 0);
        }

        let result = make_service(comments, posts)
            .delete(&caller_with_role(role), id)
            .await;

        if allowed {
            result.expect("moderator deletes");
        } else {
            let err = result.expect_err("stranger is refused");
            assert_eq!(err.code(), ErrorCode::Forbidden);
            assert_eq!(err.message(), "Not authorized to delete this comment");
        }
    }
}
