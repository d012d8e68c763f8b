//! `posts` and `post_likes` tables.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::{InMemoryBackend, StoredPost, Tables, count};
use crate::domain::ports::{BackendError, PostRepository};
use crate::domain::{
    AccessScope, CounterColumn, LikeRef, NewPost, Page, PageRequest, Post, PostChanges,
    PostFilter, PostLike, PostView, UserId,
};

impl Tables {
    /// Views of the matching posts, newest first.
    fn post_views(&self, keep: impl Fn(&Post) -> bool) -> Vec<PostView> {
        let mut rows: Vec<&StoredPost> = self
            .posts
            .iter()
            .filter(|stored| keep(&stored.post))
            .collect();
        rows.sort_by_key(|stored| Reverse(stored.post.created_at));
        rows.into_iter().map(|stored| self.post_view(stored)).collect()
    }

    fn stored_post(&self, id: Uuid) -> Option<&StoredPost> {
        self.posts.iter().find(|stored| stored.post.id == id)
    }
}

#[async_trait]
impl PostRepository for InMemoryBackend {
    async fn list(
        &self,
        _scope: &AccessScope,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, BackendError> {
        let views = self.lock()?.post_views(|post| filter.matches(post));
        Ok(Page::from_all(views, page))
    }

    async fn list_by_authors(
        &self,
        _scope: &AccessScope,
        authors: &[UserId],
        page: PageRequest,
    ) -> Result<Page<PostView>, BackendError> {
        let views = self
            .lock()?
            .post_views(|post| authors.contains(&post.user_id));
        Ok(Page::from_all(views, page))
    }

    async fn popular(
        &self,
        _scope: &AccessScope,
        page: PageRequest,
    ) -> Result<Page<PostView>, BackendError> {
        let tables = self.lock()?;
        let mut rows: Vec<&StoredPost> = tables.posts.iter().collect();
        rows.sort_by_key(|stored| Reverse((stored.like_count, stored.post.created_at)));
        let views = rows
            .into_iter()
            .map(|stored| tables.post_view(stored))
            .collect();
        Ok(Page::from_all(views, page))
    }

    async fn find_view(
        &self,
        _scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<PostView>, BackendError> {
        let tables = self.lock()?;
        Ok(tables.stored_post(id).map(|stored| tables.post_view(stored)))
    }

    async fn find(&self, _scope: &AccessScope, id: Uuid) -> Result<Option<Post>, BackendError> {
        Ok(self.lock()?.stored_post(id).map(|stored| stored.post.clone()))
    }

    async fn list_for_author(
        &self,
        _scope: &AccessScope,
        author: &UserId,
    ) -> Result<Vec<PostView>, BackendError> {
        Ok(self.lock()?.post_views(|post| &post.user_id == author))
    }

    async fn insert(&self, _scope: &AccessScope, post: &NewPost) -> Result<Post, BackendError> {
        let mut tables = self.lock()?;
        if let Some(destination_id) = post.destination_id {
            if tables.destination(destination_id).is_none() {
                return Err(BackendError::rejected(
                    "insert or update on table \"posts\" violates foreign key constraint \"posts_destination_id_fkey\"",
                ));
            }
        }
        let row = Post {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            destination_id: post.destination_id,
            title: post.title.clone(),
            content: post.content.clone(),
            images: post.images.clone(),
            rating: post.rating,
            is_public: post.is_public,
            created_at: post.created_at,
            updated_at: None,
        };
        tables.posts.push(StoredPost {
            post: row.clone(),
            like_count: 0,
            comment_count: 0,
        });
        Ok(row)
    }

    async fn update(
        &self,
        _scope: &AccessScope,
        id: Uuid,
        changes: &PostChanges,
    ) -> Result<Option<Post>, BackendError> {
        let mut tables = self.lock()?;
        Ok(tables
            .posts
            .iter_mut()
            .find(|stored| stored.post.id == id)
            .map(|stored| {
                changes.apply_to(&mut stored.post);
                stored.post.clone()
            }))
    }

    async fn delete(&self, _scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        let mut tables = self.lock()?;
        tables.posts.retain(|stored| stored.post.id != id);
        tables.likes.retain(|like| like.post_id != id);
        tables.comments.retain(|comment| comment.post_id != id);
        Ok(())
    }

    async fn likes(&self, _scope: &AccessScope, post_id: Uuid) -> Result<Vec<LikeRef>, BackendError> {
        Ok(self
            .lock()?
            .likes
            .iter()
            .filter(|like| like.post_id == post_id)
            .map(|like| LikeRef {
                user_id: like.user_id,
            })
            .collect())
    }

    async fn find_like(
        &self,
        _scope: &AccessScope,
        post_id: Uuid,
        user: &UserId,
    ) -> Result<Option<PostLike>, BackendError> {
        Ok(self
            .lock()?
            .likes
            .iter()
            .find(|like| like.post_id == post_id && &like.user_id == user)
            .copied())
    }

    async fn insert_like(
        &self,
        _scope: &AccessScope,
        post_id: Uuid,
        user: &UserId,
        created_at: DateTime<Utc>,
    ) -> Result<PostLike, BackendError> {
        let mut tables = self.lock()?;
        if tables
            .likes
            .iter()
            .any(|like| like.post_id == post_id && &like.user_id == user)
        {
            return Err(BackendError::rejected(
                "duplicate key value violates unique constraint \"post_likes_post_id_user_id_key\"",
            ));
        }
        let like = PostLike {
            id: Uuid::new_v4(),
            post_id,
            user_id: *user,
            created_at,
        };
        tables.likes.push(like);
        Ok(like)
    }

    async fn delete_like(&self, _scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        self.lock()?.likes.retain(|like| like.id != id);
        Ok(())
    }

    async fn count_likes(&self, _scope: &AccessScope, post_id: Uuid) -> Result<u64, BackendError> {
        Ok(count(
            self.lock()?
                .likes
                .iter()
                .filter(|like| like.post_id == post_id),
        ))
    }

    async fn set_counter(
        &self,
        _scope: &AccessScope,
        post_id: Uuid,
        column: CounterColumn,
        value: u64,
        updated_at: Option<DateTime<Utc>>,
    ) -> Result<(), BackendError> {
        let mut tables = self.lock()?;
        if let Some(stored) = tables
            .posts
            .iter_mut()
            .find(|stored| stored.post.id == post_id)
        {
            let slot = match column {
                CounterColumn::Likes => &mut stored.like_count,
                CounterColumn::Comments => &mut stored.comment_count,
            };
            let previous = std::mem::replace(slot, value);
            debug!(%post_id, column = column.as_str(), previous, value, "post counter stored");
            if updated_at.is_some() {
                stored.post.updated_at = updated_at;
            }
        }
        Ok(())
    }
}
