//! `comments` table.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{InMemoryBackend, Tables, count};
use crate::domain::ports::{BackendError, CommentRepository};
use crate::domain::{
    AccessScope, Comment, CommentFilter, CommentView, NewComment, Page, PageRequest,
};

impl Tables {
    fn comment_views(&self, keep: impl Fn(&Comment) -> bool) -> Vec<CommentView> {
        let mut rows: Vec<&Comment> = self.comments.iter().filter(|c| keep(c)).collect();
        rows.sort_by_key(|comment| Reverse(comment.created_at));
        rows.into_iter()
            .map(|comment| self.comment_view(comment))
            .collect()
    }

    /// Ids of `root` and every reply beneath it.
    fn comment_thread(&self, root: Uuid) -> Vec<Uuid> {
        let mut thread = vec![root];
        let mut cursor = 0;
        while let Some(&parent) = thread.get(cursor) {
            thread.extend(
                self.comments
                    .iter()
                    .filter(|comment| comment.parent_comment_id == Some(parent))
                    .map(|comment| comment.id),
            );
            cursor += 1;
        }
        thread
    }
}

#[async_trait]
impl CommentRepository for InMemoryBackend {
    async fn list(
        &self,
        _scope: &AccessScope,
        filter: &CommentFilter,
        page: PageRequest,
    ) -> Result<Page<CommentView>, BackendError> {
        let views = self.lock()?.comment_views(|comment| filter.matches(comment));
        Ok(Page::from_all(views, page))
    }

    async fn list_for_post(
        &self,
        _scope: &AccessScope,
        post_id: Uuid,
    ) -> Result<Vec<CommentView>, BackendError> {
        Ok(self
            .lock()?
            .comment_views(|comment| comment.post_id == post_id))
    }

    async fn find_view(
        &self,
        _scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<CommentView>, BackendError> {
        let tables = self.lock()?;
        Ok(tables
            .comments
            .iter()
            .find(|comment| comment.id == id)
            .map(|comment| tables.comment_view(comment)))
    }

    async fn find(&self, _scope: &AccessScope, id: Uuid) -> Result<Option<Comment>, BackendError> {
        Ok(self
            .lock()?
            .comments
            .iter()
            .find(|comment| comment.id == id)
            .cloned())
    }

    async fn insert(
        &self,
        _scope: &AccessScope,
        comment: &NewComment,
    ) -> Result<CommentView, BackendError> {
        let mut tables = self.lock()?;
        if !tables.posts.iter().any(|stored| stored.post.id == comment.post_id) {
            return Err(BackendError::rejected(
                "insert or update on table \"comments\" violates foreign key constraint \"comments_post_id_fkey\"",
            ));
        }
        let row = Comment {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            user_id: comment.user_id,
            parent_comment_id: comment.parent_comment_id,
            content: comment.content.clone(),
            created_at: comment.created_at,
            updated_at: None,
        };
        let view = tables.comment_view(&row);
        tables.comments.push(row);
        Ok(view)
    }

    async fn update_content(
        &self,
        _scope: &AccessScope,
        id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<CommentView>, BackendError> {
        let mut tables = self.lock()?;
        let Some(row) = tables.comments.iter_mut().find(|comment| comment.id == id) else {
            return Ok(None);
        };
        content.clone_into(&mut row.content);
        row.updated_at = Some(updated_at);
        let updated = row.clone();
        Ok(Some(tables.comment_view(&updated)))
    }

    async fn delete(&self, _scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        let mut tables = self.lock()?;
        let thread = tables.comment_thread(id);
        tables
            .comments
            .retain(|comment| !thread.contains(&comment.id));
        Ok(())
    }

    async fn count_for_post(
        &self,
        _scope: &AccessScope,
        post_id: Uuid,
    ) -> Result<u64, BackendError> {
        Ok(count(
            self.lock()?
                .comments
                .iter()
                .filter(|comment| comment.post_id == post_id),
        ))
    }
}
