//! `comments` over PostgREST.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use super::SupabaseBackend;
use super::dto::COMMENT_VIEW_SELECT;
use super::query::{Direction, Query};
use crate::domain::ports::{BackendError, CommentRepository};
use crate::domain::{
    AccessScope, Comment, CommentFilter, CommentView, NewComment, Page, PageRequest,
};

const COMMENTS: &str = "comments";

#[async_trait]
impl CommentRepository for SupabaseBackend {
    async fn list(
        &self,
        scope: &AccessScope,
        filter: &CommentFilter,
        page: PageRequest,
    ) -> Result<Page<CommentView>, BackendError> {
        let mut query = Query::select(COMMENT_VIEW_SELECT);
        if let Some(post_id) = filter.post_id {
            query = query.eq("post_id", post_id);
        }
        if let Some(user_id) = filter.user_id {
            query = query.eq("user_id", user_id);
        }
        let query = query.order("created_at", Direction::Desc);
        self.client.fetch_page(scope, COMMENTS, query, page).await
    }

    async fn list_for_post(
        &self,
        scope: &AccessScope,
        post_id: Uuid,
    ) -> Result<Vec<CommentView>, BackendError> {
        let query = Query::select(COMMENT_VIEW_SELECT)
            .eq("post_id", post_id)
            .order("created_at", Direction::Desc);
        self.client.fetch(scope, COMMENTS, &query).await
    }

    async fn find_view(
        &self,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<CommentView>, BackendError> {
        let query = Query::select(COMMENT_VIEW_SELECT).eq("id", id);
        self.client.fetch_one(scope, COMMENTS, query).await
    }

    async fn find(&self, scope: &AccessScope, id: Uuid) -> Result<Option<Comment>, BackendError> {
        let query = Query::select("*").eq("id", id);
        self.client.fetch_one(scope, COMMENTS, query).await
    }

    async fn insert(
        &self,
        scope: &AccessScope,
        comment: &NewComment,
    ) -> Result<CommentView, BackendError> {
        self.client
            .insert(scope, COMMENTS, comment, COMMENT_VIEW_SELECT)
            .await
    }

    async fn update_content(
        &self,
        scope: &AccessScope,
        id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<CommentView>, BackendError> {
        let query = Query::select(COMMENT_VIEW_SELECT).eq("id", id);
        let body = json!({ "content": content, "updated_at": updated_at });
        self.client.update(scope, COMMENTS, &query, &body).await
    }

    // Replies go with their parent through the schema's cascade.
    async fn delete(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        self.client
            .delete(scope, COMMENTS, &Query::filter().eq("id", id))
            .await
    }

    async fn count_for_post(
        &self,
        scope: &AccessScope,
        post_id: Uuid,
    ) -> Result<u64, BackendError> {
        self.client
            .count(scope, COMMENTS, &Query::filter().eq("post_id", post_id))
            .await
    }
}
