//! `posts` and `post_likes` over PostgREST.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use super::SupabaseBackend;
use super::dto::{POST_VIEW_SELECT, PostViewDto};
use super::query::{Direction, Query};
use crate::domain::ports::{BackendError, PostRepository};
use crate::domain::{
    AccessScope, CounterColumn, LikeRef, NewPost, Page, PageRequest, Post, PostChanges,
    PostFilter, PostLike, PostView, UserId,
};

const POSTS: &str = "posts";
const LIKES: &str = "post_likes";

fn newest_first(query: Query) -> Query {
    query.order("created_at", Direction::Desc)
}

impl SupabaseBackend {
    async fn post_page(
        &self,
        scope: &AccessScope,
        query: Query,
        page: PageRequest,
    ) -> Result<Page<PostView>, BackendError> {
        let rows: Page<PostViewDto> = self.client.fetch_page(scope, POSTS, query, page).await?;
        Ok(rows.map(PostView::from))
    }
}

#[async_trait]
impl PostRepository for SupabaseBackend {
    async fn list(
        &self,
        scope: &AccessScope,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, BackendError> {
        let mut query = Query::select(POST_VIEW_SELECT);
        if let Some(destination_id) = filter.destination_id {
            query = query.eq("destination_id", destination_id);
        }
        if let Some(user_id) = filter.user_id {
            query = query.eq("user_id", user_id);
        }
        self.post_page(scope, newest_first(query), page).await
    }

    async fn list_by_authors(
        &self,
        scope: &AccessScope,
        authors: &[UserId],
        page: PageRequest,
    ) -> Result<Page<PostView>, BackendError> {
        if authors.is_empty() {
            return Ok(Page::new(Vec::new(), 0, page));
        }
        let query = Query::select(POST_VIEW_SELECT).one_of("user_id", authors);
        self.post_page(scope, newest_first(query), page).await
    }

    async fn popular(
        &self,
        scope: &AccessScope,
        page: PageRequest,
    ) -> Result<Page<PostView>, BackendError> {
        let query = Query::select(POST_VIEW_SELECT).order("like_count", Direction::Desc);
        self.post_page(scope, newest_first(query), page).await
    }

    async fn find_view(
        &self,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<PostView>, BackendError> {
        let query = Query::select(POST_VIEW_SELECT).eq("id", id);
        let row: Option<PostViewDto> = self.client.fetch_one(scope, POSTS, query).await?;
        Ok(row.map(PostView::from))
    }

    async fn find(&self, scope: &AccessScope, id: Uuid) -> Result<Option<Post>, BackendError> {
        let query = Query::select("*").eq("id", id);
        self.client.fetch_one(scope, POSTS, query).await
    }

    async fn list_for_author(
        &self,
        scope: &AccessScope,
        author: &UserId,
    ) -> Result<Vec<PostView>, BackendError> {
        let query = newest_first(Query::select(POST_VIEW_SELECT).eq("user_id", author));
        let rows: Vec<PostViewDto> = self.client.fetch(scope, POSTS, &query).await?;
        Ok(rows.into_iter().map(PostView::from).collect())
    }

    async fn insert(&self, scope: &AccessScope, post: &NewPost) -> Result<Post, BackendError> {
        self.client.insert(scope, POSTS, post, "*").await
    }

    async fn update(
        &self,
        scope: &AccessScope,
        id: Uuid,
        changes: &PostChanges,
    ) -> Result<Option<Post>, BackendError> {
        let query = Query::select("*").eq("id", id);
        self.client.update(scope, POSTS, &query, changes).await
    }

    async fn delete(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        self.client
            .delete(scope, POSTS, &Query::filter().eq("id", id))
            .await
    }

    async fn likes(&self, scope: &AccessScope, post_id: Uuid) -> Result<Vec<LikeRef>, BackendError> {
        let query = Query::select("user_id").eq("post_id", post_id);
        self.client.fetch(scope, LIKES, &query).await
    }

    async fn find_like(
        &self,
        scope: &AccessScope,
        post_id: Uuid,
        user: &UserId,
    ) -> Result<Option<PostLike>, BackendError> {
        let query = Query::select("*").eq("post_id", post_id).eq("user_id", user);
        self.client.fetch_one(scope, LIKES, query).await
    }

    async fn insert_like(
        &self,
        scope: &AccessScope,
        post_id: Uuid,
        user: &UserId,
        created_at: DateTime<Utc>,
    ) -> Result<PostLike, BackendError> {
        let body = json!({
            "post_id": post_id,
            "user_id": user,
            "created_at": created_at,
        });
        self.client.insert(scope, LIKES, &body, "*").await
    }

    async fn delete_like(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        self.client
            .delete(scope, LIKES, &Query::filter().eq("id", id))
            .await
    }

    async fn count_likes(&self, scope: &AccessScope, post_id: Uuid) -> Result<u64, BackendError> {
        self.client
            .count(scope, LIKES, &Query::filter().eq("post_id", post_id))
            .await
    }

    async fn set_counter(
        &self,
        scope: &AccessScope,
        post_id: Uuid,
        column: CounterColumn,
        value: u64,
        updated_at: Option<DateTime<Utc>>,
    ) -> Result<(), BackendError> {
        let mut body = Map::new();
        body.insert(column.as_str().to_owned(), json!(value));
        if let Some(stamp) = updated_at {
            body.insert("updated_at".to_owned(), json!(stamp));
        }
        self.client
            .patch(
                scope,
                POSTS,
                &Query::filter().eq("id", post_id),
                &Value::Object(body),
            )
            .await
    }
}
