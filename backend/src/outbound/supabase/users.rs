//! `users` and `user_follows` over PostgREST.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use super::SupabaseBackend;
use super::dto::FollowingDto;
use super::query::Query;
use crate::domain::ports::{BackendError, UserRepository};
use crate::domain::{AccessScope, Follow, NewProfile, ProfileChanges, UserId, UserProfile};

const USERS: &str = "users";
const FOLLOWS: &str = "user_follows";

#[async_trait]
impl UserRepository for SupabaseBackend {
    async fn insert_profile(
        &self,
        scope: &AccessScope,
        profile: &NewProfile,
    ) -> Result<UserProfile, BackendError> {
        self.client.insert(scope, USERS, profile, "*").await
    }

    async fn find_profile(
        &self,
        scope: &AccessScope,
        id: &UserId,
    ) -> Result<Option<UserProfile>, BackendError> {
        let query = Query::select("*").eq("id", id);
        self.client.fetch_one(scope, USERS, query).await
    }

    async fn update_profile(
        &self,
        scope: &AccessScope,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<UserProfile>, BackendError> {
        let query = Query::select("*").eq("id", id);
        self.client.update(scope, USERS, &query, changes).await
    }

    async fn find_follow(
        &self,
        scope: &AccessScope,
        follower: &UserId,
        following: &UserId,
    ) -> Result<Option<Follow>, BackendError> {
        let query = Query::select("*")
            .eq("follower_id", follower)
            .eq("following_id", following);
        self.client.fetch_one(scope, FOLLOWS, query).await
    }

    async fn insert_follow(
        &self,
        scope: &AccessScope,
        follower: &UserId,
        following: &UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Follow, BackendError> {
        let body = json!({
            "follower_id": follower,
            "following_id": following,
            "created_at": created_at,
        });
        self.client.insert(scope, FOLLOWS, &body, "*").await
    }

    async fn delete_follow(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        self.client
            .delete(scope, FOLLOWS, &Query::filter().eq("id", id))
            .await
    }

    async fn list_followed(
        &self,
        scope: &AccessScope,
        follower: &UserId,
    ) -> Result<Vec<UserId>, BackendError> {
        let query = Query::select("following_id").eq("follower_id", follower);
        let rows: Vec<FollowingDto> = self.client.fetch(scope, FOLLOWS, &query).await?;
        Ok(rows.into_iter().map(|row| row.following_id).collect())
    }
}
