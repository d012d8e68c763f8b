//! Port for the `users` and `user_follows` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AccessScope, Follow, NewProfile, ProfileChanges, UserId, UserProfile};

use super::BackendError;

/// Profile and follow-graph persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the profile row created alongside a new account.
    async fn insert_profile(
        &self,
        scope: &AccessScope,
        profile: &NewProfile,
    ) -> Result<UserProfile, BackendError>;

    /// Fetch a profile by id.
    async fn find_profile(
        &self,
        scope: &AccessScope,
        id: &UserId,
    ) -> Result<Option<UserProfile>, BackendError>;

    /// Apply a partial update. Returns `None` when no row matched.
    async fn update_profile(
        &self,
        scope: &AccessScope,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<UserProfile>, BackendError>;

    /// Fetch the follow edge from `follower` to `following`, if any.
    async fn find_follow(
        &self,
        scope: &AccessScope,
        follower: &UserId,
        following: &UserId,
    ) -> Result<Option<Follow>, BackendError>;

    /// Record that `follower` follows `following`.
    async fn insert_follow(
        &self,
        scope: &AccessScope,
        follower: &UserId,
        following: &UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Follow, BackendError>;

    /// Remove a follow edge.
    async fn delete_follow(&self, scope: &AccessScope, id: Uuid) -> Result<(), BackendError>;

    /// Ids of every member `follower` follows.
    async fn list_followed(
        &self,
        scope: &AccessScope,
        follower: &UserId,
    ) -> Result<Vec<UserId>, BackendError>;
}
