//! `users` and `user_follows` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::InMemoryBackend;
use crate::domain::ports::{BackendError, UserRepository};
use crate::domain::{AccessScope, Follow, NewProfile, ProfileChanges, UserId, UserProfile};

#[async_trait]
impl UserRepository for InMemoryBackend {
    async fn insert_profile(
        &self,
        _scope: &AccessScope,
        profile: &NewProfile,
    ) -> Result<UserProfile, BackendError> {
        let mut tables = self.lock()?;
        if tables.users.iter().any(|user| user.id == profile.id) {
            return Err(BackendError::rejected(
                "duplicate key value violates unique constraint \"users_pkey\"",
            ));
        }
        let row = UserProfile {
            id: profile.id,
            email: profile.email.clone(),
            name: profile.name.clone(),
            bio: None,
            profile_picture: None,
            preferences: None,
            created_at: profile.created_at,
            updated_at: None,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_profile(
        &self,
        _scope: &AccessScope,
        id: &UserId,
    ) -> Result<Option<UserProfile>, BackendError> {
        Ok(self.lock()?.users.iter().find(|user| &user.id == id).cloned())
    }

    async fn update_profile(
        &self,
        _scope: &AccessScope,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<UserProfile>, BackendError> {
        let mut tables = self.lock()?;
        Ok(tables
            .users
            .iter_mut()
            .find(|user| &user.id == id)
            .map(|user| {
                changes.apply_to(user);
                user.clone()
            }))
    }

    async fn find_follow(
        &self,
        _scope: &AccessScope,
        follower: &UserId,
        following: &UserId,
    ) -> Result<Option<Follow>, BackendError> {
        Ok(self
            .lock()?
            .follows
            .iter()
            .find(|follow| &follow.follower_id == follower && &follow.following_id == following)
            .copied())
    }

    async fn insert_follow(
        &self,
        _scope: &AccessScope,
        follower: &UserId,
        following: &UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Follow, BackendError> {
        let mut tables = self.lock()?;
        if tables
            .follows
            .iter()
            .any(|follow| &follow.follower_id == follower && &follow.following_id == following)
        {
            return Err(BackendError::rejected(
                "duplicate key value violates unique constraint \"user_follows_pair_key\"",
            ));
        }
        let follow = Follow {
            id: Uuid::new_v4(),
            follower_id: *follower,
            following_id: *following,
            created_at,
        };
        tables.follows.push(follow);
        Ok(follow)
    }

    async fn delete_follow(&self, _scope: &AccessScope, id: Uuid) -> Result<(), BackendError> {
        self.lock()?.follows.retain(|follow| follow.id != id);
        Ok(())
    }

    async fn list_followed(
        &self,
        _scope: &AccessScope,
        follower: &UserId,
    ) -> Result<Vec<UserId>, BackendError> {
        Ok(self
            .lock()?
            .follows
            .iter()
            .filter(|follow| &follow.follower_id == follower)
            .map(|follow| follow.following_id)
            .collect())
    }
}
