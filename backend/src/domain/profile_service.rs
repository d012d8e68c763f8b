//! Member profiles, their own trips and posts, and the follow graph.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{BackendError, PostRepository, TripRepository, UserRepository};
use crate::domain::{
    AccessScope, Caller, Error, PostView, ProfileChanges, PublicProfile, Trip, UserId,
    UserProfile,
};

/// Service behind the `/api/users` routes.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    trips: Arc<dyn TripRepository>,
    posts: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    /// Create a service over the given repositories.
    pub fn new(
        users: Arc<dyn UserRepository>,
        trips: Arc<dyn TripRepository>,
        posts: Arc<dyn PostRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            trips,
            posts,
            clock,
        }
    }

    /// The caller's full profile row.
    pub async fn own_profile(&self, caller: &Caller) -> Result<UserProfile, Error> {
        self.users
            .find_profile(&caller.scope(), caller.id())
            .await
            .map_err(|err| err.into_internal("Failed to fetch user profile"))?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Apply a partial update to the caller's profile.
    pub async fn update_own_profile(
        &self,
        caller: &Caller,
        changes: ProfileChanges,
    ) -> Result<UserProfile, Error> {
        let changes = ProfileChanges {
            updated_at: Some(self.clock.utc()),
            ..changes.normalised()
        };
        self.users
            .update_profile(&caller.scope(), caller.id(), &changes)
            .await
            .map_err(|err| err.into_internal("Failed to update user profile"))?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Anyone's public profile.
    pub async fn public_profile(&self, id: &UserId) -> Result<PublicProfile, Error> {
        self.users
            .find_profile(&AccessScope::Anonymous, id)
            .await
            .map_err(|err| err.into_internal("Failed to fetch user"))?
            .map(|profile| profile.public())
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// The caller's trips, earliest departure first.
    pub async fn own_trips(&self, caller: &Caller) -> Result<Vec<Trip>, Error> {
        self.trips
            .list_by_owner(&caller.scope(), caller.id())
            .await
            .map_err(|err| err.into_internal("Failed to fetch user trips"))
    }

    /// The caller's posts, newest first.
    pub async fn own_posts(&self, caller: &Caller) -> Result<Vec<PostView>, Error> {
        self.posts
            .list_for_author(&caller.scope(), caller.id())
            .await
            .map_err(|err| err.into_internal("Failed to fetch user posts"))
    }

    /// Follow `target`, or unfollow when already following. Returns whether
    /// the caller follows `target` afterwards.
    pub async fn toggle_follow(&self, caller: &Caller, target: &UserId) -> Result<bool, Error> {
        if caller.id() == target {
            return Err(Error::invalid_request("Cannot follow yourself"));
        }
        let scope = caller.scope();
        let failed = |err: BackendError| err.into_internal("Failed to update follow");

        if self
            .users
            .find_profile(&scope, target)
            .await
            .map_err(failed)?
            .is_none()
        {
            return Err(Error::not_found("User not found"));
        }

        match self
            .users
            .find_follow(&scope, caller.id(), target)
            .await
            .map_err(failed)?
        {
            Some(existing) => {
                self.users
                    .delete_follow(&scope, existing.id)
                    .await
                    .map_err(failed)?;
                Ok(false)
            }
            None => {
                self.users
                    .insert_follow(&scope, caller.id(), target, self.clock.utc())
                    .await
                    .map_err(failed)?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPostRepository, MockTripRepository, MockUserRepository};
    use crate::domain::test_fixtures::{caller, fixture_clock, fixture_timestamp};
    use crate::domain::{ErrorCode, Follow};
    use chrono::Utc;
    use uuid::Uuid;

    fn make_service(users: MockUserRepository) -> ProfileService {
        ProfileService::new(
            Arc::new(users),
            Arc::new(MockTripRepository::new()),
            Arc::new(MockPostRepository::new()),
            fixture_clock(),
        )
    }

    fn profile(id: UserId) -> UserProfile {
        UserProfile {
            id,
            email: "grace@example.com".to_owned(),
            name: "Grace".to_owned(),
            bio: None,
            profile_picture: None,
            preferences: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn following_yourself_is_rejected() {
        let me = caller();
        let err = make_service(MockUserRepository::new())
            .toggle_follow(&me, me.id())
            .await
            .expect_err("self follow fails");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Cannot follow yourself");
    }

    #[tokio::test]
    async fn toggling_an_existing_follow_removes_it() {
        let me = caller();
        let target = UserId::random();
        let follow_id = Uuid::new_v4();
        let follower = *me.id();
        let mut users = MockUserRepository::new();
        users
            .expect_find_profile()
            .return_once(move |_, id| Ok(Some(profile(*id))));
        users.expect_find_follow().return_once(move |_, _, _| {
            Ok(Some(Follow {
                id: follow_id,
                follower_id: follower,
                following_id: target,
                created_at: Utc::now(),
            }))
        });
        users
            .expect_delete_follow()
            .withf(move |_, id| *id == follow_id)
            .times(1)
            .return_once(|_, _| Ok(()));

        let following = make_service(users)
            .toggle_follow(&me, &target)
            .await
            .expect("toggle succeeds");
        assert!(!following);
    }

    #[tokio::test]
    async fn following_an_unknown_member_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_profile().return_once(|_, _| Ok(None));
        users.expect_insert_follow().never();

        let err = make_service(users)
            .toggle_follow(&caller(), &UserId::random())
            .await
            .expect_err("unknown target");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn profile_updates_are_normalised_and_stamped() {
        let me = caller();
        let mut users = MockUserRepository::new();
        users
            .expect_update_profile()
            .withf(|_, _, changes| {
                changes.name.is_none() && changes.updated_at == Some(fixture_timestamp())
            })
            .times(1)
            .return_once(move |_, id, _| Ok(Some(profile(*id))));

        let changes = ProfileChanges {
            name: Some("  ".to_owned()),
            ..ProfileChanges::default()
        };
        make_service(users)
            .update_own_profile(&me, changes)
            .await
            .expect("update succeeds");
    }
}
