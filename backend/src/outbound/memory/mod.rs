//! In-process backend holding every table in memory.
//!
//! Serves offline mode and the API contract tests. It emulates the
//! store-side guarantees the services rely on: cascade deletes, one like
//! per user and post, and provider-issued bearer tokens. Row-level policies
//! are not modelled, so every [`AccessScope`](crate::domain::AccessScope)
//! sees every row.
//!
//! All tables sit behind one [`Mutex`]; no method holds the guard across an
//! await point.

mod activities;
mod auth;
mod bookings;
mod comments;
mod destinations;
mod posts;
mod seed;
mod trips;
mod users;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use mockable::{Clock, DefaultClock};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::BackendError;
use crate::domain::{
    Activity, ActivityRating, ActivityType, ActivityWithType, AuthAccount, Booking, BookingType,
    BookingWithType, Comment, CommentView, Destination, Follow, Post, PostLike, PostView, Trip,
    UserId, UserProfile, UserSummary,
};

pub use seed::{DEMO_EMAIL, DEMO_PASSWORD, MODERATOR_EMAIL, MODERATOR_PASSWORD};

struct StoredAccount {
    account: AuthAccount,
    password: Zeroizing<String>,
}

struct StoredPost {
    post: Post,
    like_count: u64,
    comment_count: u64,
}

#[derive(Default)]
struct Tables {
    accounts: Vec<StoredAccount>,
    sessions: HashMap<String, UserId>,
    users: Vec<UserProfile>,
    follows: Vec<Follow>,
    destinations: Vec<Destination>,
    activity_types: Vec<ActivityType>,
    activities: Vec<Activity>,
    ratings: Vec<ActivityRating>,
    trips: Vec<Trip>,
    booking_types: Vec<BookingType>,
    bookings: Vec<Booking>,
    posts: Vec<StoredPost>,
    likes: Vec<PostLike>,
    comments: Vec<Comment>,
}

impl Tables {
    fn user_summary(&self, id: &UserId) -> Option<UserSummary> {
        self.users
            .iter()
            .find(|user| &user.id == id)
            .map(UserProfile::summary)
    }

    fn destination(&self, id: Uuid) -> Option<&Destination> {
        self.destinations
            .iter()
            .find(|destination| destination.id == id)
    }

    fn activity(&self, id: Uuid) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.id == id)
    }

    fn activity_with_type(&self, activity: &Activity) -> ActivityWithType {
        ActivityWithType {
            activity: activity.clone(),
            activity_types: self
                .activity_types
                .iter()
                .find(|kind| kind.id == activity.type_id)
                .map(ActivityType::badge),
        }
    }

    fn booking_type(&self, id: Uuid) -> Option<&BookingType> {
        self.booking_types.iter().find(|kind| kind.id == id)
    }

    fn booking_with_type(&self, booking: &Booking) -> BookingWithType {
        BookingWithType {
            booking: booking.clone(),
            booking_types: self.booking_type(booking.type_id).map(BookingType::badge),
        }
    }

    fn post_view(&self, stored: &StoredPost) -> PostView {
        let post = &stored.post;
        PostView {
            post: post.clone(),
            users: self.user_summary(&post.user_id),
            destinations: post
                .destination_id
                .and_then(|id| self.destination(id))
                .map(Destination::summary),
            like_count: count(self.likes.iter().filter(|like| like.post_id == post.id)),
            comment_count: count(
                self.comments
                    .iter()
                    .filter(|comment| comment.post_id == post.id),
            ),
        }
    }

    fn comment_view(&self, comment: &Comment) -> CommentView {
        CommentView {
            comment: comment.clone(),
            users: self.user_summary(&comment.user_id),
        }
    }
}

fn count<T>(rows: impl Iterator<Item = T>) -> u64 {
    u64::try_from(rows.count()).unwrap_or(u64::MAX)
}

/// Backend adapter implementing every driven port against in-memory
/// tables.
///
/// Cloning shares the same tables.
#[derive(Clone)]
pub struct InMemoryBackend {
    tables: Arc<Mutex<Tables>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryBackend {
    /// A backend with no rows and no accounts.
    pub fn empty(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            clock,
        }
    }

    /// A backend pre-loaded with reference data: activity and booking
    /// types, a handful of destinations and activities, and the demo and
    /// moderator accounts.
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let mut tables = Tables::default();
        seed::populate(&mut tables, clock.utc());
        Self {
            tables: Arc::new(Mutex::new(tables)),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, BackendError> {
        self.tables
            .lock()
            .map_err(|_| BackendError::transport("in-memory store lock poisoned"))
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::seeded(Arc::new(DefaultClock))
    }
}

#[cfg(test)]
mod tests;
