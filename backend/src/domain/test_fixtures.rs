//! Shared builders for service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use super::{
    AccessToken, AuthAccount, Caller, Comment, CommentView, Post, PostView, Trip, UserId,
    UserRole,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn caller_with_role(role: UserRole) -> Caller {
    let account = AuthAccount {
        id: UserId::random(),
        email: "traveller@example.com".to_owned(),
        name: Some("Traveller".to_owned()),
        role,
    };
    Caller::new(account, AccessToken::new("caller-token").expect("non-empty token"))
}

pub(crate) fn caller() -> Caller {
    caller_with_role(UserRole::Traveler)
}

pub(crate) fn trip_owned_by(owner: UserId) -> Trip {
    Trip {
        id: Uuid::new_v4(),
        user_id: owner,
        destination_id: Uuid::new_v4(),
        start_date: fixture_timestamp(),
        end_date: fixture_timestamp(),
        budget: Some(0.0),
        notes: Some(String::new()),
        is_public: false,
        created_at: fixture_timestamp(),
        updated_at: None,
    }
}

pub(crate) fn post_by(author: UserId) -> Post {
    Post {
        id: Uuid::new_v4(),
        user_id: author,
        destination_id: None,
        title: "Night market".to_owned(),
        content: "Try the dumplings".to_owned(),
        images: Vec::new(),
        rating: None,
        is_public: true,
        created_at: fixture_timestamp(),
        updated_at: None,
    }
}

pub(crate) fn post_view(post: Post, like_count: u64, comment_count: u64) -> PostView {
    PostView {
        post,
        users: None,
        destinations: None,
        like_count,
        comment_count,
    }
}

pub(crate) fn comment_by(author: UserId, post_id: Uuid) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        post_id,
        user_id: author,
        parent_comment_id: None,
        content: "Great tip".to_owned(),
        created_at: fixture_timestamp(),
        updated_at: None,
    }
}

pub(crate) fn comment_view(comment: Comment) -> CommentView {
    CommentView {
        comment,
        users: None,
    }
}
