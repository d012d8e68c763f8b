//! Community posts, likes and their derived counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patch::double_option;
use super::{CommentView, DestinationSummary, UserId, UserSummary};

/// `posts` row without the stored counters.
///
/// `like_count` and `comment_count` live on [`PostView`], computed from the
/// like and comment relations when read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Row id.
    pub id: Uuid,
    /// Author.
    pub user_id: UserId,
    /// Destination written about.
    #[serde(default)]
    pub destination_id: Option<Uuid>,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Gallery URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Author's rating of the destination.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Visible to other members.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Post with author and destination badges plus live counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    /// The post row.
    #[serde(flatten)]
    pub post: Post,
    /// Author badge.
    #[serde(default)]
    pub users: Option<UserSummary>,
    /// Destination badge.
    #[serde(default)]
    pub destinations: Option<DestinationSummary>,
    /// Likes on the post.
    #[serde(default)]
    pub like_count: u64,
    /// Comments on the post.
    #[serde(default)]
    pub comment_count: u64,
}

/// A like, as listed under a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRef {
    /// Member who liked the post.
    pub user_id: UserId,
}

/// `post_likes` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLike {
    /// Row id.
    pub id: Uuid,
    /// Liked post.
    pub post_id: Uuid,
    /// Member who liked it.
    pub user_id: UserId,
    /// When the like was recorded.
    pub created_at: DateTime<Utc>,
}

/// Post detail: the view plus the caller's like state, comments and likes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    /// Post with badges and counters.
    #[serde(flatten)]
    pub view: PostView,
    /// Whether the caller likes the post. `false` when anonymous.
    pub user_liked: bool,
    /// Comments with author badges, newest first.
    pub comments: Vec<CommentView>,
    /// Likes on the post.
    pub likes: Vec<LikeRef>,
}

impl PostDetail {
    /// Detail of a freshly written post with no engagement yet.
    #[must_use]
    pub fn fresh(view: PostView) -> Self {
        Self {
            view,
            user_liked: false,
            comments: Vec::new(),
            likes: Vec::new(),
        }
    }
}

/// Result of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeToggle {
    /// Whether the caller now likes the post.
    pub liked: bool,
    /// Likes after the toggle.
    pub like_count: u64,
}

/// Filters for the post listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Restrict to one destination.
    pub destination_id: Option<Uuid>,
    /// Restrict to one author.
    pub user_id: Option<UserId>,
}

impl PostFilter {
    /// Evaluate the filter against a row.
    #[must_use]
    pub fn matches(&self, post: &Post) -> bool {
        self.destination_id
            .is_none_or(|id| post.destination_id == Some(id))
            && self.user_id.is_none_or(|id| post.user_id == id)
    }
}

/// Validated input for a new post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPost {
    /// Author.
    pub user_id: UserId,
    /// Headline.
    pub title: String,
    /// Body.
    pub content: String,
    /// Destination.
    pub destination_id: Option<Uuid>,
    /// Gallery.
    pub images: Vec<String>,
    /// Rating.
    pub rating: Option<f64>,
    /// Visibility.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Partial post update. `destination_id` and `rating` are tri-state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostChanges {
    /// New headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New destination, or `Some(None)` to detach it.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub destination_id: Option<Option<Uuid>>,
    /// New gallery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// New rating, or `Some(None)` to clear it.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<Option<f64>>,
    /// New visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    /// Stamp applied by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PostChanges {
    /// Apply the changes to a post in place.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            post.content.clone_from(content);
        }
        if let Some(destination_id) = self.destination_id {
            post.destination_id = destination_id;
        }
        if let Some(images) = &self.images {
            post.images.clone_from(images);
        }
        if let Some(rating) = self.rating {
            post.rating = rating;
        }
        if let Some(is_public) = self.is_public {
            post.is_public = is_public;
        }
        if let Some(updated_at) = self.updated_at {
            post.updated_at = Some(updated_at);
        }
    }
}

/// Which stored counter to overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterColumn {
    /// `posts.like_count`.
    Likes,
    /// `posts.comment_count`.
    Comments,
}

impl CounterColumn {
    /// Column name in the `posts` table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Likes => "like_count",
            Self::Comments => "comment_count",
        }
    }
}
