//! Comments on community posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UserId, UserSummary};

/// `comments` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Row id.
    pub id: Uuid,
    /// Post commented on.
    pub post_id: Uuid,
    /// Author.
    pub user_id: UserId,
    /// Comment replied to.
    #[serde(default)]
    pub parent_comment_id: Option<Uuid>,
    /// Body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Comment with its author badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    /// The comment row.
    #[serde(flatten)]
    pub comment: Comment,
    /// Author badge.
    #[serde(default)]
    pub users: Option<UserSummary>,
}

/// Filters for the comment listing. At least one must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentFilter {
    /// Restrict to one post.
    pub post_id: Option<Uuid>,
    /// Restrict to one author.
    pub user_id: Option<UserId>,
}

impl CommentFilter {
    /// Whether the filter names a post or an author.
    #[must_use]
    pub fn is_scoped(&self) -> bool {
        self.post_id.is_some() || self.user_id.is_some()
    }

    /// Evaluate the filter against a row.
    #[must_use]
    pub fn matches(&self, comment: &Comment) -> bool {
        self.post_id.is_none_or(|id| comment.post_id == id)
            && self.user_id.is_none_or(|id| comment.user_id == id)
    }
}

/// Validated input for a new comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    /// Post.
    pub post_id: Uuid,
    /// Author.
    pub user_id: UserId,
    /// Reply target.
    pub parent_comment_id: Option<Uuid>,
    /// Body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
