//! Wire shapes that differ from the domain rows: GoTrue payloads and
//! aggregate embeds.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::ports::BackendError;
use crate::domain::{
    AccessToken, AuthAccount, AuthSession, DestinationSummary, Post, PostView, UserId, UserRole,
    UserSummary,
};

/// Select string for posts with badges and live counts.
pub(super) const POST_VIEW_SELECT: &str = "*, users(id,name,profile_picture), \
     destinations(id,name,country,image_url), post_likes(count), comments(count)";

/// Select string for comments with the author badge.
pub(super) const COMMENT_VIEW_SELECT: &str = "*, users(id,name,profile_picture)";

/// `relation(count)` embed.
#[derive(Debug, Deserialize)]
pub(super) struct CountDto {
    count: u64,
}

fn embedded_count(rows: &[CountDto]) -> u64 {
    rows.first().map_or(0, |row| row.count)
}

/// Post row with aggregate embeds for likes and comments.
#[derive(Debug, Deserialize)]
pub(super) struct PostViewDto {
    #[serde(flatten)]
    post: Post,
    #[serde(default)]
    users: Option<UserSummary>,
    #[serde(default)]
    destinations: Option<DestinationSummary>,
    #[serde(default)]
    post_likes: Vec<CountDto>,
    #[serde(default)]
    comments: Vec<CountDto>,
}

impl From<PostViewDto> for PostView {
    fn from(dto: PostViewDto) -> Self {
        Self {
            like_count: embedded_count(&dto.post_likes),
            comment_count: embedded_count(&dto.comments),
            post: dto.post,
            users: dto.users,
            destinations: dto.destinations,
        }
    }
}

/// GoTrue user object.
#[derive(Debug, Deserialize)]
pub(super) struct GoTrueUserDto {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Map<String, Value>,
}

impl From<GoTrueUserDto> for AuthAccount {
    fn from(dto: GoTrueUserDto) -> Self {
        let metadata = |key: &str| dto.user_metadata.get(key).and_then(Value::as_str);
        let role = metadata("role").or_else(|| metadata("userRole"));
        Self {
            id: dto.id,
            email: dto.email.clone().unwrap_or_default(),
            name: metadata("name").map(str::to_owned),
            role: UserRole::from_metadata(role),
        }
    }
}

/// Sign-up reply: a session when auto-confirm is on, else the bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SignUpDto {
    Session { user: GoTrueUserDto },
    User(GoTrueUserDto),
}

impl From<SignUpDto> for AuthAccount {
    fn from(dto: SignUpDto) -> Self {
        match dto {
            SignUpDto::Session { user } | SignUpDto::User(user) => user.into(),
        }
    }
}

/// Reply of the password grant.
#[derive(Debug, Deserialize)]
pub(super) struct GoTrueSessionDto {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: GoTrueUserDto,
}

impl TryFrom<GoTrueSessionDto> for AuthSession {
    type Error = BackendError;

    fn try_from(dto: GoTrueSessionDto) -> Result<Self, Self::Error> {
        let access_token = AccessToken::new(dto.access_token)
            .ok_or_else(|| BackendError::decode("provider issued an empty access token"))?;
        Ok(Self {
            access_token,
            refresh_token: dto.refresh_token,
            token_type: dto.token_type.unwrap_or_else(|| "bearer".to_owned()),
            expires_in: dto.expires_in,
            expires_at: dto.expires_at,
            account: dto.user.into(),
        })
    }
}

/// `{following_id}` projection of `user_follows`.
#[derive(Debug, Deserialize)]
pub(super) struct FollowingDto {
    pub(super) following_id: UserId,
}

/// `{rating}` projection of `user_activities`.
#[derive(Debug, Deserialize)]
pub(super) struct RatingValueDto {
    pub(super) rating: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    #[rstest]
    fn post_views_read_counts_from_aggregate_embeds() {
        let payload = json!({
            "id": Uuid::new_v4(),
            "user_id": Uuid::new_v4(),
            "destination_id": null,
            "title": "Tram 28",
            "content": "Sit on the left",
            "images": [],
            "rating": null,
            "is_public": true,
            "like_count": 99,
            "comment_count": 99,
            "created_at": "2026-03-14T09:30:00Z",
            "users": { "id": Uuid::new_v4(), "name": "Ana", "profile_picture": null },
            "destinations": null,
            "post_likes": [{ "count": 3 }],
            "comments": [{ "count": 1 }]
        });

        let dto: PostViewDto = serde_json::from_value(payload).expect("decodes");
        let view = PostView::from(dto);

        assert_eq!(view.like_count, 3);
        assert_eq!(view.comment_count, 1);
        assert_eq!(view.users.map(|user| user.name).as_deref(), Some("Ana"));
    }

    #[rstest]
    #[case(json!({ "name": "Ana", "role": "moderator" }), UserRole::Moderator)]
    #[case(json!({ "name": "Ana", "userRole": "admin" }), UserRole::Admin)]
    #[case(json!({ "name": "Ana" }), UserRole::Traveler)]
    fn accounts_take_role_from_metadata(#[case] metadata: Value, #[case] expected: UserRole) {
        let payload = json!({
            "id": Uuid::new_v4(),
            "email": "ana@example.com",
            "user_metadata": metadata
        });
        let dto: GoTrueUserDto = serde_json::from_value(payload).expect("decodes");
        let account = AuthAccount::from(dto);
        assert_eq!(account.role, expected);
        assert_eq!(account.name.as_deref(), Some("Ana"));
    }

    #[rstest]
    fn sign_up_accepts_session_and_bare_user_replies() {
        let id = Uuid::new_v4();
        let user = json!({ "id": id, "email": "ana@example.com", "user_metadata": {} });
        for payload in [json!({ "access_token": "t", "user": user.clone() }), user] {
            let dto: SignUpDto = serde_json::from_value(payload).expect("decodes");
            assert_eq!(AuthAccount::from(dto).id, UserId::from_uuid(id));
        }
    }

    #[rstest]
    fn sessions_with_blank_tokens_are_rejected() {
        let payload = json!({
            "access_token": "  ",
            "user": { "id": Uuid::new_v4(), "email": "ana@example.com" }
        });
        let dto: GoTrueSessionDto = serde_json::from_value(payload).expect("decodes");
        assert!(AuthSession::try_from(dto).is_err());
    }
}
