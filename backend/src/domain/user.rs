//! Member profiles, public projections and follow relationships.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::UserRole;
use super::patch::double_option;

/// Stable user identifier shared by the auth provider and the `users` table.
///
/// # Examples
/// ```
/// use roamwise::domain::UserId;
///
/// let id: UserId = "3fa85f64-5717-4562-b3fc-2c963f66afa6".parse().unwrap();
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh random id.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Full `users` row as visible to its owner.
///
/// The store may hold columns this type does not name (for example a legacy
/// password hash); they are dropped on deserialisation and never returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Row id, equal to the auth account id.
    pub id: UserId,
    /// Contact email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Free-text biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// Arbitrary client preferences (onboarding answers and similar).
    #[serde(default)]
    pub preferences: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Project the fields anyone may see.
    #[must_use]
    pub fn public(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            name: self.name.clone(),
            bio: self.bio.clone(),
            profile_picture: self.profile_picture.clone(),
            created_at: self.created_at,
        }
    }

    /// Project the compact author badge used in embeds.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            profile_picture: self.profile_picture.clone(),
        }
    }
}

/// The caller's own profile together with the role from their account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountProfile {
    /// Profile row.
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Application role.
    pub role: UserRole,
}

/// Public projection of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    /// Profile id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Biography.
    pub bio: Option<String>,
    /// Avatar URL.
    pub profile_picture: Option<String>,
    /// Member since.
    pub created_at: DateTime<Utc>,
}

/// Compact author badge embedded under `users` in other resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Profile id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Row inserted into `users` after a successful sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProfile {
    /// Auth account id.
    pub id: UserId,
    /// Contact email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Partial profile update.
///
/// `bio` is tri-state: absent leaves it, `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileChanges {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New biography, or `Some(None)` to clear it.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub bio: Option<Option<String>>,
    /// New avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    /// Replacement preferences document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Value>,
    /// Stamp applied by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileChanges {
    /// Drop values that must not overwrite stored data: blank names and
    /// empty picture URLs.
    #[must_use]
    pub fn normalised(mut self) -> Self {
        self.name = self
            .name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());
        self.profile_picture = self.profile_picture.filter(|url| !url.trim().is_empty());
        self.preferences = self.preferences.filter(|value| !value.is_null());
        self
    }

    /// Apply the changes to a profile in place.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.name {
            profile.name.clone_from(name);
        }
        if let Some(bio) = &self.bio {
            profile.bio.clone_from(bio);
        }
        if let Some(picture) = &self.profile_picture {
            profile.profile_picture = Some(picture.clone());
        }
        if let Some(preferences) = &self.preferences {
            profile.preferences = Some(preferences.clone());
        }
        if let Some(updated_at) = self.updated_at {
            profile.updated_at = Some(updated_at);
        }
    }
}

/// Row in `user_follows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    /// Row id.
    pub id: Uuid,
    /// The member who follows.
    pub follower_id: UserId,
    /// The member being followed.
    pub following_id: UserId,
    /// When the follow was created.
    pub created_at: DateTime<Utc>,
}
