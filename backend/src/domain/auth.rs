//! Authentication primitives: credentials, access tokens, sessions and
//! caller identity.
//!
//! Inbound payload parsing stays outside the domain; these constructors
//! validate raw strings before a handler talks to a service.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use zeroize::Zeroizing;

use super::UserId;

/// Minimum password length accepted by the auth provider.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validation failures for authentication payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Display name was missing or blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Password is shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

/// Email and password pair used to sign in.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty and kept verbatim (whitespace included).
///
/// # Examples
/// ```
/// use roamwise::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" ada@example.com ", "hunter22").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Validate raw email and password inputs.
    ///
    /// # Errors
    /// Returns a [`CredentialsValidationError`] when either part is blank.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used as the login identifier.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign-up request: credentials plus the display name stored as metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: Credentials,
    name: String,
}

impl Registration {
    /// Validate raw registration inputs.
    ///
    /// # Errors
    /// Returns a [`CredentialsValidationError`] when any field is blank.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let credentials = Credentials::try_from_parts(email, password)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CredentialsValidationError::EmptyName);
        }
        Ok(Self {
            credentials,
            name: name.to_owned(),
        })
    }

    /// Validated credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Replacement password for the password-recovery flow.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Validate a replacement password.
    ///
    /// # Errors
    /// Returns [`CredentialsValidationError::PasswordTooShort`] for short values.
    pub fn new(raw: &str) -> Result<Self, CredentialsValidationError> {
        if raw.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialsValidationError::PasswordTooShort);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the password for transmission to the provider.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(<redacted>)")
    }
}

/// Bearer token issued by the auth provider.
///
/// The token is zeroised on drop and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token, rejecting blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(Zeroizing::new(trimmed.to_owned())))
        }
    }

    /// Expose the raw token for forwarding to the provider.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl Serialize for AccessToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for AccessToken {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).ok_or_else(|| serde::de::Error::custom("access token must not be empty"))
    }
}

/// Credentials a repository call runs under.
///
/// Adapters forward the user's token so the store's row-level policies
/// apply; anonymous calls use the project's anon key only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessScope {
    /// No caller identity.
    #[default]
    Anonymous,
    /// Requests made on behalf of a signed-in user.
    User(AccessToken),
}

impl AccessScope {
    /// Bearer token to present, if any.
    pub fn token(&self) -> Option<&AccessToken> {
        match self {
            Self::Anonymous => None,
            Self::User(token) => Some(token),
        }
    }
}

/// Application role carried in the provider's user metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular member.
    #[default]
    Traveler,
    /// Community moderator.
    Moderator,
    /// Administrator.
    Admin,
}

impl UserRole {
    /// Parse a metadata value, defaulting unknown or missing roles to
    /// [`UserRole::Traveler`].
    #[must_use]
    pub fn from_metadata(value: Option<&str>) -> Self {
        match value.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
            Some("moderator") => Self::Moderator,
            Some("admin") => Self::Admin,
            _ => Self::Traveler,
        }
    }

    /// Whether this role may remove other members' community content.
    #[must_use]
    pub fn can_moderate(self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }

    /// Metadata string stored at the provider.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Traveler => "traveler",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

/// Identity record held by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthAccount {
    /// Provider-assigned user id, shared with the `users` table.
    pub id: UserId,
    /// Login email.
    pub email: String,
    /// Display name from metadata.
    pub name: Option<String>,
    /// Application role from metadata.
    #[serde(skip)]
    pub role: UserRole,
}

/// Session issued on successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSession {
    /// Bearer token for subsequent requests.
    pub access_token: AccessToken,
    /// Token used to refresh the session at the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type, normally `bearer`.
    pub token_type: String,
    /// Lifetime in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Expiry as a Unix timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// The signed-in account.
    #[serde(skip)]
    pub account: AuthAccount,
}

/// Authenticated caller resolved from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    account: AuthAccount,
    token: AccessToken,
}

impl Caller {
    /// Bind a verified account to the token that proved it.
    pub fn new(account: AuthAccount, token: AccessToken) -> Self {
        Self { account, token }
    }

    /// The caller's user id.
    pub fn id(&self) -> &UserId {
        &self.account.id
    }

    /// The caller's provider account.
    pub fn account(&self) -> &AuthAccount {
        &self.account
    }

    /// The caller's application role.
    pub fn role(&self) -> UserRole {
        self.account.role
    }

    /// Token presented by the caller.
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Repository scope for calls made on the caller's behalf.
    pub fn scope(&self) -> AccessScope {
        AccessScope::User(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("   ", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("ada@example.com", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = Credentials::try_from_parts(email, password).expect_err("invalid inputs fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn registration_requires_a_name() {
        let err = Registration::try_from_parts("ada@example.com", "secret1", "  ")
            .expect_err("blank name fails");
        assert_eq!(err, CredentialsValidationError::EmptyName);
    }

    #[rstest]
    #[case("short", false)]
    #[case("sixsix", true)]
    fn new_password_enforces_minimum_length(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(NewPassword::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let creds = Credentials::try_from_parts("ada@example.com", "hunter22").expect("valid");
        let token = AccessToken::new("tok-123").expect("non-empty");
        assert!(!format!("{creds:?}").contains("hunter22"));
        assert!(!format!("{token:?}").contains("tok-123"));
    }

    #[rstest]
    #[case(None, UserRole::Traveler)]
    #[case(Some("Moderator"), UserRole::Moderator)]
    #[case(Some("admin"), UserRole::Admin)]
    #[case(Some("pilot"), UserRole::Traveler)]
    fn roles_parse_leniently(#[case] raw: Option<&str>, #[case] expected: UserRole) {
        assert_eq!(UserRole::from_metadata(raw), expected);
    }

    #[rstest]
    fn blank_tokens_are_rejected() {
        assert!(AccessToken::new("  ").is_none());
    }
}
