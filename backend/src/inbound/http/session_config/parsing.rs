//! Toggle parsing shared by the session settings.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// A boolean environment toggle with its debug-mode default.
pub(super) struct BoolToggle {
    name: &'static str,
    default: bool,
}

impl BoolToggle {
    pub(super) const fn new(name: &'static str, default: bool) -> Self {
        Self { name, default }
    }

    pub(super) fn read<E: Env>(&self, env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
        let label = if self.default { "enabled" } else { "disabled" };
        let Some(value) = env.string(self.name) else {
            return fallback_or(
                mode,
                self.default,
                SessionConfigError::MissingEnv { name: self.name },
                || warn!("{} not set; defaulting to {label}", self.name),
            );
        };
        if let Some(flag) = parse_bool(&value) {
            return Ok(flag);
        }
        fallback_or(
            mode,
            self.default,
            SessionConfigError::InvalidEnv {
                name: self.name,
                value: value.clone(),
                expected: BOOL_EXPECTED,
            },
            || warn!(value = %value, "invalid {}; defaulting to {label}", self.name),
        )
    }
}

/// Debug builds warn and use `fallback`; release builds return `error`.
pub(super) fn fallback_or<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: impl FnOnce(),
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_same_site(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
    default: SameSite,
) -> Result<SameSite, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => fallback_or(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
            || warn!("SESSION_SAMESITE=None without a secure cookie; browsers may drop it"),
        ),
        _ => fallback_or(
            mode,
            default,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: value.clone(),
                expected: SAMESITE_EXPECTED,
            },
            || warn!(value = %value, "invalid SESSION_SAMESITE, using default"),
        ),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
