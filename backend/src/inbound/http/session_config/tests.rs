//! Unit tests for session configuration parsing.

use std::collections::HashMap;
use std::io::Write as _;

use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp key file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    file
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

#[fixture]
fn release_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn release_vars(key: &NamedTempFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key.path().display().to_string()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

#[rstest]
fn release_accepts_a_complete_configuration(release_key: NamedTempFile) {
    let env = mock_env(release_vars(&release_key));
    let settings =
        session_settings_from_env(&env, BuildMode::Release).expect("valid release settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_rejects_missing_toggles(release_key: NamedTempFile, #[case] missing: &'static str) {
    let mut vars = release_vars(&release_key);
    vars.remove(missing);
    let env = mock_env(vars);

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("missing toggle must fail");
    assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_rejects_malformed_booleans(release_key: NamedTempFile, #[case] value: &str) {
    let mut vars = release_vars(&release_key);
    vars.insert(COOKIE_SECURE_ENV, value.to_owned());
    let env = mock_env(vars);

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("malformed toggle must fail");
    assert!(matches!(err, SessionConfigError::InvalidEnv { .. }));
}

#[rstest]
fn release_rejects_short_keys() {
    let short = key_file(SESSION_KEY_MIN_LEN - 1);
    let env = mock_env(release_vars(&short));

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("short key must fail");
    assert!(matches!(err, SessionConfigError::KeyTooShort { .. }));
}

#[rstest]
fn release_rejects_same_site_none_without_secure(release_key: NamedTempFile) {
    let mut vars = release_vars(&release_key);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());
    let env = mock_env(vars);

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("insecure None must fail");
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_refuses_ephemeral_keys(release_key: NamedTempFile) {
    let mut vars = release_vars(&release_key);
    vars.insert(ALLOW_EPHEMERAL_ENV, "1".to_owned());
    let env = mock_env(vars);

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("ephemeral keys must fail");
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let env = mock_env(HashMap::from([(
        KEY_FILE_ENV,
        "/nonexistent/roamwise/session_key".to_owned(),
    )]));

    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_keeps_same_site_none_without_secure() {
    let env = mock_env(HashMap::from([
        (KEY_FILE_ENV, "/nonexistent/roamwise/session_key".to_owned()),
        (COOKIE_SECURE_ENV, "no".to_owned()),
        (SAMESITE_ENV, "none".to_owned()),
    ]));

    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug settings");
    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::None);
}
