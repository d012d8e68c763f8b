//! Account HTTP handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"ada@example.com","password":"hunter22","name":"Ada"}
//! POST /api/auth/login {"email":"ada@example.com","password":"hunter22"}
//! POST /api/auth/logout
//! GET /api/auth/me
//! POST /api/auth/forgot-password {"email":"ada@example.com"}
//! POST /api/auth/reset-password {"password":"new-secret"}
//! ```

use actix_web::{HttpResponse, Scope, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    AccountProfile, AuthAccount, AuthSession, Credentials, Error, NewPassword, Registration,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::{Authenticated, PresentedToken};
use crate::inbound::http::schemas::{ErrorSchema, MessageSchema, UserProfileSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::present;

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Login email.
    pub email: Option<String>,
    /// Password, at least six characters at the provider.
    pub password: Option<String>,
    /// Display name.
    pub name: Option<String>,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Login email.
    pub email: Option<String>,
    /// Password.
    pub password: Option<String>,
}

/// Request body for `POST /api/auth/forgot-password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ForgotPasswordRequest {
    /// Account email.
    pub email: Option<String>,
    /// Page the recovery link should land on.
    pub redirect_to: Option<String>,
}

/// Request body for `POST /api/auth/reset-password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ResetPasswordRequest {
    /// Replacement password.
    pub password: Option<String>,
}

/// Public identity returned after registering or signing in.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountBody {
    /// Account id.
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
}

impl From<AuthAccount> for AccountBody {
    fn from(value: AuthAccount) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email,
            name: value.name,
        }
    }
}

/// Response body for `POST /api/auth/register`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    /// Confirmation.
    #[schema(example = "User registered successfully")]
    pub message: &'static str,
    /// The new account.
    pub user: AccountBody,
}

/// Token set issued at sign-in.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionBody {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: Option<String>,
    /// Normally `bearer`.
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: Option<u64>,
    /// Expiry as a Unix timestamp.
    pub expires_at: Option<i64>,
}

impl From<&AuthSession> for SessionBody {
    fn from(value: &AuthSession) -> Self {
        Self {
            access_token: value.access_token.expose().to_owned(),
            refresh_token: value.refresh_token.clone(),
            token_type: value.token_type.clone(),
            expires_in: value.expires_in,
            expires_at: value.expires_at,
        }
    }
}

/// Response body for `POST /api/auth/login`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Confirmation.
    #[schema(example = "Login successful")]
    pub message: &'static str,
    /// The signed-in account.
    pub user: AccountBody,
    /// Issued tokens.
    pub session: SessionBody,
}

/// Routes under `/auth`.
pub fn scope() -> Scope {
    web::scope("/auth")
        .service(register)
        .service(login)
        .service(logout)
        .service(me)
        .service(forgot_password)
        .service(reset_password)
}

/// Create an account and its profile.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing fields or rejected by the provider", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        name,
    } = payload.into_inner();
    let (Some(email), Some(password), Some(name)) = (present(email), password, present(name))
    else {
        return Err(Error::invalid_request("Missing required fields"));
    };
    let registration = Registration::try_from_parts(&email, &password, &name)
        .map_err(|_| Error::invalid_request("Missing required fields"))?;

    let account = state.auth.register(&registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully",
        user: account.into(),
    }))
}

/// Exchange credentials for a session and remember the token in the cookie.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing fields", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = match (present(email), password) {
        (Some(email), Some(password)) => Credentials::try_from_parts(&email, &password).ok(),
        _ => None,
    }
    .ok_or_else(|| Error::invalid_request("Email and password are required"))?;

    let issued = state.auth.login(&credentials).await?;
    session.persist_token(&issued.access_token)?;
    info!(user_id = %issued.account.id, "signed in");
    Ok(web::Json(LoginResponse {
        message: "Login successful",
        session: SessionBody::from(&issued),
        user: issued.account.into(),
    }))
}

/// Revoke the presented token and clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
    PresentedToken(token): PresentedToken,
) -> ApiResult<HttpResponse> {
    state.auth.logout(token.as_ref()).await?;
    session.purge();
    Ok(HttpResponse::Ok().json(json!({ "message": "Logout successful" })))
}

/// The caller's profile and role.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = UserProfileSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Profile missing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentAccount"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
) -> ApiResult<web::Json<AccountProfile>> {
    state.auth.me(&caller).await.map(web::Json)
}

/// Ask the provider to email a recovery link.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Recovery email requested", body = MessageSchema),
        (status = 400, description = "Missing email", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let ForgotPasswordRequest { email, redirect_to } = payload.into_inner();
    let email = present(email).ok_or_else(|| Error::invalid_request("Email is required"))?;
    state
        .auth
        .forgot_password(email.trim(), present(redirect_to))
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Password reset email sent" })))
}

/// Replace the caller's password using the recovery session's token.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = MessageSchema),
        (status = 400, description = "Password too short", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resetPassword"
)]
#[post("/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let password = payload
        .into_inner()
        .password
        .and_then(|raw| NewPassword::new(&raw).ok())
        .ok_or_else(|| Error::invalid_request("Password must be at least 6 characters"))?;
    state.auth.reset_password(&caller, &password).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated successfully" })))
}
