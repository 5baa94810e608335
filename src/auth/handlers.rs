use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::auth::dto::{
    AdminIdentity, AdminLoginResponse, LoginRequest, LoginResponse, MessageResponse,
    SignupRequest,
};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{internal, ApiError};
use crate::state::AppState;
use crate::users::dto::UserProjection;
use crate::users::repo::{NewUser, Role, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/admin/login", post(admin_login))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.trim().is_empty()
        || payload.email.is_empty()
        || payload.password.is_empty()
        || payload.about.trim().is_empty()
        || payload.hero_description.trim().is_empty()
        || payload.skills.trim().is_empty()
    {
        return Err(ApiError::Validation("All fields are required.".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email.".into()));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short.".into()));
    }

    let hash = hash_password(&payload.password)?;

    // Role is fixed to 'user' here; the unique index on email turns a
    // duplicate into DuplicateEmail inside the repo.
    let user = User::create(
        &state.db,
        NewUser {
            username: &payload.name,
            email: &payload.email,
            password_hash: &hash,
            about: &payload.about,
            hero_description: &payload.hero_description,
            user_title: &payload.skills,
        },
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Sign up successfully completed! You can now log in.".into(),
        }),
    ))
}

/// Looks the user up and checks the password. Unknown email and wrong
/// password produce the same error so callers cannot enumerate accounts.
async fn authenticate(state: &AppState, payload: &LoginRequest) -> Result<User, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required.".into(),
        ));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(internal)?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }
    Ok(user)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = authenticate(&state, &payload).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, user.role)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful!".into(),
        token,
        redirect_url: "index.html".into(),
        user: UserProjection::from(user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required.".into(),
        ));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(internal)?
        .ok_or(ApiError::InvalidCredentials)?;

    // Role check comes before password verification: a non-admin account is
    // told so even with the right password.
    if user.role != Role::Admin {
        warn!(user_id = %user.id, "admin login by non-admin account");
        return Err(ApiError::Forbidden(
            "Access Denied. Not an administrator.".into(),
        ));
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "admin login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, user.role)?;

    info!(user_id = %user.id, "admin logged in");
    Ok(Json(AdminLoginResponse {
        message: "Admin login successful!".into(),
        token,
        redirect_url: "admin-dashboard.html".into(),
        user: AdminIdentity {
            name: user.username,
            role: user.role,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_plain_addresses() {
        assert!(is_valid_email("bob@x.com"));
        assert!(is_valid_email("a.b+tag@sub.domain.org"));
    }

    #[test]
    fn email_validation_rejects_malformed() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("bob"));
        assert!(!is_valid_email("bob@nodot"));
        assert!(!is_valid_email("bob @x.com"));
        assert!(!is_valid_email("@x.com"));
    }

    #[test]
    fn signup_request_uses_camel_case_wire_names() {
        let body = serde_json::json!({
            "name": "Bob",
            "email": "bob@x.com",
            "password": "pw123pw123",
            "about": "about me",
            "heroDescription": "hero",
            "skills": "Backend Engineer"
        });
        let req: SignupRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.hero_description, "hero");
        assert_eq!(req.skills, "Backend Engineer");
    }
}
