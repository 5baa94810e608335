use serde::{Deserialize, Serialize};

use crate::users::dto::UserProjection;
use crate::users::repo::Role;

/// Request body for signup. `skills` is the free-text title line the signup
/// form collects; it lands in the `user_title` column.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub about: String,
    pub hero_description: String,
    pub skills: String,
}

/// Request body for login (user and admin).
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Returned after a successful user login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub redirect_url: String,
    pub user: UserProjection,
}

#[derive(Debug, Serialize)]
pub struct AdminIdentity {
    pub name: String,
    pub role: Role,
}

/// Returned after a successful admin login. Carries only the name and role,
/// the dashboard fetches everything else through the admin routes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginResponse {
    pub message: String,
    pub token: String,
    pub redirect_url: String,
    pub user: AdminIdentity,
}
