use std::time::Duration;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::Role;

/// JWT payload: user identity plus role, so admin routes can be gated
/// server-side without a second lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: Uuid, role: Role) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, ?role, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, role = ?data.claims.role, "jwt verified");
        Ok(data.claims)
    }
}

/// Extracts and validates the bearer token, yielding the caller's identity.
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

/// Like [`AuthUser`] but additionally requires the admin role. Every
/// `/admin/*` data route goes through this, so knowing the URL is no longer
/// enough to call it.
pub struct AdminUser(pub Uuid);

fn bearer_claims<S>(parts: &Parts, state: &S) -> Result<Claims, ApiError>
where
    JwtKeys: FromRef<S>,
{
    let keys = JwtKeys::from_ref(state);
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header.".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header.".into()))?;

    keys.verify(token).map_err(|_| {
        warn!("invalid or expired token");
        ApiError::Unauthorized("Invalid or expired token.".into())
    })
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?;
        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?;
        if claims.role != Role::Admin {
            warn!(user_id = %claims.sub, "non-admin call to admin route");
            return Err(ApiError::Forbidden(
                "Access Denied. Not an administrator.".into(),
            ));
        }
        Ok(AdminUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    #[tokio::test]
    async fn sign_and_verify_user_token() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, Role::User).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[tokio::test]
    async fn admin_role_survives_roundtrip() {
        let keys = make_keys();
        let token = keys.sign(Uuid::new_v4(), Role::Admin).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn verify_rejects_garbage_token() {
        let keys = make_keys();
        assert!(keys.verify("not.a.jwt").is_err());
    }

    #[tokio::test]
    async fn verify_rejects_token_from_other_issuer() {
        let good = make_keys();
        let mut other = make_keys();
        other.issuer = "someone-else".into();
        let token = other.sign(Uuid::new_v4(), Role::User).expect("sign");
        assert!(good.verify(&token).is_err());
    }
}
