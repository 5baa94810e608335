use serde::Serialize;
use uuid::Uuid;

use crate::users::repo::{Role, User};

/// The client-facing view of a user row. The password hash never leaves the
/// repo layer; this type has no field for it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProjection {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub about: String,
    pub hero_description: String,
    pub title: String,
    pub profile_picture: Option<String>,
    pub resume: Option<String>,
    pub contact_email: Option<String>,
    pub role: Role,
}

impl From<User> for UserProjection {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.username,
            email: u.email,
            about: u.about,
            hero_description: u.hero_description,
            title: u.user_title,
            profile_picture: u.profile_picture_url,
            resume: u.resume_url,
            contact_email: u.contact_email,
            role: u.role,
        }
    }
}

/// Returned by `/profile/update-all` so the client can resynchronize its
/// local cache from the refreshed row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateResponse {
    pub message: String,
    pub updated_user: UserProjection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            username: "Alice".into(),
            role: Role::User,
            about: "about".into(),
            hero_description: "hero".into(),
            user_title: "Engineer".into(),
            contact_email: Some("contact@b.com".into()),
            profile_picture_url: Some("https://cdn/x.jpg".into()),
            resume_url: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn projection_uses_camel_case_and_drops_secret() {
        let json = serde_json::to_value(UserProjection::from(sample_user())).unwrap();
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["heroDescription"], "hero");
        assert_eq!(json["title"], "Engineer");
        assert_eq!(json["profilePicture"], "https://cdn/x.jpg");
        assert_eq!(json["resume"], serde_json::Value::Null);
        assert_eq!(json["role"], "user");
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }
}
