use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::skills::repo::Skill;
use crate::storage::UploadedFile;

/// Multipart fields of a skill creation request.
#[derive(Default)]
pub struct SkillForm {
    pub name: Option<String>,
    pub icon: Option<UploadedFile>,
}

impl SkillForm {
    /// Both the name and the icon file are mandatory; a skill row without an
    /// icon URL must never exist.
    pub fn validated(self) -> Result<(String, UploadedFile), ApiError> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        match (name, self.icon) {
            (Some(name), Some(icon)) => Ok((name, icon)),
            _ => Err(ApiError::Validation(
                "Skill Name and Skill Icon are required.".into(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub icon: String,
    pub created_at: OffsetDateTime,
}

impl From<Skill> for SkillResponse {
    fn from(s: Skill) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            name: s.name,
            icon: s.icon_url,
            created_at: s.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn icon() -> UploadedFile {
        UploadedFile {
            bytes: Bytes::from_static(&[0x89, b'P', b'N', b'G']),
            content_type: "image/png".into(),
        }
    }

    #[test]
    fn skill_without_icon_is_rejected() {
        let form = SkillForm {
            name: Some("Rust".into()),
            icon: None,
        };
        let err = form.validated().unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn skill_without_name_is_rejected() {
        let form = SkillForm {
            name: Some("  ".into()),
            icon: Some(icon()),
        };
        assert!(form.validated().is_err());
    }

    #[test]
    fn complete_form_passes() {
        let form = SkillForm {
            name: Some("Rust".into()),
            icon: Some(icon()),
        };
        let (name, file) = form.validated().unwrap();
        assert_eq!(name, "Rust");
        assert_eq!(file.content_type, "image/png");
    }
}
