use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::projects::repo::Project;
use crate::storage::UploadedFile;

/// Accumulates the multipart fields of a project create/update request
/// before validation.
#[derive(Default)]
pub struct ProjectForm {
    pub name: Option<String>,
    pub demo_link: Option<String>,
    pub source_link: Option<String>,
    pub thumbnail: Option<UploadedFile>,
}

impl ProjectForm {
    /// Project name is the only required text field; empty link fields are
    /// treated as absent so the client can clear them by omission.
    pub fn validated_name(&self) -> Result<&str, ApiError> {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(ApiError::Validation("Project Name is required.".into())),
        }
    }

    pub fn demo_link(&self) -> Option<&str> {
        non_empty(self.demo_link.as_deref())
    }

    pub fn source_link(&self) -> Option<&str> {
        non_empty(self.source_link.as_deref())
    }
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub demo_link: Option<String>,
    pub source_link: Option<String>,
    pub thumbnail: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            name: p.name,
            demo_link: p.demo_link,
            source_link: p.source_link,
            thumbnail: p.thumbnail_url,
            created_at: p.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required() {
        let form = ProjectForm::default();
        assert!(form.validated_name().is_err());

        let form = ProjectForm {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(form.validated_name().is_err());

        let form = ProjectForm {
            name: Some("My App".into()),
            ..Default::default()
        };
        assert_eq!(form.validated_name().unwrap(), "My App");
    }

    #[test]
    fn empty_links_are_absent() {
        let form = ProjectForm {
            name: Some("x".into()),
            demo_link: Some("".into()),
            source_link: Some(" https://git.example/x ".into()),
            thumbnail: None,
        };
        assert_eq!(form.demo_link(), None);
        assert_eq!(form.source_link(), Some("https://git.example/x"));
    }
}
