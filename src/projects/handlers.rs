use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::dto::MessageResponse;
use crate::auth::jwt::AuthUser;
use crate::error::{internal, ApiError};
use crate::projects::dto::{ProjectForm, ProjectResponse};
use crate::projects::repo::Project;
use crate::state::AppState;
use crate::storage::{self, AssetKind, UploadedFile};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/project", post(create_project))
        .route("/project/:id", put(update_project).delete(delete_project))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
        .route("/user/:user_id/projects", get(list_projects))
}

async fn collect_form(mut mp: Multipart) -> Result<ProjectForm, ApiError> {
    let mut form = ProjectForm::default();
    while let Some(field) = mp.next_field().await.map_err(internal)? {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };
        match name.as_str() {
            "projectName" => form.name = Some(field.text().await.map_err(internal)?),
            "demoLink" => form.demo_link = Some(field.text().await.map_err(internal)?),
            "sourceLink" => form.source_link = Some(field.text().await.map_err(internal)?),
            "projectThumbnail" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let bytes = field.bytes().await.map_err(internal)?;
                form.thumbnail = Some(UploadedFile {
                    bytes,
                    content_type,
                });
            }
            other => warn!(field = other, "ignoring unknown multipart field"),
        }
    }
    Ok(form)
}

#[instrument(skip(state, mp))]
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser { id: user_id, .. }: AuthUser,
    mp: Multipart,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let mut form = collect_form(mp).await?;
    let name = form.validated_name()?.to_string();

    let thumbnail_url = match form.thumbnail.take() {
        Some(file) => {
            Some(storage::store_asset(&state, AssetKind::ProjectThumbnail, user_id, file).await?)
        }
        None => None,
    };

    let project = Project::create(
        &state.db,
        user_id,
        &name,
        form.demo_link(),
        form.source_link(),
        thumbnail_url.as_deref(),
    )
    .await
    .map_err(internal)?;

    info!(project_id = %project.id, %user_id, "project created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Project added successfully!".into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_projects(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let projects = Project::list_by_owner(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

/// Loads the project and rejects callers that do not own it.
async fn owned_project(
    state: &AppState,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<Project, ApiError> {
    let project = Project::find_by_id(&state.db, project_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound("Project not found.".into()))?;
    if project.user_id != user_id {
        warn!(%user_id, %project_id, owner = %project.user_id, "project ownership mismatch");
        return Err(ApiError::Forbidden(
            "You do not own this project.".into(),
        ));
    }
    Ok(project)
}

#[instrument(skip(state, mp))]
pub async fn update_project(
    State(state): State<AppState>,
    AuthUser { id: user_id, .. }: AuthUser,
    Path(project_id): Path<Uuid>,
    mp: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let existing = owned_project(&state, user_id, project_id).await?;

    let mut form = collect_form(mp).await?;
    let name = form.validated_name()?.to_string();

    // A new thumbnail replaces the old one; omission leaves it untouched.
    let thumbnail_url = match form.thumbnail.take() {
        Some(file) => {
            Some(storage::store_asset(&state, AssetKind::ProjectThumbnail, user_id, file).await?)
        }
        None => None,
    };
    let replaced = thumbnail_url
        .is_some()
        .then(|| existing.thumbnail_url.clone())
        .flatten();

    Project::update(
        &state.db,
        project_id,
        &name,
        form.demo_link(),
        form.source_link(),
        thumbnail_url.as_deref(),
    )
    .await
    .map_err(internal)?
    .ok_or_else(|| ApiError::NotFound("Project not found.".into()))?;

    if let Some(old) = replaced {
        storage::delete_replaced(&state, &old).await;
    }

    info!(%project_id, %user_id, "project updated");
    Ok(Json(MessageResponse {
        message: "Project updated successfully!".into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser { id: user_id, .. }: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let existing = owned_project(&state, user_id, project_id).await?;

    let affected = Project::delete(&state.db, project_id)
        .await
        .map_err(internal)?;
    if !affected {
        return Err(ApiError::NotFound("Project not found.".into()));
    }

    if let Some(old) = existing.thumbnail_url {
        storage::delete_replaced(&state, &old).await;
    }

    info!(%project_id, %user_id, "project deleted");
    Ok(Json(MessageResponse {
        message: "Project deleted successfully.".into(),
    }))
}
