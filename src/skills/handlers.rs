use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::dto::MessageResponse;
use crate::auth::jwt::AuthUser;
use crate::error::{internal, ApiError};
use crate::skills::dto::{SkillForm, SkillResponse};
use crate::skills::repo::Skill;
use crate::state::AppState;
use crate::storage::{self, AssetKind, UploadedFile};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/skill", post(create_skill))
        .route("/skill/:id", delete(delete_skill))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
        .route("/user/:user_id/skills", get(list_skills))
}

#[instrument(skip(state, mp))]
pub async fn create_skill(
    State(state): State<AppState>,
    AuthUser { id: user_id, .. }: AuthUser,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let mut form = SkillForm::default();
    while let Some(field) = mp.next_field().await.map_err(internal)? {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };
        match name.as_str() {
            "skillName" => form.name = Some(field.text().await.map_err(internal)?),
            "skillIcon" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let bytes = field.bytes().await.map_err(internal)?;
                form.icon = Some(UploadedFile {
                    bytes,
                    content_type,
                });
            }
            other => warn!(field = other, "ignoring unknown multipart field"),
        }
    }

    // MissingIcon and missing name both fail validation before any write.
    let (name, icon) = form.validated()?;
    let icon_url = storage::store_asset(&state, AssetKind::SkillIcon, user_id, icon).await?;

    let skill = Skill::create(&state.db, user_id, &name, &icon_url)
        .await
        .map_err(internal)?;

    info!(skill_id = %skill.id, %user_id, "skill created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Skill added successfully!".into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_skills(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<SkillResponse>>, ApiError> {
    let skills = Skill::list_by_owner(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(skills.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn delete_skill(
    State(state): State<AppState>,
    AuthUser { id: user_id, .. }: AuthUser,
    Path(skill_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let skill = Skill::find_by_id(&state.db, skill_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound("Skill not found.".into()))?;
    if skill.user_id != user_id {
        warn!(%user_id, %skill_id, owner = %skill.user_id, "skill ownership mismatch");
        return Err(ApiError::Forbidden("You do not own this skill.".into()));
    }

    let affected = Skill::delete(&state.db, skill_id).await.map_err(internal)?;
    if !affected {
        return Err(ApiError::NotFound("Skill not found.".into()));
    }

    storage::delete_replaced(&state, &skill.icon_url).await;

    info!(%skill_id, %user_id, "skill deleted");
    Ok(Json(MessageResponse {
        message: "Skill deleted successfully.".into(),
    }))
}
