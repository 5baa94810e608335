use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::dto::MessageResponse;
use crate::auth::jwt::{AdminUser, AuthUser};
use crate::error::{internal, ApiError};
use crate::state::AppState;
use crate::storage::{self, AssetKind, UploadedFile};
use crate::users::dto::{ProfileUpdateResponse, UserProjection};
use crate::users::repo::{ProfileChanges, Role, User, UserSummary};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile/update-all", post(update_all))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
        .route("/admin/users", get(admin_list_users))
        .route("/admin/user/:id", get(admin_get_user))
        .route("/admin/users/:id", delete(admin_delete_user))
}

/// POST /profile/update-all (multipart)
///
/// Text fields: name, about, skills (title line), heroDescription,
/// contactEmail. Files: profilePicture, resumePdf. The caller is identified
/// by their token; uploads go to the asset host first and the row is then
/// patched in a single statement, so a failed upload leaves the profile
/// untouched for that field.
#[instrument(skip(state, mp))]
pub async fn update_all(
    State(state): State<AppState>,
    AuthUser { id: user_id, .. }: AuthUser,
    mut mp: Multipart,
) -> Result<Json<ProfileUpdateResponse>, ApiError> {
    let current = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    let mut changes = ProfileChanges::default();
    let mut picture: Option<UploadedFile> = None;
    let mut resume: Option<UploadedFile> = None;

    while let Some(field) = mp.next_field().await.map_err(internal)? {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };
        match name.as_str() {
            "name" => changes.username = Some(field.text().await.map_err(internal)?),
            "about" => changes.about = Some(field.text().await.map_err(internal)?),
            "skills" => changes.user_title = Some(field.text().await.map_err(internal)?),
            "heroDescription" => {
                changes.hero_description = Some(field.text().await.map_err(internal)?)
            }
            "contactEmail" => changes.contact_email = Some(field.text().await.map_err(internal)?),
            "profilePicture" => picture = Some(read_file(field).await?),
            "resumePdf" => resume = Some(read_file(field).await?),
            other => warn!(field = other, "ignoring unknown multipart field"),
        }
    }

    // Uploads first; only URLs that made it to the asset host reach the DB.
    if let Some(file) = picture {
        let url = storage::store_asset(&state, AssetKind::ProfilePicture, user_id, file).await?;
        changes.profile_picture_url = Some(url);
    }
    if let Some(file) = resume {
        let url = storage::store_asset(&state, AssetKind::Resume, user_id, file).await?;
        changes.resume_url = Some(url);
    }

    let replaced_picture = changes
        .profile_picture_url
        .is_some()
        .then(|| current.profile_picture_url.clone())
        .flatten();
    let replaced_resume = changes
        .resume_url
        .is_some()
        .then(|| current.resume_url.clone())
        .flatten();

    let updated = User::update_profile(&state.db, user_id, changes)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    // Replaced objects are orphaned after the commit; drop them best-effort.
    if let Some(old) = replaced_picture {
        storage::delete_replaced(&state, &old).await;
    }
    if let Some(old) = replaced_resume {
        storage::delete_replaced(&state, &old).await;
    }

    info!(user_id = %user_id, "profile updated");
    Ok(Json(ProfileUpdateResponse {
        message: "Profile updated successfully!".into(),
        updated_user: UserProjection::from(updated),
    }))
}

async fn read_file(field: axum::extract::multipart::Field<'_>) -> Result<UploadedFile, ApiError> {
    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "application/octet-stream".into());
    let bytes = field.bytes().await.map_err(internal)?;
    Ok(UploadedFile {
        bytes,
        content_type,
    })
}

#[instrument(skip(state))]
pub async fn admin_list_users(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = User::list_by_role(&state.db, Role::User)
        .await
        .map_err(internal)?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn admin_get_user(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProjection>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;
    Ok(Json(UserProjection::from(user)))
}

#[instrument(skip(state))]
pub async fn admin_delete_user(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let affected = User::delete(&state.db, id).await.map_err(internal)?;
    if !affected {
        return Err(ApiError::NotFound(format!(
            "User with ID {id} not found."
        )));
    }
    info!(%admin_id, deleted_user = %id, "user deleted by admin");
    Ok(Json(MessageResponse {
        message: format!("User with ID {id} has been deleted successfully."),
    }))
}
