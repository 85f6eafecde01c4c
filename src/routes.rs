use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    actions::{ActionError, DocumentActions},
    auth::User,
    error::ApiError,
    room::{Room, UserType},
    room_view::{ConnectionStatus, RoomView},
    view_cache::ROOT_PATH,
};

pub type AppState = Arc<DocumentActions>;

#[derive(Deserialize)]
pub struct ViewParams {
    pub status: Option<ConnectionStatus>,
}

#[derive(Deserialize)]
pub struct TitleBody {
    pub title: String,
}

#[derive(Deserialize)]
pub struct ShareBody {
    pub email: String,
    pub user_type: UserType,
}

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

pub async fn create_document(
    State(actions): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    let room = actions.create_document(&user.id, &user.email).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

pub async fn list_documents(
    State(actions): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let rooms = actions.list_documents(&user.email).await?;
    Ok(Json(rooms))
}

pub async fn get_document(
    State(actions): State<AppState>,
    Extension(user): Extension<User>,
    Path(room_id): Path<String>,
    Query(params): Query<ViewParams>,
) -> Result<Json<RoomView>, ApiError> {
    let (room, user_type) = actions.document_access(&room_id, &user.email).await?;
    let status = params.status.unwrap_or(ConnectionStatus::NotLoaded);
    Ok(Json(RoomView::new(&room, user_type, status)))
}

pub async fn update_title(
    State(actions): State<AppState>,
    Extension(user): Extension<User>,
    Path(room_id): Path<String>,
    Json(body): Json<TitleBody>,
) -> Result<Json<Room>, ApiError> {
    let room = editable_document(&actions, &room_id, &user).await?;

    if room.title() == body.title {
        tracing::debug!(%room_id, "title unchanged, skipping update");
        return Ok(Json(room));
    }

    let room = actions.update_title(&room_id, &body.title).await?;
    Ok(Json(room))
}

pub async fn share_document(
    State(actions): State<AppState>,
    Extension(user): Extension<User>,
    Path(room_id): Path<String>,
    Json(body): Json<ShareBody>,
) -> Result<Json<Room>, ApiError> {
    if body.email.trim().is_empty() {
        return Err(ApiError::BadRequest("please provide an email".to_string()));
    }

    editable_document(&actions, &room_id, &user).await?;
    let room = actions
        .share_access(&room_id, body.email.trim(), body.user_type)
        .await?;
    Ok(Json(room))
}

/// Editors are redirected to the document list even if the hosted service
/// failed to delete the room. Anyone who cannot be verified as an editor is
/// redirected without a delete being attempted.
pub async fn delete_document(
    State(actions): State<AppState>,
    Extension(user): Extension<User>,
    Path(room_id): Path<String>,
) -> Result<Response, ApiError> {
    match editable_document(&actions, &room_id, &user).await {
        Ok(_) => {}
        Err(ApiError::Forbidden) => return Err(ApiError::Forbidden),
        Err(error) => {
            tracing::warn!(?error, %room_id, "could not verify editor, skipping delete");
            return Ok(Redirect::to(ROOT_PATH).into_response());
        }
    }

    let deletion = actions.delete_document(&room_id).await;
    if let Err(error) = &deletion.result {
        tracing::error!(%error, %room_id, "document delete failed, redirecting anyway");
    }

    Ok(Redirect::to(deletion.redirect_to).into_response())
}

async fn editable_document(
    actions: &DocumentActions,
    room_id: &str,
    user: &User,
) -> Result<Room, ApiError> {
    let (room, user_type) = actions.document_access(room_id, &user.email).await?;
    if user_type != UserType::Editor {
        tracing::warn!(?user, %room_id, "viewer attempted to modify document");
        return Err(ActionError::PermissionDenied.into());
    }
    Ok(room)
}
