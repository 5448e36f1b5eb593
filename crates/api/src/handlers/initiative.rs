//! Handlers for the `/initiatives` resource.

use agrinit_core::initiative::{CreateInitiative, UpdateInitiative};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::{
    InitiativeListResponse, InitiativeMutationResponse, InitiativeResponse, MessageResponse,
    INITIATIVE_CREATED, INITIATIVE_DELETED, INITIATIVE_UPDATED,
};
use crate::services::InitiativeService;
use crate::state::AppState;

/// GET /initiatives
pub async fn list(State(state): State<AppState>) -> AppResult<Json<InitiativeListResponse>> {
    let initiatives = InitiativeService::list(state.store.as_ref()).await?;
    Ok(Json(InitiativeListResponse { initiatives }))
}

/// GET /initiatives/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<InitiativeResponse>> {
    let initiative = InitiativeService::get(state.store.as_ref(), &id).await?;
    Ok(Json(InitiativeResponse { initiative }))
}

/// POST /initiatives
pub async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(input): ApiJson<CreateInitiative>,
) -> AppResult<(StatusCode, Json<InitiativeMutationResponse>)> {
    let initiative = InitiativeService::create(state.store.as_ref(), input, &caller).await?;
    Ok((
        StatusCode::CREATED,
        Json(InitiativeMutationResponse {
            message: INITIATIVE_CREATED,
            initiative,
        }),
    ))
}

/// PUT /initiatives/{id}
pub async fn update(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateInitiative>,
) -> AppResult<Json<InitiativeMutationResponse>> {
    let initiative = InitiativeService::update(state.store.as_ref(), &id, input, &caller).await?;
    Ok(Json(InitiativeMutationResponse {
        message: INITIATIVE_UPDATED,
        initiative,
    }))
}

/// DELETE /initiatives/{id}
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    InitiativeService::delete(state.store.as_ref(), &id, &caller).await?;
    Ok(Json(MessageResponse {
        message: INITIATIVE_DELETED,
    }))
}
