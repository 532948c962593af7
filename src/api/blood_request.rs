//! Blood request endpoints

use crate::domain::{BloodRequest, RequestBloodInput};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::policy::{enforce, PolicyAction};
use crate::service::ApprovalOutcome;
use crate::state::HasServices;
use axum::extract::rejection::JsonRejection;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{extract_json, ListQuery, ListResponse, MessageResponse};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BloodRequestResponse {
    pub message: String,
    pub blood_request: BloodRequest,
}

#[utoipa::path(
    post,
    path = "/request_blood",
    tag = "Blood Requests",
    request_body = RequestBloodInput,
    security(("bearer_jwt" = [])),
    responses(
        (status = 201, description = "Request filed as Pending", body = BloodRequestResponse),
        (status = 400, description = "Invalid input or unknown blood type"),
        (status = 403, description = "Admins cannot file requests")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    body: std::result::Result<Json<RequestBloodInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    enforce(&auth, PolicyAction::BloodRequestCreate)?;
    let input = extract_json(body)?;

    let blood_request = state
        .blood_request_service()
        .create(auth.user_id, input)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(BloodRequestResponse {
            message: "Request successfully sent".to_string(),
            blood_request,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/get_all_blood_request/",
    tag = "Blood Requests",
    params(ListQuery),
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Page of blood requests, oldest first"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<BloodRequest>>> {
    enforce(&auth, PolicyAction::BloodRequestList)?;

    let page = state
        .blood_request_service()
        .list(query.page(), query.search())
        .await?;
    Ok(Json(ListResponse::from(page)))
}

#[utoipa::path(
    post,
    path = "/approve_request/{id}",
    tag = "Blood Requests",
    params(("id" = i64, Path, description = "Blood request ID")),
    request_body(content = serde_json::Value, description = "`{\"status\": <truthy or falsy>}`"),
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Request fulfilled, or cancelled when status is falsy"),
        (status = 400, description = "No payload or missing status"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Blood request not found")
    )
)]
/// Approve or cancel a request.
///
/// The body is read raw: `{"status": <truthy>}` fulfills the request,
/// a falsy status leaves it untouched.
pub async fn approve<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Response> {
    enforce(&auth, PolicyAction::BloodRequestApprove)?;

    let outcome = state.blood_request_service().approve(id, &body).await?;
    let response = match outcome {
        ApprovalOutcome::Approved(blood_request) => Json(BloodRequestResponse {
            message: "Request successfully approved".to_string(),
            blood_request,
        })
        .into_response(),
        ApprovalOutcome::Cancelled => Json(MessageResponse::new("Request cancelled")).into_response(),
    };
    Ok(response)
}
