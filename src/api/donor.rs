//! Donor management endpoints (admin only)

use crate::domain::{AddDonorInput, Donor, UpdateDonorInput};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::policy::{enforce, PolicyAction};
use crate::state::HasServices;
use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{extract_json, ListQuery, ListResponse, MessageResponse};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DonorResponse {
    pub message: String,
    pub donor: Donor,
}

#[utoipa::path(
    get,
    path = "/getall_donors/",
    tag = "Donors",
    params(ListQuery),
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Page of donors, most recent donation first"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<Donor>>> {
    enforce(&auth, PolicyAction::DonorList)?;

    let page = state
        .donor_service()
        .list(query.page(), query.search())
        .await?;
    Ok(Json(ListResponse::from(page)))
}

#[utoipa::path(
    post,
    path = "/add_donor",
    tag = "Donors",
    request_body = AddDonorInput,
    security(("bearer_jwt" = [])),
    responses(
        (status = 201, description = "Donor added", body = DonorResponse),
        (status = 400, description = "Invalid input, unknown blood type or duplicate name"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    body: std::result::Result<Json<AddDonorInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    enforce(&auth, PolicyAction::DonorCreate)?;
    let input = extract_json(body)?;

    let donor = state.donor_service().add(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DonorResponse {
            message: "Donor added successfully".to_string(),
            donor,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/update_donor/{id}",
    tag = "Donors",
    params(("id" = i64, Path, description = "Donor ID")),
    request_body = UpdateDonorInput,
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Donor updated", body = DonorResponse),
        (status = 400, description = "Invalid input or name taken by another donor"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Donor not found")
    )
)]
/// Partial update; PUT and PATCH are routed here alike
pub async fn update<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<i64>,
    body: std::result::Result<Json<UpdateDonorInput>, JsonRejection>,
) -> Result<Json<DonorResponse>> {
    enforce(&auth, PolicyAction::DonorUpdate)?;
    let input = extract_json(body)?;

    let donor = state.donor_service().update(id, input).await?;
    Ok(Json(DonorResponse {
        message: "Donor details updated successfully".to_string(),
        donor,
    }))
}

#[utoipa::path(
    delete,
    path = "/delete_donor/{id}",
    tag = "Donors",
    params(("id" = i64, Path, description = "Donor ID")),
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Donor deleted", body = MessageResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Donor not found")
    )
)]
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    enforce(&auth, PolicyAction::DonorDelete)?;

    state.donor_service().delete(id).await?;
    Ok(Json(MessageResponse::new("Donor deleted successfully")))
}
