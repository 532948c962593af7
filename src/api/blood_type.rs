//! Blood type catalogue endpoints

use crate::domain::{AddBloodTypeInput, BloodType};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::policy::{enforce, PolicyAction};
use crate::state::HasServices;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::extract_json;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BloodTypeCreatedResponse {
    pub message: String,
    pub blood_type: BloodType,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BloodTypeListResponse {
    pub items: Vec<BloodType>,
}

#[utoipa::path(
    post,
    path = "/add_bloodtype",
    tag = "Blood Types",
    request_body = AddBloodTypeInput,
    security(("bearer_jwt" = [])),
    responses(
        (status = 201, description = "Blood type added", body = BloodTypeCreatedResponse),
        (status = 400, description = "Unknown or duplicate blood type"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn add<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    body: std::result::Result<Json<AddBloodTypeInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    enforce(&auth, PolicyAction::BloodTypeCreate)?;
    let input = extract_json(body)?;

    let blood_type = state.blood_type_service().add(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(BloodTypeCreatedResponse {
            message: "Blood type added successfully".to_string(),
            blood_type,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/get_bloodtypes",
    tag = "Blood Types",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "All stored blood types", body = BloodTypeListResponse)
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
) -> Result<Json<BloodTypeListResponse>> {
    enforce(&auth, PolicyAction::BloodTypeRead)?;

    let items = state.blood_type_service().list().await?;
    Ok(Json(BloodTypeListResponse { items }))
}
