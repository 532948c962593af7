//! Blood inventory endpoints

use crate::domain::{AddInventoryInput, Inventory, UpdateInventoryInput};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::policy::{enforce, PolicyAction};
use crate::state::HasServices;
use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{extract_json, ListResponse};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventoryResponse {
    pub message: String,
    pub inventory: Inventory,
}

#[utoipa::path(
    get,
    path = "/get_bloodinventory",
    tag = "Inventory",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Every inventory row on a single page")
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
) -> Result<Json<ListResponse<Inventory>>> {
    enforce(&auth, PolicyAction::InventoryRead)?;

    let items = state.inventory_service().list().await?;
    Ok(Json(ListResponse::single_page(items)))
}

#[utoipa::path(
    post,
    path = "/add_to_bloodinventory",
    tag = "Inventory",
    request_body = AddInventoryInput,
    security(("bearer_jwt" = [])),
    responses(
        (status = 201, description = "Inventory row created", body = InventoryResponse),
        (status = 400, description = "Invalid input or blood type already stocked"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    body: std::result::Result<Json<AddInventoryInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    enforce(&auth, PolicyAction::InventoryCreate)?;
    let input = extract_json(body)?;

    let inventory = state.inventory_service().add(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(InventoryResponse {
            message: "Blood type with quantity added to inventory".to_string(),
            inventory,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/update_units/{id}",
    tag = "Inventory",
    params(("id" = i64, Path, description = "Inventory row ID")),
    request_body = UpdateInventoryInput,
    security(("bearer_jwt" = [])),
    responses(
        (status = 201, description = "Inventory row updated", body = InventoryResponse),
        (status = 400, description = "Invalid input or blood type already stocked"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Inventory row not found")
    )
)]
/// Partial update of quantity and/or blood type. Answers 201 on success.
pub async fn update<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<i64>,
    body: std::result::Result<Json<UpdateInventoryInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    enforce(&auth, PolicyAction::InventoryUpdate)?;
    let input = extract_json(body)?;

    let inventory = state.inventory_service().update(id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(InventoryResponse {
            message: "Units available updated".to_string(),
            inventory,
        }),
    ))
}
