//! Blood inventory domain model

use super::blood_type::BloodGroup;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Units on hand for one blood type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Inventory {
    pub id: i64,
    pub blood_type: BloodGroup,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub blood_type_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddInventoryInput {
    pub blood_type: String,
    #[validate(range(min = 0))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateInventoryInput {
    pub blood_type: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInventory {
    pub blood_type_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryChanges {
    pub blood_type_id: Option<i64>,
    pub quantity: Option<i32>,
}
