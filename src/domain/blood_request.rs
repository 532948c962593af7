//! Blood request domain model

use super::blood_type::BloodGroup;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_FULFILLED: &str = "Fulfilled";

/// A user's request for units of one blood type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BloodRequest {
    pub id: i64,
    /// Requesting user
    pub user_id: i64,
    pub blood_type: BloodGroup,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub blood_type_id: i64,
    pub units_requested: i32,
    pub status: String,
}

impl BloodRequest {
    pub fn is_fulfilled(&self) -> bool {
        self.status == STATUS_FULFILLED
    }
}

/// Input for requesting blood. Any client-supplied `status` is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RequestBloodInput {
    pub blood_type: String,
    #[validate(range(min = 1))]
    pub units_requested: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBloodRequest {
    pub user_id: i64,
    pub blood_type_id: i64,
    pub units_requested: i32,
}

/// Admin decision carried by an approval payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    /// Truthy `status`: mark the request fulfilled
    Approve,
    /// Falsy `status`: leave the request untouched
    Cancel,
}

impl ApprovalDecision {
    /// Interpret a raw approval body.
    ///
    /// An empty body, a non-object, `{}` or an object without `status` is
    /// rejected. `status` follows JSON truthiness: `false`, `null`, `0`, `""`,
    /// `[]` and `{}` cancel, everything else approves.
    pub fn from_payload(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::Validation("No data provided".to_string()));
        }

        let payload: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Invalid JSON payload: {}", e)))?;

        let fields = match payload {
            Value::Object(fields) if !fields.is_empty() => fields,
            _ => return Err(AppError::Validation("No data provided".to_string())),
        };

        match fields.get("status") {
            Some(status) if is_truthy(status) => Ok(ApprovalDecision::Approve),
            Some(_) => Ok(ApprovalDecision::Cancel),
            None => Err(AppError::Validation("status: This field is required.".to_string())),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
