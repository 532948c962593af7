//! Blood donor domain model

use super::blood_type::BloodGroup;
use super::common::deserialize_present;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Donor record, joined with its blood type code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Donor {
    pub id: i64,
    pub donor_name: String,
    pub blood_type: BloodGroup,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub blood_type_id: i64,
    pub units_donated: Option<i32>,
    /// Set to the current date on every create and update
    pub last_donated: Option<NaiveDate>,
}

/// Input for adding a donor. A client-supplied `last_donated` is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddDonorInput {
    #[validate(length(min = 1, max = 20))]
    pub donor_name: String,
    /// Blood type code, e.g. `O+`
    pub blood_type: String,
    #[validate(range(min = 0))]
    pub units_donated: Option<i32>,
}

/// Partial donor update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_units_update"))]
pub struct UpdateDonorInput {
    #[validate(length(min = 1, max = 20))]
    pub donor_name: Option<String>,
    pub blood_type: Option<String>,
    /// `null` clears the stored value
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<i32>)]
    pub units_donated: Option<Option<i32>>,
}

fn validate_units_update(input: &UpdateDonorInput) -> Result<(), ValidationError> {
    match input.units_donated {
        Some(Some(units)) if units < 0 => {
            let mut err = ValidationError::new("range");
            err.message = Some("units_donated must not be negative".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// Resolved donor row to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonor {
    pub donor_name: String,
    pub blood_type_id: i64,
    pub units_donated: Option<i32>,
    pub last_donated: NaiveDate,
}

/// Resolved donor changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorChanges {
    pub donor_name: Option<String>,
    pub blood_type_id: Option<i64>,
    /// `Some(None)` clears the column
    pub units_donated: Option<Option<i32>>,
    pub last_donated: NaiveDate,
}
