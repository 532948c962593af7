//! Blood type business logic and code resolution

use crate::domain::{AddBloodTypeInput, BloodGroup, BloodType};
use crate::error::{AppError, Result};
use crate::repository::BloodTypeRepository;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct BloodTypeService<R: BloodTypeRepository> {
    repo: Arc<R>,
}

impl<R: BloodTypeRepository> BloodTypeService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn add(&self, input: AddBloodTypeInput) -> Result<BloodType> {
        input.validate()?;

        let name: BloodGroup = input.name.parse().map_err(|_| {
            AppError::Validation(format!("name: \"{}\" is not a valid choice.", input.name))
        })?;

        if self.repo.find_by_name(name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "blood type with this name '{}' already exists",
                name
            )));
        }

        let blood_type = self.repo.create(name).await?;
        info!(blood_type_id = blood_type.id, name = %name, "Blood type added");
        Ok(blood_type)
    }

    pub async fn list(&self) -> Result<Vec<BloodType>> {
        self.repo.list().await
    }

    /// Translate a wire blood type code into the stored row.
    ///
    /// Missing, malformed and unstored codes all fail with `Validation`.
    pub async fn resolve(&self, code: &str) -> Result<BloodType> {
        if code.trim().is_empty() {
            return Err(AppError::Validation(
                "blood_type: This field is required.".to_string(),
            ));
        }

        let not_found =
            || AppError::Validation(format!("blood_type: Blood type '{}' does not exist.", code));

        let name: BloodGroup = code.parse().map_err(|_| not_found())?;
        self.repo.find_by_name(name).await?.ok_or_else(not_found)
    }
}
