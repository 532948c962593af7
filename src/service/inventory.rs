//! Blood inventory business logic

use crate::domain::{AddInventoryInput, Inventory, InventoryChanges, NewInventory, UpdateInventoryInput};
use crate::error::{AppError, Result};
use crate::repository::{BloodTypeRepository, InventoryRepository};
use crate::service::BloodTypeService;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

const DUPLICATE_BLOOD_TYPE: &str = "blood inventory with this blood type already exists";

pub struct InventoryService<R: InventoryRepository, B: BloodTypeRepository> {
    repo: Arc<R>,
    blood_types: Arc<BloodTypeService<B>>,
}

impl<R: InventoryRepository, B: BloodTypeRepository> InventoryService<R, B> {
    pub fn new(repo: Arc<R>, blood_types: Arc<BloodTypeService<B>>) -> Self {
        Self { repo, blood_types }
    }

    pub async fn list(&self) -> Result<Vec<Inventory>> {
        self.repo.list().await
    }

    pub async fn add(&self, input: AddInventoryInput) -> Result<Inventory> {
        input.validate()?;
        let blood_type = self.blood_types.resolve(&input.blood_type).await?;

        if self
            .repo
            .find_by_blood_type(blood_type.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(DUPLICATE_BLOOD_TYPE.to_string()));
        }

        let row = self
            .repo
            .create(&NewInventory {
                blood_type_id: blood_type.id,
                quantity: input.quantity,
            })
            .await?;

        info!(inventory_id = row.id, blood_type = %row.blood_type, quantity = row.quantity, "Inventory added");
        Ok(row)
    }

    /// Partial update of a row's quantity and/or blood type
    pub async fn update(&self, id: i64, input: UpdateInventoryInput) -> Result<Inventory> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Inventory {} not found", id)));
        }

        input.validate()?;

        let blood_type_id = match &input.blood_type {
            Some(code) => {
                let blood_type = self.blood_types.resolve(code).await?;
                if let Some(other) = self.repo.find_by_blood_type(blood_type.id).await? {
                    if other.id != id {
                        return Err(AppError::Conflict(DUPLICATE_BLOOD_TYPE.to_string()));
                    }
                }
                Some(blood_type.id)
            }
            None => None,
        };

        let row = self
            .repo
            .update(
                id,
                &InventoryChanges {
                    blood_type_id,
                    quantity: input.quantity,
                },
            )
            .await?;

        info!(inventory_id = id, quantity = row.quantity, "Inventory updated");
        Ok(row)
    }
}
