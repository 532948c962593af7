//! Blood inventory repository

use crate::domain::{Inventory, InventoryChanges, NewInventory};
use crate::error::{map_unique_violation, AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

const SELECT_INVENTORY: &str = r#"
    SELECT i.id, bt.name AS blood_type, i.blood_type_id, i.quantity
    FROM blood_inventory i
    JOIN blood_types bt ON bt.id = i.blood_type_id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn create(&self, input: &NewInventory) -> Result<Inventory>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Inventory>>;
    async fn find_by_blood_type(&self, blood_type_id: i64) -> Result<Option<Inventory>>;
    async fn list(&self) -> Result<Vec<Inventory>>;
    async fn update(&self, id: i64, changes: &InventoryChanges) -> Result<Inventory>;
}

pub struct InventoryRepositoryImpl {
    pool: MySqlPool,
}

impl InventoryRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryRepository for InventoryRepositoryImpl {
    async fn create(&self, input: &NewInventory) -> Result<Inventory> {
        let result =
            sqlx::query("INSERT INTO blood_inventory (blood_type_id, quantity) VALUES (?, ?)")
                .bind(input.blood_type_id)
                .bind(input.quantity)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    map_unique_violation(e, "blood inventory with this blood type already exists")
                })?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create inventory")))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Inventory>> {
        let sql = format!("{} WHERE i.id = ?", SELECT_INVENTORY);
        let row = sqlx::query_as::<_, Inventory>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_by_blood_type(&self, blood_type_id: i64) -> Result<Option<Inventory>> {
        let sql = format!("{} WHERE i.blood_type_id = ?", SELECT_INVENTORY);
        let row = sqlx::query_as::<_, Inventory>(&sql)
            .bind(blood_type_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list(&self) -> Result<Vec<Inventory>> {
        let sql = format!("{} ORDER BY i.id", SELECT_INVENTORY);
        let rows = sqlx::query_as::<_, Inventory>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn update(&self, id: i64, changes: &InventoryChanges) -> Result<Inventory> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inventory {} not found", id)))?;

        let blood_type_id = changes.blood_type_id.unwrap_or(existing.blood_type_id);
        let quantity = changes.quantity.unwrap_or(existing.quantity);

        sqlx::query("UPDATE blood_inventory SET blood_type_id = ?, quantity = ? WHERE id = ?")
            .bind(blood_type_id)
            .bind(quantity)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, "blood inventory with this blood type already exists")
            })?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update inventory")))
    }
}
