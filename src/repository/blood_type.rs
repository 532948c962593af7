//! Blood type repository

use crate::domain::{BloodGroup, BloodType};
use crate::error::{map_unique_violation, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BloodTypeRepository: Send + Sync {
    async fn create(&self, name: BloodGroup) -> Result<BloodType>;
    async fn find_by_name(&self, name: BloodGroup) -> Result<Option<BloodType>>;
    /// All stored types ordered by id
    async fn list(&self) -> Result<Vec<BloodType>>;
}

pub struct BloodTypeRepositoryImpl {
    pool: MySqlPool,
}

impl BloodTypeRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BloodTypeRepository for BloodTypeRepositoryImpl {
    async fn create(&self, name: BloodGroup) -> Result<BloodType> {
        let result = sqlx::query("INSERT INTO blood_types (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, format!("blood type with this name '{}' already exists", name))
            })?;

        Ok(BloodType {
            id: result.last_insert_id() as i64,
            name,
        })
    }

    async fn find_by_name(&self, name: BloodGroup) -> Result<Option<BloodType>> {
        let blood_type =
            sqlx::query_as::<_, BloodType>("SELECT id, name FROM blood_types WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(blood_type)
    }

    async fn list(&self) -> Result<Vec<BloodType>> {
        let blood_types =
            sqlx::query_as::<_, BloodType>("SELECT id, name FROM blood_types ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(blood_types)
    }
}
