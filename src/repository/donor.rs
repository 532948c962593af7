//! Blood donor repository

use super::like_pattern;
use crate::domain::{Donor, DonorChanges, NewDonor};
use crate::error::{map_unique_violation, AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

const SELECT_DONOR: &str = r#"
    SELECT d.id, d.donor_name, bt.name AS blood_type, d.blood_type_id,
           d.units_donated, d.last_donated
    FROM blood_donors d
    JOIN blood_types bt ON bt.id = d.blood_type_id
"#;

const DUPLICATE_NAME: &str = "blood donor with this donor name already exists";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonorRepository: Send + Sync {
    async fn create(&self, input: &NewDonor) -> Result<Donor>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Donor>>;
    async fn find_by_name(&self, donor_name: &str) -> Result<Option<Donor>>;
    /// Donors whose blood type code contains `blood_type_query` (case-insensitive),
    /// most recent donation first, never-donated last, then newest id first
    async fn list(
        &self,
        blood_type_query: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Donor>>;
    async fn count(&self, blood_type_query: Option<String>) -> Result<i64>;
    async fn update(&self, id: i64, changes: &DonorChanges) -> Result<Donor>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct DonorRepositoryImpl {
    pool: MySqlPool,
}

impl DonorRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonorRepository for DonorRepositoryImpl {
    async fn create(&self, input: &NewDonor) -> Result<Donor> {
        let result = sqlx::query(
            r#"
            INSERT INTO blood_donors (donor_name, blood_type_id, units_donated, last_donated)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&input.donor_name)
        .bind(input.blood_type_id)
        .bind(input.units_donated)
        .bind(input.last_donated)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create donor")))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Donor>> {
        let sql = format!("{} WHERE d.id = ?", SELECT_DONOR);
        let donor = sqlx::query_as::<_, Donor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(donor)
    }

    async fn find_by_name(&self, donor_name: &str) -> Result<Option<Donor>> {
        let sql = format!("{} WHERE d.donor_name = ?", SELECT_DONOR);
        let donor = sqlx::query_as::<_, Donor>(&sql)
            .bind(donor_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(donor)
    }

    async fn list(
        &self,
        blood_type_query: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Donor>> {
        let mut sql = format!("{} WHERE 1=1", SELECT_DONOR);
        if blood_type_query.is_some() {
            sql.push_str(" AND LOWER(bt.name) LIKE ?");
        }
        sql.push_str(
            " ORDER BY d.last_donated IS NULL, d.last_donated DESC, d.id DESC LIMIT ? OFFSET ?",
        );

        let mut query = sqlx::query_as::<_, Donor>(&sql);
        if let Some(q) = &blood_type_query {
            query = query.bind(like_pattern(q));
        }
        let donors = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(donors)
    }

    async fn count(&self, blood_type_query: Option<String>) -> Result<i64> {
        let mut sql = String::from(
            "SELECT COUNT(*) FROM blood_donors d JOIN blood_types bt ON bt.id = d.blood_type_id",
        );
        if blood_type_query.is_some() {
            sql.push_str(" WHERE LOWER(bt.name) LIKE ?");
        }

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        if let Some(q) = &blood_type_query {
            query = query.bind(like_pattern(q));
        }
        let row = query.fetch_one(&self.pool).await?;
        Ok(row.0)
    }

    async fn update(&self, id: i64, changes: &DonorChanges) -> Result<Donor> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Donor {} not found", id)))?;

        let donor_name = changes.donor_name.as_ref().unwrap_or(&existing.donor_name);
        let blood_type_id = changes.blood_type_id.unwrap_or(existing.blood_type_id);
        let units_donated = changes.units_donated.unwrap_or(existing.units_donated);

        sqlx::query(
            r#"
            UPDATE blood_donors
            SET donor_name = ?, blood_type_id = ?, units_donated = ?, last_donated = ?
            WHERE id = ?
            "#,
        )
        .bind(donor_name)
        .bind(blood_type_id)
        .bind(units_donated)
        .bind(changes.last_donated)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update donor")))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM blood_donors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Donor {} not found", id)));
        }

        Ok(())
    }
}
