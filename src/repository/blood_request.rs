//! Blood request repository

use super::like_pattern;
use crate::domain::{BloodRequest, NewBloodRequest, STATUS_PENDING};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

const SELECT_REQUEST: &str = r#"
    SELECT r.id, r.user_id, bt.name AS blood_type, r.blood_type_id,
           r.units_requested, r.status
    FROM blood_requests r
    JOIN blood_types bt ON bt.id = r.blood_type_id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BloodRequestRepository: Send + Sync {
    /// Insert a new request in the `Pending` state
    async fn create(&self, input: &NewBloodRequest) -> Result<BloodRequest>;
    async fn find_by_id(&self, id: i64) -> Result<Option<BloodRequest>>;
    /// Requests whose status contains `status_query` (case-insensitive), oldest first
    async fn list(
        &self,
        status_query: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<BloodRequest>>;
    async fn count(&self, status_query: Option<String>) -> Result<i64>;
    async fn update_status(&self, id: i64, status: &str) -> Result<BloodRequest>;
}

pub struct BloodRequestRepositoryImpl {
    pool: MySqlPool,
}

impl BloodRequestRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BloodRequestRepository for BloodRequestRepositoryImpl {
    async fn create(&self, input: &NewBloodRequest) -> Result<BloodRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO blood_requests (user_id, blood_type_id, units_requested, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(input.user_id)
        .bind(input.blood_type_id)
        .bind(input.units_requested)
        .bind(STATUS_PENDING)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create blood request")))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BloodRequest>> {
        let sql = format!("{} WHERE r.id = ?", SELECT_REQUEST);
        let request = sqlx::query_as::<_, BloodRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(request)
    }

    async fn list(
        &self,
        status_query: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<BloodRequest>> {
        let mut sql = format!("{} WHERE 1=1", SELECT_REQUEST);
        if status_query.is_some() {
            sql.push_str(" AND LOWER(r.status) LIKE ?");
        }
        sql.push_str(" ORDER BY r.id ASC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, BloodRequest>(&sql);
        if let Some(q) = &status_query {
            query = query.bind(like_pattern(q));
        }
        let requests = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(requests)
    }

    async fn count(&self, status_query: Option<String>) -> Result<i64> {
        let mut sql = String::from("SELECT COUNT(*) FROM blood_requests r");
        if status_query.is_some() {
            sql.push_str(" WHERE LOWER(r.status) LIKE ?");
        }

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        if let Some(q) = &status_query {
            query = query.bind(like_pattern(q));
        }
        let row = query.fetch_one(&self.pool).await?;
        Ok(row.0)
    }

    async fn update_status(&self, id: i64, status: &str) -> Result<BloodRequest> {
        // MySQL reports 0 affected rows when the value is unchanged, so existence
        // is checked by re-reading instead of via rows_affected
        sqlx::query("UPDATE blood_requests SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blood request {} not found", id)))
    }
}
