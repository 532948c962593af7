//! REST API handlers and shared response types

pub mod auth;
pub mod blood_request;
pub mod blood_type;
pub mod donor;
pub mod health;
pub mod inventory;
pub mod metrics;

use crate::domain::{parse_page, Page};
use crate::error::{AppError, Result};
use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

/// Unwrap a JSON body taken as `Result<Json<T>, JsonRejection>`.
///
/// Handlers behind a policy check take the body this way so the role is
/// checked before the payload is parsed.
pub(crate) fn extract_json<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value).map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected request body");
        AppError::Validation("Invalid request body".to_string())
    })
}

/// List query parameters.
///
/// `page` stays a raw string so a non-numeric value falls back to the
/// first page instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    pub page: Option<String>,
    pub q: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> i64 {
        parse_page(self.page.as_deref())
    }

    pub fn search(&self) -> Option<&str> {
        self.q.as_deref()
    }
}

/// List response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl<T> From<Page<T>> for ListResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.items,
            total: page.pagination.total,
            page: page.pagination.page,
            total_pages: page.pagination.total_pages,
        }
    }
}

impl<T> ListResponse<T> {
    /// Everything on a single page
    pub fn single_page(items: Vec<T>) -> Self {
        let total = items.len() as i64;
        Self {
            items,
            total,
            page: 1,
            total_pages: if total == 0 { 0 } else { 1 },
        }
    }
}

/// Message response (for delete, etc.)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
