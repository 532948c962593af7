//! Blood request workflow

use crate::domain::{
    ApprovalDecision, BloodRequest, NewBloodRequest, Page, Pagination, RequestBloodInput,
    PAGE_SIZE, STATUS_FULFILLED,
};
use crate::error::{AppError, Result};
use crate::repository::{BloodRequestRepository, BloodTypeRepository};
use crate::service::donor::normalize_query;
use crate::service::BloodTypeService;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Result of handling an approval payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    Approved(BloodRequest),
    /// Falsy status; the request was left as is
    Cancelled,
}

pub struct BloodRequestService<R: BloodRequestRepository, B: BloodTypeRepository> {
    repo: Arc<R>,
    blood_types: Arc<BloodTypeService<B>>,
}

impl<R: BloodRequestRepository, B: BloodTypeRepository> BloodRequestService<R, B> {
    pub fn new(repo: Arc<R>, blood_types: Arc<BloodTypeService<B>>) -> Self {
        Self { repo, blood_types }
    }

    /// File a request on behalf of `user_id`; it always starts `Pending`
    pub async fn create(&self, user_id: i64, input: RequestBloodInput) -> Result<BloodRequest> {
        input.validate()?;
        let blood_type = self.blood_types.resolve(&input.blood_type).await?;

        let request = self
            .repo
            .create(&NewBloodRequest {
                user_id,
                blood_type_id: blood_type.id,
                units_requested: input.units_requested,
            })
            .await?;

        metrics::counter!("bloodbank_blood_requests_total", "action" => "created").increment(1);
        info!(
            request_id = request.id,
            user_id,
            blood_type = %request.blood_type,
            units = request.units_requested,
            "Blood request created"
        );
        Ok(request)
    }

    /// One page of requests, optionally filtered by status
    pub async fn list(&self, page: i64, query: Option<&str>) -> Result<Page<BloodRequest>> {
        let query = normalize_query(query);
        let total = self.repo.count(query.clone()).await?;
        let pagination = Pagination::new(page, PAGE_SIZE, total);

        let items = if total == 0 {
            Vec::new()
        } else {
            self.repo
                .list(query, pagination.offset(), pagination.limit())
                .await?
        };

        Ok(Page { items, pagination })
    }

    /// Apply an admin decision to a request.
    ///
    /// The request must exist before the payload is looked at. Approving an
    /// already fulfilled request is a no-op that still reports success.
    pub async fn approve(&self, id: i64, payload: &[u8]) -> Result<ApprovalOutcome> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Blood request {} not found", id)));
        }

        match ApprovalDecision::from_payload(payload)? {
            ApprovalDecision::Cancel => {
                metrics::counter!("bloodbank_blood_requests_total", "action" => "cancelled")
                    .increment(1);
                info!(request_id = id, "Blood request approval cancelled");
                Ok(ApprovalOutcome::Cancelled)
            }
            ApprovalDecision::Approve => {
                let request = self.repo.update_status(id, STATUS_FULFILLED).await?;
                metrics::counter!("bloodbank_blood_requests_total", "action" => "approved")
                    .increment(1);
                info!(request_id = id, "Blood request fulfilled");
                Ok(ApprovalOutcome::Approved(request))
            }
        }
    }
}
