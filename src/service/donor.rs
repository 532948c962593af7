//! Donor business logic

use crate::domain::{
    AddDonorInput, Donor, DonorChanges, NewDonor, Page, Pagination, UpdateDonorInput, PAGE_SIZE,
};
use crate::error::{AppError, Result};
use crate::repository::{BloodTypeRepository, DonorRepository};
use crate::service::BloodTypeService;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct DonorService<R: DonorRepository, B: BloodTypeRepository> {
    repo: Arc<R>,
    blood_types: Arc<BloodTypeService<B>>,
}

impl<R: DonorRepository, B: BloodTypeRepository> DonorService<R, B> {
    pub fn new(repo: Arc<R>, blood_types: Arc<BloodTypeService<B>>) -> Self {
        Self { repo, blood_types }
    }

    /// One page of donors, optionally filtered by blood type code
    pub async fn list(&self, page: i64, query: Option<&str>) -> Result<Page<Donor>> {
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

    pub async fn add(&self, input: AddDonorInput) -> Result<Donor> {
        input.validate()?;
        let blood_type = self.blood_types.resolve(&input.blood_type).await?;

        if self.repo.find_by_name(&input.donor_name).await?.is_some() {
            return Err(AppError::Conflict(
                "blood donor with this donor name already exists".to_string(),
            ));
        }

        let donor = self
            .repo
            .create(&NewDonor {
                donor_name: input.donor_name,
                blood_type_id: blood_type.id,
                units_donated: input.units_donated,
                last_donated: Utc::now().date_naive(),
            })
            .await?;

        info!(donor_id = donor.id, blood_type = %donor.blood_type, "Donor added");
        Ok(donor)
    }

    /// Partial update; the donation date always moves to today
    pub async fn update(&self, id: i64, input: UpdateDonorInput) -> Result<Donor> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Donor {} not found", id)))?;

        input.validate()?;

        let blood_type_id = match &input.blood_type {
            Some(code) => Some(self.blood_types.resolve(code).await?.id),
            None => None,
        };

        if let Some(name) = &input.donor_name {
            if name != &existing.donor_name {
                if let Some(other) = self.repo.find_by_name(name).await? {
                    if other.id != id {
                        return Err(AppError::Conflict(
                            "blood donor with this donor name already exists".to_string(),
                        ));
                    }
                }
            }
        }

        let donor = self
            .repo
            .update(
                id,
                &DonorChanges {
                    donor_name: input.donor_name,
                    blood_type_id,
                    units_donated: input.units_donated,
                    last_donated: Utc::now().date_naive(),
                },
            )
            .await?;

        info!(donor_id = id, "Donor updated");
        Ok(donor)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await?;
        info!(donor_id = id, "Donor deleted");
        Ok(())
    }
}

/// Trimmed search term, `None` when blank
pub(crate) fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}
