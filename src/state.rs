//! Application state traits for dependency injection
//!
//! Handlers are generic over [`HasServices`], so the same handler code runs
//! against the production `AppState` and against in-memory test states.

use crate::cache::CacheOperations;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{
    BloodRequestRepository, BloodTypeRepository, DonorRepository, InventoryRepository,
    UserRepository,
};
use crate::service::{
    BloodRequestService, BloodTypeService, DonorService, IdentityService, InventoryService,
};

/// Trait for application state that provides access to all services.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// The user (identity store) repository type
    type UserRepo: UserRepository;
    /// The blood type repository type
    type BloodTypeRepo: BloodTypeRepository;
    /// The blood inventory repository type
    type InventoryRepo: InventoryRepository;
    /// The donor repository type
    type DonorRepo: DonorRepository;
    /// The blood request repository type
    type RequestRepo: BloodRequestRepository;
    /// The token revocation list
    type Cache: CacheOperations;

    /// Get the application configuration
    fn config(&self) -> &Config;

    fn identity_service(&self) -> &IdentityService<Self::UserRepo, Self::Cache>;

    fn blood_type_service(&self) -> &BloodTypeService<Self::BloodTypeRepo>;

    fn donor_service(&self) -> &DonorService<Self::DonorRepo, Self::BloodTypeRepo>;

    fn inventory_service(&self) -> &InventoryService<Self::InventoryRepo, Self::BloodTypeRepo>;

    fn blood_request_service(&self) -> &BloodRequestService<Self::RequestRepo, Self::BloodTypeRepo>;

    /// Get the JWT manager used by the `AuthUser` extractor
    fn jwt_manager(&self) -> &JwtManager;

    /// Check the backing stores: `(database_ok, cache_ok)`
    fn check_ready(&self) -> impl std::future::Future<Output = (bool, bool)> + Send;
}
