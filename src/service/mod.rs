//! Business logic layer

pub mod blood_request;
pub mod blood_type;
pub mod donor;
pub mod identity;
pub mod inventory;

pub use blood_request::{ApprovalOutcome, BloodRequestService};
pub use blood_type::BloodTypeService;
pub use donor::DonorService;
pub use identity::{IdentityService, LoginResult};
pub use inventory::InventoryService;
