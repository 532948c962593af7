//! Domain models for Blood Bank Core

pub mod blood_request;
pub mod blood_type;
pub mod common;
pub mod donor;
pub mod inventory;
pub mod user;

pub use blood_request::*;
pub use blood_type::*;
pub use common::*;
pub use donor::*;
pub use inventory::*;
pub use user::*;
