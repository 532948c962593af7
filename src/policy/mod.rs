//! Centralized authorization policy for HTTP handlers.
//!
//! Two roles exist: admins (`is_staff`) manage the catalogue, donors and
//! inventory; regular users file blood requests. Every handler calls
//! [`enforce`] with its action before touching any input.

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

pub type PolicyResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    BloodTypeRead,
    BloodTypeCreate,
    DonorList,
    DonorCreate,
    DonorUpdate,
    DonorDelete,
    InventoryRead,
    InventoryCreate,
    InventoryUpdate,
    BloodRequestCreate,
    BloodRequestList,
    BloodRequestApprove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    /// Denied, with the message returned to the caller
    Deny(&'static str),
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PolicyDecision::Allow)
    }
}

fn role_of(auth: &AuthUser) -> Role {
    if auth.is_staff {
        Role::Admin
    } else {
        Role::User
    }
}

/// Decide whether `auth` may perform `action`
pub fn decide(auth: &AuthUser, action: PolicyAction) -> PolicyDecision {
    let role = role_of(auth);
    match action {
        PolicyAction::BloodTypeRead | PolicyAction::InventoryRead => PolicyDecision::Allow,
        PolicyAction::BloodRequestCreate => match role {
            Role::User => PolicyDecision::Allow,
            Role::Admin => PolicyDecision::Deny("Blood request can be initiated by users only"),
        },
        admin_action => match role {
            Role::Admin => PolicyDecision::Allow,
            Role::User => PolicyDecision::Deny(admin_only_message(admin_action)),
        },
    }
}

fn admin_only_message(action: PolicyAction) -> &'static str {
    match action {
        PolicyAction::BloodTypeCreate => "Only admin can add blood type",
        PolicyAction::DonorList => "List of donors can only be viewed by admin",
        PolicyAction::DonorCreate => "Only admin can add donor",
        PolicyAction::DonorUpdate => "Only admin can update donor",
        PolicyAction::DonorDelete => "Only admin can delete donor",
        PolicyAction::InventoryCreate => "Only admin can add to blood inventory",
        PolicyAction::InventoryUpdate => "Only admin can update blood inventory",
        PolicyAction::BloodRequestList => "List of blood requests can only be viewed by admin",
        PolicyAction::BloodRequestApprove => "Blood request can only be approved by admin",
        _ => "Admin access required",
    }
}

/// [`decide`], with a denial mapped to `Forbidden`
pub fn enforce(auth: &AuthUser, action: PolicyAction) -> PolicyResult<()> {
    match decide(auth, action) {
        PolicyDecision::Allow => Ok(()),
        PolicyDecision::Deny(message) => {
            tracing::debug!(user_id = auth.user_id, ?action, "Policy denied");
            Err(AppError::Forbidden(message.to_string()))
        }
    }
}
