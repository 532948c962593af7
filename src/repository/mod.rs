//! Data access layer (Repository pattern)

pub mod blood_request;
pub mod blood_type;
pub mod donor;
pub mod inventory;
pub mod user;

pub use blood_request::BloodRequestRepository;
pub use blood_type::BloodTypeRepository;
pub use donor::DonorRepository;
pub use inventory::InventoryRepository;
pub use user::UserRepository;

/// Case-insensitive substring pattern for `LOWER(col) LIKE ?`.
///
/// `%`, `_` and `\` in the search term match literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
