pub mod contact;
pub mod identity;
pub mod repository;
pub mod showcase;
pub mod validators;

pub use identity::{role_permissions, Permission, Principal, UserProfile, UserRole};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
