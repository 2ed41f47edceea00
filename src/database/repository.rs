use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Holding, HoldingChanges, NewHolding, NewUser, User};

/// Errors surfaced by the store backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Unsupported database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Credential store: user records keyed by id, unique by email.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

/// Holdings store. Every method except `create` takes the owner id and only
/// ever touches that owner's rows, so another user's holding looks exactly
/// like a missing one.
#[async_trait]
pub trait HoldingRepository: Send + Sync {
    /// All holdings of `owner_id`, oldest first.
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Holding>, StoreError>;
    async fn find_for_owner(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Holding>, StoreError>;
    async fn create(&self, owner_id: Uuid, new_holding: NewHolding) -> Result<Holding, StoreError>;
    /// `Ok(None)` when no holding `id` belongs to `owner_id`.
    async fn update_for_owner(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: HoldingChanges,
    ) -> Result<Option<Holding>, StoreError>;
    /// `Ok(false)` when no holding `id` belongs to `owner_id`.
    async fn delete_for_owner(&self, owner_id: Uuid, id: Uuid) -> Result<bool, StoreError>;
}
