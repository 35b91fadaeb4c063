//! User repository trait (port)

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    /// Every registered user, ordered by id.
    async fn list_all(&self) -> Result<Vec<User>, DomainError>;
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;
}
