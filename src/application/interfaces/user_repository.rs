use async_trait::async_trait;

use crate::domain::{DomainError, User};

/// Persistence for users. Listings are ordered by name, then id.
#[async_trait]
pub trait UserRepository: Send {
    async fn get_by_id(&mut self, id: &str) -> Result<User, DomainError>;

    async fn list_by_team_name(&mut self, team_name: &str) -> Result<Vec<User>, DomainError>;

    async fn list_active_by_team_name(
        &mut self,
        team_name: &str,
    ) -> Result<Vec<User>, DomainError>;

    /// Inserts new users and overwrites team, name and active flag of
    /// existing ones. Creation timestamps of existing users are kept.
    async fn upsert_many(&mut self, users: &[User]) -> Result<(), DomainError>;

    async fn set_active(&mut self, id: &str, is_active: bool) -> Result<(), DomainError>;
}
