use async_trait::async_trait;

use crate::domain::{DomainError, Team};

/// Persistence for teams.
#[async_trait]
pub trait TeamRepository: Send {
    /// Fails with `TeamExists` when the name is already taken.
    async fn create(&mut self, team: &Team) -> Result<(), DomainError>;

    async fn get_by_name(&mut self, name: &str) -> Result<Team, DomainError>;
}
