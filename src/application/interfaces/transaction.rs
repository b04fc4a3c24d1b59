use async_trait::async_trait;

use crate::domain::DomainError;

use super::{PullRequestRepository, TeamRepository, UserRepository};

/// A unit of work against the store.
///
/// All repository calls made through one transaction commit together on
/// [`Transaction::commit`]. Dropping a transaction without committing rolls
/// it back, so a cancelled operation never leaves partial writes behind.
#[async_trait]
pub trait Transaction: Send {
    fn teams(&mut self) -> &mut dyn TeamRepository;

    fn users(&mut self) -> &mut dyn UserRepository;

    fn pull_requests(&mut self) -> &mut dyn PullRequestRepository;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}

/// Opens transactions. Implementations serialize conflicting transactions
/// so that a read followed by a conditional write sees a consistent state.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn Transaction>, DomainError>;
}
