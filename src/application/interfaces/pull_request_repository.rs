use async_trait::async_trait;

use crate::domain::{DomainError, PullRequest, ReviewerStat};

/// Persistence for pull requests and their reviewer assignments.
#[async_trait]
pub trait PullRequestRepository: Send {
    async fn exists(&mut self, id: &str) -> Result<bool, DomainError>;

    /// Fails with `PullRequestExists` on an id collision.
    async fn create(&mut self, pull_request: &PullRequest) -> Result<(), DomainError>;

    async fn get_by_id(&mut self, id: &str) -> Result<PullRequest, DomainError>;

    /// Replaces the stored record, reviewers included. `NotFound` if absent.
    async fn update(&mut self, pull_request: &PullRequest) -> Result<(), DomainError>;

    /// Newest first.
    async fn list_by_reviewer_id(
        &mut self,
        reviewer_id: &str,
    ) -> Result<Vec<PullRequest>, DomainError>;

    /// Open-review counts for members of `team_name` with at least one
    /// assignment, busiest first.
    async fn list_reviewer_stats(
        &mut self,
        team_name: &str,
    ) -> Result<Vec<ReviewerStat>, DomainError>;
}
