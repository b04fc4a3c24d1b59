use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{Clock, TransactionManager};
use crate::domain::{DomainError, PullRequest, ReviewerPool, MAX_REVIEWERS};

/// Pull request lifecycle: creation with automatic reviewer assignment,
/// merge, and reviewer reassignment.
pub struct PullRequestService {
    transactions: Arc<dyn TransactionManager>,
    clock: Arc<dyn Clock>,
}

impl PullRequestService {
    pub fn new(transactions: Arc<dyn TransactionManager>, clock: Arc<dyn Clock>) -> Self {
        Self {
            transactions,
            clock,
        }
    }

    /// Opens a pull request and assigns up to two active teammates of the
    /// author. A team with no eligible teammates yields no reviewers.
    pub async fn create(
        &self,
        id: &str,
        title: &str,
        author_id: &str,
    ) -> Result<PullRequest, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::invalid_input("pull request id is required"));
        }
        if title.trim().is_empty() {
            return Err(DomainError::invalid_input("pull request title is required"));
        }

        let mut tx = self.transactions.begin().await?;

        let author = tx.users().get_by_id(author_id).await?;
        let teammates = tx
            .users()
            .list_active_by_team_name(author.team_name())
            .await?;
        let reviewers = ReviewerPool::new(teammates)
            .excluding(author.id())
            .take(MAX_REVIEWERS);

        let pull_request = PullRequest::open(id, title, author.id(), reviewers, self.clock.now())?;
        tx.pull_requests().create(&pull_request).await?;
        tx.commit().await?;

        info!(
            "Created pull request {} by {} with reviewers {:?}",
            pull_request.id(),
            pull_request.author_id(),
            pull_request.reviewers()
        );
        Ok(pull_request)
    }

    /// Marks the pull request merged. Merging again returns the stored
    /// record untouched.
    pub async fn merge(&self, id: &str) -> Result<PullRequest, DomainError> {
        let mut tx = self.transactions.begin().await?;
        let mut pull_request = tx.pull_requests().get_by_id(id).await?;

        if !pull_request.merge(self.clock.now()) {
            debug!("Pull request {} already merged", id);
            return Ok(pull_request);
        }

        tx.pull_requests().update(&pull_request).await?;
        tx.commit().await?;

        info!("Merged pull request {}", id);
        Ok(pull_request)
    }

    /// Replaces `old_reviewer_id` with the first eligible active member of
    /// that reviewer's team, keeping its position in the reviewer list.
    pub async fn reassign_reviewer(
        &self,
        pr_id: &str,
        old_reviewer_id: &str,
    ) -> Result<PullRequest, DomainError> {
        let (pull_request, _) = self.reassign(pr_id, old_reviewer_id).await?;
        Ok(pull_request)
    }

    /// Like [`Self::reassign_reviewer`], also returning the id of the user
    /// who took over.
    pub async fn reassign(
        &self,
        pr_id: &str,
        old_reviewer_id: &str,
    ) -> Result<(PullRequest, String), DomainError> {
        let mut tx = self.transactions.begin().await?;
        let mut pull_request = tx.pull_requests().get_by_id(pr_id).await?;

        if pull_request.is_merged() {
            return Err(DomainError::pull_request_merged(pr_id));
        }
        if !pull_request.has_reviewer(old_reviewer_id) {
            return Err(DomainError::not_assigned(format!(
                "user {} is not a reviewer of {}",
                old_reviewer_id, pr_id
            )));
        }

        let old_reviewer = tx.users().get_by_id(old_reviewer_id).await?;
        let teammates = tx
            .users()
            .list_active_by_team_name(old_reviewer.team_name())
            .await?;
        let pool = ReviewerPool::new(teammates)
            .excluding(old_reviewer.id())
            .excluding(pull_request.author_id())
            .excluding_all(pull_request.reviewers());

        let replacement = match pool.first() {
            Some(user) => user.id().to_string(),
            None => {
                return Err(DomainError::no_candidate(format!(
                    "no active replacement for {} in team {}",
                    old_reviewer_id,
                    old_reviewer.team_name()
                )))
            }
        };

        pull_request.replace_reviewer(old_reviewer_id, &replacement)?;
        tx.pull_requests().update(&pull_request).await?;
        tx.commit().await?;

        info!(
            "Reassigned pull request {}: {} -> {}",
            pr_id, old_reviewer_id, replacement
        );
        Ok((pull_request, replacement))
    }
}
