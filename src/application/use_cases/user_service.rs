use std::sync::Arc;

use tracing::{debug, info};

use crate::application::TransactionManager;
use crate::domain::{DomainError, PullRequest, User};

pub struct UserService {
    transactions: Arc<dyn TransactionManager>,
}

impl UserService {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    /// Sets the active flag. Asking for the current state writes nothing
    /// and returns the user as stored, so retries are harmless.
    pub async fn set_active(&self, user_id: &str, is_active: bool) -> Result<User, DomainError> {
        let mut tx = self.transactions.begin().await?;
        let mut user = tx.users().get_by_id(user_id).await?;

        if !user.set_active(is_active) {
            debug!("User {} already has is_active={}", user_id, is_active);
            return Ok(user);
        }

        tx.users().set_active(user_id, is_active).await?;
        tx.commit().await?;

        info!("User {} is_active set to {}", user_id, is_active);
        Ok(user)
    }

    /// Every pull request the user reviews, any status, newest first.
    pub async fn get_reviews(&self, user_id: &str) -> Result<Vec<PullRequest>, DomainError> {
        let mut tx = self.transactions.begin().await?;
        tx.users().get_by_id(user_id).await?;
        let pull_requests = tx.pull_requests().list_by_reviewer_id(user_id).await?;
        tx.commit().await?;

        Ok(pull_requests)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::application::{PullRequestService, TeamService, Transaction};
    use crate::connector::{FixedClock, InMemoryStore};
    use crate::domain::NewTeamMember;

    struct UnavailableStore;

    #[async_trait]
    impl TransactionManager for UnavailableStore {
        async fn begin(&self) -> Result<Box<dyn Transaction>, DomainError> {
            Err(DomainError::storage("connection refused"))
        }
    }

    async fn seeded_store() -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        let teams = TeamService::new(store.clone(), Arc::new(FixedClock::new(Utc::now())));
        teams
            .create_team(
                "backend",
                vec![
                    NewTeamMember::new(Some("author".into()), "author", true),
                    NewTeamMember::new(Some("r1".into()), "alice", true),
                    NewTeamMember::new(Some("r2".into()), "bob", false),
                ],
            )
            .await
            .expect("seed team");
        store
    }

    #[tokio::test]
    async fn test_set_active_changes_state() {
        let store = seeded_store().await;
        let service = UserService::new(store.clone());

        let user = service.set_active("r2", true).await.expect("activate");
        assert!(user.is_active());

        let mut tx = store.begin().await.expect("begin");
        assert!(tx.users().get_by_id("r2").await.expect("get").is_active());
    }

    #[tokio::test]
    async fn test_set_active_same_state_is_noop() {
        let store = seeded_store().await;
        let service = UserService::new(store);

        let first = service.set_active("r1", true).await.expect("first");
        let second = service.set_active("r1", true).await.expect("second");

        assert_eq!(first, second);
        assert!(second.is_active());
    }

    #[tokio::test]
    async fn test_set_active_unknown_user() {
        let service = UserService::new(seeded_store().await);

        let err = service.set_active("ghost", false).await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let service = UserService::new(Arc::new(UnavailableStore));

        let err = service.set_active("r1", false).await.unwrap_err();
        assert!(err.is_storage_error());

        let err = service.get_reviews("r1").await.unwrap_err();
        assert!(err.is_storage_error());
    }

    #[tokio::test]
    async fn test_get_reviews_newest_first() {
        let store = seeded_store().await;
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let prs = PullRequestService::new(store.clone(), clock.clone());

        prs.create("pr-1", "first", "author").await.expect("pr-1");
        clock.advance(Duration::seconds(1));
        prs.create("pr-2", "second", "author").await.expect("pr-2");
        prs.merge("pr-1").await.expect("merge");

        let service = UserService::new(store);
        let reviews = service.get_reviews("r1").await.expect("reviews");

        let ids: Vec<&str> = reviews.iter().map(PullRequest::id).collect();
        assert_eq!(ids, vec!["pr-2", "pr-1"]);
    }

    #[tokio::test]
    async fn test_get_reviews_unknown_user() {
        let service = UserService::new(seeded_store().await);

        let err = service.get_reviews("ghost").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_reviews_without_assignments_is_empty() {
        let service = UserService::new(seeded_store().await);

        let reviews = service.get_reviews("author").await.expect("reviews");

        assert!(reviews.is_empty());
    }
}
