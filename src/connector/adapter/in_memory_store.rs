use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::application::{
    PullRequestRepository, TeamRepository, Transaction, TransactionManager, UserRepository,
};
use crate::domain::{
    sort_reviewer_stats, DomainError, PullRequest, ReviewerStat, Team, User,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    teams: HashMap<String, Team>,
    users: HashMap<String, User>,
    pull_requests: HashMap<String, PullRequest>,
}

/// Map-backed store. Transactions are serialized on a single lock and work
/// on a private copy of the state that replaces the shared one on commit.
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionManager for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn Transaction>, DomainError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryTransaction { guard, working }))
    }
}

struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    fn teams(&mut self) -> &mut dyn TeamRepository {
        self
    }

    fn users(&mut self) -> &mut dyn UserRepository {
        self
    }

    fn pull_requests(&mut self) -> &mut dyn PullRequestRepository {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let InMemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl TeamRepository for InMemoryTransaction {
    async fn create(&mut self, team: &Team) -> Result<(), DomainError> {
        if self.working.teams.contains_key(team.name()) {
            return Err(DomainError::team_exists(team.name()));
        }
        self.working
            .teams
            .insert(team.name().to_string(), team.clone());
        Ok(())
    }

    async fn get_by_name(&mut self, name: &str) -> Result<Team, DomainError> {
        self.working
            .teams
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("team {}", name)))
    }
}

impl InMemoryTransaction {
    fn team_members(&self, team_name: &str, active_only: bool) -> Vec<User> {
        let mut members: Vec<User> = self
            .working
            .users
            .values()
            .filter(|u| u.belongs_to(team_name) && (!active_only || u.is_active()))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
        members
    }
}

#[async_trait]
impl UserRepository for InMemoryTransaction {
    async fn get_by_id(&mut self, id: &str) -> Result<User, DomainError> {
        self.working
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("user {}", id)))
    }

    async fn list_by_team_name(&mut self, team_name: &str) -> Result<Vec<User>, DomainError> {
        Ok(self.team_members(team_name, false))
    }

    async fn list_active_by_team_name(
        &mut self,
        team_name: &str,
    ) -> Result<Vec<User>, DomainError> {
        Ok(self.team_members(team_name, true))
    }

    async fn upsert_many(&mut self, users: &[User]) -> Result<(), DomainError> {
        for user in users {
            let stored = match self.working.users.get(user.id()) {
                Some(existing) => User::reconstitute(
                    user.id().to_string(),
                    user.team_name().to_string(),
                    user.name().to_string(),
                    user.is_active(),
                    existing.created_at(),
                ),
                None => user.clone(),
            };
            self.working.users.insert(user.id().to_string(), stored);
        }
        debug!("Upserted {} users in memory", users.len());
        Ok(())
    }

    async fn set_active(&mut self, id: &str, is_active: bool) -> Result<(), DomainError> {
        let user = self
            .working
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("user {}", id)))?;
        user.set_active(is_active);
        Ok(())
    }
}

#[async_trait]
impl PullRequestRepository for InMemoryTransaction {
    async fn exists(&mut self, id: &str) -> Result<bool, DomainError> {
        Ok(self.working.pull_requests.contains_key(id))
    }

    async fn create(&mut self, pull_request: &PullRequest) -> Result<(), DomainError> {
        if self.working.pull_requests.contains_key(pull_request.id()) {
            return Err(DomainError::pull_request_exists(pull_request.id()));
        }
        self.working
            .pull_requests
            .insert(pull_request.id().to_string(), pull_request.clone());
        Ok(())
    }

    async fn get_by_id(&mut self, id: &str) -> Result<PullRequest, DomainError> {
        self.working
            .pull_requests
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("pull request {}", id)))
    }

    async fn update(&mut self, pull_request: &PullRequest) -> Result<(), DomainError> {
        match self.working.pull_requests.get_mut(pull_request.id()) {
            Some(stored) => {
                *stored = pull_request.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "pull request {}",
                pull_request.id()
            ))),
        }
    }

    async fn list_by_reviewer_id(
        &mut self,
        reviewer_id: &str,
    ) -> Result<Vec<PullRequest>, DomainError> {
        let mut prs: Vec<PullRequest> = self
            .working
            .pull_requests
            .values()
            .filter(|pr| pr.has_reviewer(reviewer_id))
            .cloned()
            .collect();
        prs.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(prs)
    }

    async fn list_reviewer_stats(
        &mut self,
        team_name: &str,
    ) -> Result<Vec<ReviewerStat>, DomainError> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for pr in self.working.pull_requests.values() {
            if pr.is_merged() {
                continue;
            }
            for reviewer in pr.reviewers() {
                *counts.entry(reviewer.as_str()).or_insert(0) += 1;
            }
        }

        let mut stats: Vec<ReviewerStat> = counts
            .into_iter()
            .filter_map(|(user_id, count)| {
                self.working
                    .users
                    .get(user_id)
                    .filter(|u| u.belongs_to(team_name))
                    .map(|u| ReviewerStat::new(u.id(), u.name(), u.team_name(), count))
            })
            .collect();
        sort_reviewer_stats(&mut stats);
        Ok(stats)
    }
}
