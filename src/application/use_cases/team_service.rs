use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{Clock, TransactionManager};
use crate::domain::{DomainError, NewTeamMember, Team, User};

/// Team creation and membership consistency.
pub struct TeamService {
    transactions: Arc<dyn TransactionManager>,
    clock: Arc<dyn Clock>,
}

impl TeamService {
    pub fn new(transactions: Arc<dyn TransactionManager>, clock: Arc<dyn Clock>) -> Self {
        Self {
            transactions,
            clock,
        }
    }

    /// Creates `name` with `members`, all or nothing.
    ///
    /// Fails with `TeamExists` if the name is taken and with
    /// `UserInAnotherTeam` if any member is already recorded under a
    /// different team; in both cases nothing is written. A member id listed
    /// twice is `InvalidInput`.
    pub async fn create_team(
        &self,
        name: &str,
        members: Vec<NewTeamMember>,
    ) -> Result<(Team, Vec<User>), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::invalid_input("team name is required"));
        }

        let now = self.clock.now();
        let team = Team::new(name, now);
        let users: Vec<User> = members
            .into_iter()
            .map(|m| m.into_user(name, now))
            .collect();

        let mut seen = HashSet::new();
        if let Some(dup) = users.iter().find(|u| !seen.insert(u.id())) {
            return Err(DomainError::invalid_input(format!(
                "user {} is listed more than once",
                dup.id()
            )));
        }

        let mut tx = self.transactions.begin().await?;

        match tx.teams().get_by_name(name).await {
            Ok(_) => return Err(DomainError::team_exists(name)),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        for user in &users {
            match tx.users().get_by_id(user.id()).await {
                Ok(existing) if !existing.belongs_to(name) => {
                    return Err(DomainError::user_in_another_team(format!(
                        "user {} belongs to team {}",
                        existing.id(),
                        existing.team_name()
                    )));
                }
                Ok(_) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        tx.teams().create(&team).await?;
        if !users.is_empty() {
            tx.users().upsert_many(&users).await?;
        }
        tx.commit().await?;

        info!("Created team {} with {} members", team.name(), users.len());
        Ok((team, users))
    }

    /// Returns the team and its members ordered by name.
    pub async fn get_team(&self, name: &str) -> Result<(Team, Vec<User>), DomainError> {
        let mut tx = self.transactions.begin().await?;
        let team = tx.teams().get_by_name(name).await?;
        let members = tx.users().list_by_team_name(team.name()).await?;
        tx.commit().await?;

        debug!("Loaded team {} ({} members)", team.name(), members.len());
        Ok((team, members))
    }
}
