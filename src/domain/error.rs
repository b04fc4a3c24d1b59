use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Team already exists: {0}")]
    TeamExists(String),

    #[error("Pull request already exists: {0}")]
    PullRequestExists(String),

    #[error("Pull request is merged: {0}")]
    PullRequestMerged(String),

    #[error("Reviewer not assigned: {0}")]
    NotAssigned(String),

    #[error("No candidate available: {0}")]
    NoCandidate(String),

    #[error("User already belongs to another team: {0}")]
    UserInAnotherTeam(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn team_exists(name: impl Into<String>) -> Self {
        Self::TeamExists(name.into())
    }

    pub fn pull_request_exists(id: impl Into<String>) -> Self {
        Self::PullRequestExists(id.into())
    }

    pub fn pull_request_merged(id: impl Into<String>) -> Self {
        Self::PullRequestMerged(id.into())
    }

    pub fn not_assigned(msg: impl Into<String>) -> Self {
        Self::NotAssigned(msg.into())
    }

    pub fn no_candidate(msg: impl Into<String>) -> Self {
        Self::NoCandidate(msg.into())
    }

    pub fn user_in_another_team(msg: impl Into<String>) -> Self {
        Self::UserInAnotherTeam(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True for both team and pull request uniqueness conflicts.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::TeamExists(_) | Self::PullRequestExists(_))
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::StorageError(_))
    }
}
