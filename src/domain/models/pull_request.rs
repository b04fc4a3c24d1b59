use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Upper bound on reviewers assigned to a single pull request.
pub const MAX_REVIEWERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestStatus {
    Open,
    Merged,
}

impl PullRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PullRequestStatus::Open => "OPEN",
            PullRequestStatus::Merged => "MERGED",
        }
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PullRequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(PullRequestStatus::Open),
            "MERGED" => Ok(PullRequestStatus::Merged),
            other => Err(DomainError::invalid_input(format!(
                "Unknown pull request status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    id: String,
    title: String,
    author_id: String,
    status: PullRequestStatus,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
    /// Ordered; position is kept stable across reassignment.
    reviewers: Vec<String>,
}

impl PullRequest {
    /// Opens a new pull request, rejecting reviewer lists that break the
    /// cap, contain duplicates or name the author.
    pub fn open(
        id: impl Into<String>,
        title: impl Into<String>,
        author_id: impl Into<String>,
        reviewers: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        let title = title.into();
        let author_id = author_id.into();

        if id.trim().is_empty() {
            return Err(DomainError::invalid_input("pull request id is required"));
        }
        if title.trim().is_empty() {
            return Err(DomainError::invalid_input("pull request title is required"));
        }
        if reviewers.len() > MAX_REVIEWERS {
            return Err(DomainError::invalid_input(format!(
                "at most {} reviewers allowed, got {}",
                MAX_REVIEWERS,
                reviewers.len()
            )));
        }
        if reviewers.iter().any(|r| *r == author_id) {
            return Err(DomainError::invalid_input(
                "author cannot review their own pull request",
            ));
        }
        for (i, reviewer) in reviewers.iter().enumerate() {
            if reviewers[..i].contains(reviewer) {
                return Err(DomainError::invalid_input(format!(
                    "reviewer {} listed twice",
                    reviewer
                )));
            }
        }

        Ok(Self {
            id,
            title,
            author_id,
            status: PullRequestStatus::Open,
            created_at,
            merged_at: None,
            reviewers,
        })
    }

    /// Reconstitutes from persisted data (used by adapters).
    pub fn reconstitute(
        id: String,
        title: String,
        author_id: String,
        status: PullRequestStatus,
        created_at: DateTime<Utc>,
        merged_at: Option<DateTime<Utc>>,
        reviewers: Vec<String>,
    ) -> Self {
        Self {
            id,
            title,
            author_id,
            status,
            created_at,
            merged_at,
            reviewers,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    pub fn status(&self) -> PullRequestStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn merged_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }

    pub fn reviewers(&self) -> &[String] {
        &self.reviewers
    }

    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }

    pub fn can_change_reviewers(&self) -> bool {
        self.status == PullRequestStatus::Open
    }

    pub fn has_reviewer(&self, user_id: &str) -> bool {
        self.reviewers.iter().any(|r| r == user_id)
    }

    pub fn reviewer_position(&self, user_id: &str) -> Option<usize> {
        self.reviewers.iter().position(|r| r == user_id)
    }

    /// Marks the pull request merged. A merged pull request keeps its
    /// original timestamp; returns whether anything changed.
    pub fn merge(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_merged() {
            return false;
        }
        self.status = PullRequestStatus::Merged;
        self.merged_at = Some(at);
        true
    }

    /// Swaps `old_reviewer` for `new_reviewer` in place.
    pub fn replace_reviewer(
        &mut self,
        old_reviewer: &str,
        new_reviewer: &str,
    ) -> Result<(), DomainError> {
        if !self.can_change_reviewers() {
            return Err(DomainError::pull_request_merged(self.id.clone()));
        }
        let position = self.reviewer_position(old_reviewer).ok_or_else(|| {
            DomainError::not_assigned(format!(
                "user {} is not a reviewer of {}",
                old_reviewer, self.id
            ))
        })?;
        if new_reviewer == self.author_id {
            return Err(DomainError::invalid_input(
                "author cannot review their own pull request",
            ));
        }
        if self.has_reviewer(new_reviewer) {
            return Err(DomainError::invalid_input(format!(
                "user {} already reviews {}",
                new_reviewer, self.id
            )));
        }

        self.reviewers[position] = new_reviewer.to_string();
        Ok(())
    }
}
