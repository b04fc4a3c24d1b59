//! Wire shapes for the JSON API. The CLI reuses them for `--json` output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{NewTeamMember, PullRequest, PullRequestStatus, ReviewerStat, Team, User};

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<NewTeamMember>,
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    pub team_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SetIsActiveRequest {
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MergePullRequestRequest {
    pub pull_request_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    pub pull_request_id: String,
    pub old_user_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TeamMemberResponse {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TeamResponse {
    pub team_name: String,
    pub members: Vec<TeamMemberResponse>,
}

impl TeamResponse {
    pub fn new(team: &Team, members: &[User]) -> Self {
        Self {
            team_name: team.name().to_string(),
            members: members
                .iter()
                .map(|u| TeamMemberResponse {
                    user_id: u.id().to_string(),
                    username: u.name().to_string(),
                    is_active: u.is_active(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamEnvelope {
    pub team: TeamResponse,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id().to_string(),
            username: user.name().to_string(),
            team_name: user.team_name().to_string(),
            is_active: user.is_active(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PullRequestResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    pub assigned_reviewers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<&PullRequest> for PullRequestResponse {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.id().to_string(),
            pull_request_name: pr.title().to_string(),
            author_id: pr.author_id().to_string(),
            status: pr.status(),
            assigned_reviewers: pr.reviewers().to_vec(),
            created_at: pr.created_at(),
            merged_at: pr.merged_at(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PullRequestEnvelope {
    pub pr: PullRequestResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReassignResponse {
    pub pr: PullRequestResponse,
    pub replaced_by: String,
}

/// Summary row used when listing a reviewer's pull requests.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PullRequestShort {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
}

impl From<&PullRequest> for PullRequestShort {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.id().to_string(),
            pull_request_name: pr.title().to_string(),
            author_id: pr.author_id().to_string(),
            status: pr.status(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserReviewsResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShort>,
}

impl UserReviewsResponse {
    pub fn new(user_id: &str, pull_requests: &[PullRequest]) -> Self {
        Self {
            user_id: user_id.to_string(),
            pull_requests: pull_requests.iter().map(PullRequestShort::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewerStatsResponse {
    pub items: Vec<ReviewerStat>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}
