use anyhow::Result;

use crate::cli::OutputFormat;
use crate::connector::http::dto::{PullRequestEnvelope, PullRequestResponse, ReassignResponse};
use crate::domain::PullRequest;

use super::super::Container;

pub struct PullRequestController<'a> {
    container: &'a Container,
}

impl<'a> PullRequestController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn create(
        &self,
        id: String,
        title: String,
        author_id: String,
        format: OutputFormat,
    ) -> Result<String> {
        let pr = self
            .container
            .pull_request_service()
            .create(&id, &title, &author_id)
            .await?;
        self.render(&pr, format)
    }

    pub async fn merge(&self, id: String, format: OutputFormat) -> Result<String> {
        let pr = self.container.pull_request_service().merge(&id).await?;
        self.render(&pr, format)
    }

    pub async fn reassign(
        &self,
        pr_id: String,
        old_reviewer_id: String,
        format: OutputFormat,
    ) -> Result<String> {
        let (pr, replaced_by) = self
            .container
            .pull_request_service()
            .reassign(&pr_id, &old_reviewer_id)
            .await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&ReassignResponse {
                pr: PullRequestResponse::from(&pr),
                replaced_by,
            })?,
            OutputFormat::Text => format!(
                "{} replaced by {}\n{}",
                old_reviewer_id,
                replaced_by,
                self.format_pull_request(&pr)
            ),
        })
    }

    fn render(&self, pr: &PullRequest, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&PullRequestEnvelope {
                pr: PullRequestResponse::from(pr),
            })?,
            OutputFormat::Text => self.format_pull_request(pr),
        })
    }

    fn format_pull_request(&self, pr: &PullRequest) -> String {
        let reviewers = if pr.reviewers().is_empty() {
            "(none)".to_string()
        } else {
            pr.reviewers().join(", ")
        };
        let mut output = format!(
            "{} [{}] {}\n  Author:    {}\n  Reviewers: {}\n  Created:   {}\n",
            pr.id(),
            pr.status(),
            pr.title(),
            pr.author_id(),
            reviewers,
            pr.created_at().to_rfc3339()
        );
        if let Some(merged_at) = pr.merged_at() {
            output.push_str(&format!("  Merged:    {}\n", merged_at.to_rfc3339()));
        }
        output
    }
}
