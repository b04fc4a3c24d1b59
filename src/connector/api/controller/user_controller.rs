use anyhow::Result;

use crate::cli::OutputFormat;
use crate::connector::http::dto::{UserEnvelope, UserResponse, UserReviewsResponse};
use crate::domain::PullRequest;

use super::super::Container;

pub struct UserController<'a> {
    container: &'a Container,
}

impl<'a> UserController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn set_active(
        &self,
        user_id: String,
        active: bool,
        format: OutputFormat,
    ) -> Result<String> {
        let user = self
            .container
            .user_service()
            .set_active(&user_id, active)
            .await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&UserEnvelope {
                user: UserResponse::from(&user),
            })?,
            OutputFormat::Text => format!(
                "{} ({}) in team {} is now {}",
                user.name(),
                user.id(),
                user.team_name(),
                if user.is_active() { "active" } else { "inactive" }
            ),
        })
    }

    pub async fn reviews(&self, user_id: String, format: OutputFormat) -> Result<String> {
        let pull_requests = self.container.user_service().get_reviews(&user_id).await?;

        Ok(match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&UserReviewsResponse::new(&user_id, &pull_requests))?
            }
            OutputFormat::Text => self.format_reviews(&user_id, &pull_requests),
        })
    }

    fn format_reviews(&self, user_id: &str, pull_requests: &[PullRequest]) -> String {
        if pull_requests.is_empty() {
            return format!("{} has no pull requests to review.", user_id);
        }

        let mut output = format!("Pull requests reviewed by {}:\n\n", user_id);
        for pr in pull_requests {
            output.push_str(&format!(
                "  {} [{}] {} (author {})\n",
                pr.id(),
                pr.status(),
                pr.title(),
                pr.author_id()
            ));
        }
        output
    }
}
