use anyhow::Result;

use crate::cli::{Commands, OutputFormat};

use super::container::Container;
use super::controller::{PullRequestController, StatsController, TeamController, UserController};

pub struct Router<'a> {
    team_controller: TeamController<'a>,
    user_controller: UserController<'a>,
    pull_request_controller: PullRequestController<'a>,
    stats_controller: StatsController<'a>,
    format: OutputFormat,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container, format: OutputFormat) -> Self {
        Self {
            team_controller: TeamController::new(container),
            user_controller: UserController::new(container),
            pull_request_controller: PullRequestController::new(container),
            stats_controller: StatsController::new(container),
            format,
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        let format = self.format;
        match command {
            Commands::AddTeam {
                name,
                members,
                inactive,
            } => self.team_controller.add(name, members, inactive, format).await,
            Commands::GetTeam { name } => self.team_controller.get(name, format).await,
            Commands::SetActive { user_id, active } => {
                self.user_controller.set_active(user_id, active, format).await
            }
            Commands::Reviews { user_id } => self.user_controller.reviews(user_id, format).await,
            Commands::CreatePr {
                id,
                title,
                author_id,
            } => {
                self.pull_request_controller
                    .create(id, title, author_id, format)
                    .await
            }
            Commands::Merge { id } => self.pull_request_controller.merge(id, format).await,
            Commands::Reassign {
                pr_id,
                old_reviewer_id,
            } => {
                self.pull_request_controller
                    .reassign(pr_id, old_reviewer_id, format)
                    .await
            }
            Commands::Stats { team_name } => self.stats_controller.stats(team_name, format).await,
            Commands::Serve { .. } => unreachable!("serve is handled separately in main"),
        }
    }
}
