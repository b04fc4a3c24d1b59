use anyhow::Result;

use crate::cli::OutputFormat;
use crate::connector::http::dto::ReviewerStatsResponse;
use crate::domain::ReviewerStat;

use super::super::Container;

pub struct StatsController<'a> {
    container: &'a Container,
}

impl<'a> StatsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn stats(&self, team_name: String, format: OutputFormat) -> Result<String> {
        let items = self
            .container
            .stats_service()
            .reviewer_stats(&team_name)
            .await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&ReviewerStatsResponse { items })?,
            OutputFormat::Text => self.format_stats(&team_name, &items),
        })
    }

    fn format_stats(&self, team_name: &str, items: &[ReviewerStat]) -> String {
        if items.is_empty() {
            return format!("No open reviews in team {}.", team_name);
        }

        let mut output = format!(
            "Reviewer load for {}\n=====================\n",
            team_name
        );
        for item in items {
            output.push_str(&format!(
                "{:>4}  {} ({})\n",
                item.assigned_open_prs, item.username, item.user_id
            ));
        }
        output
    }
}
