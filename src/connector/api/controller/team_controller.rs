use anyhow::Result;

use crate::cli::OutputFormat;
use crate::connector::http::dto::{TeamEnvelope, TeamResponse};
use crate::domain::{NewTeamMember, Team, User};

use super::super::Container;

pub struct TeamController<'a> {
    container: &'a Container,
}

impl<'a> TeamController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn add(
        &self,
        name: String,
        members: Vec<String>,
        inactive: bool,
        format: OutputFormat,
    ) -> Result<String> {
        let members = members
            .iter()
            .map(|member| parse_member(member, !inactive))
            .collect();
        let (team, users) = self
            .container
            .team_service()
            .create_team(&name, members)
            .await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&TeamEnvelope {
                team: TeamResponse::new(&team, &users),
            })?,
            OutputFormat::Text => format!("Created {}", self.format_team(&team, &users)),
        })
    }

    pub async fn get(&self, name: String, format: OutputFormat) -> Result<String> {
        let (team, users) = self.container.team_service().get_team(&name).await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&TeamResponse::new(&team, &users))?,
            OutputFormat::Text => self.format_team(&team, &users),
        })
    }

    fn format_team(&self, team: &Team, users: &[User]) -> String {
        let mut output = format!("team {} ({} members)\n", team.name(), users.len());
        for user in users {
            let state = if user.is_active() { "active" } else { "inactive" };
            output.push_str(&format!("  {} ({}) {}\n", user.name(), user.id(), state));
        }
        output
    }
}

/// `alice` or `alice:u-17`.
fn parse_member(member: &str, is_active: bool) -> NewTeamMember {
    match member.split_once(':') {
        Some((username, user_id)) => {
            NewTeamMember::new(Some(user_id.to_string()), username, is_active)
        }
        None => NewTeamMember::new(None, member, is_active),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member_with_and_without_id() {
        let member = parse_member("alice:u1", true);
        assert_eq!(member.username, "alice");
        assert_eq!(member.user_id.as_deref(), Some("u1"));

        let member = parse_member("bob", false);
        assert_eq!(member.username, "bob");
        assert_eq!(member.user_id, None);
        assert!(!member.is_active);
    }
}
