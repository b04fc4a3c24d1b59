use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: String,
    team_name: String,
    name: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        team_name: impl Into<String>,
        name: impl Into<String>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            team_name: team_name.into(),
            name: name.into(),
            is_active,
            created_at,
        }
    }

    /// Reconstitutes from persisted data (used by adapters).
    pub fn reconstitute(
        id: String,
        team_name: String,
        name: String,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            team_name,
            name,
            is_active,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn belongs_to(&self, team_name: &str) -> bool {
        self.team_name == team_name
    }

    /// Returns whether the flag actually changed.
    pub fn set_active(&mut self, is_active: bool) -> bool {
        if self.is_active == is_active {
            return false;
        }
        self.is_active = is_active;
        true
    }
}

/// A member proposed for a new team. Without `user_id` a fresh id is minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeamMember {
    pub user_id: Option<String>,
    pub username: String,
    pub is_active: bool,
}

impl NewTeamMember {
    pub fn new(user_id: Option<String>, username: impl Into<String>, is_active: bool) -> Self {
        Self {
            user_id,
            username: username.into(),
            is_active,
        }
    }

    pub fn into_user(self, team_name: &str, created_at: DateTime<Utc>) -> User {
        let id = self
            .user_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        User::new(id, team_name, self.username, self.is_active, created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_active_reports_change() {
        let mut user = User::new("u1", "backend", "alice", true, Utc::now());

        assert!(!user.set_active(true));
        assert!(user.set_active(false));
        assert!(!user.is_active());
    }

    #[test]
    fn member_without_id_gets_generated_one() {
        let now = Utc::now();
        let user = NewTeamMember::new(None, "bob", true).into_user("backend", now);

        assert!(Uuid::parse_str(user.id()).is_ok());
        assert_eq!(user.team_name(), "backend");
        assert_eq!(user.name(), "bob");

        let blank = NewTeamMember::new(Some("  ".to_string()), "carol", false)
            .into_user("backend", now);
        assert!(Uuid::parse_str(blank.id()).is_ok());
        assert!(!blank.is_active());
    }

    #[test]
    fn member_with_id_keeps_it() {
        let user = NewTeamMember::new(Some("u-42".to_string()), "dave", true)
            .into_user("frontend", Utc::now());

        assert_eq!(user.id(), "u-42");
        assert!(user.belongs_to("frontend"));
        assert!(!user.belongs_to("backend"));
    }
}
