use serde::{Deserialize, Serialize};

/// Number of open pull requests a user is currently assigned to review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerStat {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub assigned_open_prs: u64,
}

impl ReviewerStat {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        team_name: impl Into<String>,
        assigned_open_prs: u64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            team_name: team_name.into(),
            assigned_open_prs,
        }
    }
}

/// Orders stats by load, busiest first, with username and id as tie-breaks.
pub fn sort_reviewer_stats(stats: &mut [ReviewerStat]) {
    stats.sort_by(|a, b| {
        b.assigned_open_prs
            .cmp(&a.assigned_open_prs)
            .then_with(|| a.username.cmp(&b.username))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_load_then_name() {
        let mut stats = vec![
            ReviewerStat::new("u3", "carol", "backend", 1),
            ReviewerStat::new("u1", "alice", "backend", 3),
            ReviewerStat::new("u2", "bob", "backend", 1),
        ];

        sort_reviewer_stats(&mut stats);

        let order: Vec<&str> = stats.iter().map(|s| s.user_id.as_str()).collect();
        assert_eq!(order, vec!["u1", "u2", "u3"]);
    }
}
