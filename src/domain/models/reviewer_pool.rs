use super::User;

/// Active team members eligible to review a given pull request, in a fixed
/// order (name, then id) so that assignment does not depend on how a store
/// happens to enumerate rows.
#[derive(Debug, Clone)]
pub struct ReviewerPool {
    candidates: Vec<User>,
}

impl ReviewerPool {
    pub fn new(members: Vec<User>) -> Self {
        let mut candidates: Vec<User> = members.into_iter().filter(User::is_active).collect();
        candidates.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
        Self { candidates }
    }

    pub fn excluding(mut self, user_id: &str) -> Self {
        self.candidates.retain(|u| u.id() != user_id);
        self
    }

    pub fn excluding_all<'a>(mut self, user_ids: impl IntoIterator<Item = &'a String>) -> Self {
        for id in user_ids {
            self.candidates.retain(|u| u.id() != id.as_str());
        }
        self
    }

    pub fn first(&self) -> Option<&User> {
        self.candidates.first()
    }

    pub fn take(&self, n: usize) -> Vec<String> {
        self.candidates
            .iter()
            .take(n)
            .map(|u| u.id().to_string())
            .collect()
    }
}
