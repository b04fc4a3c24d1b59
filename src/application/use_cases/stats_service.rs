use std::sync::Arc;

use tracing::debug;

use crate::application::TransactionManager;
use crate::domain::{DomainError, ReviewerStat};

pub struct StatsService {
    transactions: Arc<dyn TransactionManager>,
}

impl StatsService {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    /// Open review load per member of `team_name`, busiest first.
    /// Members without open assignments are left out.
    pub async fn reviewer_stats(&self, team_name: &str) -> Result<Vec<ReviewerStat>, DomainError> {
        let mut tx = self.transactions.begin().await?;
        let stats = tx.pull_requests().list_reviewer_stats(team_name).await?;
        tx.commit().await?;

        debug!("Computed reviewer stats for {} ({} rows)", team_name, stats.len());
        Ok(stats)
    }
}
