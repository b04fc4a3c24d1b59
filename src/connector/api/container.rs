use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::{
    Clock, PullRequestService, StatsService, TeamService, TransactionManager, UserService,
};
use crate::connector::{DuckdbStore, InMemoryStore, SystemClock};

pub struct ContainerConfig {
    pub data_dir: String,
    /// Keep all state in process memory; nothing is written under `data_dir`.
    pub memory_storage: bool,
}

/// Wires the store and clock into the services.
pub struct Container {
    transactions: Arc<dyn TransactionManager>,
    clock: Arc<dyn Clock>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let transactions: Arc<dyn TransactionManager> = if config.memory_storage {
            debug!("Using in-memory storage");
            Arc::new(InMemoryStore::new())
        } else {
            std::fs::create_dir_all(&config.data_dir)
                .with_context(|| format!("Failed to create data dir {}", config.data_dir))?;
            let db_path = PathBuf::from(&config.data_dir).join("pr-reviewer.duckdb");
            debug!("Using DuckDB storage at {:?}", db_path);
            Arc::new(DuckdbStore::new(&db_path)?)
        };

        Ok(Self::with_parts(transactions, Arc::new(SystemClock::new()), config))
    }

    /// Builds a container over an existing store and clock.
    pub fn with_parts(
        transactions: Arc<dyn TransactionManager>,
        clock: Arc<dyn Clock>,
        config: ContainerConfig,
    ) -> Self {
        Self {
            transactions,
            clock,
            config,
        }
    }

    pub fn team_service(&self) -> TeamService {
        TeamService::new(self.transactions.clone(), self.clock.clone())
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(self.transactions.clone())
    }

    pub fn pull_request_service(&self) -> PullRequestService {
        PullRequestService::new(self.transactions.clone(), self.clock.clone())
    }

    pub fn stats_service(&self) -> StatsService {
        StatsService::new(self.transactions.clone())
    }

    pub fn data_dir(&self) -> &str {
        &self.config.data_dir
    }

    pub fn memory_storage(&self) -> bool {
        self.config.memory_storage
    }
}
