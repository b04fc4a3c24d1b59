use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::{params, Connection};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::application::{
    PullRequestRepository, TeamRepository, Transaction, TransactionManager, UserRepository,
};
use crate::domain::{DomainError, PullRequest, PullRequestStatus, ReviewerStat, Team, User};

/// DuckDB-backed store.
///
/// DuckDB allows a single writer per file, so all work goes through one
/// shared connection. A transaction owns the connection lock from `BEGIN`
/// until `COMMIT`/`ROLLBACK`, which serializes transactions.
pub struct DuckdbStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbStore {
    pub fn new(db_path: &Path) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::storage(format!("Failed to open DuckDB database: {}", e)))?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, DomainError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            DomainError::storage(format!("Failed to open DuckDB in-memory DB: {}", e))
        })?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), DomainError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                name TEXT PRIMARY KEY,
                id TEXT NOT NULL,
                created_at BIGINT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                team_name TEXT NOT NULL,
                name TEXT NOT NULL,
                is_active BOOLEAN NOT NULL,
                created_at BIGINT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS pull_requests (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                author_id TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at BIGINT NOT NULL,
                merged_at BIGINT
            );

            -- No key: DuckDB rejects delete-then-reinsert of the same key
            -- inside one transaction, which reviewer updates rely on.
            CREATE TABLE IF NOT EXISTS pr_reviewers (
                pr_id TEXT NOT NULL,
                reviewer_id TEXT NOT NULL,
                position INTEGER NOT NULL
            );
            "#,
        )
        .map_err(|e| DomainError::storage(format!("Failed to initialize schema: {}", e)))?;

        debug!("DuckDB schema initialized");
        Ok(())
    }
}

#[async_trait]
impl TransactionManager for DuckdbStore {
    async fn begin(&self) -> Result<Box<dyn Transaction>, DomainError> {
        let conn = Arc::clone(&self.conn).lock_owned().await;
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;
        Ok(Box::new(DuckdbTransaction {
            conn,
            finished: false,
        }))
    }
}

struct DuckdbTransaction {
    conn: OwnedMutexGuard<Connection>,
    finished: bool,
}

impl Drop for DuckdbTransaction {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            warn!("Failed to roll back DuckDB transaction: {}", e);
        }
    }
}

#[async_trait]
impl Transaction for DuckdbTransaction {
    fn teams(&mut self) -> &mut dyn TeamRepository {
        self
    }

    fn users(&mut self) -> &mut dyn UserRepository {
        self
    }

    fn pull_requests(&mut self) -> &mut dyn PullRequestRepository {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let mut this = self;
        this.conn
            .execute_batch("COMMIT")
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;
        this.finished = true;
        Ok(())
    }
}

fn is_unique_violation(err: &duckdb::Error) -> bool {
    let msg = err.to_string();
    msg.contains("Duplicate key") || msg.contains("violates primary key")
}

fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

fn from_micros(micros: i64) -> Result<DateTime<Utc>, DomainError> {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or_else(|| DomainError::storage(format!("Invalid stored timestamp: {}", micros)))
}

struct UserRow {
    id: String,
    team_name: String,
    name: String,
    is_active: bool,
    created_at: i64,
}

impl UserRow {
    fn from_row(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            team_name: row.get(1)?,
            name: row.get(2)?,
            is_active: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_user(self) -> Result<User, DomainError> {
        Ok(User::reconstitute(
            self.id,
            self.team_name,
            self.name,
            self.is_active,
            from_micros(self.created_at)?,
        ))
    }
}

struct PullRequestRow {
    id: String,
    title: String,
    author_id: String,
    status: String,
    created_at: i64,
    merged_at: Option<i64>,
}

impl PullRequestRow {
    fn from_row(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            author_id: row.get(2)?,
            status: row.get(3)?,
            created_at: row.get(4)?,
            merged_at: row.get(5)?,
        })
    }
}

impl DuckdbTransaction {
    fn list_users(&self, sql: &str, team_name: &str) -> Result<Vec<User>, DomainError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map(params![team_name], UserRow::from_row)
            .map_err(|e| DomainError::storage(format!("Failed to query users: {}", e)))?;

        let mut users = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?;
            users.push(row.into_user()?);
        }
        Ok(users)
    }

    fn load_reviewers(&self, pr_id: &str) -> Result<Vec<String>, DomainError> {
        let mut stmt = self
            .conn
            .prepare("SELECT reviewer_id FROM pr_reviewers WHERE pr_id = ?1 ORDER BY position")
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map(params![pr_id], |row| row.get::<_, String>(0))
            .map_err(|e| DomainError::storage(format!("Failed to query reviewers: {}", e)))?;

        let mut reviewers = Vec::new();
        for row in rows {
            reviewers
                .push(row.map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?);
        }
        Ok(reviewers)
    }

    fn insert_reviewers(&self, pull_request: &PullRequest) -> Result<(), DomainError> {
        for (position, reviewer_id) in pull_request.reviewers().iter().enumerate() {
            self.conn
                .execute(
                    "INSERT INTO pr_reviewers (pr_id, reviewer_id, position) VALUES (?1, ?2, ?3)",
                    params![pull_request.id(), reviewer_id, position as i32],
                )
                .map_err(|e| DomainError::storage(format!("Failed to insert reviewer: {}", e)))?;
        }
        Ok(())
    }

    fn hydrate(&self, row: PullRequestRow) -> Result<PullRequest, DomainError> {
        let reviewers = self.load_reviewers(&row.id)?;
        let merged_at = row.merged_at.map(from_micros).transpose()?;
        let status: PullRequestStatus = row
            .status
            .parse()
            .map_err(|e: DomainError| DomainError::storage(e.to_string()))?;

        Ok(PullRequest::reconstitute(
            row.id,
            row.title,
            row.author_id,
            status,
            from_micros(row.created_at)?,
            merged_at,
            reviewers,
        ))
    }
}

#[async_trait]
impl TeamRepository for DuckdbTransaction {
    async fn create(&mut self, team: &Team) -> Result<(), DomainError> {
        self.conn
            .execute(
                "INSERT INTO teams (name, id, created_at) VALUES (?1, ?2, ?3)",
                params![team.name(), team.id(), to_micros(team.created_at())],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::team_exists(team.name())
                } else {
                    DomainError::storage(format!("Failed to insert team: {}", e))
                }
            })?;
        Ok(())
    }

    async fn get_by_name(&mut self, name: &str) -> Result<Team, DomainError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM teams WHERE name = ?1")
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        let row = stmt.query_row(params![name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        });

        match row {
            Ok((id, name, created_at)) => {
                Ok(Team::reconstitute(id, name, from_micros(created_at)?))
            }
            Err(duckdb::Error::QueryReturnedNoRows) => {
                Err(DomainError::not_found(format!("team {}", name)))
            }
            Err(e) => Err(DomainError::storage(format!("Failed to query team: {}", e))),
        }
    }
}

#[async_trait]
impl UserRepository for DuckdbTransaction {
    async fn get_by_id(&mut self, id: &str) -> Result<User, DomainError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, team_name, name, is_active, created_at FROM users WHERE id = ?1")
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        match stmt.query_row(params![id], UserRow::from_row) {
            Ok(row) => row.into_user(),
            Err(duckdb::Error::QueryReturnedNoRows) => {
                Err(DomainError::not_found(format!("user {}", id)))
            }
            Err(e) => Err(DomainError::storage(format!("Failed to query user: {}", e))),
        }
    }

    async fn list_by_team_name(&mut self, team_name: &str) -> Result<Vec<User>, DomainError> {
        self.list_users(
            "SELECT id, team_name, name, is_active, created_at FROM users \
             WHERE team_name = ?1 ORDER BY name, id",
            team_name,
        )
    }

    async fn list_active_by_team_name(
        &mut self,
        team_name: &str,
    ) -> Result<Vec<User>, DomainError> {
        self.list_users(
            "SELECT id, team_name, name, is_active, created_at FROM users \
             WHERE team_name = ?1 AND is_active = TRUE ORDER BY name, id",
            team_name,
        )
    }

    async fn upsert_many(&mut self, users: &[User]) -> Result<(), DomainError> {
        for user in users {
            self.conn
                .execute(
                    r#"
                    INSERT INTO users (id, team_name, name, is_active, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT (id) DO UPDATE SET
                        team_name = excluded.team_name,
                        name = excluded.name,
                        is_active = excluded.is_active
                    "#,
                    params![
                        user.id(),
                        user.team_name(),
                        user.name(),
                        user.is_active(),
                        to_micros(user.created_at()),
                    ],
                )
                .map_err(|e| DomainError::storage(format!("Failed to upsert user: {}", e)))?;
        }
        debug!("Upserted {} users", users.len());
        Ok(())
    }

    async fn set_active(&mut self, id: &str, is_active: bool) -> Result<(), DomainError> {
        let updated = self
            .conn
            .execute(
                "UPDATE users SET is_active = ?1 WHERE id = ?2",
                params![is_active, id],
            )
            .map_err(|e| DomainError::storage(format!("Failed to update user: {}", e)))?;

        if updated == 0 {
            return Err(DomainError::not_found(format!("user {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl PullRequestRepository for DuckdbTransaction {
    async fn exists(&mut self, id: &str) -> Result<bool, DomainError> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM pull_requests WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::storage(format!("Failed to query pull request: {}", e)))?;
        Ok(count > 0)
    }

    async fn create(&mut self, pull_request: &PullRequest) -> Result<(), DomainError> {
        self.conn
            .execute(
                r#"
                INSERT INTO pull_requests (id, title, author_id, status, created_at, merged_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    pull_request.id(),
                    pull_request.title(),
                    pull_request.author_id(),
                    pull_request.status().as_str(),
                    to_micros(pull_request.created_at()),
                    pull_request.merged_at().map(to_micros),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::pull_request_exists(pull_request.id())
                } else {
                    DomainError::storage(format!("Failed to insert pull request: {}", e))
                }
            })?;

        self.insert_reviewers(pull_request)
    }

    async fn get_by_id(&mut self, id: &str) -> Result<PullRequest, DomainError> {
        let row = {
            let mut stmt = self
                .conn
                .prepare(
                    "SELECT id, title, author_id, status, created_at, merged_at \
                     FROM pull_requests WHERE id = ?1",
                )
                .map_err(|e| {
                    DomainError::storage(format!("Failed to prepare statement: {}", e))
                })?;

            match stmt.query_row(params![id], PullRequestRow::from_row) {
                Ok(row) => row,
                Err(duckdb::Error::QueryReturnedNoRows) => {
                    return Err(DomainError::not_found(format!("pull request {}", id)))
                }
                Err(e) => {
                    return Err(DomainError::storage(format!(
                        "Failed to query pull request: {}",
                        e
                    )))
                }
            }
        };

        self.hydrate(row)
    }

    async fn update(&mut self, pull_request: &PullRequest) -> Result<(), DomainError> {
        let updated = self
            .conn
            .execute(
                r#"
                UPDATE pull_requests
                SET title = ?1, author_id = ?2, status = ?3, merged_at = ?4
                WHERE id = ?5
                "#,
                params![
                    pull_request.title(),
                    pull_request.author_id(),
                    pull_request.status().as_str(),
                    pull_request.merged_at().map(to_micros),
                    pull_request.id(),
                ],
            )
            .map_err(|e| DomainError::storage(format!("Failed to update pull request: {}", e)))?;

        if updated == 0 {
            return Err(DomainError::not_found(format!(
                "pull request {}",
                pull_request.id()
            )));
        }

        self.conn
            .execute(
                "DELETE FROM pr_reviewers WHERE pr_id = ?1",
                params![pull_request.id()],
            )
            .map_err(|e| DomainError::storage(format!("Failed to clear reviewers: {}", e)))?;

        self.insert_reviewers(pull_request)
    }

    async fn list_by_reviewer_id(
        &mut self,
        reviewer_id: &str,
    ) -> Result<Vec<PullRequest>, DomainError> {
        let rows = {
            let mut stmt = self
                .conn
                .prepare(
                    r#"
                    SELECT p.id, p.title, p.author_id, p.status, p.created_at, p.merged_at
                    FROM pull_requests p
                    JOIN pr_reviewers r ON r.pr_id = p.id
                    WHERE r.reviewer_id = ?1
                    ORDER BY p.created_at DESC, p.id
                    "#,
                )
                .map_err(|e| {
                    DomainError::storage(format!("Failed to prepare statement: {}", e))
                })?;

            let mapped = stmt
                .query_map(params![reviewer_id], PullRequestRow::from_row)
                .map_err(|e| {
                    DomainError::storage(format!("Failed to query pull requests: {}", e))
                })?;

            let mut rows = Vec::new();
            for row in mapped {
                rows.push(
                    row.map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?,
                );
            }
            rows
        };

        rows.into_iter().map(|row| self.hydrate(row)).collect()
    }

    async fn list_reviewer_stats(
        &mut self,
        team_name: &str,
    ) -> Result<Vec<ReviewerStat>, DomainError> {
        let mut stmt = self
            .conn
            .prepare(
                r#"
                SELECT u.id, u.name, u.team_name, COUNT(*) AS assigned_open_prs
                FROM pr_reviewers r
                JOIN pull_requests p ON p.id = r.pr_id
                JOIN users u ON u.id = r.reviewer_id
                WHERE p.status = 'OPEN' AND u.team_name = ?1
                GROUP BY u.id, u.name, u.team_name
                ORDER BY assigned_open_prs DESC, u.name, u.id
                "#,
            )
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map(params![team_name], |row| {
                Ok(ReviewerStat::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)? as u64,
                ))
            })
            .map_err(|e| DomainError::storage(format!("Failed to query reviewer stats: {}", e)))?;

        let mut stats = Vec::new();
        for row in rows {
            stats.push(row.map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?);
        }
        Ok(stats)
    }
}
