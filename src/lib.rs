pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    Clock, PullRequestRepository, PullRequestService, StatsService, TeamRepository, TeamService,
    Transaction, TransactionManager, UserRepository, UserService,
};

pub use cli::{Commands, OutputFormat};

pub use connector::{DuckdbStore, FixedClock, InMemoryStore, SystemClock};

pub use domain::{
    DomainError, NewTeamMember, PullRequest, PullRequestStatus, ReviewerPool, ReviewerStat, Team,
    User, MAX_REVIEWERS,
};
