mod pull_request_service;
mod stats_service;
mod team_service;
mod user_service;

pub use pull_request_service::*;
pub use stats_service::*;
pub use team_service::*;
pub use user_service::*;
