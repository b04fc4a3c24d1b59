pub mod pull_request_controller;
pub mod stats_controller;
pub mod team_controller;
pub mod user_controller;

pub use pull_request_controller::PullRequestController;
pub use stats_controller::StatsController;
pub use team_controller::TeamController;
pub use user_controller::UserController;
