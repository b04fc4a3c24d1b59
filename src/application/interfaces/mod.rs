mod clock;
mod pull_request_repository;
mod team_repository;
mod transaction;
mod user_repository;

pub use clock::*;
pub use pull_request_repository::*;
pub use team_repository::*;
pub use transaction::*;
pub use user_repository::*;
