mod pull_request;
mod reviewer_pool;
mod reviewer_stat;
mod team;
mod user;

pub use pull_request::*;
pub use reviewer_pool::*;
pub use reviewer_stat::*;
pub use team::*;
pub use user::*;
