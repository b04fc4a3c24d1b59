use chrono::{DateTime, Utc};

/// Source of the current time. Business logic reads time only through this.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
