use chrono::{DateTime, Utc};

/// Source of `register_date` / `created_date` timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
