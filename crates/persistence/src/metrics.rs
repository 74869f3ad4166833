//! Database metrics collection.
//!
//! Provides functions for recording database-related metrics.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record database query duration.
///
/// Call this function after executing a query to record its duration.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Record database connection pool metrics.
///
/// Called from the store health check so every probe refreshes the gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// A helper to time database operations and record metrics.
///
/// Usage:
/// ```ignore
/// let timer = QueryTimer::new("find_suggestion_by_id");
/// let result = sqlx::query_as::<_, SuggestionEntity>(...).fetch_optional(conn).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    /// Create a new timer for the given query name.
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(&self.query_name, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_accepts_owned_and_borrowed_names() {
        let timer = QueryTimer::new("toggle_like");
        assert_eq!(timer.query_name, "toggle_like");

        let timer = QueryTimer::new(String::from("list_comments_with_author"));
        assert_eq!(timer.query_name, "list_comments_with_author");
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        QueryTimer::new("delete_group").record();
        record_query_duration("delete_group", 0.01);
    }
}
