//! Metrics Fetcher Example
//!
//! Demonstrates a loaner lending database connections to a parameterized
//! metrics query.
//!
//! Shows:
//! - A hand-written `Provider` for an in-memory database
//! - Building a reusable fetcher with `parameterize`
//! - How acquisition, query and close failures surface as `ScopeError`
//!
//! Run with: cargo run --example metrics_fetcher

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use loaner::prelude::*;

// ==================== The database ====================

#[derive(Debug, Clone, PartialEq)]
enum DbError {
    ConnectionRefused(String),
    UnknownMetric(String),
    Syntax(String),
    CloseFailed(u32),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::ConnectionRefused(host) => write!(f, "connection to {} refused", host),
            DbError::UnknownMetric(name) => write!(f, "unknown metric {}", name),
            DbError::Syntax(sql) => write!(f, "cannot parse {:?}", sql),
            DbError::CloseFailed(id) => write!(f, "connection {} did not close cleanly", id),
        }
    }
}

impl std::error::Error for DbError {}

#[derive(Debug, Clone)]
struct DbConfig {
    host: String,
    flaky_close: bool,
}

impl DbConfig {
    fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            flaky_close: false,
        }
    }
}

#[derive(Debug)]
struct Connection {
    id: u32,
    flaky_close: bool,
    metrics: Arc<HashMap<&'static str, f64>>,
}

impl Connection {
    /// Supports exactly `SELECT a, b FROM metrics;`.
    async fn query(&mut self, sql: &str) -> Result<Vec<(String, f64)>, DbError> {
        tokio::task::yield_now().await;

        let fields = sql
            .strip_prefix("SELECT ")
            .and_then(|rest| rest.strip_suffix(" FROM metrics;"))
            .ok_or_else(|| DbError::Syntax(sql.to_string()))?;

        fields
            .split(", ")
            .map(|name| {
                self.metrics
                    .get(name)
                    .map(|value| (name.to_string(), *value))
                    .ok_or_else(|| DbError::UnknownMetric(name.to_string()))
            })
            .collect()
    }
}

struct InMemoryDb {
    metrics: Arc<HashMap<&'static str, f64>>,
    next_id: AtomicUsize,
    open: AtomicUsize,
}

impl InMemoryDb {
    fn new() -> Self {
        let metrics = HashMap::from([("metricA", 0.25), ("metricB", 17.0), ("metricC", 3.5)]);
        Self {
            metrics: Arc::new(metrics),
            next_id: AtomicUsize::new(1),
            open: AtomicUsize::new(0),
        }
    }

    fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

impl Provider for InMemoryDb {
    type Config = DbConfig;
    type Resource = Connection;
    type Error = DbError;

    async fn acquire(&self, config: DbConfig) -> Result<Connection, DbError> {
        if config.host != "some-host" {
            return Err(DbError::ConnectionRefused(config.host));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as u32;
        self.open.fetch_add(1, Ordering::SeqCst);
        tracing::info!(id, host = %config.host, "connection opened");

        Ok(Connection {
            id,
            flaky_close: config.flaky_close,
            metrics: Arc::clone(&self.metrics),
        })
    }

    async fn dispose(&self, conn: Connection) -> Result<(), DbError> {
        self.open.fetch_sub(1, Ordering::SeqCst);
        tracing::info!(id = conn.id, "connection closed");

        if conn.flaky_close {
            Err(DbError::CloseFailed(conn.id))
        } else {
            Ok(())
        }
    }
}

// ==================== The fetcher ====================

type Metrics = Vec<(String, f64)>;

/// A unit of work factory: fix the metric names, get back work that needs
/// only a connection.
fn metrics_fetcher() -> impl Fn(Vec<&'static str>) -> BoxedWork<Metrics, DbError, Connection> {
    let fetch = parameterize(|fields: Vec<&'static str>| {
        let sql = format!("SELECT {} FROM metrics;", fields.join(", "));
        let span = tracing::debug_span!("fetch_metrics", sql = %sql);

        from_boxed(move |conn: &mut Connection| Box::pin(async move { conn.query(&sql).await }))
            .instrument(span)
    });

    move |fields: Vec<&'static str>| fetch(fields).boxed()
}

// ==================== Scenarios ====================

async fn example_successful_fetch(db: &Loaner<InMemoryDb>) {
    println!("\n=== Example 1: Successful Fetch ===");

    let fetch = metrics_fetcher();
    let result = db
        .run(DbConfig::new("some-host"), fetch(vec!["metricA", "metricB"]))
        .await;

    println!("  Result: {:?}", result);
    println!("  Open connections: {}", db.provider().open_connections());
}

async fn example_rejected_query(db: &Loaner<InMemoryDb>) {
    println!("\n=== Example 2: Query Rejected, Connection Still Closed ===");

    let fetch = metrics_fetcher();
    let result = db
        .run(DbConfig::new("some-host"), fetch(vec!["metricA", "metricZ"]))
        .await;

    match result {
        Err(ScopeError::Work(e)) => println!("  Work failed: {}", e),
        other => println!("  Unexpected: {:?}", other),
    }
    println!("  Open connections: {}", db.provider().open_connections());
}

async fn example_refused_connection(db: &Loaner<InMemoryDb>) {
    println!("\n=== Example 3: Connection Refused ===");

    let fetch = metrics_fetcher();
    let result = db
        .run(DbConfig::new("other-host"), fetch(vec!["metricA"]))
        .await;

    match result {
        Err(ScopeError::Acquire(e)) => println!("  Acquisition failed: {}", e),
        other => println!("  Unexpected: {:?}", other),
    }
}

async fn example_flaky_close(db: &Loaner<InMemoryDb>) {
    println!("\n=== Example 4: Close Failure Takes Precedence ===");

    let fetch = metrics_fetcher();
    let config = DbConfig {
        flaky_close: true,
        ..DbConfig::new("some-host")
    };

    let result = db.run(config.clone(), fetch(vec!["metricC"])).await;
    println!("  After good query: {}", describe(&result));

    let result = db.run(config, fetch(vec!["nope"])).await;
    println!("  After bad query: {}", describe(&result));
    println!("  Open connections: {}", db.provider().open_connections());
}

fn describe(result: &Result<Metrics, ScopeError<DbError>>) -> String {
    match result {
        Ok(metrics) => format!("ok {:?}", metrics),
        Err(e) => match std::error::Error::source(e) {
            Some(cause) => format!("{} [caused by: {}]", e, cause),
            None => e.to_string(),
        },
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let db = Loaner::new(InMemoryDb::new())
        .with_options(ScopeOptions::new().with_name("metrics-db"));

    example_successful_fetch(&db).await;
    example_rejected_query(&db).await;
    example_refused_connection(&db).await;
    example_flaky_close(&db).await;

    println!("\n=== All examples completed successfully! ===");
}
