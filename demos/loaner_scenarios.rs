//! Loaner Scenarios Example
//!
//! Walks through the ways a scoped run can end, and shows that the
//! resource is released in every one of them.
//!
//! Shows:
//! - The synchronous runner
//! - Chaining work on the same resource with `and_then`
//! - Cancelling work with a timeout
//! - Bounding a slow release
//! - A panicking unit of work
//!
//! Run with: cargo run --example loaner_scenarios

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use loaner::prelude::*;

/// A provider of numbered handles that counts releases.
fn counted_handles(
    released: Arc<AtomicUsize>,
    release_delay: Duration,
) -> impl Provider<Config = u32, Resource = Vec<String>, Error = String> {
    provider(
        |id: u32| async move { Ok::<_, String>(vec![format!("handle-{}", id)]) },
        move |log: Vec<String>| {
            let released = released.clone();
            async move {
                tokio::time::sleep(release_delay).await;
                released.fetch_add(1, Ordering::SeqCst);
                println!("  Released after: {:?}", log);
                Ok(())
            }
        },
    )
}

// ==================== Synchronous Scope ====================

fn example_sync_scope() {
    println!("\n=== Example 1: Synchronous Scope ===");

    let result = using_sync(
        "metrics.csv",
        |path| Ok::<_, String>(vec![format!("open {}", path)]),
        |lines| {
            println!("  Closing after {} line(s)", lines.len());
            Ok(())
        },
        |lines| {
            lines.push("metricA,0.25".to_string());
            Ok(lines.len())
        },
    );

    println!("  Result: {:?}", result);
}

// ==================== Chained Work ====================

async fn example_chained_work(released: Arc<AtomicUsize>) {
    println!("\n=== Example 2: Chained Work on One Resource ===");

    let loaner = Loaner::new(counted_handles(released, Duration::ZERO));

    let work = from_fn(|log: &mut Vec<String>| {
        log.push("BEGIN".to_string());
        Ok::<_, String>(log.len())
    })
    .and_then(|n| {
        from_fn(move |log: &mut Vec<String>| {
            log.push(format!("INSERT {}", n));
            Ok::<_, String>(log.len())
        })
    })
    .map(|n| format!("{} statements", n));

    let result = loaner.run(1, work).await;
    println!("  Result: {:?}", result);
}

// ==================== Cancellation ====================

async fn example_timeout(released: Arc<AtomicUsize>) {
    println!("\n=== Example 3: Work Cancelled by Timeout ===");

    let loaner = Loaner::new(counted_handles(released, Duration::ZERO));

    let slow = from_async(|_: &mut Vec<String>| async {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok::<_, String>("finished")
    });

    let result = loaner
        .run_with_timeout(2, slow, Duration::from_millis(20))
        .await;
    println!("  Cancelled: {}", result.is_err_and(|e| e.is_cancelled()));
}

// ==================== Release Timeout ====================

async fn example_release_timeout(released: Arc<AtomicUsize>) {
    println!("\n=== Example 4: Slow Release Bounded ===");

    let loaner = Loaner::new(counted_handles(released, Duration::from_secs(10)))
        .with_options(
            ScopeOptions::new()
                .with_name("slow-close")
                .with_release_timeout(Duration::from_millis(20)),
        );

    match loaner.run(3, pure("done")).await {
        Err(e @ ScopeError::ReleaseTimeout { .. }) => println!("  {}", e),
        other => println!("  Unexpected: {:?}", other),
    }
}

// ==================== Panicking Work ====================

async fn example_panic(released: Arc<AtomicUsize>) {
    println!("\n=== Example 5: Panicking Work ===");

    let loaner = Loaner::new(counted_handles(released.clone(), Duration::ZERO));
    let before = released.load(Ordering::SeqCst);

    let boom = from_fn(|_: &mut Vec<String>| -> Result<(), String> {
        panic::resume_unwind(Box::new("query exploded"))
    });

    let caught = AssertUnwindSafe(loaner.run(4, boom)).catch_unwind().await;

    println!("  Panic propagated: {}", caught.is_err());
    println!(
        "  Released anyway: {}",
        released.load(Ordering::SeqCst) == before + 1
    );
}

#[tokio::main]
async fn main() {
    let released = Arc::new(AtomicUsize::new(0));

    example_sync_scope();
    example_chained_work(released.clone()).await;
    example_timeout(released.clone()).await;
    example_release_timeout(released.clone()).await;
    example_panic(released.clone()).await;

    println!("\n=== Releases: {} ===", released.load(Ordering::SeqCst));
}
