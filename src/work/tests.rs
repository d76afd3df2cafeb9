//! Tests for units of work and their combinators.

use crate::work::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Constructors
#[tokio::test]
async fn test_pure_returns_value() {
    let work = pure::<_, String, ()>(42);
    assert_eq!(work.execute(&mut ()).await, Ok(42));
}

#[tokio::test]
async fn test_fail_returns_error() {
    let work = fail::<i32, _, ()>("error".to_string());
    assert_eq!(work.execute(&mut ()).await, Err("error".to_string()));
}

#[tokio::test]
async fn test_from_result_passes_through() {
    let ok = from_result::<_, String, ()>(Ok(1));
    let err = from_result::<i32, _, ()>(Err("nope".to_string()));
    assert_eq!(ok.execute(&mut ()).await, Ok(1));
    assert_eq!(err.execute(&mut ()).await, Err("nope".to_string()));
}

#[tokio::test]
async fn test_ready_work_leaves_resource_untouched() {
    let work = fail::<(), _, Vec<u8>>("cached miss".to_string());
    assert_eq!(work.result(), &Err("cached miss".to_string()));

    let mut buf = vec![1, 2, 3];
    assert!(work.execute(&mut buf).await.is_err());
    assert_eq!(buf, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_from_fn_mutates_resource() {
    let work = from_fn(|buf: &mut Vec<u8>| {
        buf.extend_from_slice(b"abc");
        Ok::<_, String>(buf.len())
    });

    let mut buf = Vec::new();
    assert_eq!(work.execute(&mut buf).await, Ok(3));
    assert_eq!(buf, b"abc");
}

#[tokio::test]
async fn test_from_async_awaits_owned_future() {
    let work = from_async(|base: &mut u64| {
        let base = *base;
        async move {
            tokio::task::yield_now().await;
            Ok::<_, String>(base + 1)
        }
    });

    assert_eq!(work.execute(&mut 41).await, Ok(42));
}

#[tokio::test]
async fn test_from_boxed_borrows_across_await() {
    let work = from_boxed(|lines: &mut Vec<String>| {
        Box::pin(async move {
            lines.push("first".to_string());
            tokio::task::yield_now().await;
            lines.push("second".to_string());
            Ok::<_, String>(lines.len())
        })
    });

    let mut lines = Vec::new();
    assert_eq!(work.execute(&mut lines).await, Ok(2));
    assert_eq!(lines, vec!["first", "second"]);
}

// Map / MapErr
#[tokio::test]
async fn test_map_transforms_value() {
    let work = pure::<_, String, ()>(21).map(|x| x * 2);
    assert_eq!(work.execute(&mut ()).await, Ok(42));
}

#[tokio::test]
async fn test_map_on_failure_doesnt_execute() {
    let work = fail::<i32, _, ()>("error".to_string()).map(|x| x * 2);
    assert_eq!(work.execute(&mut ()).await, Err("error".to_string()));
}

#[tokio::test]
async fn test_map_err_transforms_error() {
    let work = fail::<i32, _, ()>("error").map_err(|e: &str| format!("wrapped: {}", e));
    assert_eq!(work.execute(&mut ()).await, Err("wrapped: error".to_string()));
}

#[tokio::test]
async fn test_map_err_preserves_success() {
    let work = pure::<_, &str, ()>(42).map_err(|e| format!("wrapped: {}", e));
    assert_eq!(work.execute(&mut ()).await, Ok(42));
}

// AndThen
#[tokio::test]
async fn test_and_then_shares_resource() {
    let work = from_fn(|n: &mut i32| {
        *n += 1;
        Ok::<_, String>(*n)
    })
    .and_then(|seen| {
        from_fn(move |n: &mut i32| {
            *n += seen;
            Ok::<_, String>(*n)
        })
    });

    let mut n = 1;
    assert_eq!(work.execute(&mut n).await, Ok(4));
    assert_eq!(n, 4);
}

#[tokio::test]
async fn test_and_then_short_circuits() {
    let second_ran = Arc::new(AtomicBool::new(false));
    let second_ran_clone = second_ran.clone();

    let work = fail::<i32, _, ()>("first failed".to_string()).and_then(move |x| {
        second_ran_clone.store(true, Ordering::SeqCst);
        pure(x * 2)
    });

    assert_eq!(work.execute(&mut ()).await, Err("first failed".to_string()));
    assert!(!second_ran.load(Ordering::SeqCst));
}

// Boxing
#[tokio::test]
async fn test_boxed_work_in_collection() {
    let works: Vec<BoxedWork<usize, String, Vec<u8>>> = vec![
        pure(0).boxed(),
        from_fn(|buf: &mut Vec<u8>| Ok::<_, String>(buf.len())).boxed(),
        from_boxed(|buf: &mut Vec<u8>| {
            Box::pin(async move {
                buf.push(9);
                Ok::<_, String>(buf.len())
            })
        })
        .boxed(),
    ];

    let mut buf = vec![1, 2];
    let mut results = Vec::new();
    for work in works {
        results.push(work.execute(&mut buf).await);
    }

    assert_eq!(results, vec![Ok(0), Ok(2), Ok(3)]);
}

#[tokio::test]
async fn test_boxed_work_from_match_arms() {
    fn choose(cached: bool) -> BoxedWork<String, String, String> {
        if cached {
            pure("cached".to_string()).boxed()
        } else {
            from_fn(|conn: &mut String| Ok::<_, String>(format!("fetched via {}", conn))).boxed()
        }
    }

    let mut conn = "db".to_string();
    assert_eq!(choose(true).execute(&mut conn).await, Ok("cached".to_string()));
    assert_eq!(
        choose(false).execute(&mut conn).await,
        Ok("fetched via db".to_string())
    );
}

// Hand-written Work
struct CountBytes;

impl Work for CountBytes {
    type Output = usize;
    type Error = String;
    type Resource = Vec<u8>;

    async fn run(self, resource: &mut Vec<u8>) -> Result<usize, String> {
        tokio::task::yield_now().await;
        Ok(resource.len())
    }
}

#[tokio::test]
async fn test_hand_written_work_composes() {
    let work = CountBytes.map(|n| n * 2);
    assert_eq!(work.execute(&mut vec![1, 2, 3]).await, Ok(6));
}
