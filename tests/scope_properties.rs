//! Property-based tests for release-exactly-once

use proptest::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use loaner::prelude::*;

#[derive(Clone, Copy, Debug)]
enum WorkEnding {
    Succeed,
    Fail,
    Panic,
}

fn work_ending() -> impl Strategy<Value = WorkEnding> {
    prop_oneof![
        Just(WorkEnding::Succeed),
        Just(WorkEnding::Fail),
        Just(WorkEnding::Panic),
    ]
}

/// `resume_unwind` skips the panic hook, which keeps the test output quiet.
fn explode() -> ! {
    panic::resume_unwind(Box::new("work panicked"))
}

fn counting_provider(
    acquire_ok: bool,
    dispose_ok: bool,
    disposals: Arc<AtomicUsize>,
) -> impl Provider<Config = u32, Resource = u32, Error = String> {
    provider(
        move |config: u32| async move {
            if acquire_ok {
                Ok(config)
            } else {
                Err("conn refused".to_string())
            }
        },
        move |_: u32| {
            disposals.fetch_add(1, Ordering::SeqCst);
            async move {
                if dispose_ok {
                    Ok(())
                } else {
                    Err("close failed".to_string())
                }
            }
        },
    )
}

proptest! {
    #[test]
    fn prop_async_release_happens_once_per_acquisition(
        config in any::<u32>(),
        acquire_ok in any::<bool>(),
        ending in work_ending(),
        dispose_ok in any::<bool>(),
    ) {
        let disposals = Arc::new(AtomicUsize::new(0));
        let loaner = Loaner::new(counting_provider(acquire_ok, dispose_ok, disposals.clone()));

        let work = from_async(move |id: &mut u32| {
            let id = *id;
            async move {
                tokio::task::yield_now().await;
                match ending {
                    WorkEnding::Succeed => Ok(id),
                    WorkEnding::Fail => Err("bad query".to_string()),
                    WorkEnding::Panic => explode(),
                }
            }
        });

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            tokio_test::block_on(loaner.run(config, work))
        }));

        let expected_disposals = usize::from(acquire_ok);
        prop_assert_eq!(disposals.load(Ordering::SeqCst), expected_disposals);

        match (acquire_ok, ending, dispose_ok) {
            (false, _, _) => {
                prop_assert_eq!(result.unwrap(), Err(ScopeError::Acquire("conn refused".to_string())));
            }
            (true, WorkEnding::Panic, _) => prop_assert!(result.is_err()),
            (true, WorkEnding::Succeed, true) => prop_assert_eq!(result.unwrap(), Ok(config)),
            (true, WorkEnding::Fail, true) => {
                prop_assert_eq!(result.unwrap(), Err(ScopeError::Work("bad query".to_string())));
            }
            (true, WorkEnding::Succeed, false) => {
                prop_assert_eq!(
                    result.unwrap(),
                    Err(ScopeError::Release { error: "close failed".to_string(), work_error: None })
                );
            }
            (true, WorkEnding::Fail, false) => {
                prop_assert_eq!(
                    result.unwrap(),
                    Err(ScopeError::Release {
                        error: "close failed".to_string(),
                        work_error: Some("bad query".to_string()),
                    })
                );
            }
        }
    }

    #[test]
    fn prop_sync_release_happens_once_per_acquisition(
        config in any::<u32>(),
        acquire_ok in any::<bool>(),
        ending in work_ending(),
        dispose_ok in any::<bool>(),
    ) {
        let disposals = AtomicUsize::new(0);

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            using_sync(
                config,
                |config| if acquire_ok { Ok(config) } else { Err("conn refused".to_string()) },
                |_| {
                    disposals.fetch_add(1, Ordering::SeqCst);
                    if dispose_ok { Ok(()) } else { Err("close failed".to_string()) }
                },
                |id| match ending {
                    WorkEnding::Succeed => Ok(*id),
                    WorkEnding::Fail => Err("bad query".to_string()),
                    WorkEnding::Panic => explode(),
                },
            )
        }));

        prop_assert_eq!(disposals.load(Ordering::SeqCst), usize::from(acquire_ok));
        if !acquire_ok {
            prop_assert_eq!(result.unwrap(), Err(ScopeError::Acquire("conn refused".to_string())));
        } else if let Ok(Err(err)) = &result {
            prop_assert_eq!(err.is_release_failure(), !dispose_ok);
        }
    }

    #[test]
    fn prop_parameterized_work_sees_its_params(limit in 0usize..64, rows in prop::collection::vec(any::<u8>(), 0..64)) {
        let fetch = parameterize(|limit: usize| {
            from_fn(move |rows: &mut Vec<u8>| Ok::<_, String>(rows.iter().take(limit).count()))
        });

        let mut resource = rows.clone();
        let result = tokio_test::block_on(fetch(limit).execute(&mut resource));

        prop_assert_eq!(result, Ok(limit.min(rows.len())));
    }
}
