//! Fan-out/fan-in execution of independent save tasks under one shared
//! cancellable scope.
//! 在同一个可取消作用域下并发执行相互独立的保存任务。

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::retry::{RetryError, RetryPolicy};

type TaskFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// One unit of save work with a stable label for logs and outcomes.
///
/// The closure produces a fresh future per retry attempt, so the captured
/// state must be shareable across attempts (in practice: `Arc` clones of the
/// ports and the request data).
pub struct TaskSpec {
    label: &'static str,
    work: Box<dyn Fn() -> TaskFuture + Send + Sync>,
}

impl TaskSpec {
    pub fn new<F, Fut>(label: &'static str, work: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            label,
            work: Box::new(move || Box::pin(work())),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Settled result of one task, in the order tasks finished.
#[derive(Debug)]
pub struct TaskOutcome {
    pub label: &'static str,
    pub result: Result<(), RetryError>,
}

#[derive(Debug, Error)]
pub enum TaskGroupError {
    /// A task exhausted its retry budget. Siblings were cancelled; whichever
    /// of several co-failing tasks is reported first is a completion-order
    /// race and intentionally not pinned down.
    #[error("{task} failed after {attempts} attempts")]
    TaskFailed {
        task: &'static str,
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    /// Every observed failure was a cancellation (the caller's scope was
    /// cancelled from outside; no task failed on its own).
    #[error("task group cancelled")]
    Cancelled,
}

/// Run every task to completion and report the group outcome.
///
/// A permanent task failure wins over sibling cancellations regardless of
/// which settled first; cancellation is reported only when no task failed
/// permanently. Successful siblings of a failed task are not rolled back.
pub async fn run_all(
    scope: &CancellationToken,
    policy: RetryPolicy,
    tasks: Vec<TaskSpec>,
) -> Result<(), TaskGroupError> {
    let outcomes = run_all_settled(scope, policy, tasks).await;

    let mut cancelled = false;
    for outcome in outcomes {
        match outcome.result {
            Ok(()) => {}
            Err(RetryError::Exhausted { attempts, source }) => {
                return Err(TaskGroupError::TaskFailed {
                    task: outcome.label,
                    attempts,
                    source,
                });
            }
            Err(RetryError::Cancelled) => cancelled = true,
        }
    }

    if cancelled {
        return Err(TaskGroupError::Cancelled);
    }
    Ok(())
}

/// Fan out all tasks under one child scope and settle every one of them.
///
/// Each task runs on its own runtime task, wrapped by the retry policy bound
/// to the shared child scope. The first task to exhaust its budget cancels
/// the scope, which stops further retry attempts everywhere; attempts already
/// in flight abort at their next await point. The returned outcomes are in
/// completion order and always cover every launched task.
pub async fn run_all_settled(
    scope: &CancellationToken,
    policy: RetryPolicy,
    tasks: Vec<TaskSpec>,
) -> Vec<TaskOutcome> {
    if tasks.is_empty() {
        return Vec::new();
    }

    let shared = scope.child_token();
    let (outcome_tx, mut outcome_rx) = mpsc::channel(tasks.len());

    let mut handles: Vec<(&'static str, JoinHandle<()>)> = Vec::with_capacity(tasks.len());
    for task in tasks {
        let scope = shared.clone();
        let outcome_tx = outcome_tx.clone();
        let label = task.label;
        let handle = tokio::spawn(async move {
            let TaskSpec { label, work } = task;
            let result = policy.run(&scope, || work()).await;

            if matches!(result, Err(RetryError::Exhausted { .. })) {
                warn!(task = label, "Retry budget exhausted; cancelling sibling tasks");
                scope.cancel();
            }

            let _ = outcome_tx.send(TaskOutcome { label, result }).await;
        });
        handles.push((label, handle));
    }
    drop(outcome_tx);

    let mut outcomes = Vec::with_capacity(handles.len());
    while let Some(outcome) = outcome_rx.recv().await {
        debug!(
            task = outcome.label,
            ok = outcome.result.is_ok(),
            "Save task settled"
        );
        outcomes.push(outcome);
    }

    // The channel closed, so every task either settled or panicked. A panic
    // counts as a permanent failure of that task.
    for (label, handle) in handles {
        if let Err(join_err) = handle.await {
            error!(task = label, error = %join_err, "Save task panicked");
            shared.cancel();
            outcomes.push(TaskOutcome {
                label,
                result: Err(RetryError::Exhausted {
                    attempts: 0,
                    source: anyhow::anyhow!("task panicked: {join_err}"),
                }),
            });
        }
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::retry::Backoff;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Backoff::Constant(Duration::from_millis(10)))
    }

    fn counting_task(
        label: &'static str,
        calls: &Arc<AtomicU32>,
        fail_first: u32,
    ) -> TaskSpec {
        let calls = Arc::clone(calls);
        TaskSpec::new(label, move || {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < fail_first {
                    Err(anyhow::anyhow!("{label} transient error"))
                } else {
                    Ok(())
                }
            }
        })
    }

    #[tokio::test]
    async fn empty_group_is_a_no_op() {
        let scope = CancellationToken::new();
        let result = run_all(&scope, policy(3), Vec::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn all_tasks_succeed_and_settle() {
        let scope = CancellationToken::new();
        let a = Arc::new(AtomicU32::new(0));
        let b = Arc::new(AtomicU32::new(0));
        let c = Arc::new(AtomicU32::new(0));

        let outcomes = run_all_settled(
            &scope,
            policy(3),
            vec![
                counting_task("a", &a, 0),
                counting_task("b", &b, 0),
                counting_task("c", &c, 0),
            ],
        )
        .await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|outcome| outcome.result.is_ok()));
        for calls in [&a, &b, &c] {
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_do_not_disturb_siblings() {
        let scope = CancellationToken::new();
        let flaky = Arc::new(AtomicU32::new(0));
        let steady = Arc::new(AtomicU32::new(0));

        let result = run_all(
            &scope,
            policy(5),
            vec![
                counting_task("flaky", &flaky, 2),
                counting_task("steady", &steady, 0),
            ],
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(flaky.load(Ordering::SeqCst), 3);
        assert_eq!(steady.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_reports_the_failing_task() {
        let scope = CancellationToken::new();
        let doomed = Arc::new(AtomicU32::new(0));
        let steady = Arc::new(AtomicU32::new(0));

        let result = run_all(
            &scope,
            policy(3),
            vec![
                counting_task("doomed", &doomed, u32::MAX),
                counting_task("steady", &steady, 0),
            ],
        )
        .await;

        match result {
            Err(TaskGroupError::TaskFailed { task, attempts, .. }) => {
                assert_eq!(task, "doomed");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected TaskFailed, got {other:?}"),
        }
        assert_eq!(doomed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_cancels_a_blocked_sibling() {
        let scope = CancellationToken::new();
        let doomed = Arc::new(AtomicU32::new(0));
        let blocked_calls = Arc::new(AtomicU32::new(0));

        let blocked = {
            let calls = Arc::clone(&blocked_calls);
            TaskSpec::new("blocked", move || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    sleep(Duration::from_secs(86_400)).await;
                    Ok(())
                }
            })
        };

        let outcomes = run_all_settled(
            &scope,
            policy(2),
            vec![counting_task("doomed", &doomed, u32::MAX), blocked],
        )
        .await;

        // The group settled instead of waiting out the day-long sleep.
        assert_eq!(outcomes.len(), 2);
        let blocked_outcome = outcomes
            .iter()
            .find(|outcome| outcome.label == "blocked")
            .expect("blocked task settled");
        assert!(matches!(
            blocked_outcome.result,
            Err(RetryError::Cancelled)
        ));
        // Cancelled mid-attempt: invoked once, never retried.
        assert_eq!(blocked_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_wins_over_sibling_cancellation() {
        let scope = CancellationToken::new();
        let doomed = Arc::new(AtomicU32::new(0));

        let blocked = TaskSpec::new("blocked", move || async move {
            sleep(Duration::from_secs(86_400)).await;
            Ok(())
        });

        let result = run_all(
            &scope,
            policy(2),
            vec![counting_task("doomed", &doomed, u32::MAX), blocked],
        )
        .await;

        // The sibling's Cancelled outcome is absorbed; the cause is reported.
        assert!(matches!(
            result,
            Err(TaskGroupError::TaskFailed { task: "doomed", .. })
        ));
    }

    #[tokio::test]
    async fn pre_cancelled_scope_runs_no_work() {
        let scope = CancellationToken::new();
        scope.cancel();
        let calls = Arc::new(AtomicU32::new(0));

        let result = run_all(&scope, policy(3), vec![counting_task("a", &calls, 0)]).await;

        assert!(matches!(result, Err(TaskGroupError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn no_new_attempt_starts_after_sibling_exhaustion() {
        let scope = CancellationToken::new();
        let doomed = Arc::new(AtomicU32::new(0));
        let slow_retrier_calls = Arc::new(AtomicU32::new(0));

        // Fails instantly but sleeps before failing on the second attempt, so
        // the doomed sibling (two fast attempts) always exhausts first.
        let slow_retrier = {
            let calls = Arc::clone(&slow_retrier_calls);
            TaskSpec::new("slow-retrier", move || {
                let calls = Arc::clone(&calls);
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n > 0 {
                        sleep(Duration::from_secs(3600)).await;
                    }
                    Err(anyhow::anyhow!("slow transient error"))
                }
            })
        };

        let result = run_all(
            &scope,
            RetryPolicy::new(2, Backoff::Constant(Duration::from_millis(1))),
            vec![counting_task("doomed", &doomed, u32::MAX), slow_retrier],
        )
        .await;

        assert!(matches!(result, Err(TaskGroupError::TaskFailed { .. })));
        // The slow task never got a full second attempt after the scope was
        // cancelled, let alone a third.
        assert!(slow_retrier_calls.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn panicking_task_is_reported_and_cancels_siblings() {
        let scope = CancellationToken::new();
        let steady = Arc::new(AtomicU32::new(0));

        let panicking = TaskSpec::new("panicking", || async { panic!("boom") });

        let result = run_all(
            &scope,
            policy(3),
            vec![panicking, counting_task("steady", &steady, 0)],
        )
        .await;

        assert!(matches!(
            result,
            Err(TaskGroupError::TaskFailed {
                task: "panicking",
                ..
            })
        ));
    }
}
