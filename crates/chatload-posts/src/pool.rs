//! Fixed-size worker pool over independent units of work.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Number of workers fabricating channels concurrently.
pub const DEFAULT_WORKERS: usize = 16;

type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Shared progress over a fixed set of work units.
pub struct Progress {
    done: AtomicUsize,
    total: usize,
    callback: Option<ProgressCallback>,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
            callback: None,
        }
    }

    /// Attach an observer invoked with (done, total) after each unit.
    pub fn with_callback<F>(total: usize, callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        Self {
            done: AtomicUsize::new(0),
            total,
            callback: Some(Box::new(callback)),
        }
    }

    /// Record one completed unit and notify the observer.
    pub fn complete(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(callback) = &self.callback {
            callback(done, self.total);
        }
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Run `task` for every index in `0..total` across a fixed worker pool.
///
/// Indices are assigned by stride, so each unit is owned end-to-end by
/// exactly one worker. Blocks the caller until every unit has completed;
/// there is no cancellation.
pub async fn run_indexed<F, Fut>(total: usize, workers: usize, progress: Arc<Progress>, task: F)
where
    F: Fn(usize) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    if total == 0 {
        return;
    }

    let workers = workers.clamp(1, total);
    let mut pool = JoinSet::new();
    for worker in 0..workers {
        let task = task.clone();
        let progress = Arc::clone(&progress);
        pool.spawn(async move {
            let mut index = worker;
            while index < total {
                task(index).await;
                progress.complete();
                index += workers;
            }
        });
    }

    while pool.join_next().await.is_some() {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_every_index_runs_exactly_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let progress = Arc::new(Progress::new(37));

        let task_seen = Arc::clone(&seen);
        run_indexed(37, 16, Arc::clone(&progress), move |index| {
            let seen = Arc::clone(&task_seen);
            async move {
                seen.lock().unwrap().push(index);
            }
        })
        .await;

        let mut seen = seen.lock().unwrap().clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..37).collect::<Vec<_>>());
        assert_eq!(progress.done(), 37);
    }

    #[tokio::test]
    async fn test_more_workers_than_units() {
        let progress = Arc::new(Progress::new(3));
        run_indexed(3, 16, Arc::clone(&progress), |_| async {}).await;
        assert_eq!(progress.done(), 3);
    }

    #[tokio::test]
    async fn test_zero_units_returns_immediately() {
        let progress = Arc::new(Progress::new(0));
        run_indexed(0, 16, Arc::clone(&progress), |_| async {}).await;
        assert_eq!(progress.done(), 0);
    }

    #[tokio::test]
    async fn test_callback_sees_monotonic_progress() {
        let counts = Arc::new(Mutex::new(Vec::new()));
        let callback_counts = Arc::clone(&counts);
        let progress = Arc::new(Progress::with_callback(10, move |done, total| {
            assert_eq!(total, 10);
            callback_counts.lock().unwrap().push(done);
        }));

        run_indexed(10, 4, progress, |_| async {}).await;

        let mut counts = counts.lock().unwrap().clone();
        counts.sort_unstable();
        assert_eq!(counts, (1..=10).collect::<Vec<_>>());
    }
}
