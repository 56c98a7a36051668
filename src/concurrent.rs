use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

/// Bounded concurrent executor that hands results back in input order.
///
/// At most `concurrency` tasks are in flight. Each task runs exactly once;
/// completions are reported as they arrive, the returned vector is re-sorted
/// by input position.
pub struct OrderedExecutor {
    semaphore: Semaphore,
    concurrency: usize,
    completed: AtomicUsize,
}

impl OrderedExecutor {
    pub fn new(concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            semaphore: Semaphore::new(concurrency),
            concurrency,
            completed: AtomicUsize::new(0),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `task_fn` over every task. `on_complete` sees `(index, &output)` as
    /// each task finishes.
    pub async fn execute<T, F, Fut, C>(
        &self,
        tasks: impl IntoIterator<Item = T>,
        task_fn: F,
        mut on_complete: C,
    ) -> Vec<Fut::Output>
    where
        F: Fn(T) -> Fut,
        Fut: Future,
        C: FnMut(usize, &Fut::Output),
    {
        let mut futures = FuturesUnordered::new();

        for (index, task) in tasks.into_iter().enumerate() {
            let fut = task_fn(task);
            let semaphore = &self.semaphore;
            futures.push(async move {
                // never closed, so a permit is always granted
                let _permit = semaphore.acquire().await.ok();
                (index, fut.await)
            });
        }

        let mut results = Vec::with_capacity(futures.len());
        while let Some((index, output)) = futures.next().await {
            self.completed.fetch_add(1, Ordering::Relaxed);
            on_complete(index, &output);
            results.push((index, output));
        }

        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, output)| output).collect()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }
}
