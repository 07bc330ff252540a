//! A fixed-size worker pool for handling queries off the accept loop
//! (spec.md §4.Q, §5). Grounded on `original_source/threadpool.hpp/.cpp`'s
//! `submit`/`start`/`stop`/`join` shape, adapted to `std::sync::mpsc` the
//! way the teacher's `components/resolver/forward.rs` already reaches for
//! channels over the mutex/condvar pair the original hand-rolled.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// `size` long-lived worker threads pulling closures off a shared queue.
/// Dropping the pool closes the queue and joins every worker.
pub struct ThreadPool {
    workers: Vec<JoinHandle<()>>,
    sender: Option<Sender<Job>>,
}

impl ThreadPool {
    /// Panics if `size` is zero — a pool with no workers can never make
    /// progress, so there is no sensible degraded behavior to fall back to.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "thread pool size must be nonzero");

        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let receiver = Arc::clone(&receiver);
            workers.push(
                thread::Builder::new()
                    .name(format!("rsdns-worker-{id}"))
                    .spawn(move || Self::work(receiver))
                    .expect("failed to spawn worker thread"),
            );
        }

        ThreadPool {
            workers,
            sender: Some(sender),
        }
    }

    fn work(receiver: Arc<Mutex<Receiver<Job>>>) {
        loop {
            let job = {
                let guard = receiver.lock().expect("thread pool queue poisoned");
                guard.recv()
            };
            match job {
                Ok(job) => job(),
                Err(_) => break,
            }
        }
    }

    /// Queue `job` for execution by the next free worker. Silently dropped
    /// if the pool has already been shut down (`stop` was called) — a
    /// worker handling one query crashing must not be able to poison
    /// submission for every other in-flight query.
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(sender) = &self.sender {
            let _ = sender.send(Box::new(job));
        }
    }

    /// Stop accepting new work and block until every worker has drained
    /// its current job and exited.
    pub fn stop(&mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn executes_submitted_jobs() {
        let pool = ThreadPool::new(4);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        drop(pool);
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn stop_joins_workers() {
        let mut pool = ThreadPool::new(2);
        pool.execute(|| {});
        pool.stop();
        assert!(pool.workers.is_empty());
    }
}
