//! Bounded worker pool for independent per-file jobs.
//!
//! Workers pull from a shared queue and send results over a channel; the
//! pool is created per run, drained, and joined before results are
//! returned. Completion order is arbitrary.

use std::collections::VecDeque;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

/// Runs every job on a pool of `workers` OS threads (clamped to at least 1
/// and at most the job count) and returns all results, in completion order.
pub fn run_jobs<T, R, F>(jobs: Vec<T>, workers: usize, job_fn: F) -> Vec<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    let count = jobs.len();
    if count == 0 {
        return Vec::new();
    }
    let work: Arc<Mutex<VecDeque<T>>> = Arc::new(Mutex::new(jobs.into_iter().collect()));
    let job_fn = Arc::new(job_fn);
    let (tx, rx) = mpsc::channel();

    let num_workers = workers.max(1).min(count);
    let mut handles = Vec::with_capacity(num_workers);
    for _ in 0..num_workers {
        let work = Arc::clone(&work);
        let job_fn = Arc::clone(&job_fn);
        let tx = tx.clone();
        handles.push(thread::spawn(move || loop {
            let job = match work.lock().unwrap().pop_front() {
                Some(j) => j,
                None => break,
            };
            let _ = tx.send(job_fn(job));
        }));
    }
    drop(tx);

    let mut results = Vec::with_capacity(count);
    for _ in 0..count {
        results.push(rx.recv().expect("worker result"));
    }
    for h in handles {
        h.join()
            .unwrap_or_else(|e| panic!("worker panicked: {:?}", e));
    }
    results
}
