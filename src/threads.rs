use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::mpsc;
use std::thread;

use log::debug;

#[derive(Debug)]
pub enum PoolError {
    NoWorkers,
    Spawn(io::Error),
    WorkerPanicked,
    Disconnected,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWorkers => write!(f, "worker pool needs at least one thread"),
            Self::Spawn(e) => write!(f, "failed to spawn worker thread: {}", e),
            Self::WorkerPanicked => write!(f, "worker thread panicked while running a job"),
            Self::Disconnected => write!(f, "worker thread exited before finishing its jobs"),
        }
    }
}

impl std::error::Error for PoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

/// Static rule assigning job `i` of `n` to a worker.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Distribution {
    /// Job `i` goes to worker `i % workers`.
    #[default]
    RoundRobin,
    /// Each worker gets one contiguous run of jobs.
    Contiguous,
}

impl Distribution {
    pub fn worker_for(&self, job: usize, jobs: usize, workers: usize) -> usize {
        match self {
            Self::RoundRobin => job % workers,
            Self::Contiguous => {
                // first `extra` workers take one job more
                let size = jobs / workers;
                let extra = jobs % workers;
                let big = extra * (size + 1);
                if job < big {
                    job / (size + 1)
                } else {
                    extra + (job - big) / size
                }
            }
        }
    }
}

impl FromStr for Distribution {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round-robin" => Ok(Self::RoundRobin),
            "contiguous" => Ok(Self::Contiguous),
            other => Err(format!("unknown distribution: {}", other)),
        }
    }
}

type Outcome<O> = Result<O, PoolError>;

struct Worker<I> {
    tx: Option<mpsc::Sender<I>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl<I> Worker<I>
where
    I: Send + 'static,
{
    fn spawn<F, O>(id: usize, f: F, out_tx: mpsc::Sender<Outcome<O>>) -> Result<Self, PoolError>
    where
        F: Fn(I) -> O + Send + 'static,
        O: Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<I>();
        let handle = thread::Builder::new()
            .name(format!("grainsweep-worker-{}", id))
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(job)))
                        .map_err(|_| PoolError::WorkerPanicked);
                    if out_tx.send(outcome).is_err() {
                        return;
                    }
                }
            })
            .map_err(PoolError::Spawn)?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    fn send(&self, job: I) -> Result<(), PoolError> {
        match &self.tx {
            Some(tx) => tx.send(job).map_err(|_| PoolError::Disconnected),
            None => Err(PoolError::Disconnected),
        }
    }
}

/// Fixed set of threads running the same job function. Threads live as
/// long as the pool and are joined on drop.
pub struct WorkerPool<I, O> {
    workers: Vec<Worker<I>>,
    rx: mpsc::Receiver<Outcome<O>>,
}

impl<I, O> WorkerPool<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Spawn `n` workers, each running a function built by `make`.
    pub fn with<M, F>(n: usize, make: M) -> Result<Self, PoolError>
    where
        M: Fn() -> F,
        F: Fn(I) -> O + Send + 'static,
    {
        if n == 0 {
            return Err(PoolError::NoWorkers);
        }
        let (tx, rx) = mpsc::channel();
        // workers started before a failure are joined when `pool` drops
        let mut pool = Self {
            workers: Vec::with_capacity(n),
            rx,
        };
        for id in 0..n {
            pool.workers.push(Worker::spawn(id, make(), tx.clone())?);
        }
        debug!("started worker pool with {} threads", n);
        Ok(pool)
    }

    pub fn threads(&self) -> usize {
        self.workers.len()
    }

    /// Dispatch every job, then hand each result to `sink` in completion
    /// order. Returns once all jobs have produced a result.
    pub fn run<S>(
        &self,
        jobs: Vec<I>,
        distribution: Distribution,
        mut sink: S,
    ) -> Result<(), PoolError>
    where
        S: FnMut(O),
    {
        let n = jobs.len();
        let workers = self.workers.len();
        for (i, job) in jobs.into_iter().enumerate() {
            if let Err(e) = self.workers[distribution.worker_for(i, n, workers)].send(job) {
                self.drain(i);
                return Err(e);
            }
        }
        // drain every outcome so a failed run leaves nothing queued
        let mut failure = None;
        for _ in 0..n {
            match self.rx.recv() {
                Ok(Ok(out)) => sink(out),
                Ok(Err(e)) => {
                    failure.get_or_insert(e);
                }
                Err(_) => return Err(PoolError::Disconnected),
            }
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn drain(&self, outstanding: usize) {
        for _ in 0..outstanding {
            if self.rx.recv().is_err() {
                return;
            }
        }
    }

    /// Run all jobs and collect the results, in completion order.
    pub fn call(&self, jobs: Vec<I>, distribution: Distribution) -> Result<Vec<O>, PoolError> {
        let mut results = Vec::with_capacity(jobs.len());
        self.run(jobs, distribution, |out| results.push(out))?;
        Ok(results)
    }
}

impl<I, O> Drop for WorkerPool<I, O> {
    fn drop(&mut self) {
        for worker in &mut self.workers {
            worker.tx.take();
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                let _ = handle.join();
            }
        }
        debug!("stopped worker pool with {} threads", self.workers.len());
    }
}
