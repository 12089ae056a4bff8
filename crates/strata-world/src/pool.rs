//! Bounded chunk generation worker pool.
//!
//! A fixed set of long-lived worker threads receives [`ChunkRequest`]s
//! over a job channel and sends finished geometry back over a result
//! channel. All bookkeeping (the requested-set, the pending FIFO, the
//! active count, the completed FIFO) lives on the cooperative thread and
//! is only touched from [`ChunkWorkerPool::tick`], so no locks guard any
//! of it; workers communicate exclusively by message passing.
//!
//! Dispatch follows enqueue order, but completion order across chunks is
//! unordered: workers finish when they finish. There is no cancellation.
//! Once dispatched, a request always produces a completion, even if the
//! chunk has scrolled out of view by then.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::JoinHandle;

use ahash::AHashSet;
use crossbeam_channel::{unbounded, Receiver, Sender};
use strata_common::ChunkCoord;
use strata_worldgen::TerrainField;
use tracing::{debug, warn};

use crate::chunk::{ChunkGeometry, ChunkRequest, CompletedChunk};
use crate::mesh::build_chunk_geometry;

/// Default concurrency ceiling.
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// What a worker sends back for one dispatched request.
enum WorkerReply {
    Built(CompletedChunk),
    Died(ChunkCoord),
}

/// Bounded pool of chunk generation workers.
pub struct ChunkWorkerPool {
    max_concurrency: usize,
    /// Requests dispatched but not yet collected by `tick`.
    active: usize,
    /// Every coordinate ever enqueued; grows for the process lifetime.
    requested: AHashSet<ChunkCoord>,
    pending: VecDeque<ChunkRequest>,
    completed: VecDeque<CompletedChunk>,
    jobs: Option<Sender<ChunkRequest>>,
    replies: Receiver<WorkerReply>,
    workers: Vec<JoinHandle<()>>,
}

impl ChunkWorkerPool {
    /// Creates a pool with `max_concurrency` worker threads.
    #[must_use]
    pub fn new(max_concurrency: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        let (job_tx, job_rx) = unbounded::<ChunkRequest>();
        let (reply_tx, reply_rx) = unbounded::<WorkerReply>();

        let workers = (0..max_concurrency)
            .map(|index| {
                let jobs = job_rx.clone();
                let replies = reply_tx.clone();
                std::thread::Builder::new()
                    .name(format!("chunk-worker-{index}"))
                    .spawn(move || worker_loop(&jobs, &replies))
                    .expect("failed to spawn chunk worker")
            })
            .collect();

        Self {
            max_concurrency,
            active: 0,
            requested: AHashSet::new(),
            pending: VecDeque::new(),
            completed: VecDeque::new(),
            jobs: Some(job_tx),
            replies: reply_rx,
            workers,
        }
    }

    /// Creates a pool with the default concurrency ceiling.
    #[must_use]
    pub fn with_default_concurrency() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY)
    }

    /// Enqueues a request unless its coordinate was ever requested before.
    ///
    /// Returns `true` if the request was accepted. This is the sole
    /// deduplication guard: a chunk, once requested, is never requested
    /// again for the lifetime of the pool, so callers may re-enqueue the
    /// same neighbourhood every frame for free.
    pub fn enqueue(&mut self, request: ChunkRequest) -> bool {
        if !self.requested.insert(request.coordinate) {
            return false;
        }
        self.pending.push_back(request);
        true
    }

    /// One cooperative pump: collect finished work, then dispatch.
    ///
    /// Never blocks. Replies are drained first so their slots free up for
    /// this tick's dispatches; then pending requests are handed to workers
    /// in FIFO order until the concurrency ceiling is reached.
    pub fn tick(&mut self) {
        while let Ok(reply) = self.replies.try_recv() {
            self.active = self.active.saturating_sub(1);
            match reply {
                WorkerReply::Built(chunk) => self.completed.push_back(chunk),
                WorkerReply::Died(coordinate) => {
                    warn!(
                        x = coordinate.x,
                        y = coordinate.y,
                        "chunk worker died generating chunk; dropping it"
                    );
                }
            }
        }

        while self.active < self.max_concurrency {
            let Some(request) = self.pending.pop_front() else {
                break;
            };
            let Some(jobs) = &self.jobs else { break };
            if jobs.send(request).is_err() {
                warn!("job channel closed; dropping pending request");
                break;
            }
            self.active += 1;
        }
    }

    /// Pops the oldest completed chunk, if any.
    pub fn pop_completed(&mut self) -> Option<CompletedChunk> {
        self.completed.pop_front()
    }

    /// Requests currently executing on workers.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Requests accepted but not yet dispatched.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Completed chunks awaiting consumption.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Coordinates ever requested.
    #[must_use]
    pub fn requested_count(&self) -> usize {
        self.requested.len()
    }

    /// Whether a coordinate has ever been requested.
    #[must_use]
    pub fn is_requested(&self, coordinate: ChunkCoord) -> bool {
        self.requested.contains(&coordinate)
    }

    /// The pool's concurrency ceiling.
    #[must_use]
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Whether nothing is in flight or waiting.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active == 0 && self.pending.is_empty()
    }
}

impl Drop for ChunkWorkerPool {
    fn drop(&mut self) {
        // Closing the job channel ends every worker's receive loop.
        self.jobs = None;
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("chunk worker panicked outside a request");
            }
        }
    }
}

/// Generates the geometry for one request.
///
/// This is the whole compute unit: rebuild the terrain field from the
/// request seed, sample the height grid, mesh it. Pure arithmetic with no
/// recoverable failure mode.
#[must_use]
pub fn generate_chunk(request: &ChunkRequest) -> ChunkGeometry {
    let field = TerrainField::from_base_seed(request.seed);
    let grid = field.height_grid(request.coordinate, request.chunk_size);
    build_chunk_geometry(&grid, request.scale)
}

fn worker_loop(jobs: &Receiver<ChunkRequest>, replies: &Sender<WorkerReply>) {
    while let Ok(request) = jobs.recv() {
        let coordinate = request.coordinate;
        debug!(x = coordinate.x, y = coordinate.y, "generating chunk");
        // A panic is fatal to this request only; the reply keeps the
        // pool's active count honest either way.
        let reply = match catch_unwind(AssertUnwindSafe(|| generate_chunk(&request))) {
            Ok(geometry) => WorkerReply::Built(CompletedChunk {
                coordinate,
                geometry,
            }),
            Err(_) => WorkerReply::Died(coordinate),
        };
        if replies.send(reply).is_err() {
            break;
        }
    }
}
