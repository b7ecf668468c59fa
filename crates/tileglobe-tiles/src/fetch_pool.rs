//! Concurrent tile fetching: one independent request per patch, executed on
//! a small worker pool, with results collected by the slot owner.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use tileglobe_mesh::GlobeMesh;
use tileglobe_projection::TileId;

use crate::error::TileFetchError;
use crate::source::TileSource;
use crate::texture::{TextureSlots, TileTexture, decode_tile};

/// Batch tag of requests queued through [`TileFetchPool::submit`].
const UNBATCHED: u64 = 0;

/// How long `fetch_into` waits for capacity held by other callers' jobs
/// before retrying a submission.
const CAPACITY_RETRY: Duration = Duration::from_millis(5);

/// Fetch one tile for the texture slot it is assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRequest {
    pub tile: TileId,
}

impl TileRequest {
    #[must_use]
    pub fn new(tile: TileId) -> Self {
        Self { tile }
    }

    /// Texture slot the result belongs to, `y · 2^zoom + x`.
    #[must_use]
    pub fn slot(&self) -> usize {
        self.tile.row_major_index() as usize
    }

    /// One request per patch of `mesh`, in slot order.
    #[must_use]
    pub fn for_mesh(mesh: &GlobeMesh) -> Vec<TileRequest> {
        mesh.patches()
            .iter()
            .map(|patch| TileRequest::new(patch.tile))
            .collect()
    }
}

/// Outcome of a completed [`TileRequest`].
#[derive(Debug)]
pub struct TileFetchResult {
    pub request: TileRequest,
    pub outcome: Result<TileTexture, TileFetchError>,
}

struct Job {
    request: TileRequest,
    generation: u64,
    batch: u64,
}

struct Completed {
    generation: u64,
    batch: u64,
    result: TileFetchResult,
}

/// Worker pool that fetches and decodes tiles off the calling thread.
///
/// The owner submits [`TileRequest`]s with [`submit`](Self::submit) and
/// collects [`TileFetchResult`]s with [`drain_results`](Self::drain_results),
/// then binds each to its own slot. [`cancel`](Self::cancel) abandons every
/// outstanding request; dropping the pool cancels and joins the workers, so
/// no result outlives its owner.
pub struct TileFetchPool {
    /// Channel sender for submitting jobs to workers.
    job_sender: Option<crossbeam_channel::Sender<Job>>,
    result_receiver: crossbeam_channel::Receiver<Completed>,
    worker_handles: Vec<JoinHandle<()>>,
    /// Maximum number of queued plus running requests.
    budget: usize,
    in_flight: Arc<AtomicUsize>,
    /// Bumped by `cancel`; jobs and results from older generations are dropped.
    generation: Arc<AtomicU64>,
    /// Tags each `fetch_into` call so it only accounts for its own results.
    next_batch: AtomicU64,
    /// Results received by a caller other than the one that queued them.
    parked: Mutex<Vec<Completed>>,
}

impl TileFetchPool {
    /// Spawn `worker_count` fetch threads sharing `source`.
    ///
    /// `budget` bounds how many requests may be queued or running at once.
    pub fn new(source: Arc<dyn TileSource>, worker_count: usize, budget: usize) -> Self {
        let worker_count = worker_count.max(1);
        let budget = budget.max(1);
        let (job_tx, job_rx) = crossbeam_channel::bounded::<Job>(budget);
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let generation = Arc::new(AtomicU64::new(0));

        let mut handles = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let rx = job_rx.clone();
            let tx = result_tx.clone();
            let source = Arc::clone(&source);
            let flight = Arc::clone(&in_flight);
            let current = Arc::clone(&generation);

            let spawned = std::thread::Builder::new()
                .name(format!("tile-fetch-{i}"))
                .spawn(move || {
                    while let Ok(job) = rx.recv() {
                        if job.generation == current.load(Ordering::Acquire) {
                            let tile = job.request.tile;
                            let outcome = source
                                .fetch(tile)
                                .and_then(|bytes| decode_tile(tile, &bytes));
                            let _ = tx.send(Completed {
                                generation: job.generation,
                                batch: job.batch,
                                result: TileFetchResult {
                                    request: job.request,
                                    outcome,
                                },
                            });
                        }
                        flight.fetch_sub(1, Ordering::AcqRel);
                    }
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => tracing::error!(error = %err, "failed to spawn tile fetch worker"),
            }
        }

        tracing::debug!(workers = handles.len(), budget, "tile fetch pool started");

        Self {
            job_sender: Some(job_tx),
            result_receiver: result_rx,
            worker_handles: handles,
            budget,
            in_flight,
            generation,
            next_batch: AtomicU64::new(UNBATCHED + 1),
            parked: Mutex::new(Vec::new()),
        }
    }

    /// Queue a request. Returns `false` if the budget is exhausted or the
    /// pool has been shut down.
    pub fn submit(&self, request: TileRequest) -> bool {
        self.enqueue(request, UNBATCHED)
    }

    /// Collect results of [`submit`](Self::submit)ted requests completed
    /// since the last call. Results of cancelled requests are discarded.
    pub fn drain_results(&self) -> Vec<TileFetchResult> {
        self.parked().extend(self.result_receiver.try_iter());
        self.take_parked(UNBATCHED)
    }

    /// Number of requests queued or running.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Abandon all outstanding requests. Queued ones are skipped by the
    /// workers; results of running ones are dropped on arrival.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Fetch every request and bind the results into `slots`, blocking until
    /// all of them are resolved or `timeout` elapses.
    ///
    /// Returns the number of results bound. Only results of `requests` are
    /// bound; results of earlier [`submit`](Self::submit) calls stay
    /// available to [`drain_results`](Self::drain_results). On timeout the
    /// pool is cancelled and the remaining slots stay pending.
    pub fn fetch_into(
        &self,
        requests: &[TileRequest],
        slots: &mut TextureSlots,
        timeout: Duration,
    ) -> usize {
        if self.worker_handles.is_empty() {
            tracing::warn!("tile fetch pool has no workers");
            return 0;
        }

        let deadline = Instant::now() + timeout;
        let batch = self.next_batch.fetch_add(1, Ordering::Relaxed);
        let generation = self.generation.load(Ordering::Acquire);
        let mut queue = requests.iter().copied().peekable();
        let mut outstanding = 0usize;
        let mut bound = 0;

        loop {
            while let Some(&request) = queue.peek() {
                if !self.enqueue(request, batch) {
                    break;
                }
                outstanding += 1;
                queue.next();
            }

            if outstanding == 0 && queue.peek().is_none() {
                break;
            }
            if self.generation.load(Ordering::Acquire) != generation {
                tracing::debug!(batch, "tile fetch cancelled");
                break;
            }
            if Instant::now() >= deadline {
                tracing::warn!(remaining = outstanding + queue.len(), "tile fetch timed out");
                self.cancel();
                break;
            }

            let mut arrived = self.take_parked(batch);
            if arrived.is_empty() {
                // With none of ours in flight, the budget is held by jobs
                // that may be skipped without ever producing a result.
                let wait_until = if outstanding == 0 {
                    deadline.min(Instant::now() + CAPACITY_RETRY)
                } else {
                    deadline
                };
                match self.result_receiver.recv_deadline(wait_until) {
                    Ok(done) if done.batch == batch && done.generation == generation => {
                        arrived.push(done.result);
                    }
                    Ok(done) => self.parked().push(done),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            for TileFetchResult { request, outcome } in arrived {
                outstanding -= 1;
                if slots.bind(request.tile, outcome) {
                    bound += 1;
                }
            }
        }

        bound
    }

    /// Cancel outstanding work and join all workers.
    pub fn shutdown(&mut self) {
        self.cancel();
        // Dropping the sender closes the channel; workers exit once it drains.
        self.job_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }

    fn enqueue(&self, request: TileRequest, batch: u64) -> bool {
        let Some(sender) = &self.job_sender else {
            return false;
        };
        if self.worker_handles.is_empty() || self.in_flight.load(Ordering::Acquire) >= self.budget
        {
            return false;
        }
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let job = Job {
            request,
            generation: self.generation.load(Ordering::Acquire),
            batch,
        };
        if sender.try_send(job).is_err() {
            self.in_flight.fetch_sub(1, Ordering::AcqRel);
            return false;
        }
        true
    }

    /// Remove and return parked results of `batch` from the current
    /// generation. Stale results are dropped on the way.
    fn take_parked(&self, batch: u64) -> Vec<TileFetchResult> {
        let current = self.generation.load(Ordering::Acquire);
        let mut parked = self.parked();
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *parked)
            .into_iter()
            .filter(|done| done.generation == current)
            .partition(|done| done.batch == batch);
        *parked = kept;
        taken.into_iter().map(|done| done.result).collect()
    }

    fn parked(&self) -> MutexGuard<'_, Vec<Completed>> {
        self.parked.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TileFetchPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tileglobe_mesh::{SubdivisionConfig, build_globe_mesh};

    use super::*;
    use crate::texture::SlotState;
    use crate::texture::tests::encoded_png;

    /// Serves a tiny PNG whose red channel encodes the slot, and 404s for
    /// tiles listed in `missing`.
    struct MemorySource {
        missing: HashSet<TileId>,
        delay: Duration,
        served: Mutex<Vec<TileId>>,
    }

    impl MemorySource {
        fn new() -> Self {
            Self {
                missing: HashSet::new(),
                delay: Duration::ZERO,
                served: Mutex::new(Vec::new()),
            }
        }
    }

    impl TileSource for MemorySource {
        fn fetch(&self, tile: TileId) -> Result<Vec<u8>, TileFetchError> {
            std::thread::sleep(self.delay);
            self.served.lock().unwrap().push(tile);
            if self.missing.contains(&tile) {
                return Err(TileFetchError::Status { tile, code: 404 });
            }
            Ok(encoded_png(4, 4, [tile.row_major_index() as u8, 0, 0, 255]))
        }
    }

    fn requests(k: u8, l: u8) -> (Vec<TileRequest>, TextureSlots) {
        let mesh = build_globe_mesh(&SubdivisionConfig::new(k, l).unwrap());
        (TileRequest::for_mesh(&mesh), TextureSlots::for_mesh(&mesh))
    }

    fn wait_for(pool: &TileFetchPool, count: usize) -> Vec<TileFetchResult> {
        let start = Instant::now();
        let mut received = Vec::new();
        while received.len() < count {
            received.extend(pool.drain_results());
            assert!(start.elapsed().as_secs() < 10, "Timed out");
            std::thread::sleep(Duration::from_millis(1));
        }
        received
    }

    #[test]
    fn test_requests_follow_slot_order() {
        let (requests, _) = requests(3, 2);
        assert_eq!(requests.len(), 16);
        for (i, request) in requests.iter().enumerate() {
            assert_eq!(request.slot(), i);
            assert_eq!(request.tile.row_major_index() as usize, i);
        }
    }

    #[test]
    fn test_every_patch_fetched_once() {
        let source = Arc::new(MemorySource::new());
        let pool = TileFetchPool::new(source.clone(), 4, 64);
        let (requests, _) = requests(3, 2);
        for request in &requests {
            assert!(pool.submit(*request));
        }

        let mut received: Vec<usize> = wait_for(&pool, 16)
            .into_iter()
            .map(|r| r.request.slot())
            .collect();
        received.sort_unstable();
        assert_eq!(received, (0..16).collect::<Vec<_>>());

        let served = source.served.lock().unwrap();
        let unique: HashSet<_> = served.iter().collect();
        assert_eq!(served.len(), 16);
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn test_results_land_in_own_slot() {
        let pool = TileFetchPool::new(Arc::new(MemorySource::new()), 3, 8);
        let (requests, mut slots) = requests(2, 1);
        let bound = pool.fetch_into(&requests, &mut slots, Duration::from_secs(10));
        assert_eq!(bound, 4);
        assert!(slots.is_complete());
        for slot in 0..4 {
            let texture = slots.texture(slot).unwrap();
            assert_eq!(texture.pixels()[0] as usize, slot);
        }
    }

    #[test]
    fn test_missing_tile_fails_only_its_slot() {
        let mut source = MemorySource::new();
        source.missing.insert(TileId::new(1, 0, 1).unwrap());
        let pool = TileFetchPool::new(Arc::new(source), 2, 4);
        let (requests, mut slots) = requests(2, 1);
        pool.fetch_into(&requests, &mut slots, Duration::from_secs(10));

        assert_eq!(slots.ready_count(), 3);
        assert_eq!(slots.failed_count(), 1);
        assert!(matches!(slots.get(2), Some(SlotState::Failed(_))));
    }

    #[test]
    fn test_budget_limits_submissions() {
        let mut source = MemorySource::new();
        source.delay = Duration::from_millis(50);
        let pool = TileFetchPool::new(Arc::new(source), 1, 2);
        let (requests, _) = requests(3, 2);

        // Queued and running requests both count against the budget, and
        // the single worker is still inside its first fetch.
        let submitted = requests.iter().filter(|r| pool.submit(**r)).count();
        assert_eq!(submitted, 2);
        assert_eq!(pool.in_flight_count(), 2);
    }

    #[test]
    fn test_fetch_into_leaves_submitted_requests_alone() {
        let mut source = MemorySource::new();
        source.delay = Duration::from_millis(50);
        let pool = TileFetchPool::new(Arc::new(source), 4, 16);
        let (requests, mut slots) = requests(2, 1);

        assert!(pool.submit(requests[0]));
        let bound = pool.fetch_into(&requests[1..], &mut slots, Duration::from_secs(10));

        assert_eq!(bound, 3);
        assert_eq!(slots.get(0), Some(&SlotState::Pending));
        for slot in 1..4 {
            assert!(slots.texture(slot).is_some(), "slot {slot} not bound");
        }
        let earlier = wait_for(&pool, 1);
        assert_eq!(earlier.len(), 1);
        assert_eq!(earlier[0].request, requests[0]);
        assert!(earlier[0].outcome.is_ok());
    }

    #[test]
    fn test_fetch_into_returns_at_deadline() {
        let mut source = MemorySource::new();
        source.delay = Duration::from_millis(300);
        let pool = TileFetchPool::new(Arc::new(source), 1, 4);
        let (requests, mut slots) = requests(2, 1);

        let start = Instant::now();
        let bound = pool.fetch_into(&requests, &mut slots, Duration::from_millis(30));
        assert_eq!(bound, 0);
        assert!(start.elapsed() < Duration::from_millis(250));
        assert_eq!(slots.pending_count(), 4);
        // The run was cancelled, so its late results never surface.
        std::thread::sleep(Duration::from_millis(400));
        assert!(pool.drain_results().is_empty());
    }

    #[test]
    fn test_request_slot_follows_tile() {
        let tile = TileId::new(3, 5, 2).unwrap();
        assert_eq!(TileRequest::new(tile).slot(), 21);
    }

    #[test]
    fn test_fetch_into_respects_budget_and_finishes() {
        let pool = TileFetchPool::new(Arc::new(MemorySource::new()), 2, 2);
        let (requests, mut slots) = requests(3, 2);
        let bound = pool.fetch_into(&requests, &mut slots, Duration::from_secs(10));
        assert_eq!(bound, 16);
        assert_eq!(slots.ready_count(), 16);
    }

    #[test]
    fn test_cancel_discards_outstanding_results() {
        let mut source = MemorySource::new();
        source.delay = Duration::from_millis(20);
        let source = Arc::new(source);
        let pool = TileFetchPool::new(source.clone(), 1, 16);
        let (requests, _) = requests(2, 1);
        for request in &requests {
            assert!(pool.submit(*request));
        }
        pool.cancel();

        let start = Instant::now();
        while pool.in_flight_count() > 0 {
            assert!(start.elapsed().as_secs() < 10, "Timed out");
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(pool.drain_results().is_empty());
        // At most the request already running when cancelled was fetched.
        assert!(source.served.lock().unwrap().len() <= 1);
    }

    #[test]
    fn test_drop_joins_workers_with_pending_work() {
        let mut source = MemorySource::new();
        source.delay = Duration::from_millis(10);
        let source = Arc::new(source);
        let pool = TileFetchPool::new(source.clone(), 2, 16);
        let (requests, _) = requests(2, 1);
        for request in &requests {
            pool.submit(*request);
        }
        drop(pool);
        // Workers are joined, so the source is no longer shared.
        assert_eq!(Arc::strong_count(&source), 1);
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let mut pool = TileFetchPool::new(Arc::new(MemorySource::new()), 1, 4);
        pool.shutdown();
        let (requests, _) = requests(0, 0);
        assert!(!pool.submit(requests[0]));
    }
}
