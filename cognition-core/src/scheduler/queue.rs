//! Priority queue for cognitive jobs.
//!
//! Ordered by (priority descending, insertion sequence ascending): among
//! equal priorities the first job in is the first job out. User-directed
//! jobs enter through [`JobQueue::enqueue_front`], which splices the backlog
//! behind them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::types::{CognitiveJob, JobKind};

/// How often a blocked dequeue re-checks the queue.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
struct QueueEntry {
    seq: u64,
    job: CognitiveJob,
}

/// Priority job queue shared between the supervisor and the workers.
#[derive(Debug, Default)]
pub struct JobQueue {
    /// Kept sorted by (priority desc, seq asc); the head is at index 0.
    entries: Mutex<Vec<QueueEntry>>,
    seq: AtomicU64,
}

impl JobQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a job at its priority position.
    pub fn enqueue(&self, job: CognitiveJob) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.lock();
        let position = entries
            .partition_point(|entry| !is_before(job.priority, seq, entry));
        entries.insert(position, QueueEntry { seq, job });
    }

    /// Splice a job in at the head of the queue.
    ///
    /// Drains the backlog, enqueues the new job first, then re-enqueues the
    /// rest sorted by descending priority with insertion order preserved.
    pub fn enqueue_front(&self, job: CognitiveJob) {
        let mut entries = self.entries.lock();
        let backlog: Vec<QueueEntry> = entries.drain(..).collect();

        // Reassign sequences so the spliced job precedes every equal-priority
        // job that was already waiting.
        let mut seq = self.seq.fetch_add(backlog.len() as u64 + 1, Ordering::Relaxed);
        entries.push(QueueEntry { seq, job });
        for entry in backlog {
            seq += 1;
            entries.push(QueueEntry { seq, job: entry.job });
        }
        entries.sort_by(|a, b| {
            b.job
                .priority
                .cmp(&a.job.priority)
                .then_with(|| a.seq.cmp(&b.seq))
        });
    }

    /// Pop the highest-priority job for which `eligible` holds.
    pub fn pop_eligible(
        &self,
        eligible: impl Fn(&CognitiveJob) -> bool,
    ) -> Option<CognitiveJob> {
        let mut entries = self.entries.lock();
        let position = entries.iter().position(|entry| eligible(&entry.job))?;
        Some(entries.remove(position).job)
    }

    /// Block up to `timeout` waiting for an eligible job.
    ///
    /// Returns early when `cancelled` flips true, so a shutdown never waits
    /// out the full timeout.
    pub async fn dequeue_timeout(
        &self,
        timeout: Duration,
        eligible: impl Fn(&CognitiveJob) -> bool,
        cancelled: impl Fn() -> bool,
    ) -> Option<CognitiveJob> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(job) = self.pop_eligible(&eligible) {
                return Some(job);
            }
            if cancelled() || Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Whether any queued job has the given kind.
    #[must_use]
    pub fn contains_kind(&self, kind: JobKind) -> bool {
        self.entries.lock().iter().any(|entry| entry.job.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Discard all queued jobs.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// Whether a new job (priority, seq) orders before an existing entry.
fn is_before(priority: u8, seq: u64, entry: &QueueEntry) -> bool {
    match priority.cmp(&entry.job.priority) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => seq < entry.seq,
    }
}
