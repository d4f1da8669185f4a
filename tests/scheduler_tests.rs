//! Scheduler lifecycle tests on a paused tokio clock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use custodian::models::{Attachment, Board, Comment, Label, Note, Pin};
use custodian::retention::EntityKind;
use custodian::storage::PurgedSet;
use custodian::{
    Clock, ConfigError, GcEngine, ManualClock, MemoryRecordStore, RecordStore, RetentionPolicy,
    RetentionScheduler, StoreResult,
};

/// Store wrapper counting sweeps (one note purge per sweep) and detecting
/// overlapping sweep executions.
struct ProbeStore {
    inner: MemoryRecordStore,
    sweeps: AtomicU64,
    active: AtomicU64,
    overlapped: AtomicBool,
    busy_for: Option<std::time::Duration>,
}

impl ProbeStore {
    fn new() -> Self {
        Self::with_busy(None)
    }

    fn with_busy(busy_for: Option<std::time::Duration>) -> Self {
        Self {
            inner: MemoryRecordStore::new(),
            sweeps: AtomicU64::new(0),
            active: AtomicU64::new(0),
            overlapped: AtomicBool::new(false),
            busy_for,
        }
    }

    fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::SeqCst)
    }

    fn overlapped(&self) -> bool {
        self.overlapped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for ProbeStore {
    async fn purge_expired_notes(&self, cutoff: DateTime<Utc>) -> StoreResult<PurgedSet> {
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        if let Some(busy) = self.busy_for {
            tokio::time::sleep(busy).await;
        }
        let result = self.inner.purge_expired_notes(cutoff).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn purge_expired_boards(&self, cutoff: DateTime<Utc>) -> StoreResult<PurgedSet> {
        self.inner.purge_expired_boards(cutoff).await
    }

    async fn delete_comments_by_notes(&self, note_ids: &[Uuid]) -> StoreResult<u64> {
        self.inner.delete_comments_by_notes(note_ids).await
    }

    async fn delete_attachments_by_notes(&self, note_ids: &[Uuid]) -> StoreResult<u64> {
        self.inner.delete_attachments_by_notes(note_ids).await
    }

    async fn delete_pins_by_boards(&self, board_ids: &[Uuid]) -> StoreResult<u64> {
        self.inner.delete_pins_by_boards(board_ids).await
    }

    async fn pull_notes_from_labels(&self, note_ids: &[Uuid]) -> StoreResult<u64> {
        self.inner.pull_notes_from_labels(note_ids).await
    }

    async fn insert_note(&self, note: Note) -> StoreResult<()> {
        self.inner.insert_note(note).await
    }

    async fn insert_board(&self, board: Board) -> StoreResult<()> {
        self.inner.insert_board(board).await
    }

    async fn insert_comment(&self, comment: Comment) -> StoreResult<()> {
        self.inner.insert_comment(comment).await
    }

    async fn insert_attachment(&self, attachment: Attachment) -> StoreResult<()> {
        self.inner.insert_attachment(attachment).await
    }

    async fn insert_pin(&self, pin: Pin) -> StoreResult<()> {
        self.inner.insert_pin(pin).await
    }

    async fn insert_label(&self, label: Label) -> StoreResult<()> {
        self.inner.insert_label(label).await
    }

    async fn count(&self, entity: EntityKind) -> u64 {
        self.inner.count(entity).await
    }

    async fn get_note(&self, id: Uuid) -> Option<Note> {
        self.inner.get_note(id).await
    }

    async fn get_label(&self, id: Uuid) -> Option<Label> {
        self.inner.get_label(id).await
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

fn scheduler_with(
    store: Arc<ProbeStore>,
    sweep_interval: Duration,
) -> (RetentionScheduler, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(t0()));
    let engine = Arc::new(GcEngine::with_defaults(store, clock.clone()));
    let policy = RetentionPolicy::new(Duration::hours(24), sweep_interval).unwrap();
    (RetentionScheduler::new(engine, clock.clone(), policy), clock)
}

async fn settle() {
    // Let spawned sweep tasks run to completion on the paused clock.
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn test_start_sweeps_immediately_then_every_interval() {
    let store = Arc::new(ProbeStore::new());
    let (scheduler, _clock) = scheduler_with(store.clone(), Duration::hours(1));

    scheduler.start();
    settle().await;
    assert!(scheduler.is_running());
    assert_eq!(store.sweeps(), 1);

    tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
    settle().await;
    assert_eq!(store.sweeps(), 2);

    tokio::time::sleep(std::time::Duration::from_secs(2 * 3600)).await;
    settle().await;
    assert_eq!(store.sweeps(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_start_twice_arms_a_single_timer() {
    let store = Arc::new(ProbeStore::new());
    let (scheduler, _clock) = scheduler_with(store.clone(), Duration::hours(1));

    scheduler.start();
    settle().await;
    scheduler.start();
    settle().await;
    assert_eq!(store.sweeps(), 1);

    // One sweep per interval, not two.
    tokio::time::sleep(std::time::Duration::from_secs(3 * 3600)).await;
    settle().await;
    assert_eq!(store.sweeps(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_future_sweeps_only() {
    let store = Arc::new(ProbeStore::new());
    let (scheduler, _clock) = scheduler_with(store.clone(), Duration::hours(1));

    scheduler.start();
    settle().await;
    assert_eq!(store.sweeps(), 1);

    scheduler.stop();
    assert!(!scheduler.is_running());
    assert!(scheduler.next_sweep_at().is_none());

    tokio::time::sleep(std::time::Duration::from_secs(5 * 3600)).await;
    settle().await;
    assert_eq!(store.sweeps(), 1);

    // Stopping again is a no-op.
    scheduler.stop();
    assert!(!scheduler.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_set_sweep_interval_rearms_from_now() {
    let store = Arc::new(ProbeStore::new());
    let (scheduler, clock) = scheduler_with(store.clone(), Duration::hours(10));

    scheduler.start();
    settle().await;
    assert_eq!(store.sweeps(), 1);

    scheduler.set_sweep_interval(Duration::hours(1)).unwrap();
    assert!(scheduler.is_running());
    assert_eq!(scheduler.next_sweep_at(), Some(clock.now() + Duration::hours(1)));

    // The next sweep fires a full new interval from now, well before the
    // original 10h schedule.
    tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
    settle().await;
    assert_eq!(store.sweeps(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_next_sweep_estimate_tracks_interval() {
    let store = Arc::new(ProbeStore::new());
    let (scheduler, clock) = scheduler_with(store.clone(), Duration::hours(2));

    assert!(scheduler.next_sweep_at().is_none());

    scheduler.start();
    assert_eq!(scheduler.next_sweep_at(), Some(clock.now() + Duration::hours(2)));
}

#[tokio::test(start_paused = true)]
async fn test_trigger_runs_while_stopped() {
    let store = Arc::new(ProbeStore::new());
    let (scheduler, _clock) = scheduler_with(store.clone(), Duration::hours(1));

    let stats = scheduler.trigger().await;
    assert_eq!(stats.total_deleted, 0);
    assert!(stats.errors.is_empty());
    assert_eq!(store.sweeps(), 1);
    assert!(!scheduler.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_triggers_never_overlap() {
    let store = Arc::new(ProbeStore::with_busy(Some(
        std::time::Duration::from_millis(200),
    )));
    let (scheduler, _clock) = scheduler_with(store.clone(), Duration::hours(1));

    let first = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.trigger().await }
    });
    let second = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.trigger().await }
    });

    let (first, second) = tokio::join!(first, second);
    first.unwrap();
    second.unwrap();

    assert_eq!(store.sweeps(), 2);
    assert!(!store.overlapped());
}

#[tokio::test(start_paused = true)]
async fn test_settings_validation_keeps_previous_policy() {
    let store = Arc::new(ProbeStore::new());
    let (scheduler, _clock) = scheduler_with(store.clone(), Duration::hours(1));

    assert_eq!(
        scheduler.set_retention_period(Duration::zero()),
        Err(ConfigError::InvalidRetentionPeriod)
    );
    assert_eq!(
        scheduler.set_sweep_interval(Duration::hours(-2)),
        Err(ConfigError::InvalidSweepInterval)
    );

    let policy = scheduler.policy();
    assert_eq!(policy.retention_period, Duration::hours(24));
    assert_eq!(policy.sweep_interval, Duration::hours(1));

    scheduler.set_retention_period(Duration::hours(48)).unwrap();
    assert_eq!(scheduler.policy().retention_period, Duration::hours(48));

    // A combined update with one invalid field applies nothing.
    assert_eq!(
        scheduler.update_policy(Some(Duration::hours(72)), Some(Duration::zero())),
        Err(ConfigError::InvalidSweepInterval)
    );
    assert_eq!(scheduler.policy().retention_period, Duration::hours(48));
    assert_eq!(scheduler.policy().sweep_interval, Duration::hours(1));
}
