//! Sweep orchestration across the entity dependency graph.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::StoreError;
use crate::storage::RecordStore;

use super::{
    default_edges, AttachmentCollector, BoardCollector, CascadeKind, Clock, CommentCollector,
    DependencyEdge, DependentCollector, EntityKind, LabelCollector, NoteCollector, PinCollector,
    PrimaryCollector, RetentionPolicy,
};

/// Failure of a single entity type during a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepError {
    pub entity: EntityKind,
    pub message: String,
}

/// Aggregated result of one sweep. Created fresh per sweep, immutable once
/// returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepStats {
    /// Records deleted (or, for reference pulls, modified) per entity type.
    pub per_entity: BTreeMap<EntityKind, u64>,
    /// Sum of all per-entity counts.
    pub total_deleted: u64,
    /// Entity types whose bulk operation failed. The sweep continued past
    /// each of these.
    pub errors: Vec<SweepError>,
}

impl SweepStats {
    fn record(&mut self, entity: EntityKind, count: u64) {
        *self.per_entity.entry(entity).or_insert(0) += count;
        self.total_deleted += count;
    }

    fn record_failure(&mut self, entity: EntityKind, message: String) {
        self.per_entity.entry(entity).or_insert(0);
        self.errors.push(SweepError { entity, message });
    }

    /// Count recorded for `entity`, 0 if the type was never reached.
    pub fn deleted_for(&self, entity: EntityKind) -> u64 {
        self.per_entity.get(&entity).copied().unwrap_or(0)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_deletions(&self) -> bool {
        self.total_deleted > 0
    }
}

/// Orchestrates one garbage-collection sweep: computes the cutoff, drives
/// primary collectors, then walks the dependency edges with exactly the ids
/// erased in the current sweep.
pub struct GcEngine {
    primaries: Vec<Arc<dyn PrimaryCollector>>,
    dependents: HashMap<EntityKind, Arc<dyn DependentCollector>>,
    edges: Vec<DependencyEdge>,
    clock: Arc<dyn Clock>,
}

impl GcEngine {
    pub fn new(
        primaries: Vec<Arc<dyn PrimaryCollector>>,
        dependents: Vec<Arc<dyn DependentCollector>>,
        edges: Vec<DependencyEdge>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let dependents = dependents
            .into_iter()
            .map(|collector| (collector.entity(), collector))
            .collect();
        Self {
            primaries,
            dependents,
            edges,
            clock,
        }
    }

    /// Wires the full workspace schema against `store`.
    pub fn with_defaults(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            vec![
                Arc::new(NoteCollector::new(store.clone())),
                Arc::new(BoardCollector::new(store.clone())),
            ],
            vec![
                Arc::new(CommentCollector::new(store.clone())),
                Arc::new(AttachmentCollector::new(store.clone())),
                Arc::new(LabelCollector::new(store.clone())),
                Arc::new(PinCollector::new(store)),
            ],
            default_edges(),
            clock,
        )
    }

    /// Runs one sweep. Never fails: per-type failures are recorded in the
    /// returned stats and do not stop the remaining steps.
    pub async fn sweep(&self, policy: &RetentionPolicy) -> SweepStats {
        let cutoff = self.clock.now() - policy.retention_period;
        let mut stats = SweepStats::default();
        debug!(%cutoff, "starting sweep");

        // Primary partitions are disjoint, so their purges run concurrently.
        let purges = join_all(self.primaries.iter().map(|collector| async move {
            (collector.entity(), collector.purge_expired(cutoff).await)
        }))
        .await;

        let mut erased: HashMap<EntityKind, Vec<Uuid>> = HashMap::new();
        for (entity, result) in purges {
            match result {
                Ok(purged) => {
                    stats.record(entity, purged.deleted);
                    erased.insert(entity, purged.ids);
                }
                Err(err) => {
                    warn!(entity = %entity, error = %err, "primary purge failed");
                    stats.record_failure(entity, err.to_string());
                }
            }
        }

        // All primary purges have completed above, so every edge may now run
        // concurrently. Each edge sees exactly the id set its parent erased
        // in this sweep; a failed or empty parent skips its edges outright.
        let edge_results = join_all(self.edges.iter().filter_map(|edge| {
            let parent_ids = erased.get(&edge.parent).cloned().unwrap_or_default();
            if parent_ids.is_empty() {
                debug!(parent = %edge.parent, child = %edge.child, "no erased parents, skipping edge");
                return None;
            }
            let collector = self.dependents.get(&edge.child).cloned();
            let (child, kind) = (edge.child, edge.kind);
            Some(async move {
                let result = match collector {
                    Some(collector) if collector.kind() == kind => {
                        collector.remove_for_parents(&parent_ids).await
                    }
                    Some(_) => Err(StoreError::Backend(format!(
                        "collector for {child} does not perform {kind:?}"
                    ))),
                    None => Err(StoreError::Backend(format!(
                        "no collector registered for {child}"
                    ))),
                };
                (child, result)
            })
        }))
        .await;

        for (child, result) in edge_results {
            match result {
                Ok(count) => stats.record(child, count),
                Err(err) => {
                    warn!(entity = %child, error = %err, "dependent cleanup failed");
                    stats.record_failure(child, err.to_string());
                }
            }
        }

        debug!(
            total = stats.total_deleted,
            errors = stats.errors.len(),
            "sweep complete"
        );
        stats
    }
}
