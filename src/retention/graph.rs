//! Entity-type dependency graph walked during a sweep.

use serde::{Deserialize, Serialize};

/// Entity types managed by the retention subsystem.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Note,
    Board,
    Comment,
    Attachment,
    Pin,
    Label,
}

impl EntityKind {
    /// All entity types, in declaration order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Note,
        EntityKind::Board,
        EntityKind::Comment,
        EntityKind::Attachment,
        EntityKind::Pin,
        EntityKind::Label,
    ];

    /// Returns the string representation of the entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Note => "note",
            EntityKind::Board => "board",
            EntityKind::Comment => "comment",
            EntityKind::Attachment => "attachment",
            EntityKind::Pin => "pin",
            EntityKind::Label => "label",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How erasure of a parent record propagates to a dependent type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeKind {
    /// Dependent records referencing an erased parent are deleted.
    CascadeDelete,
    /// The erased parent's id is stripped from a reference array on the
    /// dependent; the dependent record survives.
    PullReference,
}

/// Declared parent-to-child cleanup relationship. Static configuration, not
/// runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge {
    pub parent: EntityKind,
    pub child: EntityKind,
    pub kind: CascadeKind,
}

impl DependencyEdge {
    pub const fn new(parent: EntityKind, child: EntityKind, kind: CascadeKind) -> Self {
        Self {
            parent,
            child,
            kind,
        }
    }
}

/// The edge set for the workspace schema. Adding a dependent type is an
/// append here, not a new code path in the engine.
pub fn default_edges() -> Vec<DependencyEdge> {
    vec![
        DependencyEdge::new(
            EntityKind::Note,
            EntityKind::Comment,
            CascadeKind::CascadeDelete,
        ),
        DependencyEdge::new(
            EntityKind::Note,
            EntityKind::Attachment,
            CascadeKind::CascadeDelete,
        ),
        DependencyEdge::new(
            EntityKind::Note,
            EntityKind::Label,
            CascadeKind::PullReference,
        ),
        DependencyEdge::new(
            EntityKind::Board,
            EntityKind::Pin,
            CascadeKind::CascadeDelete,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_edges_parents_are_primary_types() {
        for edge in default_edges() {
            assert!(
                matches!(edge.parent, EntityKind::Note | EntityKind::Board),
                "unexpected parent {}",
                edge.parent
            );
        }
    }

    #[test]
    fn test_entity_kind_round_trip() {
        for kind in EntityKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: EntityKind = serde_json::from_str(&json).unwrap();
            assert_eq!(kind, back);
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
