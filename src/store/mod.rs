//! Node record storage.
//!
//! The solver reads a full node list and never writes. Saving is a separate,
//! explicit bulk upsert through a [`NodeStore`]. Every backend applies an
//! upsert batch all-or-nothing: a rejected batch leaves the store untouched
//! and comes back as a single [`ChainError`].

mod json;
mod memory;

use std::collections::{HashMap, HashSet};

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::chain::{NewNode, Node, NodeId};
use crate::error::{ChainError, Result};

/// Backend that holds node records.
pub trait NodeStore {
    /// Read every node, ascending id.
    fn list_nodes(&self) -> Result<Vec<Node>>;

    /// Insert or replace nodes by id, inputs and cached results alike.
    fn upsert(&mut self, nodes: &[Node]) -> Result<()>;

    /// Add a new node under the next unused id.
    fn insert(&mut self, node: NewNode) -> Result<Node>;
}

/// Highest id in `rows`, 0 when empty.
pub(crate) fn last_id(rows: &[Node]) -> u64 {
    rows.iter().map(|n| n.id.0).max().unwrap_or(0)
}

/// Next id after `last` and everything in `rows`.
pub(crate) fn next_id(rows: &[Node], last: u64) -> Result<NodeId> {
    last_id(rows)
        .max(last)
        .checked_add(1)
        .map(NodeId)
        .ok_or(ChainError::IdsExhausted)
}

/// Apply `batch` on top of `rows`, or refuse the whole batch.
///
/// Rejects a batch that repeats an id, or that would put two nodes of one
/// rectifier at the same index. Conflicts that already existed between
/// rows outside the batch are left alone.
pub(crate) fn merge_batch(rows: &[Node], batch: &[Node]) -> Result<Vec<Node>> {
    let mut incoming = HashSet::with_capacity(batch.len());
    for node in batch {
        if !incoming.insert(node.id) {
            return Err(ChainError::DuplicateId { id: node.id });
        }
    }

    let mut merged = rows.to_vec();
    for node in batch {
        match merged.iter_mut().find(|row| row.id == node.id) {
            Some(row) => *row = node.clone(),
            None => merged.push(node.clone()),
        }
    }
    merged.sort_by_key(|n| n.id);

    check_positions(&merged, &incoming)?;

    Ok(merged)
}

fn check_positions(merged: &[Node], incoming: &HashSet<NodeId>) -> Result<()> {
    let mut positions: HashMap<(&str, u32), NodeId> = HashMap::with_capacity(merged.len());
    for node in merged {
        if let Some(existing) = positions.insert((node.rectifier.as_str(), node.index), node.id) {
            if incoming.contains(&existing) || incoming.contains(&node.id) {
                return Err(ChainError::DuplicateIndex {
                    rectifier: node.rectifier.clone(),
                    index: node.index,
                    existing,
                    incoming: node.id,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Node> {
        vec![
            Node::new(NodeId(1), "1a", 1),
            Node::new(NodeId(2), "1a", 2),
            Node::new(NodeId(5), "2ab", 1),
        ]
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[], 0).unwrap(), NodeId(1));
        assert_eq!(next_id(&rows(), 0).unwrap(), NodeId(6));
        assert_eq!(next_id(&rows(), 9).unwrap(), NodeId(10));
    }

    #[test]
    fn test_next_id_at_the_top_of_the_range() {
        let rows = vec![Node::new(NodeId(u64::MAX), "1a", 1)];
        assert!(matches!(next_id(&rows, 0), Err(ChainError::IdsExhausted)));
    }

    #[test]
    fn test_merge_replaces_and_appends() {
        let batch = vec![
            Node::new(NodeId(2), "1a", 2).with_cable(0.5),
            Node::new(NodeId(3), "1a", 3),
        ];
        let merged = merge_batch(&rows(), &batch).unwrap();
        let ids: Vec<u64> = merged.iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 5]);
        assert_eq!(merged[1].cable_resistance, Some(0.5));
    }

    #[test]
    fn test_merge_rejects_repeated_id() {
        let batch = vec![Node::new(NodeId(7), "1a", 3), Node::new(NodeId(7), "1a", 4)];
        assert!(matches!(
            merge_batch(&rows(), &batch),
            Err(ChainError::DuplicateId { id: NodeId(7) })
        ));
    }

    #[test]
    fn test_merge_rejects_index_collision() {
        let batch = vec![Node::new(NodeId(9), "1a", 2)];
        match merge_batch(&rows(), &batch) {
            Err(ChainError::DuplicateIndex {
                rectifier,
                index,
                existing,
                incoming,
            }) => {
                assert_eq!(rectifier, "1a");
                assert_eq!(index, 2);
                assert_eq!(existing, NodeId(2));
                assert_eq!(incoming, NodeId(9));
            }
            other => panic!("expected DuplicateIndex, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_allows_same_index_in_other_rectifier() {
        let batch = vec![Node::new(NodeId(9), "2ab", 2)];
        assert!(merge_batch(&rows(), &batch).is_ok());
    }
}
