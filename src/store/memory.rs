//! In-process node store.

use crate::chain::{NewNode, Node};
use crate::error::Result;

use super::{last_id, merge_batch, next_id, NodeStore};

/// Node store held in memory, one per session or request.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<Node>,
    /// Highest id ever stored; ids are not handed out twice.
    last_id: u64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing records.
    pub fn with_nodes(nodes: Vec<Node>) -> Result<Self> {
        let mut store = Self::new();
        store.upsert(&nodes)?;
        Ok(store)
    }

    /// Number of stored nodes.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl NodeStore for MemoryStore {
    fn list_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.rows.clone())
    }

    fn upsert(&mut self, nodes: &[Node]) -> Result<()> {
        let merged = merge_batch(&self.rows, nodes)?;
        self.last_id = self.last_id.max(last_id(&merged));
        self.rows = merged;
        Ok(())
    }

    fn insert(&mut self, node: NewNode) -> Result<Node> {
        let id = next_id(&self.rows, self.last_id)?;
        let node = node.into_node(id);
        self.upsert(std::slice::from_ref(&node))?;
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::NodeId;
    use crate::error::ChainError;

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut store = MemoryStore::new();
        let a = store
            .insert(NewNode {
                rectifier: "1a".into(),
                index: 1,
                ..Default::default()
            })
            .unwrap();
        let b = store
            .insert(NewNode {
                rectifier: "1a".into(),
                index: 2,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(a.id, NodeId(1));
        assert_eq!(b.id, NodeId(2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_failed_upsert_leaves_store_untouched() {
        let mut store = MemoryStore::with_nodes(vec![
            Node::new(NodeId(1), "1a", 1).with_cable(1.0),
            Node::new(NodeId(2), "1a", 2),
        ])
        .unwrap();

        let batch = vec![
            Node::new(NodeId(1), "1a", 1).with_cable(9.0),
            Node::new(NodeId(3), "1a", 2),
        ];
        let err = store.upsert(&batch).unwrap_err();
        assert!(matches!(err, ChainError::DuplicateIndex { .. }));

        let rows = store.list_nodes().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cable_resistance, Some(1.0));
    }

    #[test]
    fn test_rejected_insert_does_not_burn_state() {
        let mut store = MemoryStore::with_nodes(vec![Node::new(NodeId(4), "1a", 1)]).unwrap();
        let clash = NewNode {
            rectifier: "1a".into(),
            index: 1,
            ..Default::default()
        };
        assert!(store.insert(clash).is_err());
        assert_eq!(store.len(), 1);

        let ok = store
            .insert(NewNode {
                rectifier: "1a".into(),
                index: 2,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ok.id, NodeId(5));
    }

    #[test]
    fn test_insert_past_last_id_is_an_error() {
        let mut store = MemoryStore::with_nodes(vec![Node::new(NodeId(u64::MAX), "1a", 1)]).unwrap();
        let err = store
            .insert(NewNode {
                rectifier: "1a".into(),
                index: 2,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, ChainError::IdsExhausted));
        assert_eq!(store.len(), 1);
    }
}
