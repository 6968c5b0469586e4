//! Whole-chain solve.

use serde::{Deserialize, Serialize};

use crate::chain::{order_group, Node, NodeId};

use super::{backward_sweep, derive_source_quantities, NodeResult, SourceQuantities};

/// Everything computed for one rectifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainSolution {
    pub rectifier: String,
    /// Per-node results, farthest from the source first.
    pub nodes: Vec<NodeResult>,
    pub source: SourceQuantities,
}

impl ChainSolution {
    /// Results nearest the source first, the order a chain is drawn in.
    pub fn display_order(&self) -> impl Iterator<Item = &NodeResult> {
        self.nodes.iter().rev()
    }

    /// Find the result for a node.
    pub fn result(&self, id: NodeId) -> Option<&NodeResult> {
        self.nodes.iter().find(|r| r.id == id)
    }

    /// Whether the rectifier had no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Solve one rectifier's chain out of the full node collection.
///
/// Pure: `nodes` is not modified and the same input always gives the same
/// output.
pub fn solve(nodes: &[Node], rectifier: &str) -> ChainSolution {
    let _span = tracing::debug_span!("solve", rectifier).entered();

    let chain = order_group(nodes, rectifier);
    let results = backward_sweep(&chain);
    let source = derive_source_quantities(&results);

    tracing::debug!(
        nodes = results.len(),
        source_voltage = source.voltage,
        source_current = source.current,
        "chain solved"
    );

    ChainSolution {
        rectifier: rectifier.to_string(),
        nodes: results,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_chain() -> Vec<Node> {
        vec![
            Node::new(NodeId(1), "1a", 1)
                .with_branch_a(5.0, 1.0)
                .with_branch_b(0.0, 0.0)
                .with_cable(2.0),
            Node::new(NodeId(2), "1a", 2)
                .with_branch_a(4.0, 3.0)
                .with_branch_b(1.0, 1.0)
                .with_cable(1.0),
        ]
    }

    #[test]
    fn test_two_node_chain() {
        let nodes = two_node_chain();
        let solution = solve(&nodes, "1a");

        let far = &solution.nodes[0];
        assert_eq!(far.index, 2);
        assert!((far.voltage - 12.0).abs() < 1e-12);
        assert!((far.link_current - 4.0).abs() < 1e-12);
        assert!((far.cable_drop - 4.0).abs() < 1e-12);

        let near = &solution.nodes[1];
        assert_eq!(near.index, 1);
        assert!((near.voltage - 16.0).abs() < 1e-12);
        assert!((near.link_current - 5.0).abs() < 1e-12);
        assert!((near.cable_drop - 10.0).abs() < 1e-12);
        assert!((near.ballast_a.unwrap() - 11.0).abs() < 1e-12);
        assert_eq!(near.ballast_b, None);

        assert!((solution.source.voltage - 26.0).abs() < 1e-12);
        assert!((solution.source.current - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_display_order_nearest_first() {
        let nodes = two_node_chain();
        let solution = solve(&nodes, "1a");
        let indices: Vec<u32> = solution.display_order().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut nodes = two_node_chain();
        let a = solve(&nodes, "1a");
        nodes.reverse();
        let b = solve(&nodes, "1a");
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_group() {
        let nodes = two_node_chain();
        let solution = solve(&nodes, "other");
        assert!(solution.is_empty());
        assert_eq!(solution.source, SourceQuantities::default());
    }
}
