//! The backward sweep.
//!
//! Current flows source -> node 1 -> node 2 -> ... -> terminating node, but
//! the only node whose voltage is fixed by its own loads is the terminating
//! one. So the sweep starts there and walks toward the source, adding each
//! crossed cable's drop to the voltage and each node's branch currents to the
//! link current.

use serde::{Deserialize, Serialize};

use crate::chain::{reading, Node, NodeId};

/// Derived quantities for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    pub id: NodeId,
    pub index: u32,
    /// Voltage the node must sit at.
    pub voltage: f64,
    /// Ballast for stage A; `None` when stage A carries no current.
    pub ballast_a: Option<f64>,
    /// Ballast for stage B; `None` when stage B carries no current.
    pub ballast_b: Option<f64>,
    /// Total current on the cable feeding this node from the source side.
    pub link_current: f64,
    /// Voltage drop across that cable.
    pub cable_drop: f64,
}

impl NodeResult {
    /// Whether either computed ballast is negative.
    pub fn is_infeasible(&self) -> bool {
        self.ballast_a.is_some_and(|r| r < 0.0) || self.ballast_b.is_some_and(|r| r < 0.0)
    }
}

/// State handed from a node to its source-side neighbour.
#[derive(Debug, Clone, Copy, Default)]
struct Carry {
    voltage: f64,
    link_current: f64,
    cable_drop: f64,
}

/// Resistor that makes `current` flow through `resistance` at `voltage`.
fn ballast(voltage: f64, current: f64, resistance: f64) -> Option<f64> {
    if current > 0.0 {
        Some(voltage / current - resistance)
    } else {
        None
    }
}

/// Run the sweep over a chain ordered farthest first.
///
/// Returns one result per node in the same order. Negative ballasts are
/// returned as computed.
pub fn backward_sweep(chain: &[&Node]) -> Vec<NodeResult> {
    let mut results = Vec::with_capacity(chain.len());
    let mut carry = Carry::default();

    for (step, node) in chain.iter().enumerate() {
        let ia = reading(node.current_a);
        let ib = reading(node.current_b);
        let ra = reading(node.resistance_a);
        let rb = reading(node.resistance_b);

        let voltage = if step == 0 {
            // Terminating node: the more demanding branch sets the voltage.
            (ia * ra).max(ib * rb)
        } else {
            carry.voltage + carry.cable_drop
        };

        let link_current = ia + ib + carry.link_current;
        let cable_drop = link_current * reading(node.cable_resistance);

        results.push(NodeResult {
            id: node.id,
            index: node.index,
            voltage,
            ballast_a: ballast(voltage, ia, ra),
            ballast_b: ballast(voltage, ib, rb),
            link_current,
            cable_drop,
        });

        carry = Carry {
            voltage,
            link_current,
            cable_drop,
        };
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_node() {
        let node = Node::new(NodeId(1), "1a", 1)
            .with_branch_a(3.0, 2.0)
            .with_branch_b(10.0, 1.0);
        let results = backward_sweep(&[&node]);

        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert!((r.voltage - 10.0).abs() < 1e-12);
        assert!((r.ballast_a.unwrap() - 2.0).abs() < 1e-12);
        assert!((r.ballast_b.unwrap() - 0.0).abs() < 1e-12);
        assert!((r.link_current - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_ballast_is_kept() {
        // Stage A needs 6 V, stage B only 5 V.
        let node = Node::new(NodeId(1), "1a", 1)
            .with_branch_a(3.0, 2.0)
            .with_branch_b(10.0, 0.5);
        let r = &backward_sweep(&[&node])[0];
        assert!((r.voltage - 6.0).abs() < 1e-12);
        assert_eq!(r.ballast_a, Some(0.0));
        assert!((r.ballast_b.unwrap() - 2.0).abs() < 1e-12);

        let node = Node::new(NodeId(2), "1a", 2)
            .with_branch_a(3.0, 2.0)
            .with_branch_b(10.0, 1.0);
        let far = Node::new(NodeId(3), "1a", 3).with_branch_a(1.0, 1.0);
        let results = backward_sweep(&[&far, &node]);
        // Node 2 sits at 1 V but stage A needs 6 V.
        assert!(results[1].ballast_a.unwrap() < 0.0);
        assert!(results[1].is_infeasible());
    }

    #[test]
    fn test_zero_current_has_no_ballast() {
        let node = Node::new(NodeId(1), "1a", 1)
            .with_branch_a(5.0, 1.0)
            .with_branch_b(4.0, 0.0);
        let r = &backward_sweep(&[&node])[0];
        assert_eq!(r.ballast_b, None);
        assert_eq!(r.ballast_a, Some(0.0));
    }

    #[test]
    fn test_empty_readings_are_zero() {
        let node = Node::new(NodeId(1), "1a", 1);
        let r = &backward_sweep(&[&node])[0];
        assert_eq!(r.voltage, 0.0);
        assert_eq!(r.ballast_a, None);
        assert_eq!(r.ballast_b, None);
        assert_eq!(r.link_current, 0.0);
        assert_eq!(r.cable_drop, 0.0);
    }

    #[test]
    fn test_empty_chain() {
        assert!(backward_sweep(&[]).is_empty());
    }
}
