//! Chain checks.
//!
//! The solver computes whatever the inputs imply. These checks point out the
//! inputs and results that deserve a second look; none of them stop a solve.

use std::fmt;

use serde::Serialize;

use super::{order_group, Field, Node, NodeId, Stage};
use crate::solver::ChainSolution;

/// Something about a chain worth flagging to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainWarning {
    /// Two nodes share a position; they are swept in store order.
    DuplicateIndex { index: u32, nodes: Vec<NodeId> },
    /// Indices skip a value.
    IndexGap { after: u32, before: u32 },
    /// The node next to the source is not numbered 1.
    NearestNotFirst { index: u32 },
    /// A branch has only one of its two readings.
    MissingReading { id: NodeId, field: Field },
    /// A resistance or current was entered as a negative number.
    NegativeInput { id: NodeId, field: Field, value: f64 },
    /// A computed ballast is negative: the measured current cannot flow at
    /// the available voltage.
    InfeasibleBallast { id: NodeId, stage: Stage, value: f64 },
}

impl fmt::Display for ChainWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainWarning::DuplicateIndex { index, nodes } => {
                let ids: Vec<String> = nodes.iter().map(ToString::to_string).collect();
                write!(f, "index {} is used by nodes {}", index, ids.join(", "))
            }
            ChainWarning::IndexGap { after, before } => {
                write!(f, "no node between index {} and {}", after, before)
            }
            ChainWarning::NearestNotFirst { index } => {
                write!(f, "nearest node has index {}, expected 1", index)
            }
            ChainWarning::MissingReading { id, field } => {
                write!(f, "node {}: {} has no reading", id, field)
            }
            ChainWarning::NegativeInput { id, field, value } => {
                write!(f, "node {}: {} is negative ({} {})", id, field, value, field.unit())
            }
            ChainWarning::InfeasibleBallast { id, stage, value } => {
                write!(f, "node {}: ballast {} is negative ({:.3} Ω)", id, stage, value)
            }
        }
    }
}

/// Check one rectifier's inputs and its solution.
pub fn check_chain(nodes: &[Node], solution: &ChainSolution) -> Vec<ChainWarning> {
    let mut warnings = Vec::new();
    let chain = order_group(nodes, &solution.rectifier);

    // Positions, nearest first
    let mut position = chain.iter().rev().peekable();
    if let Some(nearest) = position.peek() {
        if nearest.index != 1 {
            warnings.push(ChainWarning::NearestNotFirst {
                index: nearest.index,
            });
        }
    }
    let mut previous: Option<&Node> = None;
    for node in position {
        if let Some(prev) = previous {
            if node.index == prev.index {
                match warnings.last_mut() {
                    Some(ChainWarning::DuplicateIndex { index, nodes: ids }) if *index == node.index => {
                        ids.push(node.id);
                    }
                    _ => warnings.push(ChainWarning::DuplicateIndex {
                        index: node.index,
                        nodes: vec![prev.id, node.id],
                    }),
                }
            } else if node.index > prev.index + 1 {
                warnings.push(ChainWarning::IndexGap {
                    after: prev.index,
                    before: node.index,
                });
            }
        }
        previous = Some(*node);
    }

    // Readings
    for node in chain.iter().rev() {
        for (resistance, current) in [
            (Field::ResistanceA, Field::CurrentA),
            (Field::ResistanceB, Field::CurrentB),
        ] {
            match (node.get(resistance), node.get(current)) {
                (Some(_), None) => warnings.push(ChainWarning::MissingReading {
                    id: node.id,
                    field: current,
                }),
                (None, Some(_)) => warnings.push(ChainWarning::MissingReading {
                    id: node.id,
                    field: resistance,
                }),
                _ => {}
            }
        }
        for field in Field::ALL {
            if let Some(value) = node.get(field).filter(|v| *v < 0.0) {
                warnings.push(ChainWarning::NegativeInput {
                    id: node.id,
                    field,
                    value,
                });
            }
        }
    }

    // Results
    for result in solution.display_order().filter(|r| r.is_infeasible()) {
        for (stage, ballast) in [(Stage::A, result.ballast_a), (Stage::B, result.ballast_b)] {
            if let Some(value) = ballast.filter(|r| *r < 0.0) {
                warnings.push(ChainWarning::InfeasibleBallast {
                    id: result.id,
                    stage,
                    value,
                });
            }
        }
    }

    warnings
}
