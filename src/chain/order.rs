//! Chain selection and ordering.

use super::Node;

/// Select one rectifier's nodes, farthest from the source first.
///
/// The sort is stable: nodes that share an index keep the order they had
/// in `nodes`. Gaps in the index sequence do not matter, only relative
/// order does.
pub fn order_group<'a>(nodes: &'a [Node], rectifier: &str) -> Vec<&'a Node> {
    let mut chain: Vec<&Node> = nodes.iter().filter(|n| n.rectifier == rectifier).collect();
    chain.sort_by(|a, b| b.index.cmp(&a.index));
    chain
}

/// Distinct rectifiers in order of first appearance.
pub fn rectifiers(nodes: &[Node]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for node in nodes {
        if !seen.contains(&node.rectifier.as_str()) {
            seen.push(&node.rectifier);
        }
    }
    seen
}
