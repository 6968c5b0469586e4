//! Rectifier output derived from the swept chain.

use serde::{Deserialize, Serialize};

use super::NodeResult;

/// What the rectifier must supply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceQuantities {
    /// Required output voltage (volts).
    pub voltage: f64,
    /// Total output current (amps).
    pub current: f64,
}

/// Read the source quantities off the nearest node.
///
/// `results` must be in sweep order, so the nearest node is the last one.
/// An empty chain needs nothing from the source.
pub fn derive_source_quantities(results: &[NodeResult]) -> SourceQuantities {
    match results.last() {
        Some(nearest) => SourceQuantities {
            voltage: nearest.voltage + nearest.cable_drop,
            current: nearest.link_current,
        },
        None => SourceQuantities::default(),
    }
}
