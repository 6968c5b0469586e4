//! Core types for the chain representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Field;

/// A stable identifier for a node record. Unique within a store, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read a stored value for arithmetic: absent or non-finite counts as 0.
pub fn reading(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// One anode-group position in a daisy chain.
///
/// Input fields are optional: a node can be saved half-filled and still
/// produce a best-effort result. The `voltage` and `ballast_*` fields are
/// the solver's last saved output, kept on the record for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Chain identifier; nodes sharing it are solved together.
    pub rectifier: String,
    /// Position along the chain, 1 next to the source.
    pub index: u32,
    /// Chainage marker such as `2+000`.
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub resistance_a: Option<f64>,
    #[serde(default)]
    pub resistance_b: Option<f64>,
    #[serde(default)]
    pub current_a: Option<f64>,
    #[serde(default)]
    pub current_b: Option<f64>,
    /// Cable between this node and its neighbour on the source side.
    #[serde(default)]
    pub cable_resistance: Option<f64>,

    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub ballast_a: Option<f64>,
    #[serde(default)]
    pub ballast_b: Option<f64>,
}

impl Node {
    /// Create a node with no readings.
    pub fn new(id: NodeId, rectifier: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            rectifier: rectifier.into(),
            index,
            label: String::new(),
            resistance_a: None,
            resistance_b: None,
            current_a: None,
            current_b: None,
            cable_resistance: None,
            voltage: None,
            ballast_a: None,
            ballast_b: None,
        }
    }

    /// Set the chainage label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set stage A resistance and current.
    pub fn with_branch_a(mut self, resistance: f64, current: f64) -> Self {
        self.resistance_a = Some(resistance);
        self.current_a = Some(current);
        self
    }

    /// Set stage B resistance and current.
    pub fn with_branch_b(mut self, resistance: f64, current: f64) -> Self {
        self.resistance_b = Some(resistance);
        self.current_b = Some(current);
        self
    }

    /// Set the source-side cable resistance.
    pub fn with_cable(mut self, resistance: f64) -> Self {
        self.cable_resistance = Some(resistance);
        self
    }

    /// Get an input field.
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::ResistanceA => self.resistance_a,
            Field::ResistanceB => self.resistance_b,
            Field::CurrentA => self.current_a,
            Field::CurrentB => self.current_b,
            Field::CableResistance => self.cable_resistance,
        }
    }

    /// Set an input field. Non-finite values clear it.
    ///
    /// Any change to an input makes the cached results stale, so they are
    /// dropped until the next save.
    pub fn set(&mut self, field: Field, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        let slot = match field {
            Field::ResistanceA => &mut self.resistance_a,
            Field::ResistanceB => &mut self.resistance_b,
            Field::CurrentA => &mut self.current_a,
            Field::CurrentB => &mut self.current_b,
            Field::CableResistance => &mut self.cable_resistance,
        };
        *slot = value;
        self.invalidate();
    }

    /// Drop cached results.
    pub fn invalidate(&mut self) {
        self.voltage = None;
        self.ballast_a = None;
        self.ballast_b = None;
    }

    /// Whether the node has cached results.
    pub fn has_results(&self) -> bool {
        self.voltage.is_some()
    }
}

/// A node as entered, before the store assigns it an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewNode {
    pub rectifier: String,
    pub index: u32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub resistance_a: Option<f64>,
    #[serde(default)]
    pub resistance_b: Option<f64>,
    #[serde(default)]
    pub current_a: Option<f64>,
    #[serde(default)]
    pub current_b: Option<f64>,
    #[serde(default)]
    pub cable_resistance: Option<f64>,
}

impl NewNode {
    /// Attach an id.
    pub fn into_node(self, id: NodeId) -> Node {
        let mut node = Node::new(id, self.rectifier, self.index).with_label(self.label);
        node.resistance_a = self.resistance_a.filter(|v| v.is_finite());
        node.resistance_b = self.resistance_b.filter(|v| v.is_finite());
        node.current_a = self.current_a.filter(|v| v.is_finite());
        node.current_b = self.current_b.filter(|v| v.is_finite());
        node.cable_resistance = self.cable_resistance.filter(|v| v.is_finite());
        node
    }
}
