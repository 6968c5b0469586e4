//! Interactive calculator state.
//!
//! A [`Session`] owns the node list being edited and the store it came
//! from. Edits change only the in-memory copy; [`Session::solution`] always
//! recomputes from scratch, and nothing reaches the store until
//! [`Session::save`].

use crate::chain::{check_chain, rectifiers, ChainWarning, FieldEdit, NewNode, Node, NodeId};
use crate::error::{ChainError, Result};
use crate::solver::{solve, ChainSolution};
use crate::store::NodeStore;

/// Editing session over one node store.
#[derive(Debug)]
pub struct Session<S: NodeStore> {
    store: S,
    nodes: Vec<Node>,
    selected: Option<String>,
}

impl<S: NodeStore> Session<S> {
    /// Load every node and select the first listed rectifier.
    pub fn open(store: S) -> Result<Self> {
        let nodes = store.list_nodes()?;
        let selected = nodes.first().map(|n| n.rectifier.clone());
        tracing::debug!(nodes = nodes.len(), ?selected, "session opened");
        Ok(Self {
            store,
            nodes,
            selected,
        })
    }

    /// Re-read the store, dropping unsaved edits.
    ///
    /// The selection survives if its rectifier still exists.
    pub fn reload(&mut self) -> Result<()> {
        self.nodes = self.store.list_nodes()?;
        let still_there = self
            .selected
            .as_deref()
            .is_some_and(|r| self.nodes.iter().any(|n| n.rectifier == r));
        if !still_there {
            self.selected = self.nodes.first().map(|n| n.rectifier.clone());
        }
        Ok(())
    }

    /// All nodes, including unsaved edits.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Find a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Distinct rectifiers, in store order.
    pub fn rectifiers(&self) -> Vec<&str> {
        rectifiers(&self.nodes)
    }

    /// The rectifier being worked on.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Switch to another rectifier.
    pub fn select(&mut self, rectifier: &str) -> Result<()> {
        if !self.nodes.iter().any(|n| n.rectifier == rectifier) {
            return Err(ChainError::unknown_rectifier(rectifier));
        }
        self.selected = Some(rectifier.to_string());
        Ok(())
    }

    /// Apply one field edit to the in-memory copy.
    ///
    /// Cached results of the whole chain are dropped until the next save.
    pub fn apply_edit(&mut self, edit: FieldEdit) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == edit.id)
            .ok_or(ChainError::NodeNotFound { id: edit.id })?;
        node.set(edit.field, edit.value);
        let rectifier = node.rectifier.clone();

        // Every node of the chain depends on every other node's inputs.
        for node in self.nodes.iter_mut().filter(|n| n.rectifier == rectifier) {
            node.invalidate();
        }
        tracing::trace!(id = %edit.id, field = %edit.field, value = ?edit.value, "field edited");
        Ok(())
    }

    /// Solve the selected rectifier. Empty when nothing is selected.
    pub fn solution(&self) -> ChainSolution {
        match &self.selected {
            Some(rectifier) => solve(&self.nodes, rectifier),
            None => ChainSolution::default(),
        }
    }

    /// Checks for the selected rectifier.
    pub fn warnings(&self) -> Vec<ChainWarning> {
        check_chain(&self.nodes, &self.solution())
    }

    /// The selected chain's nodes with fresh results filled in, ready to
    /// be written back.
    pub fn records(&self) -> Vec<Node> {
        let solution = self.solution();
        solution
            .display_order()
            .filter_map(|result| {
                let mut node = self.node(result.id)?.clone();
                node.voltage = Some(result.voltage);
                node.ballast_a = result.ballast_a;
                node.ballast_b = result.ballast_b;
                Some(node)
            })
            .collect()
    }

    /// Write the selected chain, inputs and results, in one upsert.
    ///
    /// Returns the number of rows written; an empty chain leaves the store
    /// alone. On failure nothing in the session changes and the solution is
    /// still available.
    pub fn save(&mut self) -> Result<usize> {
        let records = self.records();
        if records.is_empty() {
            return Ok(0);
        }
        if let Err(e) = self.store.upsert(&records) {
            tracing::warn!(error = %e, "save rejected");
            return Err(e);
        }

        for record in &records {
            if let Some(node) = self.nodes.iter_mut().find(|n| n.id == record.id) {
                *node = record.clone();
            }
        }
        tracing::info!(
            rectifier = self.selected.as_deref().unwrap_or_default(),
            rows = records.len(),
            "results saved"
        );
        Ok(records.len())
    }

    /// Enter a new node through the store.
    pub fn add_node(&mut self, node: NewNode) -> Result<Node> {
        let node = self.store.insert(node)?;
        self.nodes.push(node.clone());
        self.nodes.sort_by_key(|n| n.id);
        if self.selected.is_none() {
            self.selected = Some(node.rectifier.clone());
        }
        Ok(node)
    }
}
