//! # Daisychain Core
//!
//! Ballast and rectifier sizing for daisy-chained cathodic protection anode
//! beds.
//!
//! A rectifier feeds a chain of anode beds (nodes) wired in series by
//! cables. Each node splits into two parallel stages, A and B, whose
//! resistance and current are measured in the field. To make every stage
//! draw its measured current, each stage gets a series ballast resistor
//! (the "reo"). This library computes those ballasts, the voltage
//! at every node, and the voltage and current the rectifier has to deliver.
//!
//! ## Architecture
//!
//! - [`chain`] - Node records, editable fields, ordering and checks
//! - [`solver`] - The backward sweep and source quantities
//! - [`store`] - Node persistence (in memory or a JSON file)
//! - [`session`] - Editing state: select, edit, recompute, save
//! - [`report`] - Fixed-precision table and CSV output
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! daisychain --store chain.json solve --rectifier 1a
//! daisychain --store chain.json set 4 ia 0.35
//! ```
//!
//! ### Library
//!
//! ```
//! use daisychain_core::chain::{Node, NodeId};
//! use daisychain_core::solve;
//!
//! let nodes = vec![
//!     Node::new(NodeId(1), "1a", 1).with_branch_a(5.0, 1.0).with_cable(2.0),
//!     Node::new(NodeId(2), "1a", 2)
//!         .with_branch_a(4.0, 3.0)
//!         .with_branch_b(1.0, 1.0)
//!         .with_cable(1.0),
//! ];
//! let solution = solve(&nodes, "1a");
//! assert_eq!(solution.source.voltage, 26.0);
//! assert_eq!(solution.source.current, 5.0);
//! ```
//!
//! ## Solution Method
//!
//! Only the terminating node's voltage is fixed by its own loads: it must
//! drive the more demanding of its two stages. Walking back toward the
//! rectifier, each node sits at the farther node's voltage plus the drop on
//! the cable between them, and each cable carries the sum of every branch
//! current beyond it. One pass, no iteration.

pub mod chain;
pub mod error;
pub mod report;
pub mod session;
pub mod solver;
pub mod store;

// Re-export main types for convenience
pub use chain::{Node, NodeId};
pub use error::{ChainError, Result};
pub use session::Session;
pub use solver::{solve, ChainSolution};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmChainSolver;

/// Default node store file name.
pub const DEFAULT_STORE_FILE: &str = "chain.json";
