//! Chain solver.
//!
//! This module turns measured branch readings into the ballast resistors and
//! rectifier output that make those readings happen.
//!
//! ## Chain model
//!
//! ```text
//!          Rc(1)          Rc(2)                  Rc(n)
//! Source ---/\/\--- N1 ---/\/\--- N2 --- ... ---/\/\--- Nn
//!                  |  |          |  |                  |  |
//!               Ra+RA Rb+RB   Ra+RA Rb+RB          Ra+RA Rb+RB
//! ```
//!
//! Each node has two parallel branches, each a measured resistance in series
//! with a ballast (`RA`, `RB`). The solve is a single pass, no iteration:
//!
//! 1. [`order_group`](crate::chain::order_group): pick one rectifier, farthest node first
//! 2. [`backward_sweep`]: node voltages, ballasts and link currents
//! 3. [`derive_source_quantities`]: rectifier voltage and current
//!
//! [`solve`] composes the three.

mod solution;
mod source;
mod sweep;

pub use solution::{solve, ChainSolution};
pub use source::{derive_source_quantities, SourceQuantities};
pub use sweep::{backward_sweep, NodeResult};
