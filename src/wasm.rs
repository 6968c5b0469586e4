//! WASM bindings for Daisychain Core.
//!
//! This module lets a browser form run the solver locally. The host page
//! keeps ownership of persistence: it hands in the rows it loaded and takes
//! back [`records`](WasmChainSolver::records) to write them.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmChainSolver } from 'daisychain_core';
//!
//! await init();
//!
//! const solver = new WasmChainSolver(JSON.stringify(rows));
//! solver.set_field(4, 'ia', 0.35);
//! const solution = JSON.parse(solver.solve('1a'));
//! await db.upsert(JSON.parse(solver.records('1a')));
//! ```

use wasm_bindgen::prelude::*;

use crate::chain::{Field, FieldEdit, Node, NodeId};
use crate::error::ChainError;
use crate::session::Session;
use crate::store::MemoryStore;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible chain solver over an in-memory node list.
#[wasm_bindgen]
pub struct WasmChainSolver {
    session: Session<MemoryStore>,
}

#[wasm_bindgen]
impl WasmChainSolver {
    /// Create a solver from a JSON array of node records.
    #[wasm_bindgen(constructor)]
    pub fn new(nodes_json: &str) -> Result<WasmChainSolver, JsValue> {
        let nodes: Vec<Node> = serde_json::from_str(nodes_json).map_err(to_js)?;
        let store = MemoryStore::with_nodes(nodes).map_err(to_js)?;
        let session = Session::open(store).map_err(to_js)?;
        Ok(WasmChainSolver { session })
    }

    /// Rectifier names, in input order.
    #[wasm_bindgen]
    pub fn rectifiers(&self) -> Vec<String> {
        self.session
            .rectifiers()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Edit one input field. `NaN` clears it, as an emptied number input does.
    #[wasm_bindgen]
    pub fn set_field(&mut self, id: u64, field: &str, value: f64) -> Result<(), JsValue> {
        let field: Field = field.parse().map_err(to_js)?;
        self.session
            .apply_edit(FieldEdit {
                id: NodeId(id),
                field,
                value: Some(value),
            })
            .map_err(to_js)
    }

    /// Solve a rectifier; returns the solution and its warnings as JSON.
    #[wasm_bindgen]
    pub fn solve(&mut self, rectifier: &str) -> Result<String, JsValue> {
        self.session.select(rectifier).map_err(to_js)?;
        let report = serde_json::json!({
            "solution": self.session.solution(),
            "warnings": self.session.warnings(),
        });
        Ok(report.to_string())
    }

    /// Rows of a rectifier with fresh results, ready to upsert, as JSON.
    #[wasm_bindgen]
    pub fn records(&mut self, rectifier: &str) -> Result<String, JsValue> {
        self.session.select(rectifier).map_err(to_js)?;
        serde_json::to_string(&self.session.records()).map_err(|e| {
            to_js(ChainError::WasmError {
                message: e.to_string(),
            })
        })
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
