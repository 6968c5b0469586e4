//! Chain representation and checks.
//!
//! A chain is the set of [`Node`] records sharing one rectifier. Nodes are
//! stored unordered; [`order_group`] puts them in sweep order and
//! [`check_chain`] reports inputs a user will want to look at.

mod field;
mod order;
mod types;
mod validate;

pub use field::{parse_field_value, parse_value, Field, FieldEdit, Stage};
pub use order::{order_group, rectifiers};
pub use types::*;
pub use validate::{check_chain, ChainWarning};
