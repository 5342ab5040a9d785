//! Secondary graphs derived from build metadata and the native tree.
//!
//! - [`ControlFlowSynthesizer`] - function-level call graph (CFG diagram)
//! - [`DataDependencySynthesizer`] - definition-to-use graph (DDG diagram)

mod cfg;
mod ddg;

pub use cfg::{ControlFlowSynthesizer, GLOBAL_LABEL, NO_FUNCTIONS_LABEL};
pub use ddg::{DataDependencySynthesizer, NO_DEPENDENCIES_LABEL};
