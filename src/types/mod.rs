//! Shared data structures for the production-analysis pipeline
//!
//! - `production`: ProductionRecord (imported history with derived water fields)
//! - `methods`: Method, MethodResult, MethodResults, MethodSelection

mod production;
mod methods;

pub use production::*;
pub use methods::*;
