//! Multi-statement execution pipeline.
//!
//! Runs a batch of candidate statements through validation, permission
//! gating, and execution, then assembles the response payload including
//! post-mutation table snapshots.

mod executor;
mod response;

pub use executor::run_batch;
pub use response::{
    assemble, BatchResponse, StatementResult, StatementStatus, TableSnapshot,
};
