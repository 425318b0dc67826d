// cartflow/src/pipeline/mod.rs

//! The `Pipeline<TData, Err>` type: step definitions, handler registration and
//! execution.

mod definition;
mod execution;

pub use definition::{Handler, Phase, Pipeline};
