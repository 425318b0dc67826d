// cartflow/src/lib.rs

//! cartflow: a small asynchronous step pipeline engine.
//!
//! A pipeline is an ordered list of named steps. Each step carries `before`,
//! `on` and `after` handlers that operate on a shared [`ContextData`]. Handlers
//! may stop the pipeline early or fail it with the pipeline's error type.
//! Pipelines are registered in a [`FlowRegistry`], keyed by the type of data
//! they operate on, and run by handing the registry a context of that type.

pub mod context;
pub mod control;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod step;

pub use crate::context::ContextData;
pub use crate::control::{PipelineControl, PipelineResult};
pub use crate::error::{FlowError, FlowResult};
pub use crate::pipeline::{Handler, Phase, Pipeline};
pub use crate::registry::FlowRegistry;
pub use crate::step::{SkipCondition, StepDef};
