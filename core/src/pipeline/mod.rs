// storefront/src/pipeline/mod.rs

//! A small named-step executor. A `Pipeline<C>` runs its steps in order
//! against one unit of work and a context `C`; `run_atomic` wraps the run in
//! its own transactional scope.

pub mod control;
pub mod definition;
pub mod execution;
pub mod step;

pub use control::{PipelineControl, PipelineResult};
pub use definition::Pipeline;
pub use step::{StepDef, StepHandler};
