// storefront/src/pipeline/execution.rs

//! Contains `Pipeline::run()` and `Pipeline::run_atomic()`.

use super::control::{PipelineControl, PipelineResult};
use super::definition::Pipeline;
use crate::error::{ShopError, ShopResult};
use crate::store::{settle, Store, UnitOfWork};
use tracing::{event, instrument, span, Instrument, Level};

impl<C: Send> Pipeline<C> {
  /// Executes the steps in order against an already open unit of work.
  ///
  /// Stops at the first step that returns `PipelineControl::Stop` or an
  /// error. The unit of work is left open; closing it is the caller's job.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(pipeline = self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, uow: &mut dyn UnitOfWork, ctx: &mut C) -> ShopResult<PipelineResult> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::INFO,
        "pipeline_step_execution",
        step_name = step_def.name,
        step_index = step_idx
      );

      let outcome = (step_def.handler)(&mut *uow, &mut *ctx).instrument(step_span).await;
      match outcome {
        Ok(PipelineControl::Continue) => {
          event!(Level::DEBUG, step_name = step_def.name, "Step finished.");
        }
        Ok(PipelineControl::Stop) => {
          event!(Level::INFO, step_name = step_def.name, "Pipeline stopped by a step.");
          return Ok(PipelineResult::Stopped);
        }
        Err(e) => {
          if e.is_internal() {
            event!(Level::ERROR, step_name = step_def.name, error = %e, "Step failed.");
          } else {
            event!(Level::INFO, step_name = step_def.name, error = %e, "Step rejected the request.");
          }
          return Err(e);
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(PipelineResult::Completed)
  }

  /// Runs the pipeline inside its own transactional scope.
  ///
  /// The scope is committed only when every step completes; a stopped run or
  /// any error rolls it back, so no step's writes survive a failed run.
  pub async fn run_atomic(&self, store: &dyn Store, ctx: &mut C) -> ShopResult<()> {
    let mut uow = store.begin().await?;
    let result = match self.run(uow.as_mut(), ctx).await {
      Ok(PipelineResult::Completed) => Ok(()),
      Ok(PipelineResult::Stopped) => Err(ShopError::Halted {
        pipeline: self.name.to_string(),
      }),
      Err(e) => Err(e),
    };
    settle(uow, result).await
  }
}
