// storefront/src/pipeline/step.rs

//! A single named step of a pipeline.

use super::PipelineControl;
use crate::error::ShopResult;
use crate::store::UnitOfWork;
use futures_util::future::BoxFuture;

/// Handler of one step. It receives the open unit of work and the
/// pipeline's context, and may read or write both.
///
/// Plain `fn` items with the shape
/// `fn step<'a>(uow: &'a mut dyn UnitOfWork, ctx: &'a mut C) -> BoxFuture<'a, ShopResult<PipelineControl>>`
/// coerce to this type.
pub type StepHandler<C> =
  for<'a> fn(&'a mut dyn UnitOfWork, &'a mut C) -> BoxFuture<'a, ShopResult<PipelineControl>>;

pub struct StepDef<C> {
  pub name: &'static str,
  pub handler: StepHandler<C>,
}

impl<C> Clone for StepDef<C> {
  fn clone(&self) -> Self {
    Self {
      name: self.name,
      handler: self.handler,
    }
  }
}

impl<C> std::fmt::Debug for StepDef<C> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef").field("name", &self.name).finish()
  }
}
