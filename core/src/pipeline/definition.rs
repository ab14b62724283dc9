// storefront/src/pipeline/definition.rs

//! Contains the `Pipeline<C>` struct and its construction methods.

use super::step::{StepDef, StepHandler};

/// An ordered list of named steps operating on a context of type `C`.
pub struct Pipeline<C> {
  pub(crate) name: &'static str,
  pub(crate) steps: Vec<StepDef<C>>,
}

impl<C> Pipeline<C> {
  pub fn new(name: &'static str) -> Self {
    Self {
      name,
      steps: Vec::new(),
    }
  }

  /// Appends a step. Panics if a step with the same name already exists,
  /// since that is a programming error in the pipeline definition.
  pub fn step(mut self, name: &'static str, handler: StepHandler<C>) -> Self {
    if self.steps.iter().any(|s| s.name == name) {
      panic!(
        "Pipeline setup error: step '{}' already exists in pipeline '{}'.",
        name, self.name
      );
    }
    self.steps.push(StepDef { name, handler });
    self
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn step_names(&self) -> Vec<&'static str> {
    self.steps.iter().map(|s| s.name).collect()
  }
}

impl<C> std::fmt::Debug for Pipeline<C> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("name", &self.name)
      .field("steps", &self.step_names())
      .finish()
  }
}
