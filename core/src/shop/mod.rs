// storefront/src/shop/mod.rs

//! The `Shop` service: every storefront operation, each run inside exactly
//! one unit of work of the injected `Store`.
//!
//! Inputs are validated before a unit of work is opened. Reads and simple
//! writes go straight through the repositories; the cart and purchase
//! workflows are `Pipeline`s.

mod accounts;
mod cart;
mod catalog;
mod orders;
mod purchase;

use crate::store::Store;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Shop {
  store: Arc<dyn Store>,
}

impl Shop {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &dyn Store {
    self.store.as_ref()
  }
}

impl fmt::Debug for Shop {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Shop").finish_non_exhaustive()
  }
}
