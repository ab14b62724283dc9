// storefront/src/error.rs

//! Error taxonomy shared by every storefront operation.
//!
//! Store-level failures (`StoreError`) are translated into `ShopError` after the
//! fact: constraint violations become the matching conflict or validation entry,
//! everything else stays internal.

use crate::store::{constraints, StoreError};
use thiserror::Error;

/// Which business rule a `ShopError::Conflict` violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
  /// A unique key (username, category name, product name) is already taken.
  Duplicate,
  /// The row is still referenced by another table and cannot be deleted.
  Referenced,
  /// The user's balance does not cover the cart total.
  InsufficientFunds,
  /// The product is already in the user's cart.
  AlreadyInCart,
  /// A purchased product has no stock left.
  OutOfStock,
}

#[derive(Debug, Error)]
pub enum ShopError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {message}")]
  Conflict { kind: ConflictKind, message: String },

  #[error("Store Error: {0}")]
  Store(StoreError),

  #[error("Pipeline '{pipeline}' was halted before completion")]
  Halted { pipeline: String },
}

impl ShopError {
  pub fn validation(message: impl Into<String>) -> Self {
    ShopError::Validation(message.into())
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    ShopError::NotFound(message.into())
  }

  pub fn conflict(kind: ConflictKind, message: impl Into<String>) -> Self {
    ShopError::Conflict {
      kind,
      message: message.into(),
    }
  }

  /// The conflict kind, if this is a conflict.
  pub fn conflict_kind(&self) -> Option<ConflictKind> {
    match self {
      ShopError::Conflict { kind, .. } => Some(*kind),
      _ => None,
    }
  }

  /// True for failures the caller could not have caused (store outages, bugs).
  pub fn is_internal(&self) -> bool {
    matches!(self, ShopError::Store(_) | ShopError::Halted { .. })
  }
}

impl From<StoreError> for ShopError {
  fn from(err: StoreError) -> Self {
    match &err {
      StoreError::UniqueViolation { constraint } => match constraint.as_str() {
        constraints::USERS_USERNAME => {
          ShopError::conflict(ConflictKind::Duplicate, "A user with this username already exists.")
        }
        constraints::CATEGORIES_NAME => {
          ShopError::conflict(ConflictKind::Duplicate, "A category with this name already exists.")
        }
        constraints::PRODUCTS_NAME => {
          ShopError::conflict(ConflictKind::Duplicate, "A product with this name already exists.")
        }
        constraints::CARTS_USER_PRODUCT => {
          ShopError::conflict(ConflictKind::AlreadyInCart, "The product is already in the user's cart.")
        }
        _ => ShopError::conflict(ConflictKind::Duplicate, format!("Duplicate value violates '{}'.", constraint)),
      },
      StoreError::ForeignKeyViolation { constraint } => match constraint.as_str() {
        // Inserting or updating a product that points at a missing category.
        constraints::PRODUCTS_CATEGORY_FK => ShopError::validation("The specified category does not exist."),
        constraints::ORDER_LINE_ITEMS_PRODUCT_FK => ShopError::conflict(
          ConflictKind::Referenced,
          "The product cannot be deleted because it is referenced by orders.",
        ),
        constraints::ORDERS_USER_FK => ShopError::conflict(
          ConflictKind::Referenced,
          "The user cannot be deleted because it is referenced by orders.",
        ),
        _ => ShopError::conflict(
          ConflictKind::Referenced,
          format!("The row is still referenced ('{}').", constraint),
        ),
      },
      StoreError::CheckViolation { constraint } => match constraint.as_str() {
        constraints::PRODUCTS_STOCK_NON_NEGATIVE => {
          ShopError::conflict(ConflictKind::OutOfStock, "A product in the cart is out of stock.")
        }
        constraints::USERS_BALANCE_NON_NEGATIVE => ShopError::conflict(
          ConflictKind::InsufficientFunds,
          "The user does not have enough funds to purchase the items.",
        ),
        _ => ShopError::validation(format!("Value rejected by '{}'.", constraint)),
      },
      StoreError::Database(_) => {
        tracing::error!(error = %err, "Unexpected store failure");
        ShopError::Store(err)
      }
    }
  }
}

pub type ShopResult<T, E = ShopError> = std::result::Result<T, E>;
