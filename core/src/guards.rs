// storefront/src/guards.rs

//! Referential-integrity checks run before a delete, inside the same unit of
//! work as the delete itself. The store's foreign keys stay in place as a
//! backstop; `on_delete` translates a violation that slips past a guard into
//! the same `Referenced` conflict.

use crate::error::{ConflictKind, ShopError, ShopResult};
use crate::store::{StoreError, UnitOfWork};

pub const CATEGORY_REFERENCED: &str = "The category cannot be deleted because it is referenced by products.";
pub const PRODUCT_REFERENCED: &str = "The product cannot be deleted because it is referenced by orders.";
pub const USER_REFERENCED: &str = "The user cannot be deleted because it is referenced by orders.";

pub async fn category_unreferenced(uow: &mut dyn UnitOfWork, category_id: i64) -> ShopResult<()> {
  if uow.count_products_in_category(category_id).await? > 0 {
    return Err(ShopError::conflict(ConflictKind::Referenced, CATEGORY_REFERENCED));
  }
  Ok(())
}

pub async fn product_unreferenced(uow: &mut dyn UnitOfWork, product_id: i64) -> ShopResult<()> {
  if uow.count_line_items_for_product(product_id).await? > 0 {
    return Err(ShopError::conflict(ConflictKind::Referenced, PRODUCT_REFERENCED));
  }
  Ok(())
}

pub async fn user_unreferenced(uow: &mut dyn UnitOfWork, user_id: i64) -> ShopResult<()> {
  if uow.count_orders_for_user(user_id).await? > 0 {
    return Err(ShopError::conflict(ConflictKind::Referenced, USER_REFERENCED));
  }
  Ok(())
}

/// Error mapper for delete statements: a foreign-key violation means the row
/// is still referenced, whatever constraint reported it.
pub fn on_delete(message: &'static str) -> impl Fn(StoreError) -> ShopError {
  move |err| match err {
    StoreError::ForeignKeyViolation { .. } => ShopError::conflict(ConflictKind::Referenced, message),
    other => ShopError::from(other),
  }
}
