// storefront/src/store/mod.rs

//! Store abstraction: a `Store` hands out `UnitOfWork`s, each of which is one
//! transactional scope exposing the per-table repositories.
//!
//! Repositories only read and write rows. The few guarded writes
//! (`debit_balance`, `decrement_stock`) report whether the guard let the
//! update through instead of deciding what that means.

pub mod constraints;
pub mod error;
pub mod memory;
pub mod postgres;

pub use error::{StoreError, StoreResult};
pub use memory::{MemorySnapshot, MemoryStore};
pub use postgres::PgStore;

use crate::error::ShopResult;
use crate::models::{
  CartLine, Category, NewCategory, NewLineItem, NewProduct, NewUser, Order, OrderLineItem, Product, ProductChanges,
  ProductFilter, User,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::warn;

#[async_trait]
pub trait UserRepository {
  async fn insert_user(&mut self, user: &NewUser) -> StoreResult<User>;
  async fn find_user(&mut self, id: i64) -> StoreResult<Option<User>>;
  /// Like `find_user`, but holds a row lock until the unit of work ends.
  async fn lock_user(&mut self, id: i64) -> StoreResult<Option<User>>;
  async fn list_users(&mut self) -> StoreResult<Vec<User>>;
  /// Subtracts `amount` only if the balance covers it. Returns whether the row changed.
  async fn debit_balance(&mut self, id: i64, amount: Decimal) -> StoreResult<bool>;
  async fn delete_user(&mut self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait CategoryRepository {
  async fn insert_category(&mut self, category: &NewCategory) -> StoreResult<Category>;
  async fn find_category(&mut self, id: i64) -> StoreResult<Option<Category>>;
  async fn list_categories(&mut self) -> StoreResult<Vec<Category>>;
  async fn delete_category(&mut self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait ProductRepository {
  async fn insert_product(&mut self, product: &NewProduct) -> StoreResult<Product>;
  async fn find_product(&mut self, id: i64) -> StoreResult<Option<Product>>;
  async fn list_products(&mut self, filter: &ProductFilter) -> StoreResult<Vec<Product>>;
  async fn update_product(&mut self, id: i64, changes: &ProductChanges) -> StoreResult<Option<Product>>;
  /// Takes one unit of stock only while stock is positive. Returns whether the row changed.
  async fn decrement_stock(&mut self, id: i64) -> StoreResult<bool>;
  async fn delete_product(&mut self, id: i64) -> StoreResult<bool>;
  async fn count_products_in_category(&mut self, category_id: i64) -> StoreResult<i64>;
}

#[async_trait]
pub trait CartRepository {
  async fn insert_cart_line(&mut self, user_id: i64, product_id: i64) -> StoreResult<CartLine>;
  async fn find_cart_line(&mut self, user_id: i64, product_id: i64) -> StoreResult<Option<CartLine>>;
  /// Cart rows of a user, oldest first.
  async fn list_cart_lines(&mut self, user_id: i64) -> StoreResult<Vec<CartLine>>;
  async fn delete_cart_line(&mut self, id: i64) -> StoreResult<bool>;
  async fn delete_cart_lines_for_user(&mut self, user_id: i64) -> StoreResult<u64>;
}

#[async_trait]
pub trait OrderRepository {
  async fn insert_order(&mut self, user_id: i64, total: Decimal) -> StoreResult<Order>;
  async fn insert_line_item(&mut self, item: &NewLineItem) -> StoreResult<OrderLineItem>;
  async fn list_orders(&mut self) -> StoreResult<Vec<Order>>;
  async fn list_line_items(&mut self, order_id: i64) -> StoreResult<Vec<OrderLineItem>>;
  async fn count_line_items_for_product(&mut self, product_id: i64) -> StoreResult<i64>;
  async fn count_orders_for_user(&mut self, user_id: i64) -> StoreResult<i64>;
}

/// One transactional scope. Every read and write made through it either
/// commits together or not at all; dropping it without `commit` discards it.
#[async_trait]
pub trait UnitOfWork:
  UserRepository + CategoryRepository + ProductRepository + CartRepository + OrderRepository + Send
{
  async fn commit(self: Box<Self>) -> StoreResult<()>;
  async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// Handle to the backing store, constructed once at startup and injected
/// wherever transactional scopes are needed.
#[async_trait]
pub trait Store: Send + Sync {
  async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;
  /// Releases pooled connections. Called once at shutdown.
  async fn close(&self);
}

/// Closes a unit of work exactly once: commit when `result` is `Ok`, roll back
/// otherwise. A failed rollback is logged and the original error wins.
pub async fn settle<T>(uow: Box<dyn UnitOfWork>, result: ShopResult<T>) -> ShopResult<T> {
  match result {
    Ok(value) => {
      uow.commit().await?;
      Ok(value)
    }
    Err(err) => {
      if let Err(rollback_err) = uow.rollback().await {
        warn!(error = %rollback_err, original_error = %err, "Rollback failed");
      }
      Err(err)
    }
  }
}
