// storefront/src/store/memory.rs

//! In-memory store for tests and local runs.
//!
//! `begin` takes the single table lock and hands out a private copy of every
//! table; `commit` publishes the copy, dropping the unit of work discards it.
//! Units of work are therefore fully serialized. The same unique, foreign-key
//! and check constraints as the PostgreSQL schema are enforced and reported
//! under the same constraint names.

use super::{
  constraints, CartRepository, CategoryRepository, OrderRepository, ProductRepository, Store, StoreError,
  StoreResult, UnitOfWork, UserRepository,
};
use crate::models::{
  CartLine, Category, NewCategory, NewLineItem, NewProduct, NewUser, Order, OrderLineItem, Product, ProductChanges,
  ProductFilter, User,
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Full contents of a `MemoryStore` at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySnapshot {
  pub users: BTreeMap<i64, User>,
  pub categories: BTreeMap<i64, Category>,
  pub products: BTreeMap<i64, Product>,
  pub carts: BTreeMap<i64, CartLine>,
  pub orders: BTreeMap<i64, Order>,
  pub line_items: BTreeMap<i64, OrderLineItem>,
  next_id: i64,
}

impl MemorySnapshot {
  fn next_id(&mut self) -> i64 {
    self.next_id += 1;
    self.next_id
  }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<Mutex<MemorySnapshot>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Copy of the committed state. Waits for any open unit of work to finish.
  pub async fn snapshot(&self) -> MemorySnapshot {
    self.tables.lock().await.clone()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
    let committed = Arc::clone(&self.tables).lock_owned().await;
    let working = committed.clone();
    Ok(Box::new(MemoryUnitOfWork { committed, working }))
  }

  async fn close(&self) {}
}

pub struct MemoryUnitOfWork {
  committed: OwnedMutexGuard<MemorySnapshot>,
  working: MemorySnapshot,
}

fn unique(constraint: &str) -> StoreError {
  StoreError::UniqueViolation {
    constraint: constraint.to_string(),
  }
}

fn foreign_key(constraint: &str) -> StoreError {
  StoreError::ForeignKeyViolation {
    constraint: constraint.to_string(),
  }
}

fn check(constraint: &str) -> StoreError {
  StoreError::CheckViolation {
    constraint: constraint.to_string(),
  }
}

impl MemoryUnitOfWork {
  fn check_product_row(&self, product: &Product) -> StoreResult<()> {
    if product.stock < 0 {
      return Err(check(constraints::PRODUCTS_STOCK_NON_NEGATIVE));
    }
    if !self.working.categories.contains_key(&product.category_id) {
      return Err(foreign_key(constraints::PRODUCTS_CATEGORY_FK));
    }
    let name_taken = self
      .working
      .products
      .values()
      .any(|other| other.id != product.id && other.name == product.name);
    if name_taken {
      return Err(unique(constraints::PRODUCTS_NAME));
    }
    Ok(())
  }
}

#[async_trait]
impl UserRepository for MemoryUnitOfWork {
  async fn insert_user(&mut self, user: &NewUser) -> StoreResult<User> {
    if self.working.users.values().any(|u| u.username == user.username) {
      return Err(unique(constraints::USERS_USERNAME));
    }
    if user.account_balance < Decimal::ZERO {
      return Err(check(constraints::USERS_BALANCE_NON_NEGATIVE));
    }
    let now = Utc::now();
    let row = User {
      id: self.working.next_id(),
      username: user.username.clone(),
      account_balance: user.account_balance,
      created_at: now,
      updated_at: now,
    };
    self.working.users.insert(row.id, row.clone());
    Ok(row)
  }

  async fn find_user(&mut self, id: i64) -> StoreResult<Option<User>> {
    Ok(self.working.users.get(&id).cloned())
  }

  async fn lock_user(&mut self, id: i64) -> StoreResult<Option<User>> {
    // The whole store is already locked for this unit of work.
    self.find_user(id).await
  }

  async fn list_users(&mut self) -> StoreResult<Vec<User>> {
    Ok(self.working.users.values().cloned().collect())
  }

  async fn debit_balance(&mut self, id: i64, amount: Decimal) -> StoreResult<bool> {
    match self.working.users.get_mut(&id) {
      Some(user) if user.account_balance >= amount => {
        user.account_balance -= amount;
        user.updated_at = Utc::now();
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  async fn delete_user(&mut self, id: i64) -> StoreResult<bool> {
    if !self.working.users.contains_key(&id) {
      return Ok(false);
    }
    if self.working.orders.values().any(|o| o.user_id == id) {
      return Err(foreign_key(constraints::ORDERS_USER_FK));
    }
    self.working.carts.retain(|_, line| line.user_id != id);
    self.working.users.remove(&id);
    Ok(true)
  }
}

#[async_trait]
impl CategoryRepository for MemoryUnitOfWork {
  async fn insert_category(&mut self, category: &NewCategory) -> StoreResult<Category> {
    if self.working.categories.values().any(|c| c.name == category.name) {
      return Err(unique(constraints::CATEGORIES_NAME));
    }
    let now = Utc::now();
    let row = Category {
      id: self.working.next_id(),
      name: category.name.clone(),
      created_at: now,
      updated_at: now,
    };
    self.working.categories.insert(row.id, row.clone());
    Ok(row)
  }

  async fn find_category(&mut self, id: i64) -> StoreResult<Option<Category>> {
    Ok(self.working.categories.get(&id).cloned())
  }

  async fn list_categories(&mut self) -> StoreResult<Vec<Category>> {
    Ok(self.working.categories.values().cloned().collect())
  }

  async fn delete_category(&mut self, id: i64) -> StoreResult<bool> {
    if !self.working.categories.contains_key(&id) {
      return Ok(false);
    }
    if self.working.products.values().any(|p| p.category_id == id) {
      return Err(foreign_key(constraints::PRODUCTS_CATEGORY_FK));
    }
    self.working.categories.remove(&id);
    Ok(true)
  }
}

#[async_trait]
impl ProductRepository for MemoryUnitOfWork {
  async fn insert_product(&mut self, product: &NewProduct) -> StoreResult<Product> {
    let now = Utc::now();
    let mut row = Product {
      id: 0,
      name: product.name.clone(),
      description: product.description.clone(),
      price: product.price,
      stock: product.stock,
      category_id: product.category_id,
      created_at: now,
      updated_at: now,
    };
    self.check_product_row(&row)?;
    row.id = self.working.next_id();
    self.working.products.insert(row.id, row.clone());
    Ok(row)
  }

  async fn find_product(&mut self, id: i64) -> StoreResult<Option<Product>> {
    Ok(self.working.products.get(&id).cloned())
  }

  async fn list_products(&mut self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
    Ok(
      self
        .working
        .products
        .values()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect(),
    )
  }

  async fn update_product(&mut self, id: i64, changes: &ProductChanges) -> StoreResult<Option<Product>> {
    let Some(mut row) = self.working.products.get(&id).cloned() else {
      return Ok(None);
    };
    if let Some(name) = &changes.name {
      row.name = name.clone();
    }
    if let Some(description) = &changes.description {
      row.description = description.clone();
    }
    if let Some(price) = changes.price {
      row.price = price;
    }
    if let Some(stock) = changes.stock {
      row.stock = stock;
    }
    if let Some(category_id) = changes.category_id {
      row.category_id = category_id;
    }
    row.updated_at = Utc::now();
    self.check_product_row(&row)?;
    self.working.products.insert(id, row.clone());
    Ok(Some(row))
  }

  async fn decrement_stock(&mut self, id: i64) -> StoreResult<bool> {
    match self.working.products.get_mut(&id) {
      Some(product) if product.stock > 0 => {
        product.stock -= 1;
        product.updated_at = Utc::now();
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  async fn delete_product(&mut self, id: i64) -> StoreResult<bool> {
    if !self.working.products.contains_key(&id) {
      return Ok(false);
    }
    if self.working.line_items.values().any(|item| item.product_id == id) {
      return Err(foreign_key(constraints::ORDER_LINE_ITEMS_PRODUCT_FK));
    }
    self.working.carts.retain(|_, line| line.product_id != id);
    self.working.products.remove(&id);
    Ok(true)
  }

  async fn count_products_in_category(&mut self, category_id: i64) -> StoreResult<i64> {
    let count = self
      .working
      .products
      .values()
      .filter(|p| p.category_id == category_id)
      .count();
    Ok(count as i64)
  }
}

#[async_trait]
impl CartRepository for MemoryUnitOfWork {
  async fn insert_cart_line(&mut self, user_id: i64, product_id: i64) -> StoreResult<CartLine> {
    if !self.working.users.contains_key(&user_id) {
      return Err(foreign_key(constraints::CARTS_USER_FK));
    }
    if !self.working.products.contains_key(&product_id) {
      return Err(foreign_key(constraints::CARTS_PRODUCT_FK));
    }
    let duplicate = self
      .working
      .carts
      .values()
      .any(|line| line.user_id == user_id && line.product_id == product_id);
    if duplicate {
      return Err(unique(constraints::CARTS_USER_PRODUCT));
    }
    let row = CartLine {
      id: self.working.next_id(),
      user_id,
      product_id,
      created_at: Utc::now(),
    };
    self.working.carts.insert(row.id, row.clone());
    Ok(row)
  }

  async fn find_cart_line(&mut self, user_id: i64, product_id: i64) -> StoreResult<Option<CartLine>> {
    Ok(
      self
        .working
        .carts
        .values()
        .find(|line| line.user_id == user_id && line.product_id == product_id)
        .cloned(),
    )
  }

  async fn list_cart_lines(&mut self, user_id: i64) -> StoreResult<Vec<CartLine>> {
    Ok(
      self
        .working
        .carts
        .values()
        .filter(|line| line.user_id == user_id)
        .cloned()
        .collect(),
    )
  }

  async fn delete_cart_line(&mut self, id: i64) -> StoreResult<bool> {
    Ok(self.working.carts.remove(&id).is_some())
  }

  async fn delete_cart_lines_for_user(&mut self, user_id: i64) -> StoreResult<u64> {
    let before = self.working.carts.len();
    self.working.carts.retain(|_, line| line.user_id != user_id);
    Ok((before - self.working.carts.len()) as u64)
  }
}

#[async_trait]
impl OrderRepository for MemoryUnitOfWork {
  async fn insert_order(&mut self, user_id: i64, total: Decimal) -> StoreResult<Order> {
    if !self.working.users.contains_key(&user_id) {
      return Err(foreign_key(constraints::ORDERS_USER_FK));
    }
    let row = Order {
      id: self.working.next_id(),
      user_id,
      total,
      created_at: Utc::now(),
    };
    self.working.orders.insert(row.id, row.clone());
    Ok(row)
  }

  async fn insert_line_item(&mut self, item: &NewLineItem) -> StoreResult<OrderLineItem> {
    if !self.working.orders.contains_key(&item.order_id) {
      return Err(foreign_key(constraints::ORDER_LINE_ITEMS_ORDER_FK));
    }
    if !self.working.products.contains_key(&item.product_id) {
      return Err(foreign_key(constraints::ORDER_LINE_ITEMS_PRODUCT_FK));
    }
    let row = OrderLineItem {
      id: self.working.next_id(),
      order_id: item.order_id,
      product_id: item.product_id,
      unit_price: item.unit_price,
      created_at: Utc::now(),
    };
    self.working.line_items.insert(row.id, row.clone());
    Ok(row)
  }

  async fn list_orders(&mut self) -> StoreResult<Vec<Order>> {
    Ok(self.working.orders.values().cloned().collect())
  }

  async fn list_line_items(&mut self, order_id: i64) -> StoreResult<Vec<OrderLineItem>> {
    Ok(
      self
        .working
        .line_items
        .values()
        .filter(|item| item.order_id == order_id)
        .cloned()
        .collect(),
    )
  }

  async fn count_line_items_for_product(&mut self, product_id: i64) -> StoreResult<i64> {
    let count = self
      .working
      .line_items
      .values()
      .filter(|item| item.product_id == product_id)
      .count();
    Ok(count as i64)
  }

  async fn count_orders_for_user(&mut self, user_id: i64) -> StoreResult<i64> {
    Ok(self.working.orders.values().filter(|o| o.user_id == user_id).count() as i64)
  }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
  async fn commit(self: Box<Self>) -> StoreResult<()> {
    let MemoryUnitOfWork { mut committed, working } = *self;
    *committed = working;
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> StoreResult<()> {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_category(name: &str) -> NewCategory {
    NewCategory { name: name.to_string() }
  }

  #[tokio::test]
  async fn dropped_unit_of_work_discards_its_writes() {
    let store = MemoryStore::new();
    {
      let mut uow = store.begin().await.unwrap();
      uow.insert_category(&new_category("Books")).await.unwrap();
    }
    assert!(store.snapshot().await.categories.is_empty());

    let mut uow = store.begin().await.unwrap();
    uow.insert_category(&new_category("Books")).await.unwrap();
    uow.commit().await.unwrap();
    assert_eq!(store.snapshot().await.categories.len(), 1);
  }

  #[tokio::test]
  async fn guarded_stock_decrement_stops_at_zero() {
    let store = MemoryStore::new();
    let mut uow = store.begin().await.unwrap();
    let category = uow.insert_category(&new_category("Games")).await.unwrap();
    let product = uow
      .insert_product(&NewProduct {
        name: "Chess".to_string(),
        description: "Board game".to_string(),
        price: Decimal::new(1500, 2),
        stock: 1,
        category_id: category.id,
      })
      .await
      .unwrap();

    assert!(uow.decrement_stock(product.id).await.unwrap());
    assert!(!uow.decrement_stock(product.id).await.unwrap());
    assert_eq!(uow.find_product(product.id).await.unwrap().unwrap().stock, 0);
  }

  #[tokio::test]
  async fn product_insert_enforces_category_foreign_key() {
    let store = MemoryStore::new();
    let mut uow = store.begin().await.unwrap();
    let err = uow
      .insert_product(&NewProduct {
        name: "Orphan".to_string(),
        description: "No category".to_string(),
        price: Decimal::ONE,
        stock: 1,
        category_id: 404,
      })
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      StoreError::ForeignKeyViolation { ref constraint } if constraint == constraints::PRODUCTS_CATEGORY_FK
    ));
  }
}
