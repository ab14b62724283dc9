// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every fixture

use once_cell::sync::Lazy;
use serde_json::json;
use std::sync::Arc;
use storefront::models::{Category, Product, User};
use storefront::{
  CartInput, CreateCategoryInput, CreateProductInput, CreateUserInput, MemoryStore, Shop, ShopError,
};
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// A `Shop` over a fresh in-memory store. The store handle is kept so tests
/// can inspect committed state.
pub struct TestShop {
  pub store: MemoryStore,
  pub shop: Shop,
}

pub fn test_shop() -> TestShop {
  setup_tracing();
  let store = MemoryStore::new();
  let shop = Shop::new(Arc::new(store.clone()));
  TestShop { store, shop }
}

pub async fn seed_user(shop: &Shop, username: &str, balance: &str) -> User {
  shop
    .create_user(&CreateUserInput {
      username: Some(json!(username)),
      account_balance: Some(json!(balance)),
    })
    .await
    .expect("seed user")
}

pub async fn seed_category(shop: &Shop, name: &str) -> Category {
  shop
    .create_category(&CreateCategoryInput { name: Some(json!(name)) })
    .await
    .expect("seed category")
}

pub async fn seed_product(shop: &Shop, name: &str, price: &str, stock: i32, category_id: i64) -> Product {
  shop
    .create_product(&CreateProductInput {
      name: Some(json!(name)),
      description: Some(json!(format!("{} description", name))),
      price: Some(json!(price)),
      stock: Some(json!(stock)),
      category_id: Some(json!(category_id)),
    })
    .await
    .expect("seed product")
}

pub async fn seed_cart(shop: &Shop, user_id: i64, product_ids: &[i64]) {
  for product_id in product_ids {
    shop
      .add_to_cart(&CartInput::new(user_id, *product_id))
      .await
      .expect("seed cart line");
  }
}

pub fn assert_not_found(result: Result<impl std::fmt::Debug, ShopError>) {
  match result {
    Err(ShopError::NotFound(_)) => {}
    other => panic!("expected NotFound, got {:?}", other),
  }
}

pub fn assert_validation(result: Result<impl std::fmt::Debug, ShopError>) {
  match result {
    Err(ShopError::Validation(_)) => {}
    other => panic!("expected Validation, got {:?}", other),
  }
}
