// tests/cart_tests.rs
mod common;

use common::*;
use serde_json::json;
use serial_test::serial;
use storefront::{CartInput, CartQuery, ConflictKind, IdQuery};

fn cart_of(user_id: i64) -> CartQuery {
  CartQuery {
    user_id: Some(user_id.to_string()),
  }
}

#[tokio::test]
#[serial]
async fn cart_lists_products_in_insertion_order() {
  let TestShop { shop, .. } = test_shop();
  let user = seed_user(&shop, "alice", "10.00").await;
  let books = seed_category(&shop, "Books").await;
  let first = seed_product(&shop, "First", "1.00", 1, books.id).await;
  let second = seed_product(&shop, "Second", "2.00", 1, books.id).await;

  let line = shop.add_to_cart(&CartInput::new(user.id, second.id)).await.unwrap();
  shop.add_to_cart(&CartInput::new(user.id, first.id)).await.unwrap();

  let cart = shop.get_cart(&cart_of(user.id)).await.unwrap();
  assert_eq!(cart.cart_id, line.id);
  assert_eq!(cart.user_id, user.id);
  assert_eq!(cart.product_ids, vec![second.id, first.id]);
}

#[tokio::test]
#[serial]
async fn adding_the_same_product_twice_is_a_conflict() {
  let TestShop { store, shop } = test_shop();
  let user = seed_user(&shop, "bob", "10.00").await;
  let books = seed_category(&shop, "Books").await;
  let novel = seed_product(&shop, "Novel", "9.99", 3, books.id).await;
  seed_cart(&shop, user.id, &[novel.id]).await;

  let err = shop.add_to_cart(&CartInput::new(user.id, novel.id)).await.unwrap_err();

  assert_eq!(err.conflict_kind(), Some(ConflictKind::AlreadyInCart));
  assert_eq!(store.snapshot().await.carts.len(), 1);
}

#[tokio::test]
#[serial]
async fn adding_requires_existing_user_and_product() {
  let TestShop { store, shop } = test_shop();
  let user = seed_user(&shop, "carol", "10.00").await;
  let books = seed_category(&shop, "Books").await;
  let novel = seed_product(&shop, "Novel", "9.99", 3, books.id).await;

  assert_not_found(shop.add_to_cart(&CartInput::new(user.id, 4_242)).await);
  assert_not_found(shop.add_to_cart(&CartInput::new(4_242, novel.id)).await);
  assert_validation(
    shop
      .add_to_cart(&CartInput {
        user_id: Some(json!("one")),
        product_id: Some(json!(novel.id)),
      })
      .await,
  );
  assert_validation(
    shop
      .add_to_cart(&CartInput {
        user_id: Some(json!(user.id)),
        product_id: None,
      })
      .await,
  );
  assert!(store.snapshot().await.carts.is_empty());
}

#[tokio::test]
#[serial]
async fn removing_a_product_deletes_only_that_line() {
  let TestShop { shop, .. } = test_shop();
  let user = seed_user(&shop, "dave", "10.00").await;
  let books = seed_category(&shop, "Books").await;
  let novel = seed_product(&shop, "Novel", "9.99", 3, books.id).await;
  let atlas = seed_product(&shop, "Atlas", "4.00", 3, books.id).await;
  seed_cart(&shop, user.id, &[novel.id, atlas.id]).await;

  shop.remove_from_cart(&CartInput::new(user.id, novel.id)).await.unwrap();

  let cart = shop.get_cart(&cart_of(user.id)).await.unwrap();
  assert_eq!(cart.product_ids, vec![atlas.id]);
  assert_not_found(shop.remove_from_cart(&CartInput::new(user.id, novel.id)).await);
}

#[tokio::test]
#[serial]
async fn empty_cart_is_not_found() {
  let TestShop { shop, .. } = test_shop();
  let user = seed_user(&shop, "erin", "10.00").await;

  assert_not_found(shop.get_cart(&cart_of(user.id)).await);
  assert_validation(shop.get_cart(&CartQuery { user_id: None }).await);
}

#[tokio::test]
#[serial]
async fn deleting_a_product_removes_it_from_carts() {
  let TestShop { shop, .. } = test_shop();
  let user = seed_user(&shop, "frank", "10.00").await;
  let books = seed_category(&shop, "Books").await;
  let novel = seed_product(&shop, "Novel", "9.99", 3, books.id).await;
  let atlas = seed_product(&shop, "Atlas", "4.00", 3, books.id).await;
  seed_cart(&shop, user.id, &[novel.id, atlas.id]).await;

  shop
    .delete_product(&IdQuery {
      id: Some(novel.id.to_string()),
    })
    .await
    .unwrap();

  let cart = shop.get_cart(&cart_of(user.id)).await.unwrap();
  assert_eq!(cart.product_ids, vec![atlas.id]);
}
