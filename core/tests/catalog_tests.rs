// tests/catalog_tests.rs
mod common;

use common::*;
use rust_decimal_macros::dec;
use serde_json::json;
use serial_test::serial;
use storefront::validation::DEFAULT_PRODUCT_DESCRIPTION;
use storefront::{
  ConflictKind, CreateCategoryInput, CreateProductInput, IdQuery, ListProductsQuery, PurchaseInput, UpdateProductInput,
};

fn id_query(id: i64) -> IdQuery {
  IdQuery {
    id: Some(id.to_string()),
  }
}

#[tokio::test]
#[serial]
async fn category_names_are_unique_and_validated() {
  let TestShop { shop, .. } = test_shop();
  seed_category(&shop, "Books").await;

  let err = shop
    .create_category(&CreateCategoryInput { name: Some(json!("Books")) })
    .await
    .unwrap_err();
  assert_eq!(err.conflict_kind(), Some(ConflictKind::Duplicate));

  assert_validation(shop.create_category(&CreateCategoryInput { name: Some(json!("B")) }).await);
  assert_validation(shop.create_category(&CreateCategoryInput { name: None }).await);
  assert_eq!(shop.list_categories().await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn category_with_products_cannot_be_deleted() {
  let TestShop { store, shop } = test_shop();
  let books = seed_category(&shop, "Books").await;
  seed_product(&shop, "Novel", "10.00", 1, books.id).await;
  seed_product(&shop, "Atlas", "12.00", 1, books.id).await;

  let err = shop.delete_category(&id_query(books.id)).await.unwrap_err();

  assert_eq!(err.conflict_kind(), Some(ConflictKind::Referenced));
  let state = store.snapshot().await;
  assert!(state.categories.contains_key(&books.id));
  assert_eq!(state.products.len(), 2);
}

#[tokio::test]
#[serial]
async fn empty_category_is_deleted_once() {
  let TestShop { shop, .. } = test_shop();
  let garden = seed_category(&shop, "Garden").await;

  shop.delete_category(&id_query(garden.id)).await.unwrap();

  assert_not_found(shop.delete_category(&id_query(garden.id)).await);
  assert_validation(shop.delete_category(&IdQuery { id: None }).await);
}

#[tokio::test]
#[serial]
async fn product_requires_an_existing_category() {
  let TestShop { store, shop } = test_shop();

  let result = shop
    .create_product(&CreateProductInput {
      name: Some(json!("Orphan")),
      description: None,
      price: Some(json!(5)),
      stock: Some(json!(1)),
      category_id: Some(json!(77)),
    })
    .await;

  assert_validation(result);
  assert!(store.snapshot().await.products.is_empty());
}

#[tokio::test]
#[serial]
async fn product_defaults_and_duplicates() {
  let TestShop { shop, .. } = test_shop();
  let books = seed_category(&shop, "Books").await;
  let input = CreateProductInput {
    name: Some(json!("Novel")),
    description: None,
    price: Some(json!(12.5)),
    stock: Some(json!(3)),
    category_id: Some(json!(books.id)),
  };

  let product = shop.create_product(&input).await.unwrap();
  assert_eq!(product.description, DEFAULT_PRODUCT_DESCRIPTION);
  assert_eq!(product.price, dec!(12.50));

  let err = shop.create_product(&input).await.unwrap_err();
  assert_eq!(err.conflict_kind(), Some(ConflictKind::Duplicate));
}

#[tokio::test]
#[serial]
async fn get_product_includes_its_category() {
  let TestShop { shop, .. } = test_shop();
  let books = seed_category(&shop, "Books").await;
  let novel = seed_product(&shop, "Novel", "10.00", 1, books.id).await;

  let view = shop.get_product(&novel.id.to_string()).await.unwrap();
  assert_eq!(view.product, novel);
  assert_eq!(view.category.map(|c| c.name), Some("Books".to_string()));

  assert_not_found(shop.get_product("999").await);
  assert_validation(shop.get_product("ten").await);
}

#[tokio::test]
#[serial]
async fn products_filter_by_category_and_price() {
  let TestShop { shop, .. } = test_shop();
  let books = seed_category(&shop, "Books").await;
  let games = seed_category(&shop, "Games").await;
  let cheap = seed_product(&shop, "Pamphlet", "5.00", 1, books.id).await;
  let pricey = seed_product(&shop, "Encyclopedia", "80.00", 1, books.id).await;
  let chess = seed_product(&shop, "Chess", "20.00", 1, games.id).await;

  let ids = |views: Vec<storefront::models::ProductView>| views.into_iter().map(|v| v.product.id).collect::<Vec<_>>();

  let all = shop.list_products(&ListProductsQuery::default()).await.unwrap();
  assert_eq!(ids(all), vec![cheap.id, pricey.id, chess.id]);

  let in_books = shop
    .list_products(&ListProductsQuery {
      category_id: Some(books.id.to_string()),
      price: None,
    })
    .await
    .unwrap();
  assert_eq!(ids(in_books), vec![cheap.id, pricey.id]);

  let at_least_20 = shop
    .list_products(&ListProductsQuery {
      category_id: None,
      price: Some("gte_20".to_string()),
    })
    .await
    .unwrap();
  assert_eq!(ids(at_least_20), vec![pricey.id, chess.id]);

  let cheap_books = shop
    .list_products(&ListProductsQuery {
      category_id: Some(books.id.to_string()),
      price: Some("lt_20".to_string()),
    })
    .await
    .unwrap();
  assert_eq!(ids(cheap_books), vec![cheap.id]);

  assert_validation(
    shop
      .list_products(&ListProductsQuery {
        category_id: None,
        price: Some("between_1".to_string()),
      })
      .await,
  );
}

#[tokio::test]
#[serial]
async fn update_changes_only_present_fields() {
  let TestShop { shop, .. } = test_shop();
  let books = seed_category(&shop, "Books").await;
  let novel = seed_product(&shop, "Novel", "10.00", 4, books.id).await;

  let updated = shop
    .update_product(&UpdateProductInput {
      id: Some(json!(novel.id)),
      price: Some(json!("12.00")),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.price, dec!(12.00));
  assert_eq!(updated.name, novel.name);
  assert_eq!(updated.stock, 4);

  let unchanged = shop
    .update_product(&UpdateProductInput {
      id: Some(json!(novel.id)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(unchanged, updated);
}

#[tokio::test]
#[serial]
async fn update_rejects_unknown_targets() {
  let TestShop { shop, .. } = test_shop();
  let books = seed_category(&shop, "Books").await;
  let novel = seed_product(&shop, "Novel", "10.00", 4, books.id).await;
  seed_product(&shop, "Atlas", "10.00", 4, books.id).await;

  assert_not_found(
    shop
      .update_product(&UpdateProductInput {
        id: Some(json!(555)),
        stock: Some(json!(1)),
        ..Default::default()
      })
      .await,
  );
  assert_validation(
    shop
      .update_product(&UpdateProductInput {
        id: Some(json!(novel.id)),
        category_id: Some(json!(555)),
        ..Default::default()
      })
      .await,
  );
  assert_validation(
    shop
      .update_product(&UpdateProductInput {
        id: Some(json!(novel.id)),
        stock: Some(json!(-1)),
        ..Default::default()
      })
      .await,
  );
  let err = shop
    .update_product(&UpdateProductInput {
      id: Some(json!(novel.id)),
      name: Some(json!("Atlas")),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert_eq!(err.conflict_kind(), Some(ConflictKind::Duplicate));
}

#[tokio::test]
#[serial]
async fn ordered_product_cannot_be_deleted() {
  let TestShop { store, shop } = test_shop();
  let user = seed_user(&shop, "alice", "50.00").await;
  let books = seed_category(&shop, "Books").await;
  let novel = seed_product(&shop, "Novel", "10.00", 4, books.id).await;
  seed_cart(&shop, user.id, &[novel.id]).await;
  shop.purchase(&PurchaseInput::new(user.id)).await.unwrap();

  let err = shop.delete_product(&id_query(novel.id)).await.unwrap_err();

  assert_eq!(err.conflict_kind(), Some(ConflictKind::Referenced));
  assert!(store.snapshot().await.products.contains_key(&novel.id));
  assert_not_found(shop.delete_product(&id_query(9_000)).await);
}
