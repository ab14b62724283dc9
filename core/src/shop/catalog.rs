// storefront/src/shop/catalog.rs

use super::Shop;
use crate::error::{ShopError, ShopResult};
use crate::guards;
use crate::input::{CreateCategoryInput, CreateProductInput, IdQuery, ListProductsQuery, UpdateProductInput};
use crate::models::{Category, NewProduct, Product, ProductChanges, ProductFilter, ProductView};
use crate::store::{settle, UnitOfWork};
use crate::validation;
use std::collections::HashMap;
use tracing::{info, instrument};

const CATEGORY_NOT_FOUND: &str = "Category not found.";
const PRODUCT_NOT_FOUND: &str = "Product not found.";
const UNKNOWN_CATEGORY: &str = "The specified category does not exist.";

impl Shop {
  #[instrument(name = "Shop::create_category", skip_all)]
  pub async fn create_category(&self, input: &CreateCategoryInput) -> ShopResult<Category> {
    let new_category = input.validate()?;
    let mut uow = self.store.begin().await?;
    let result = uow.insert_category(&new_category).await.map_err(ShopError::from);
    let category = settle(uow, result).await?;
    info!(category_id = category.id, name = %category.name, "Category created.");
    Ok(category)
  }

  #[instrument(name = "Shop::list_categories", skip_all)]
  pub async fn list_categories(&self) -> ShopResult<Vec<Category>> {
    let mut uow = self.store.begin().await?;
    let result = uow.list_categories().await.map_err(ShopError::from);
    settle(uow, result).await
  }

  /// Refused with a `Referenced` conflict while any product belongs to the category.
  #[instrument(name = "Shop::delete_category", skip_all, fields(id = ?query.id))]
  pub async fn delete_category(&self, query: &IdQuery) -> ShopResult<()> {
    let id = query.validate("category ID")?;
    let mut uow = self.store.begin().await?;
    let result = delete_category_in(uow.as_mut(), id).await;
    settle(uow, result).await?;
    info!(category_id = id, "Category deleted.");
    Ok(())
  }

  #[instrument(name = "Shop::create_product", skip_all)]
  pub async fn create_product(&self, input: &CreateProductInput) -> ShopResult<Product> {
    let new_product = input.validate()?;
    let mut uow = self.store.begin().await?;
    let result = create_product_in(uow.as_mut(), &new_product).await;
    let product = settle(uow, result).await?;
    info!(product_id = product.id, name = %product.name, "Product created.");
    Ok(product)
  }

  #[instrument(name = "Shop::get_product", skip(self))]
  pub async fn get_product(&self, raw_id: &str) -> ShopResult<ProductView> {
    let id = validation::require_id_param("product ID", Some(raw_id))?;
    let mut uow = self.store.begin().await?;
    let result = get_product_in(uow.as_mut(), id).await;
    settle(uow, result).await
  }

  /// Lists products, optionally narrowed by category and a price comparison.
  #[instrument(name = "Shop::list_products", skip_all, fields(category_id = ?query.category_id, price = ?query.price))]
  pub async fn list_products(&self, query: &ListProductsQuery) -> ShopResult<Vec<ProductView>> {
    let filter = query.validate()?;
    let mut uow = self.store.begin().await?;
    let result = list_products_in(uow.as_mut(), &filter).await;
    settle(uow, result).await
  }

  /// Applies the fields present in `input`; an update without fields returns the product unchanged.
  #[instrument(name = "Shop::update_product", skip_all, fields(id = ?input.id))]
  pub async fn update_product(&self, input: &UpdateProductInput) -> ShopResult<Product> {
    let (id, changes) = input.validate()?;
    let mut uow = self.store.begin().await?;
    let result = update_product_in(uow.as_mut(), id, &changes).await;
    let product = settle(uow, result).await?;
    info!(product_id = product.id, "Product updated.");
    Ok(product)
  }

  /// Refused with a `Referenced` conflict once the product appears in any order.
  /// Cart rows holding the product are removed with it.
  #[instrument(name = "Shop::delete_product", skip_all, fields(id = ?query.id))]
  pub async fn delete_product(&self, query: &IdQuery) -> ShopResult<()> {
    let id = query.validate("product ID")?;
    let mut uow = self.store.begin().await?;
    let result = delete_product_in(uow.as_mut(), id).await;
    settle(uow, result).await?;
    info!(product_id = id, "Product deleted.");
    Ok(())
  }
}

async fn delete_category_in(uow: &mut dyn UnitOfWork, id: i64) -> ShopResult<()> {
  if uow.find_category(id).await?.is_none() {
    return Err(ShopError::not_found(CATEGORY_NOT_FOUND));
  }
  guards::category_unreferenced(uow, id).await?;
  uow
    .delete_category(id)
    .await
    .map_err(guards::on_delete(guards::CATEGORY_REFERENCED))?;
  Ok(())
}

async fn require_category(uow: &mut dyn UnitOfWork, id: i64) -> ShopResult<Category> {
  uow
    .find_category(id)
    .await?
    .ok_or_else(|| ShopError::validation(UNKNOWN_CATEGORY))
}

async fn create_product_in(uow: &mut dyn UnitOfWork, new_product: &NewProduct) -> ShopResult<Product> {
  require_category(uow, new_product.category_id).await?;
  Ok(uow.insert_product(new_product).await?)
}

async fn get_product_in(uow: &mut dyn UnitOfWork, id: i64) -> ShopResult<ProductView> {
  let product = uow
    .find_product(id)
    .await?
    .ok_or_else(|| ShopError::not_found(PRODUCT_NOT_FOUND))?;
  let category = uow.find_category(product.category_id).await?;
  Ok(ProductView { product, category })
}

async fn list_products_in(uow: &mut dyn UnitOfWork, filter: &ProductFilter) -> ShopResult<Vec<ProductView>> {
  let products = uow.list_products(filter).await?;
  let categories: HashMap<i64, Category> = uow
    .list_categories()
    .await?
    .into_iter()
    .map(|category| (category.id, category))
    .collect();
  Ok(
    products
      .into_iter()
      .map(|product| {
        let category = categories.get(&product.category_id).cloned();
        ProductView { product, category }
      })
      .collect(),
  )
}

async fn update_product_in(uow: &mut dyn UnitOfWork, id: i64, changes: &ProductChanges) -> ShopResult<Product> {
  let current = uow
    .find_product(id)
    .await?
    .ok_or_else(|| ShopError::not_found(PRODUCT_NOT_FOUND))?;
  if changes.is_empty() {
    return Ok(current);
  }
  if let Some(category_id) = changes.category_id {
    require_category(uow, category_id).await?;
  }
  uow
    .update_product(id, changes)
    .await?
    .ok_or_else(|| ShopError::not_found(PRODUCT_NOT_FOUND))
}

async fn delete_product_in(uow: &mut dyn UnitOfWork, id: i64) -> ShopResult<()> {
  if uow.find_product(id).await?.is_none() {
    return Err(ShopError::not_found(PRODUCT_NOT_FOUND));
  }
  guards::product_unreferenced(uow, id).await?;
  uow
    .delete_product(id)
    .await
    .map_err(guards::on_delete(guards::PRODUCT_REFERENCED))?;
  Ok(())
}
