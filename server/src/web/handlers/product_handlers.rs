// storefront_server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use storefront::{CreateProductInput, IdQuery, ListProductsQuery, UpdateProductInput};
use tracing::{info, instrument};

use super::ok_text;
use crate::errors::Result;
use crate::state::AppState;

#[instrument(name = "handler::create_product", skip_all)]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  body: web::Json<CreateProductInput>,
) -> Result<HttpResponse> {
  let product = app_state.shop.create_product(&body).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
  let product = app_state.shop.get_product(&path).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::list_products", skip_all)]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse> {
  let products = app_state.shop.list_products(&query).await?;
  info!("Fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::update_product", skip_all)]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  body: web::Json<UpdateProductInput>,
) -> Result<HttpResponse> {
  let product = app_state.shop.update_product(&body).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::delete_product", skip_all, fields(id = ?query.id))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
  app_state.shop.delete_product(&query).await?;
  Ok(ok_text("OK"))
}
