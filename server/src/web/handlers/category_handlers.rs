// storefront_server/src/web/handlers/category_handlers.rs

use actix_web::{web, HttpResponse};
use storefront::{CreateCategoryInput, IdQuery};
use tracing::instrument;

use super::ok_text;
use crate::errors::Result;
use crate::state::AppState;

#[instrument(name = "handler::create_category", skip_all)]
pub async fn create_category_handler(
  app_state: web::Data<AppState>,
  body: web::Json<CreateCategoryInput>,
) -> Result<HttpResponse> {
  let category = app_state.shop.create_category(&body).await?;
  Ok(HttpResponse::Ok().json(category))
}

#[instrument(name = "handler::list_categories", skip_all)]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse> {
  let categories = app_state.shop.list_categories().await?;
  Ok(HttpResponse::Ok().json(categories))
}

#[instrument(name = "handler::delete_category", skip_all, fields(id = ?query.id))]
pub async fn delete_category_handler(
  app_state: web::Data<AppState>,
  query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
  app_state.shop.delete_category(&query).await?;
  Ok(ok_text("OK"))
}
