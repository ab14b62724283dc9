// storefront_server/src/web/handlers/user_handlers.rs

//! User accounts plus the cart and purchase endpoints, which live under `/user`.

use actix_web::{web, HttpResponse};
use storefront::{CartInput, CartQuery, CreateUserInput, DeleteUserInput, PurchaseInput};
use tracing::instrument;

use super::ok_text;
use crate::errors::Result;
use crate::state::AppState;

#[instrument(name = "handler::create_user", skip_all)]
pub async fn create_user_handler(
  app_state: web::Data<AppState>,
  body: web::Json<CreateUserInput>,
) -> Result<HttpResponse> {
  let user = app_state.shop.create_user(&body).await?;
  Ok(HttpResponse::Ok().json(user))
}

#[instrument(name = "handler::get_user", skip(app_state, path), fields(user_id = %path.as_str()))]
pub async fn get_user_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
  let user = app_state.shop.get_user(&path).await?;
  Ok(HttpResponse::Ok().json(user))
}

#[instrument(name = "handler::list_users", skip_all)]
pub async fn list_users_handler(app_state: web::Data<AppState>) -> Result<HttpResponse> {
  let users = app_state.shop.list_users().await?;
  Ok(HttpResponse::Ok().json(users))
}

#[instrument(name = "handler::delete_user", skip_all)]
pub async fn delete_user_handler(
  app_state: web::Data<AppState>,
  body: web::Json<DeleteUserInput>,
) -> Result<HttpResponse> {
  app_state.shop.delete_user(&body).await?;
  Ok(ok_text("OK"))
}

#[instrument(name = "handler::get_cart", skip_all, fields(user_id = ?query.user_id))]
pub async fn get_cart_handler(app_state: web::Data<AppState>, query: web::Query<CartQuery>) -> Result<HttpResponse> {
  let cart = app_state.shop.get_cart(&query).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(name = "handler::add_to_cart", skip_all)]
pub async fn add_to_cart_handler(app_state: web::Data<AppState>, body: web::Json<CartInput>) -> Result<HttpResponse> {
  app_state.shop.add_to_cart(&body).await?;
  Ok(ok_text("OK"))
}

#[instrument(name = "handler::remove_from_cart", skip_all)]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  body: web::Json<CartInput>,
) -> Result<HttpResponse> {
  app_state.shop.remove_from_cart(&body).await?;
  Ok(ok_text("OK"))
}

#[instrument(name = "handler::purchase", skip_all)]
pub async fn purchase_handler(app_state: web::Data<AppState>, body: web::Json<PurchaseInput>) -> Result<HttpResponse> {
  app_state.shop.purchase(&body).await?;
  Ok(ok_text("Purchase successful."))
}
