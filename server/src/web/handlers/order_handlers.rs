// storefront_server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::Result;
use crate::state::AppState;

#[instrument(name = "handler::list_orders", skip_all)]
pub async fn list_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse> {
  let orders = app_state.shop.list_orders().await?;
  Ok(HttpResponse::Ok().json(orders))
}
