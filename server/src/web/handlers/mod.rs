// storefront_server/src/web/handlers/mod.rs

pub mod category_handlers;
pub mod order_handlers;
pub mod product_handlers;
pub mod user_handlers;

use actix_web::HttpResponse;

/// Plain-text acknowledgement used by delete and cart endpoints.
pub(crate) fn ok_text(body: &'static str) -> HttpResponse {
  HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(body)
}
