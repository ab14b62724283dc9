// storefront_server/src/web/routes.rs

use actix_web::{web, HttpResponse};
use storefront::ShopError;

use crate::errors::AppError;
use crate::web::handlers::{category_handlers, order_handlers, product_handlers, user_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Body and query-string parse failures are reported like any other validation error.
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default()
    .error_handler(|err, _req| AppError::from(ShopError::validation(format!("Invalid JSON body: {}", err))).into())
}

fn query_config() -> web::QueryConfig {
  web::QueryConfig::default()
    .error_handler(|err, _req| AppError::from(ShopError::validation(format!("Invalid query string: {}", err))).into())
}

// Literal segments such as `/user/list` are registered before `/user/{id}`.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(json_config())
    .app_data(query_config())
    .route("/", web::get().to(health_check_handler))
    .service(
      web::scope("/category")
        .route("/create", web::post().to(category_handlers::create_category_handler))
        .route("/list", web::get().to(category_handlers::list_categories_handler))
        .route("/delete", web::delete().to(category_handlers::delete_category_handler)),
    )
    .service(
      web::scope("/product")
        .route("/create", web::post().to(product_handlers::create_product_handler))
        .route("/list", web::get().to(product_handlers::list_products_handler))
        .route("/update", web::put().to(product_handlers::update_product_handler))
        .route("/delete", web::delete().to(product_handlers::delete_product_handler))
        .route("/{id}", web::get().to(product_handlers::get_product_handler)),
    )
    .service(
      web::scope("/user")
        .route("/create", web::post().to(user_handlers::create_user_handler))
        .route("/list", web::get().to(user_handlers::list_users_handler))
        .route("/delete", web::delete().to(user_handlers::delete_user_handler))
        .route("/getCart", web::get().to(user_handlers::get_cart_handler))
        .route("/addToCart", web::post().to(user_handlers::add_to_cart_handler))
        .route("/removeFromCart", web::delete().to(user_handlers::remove_from_cart_handler))
        .route("/purchase", web::post().to(user_handlers::purchase_handler))
        .route("/{id}", web::get().to(user_handlers::get_user_handler)),
    )
    .service(web::scope("/order").route("/list", web::get().to(order_handlers::list_orders_handler)));
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::state::AppState;
  use actix_web::http::StatusCode;
  use actix_web::{test, App};
  use serde_json::{json, Value};
  use std::sync::Arc;
  use storefront::{MemoryStore, Shop};

  fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState {
      shop: Shop::new(Arc::new(MemoryStore::new())),
    })
  }

  macro_rules! test_app {
    () => {
      test::init_service(App::new().app_data(test_state()).configure(configure_app_routes)).await
    };
  }

  #[actix_web::test]
  async fn health_check_reports_ok() {
    let app = test_app!();
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "status": "ok" }));
  }

  #[actix_web::test]
  async fn shopping_flow_over_http() {
    let app = test_app!();

    let user: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::post()
        .uri("/user/create")
        .set_json(json!({ "username": "alice", "accountBalance": 100 }))
        .to_request(),
    )
    .await;
    let user_id = user["id"].as_i64().unwrap();
    assert_eq!(user["accountBalance"], json!("100.00"));

    let category: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::post()
        .uri("/category/create")
        .set_json(json!({ "name": "Books" }))
        .to_request(),
    )
    .await;
    let category_id = category["id"].as_i64().unwrap();

    let product: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::post()
        .uri("/product/create")
        .set_json(json!({ "name": "Novel", "price": "30.00", "stock": 2, "categoryID": category_id }))
        .to_request(),
    )
    .await;
    let product_id = product["id"].as_i64().unwrap();

    let view: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::get().uri(&format!("/product/{}", product_id)).to_request(),
    )
    .await;
    assert_eq!(view["Category"]["name"], json!("Books"));

    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/user/addToCart")
        .set_json(json!({ "userID": user_id, "productID": product_id }))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "OK");

    let cart: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::get()
        .uri(&format!("/user/getCart?userID={}", user_id))
        .to_request(),
    )
    .await;
    assert_eq!(cart["userID"], json!(user_id));
    assert_eq!(cart["productIDs"], json!([product_id]));

    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/user/purchase")
        .set_json(json!({ "userID": user_id }))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "Purchase successful.");

    let user: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::get().uri(&format!("/user/{}", user_id)).to_request(),
    )
    .await;
    assert_eq!(user["accountBalance"], json!("70.00"));

    let orders: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/order/list").to_request()).await;
    assert_eq!(orders.as_array().map(Vec::len), Some(1));

    let resp = test::call_service(
      &app,
      test::TestRequest::get()
        .uri(&format!("/user/getCart?userID={}", user_id))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[actix_web::test]
  async fn errors_map_to_status_codes() {
    let app = test_app!();

    let create_books = || {
      test::TestRequest::post()
        .uri("/category/create")
        .set_json(json!({ "name": "Books" }))
        .to_request()
    };
    let category: Value = test::call_and_read_body_json(&app, create_books()).await;
    let category_id = category["id"].as_i64().unwrap();

    let resp = test::call_service(&app, create_books()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/product/create")
        .set_json(json!({ "name": "Atlas", "price": 12, "stock": 1, "categoryID": category_id }))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
      &app,
      test::TestRequest::delete()
        .uri(&format!("/category/delete?id={}", category_id))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("referenced by products"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/product/abc").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/product/999").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
      &app,
      test::TestRequest::get().uri("/product/list?price=around_5").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/user/create")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[actix_web::test]
  async fn insufficient_funds_is_unprocessable() {
    let app = test_app!();

    let user: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::post()
        .uri("/user/create")
        .set_json(json!({ "username": "bob", "accountBalance": "10.00" }))
        .to_request(),
    )
    .await;
    let category: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::post()
        .uri("/category/create")
        .set_json(json!({ "name": "Tools" }))
        .to_request(),
    )
    .await;
    let product: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::post()
        .uri("/product/create")
        .set_json(json!({ "name": "Drill", "price": 50, "stock": 3, "categoryID": category["id"] }))
        .to_request(),
    )
    .await;
    let cart_line = json!({ "userID": user["id"], "productID": product["id"] });
    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/user/addToCart")
        .set_json(&cart_line)
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/user/addToCart")
        .set_json(&cart_line)
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/user/purchase")
        .set_json(json!({ "userID": user["id"] }))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let reloaded: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::get()
        .uri(&format!("/user/{}", user["id"]))
        .to_request(),
    )
    .await;
    assert_eq!(reloaded["accountBalance"], json!("10.00"));

    let resp = test::call_service(
      &app,
      test::TestRequest::delete()
        .uri("/user/removeFromCart")
        .set_json(&cart_line)
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
  }
}
