// storefront/src/models/cart.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One (user, product) pairing staged for purchase. A product appears at most
/// once per user, so every row stands for exactly one unit.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub id: i64,
  #[serde(rename = "userID")]
  pub user_id: i64,
  #[serde(rename = "productID")]
  pub product_id: i64,
  pub created_at: DateTime<Utc>,
}

/// What `GET /user/getCart` answers with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSummary {
  #[serde(rename = "cartID")]
  pub cart_id: i64,
  #[serde(rename = "userID")]
  pub user_id: i64,
  #[serde(rename = "productIDs")]
  pub product_ids: Vec<i64>,
}
