// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Created only by a purchase; never updated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: i64,
  #[serde(rename = "userID")]
  pub user_id: i64,
  pub total: Decimal,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
  pub id: i64,
  #[serde(rename = "orderID")]
  pub order_id: i64,
  #[serde(rename = "productID")]
  pub product_id: i64,
  pub unit_price: Decimal,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem {
  pub order_id: i64,
  pub product_id: i64,
  pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
  #[serde(flatten)]
  pub order: Order,
  pub line_items: Vec<OrderLineItem>,
}
