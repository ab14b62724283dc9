// storefront/src/models/product.rs

use super::Category;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub stock: i32,
  #[serde(rename = "categoryID")]
  pub category_id: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A product together with the category it belongs to, as returned by the read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
  #[serde(flatten)]
  pub product: Product,
  #[serde(rename = "Category", skip_serializing_if = "Option::is_none")]
  pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub stock: i32,
  pub category_id: i64,
}

/// Partial update of a product. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price: Option<Decimal>,
  pub stock: Option<i32>,
  pub category_id: Option<i64>,
}

impl ProductChanges {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.description.is_none()
      && self.price.is_none()
      && self.stock.is_none()
      && self.category_id.is_none()
  }
}

/// Comparison operator of a `price=<operator>_<value>` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOp {
  Gte,
  Gt,
  Eq,
  Lt,
  Lte,
}

impl PriceOp {
  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "gte" => Some(PriceOp::Gte),
      "gt" => Some(PriceOp::Gt),
      "eq" => Some(PriceOp::Eq),
      "lt" => Some(PriceOp::Lt),
      "lte" => Some(PriceOp::Lte),
      _ => None,
    }
  }

  /// SQL comparison operator. Only ever one of five fixed tokens.
  pub fn as_sql(self) -> &'static str {
    match self {
      PriceOp::Gte => ">=",
      PriceOp::Gt => ">",
      PriceOp::Eq => "=",
      PriceOp::Lt => "<",
      PriceOp::Lte => "<=",
    }
  }

  pub fn matches(self, price: Decimal, value: Decimal) -> bool {
    match self {
      PriceOp::Gte => price >= value,
      PriceOp::Gt => price > value,
      PriceOp::Eq => price == value,
      PriceOp::Lt => price < value,
      PriceOp::Lte => price <= value,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFilter {
  pub op: PriceOp,
  pub value: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
  pub category_id: Option<i64>,
  pub price: Option<PriceFilter>,
}

impl ProductFilter {
  pub fn matches(&self, product: &Product) -> bool {
    self.category_id.map_or(true, |id| product.category_id == id)
      && self.price.map_or(true, |filter| filter.op.matches(product.price, filter.value))
  }
}
