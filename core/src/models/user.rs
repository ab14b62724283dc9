// storefront/src/models/user.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: i64,
  pub username: String,
  pub account_balance: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A validated user ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
  pub username: String,
  pub account_balance: Decimal,
}
