// storefront/src/validation.rs

//! Field-level checks applied to raw request input before any store access.
//!
//! Every function takes the raw, untyped value as it arrived (JSON value or
//! query-string text) and returns either the normalized value or a
//! `ShopError::Validation` describing what is wrong.

use crate::error::{ShopError, ShopResult};
use crate::models::{PriceFilter, PriceOp};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

pub const DEFAULT_PRODUCT_DESCRIPTION: &str = "No product description";

const MAX_MONEY_SCALE: u32 = 2;
// NUMERIC(10, 2)
const MONEY_UPPER_BOUND: i64 = 100_000_000;

fn parse_id_text(label: &str, text: &str) -> ShopResult<i64> {
  match text.trim().parse::<i64>() {
    Ok(id) if id > 0 => Ok(id),
    _ => Err(ShopError::validation(format!("The {} must be a valid number.", label))),
  }
}

/// A required id from a JSON body. Accepts integers and integer strings.
pub fn require_id(label: &str, raw: Option<&Value>) -> ShopResult<i64> {
  match raw {
    Some(Value::Number(n)) => match n.as_i64() {
      Some(id) if id > 0 => Ok(id),
      _ => Err(ShopError::validation(format!("The {} must be a valid number.", label))),
    },
    Some(Value::String(s)) if !s.trim().is_empty() => parse_id_text(label, s),
    _ => Err(ShopError::validation(format!(
      "The {} is required and must be a number.",
      label
    ))),
  }
}

/// An id that may be absent (`None`, `null` or an empty string).
pub fn optional_id(label: &str, raw: Option<&Value>) -> ShopResult<Option<i64>> {
  match raw {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
    other => require_id(label, other).map(Some),
  }
}

/// A required id from a path segment or query parameter.
pub fn require_id_param(label: &str, raw: Option<&str>) -> ShopResult<i64> {
  match raw {
    Some(text) if !text.trim().is_empty() => parse_id_text(label, text),
    _ => Err(ShopError::validation(format!(
      "The {} is required and must be a number.",
      label
    ))),
  }
}

pub fn username(raw: Option<&Value>) -> ShopResult<String> {
  let invalid = || ShopError::validation("Username is required and must be a valid string.");
  let Some(Value::String(text)) = raw else {
    return Err(invalid());
  };
  let trimmed = text.trim();
  let length = trimmed.chars().count();
  if !(2..=50).contains(&length) {
    return Err(invalid());
  }
  if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
    return Err(ShopError::validation(
      "Username may only contain letters, digits and underscores.",
    ));
  }
  Ok(trimmed.to_string())
}

pub fn category_name(raw: Option<&Value>) -> ShopResult<String> {
  let name = match raw {
    Some(Value::String(text)) if !text.trim().is_empty() => text.trim(),
    _ => return Err(ShopError::validation("The category name is required.")),
  };
  if !(2..=50).contains(&name.chars().count()) {
    return Err(ShopError::validation(
      "The category name must be between 2 and 50 characters.",
    ));
  }
  Ok(name.to_string())
}

pub fn product_name(raw: Option<&Value>) -> ShopResult<String> {
  match raw {
    Some(Value::String(text)) => {
      let name = text.trim();
      if (1..=50).contains(&name.chars().count()) {
        return Ok(name.to_string());
      }
    }
    _ => {}
  }
  Err(ShopError::validation(
    "Product name is required, must be a string, and limited to 50 characters.",
  ))
}

/// Missing descriptions fall back to `DEFAULT_PRODUCT_DESCRIPTION`; a present one must not be blank.
pub fn product_description(raw: Option<&Value>) -> ShopResult<String> {
  match raw {
    None | Some(Value::Null) => Ok(DEFAULT_PRODUCT_DESCRIPTION.to_string()),
    Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
    _ => Err(ShopError::validation(
      "The product description must be a non-empty string.",
    )),
  }
}

/// A non-negative amount of money with at most two fractional digits.
pub fn money(label: &str, raw: Option<&Value>) -> ShopResult<Decimal> {
  let invalid = || ShopError::validation(format!("The {} must be a positive number.", label));
  let parsed = match raw {
    Some(Value::Number(n)) => Decimal::from_str(&n.to_string()).or_else(|_| Decimal::from_scientific(&n.to_string())),
    Some(Value::String(s)) => Decimal::from_str(s.trim()),
    _ => return Err(invalid()),
  };
  let mut amount = parsed.map_err(|_| invalid())?;
  if amount.is_sign_negative() && !amount.is_zero() {
    return Err(invalid());
  }
  if amount.normalize().scale() > MAX_MONEY_SCALE {
    return Err(ShopError::validation(format!(
      "The {} may have at most two decimal places.",
      label
    )));
  }
  if amount >= Decimal::from(MONEY_UPPER_BOUND) {
    return Err(ShopError::validation(format!("The {} is too large.", label)));
  }
  amount.rescale(MAX_MONEY_SCALE);
  Ok(amount)
}

pub fn stock(raw: Option<&Value>) -> ShopResult<i32> {
  let parsed = match raw {
    Some(Value::Number(n)) => n.as_i64(),
    Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
    _ => None,
  };
  parsed
    .filter(|value| *value >= 0)
    .and_then(|value| i32::try_from(value).ok())
    .ok_or_else(|| ShopError::validation("The stock must be a positive integer."))
}

/// Parses `<operator>_<value>` with operator one of gte, gt, eq, lt, lte.
pub fn price_filter(raw: &str) -> ShopResult<PriceFilter> {
  let parts: Vec<&str> = raw.split('_').collect();
  let [operator, value] = parts.as_slice() else {
    return Err(ShopError::validation(
      "The price filter must be in the format: <compare_operator>_<value>",
    ));
  };
  let value = Decimal::from_str(value.trim())
    .map_err(|_| ShopError::validation("The price filter value must be a number."))?;
  let op = PriceOp::parse(operator)
    .ok_or_else(|| ShopError::validation("The price filter operator must be one of: gte, gt, eq, lt, lte"))?;
  Ok(PriceFilter { op, value })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn ids_accept_numbers_and_numeric_strings() {
    assert_eq!(require_id("user ID", Some(&json!(7))).unwrap(), 7);
    assert_eq!(require_id("user ID", Some(&json!(" 12 "))).unwrap(), 12);
    assert!(require_id("user ID", None).is_err());
    assert!(require_id("user ID", Some(&json!("abc"))).is_err());
    assert!(require_id("user ID", Some(&json!(0))).is_err());
    assert!(require_id("user ID", Some(&json!(1.5))).is_err());
    assert_eq!(optional_id("categoryID", Some(&json!(""))).unwrap(), None);
    assert_eq!(require_id_param("product ID", Some("42")).unwrap(), 42);
    assert!(require_id_param("product ID", Some("4x2")).is_err());
  }

  #[test]
  fn usernames_are_trimmed_and_restricted() {
    assert_eq!(username(Some(&json!("  alice_01 "))).unwrap(), "alice_01");
    assert!(username(Some(&json!("a"))).is_err());
    assert!(username(Some(&json!("   "))).is_err());
    assert!(username(Some(&json!("bob smith"))).is_err());
    assert!(username(Some(&json!("x".repeat(51)))).is_err());
    assert!(username(Some(&json!(17))).is_err());
  }

  #[test]
  fn money_must_be_non_negative_with_two_decimals() {
    assert_eq!(money("price", Some(&json!(30))).unwrap().to_string(), "30.00");
    assert_eq!(money("price", Some(&json!("19.9"))).unwrap().to_string(), "19.90");
    assert_eq!(money("price", Some(&json!(0.5))).unwrap().to_string(), "0.50");
    assert!(money("price", Some(&json!(-1))).is_err());
    assert!(money("price", Some(&json!("1.234"))).is_err());
    assert!(money("price", Some(&json!("ten"))).is_err());
    assert!(money("price", None).is_err());
  }

  #[test]
  fn stock_must_be_a_non_negative_integer() {
    assert_eq!(stock(Some(&json!(3))).unwrap(), 3);
    assert_eq!(stock(Some(&json!("0"))).unwrap(), 0);
    assert!(stock(Some(&json!(-2))).is_err());
    assert!(stock(Some(&json!(2.5))).is_err());
  }

  #[test]
  fn descriptions_default_when_missing() {
    assert_eq!(product_description(None).unwrap(), DEFAULT_PRODUCT_DESCRIPTION);
    assert!(product_description(Some(&json!(""))).is_err());
  }

  #[test]
  fn price_filters_are_parsed_before_query_construction() {
    let filter = price_filter("gte_10.5").unwrap();
    assert_eq!(filter.op, PriceOp::Gte);
    assert_eq!(filter.value, Decimal::new(105, 1));

    assert!(price_filter("gte").is_err());
    assert!(price_filter("between_1_2").is_err());
    assert!(price_filter("gte_abc").is_err());
    assert!(price_filter("like_5").is_err());
  }
}
