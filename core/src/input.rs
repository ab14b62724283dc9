// storefront/src/input.rs

//! Typed request inputs. Each struct mirrors one operation's raw payload
//! (fields stay untyped until validated) and exposes a `validate` method that
//! produces the normalized command or a validation error. Nothing here touches
//! the store.

use crate::error::ShopResult;
use crate::models::{NewCategory, NewProduct, NewUser, ProductChanges, ProductFilter};
use crate::validation;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserInput {
  pub username: Option<Value>,
  #[serde(rename = "accountBalance")]
  pub account_balance: Option<Value>,
}

impl CreateUserInput {
  pub fn validate(&self) -> ShopResult<NewUser> {
    Ok(NewUser {
      username: validation::username(self.username.as_ref())?,
      account_balance: validation::money("account balance", self.account_balance.as_ref())?,
    })
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteUserInput {
  pub id: Option<Value>,
}

impl DeleteUserInput {
  pub fn validate(&self) -> ShopResult<i64> {
    validation::require_id("user ID", self.id.as_ref())
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCategoryInput {
  pub name: Option<Value>,
}

impl CreateCategoryInput {
  pub fn validate(&self) -> ShopResult<NewCategory> {
    Ok(NewCategory {
      name: validation::category_name(self.name.as_ref())?,
    })
  }
}

/// `?id=` query used by the delete endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdQuery {
  pub id: Option<String>,
}

impl IdQuery {
  pub fn validate(&self, label: &str) -> ShopResult<i64> {
    validation::require_id_param(label, self.id.as_deref())
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProductInput {
  pub name: Option<Value>,
  pub description: Option<Value>,
  pub price: Option<Value>,
  pub stock: Option<Value>,
  #[serde(rename = "categoryID")]
  pub category_id: Option<Value>,
}

impl CreateProductInput {
  pub fn validate(&self) -> ShopResult<NewProduct> {
    Ok(NewProduct {
      name: validation::product_name(self.name.as_ref())?,
      description: validation::product_description(self.description.as_ref())?,
      price: validation::money("price", self.price.as_ref())?,
      stock: validation::stock(self.stock.as_ref())?,
      category_id: validation::require_id("categoryID", self.category_id.as_ref())?,
    })
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
  pub id: Option<Value>,
  pub name: Option<Value>,
  pub description: Option<Value>,
  pub price: Option<Value>,
  pub stock: Option<Value>,
  #[serde(rename = "categoryID")]
  pub category_id: Option<Value>,
}

impl UpdateProductInput {
  /// Only the fields present in the payload are validated and changed.
  pub fn validate(&self) -> ShopResult<(i64, ProductChanges)> {
    let id = validation::require_id("product ID", self.id.as_ref())?;
    let present = |raw: &Option<Value>| !matches!(raw, None | Some(Value::Null));

    let changes = ProductChanges {
      name: present(&self.name)
        .then(|| validation::product_name(self.name.as_ref()))
        .transpose()?,
      description: present(&self.description)
        .then(|| validation::product_description(self.description.as_ref()))
        .transpose()?,
      price: present(&self.price)
        .then(|| validation::money("price", self.price.as_ref()))
        .transpose()?,
      stock: present(&self.stock)
        .then(|| validation::stock(self.stock.as_ref()))
        .transpose()?,
      category_id: validation::optional_id("categoryID", self.category_id.as_ref())?,
    };
    Ok((id, changes))
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProductsQuery {
  #[serde(rename = "categoryID")]
  pub category_id: Option<String>,
  pub price: Option<String>,
}

impl ListProductsQuery {
  pub fn validate(&self) -> ShopResult<ProductFilter> {
    let category_id = match self.category_id.as_deref() {
      Some(raw) if !raw.trim().is_empty() => Some(validation::require_id_param("categoryID", Some(raw))?),
      _ => None,
    };
    let price = match self.price.as_deref() {
      Some(raw) if !raw.trim().is_empty() => Some(validation::price_filter(raw)?),
      _ => None,
    };
    Ok(ProductFilter { category_id, price })
  }
}

/// `?userID=` query of `GET /user/getCart`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartQuery {
  #[serde(rename = "userID")]
  pub user_id: Option<String>,
}

impl CartQuery {
  pub fn validate(&self) -> ShopResult<i64> {
    validation::require_id_param("user ID", self.user_id.as_deref())
  }
}

/// Body of add-to-cart and remove-from-cart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartInput {
  #[serde(rename = "userID")]
  pub user_id: Option<Value>,
  #[serde(rename = "productID")]
  pub product_id: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartRequest {
  pub user_id: i64,
  pub product_id: i64,
}

impl CartInput {
  pub fn new(user_id: i64, product_id: i64) -> Self {
    Self {
      user_id: Some(Value::from(user_id)),
      product_id: Some(Value::from(product_id)),
    }
  }

  pub fn validate(&self) -> ShopResult<CartRequest> {
    Ok(CartRequest {
      user_id: validation::require_id("user ID", self.user_id.as_ref())?,
      product_id: validation::require_id("product ID", self.product_id.as_ref())?,
    })
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseInput {
  #[serde(rename = "userID")]
  pub user_id: Option<Value>,
}

impl PurchaseInput {
  pub fn new(user_id: i64) -> Self {
    Self {
      user_id: Some(Value::from(user_id)),
    }
  }

  pub fn validate(&self) -> ShopResult<i64> {
    validation::require_id("user ID", self.user_id.as_ref())
  }
}

