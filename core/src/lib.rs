// storefront/src/lib.rs

//! Storefront: the business core of a small e-commerce backend.
//!
//! Users hold an account balance, browse a categorised product catalog, keep
//! a cart of products, and purchase the whole cart in one atomic step. The
//! crate provides:
//!  - Typed request inputs with field validation (`input`, `validation`).
//!  - A transactional store abstraction with Postgres and in-memory backends (`store`).
//!  - A small named-step pipeline executor bound to a unit of work (`pipeline`).
//!  - The `Shop` service exposing every catalog, account, cart and order operation.

pub mod error;
pub mod guards;
pub mod input;
pub mod models;
pub mod pipeline;
pub mod shop;
pub mod store;
pub mod validation;

pub use crate::error::{ConflictKind, ShopError, ShopResult};
pub use crate::input::{
  CartInput, CartQuery, CartRequest, CreateCategoryInput, CreateProductInput, CreateUserInput, DeleteUserInput,
  IdQuery, ListProductsQuery, PurchaseInput, UpdateProductInput,
};
pub use crate::pipeline::{Pipeline, PipelineControl, PipelineResult};
pub use crate::shop::Shop;
pub use crate::store::{settle, MemoryStore, PgStore, Store, StoreError, UnitOfWork};

pub use rust_decimal::Decimal;
