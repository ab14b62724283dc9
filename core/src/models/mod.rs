// storefront/src/models/mod.rs

//! Data structures representing database rows, plus the shapes used to insert them.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{CartLine, CartSummary};
pub use category::{Category, NewCategory};
pub use order::{NewLineItem, Order, OrderLineItem, OrderView};
pub use product::{NewProduct, PriceFilter, PriceOp, Product, ProductChanges, ProductFilter, ProductView};
pub use user::{NewUser, User};
