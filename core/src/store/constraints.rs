// storefront/src/store/constraints.rs

//! Names of the schema constraints, shared by the PostgreSQL migrations, the
//! in-memory store and the error translation in `crate::error`.

pub const USERS_USERNAME: &str = "users_username_key";
pub const USERS_BALANCE_NON_NEGATIVE: &str = "users_account_balance_check";

pub const CATEGORIES_NAME: &str = "categories_name_key";

pub const PRODUCTS_NAME: &str = "products_name_key";
pub const PRODUCTS_STOCK_NON_NEGATIVE: &str = "products_stock_check";
pub const PRODUCTS_CATEGORY_FK: &str = "products_category_id_fkey";

pub const CARTS_USER_PRODUCT: &str = "carts_user_id_product_id_key";
pub const CARTS_USER_FK: &str = "carts_user_id_fkey";
pub const CARTS_PRODUCT_FK: &str = "carts_product_id_fkey";

pub const ORDERS_USER_FK: &str = "orders_user_id_fkey";
pub const ORDER_LINE_ITEMS_ORDER_FK: &str = "order_line_items_order_id_fkey";
pub const ORDER_LINE_ITEMS_PRODUCT_FK: &str = "order_line_items_product_id_fkey";
