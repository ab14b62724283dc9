// storefront/src/store/postgres.rs

//! PostgreSQL-backed store. Each unit of work wraps one `sqlx` transaction;
//! if it is dropped without commit, sqlx rolls it back.

use super::{
  CartRepository, CategoryRepository, OrderRepository, ProductRepository, Store, StoreResult, UnitOfWork,
  UserRepository,
};
use crate::models::{
  CartLine, Category, NewCategory, NewLineItem, NewProduct, NewUser, Order, OrderLineItem, Product, ProductChanges,
  ProductFilter, User,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{info, instrument};

const USER_COLUMNS: &str = "id, username, account_balance, created_at, updated_at";
const CATEGORY_COLUMNS: &str = "id, name, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, category_id, created_at, updated_at";
const CART_COLUMNS: &str = "id, user_id, product_id, created_at";
const ORDER_COLUMNS: &str = "id, user_id, total, created_at";
const LINE_ITEM_COLUMNS: &str = "id, order_id, product_id, unit_price, created_at";

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  #[instrument(name = "PgStore::connect", skip(database_url))]
  pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    info!("Connected to PostgreSQL.");
    Ok(Self::new(pool))
  }

  /// Applies the migrations bundled under `core/migrations`.
  pub async fn migrate(&self) -> StoreResult<()> {
    sqlx::migrate!("./migrations")
      .run(&self.pool)
      .await
      .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
    info!("Database migrations applied.");
    Ok(())
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

#[async_trait]
impl Store for PgStore {
  async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
    let tx = self.pool.begin().await?;
    Ok(Box::new(PgUnitOfWork { tx }))
  }

  async fn close(&self) {
    self.pool.close().await;
    info!("PostgreSQL pool closed.");
  }
}

pub struct PgUnitOfWork {
  tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UserRepository for PgUnitOfWork {
  async fn insert_user(&mut self, user: &NewUser) -> StoreResult<User> {
    let sql = format!(
      "INSERT INTO users (username, account_balance) VALUES ($1, $2) RETURNING {}",
      USER_COLUMNS
    );
    let row = sqlx::query_as::<_, User>(&sql)
      .bind(&user.username)
      .bind(user.account_balance)
      .fetch_one(&mut *self.tx)
      .await?;
    Ok(row)
  }

  async fn find_user(&mut self, id: i64) -> StoreResult<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let row = sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(&mut *self.tx).await?;
    Ok(row)
  }

  async fn lock_user(&mut self, id: i64) -> StoreResult<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE id = $1 FOR UPDATE", USER_COLUMNS);
    let row = sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(&mut *self.tx).await?;
    Ok(row)
  }

  async fn list_users(&mut self) -> StoreResult<Vec<User>> {
    let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(&mut *self.tx).await?;
    Ok(rows)
  }

  async fn debit_balance(&mut self, id: i64, amount: Decimal) -> StoreResult<bool> {
    let result = sqlx::query(
      "UPDATE users SET account_balance = account_balance - $2, updated_at = now() \
       WHERE id = $1 AND account_balance >= $2",
    )
    .bind(id)
    .bind(amount)
    .execute(&mut *self.tx)
    .await?;
    Ok(result.rows_affected() == 1)
  }

  async fn delete_user(&mut self, id: i64) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
      .bind(id)
      .execute(&mut *self.tx)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl CategoryRepository for PgUnitOfWork {
  async fn insert_category(&mut self, category: &NewCategory) -> StoreResult<Category> {
    let sql = format!("INSERT INTO categories (name) VALUES ($1) RETURNING {}", CATEGORY_COLUMNS);
    let row = sqlx::query_as::<_, Category>(&sql)
      .bind(&category.name)
      .fetch_one(&mut *self.tx)
      .await?;
    Ok(row)
  }

  async fn find_category(&mut self, id: i64) -> StoreResult<Option<Category>> {
    let sql = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);
    let row = sqlx::query_as::<_, Category>(&sql)
      .bind(id)
      .fetch_optional(&mut *self.tx)
      .await?;
    Ok(row)
  }

  async fn list_categories(&mut self) -> StoreResult<Vec<Category>> {
    let sql = format!("SELECT {} FROM categories ORDER BY id", CATEGORY_COLUMNS);
    let rows = sqlx::query_as::<_, Category>(&sql).fetch_all(&mut *self.tx).await?;
    Ok(rows)
  }

  async fn delete_category(&mut self, id: i64) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
      .bind(id)
      .execute(&mut *self.tx)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl ProductRepository for PgUnitOfWork {
  async fn insert_product(&mut self, product: &NewProduct) -> StoreResult<Product> {
    let sql = format!(
      "INSERT INTO products (name, description, price, stock, category_id) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
      PRODUCT_COLUMNS
    );
    let row = sqlx::query_as::<_, Product>(&sql)
      .bind(&product.name)
      .bind(&product.description)
      .bind(product.price)
      .bind(product.stock)
      .bind(product.category_id)
      .fetch_one(&mut *self.tx)
      .await?;
    Ok(row)
  }

  async fn find_product(&mut self, id: i64) -> StoreResult<Option<Product>> {
    let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
    let row = sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .fetch_optional(&mut *self.tx)
      .await?;
    Ok(row)
  }

  async fn list_products(&mut self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
    let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM products WHERE TRUE", PRODUCT_COLUMNS));
    if let Some(category_id) = filter.category_id {
      query.push(" AND category_id = ").push_bind(category_id);
    }
    if let Some(price) = filter.price {
      query
        .push(" AND price ")
        .push(price.op.as_sql())
        .push(" ")
        .push_bind(price.value);
    }
    query.push(" ORDER BY id");

    let rows = query.build_query_as::<Product>().fetch_all(&mut *self.tx).await?;
    Ok(rows)
  }

  async fn update_product(&mut self, id: i64, changes: &ProductChanges) -> StoreResult<Option<Product>> {
    let sql = format!(
      "UPDATE products SET \
         name = COALESCE($2, name), \
         description = COALESCE($3, description), \
         price = COALESCE($4, price), \
         stock = COALESCE($5, stock), \
         category_id = COALESCE($6, category_id), \
         updated_at = now() \
       WHERE id = $1 RETURNING {}",
      PRODUCT_COLUMNS
    );
    let row = sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .bind(changes.name.as_deref())
      .bind(changes.description.as_deref())
      .bind(changes.price)
      .bind(changes.stock)
      .bind(changes.category_id)
      .fetch_optional(&mut *self.tx)
      .await?;
    Ok(row)
  }

  async fn decrement_stock(&mut self, id: i64) -> StoreResult<bool> {
    let result = sqlx::query("UPDATE products SET stock = stock - 1, updated_at = now() WHERE id = $1 AND stock > 0")
      .bind(id)
      .execute(&mut *self.tx)
      .await?;
    Ok(result.rows_affected() == 1)
  }

  async fn delete_product(&mut self, id: i64) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&mut *self.tx)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn count_products_in_category(&mut self, category_id: i64) -> StoreResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = $1")
      .bind(category_id)
      .fetch_one(&mut *self.tx)
      .await?;
    Ok(count)
  }
}

#[async_trait]
impl CartRepository for PgUnitOfWork {
  async fn insert_cart_line(&mut self, user_id: i64, product_id: i64) -> StoreResult<CartLine> {
    let sql = format!(
      "INSERT INTO carts (user_id, product_id) VALUES ($1, $2) RETURNING {}",
      CART_COLUMNS
    );
    let row = sqlx::query_as::<_, CartLine>(&sql)
      .bind(user_id)
      .bind(product_id)
      .fetch_one(&mut *self.tx)
      .await?;
    Ok(row)
  }

  async fn find_cart_line(&mut self, user_id: i64, product_id: i64) -> StoreResult<Option<CartLine>> {
    let sql = format!(
      "SELECT {} FROM carts WHERE user_id = $1 AND product_id = $2",
      CART_COLUMNS
    );
    let row = sqlx::query_as::<_, CartLine>(&sql)
      .bind(user_id)
      .bind(product_id)
      .fetch_optional(&mut *self.tx)
      .await?;
    Ok(row)
  }

  async fn list_cart_lines(&mut self, user_id: i64) -> StoreResult<Vec<CartLine>> {
    let sql = format!("SELECT {} FROM carts WHERE user_id = $1 ORDER BY id", CART_COLUMNS);
    let rows = sqlx::query_as::<_, CartLine>(&sql)
      .bind(user_id)
      .fetch_all(&mut *self.tx)
      .await?;
    Ok(rows)
  }

  async fn delete_cart_line(&mut self, id: i64) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM carts WHERE id = $1")
      .bind(id)
      .execute(&mut *self.tx)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn delete_cart_lines_for_user(&mut self, user_id: i64) -> StoreResult<u64> {
    let result = sqlx::query("DELETE FROM carts WHERE user_id = $1")
      .bind(user_id)
      .execute(&mut *self.tx)
      .await?;
    Ok(result.rows_affected())
  }
}

#[async_trait]
impl OrderRepository for PgUnitOfWork {
  async fn insert_order(&mut self, user_id: i64, total: Decimal) -> StoreResult<Order> {
    let sql = format!("INSERT INTO orders (user_id, total) VALUES ($1, $2) RETURNING {}", ORDER_COLUMNS);
    let row = sqlx::query_as::<_, Order>(&sql)
      .bind(user_id)
      .bind(total)
      .fetch_one(&mut *self.tx)
      .await?;
    Ok(row)
  }

  async fn insert_line_item(&mut self, item: &NewLineItem) -> StoreResult<OrderLineItem> {
    let sql = format!(
      "INSERT INTO order_line_items (order_id, product_id, unit_price) VALUES ($1, $2, $3) RETURNING {}",
      LINE_ITEM_COLUMNS
    );
    let row = sqlx::query_as::<_, OrderLineItem>(&sql)
      .bind(item.order_id)
      .bind(item.product_id)
      .bind(item.unit_price)
      .fetch_one(&mut *self.tx)
      .await?;
    Ok(row)
  }

  async fn list_orders(&mut self) -> StoreResult<Vec<Order>> {
    let sql = format!("SELECT {} FROM orders ORDER BY id", ORDER_COLUMNS);
    let rows = sqlx::query_as::<_, Order>(&sql).fetch_all(&mut *self.tx).await?;
    Ok(rows)
  }

  async fn list_line_items(&mut self, order_id: i64) -> StoreResult<Vec<OrderLineItem>> {
    let sql = format!(
      "SELECT {} FROM order_line_items WHERE order_id = $1 ORDER BY id",
      LINE_ITEM_COLUMNS
    );
    let rows = sqlx::query_as::<_, OrderLineItem>(&sql)
      .bind(order_id)
      .fetch_all(&mut *self.tx)
      .await?;
    Ok(rows)
  }

  async fn count_line_items_for_product(&mut self, product_id: i64) -> StoreResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_line_items WHERE product_id = $1")
      .bind(product_id)
      .fetch_one(&mut *self.tx)
      .await?;
    Ok(count)
  }

  async fn count_orders_for_user(&mut self, user_id: i64) -> StoreResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
      .bind(user_id)
      .fetch_one(&mut *self.tx)
      .await?;
    Ok(count)
  }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
  async fn commit(self: Box<Self>) -> StoreResult<()> {
    self.tx.commit().await?;
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> StoreResult<()> {
    self.tx.rollback().await?;
    Ok(())
  }
}
