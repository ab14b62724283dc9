// storefront/src/shop/purchase.rs

//! Cart checkout. The whole workflow runs as one pipeline inside one unit of
//! work: any failing step, including one after the balance was debited,
//! rolls back every write made so far.

use super::cart::CART_EMPTY;
use super::Shop;
use crate::error::{ConflictKind, ShopError, ShopResult};
use crate::input::PurchaseInput;
use crate::models::{NewLineItem, Order, OrderLineItem, OrderView, Product};
use crate::pipeline::{Pipeline, PipelineControl};
use crate::store::UnitOfWork;
use futures_util::future::BoxFuture;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

const INSUFFICIENT_FUNDS: &str = "The user does not have enough funds to purchase the items.";
const CART_CHANGED: &str = "The cart changed during the purchase.";

static PURCHASE: Lazy<Pipeline<PurchaseCtx>> = Lazy::new(|| {
  Pipeline::<PurchaseCtx>::new("purchase")
    .step("lock_user", lock_user)
    .step("load_cart", load_cart)
    .step("compute_total", compute_total)
    .step("check_funds", check_funds)
    .step("debit_balance", debit_balance)
    .step("create_order", create_order)
    .step("convert_cart_lines", convert_cart_lines)
});

struct PurchaseLine {
  cart_line_id: i64,
  product: Product,
}

struct PurchaseCtx {
  user_id: i64,
  balance: Decimal,
  lines: Vec<PurchaseLine>,
  total: Decimal,
  order_id: i64,
  order: Option<Order>,
  line_items: Vec<OrderLineItem>,
}

impl PurchaseCtx {
  fn new(user_id: i64) -> Self {
    Self {
      user_id,
      balance: Decimal::ZERO,
      lines: Vec::new(),
      total: Decimal::ZERO,
      order_id: 0,
      order: None,
      line_items: Vec::new(),
    }
  }
}

// Holding the user row lock serializes concurrent purchases by one user.
fn lock_user<'a>(uow: &'a mut dyn UnitOfWork, ctx: &'a mut PurchaseCtx) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    let user = uow
      .lock_user(ctx.user_id)
      .await?
      .ok_or_else(|| ShopError::not_found("User not found."))?;
    ctx.balance = user.account_balance;
    Ok(PipelineControl::Continue)
  })
}

fn load_cart<'a>(uow: &'a mut dyn UnitOfWork, ctx: &'a mut PurchaseCtx) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    let cart_lines = uow.list_cart_lines(ctx.user_id).await?;
    if cart_lines.is_empty() {
      return Err(ShopError::not_found(CART_EMPTY));
    }
    for cart_line in cart_lines {
      let product = uow
        .find_product(cart_line.product_id)
        .await?
        .ok_or_else(|| ShopError::not_found(format!("Product {} in the cart no longer exists.", cart_line.product_id)))?;
      ctx.lines.push(PurchaseLine {
        cart_line_id: cart_line.id,
        product,
      });
    }
    Ok(PipelineControl::Continue)
  })
}

fn compute_total<'a>(
  _uow: &'a mut dyn UnitOfWork,
  ctx: &'a mut PurchaseCtx,
) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    ctx.total = ctx.lines.iter().map(|line| line.product.price).sum();
    debug!(total = %ctx.total, lines = ctx.lines.len(), "Cart total computed.");
    Ok(PipelineControl::Continue)
  })
}

fn check_funds<'a>(
  _uow: &'a mut dyn UnitOfWork,
  ctx: &'a mut PurchaseCtx,
) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    if ctx.balance < ctx.total {
      return Err(ShopError::conflict(ConflictKind::InsufficientFunds, INSUFFICIENT_FUNDS));
    }
    Ok(PipelineControl::Continue)
  })
}

fn debit_balance<'a>(
  uow: &'a mut dyn UnitOfWork,
  ctx: &'a mut PurchaseCtx,
) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    if !uow.debit_balance(ctx.user_id, ctx.total).await? {
      return Err(ShopError::conflict(ConflictKind::InsufficientFunds, INSUFFICIENT_FUNDS));
    }
    Ok(PipelineControl::Continue)
  })
}

fn create_order<'a>(
  uow: &'a mut dyn UnitOfWork,
  ctx: &'a mut PurchaseCtx,
) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    let order = uow.insert_order(ctx.user_id, ctx.total).await?;
    ctx.order_id = order.id;
    ctx.order = Some(order);
    Ok(PipelineControl::Continue)
  })
}

/// Each cart row becomes a line item priced at the current product price,
/// takes one unit of stock and is removed from the cart. A row that is gone
/// by the time it is removed fails the purchase.
fn convert_cart_lines<'a>(
  uow: &'a mut dyn UnitOfWork,
  ctx: &'a mut PurchaseCtx,
) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    let order_id = ctx.order_id;
    for line in &ctx.lines {
      let item = uow
        .insert_line_item(&NewLineItem {
          order_id,
          product_id: line.product.id,
          unit_price: line.product.price,
        })
        .await?;
      if !uow.decrement_stock(line.product.id).await? {
        return Err(ShopError::conflict(
          ConflictKind::OutOfStock,
          format!("The product '{}' is out of stock.", line.product.name),
        ));
      }
      if !uow.delete_cart_line(line.cart_line_id).await? {
        return Err(ShopError::not_found(CART_CHANGED));
      }
      ctx.line_items.push(item);
    }
    Ok(PipelineControl::Continue)
  })
}

impl Shop {
  /// Buys everything in the user's cart: debits the cart total, records an
  /// order with one line item per product, takes one unit of stock per
  /// product and empties the cart. All or nothing.
  #[instrument(name = "Shop::purchase", skip_all, fields(user_id = ?input.user_id))]
  pub async fn purchase(&self, input: &PurchaseInput) -> ShopResult<OrderView> {
    let user_id = input.validate()?;
    let mut ctx = PurchaseCtx::new(user_id);
    PURCHASE.run_atomic(self.store(), &mut ctx).await?;
    let order = ctx.order.ok_or_else(|| ShopError::Halted {
      pipeline: PURCHASE.name().to_string(),
    })?;
    info!(
      order_id = order.id,
      user_id,
      total = %order.total,
      items = ctx.line_items.len(),
      "Purchase completed."
    );
    Ok(OrderView {
      order,
      line_items: ctx.line_items,
    })
  }
}
