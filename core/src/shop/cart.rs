// storefront/src/shop/cart.rs

//! Add-to-cart and remove-from-cart as pipelines over a shared `CartCtx`.
//! A cart is the set of `carts` rows of one user, one row per product.

use super::Shop;
use crate::error::{ConflictKind, ShopError, ShopResult};
use crate::input::{CartInput, CartQuery, CartRequest};
use crate::models::{CartLine, CartSummary};
use crate::pipeline::{Pipeline, PipelineControl};
use crate::store::{settle, UnitOfWork};
use futures_util::future::BoxFuture;
use once_cell::sync::Lazy;
use tracing::{info, instrument};

pub(crate) const CART_EMPTY: &str = "Cart not found or is empty.";
const NOT_IN_CART: &str = "The product is not in the user's cart.";

static ADD_TO_CART: Lazy<Pipeline<CartCtx>> = Lazy::new(|| {
  Pipeline::<CartCtx>::new("add_to_cart")
    .step("load_user", load_user)
    .step("load_product", load_product)
    .step("reject_duplicate_line", reject_duplicate_line)
    .step("insert_cart_line", insert_cart_line)
});

static REMOVE_FROM_CART: Lazy<Pipeline<CartCtx>> = Lazy::new(|| {
  Pipeline::<CartCtx>::new("remove_from_cart")
    .step("load_user", load_user)
    .step("load_product", load_product)
    .step("load_cart_line", load_cart_line)
    .step("delete_cart_line", delete_cart_line)
});

pub(crate) struct CartCtx {
  request: CartRequest,
  line_id: i64,
  line: Option<CartLine>,
}

impl CartCtx {
  fn new(request: CartRequest) -> Self {
    Self {
      request,
      line_id: 0,
      line: None,
    }
  }
}

// Takes the same user row lock as a purchase, so cart edits and a purchase
// of that user's cart never interleave.
fn load_user<'a>(uow: &'a mut dyn UnitOfWork, ctx: &'a mut CartCtx) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    if uow.lock_user(ctx.request.user_id).await?.is_none() {
      return Err(ShopError::not_found("User not found."));
    }
    Ok(PipelineControl::Continue)
  })
}

fn load_product<'a>(uow: &'a mut dyn UnitOfWork, ctx: &'a mut CartCtx) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    if uow.find_product(ctx.request.product_id).await?.is_none() {
      return Err(ShopError::not_found("Product not found."));
    }
    Ok(PipelineControl::Continue)
  })
}

fn reject_duplicate_line<'a>(
  uow: &'a mut dyn UnitOfWork,
  ctx: &'a mut CartCtx,
) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    let CartRequest { user_id, product_id } = ctx.request;
    if uow.find_cart_line(user_id, product_id).await?.is_some() {
      return Err(ShopError::conflict(
        ConflictKind::AlreadyInCart,
        "The product is already in the user's cart.",
      ));
    }
    Ok(PipelineControl::Continue)
  })
}

// The unique (user_id, product_id) key still backs the check above; a
// concurrent insert surfaces as `AlreadyInCart` too.
fn insert_cart_line<'a>(
  uow: &'a mut dyn UnitOfWork,
  ctx: &'a mut CartCtx,
) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    let line = uow
      .insert_cart_line(ctx.request.user_id, ctx.request.product_id)
      .await?;
    ctx.line = Some(line);
    Ok(PipelineControl::Continue)
  })
}

fn load_cart_line<'a>(uow: &'a mut dyn UnitOfWork, ctx: &'a mut CartCtx) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    let CartRequest { user_id, product_id } = ctx.request;
    let line = uow
      .find_cart_line(user_id, product_id)
      .await?
      .ok_or_else(|| ShopError::not_found(NOT_IN_CART))?;
    ctx.line_id = line.id;
    Ok(PipelineControl::Continue)
  })
}

fn delete_cart_line<'a>(
  uow: &'a mut dyn UnitOfWork,
  ctx: &'a mut CartCtx,
) -> BoxFuture<'a, ShopResult<PipelineControl>> {
  Box::pin(async move {
    if !uow.delete_cart_line(ctx.line_id).await? {
      return Err(ShopError::not_found(NOT_IN_CART));
    }
    Ok(PipelineControl::Continue)
  })
}

impl Shop {
  #[instrument(name = "Shop::add_to_cart", skip_all, fields(user_id = ?input.user_id, product_id = ?input.product_id))]
  pub async fn add_to_cart(&self, input: &CartInput) -> ShopResult<CartLine> {
    let request = input.validate()?;
    let mut ctx = CartCtx::new(request);
    ADD_TO_CART.run_atomic(self.store(), &mut ctx).await?;
    let line = ctx.line.ok_or_else(|| ShopError::Halted {
      pipeline: ADD_TO_CART.name().to_string(),
    })?;
    info!(cart_line_id = line.id, "Product added to cart.");
    Ok(line)
  }

  #[instrument(name = "Shop::remove_from_cart", skip_all, fields(user_id = ?input.user_id, product_id = ?input.product_id))]
  pub async fn remove_from_cart(&self, input: &CartInput) -> ShopResult<()> {
    let request = input.validate()?;
    let mut ctx = CartCtx::new(request);
    REMOVE_FROM_CART.run_atomic(self.store(), &mut ctx).await?;
    info!("Product removed from cart.");
    Ok(())
  }

  /// The user's cart. `cart_id` is the id of the oldest row; an empty cart is `NotFound`.
  #[instrument(name = "Shop::get_cart", skip_all, fields(user_id = ?query.user_id))]
  pub async fn get_cart(&self, query: &CartQuery) -> ShopResult<CartSummary> {
    let user_id = query.validate()?;
    let mut uow = self.store.begin().await?;
    let result = match uow.list_cart_lines(user_id).await {
      Ok(lines) => summarize(user_id, &lines),
      Err(e) => Err(e.into()),
    };
    settle(uow, result).await
  }
}

fn summarize(user_id: i64, lines: &[CartLine]) -> ShopResult<CartSummary> {
  let first = lines.first().ok_or_else(|| ShopError::not_found(CART_EMPTY))?;
  Ok(CartSummary {
    cart_id: first.id,
    user_id,
    product_ids: lines.iter().map(|line| line.product_id).collect(),
  })
}
