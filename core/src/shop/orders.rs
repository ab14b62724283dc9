// storefront/src/shop/orders.rs

use super::Shop;
use crate::error::ShopResult;
use crate::models::OrderView;
use crate::store::{settle, UnitOfWork};
use tracing::instrument;

impl Shop {
  /// Every order with its line items, oldest first.
  #[instrument(name = "Shop::list_orders", skip_all)]
  pub async fn list_orders(&self) -> ShopResult<Vec<OrderView>> {
    let mut uow = self.store.begin().await?;
    let result = list_orders_in(uow.as_mut()).await;
    settle(uow, result).await
  }
}

async fn list_orders_in(uow: &mut dyn UnitOfWork) -> ShopResult<Vec<OrderView>> {
  let orders = uow.list_orders().await?;
  let mut views = Vec::with_capacity(orders.len());
  for order in orders {
    let line_items = uow.list_line_items(order.id).await?;
    views.push(OrderView { order, line_items });
  }
  Ok(views)
}
