// storefront_server/src/state.rs
use storefront::Shop;

#[derive(Clone)]
pub struct AppState {
  pub shop: Shop,
}
