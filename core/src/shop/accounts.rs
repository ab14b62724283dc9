// storefront/src/shop/accounts.rs

use super::Shop;
use crate::error::{ShopError, ShopResult};
use crate::guards;
use crate::input::{CreateUserInput, DeleteUserInput};
use crate::models::User;
use crate::store::{settle, UnitOfWork};
use crate::validation;
use tracing::{debug, info, instrument};

const USER_NOT_FOUND: &str = "User not found.";

impl Shop {
  /// Creates a user with a starting balance. The cart starts out empty; rows
  /// appear as products are added.
  #[instrument(name = "Shop::create_user", skip_all)]
  pub async fn create_user(&self, input: &CreateUserInput) -> ShopResult<User> {
    let new_user = input.validate()?;
    let mut uow = self.store.begin().await?;
    let result = uow.insert_user(&new_user).await.map_err(ShopError::from);
    let user = settle(uow, result).await?;
    info!(user_id = user.id, username = %user.username, "User created.");
    Ok(user)
  }

  #[instrument(name = "Shop::get_user", skip(self))]
  pub async fn get_user(&self, raw_id: &str) -> ShopResult<User> {
    let id = validation::require_id_param("user ID", Some(raw_id))?;
    let mut uow = self.store.begin().await?;
    let result = match uow.find_user(id).await {
      Ok(Some(user)) => Ok(user),
      Ok(None) => Err(ShopError::not_found(USER_NOT_FOUND)),
      Err(e) => Err(e.into()),
    };
    settle(uow, result).await
  }

  #[instrument(name = "Shop::list_users", skip_all)]
  pub async fn list_users(&self) -> ShopResult<Vec<User>> {
    let mut uow = self.store.begin().await?;
    let result = uow.list_users().await.map_err(ShopError::from);
    settle(uow, result).await
  }

  /// Removes the user and their cart. Refused while the user has orders.
  #[instrument(name = "Shop::delete_user", skip_all, fields(id = ?input.id))]
  pub async fn delete_user(&self, input: &DeleteUserInput) -> ShopResult<()> {
    let id = input.validate()?;
    let mut uow = self.store.begin().await?;
    let result = delete_user_in(uow.as_mut(), id).await;
    settle(uow, result).await?;
    info!(user_id = id, "User deleted.");
    Ok(())
  }
}

async fn delete_user_in(uow: &mut dyn UnitOfWork, id: i64) -> ShopResult<()> {
  if uow.find_user(id).await?.is_none() {
    return Err(ShopError::not_found(USER_NOT_FOUND));
  }
  guards::user_unreferenced(uow, id).await?;
  let removed = uow.delete_cart_lines_for_user(id).await?;
  uow
    .delete_user(id)
    .await
    .map_err(guards::on_delete(guards::USER_REFERENCED))?;
  debug!(user_id = id, cart_lines = removed, "Cart cleared with user.");
  Ok(())
}
