//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::{CartItemUuid, CartRecord},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        users::records::UserUuid,
    },
};

/// Each retry follows a commit that converted the cart while the mutation waited.
const CART_RESOLVE_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }

    /// Resolve the caller's active cart and hold its row lock until the transaction ends.
    ///
    /// Mutations queue behind a commit of the same cart. When that commit converts it, the
    /// lock query no longer matches and the next attempt resolves a fresh active cart.
    async fn lock_mutable_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<CartRecord, CartsServiceError> {
        for _ in 0..CART_RESOLVE_ATTEMPTS {
            let cart = self.carts_repository.ensure_active_cart(tx).await?;

            if let Some(cart) = self.carts_repository.lock_active_cart(tx, cart.uuid).await? {
                return Ok(cart);
            }
        }

        Err(CartsServiceError::NotFound)
    }

    async fn load_active_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut cart = self.carts_repository.ensure_active_cart(tx).await?;

        let items = self.items_repository.get_cart_items(tx, cart.uuid).await?;

        cart.items.extend(items);

        Ok(cart)
    }
}

fn to_quantity(quantity: u32) -> Result<i32, CartsServiceError> {
    match i32::try_from(quantity) {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        Ok(_) | Err(_) => Err(CartsServiceError::InvalidQuantity),
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_active_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self.load_active_cart(&mut tx).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        let quantity = to_quantity(item.quantity)?;

        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self.lock_mutable_cart(&mut tx).await?;

        self.items_repository
            .upsert_cart_item(&mut tx, cart.uuid, item.variant_uuid, quantity)
            .await?
            .ok_or(CartsServiceError::VariantNotFound)?;

        let cart = self.load_active_cart(&mut tx).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self.lock_mutable_cart(&mut tx).await?;

        let rows_affected = if quantity == 0 {
            self.items_repository
                .delete_cart_item(&mut tx, cart.uuid, item)
                .await?
        } else {
            self.items_repository
                .update_quantity(&mut tx, cart.uuid, item, to_quantity(quantity)?)
                .await?
        };

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        let cart = self.load_active_cart(&mut tx).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        self.update_item_quantity(user, item, 0).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the caller's active cart with its items, creating an empty one if needed.
    async fn get_active_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Add a variant to the caller's active cart.
    ///
    /// The variant's current price is captured on first add; adding a variant already in
    /// the cart increases its quantity and keeps the captured price.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Set the quantity of an item in the caller's active cart. Zero removes the item.
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove an item from the caller's active cart.
    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartRecord, CartsServiceError>;
}
