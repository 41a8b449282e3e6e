//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pawcart::{Line, evaluate};
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{error, info, instrument};

use crate::{
    database::Db,
    domain::{
        addresses::repository::PgAddressesRepository,
        carts::{
            records::{CartItemRecord, CartUuid},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        catalog::repository::PgCatalogRepository,
        checkout::{
            data::{CheckoutSettings, CommitOrder},
            errors::{CheckoutServiceError, StockShortfall},
            records::{CheckoutTotals, PlacedOrder},
        },
        coupons::{records::CouponRecord, repository::PgCouponsRepository},
        orders::{
            data::{NewOrder, NewOrderItem},
            records::{OrderItemUuid, OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
        },
        payments::PaymentsService,
        users::records::UserUuid,
    },
    money::{CURRENCY, to_money},
};

/// Prices carts and commits them as orders inside a single transaction per commit.
#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    payments: Arc<dyn PaymentsService>,
    settings: CheckoutSettings,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    catalog_repository: PgCatalogRepository,
    coupons_repository: PgCouponsRepository,
    addresses_repository: PgAddressesRepository,
    orders_repository: PgOrdersRepository,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, payments: Arc<dyn PaymentsService>, settings: CheckoutSettings) -> Self {
        Self {
            db,
            payments,
            settings,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            catalog_repository: PgCatalogRepository::new(),
            coupons_repository: PgCouponsRepository::new(),
            addresses_repository: PgAddressesRepository::new(),
            orders_repository: PgOrdersRepository::new(),
        }
    }

    /// Check every item against the locked variant rows and report all shortfalls at once.
    async fn reserve_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[CartItemRecord],
    ) -> Result<(), CheckoutServiceError> {
        let variants: Vec<_> = items.iter().map(|item| item.variant_uuid).collect();

        let locked: FxHashMap<_, _> = self
            .catalog_repository
            .lock_variants(tx, &variants)
            .await?
            .into_iter()
            .map(|variant| (variant.uuid, variant))
            .collect();

        let shortfalls: Vec<StockShortfall> = items
            .iter()
            .filter_map(|item| {
                let available = locked
                    .get(&item.variant_uuid)
                    .filter(|variant| variant.available)
                    .map_or(0, |variant| variant.stock);

                (available < item.quantity).then_some(StockShortfall {
                    variant: item.variant_uuid,
                    requested: item.quantity,
                    available,
                })
            })
            .collect();

        if shortfalls.is_empty() {
            Ok(())
        } else {
            Err(CheckoutServiceError::InsufficientStock(shortfalls))
        }
    }
}

/// Treat a missing or blank coupon code as no coupon.
fn non_blank_code(code: Option<&str>) -> Option<&str> {
    code.filter(|code| !code.trim().is_empty())
}

fn to_lines(items: &[CartItemRecord]) -> Result<Vec<Line<'static>>, CheckoutServiceError> {
    items
        .iter()
        .map(|item| {
            if item.quantity == 0 {
                return Err(CheckoutServiceError::InvalidQuantity);
            }

            Ok(Line::new(to_money(item.unit_price)?, item.quantity))
        })
        .collect()
}

fn to_order_item(
    item: &CartItemRecord,
    line: &Line<'_>,
) -> Result<NewOrderItem, CheckoutServiceError> {
    let total = line.total()?;

    Ok(NewOrderItem {
        uuid: OrderItemUuid::new(),
        variant_uuid: item.variant_uuid,
        product_name: item.product_name.clone(),
        variant_name: item.variant_name.clone(),
        quantity: i32::try_from(item.quantity)?,
        unit_price: line.unit_price().to_minor_units(),
        total_price: total.to_minor_units(),
    })
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn preview_totals(
        &self,
        user: UserUuid,
        cart: CartUuid,
        coupon_code: Option<String>,
    ) -> Result<CheckoutTotals, CheckoutServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self
            .carts_repository
            .get_active_cart(&mut tx, cart)
            .await?
            .ok_or(CheckoutServiceError::CartNotFound)?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        let lines = to_lines(&items)?;

        let coupon = match non_blank_code(coupon_code.as_deref()) {
            Some(code) if !lines.is_empty() => Some(
                self.coupons_repository
                    .get_coupon_by_code(&mut tx, code)
                    .await?
                    .ok_or(CheckoutServiceError::CouponNotFound)?,
            ),
            Some(_) | None => None,
        };

        tx.commit().await?;

        let coupon = coupon.as_ref().map(CouponRecord::to_coupon).transpose()?;

        let totals = evaluate(&lines, coupon.as_ref(), CURRENCY, Timestamp::now())?;

        Ok(CheckoutTotals::try_from(&totals)?)
    }

    #[instrument(
        skip(self, order),
        fields(user = %user, cart = %cart, payment_method = %order.payment_method),
        err
    )]
    async fn commit_order(
        &self,
        user: UserUuid,
        cart: CartUuid,
        order: CommitOrder,
    ) -> Result<OrderRecord, CheckoutServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self
            .carts_repository
            .lock_active_cart(&mut tx, cart)
            .await?
            .ok_or(CheckoutServiceError::CartNotFound)?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        if items.is_empty() {
            return Err(CheckoutServiceError::EmptyCart);
        }

        let lines = to_lines(&items)?;

        if !self
            .addresses_repository
            .address_exists(&mut tx, order.address_uuid)
            .await?
        {
            return Err(CheckoutServiceError::AddressNotFound);
        }

        self.reserve_stock(&mut tx, &items).await?;

        let coupon_record = match non_blank_code(order.coupon_code.as_deref()) {
            Some(code) => Some(
                self.coupons_repository
                    .lock_coupon_by_code(&mut tx, code)
                    .await?
                    .ok_or(CheckoutServiceError::CouponNotFound)?,
            ),
            None => None,
        };

        let coupon = coupon_record
            .as_ref()
            .map(CouponRecord::to_coupon)
            .transpose()?;

        let totals = evaluate(&lines, coupon.as_ref(), CURRENCY, Timestamp::now())?
            .with_shipping(to_money(self.settings.shipping_cost)?)?;

        let mut created = self
            .orders_repository
            .create_order(
                &mut tx,
                &NewOrder {
                    uuid: OrderUuid::new(),
                    cart_uuid: cart.uuid,
                    address_uuid: order.address_uuid,
                    coupon_uuid: coupon_record.as_ref().map(|coupon| coupon.uuid),
                    payment_method: order.payment_method,
                    subtotal: totals.subtotal.to_minor_units(),
                    discount: totals.discount.to_minor_units(),
                    shipping_cost: totals.shipping.to_minor_units(),
                    total: totals.total.to_minor_units(),
                },
            )
            .await?;

        for (item, line) in items.iter().zip(&lines) {
            let new_item = to_order_item(item, line)?;

            let order_item = self
                .orders_repository
                .create_order_item(&mut tx, created.uuid, &new_item)
                .await?;

            created.items.push(order_item);

            if !self
                .catalog_repository
                .decrement_stock(&mut tx, item.variant_uuid, new_item.quantity)
                .await?
            {
                return Err(CheckoutServiceError::InsufficientStock(vec![
                    StockShortfall {
                        variant: item.variant_uuid,
                        requested: item.quantity,
                        available: 0,
                    },
                ]));
            }
        }

        if self
            .carts_repository
            .mark_converted(&mut tx, cart.uuid)
            .await?
            == 0
        {
            return Err(CheckoutServiceError::CartNotFound);
        }

        if let Some(coupon) = &coupon_record {
            self.coupons_repository
                .increment_usage(&mut tx, coupon.uuid)
                .await?;
        }

        tx.commit().await?;

        info!(
            order = %created.uuid,
            number = created.number,
            total = created.total,
            items = created.items.len(),
            "order committed"
        );

        Ok(created)
    }

    async fn place_order(
        &self,
        user: UserUuid,
        order: CommitOrder,
    ) -> Result<PlacedOrder, CheckoutServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self
            .carts_repository
            .find_active_cart(&mut tx)
            .await?
            .ok_or(CheckoutServiceError::CartNotFound)?;

        tx.commit().await?;

        let order = self.commit_order(user, cart.uuid, order).await?;

        match self
            .payments
            .create_payment_record(user, order.uuid, order.payment_method, order.total)
            .await
        {
            Ok(payment) => Ok(PlacedOrder { order, payment }),
            Err(source) => {
                error!(
                    order = %order.uuid,
                    number = order.number,
                    error = %source,
                    "order committed without a payment record"
                );

                Err(CheckoutServiceError::PaymentRecordFailed {
                    order: order.uuid,
                    number: order.number,
                    source,
                })
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Price the caller's active cart with an optional coupon.
    ///
    /// Never writes: coupon usage is only counted when an order is committed. Shipping is
    /// not included.
    async fn preview_totals(
        &self,
        user: UserUuid,
        cart: CartUuid,
        coupon_code: Option<String>,
    ) -> Result<CheckoutTotals, CheckoutServiceError>;

    /// Convert the caller's active cart into an order.
    ///
    /// Stock is checked and decremented, the order and its items are written, the cart is
    /// marked converted and coupon usage counted, all in one transaction. On any error
    /// nothing is written and the cart stays active.
    async fn commit_order(
        &self,
        user: UserUuid,
        cart: CartUuid,
        order: CommitOrder,
    ) -> Result<OrderRecord, CheckoutServiceError>;

    /// Commit the caller's active cart and open a payment for the new order.
    async fn place_order(
        &self,
        user: UserUuid,
        order: CommitOrder,
    ) -> Result<PlacedOrder, CheckoutServiceError>;
}
