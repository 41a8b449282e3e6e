//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use pawcart_app::{
    auth::{AuthServiceError, MockAuthService},
    context::AppContext,
    domain::{
        addresses::{MockAddressesService, records::AddressUuid},
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartItemUuid, CartRecord, CartStatus, CartUuid},
        },
        catalog::{
            MockCatalogService,
            records::{ProductRecord, ProductUuid, Species, VariantRecord, VariantUuid},
        },
        checkout::MockCheckoutService,
        orders::{
            MockOrdersService,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderStatus, OrderUuid},
        },
        payments::records::{PaymentMethod, PaymentRecord, PaymentStatus, PaymentUuid},
        users::records::UserUuid,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_TOKEN: &str =
    "pc_0000000000000000000000000000000000000000000000000000000000000000";

/// One mock per service. Mocks without expectations fail the test if called.
#[derive(Default)]
pub(crate) struct TestApp {
    pub(crate) auth: MockAuthService,
    pub(crate) carts: MockCartsService,
    pub(crate) catalog: MockCatalogService,
    pub(crate) checkout: MockCheckoutService,
    pub(crate) orders: MockOrdersService,
    pub(crate) addresses: MockAddressesService,
}

impl TestApp {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            auth: Arc::new(self.auth),
            carts: Arc::new(self.carts),
            catalog: Arc::new(self.catalog),
            checkout: Arc::new(self.checkout),
            orders: Arc::new(self.orders),
            addresses: Arc::new(self.addresses),
        })
    }
}

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// Auth mock accepting [`TEST_TOKEN`] as [`TEST_USER_UUID`] and rejecting anything else.
pub(crate) fn accepting_auth() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().returning(|token| {
        if token == TEST_TOKEN {
            Ok(TEST_USER_UUID)
        } else {
            Err(AuthServiceError::NotFound)
        }
    });

    auth
}

/// A service whose routes see the caller as [`TEST_USER_UUID`] without a token.
pub(crate) fn authed_service(app: TestApp, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(app.into_state()))
            .hoop(inject_user)
            .push(route),
    )
}

/// A service whose routes authenticate the request themselves.
pub(crate) fn public_service(app: TestApp, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(app.into_state())).push(route))
}

pub(crate) fn make_cart(items: Vec<CartItemRecord>) -> CartRecord {
    CartRecord {
        uuid: CartUuid::new(),
        user_uuid: TEST_USER_UUID,
        status: CartStatus::Active,
        items,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart_item(unit_price: u64, quantity: u32) -> CartItemRecord {
    CartItemRecord {
        uuid: CartItemUuid::new(),
        cart_uuid: CartUuid::new(),
        variant_uuid: VariantUuid::new(),
        product_name: "Ração Premium".to_string(),
        variant_name: "1kg".to_string(),
        unit_price,
        quantity,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A committed order for 2 × 50.00 with a 10.00 discount, paid by pix.
pub(crate) fn make_order(number: i64) -> OrderRecord {
    let uuid = OrderUuid::new();

    OrderRecord {
        uuid,
        number,
        user_uuid: TEST_USER_UUID,
        cart_uuid: CartUuid::new(),
        address_uuid: AddressUuid::new(),
        coupon_uuid: None,
        status: OrderStatus::Pending,
        payment_method: PaymentMethod::Pix,
        subtotal: 100_00,
        discount: 10_00,
        shipping_cost: 0,
        total: 90_00,
        items: vec![OrderItemRecord {
            uuid: OrderItemUuid::new(),
            order_uuid: uuid,
            variant_uuid: Some(VariantUuid::new()),
            product_name: "Ração Premium".to_string(),
            variant_name: "1kg".to_string(),
            quantity: 2,
            unit_price: 50_00,
            total_price: 100_00,
            created_at: Timestamp::UNIX_EPOCH,
        }],
        payment: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_payment(order: &OrderRecord) -> PaymentRecord {
    PaymentRecord {
        uuid: PaymentUuid::new(),
        order_uuid: order.uuid,
        provider: "stub".to_string(),
        method: order.payment_method,
        amount: order.total,
        status: PaymentStatus::Initiated,
        external_id: Uuid::new_v4().to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A dog food with a 3kg and a 15kg variant.
pub(crate) fn make_product(slug: &str) -> ProductRecord {
    let uuid = ProductUuid::new();

    let variant = |name: &str, price: u64, stock: u32| VariantRecord {
        uuid: VariantUuid::new(),
        product_uuid: uuid,
        name: name.to_string(),
        price,
        compare_at_price: None,
        stock,
        active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    };

    ProductRecord {
        uuid,
        name: "Ração Golden Adulto".to_string(),
        slug: slug.to_string(),
        description: Some("Frango e arroz".to_string()),
        brand: Some("Golden".to_string()),
        species: Species::Dog,
        active: true,
        variants: vec![variant("3kg", 49_90, 0), variant("15kg", 189_90, 5)],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
