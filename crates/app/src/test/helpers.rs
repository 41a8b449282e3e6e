//! Test Helpers

use testresult::TestResult;

use crate::{
    domain::{
        addresses::{AddressesService, data::NewAddress, records::AddressUuid},
        carts::{CartsService, data::NewCartItem},
        catalog::{
            CatalogService,
            data::{NewProduct, NewVariant},
            records::{ProductUuid, Species, VariantRecord, VariantUuid},
        },
        checkout::{CheckoutService, data::CommitOrder},
        coupons::{data::NewCoupon, records::CouponDiscount, records::CouponUuid},
        orders::records::OrderRecord,
        payments::records::PaymentMethod,
        users::records::UserUuid,
    },
    test::TestContext,
};

pub(crate) fn new_address(uuid: AddressUuid) -> NewAddress {
    NewAddress {
        uuid,
        recipient: "Ana Souza".to_string(),
        street: "Rua das Flores".to_string(),
        number: "123".to_string(),
        complement: Some("Apto 4".to_string()),
        district: "Centro".to_string(),
        city: "Curitiba".to_string(),
        state: "PR".to_string(),
        postal_code: "80010-000".to_string(),
        is_default: true,
    }
}

/// An active, unrestricted coupon.
pub(crate) fn new_coupon(code: &str, discount: CouponDiscount) -> NewCoupon {
    NewCoupon {
        uuid: CouponUuid::new(),
        code: code.to_string(),
        discount,
        minimum_amount: None,
        starts_at: None,
        ends_at: None,
        usage_limit: None,
        active: true,
    }
}

/// Create a single-variant product and return the variant.
pub(crate) async fn seed_variant(
    ctx: &TestContext,
    price: u64,
    stock: u32,
) -> TestResult<VariantRecord> {
    let uuid = ProductUuid::new();

    let product = ctx
        .catalog
        .create_product(NewProduct {
            uuid,
            name: "Ração Premium".to_string(),
            slug: format!("racao-{}", uuid.into_uuid().simple()),
            description: None,
            brand: None,
            species: Species::General,
            variants: vec![NewVariant {
                uuid: VariantUuid::new(),
                name: "1kg".to_string(),
                price,
                compare_at_price: None,
                stock,
            }],
        })
        .await?;

    Ok(product
        .variants
        .into_iter()
        .next()
        .ok_or("variant missing")?)
}

pub(crate) async fn seed_address(ctx: &TestContext, user: UserUuid) -> TestResult<AddressUuid> {
    let address = ctx
        .addresses
        .create_address(user, new_address(AddressUuid::new()))
        .await?;

    Ok(address.uuid)
}

pub(crate) async fn add_to_cart(
    ctx: &TestContext,
    user: UserUuid,
    variant: VariantUuid,
    quantity: u32,
) -> TestResult {
    ctx.carts
        .add_item(
            user,
            NewCartItem {
                variant_uuid: variant,
                quantity,
            },
        )
        .await?;

    Ok(())
}

/// Fill `user`'s cart with one fresh variant and commit it, paying by pix.
pub(crate) async fn commit_single_item_order(
    ctx: &TestContext,
    user: UserUuid,
    price: u64,
    quantity: u32,
) -> TestResult<OrderRecord> {
    let variant = seed_variant(ctx, price, quantity).await?;
    let address = seed_address(ctx, user).await?;

    add_to_cart(ctx, user, variant.uuid, quantity).await?;

    let cart = ctx.carts.get_active_cart(user).await?;

    let order = ctx
        .checkout
        .commit_order(
            user,
            cart.uuid,
            CommitOrder {
                address_uuid: address,
                payment_method: PaymentMethod::Pix,
                coupon_code: None,
            },
        )
        .await?;

    Ok(order)
}
