use clap::{ArgGroup, Args};
use jiff::Timestamp;
use pawcart_app::domain::coupons::{
    CouponsService, PgCouponsService,
    data::NewCoupon,
    records::{CouponDiscount, CouponUuid},
};
use rust_decimal::Decimal;

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("discount").required(true).args(["percent_off", "amount_off"])))]
pub(crate) struct CreateCouponArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Case-sensitive coupon code
    #[arg(long)]
    code: String,

    /// Percentage off the subtotal, 0 to 100
    #[arg(long)]
    percent_off: Option<Decimal>,

    /// Fixed amount off the subtotal, in centavos
    #[arg(long)]
    amount_off: Option<u64>,

    /// Minimum subtotal in centavos
    #[arg(long)]
    minimum_amount: Option<u64>,

    /// Start of the redemption window (RFC 3339)
    #[arg(long)]
    starts_at: Option<Timestamp>,

    /// End of the redemption window (RFC 3339)
    #[arg(long)]
    ends_at: Option<Timestamp>,

    /// Maximum number of redemptions
    #[arg(long)]
    usage_limit: Option<u32>,

    /// Create the coupon switched off
    #[arg(long)]
    inactive: bool,
}

pub(crate) async fn run(args: CreateCouponArgs) -> Result<(), String> {
    let discount = match (args.percent_off, args.amount_off) {
        (Some(percent), None) => CouponDiscount::Percent(percent),
        (None, Some(amount)) => CouponDiscount::Fixed(amount),
        _ => return Err("pass exactly one of --percent-off or --amount-off".to_string()),
    };

    if let (Some(starts_at), Some(ends_at)) = (args.starts_at, args.ends_at)
        && ends_at < starts_at
    {
        return Err("ends-at must not be before starts-at".to_string());
    }

    let service = PgCouponsService::new(crate::cli::connect(&args.database_url).await?);

    let coupon = service
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: args.code,
            discount,
            minimum_amount: args.minimum_amount,
            starts_at: args.starts_at,
            ends_at: args.ends_at,
            usage_limit: args.usage_limit,
            active: !args.inactive,
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("coupon_code: {}", coupon.code);
    println!("coupon_kind: {}", coupon.discount.kind());
    println!("coupon_active: {}", coupon.active);

    Ok(())
}
