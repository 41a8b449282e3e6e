//! Coupons service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::coupons::{
        data::NewCoupon,
        errors::CouponsServiceError,
        records::{CouponDiscount, CouponRecord},
        repository::PgCouponsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        let amount_off = match coupon.discount {
            CouponDiscount::Fixed(amount) => Some(i64::try_from(amount)?),
            CouponDiscount::Percent(_) => None,
        };
        let minimum_amount = coupon.minimum_amount.map(i64::try_from).transpose()?;
        let usage_limit = coupon.usage_limit.map(i32::try_from).transpose()?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_coupon(&mut tx, &coupon, amount_off, minimum_amount, usage_limit)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_coupon(&self, code: &str) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self
            .repository
            .get_coupon_by_code(&mut tx, code)
            .await?
            .ok_or(CouponsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(coupon)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Create a coupon. Codes are unique and case-sensitive.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;

    /// Retrieve a coupon by its exact code.
    async fn get_coupon(&self, code: &str) -> Result<CouponRecord, CouponsServiceError>;
}
