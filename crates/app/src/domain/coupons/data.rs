//! Coupon Data

use jiff::Timestamp;

use crate::domain::coupons::records::{CouponDiscount, CouponUuid};

/// New Coupon Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount: CouponDiscount,
    pub minimum_amount: Option<u64>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub usage_limit: Option<u32>,
    pub active: bool,
}
