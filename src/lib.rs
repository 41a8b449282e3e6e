//! Pawcart
//!
//! Checkout pricing for the Pawcart storefront: cart subtotals, coupon eligibility, discounts
//! and order totals.

pub mod coupons;
pub mod discounts;
pub mod lines;
pub mod pricing;
pub mod totals;

pub use coupons::{Coupon, CouponError, CouponKind, Ineligibility};
pub use discounts::{DiscountError, discount_for};
pub use lines::Line;
pub use pricing::{PricingError, subtotal};
pub use totals::{EvaluationError, Totals, evaluate};
