//! Checkout Config

use clap::Args;

use pawcart_app::domain::checkout::data::CheckoutSettings;

/// Order commit settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Flat shipping cost added to every committed order, in centavos
    #[arg(long, env = "SHIPPING_FLAT_RATE", default_value_t = 0_u64)]
    pub shipping_flat_rate: u64,
}

impl CheckoutConfig {
    #[must_use]
    pub fn settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            shipping_cost: self.shipping_flat_rate,
        }
    }
}
