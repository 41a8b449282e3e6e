//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        checkout::{CheckoutService, PgCheckoutService, data::CheckoutSettings},
        orders::{OrdersService, PgOrdersService},
        payments::PgPaymentsService,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub carts: Arc<dyn CartsService>,
    pub catalog: Arc<dyn CatalogService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub orders: Arc<dyn OrdersService>,
    pub addresses: Arc<dyn AddressesService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails, or when the
    /// connected role would bypass row-level security.
    pub async fn from_database_url(
        url: &str,
        settings: CheckoutSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::ensure_rls_enforced_role(&pool)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            auth: Arc::new(PgAuthService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            checkout: Arc::new(PgCheckoutService::new(
                db.clone(),
                Arc::new(PgPaymentsService::new(db.clone())),
                settings,
            )),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            addresses: Arc::new(PgAddressesService::new(db)),
        })
    }
}
