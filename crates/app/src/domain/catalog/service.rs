//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::catalog::{
        data::{MAX_PAGE_SIZE, NewProduct, ProductFilter, VariantUpdate},
        errors::CatalogServiceError,
        records::{ProductRecord, ProductUuid, VariantRecord, VariantUuid},
        repository::{ListingQuery, PgCatalogRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }

    /// Attach each product's active variants, cheapest first.
    async fn attach_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &mut [ProductRecord],
    ) -> Result<(), CatalogServiceError> {
        let uuids: Vec<ProductUuid> = products.iter().map(|product| product.uuid).collect();

        let mut by_product: FxHashMap<ProductUuid, Vec<VariantRecord>> = FxHashMap::default();

        for variant in self.repository.list_product_variants(tx, &uuids).await? {
            by_product
                .entry(variant.product_uuid)
                .or_default()
                .push(variant);
        }

        for product in products {
            product.variants = by_product.remove(&product.uuid).unwrap_or_default();
        }

        Ok(())
    }
}

/// `%term%` for `ILIKE`, matching the term's own `%`, `_` and `\` literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);

    pattern.push('%');

    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }

        pattern.push(c);
    }

    pattern.push('%');

    pattern
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let mut created = self.repository.create_product(&mut tx, &product).await?;

        for variant in &product.variants {
            let price = i64::try_from(variant.price)?;
            let compare_at_price = variant.compare_at_price.map(i64::try_from).transpose()?;
            let stock = i32::try_from(variant.stock)?;

            let variant = self
                .repository
                .create_variant(&mut tx, created.uuid, variant, price, compare_at_price, stock)
                .await?;

            created.variants.push(variant);
        }

        tx.commit().await?;

        Ok(created)
    }

    async fn get_variant(
        &self,
        variant: VariantUuid,
    ) -> Result<VariantRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let variant = self.repository.get_variant(&mut tx, variant).await?;

        tx.commit().await?;

        Ok(variant)
    }

    async fn update_variant(
        &self,
        variant: VariantUuid,
        update: VariantUpdate,
    ) -> Result<VariantRecord, CatalogServiceError> {
        let price = update.price.map(i64::try_from).transpose()?;
        let stock = update.stock.map(i32::try_from).transpose()?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_variant(&mut tx, variant, &update, price, stock)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, CatalogServiceError> {
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(contains_pattern);

        let listing = ListingQuery {
            pattern: pattern.as_deref(),
            species: filter.species,
            in_stock: filter.in_stock,
            min_price: filter.min_price.map(i64::try_from).transpose()?,
            max_price: filter.max_price.map(i64::try_from).transpose()?,
            sort: filter.sort.as_str(),
            limit: i64::from(filter.limit.clamp(1, MAX_PAGE_SIZE)),
            offset: i64::from(filter.offset),
        };

        let mut tx = self.db.begin().await?;

        let mut products = self.repository.list_products(&mut tx, &listing).await?;

        self.attach_variants(&mut tx, &mut products).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, slug: &str) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product_by_slug(&mut tx, slug).await?;

        let mut products = [product];

        self.attach_variants(&mut tx, &mut products).await?;

        tx.commit().await?;

        let [product] = products;

        Ok(product)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Create a product together with its variants.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError>;

    /// Retrieve a single variant.
    async fn get_variant(&self, variant: VariantUuid)
    -> Result<VariantRecord, CatalogServiceError>;

    /// Change a variant's name, price, stock or availability.
    ///
    /// Order items keep the values they were created with.
    async fn update_variant(
        &self,
        variant: VariantUuid,
        update: VariantUpdate,
    ) -> Result<VariantRecord, CatalogServiceError>;

    /// Browse active products that have at least one active variant.
    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, CatalogServiceError>;

    /// Retrieve an active product by slug with its active variants.
    async fn get_product(&self, slug: &str) -> Result<ProductRecord, CatalogServiceError>;
}
