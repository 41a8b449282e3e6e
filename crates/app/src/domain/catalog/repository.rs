//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    domain::catalog::{
        data::{NewProduct, NewVariant, VariantUpdate},
        records::{LockedVariant, ProductRecord, ProductUuid, Species, VariantRecord, VariantUuid},
    },
    money::{try_get_amount, try_get_count, try_get_optional_amount},
};

const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const CREATE_VARIANT_SQL: &str = include_str!("sql/create_variant.sql");
const GET_VARIANT_SQL: &str = include_str!("sql/get_variant.sql");
const UPDATE_VARIANT_SQL: &str = include_str!("sql/update_variant.sql");
const LOCK_VARIANTS_SQL: &str = include_str!("sql/lock_variants.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_BY_SLUG_SQL: &str = include_str!("sql/get_product_by_slug.sql");
const LIST_PRODUCT_VARIANTS_SQL: &str = include_str!("sql/list_product_variants.sql");

/// Bind values for one listing query, already converted to column types.
#[derive(Debug)]
pub(crate) struct ListingQuery<'a> {
    pub pattern: Option<&'a str>,
    pub species: Option<Species>,
    pub in_stock: bool,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort: &'static str,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(&product.slug)
            .bind(product.description.as_deref())
            .bind(product.brand.as_deref())
            .bind(product.species.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        variant: &NewVariant,
        price: i64,
        compare_at_price: Option<i64>,
        stock: i32,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(CREATE_VARIANT_SQL)
            .bind(variant.uuid.into_uuid())
            .bind(product.into_uuid())
            .bind(&variant.name)
            .bind(price)
            .bind(compare_at_price)
            .bind(stock)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(GET_VARIANT_SQL)
            .bind(variant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        update: &VariantUpdate,
        price: Option<i64>,
        stock: Option<i32>,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(UPDATE_VARIANT_SQL)
            .bind(variant.into_uuid())
            .bind(update.name.as_deref())
            .bind(price)
            .bind(stock)
            .bind(update.active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        listing: &ListingQuery<'_>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .bind(listing.pattern)
            .bind(listing.species.map(|species| species.as_str()))
            .bind(listing.in_stock)
            .bind(listing.min_price)
            .bind(listing.max_price)
            .bind(listing.sort)
            .bind(listing.limit)
            .bind(listing.offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product_by_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    /// Active variants of the given products, cheapest first.
    pub(crate) async fn list_product_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<VariantRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, VariantRecord>(LIST_PRODUCT_VARIANTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Lock the given variants in UUID order so concurrent commits never deadlock.
    pub(crate) async fn lock_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variants: &[VariantUuid],
    ) -> Result<Vec<LockedVariant>, sqlx::Error> {
        let uuids: Vec<Uuid> = variants.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, LockedVariant>(LOCK_VARIANTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Take `quantity` units from stock. Returns `false` when stock is short.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        quantity: i32,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(variant.into_uuid())
            .bind(quantity)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let species: String = row.try_get("species")?;

        Ok(Self {
            uuid: row.try_get::<Uuid, _>("uuid")?.into(),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            brand: row.try_get("brand")?,
            species: species.parse().map_err(|error| sqlx::Error::ColumnDecode {
                index: "species".to_string(),
                source: Box::new(error),
            })?,
            active: row.try_get("active")?,
            variants: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for VariantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get::<Uuid, _>("uuid")?.into(),
            product_uuid: row.try_get::<Uuid, _>("product_uuid")?.into(),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            compare_at_price: try_get_optional_amount(row, "compare_at_price")?,
            stock: try_get_count(row, "stock")?,
            active: row.try_get("active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for LockedVariant {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get::<Uuid, _>("uuid")?.into(),
            stock: try_get_count(row, "stock")?,
            available: row.try_get("available")?,
        })
    }
}
