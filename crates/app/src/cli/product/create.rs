use clap::Args;
use pawcart_app::domain::catalog::{
    CatalogService, PgCatalogService,
    data::{NewProduct, NewVariant},
    records::{ProductUuid, Species, VariantUuid},
};

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Product display name
    #[arg(long)]
    name: String,

    /// URL slug, unique across the catalog
    #[arg(long)]
    slug: String,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    brand: Option<String>,

    /// One of CACHORRO, GATO or GERAL
    #[arg(long, default_value_t = Species::General)]
    species: Species,

    /// Variant as `name:price:stock`, price in centavos; repeatable
    #[arg(long = "variant", value_parser = parse_variant, required = true)]
    variants: Vec<NewVariant>,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let service = PgCatalogService::new(crate::cli::connect(&args.database_url).await?);

    let product = service
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            name: args.name,
            slug: args.slug,
            description: args.description,
            brand: args.brand,
            species: args.species,
            variants: args.variants,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("product_slug: {}", product.slug);

    for variant in &product.variants {
        println!(
            "variant: {} {} price={} stock={}",
            variant.uuid, variant.name, variant.price, variant.stock
        );
    }

    Ok(())
}

fn parse_variant(raw: &str) -> Result<NewVariant, String> {
    let mut parts = raw.rsplitn(3, ':');

    let (Some(stock), Some(price), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected name:price:stock, got `{raw}`"));
    };

    if name.trim().is_empty() {
        return Err("variant name cannot be empty".to_string());
    }

    Ok(NewVariant {
        uuid: VariantUuid::new(),
        name: name.trim().to_string(),
        price: price
            .parse()
            .map_err(|error| format!("invalid variant price `{price}`: {error}"))?,
        compare_at_price: None,
        stock: stock
            .parse()
            .map_err(|error| format!("invalid variant stock `{stock}`: {error}"))?,
    })
}
