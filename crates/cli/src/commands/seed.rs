//! Demo data seeding command.
//!
//! Creates (or refreshes) a demo store with a small food catalog so a fresh
//! environment has something to browse at `/stores/antojitos-demo`.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CommandError, database_url};

const DEMO_SLUG: &str = "antojitos-demo";

/// Seed the database with a demo store and catalog.
///
/// The store is owned by `owner`, or by a freshly generated user id when
/// omitted. Re-running against the same owner refreshes the store row and
/// adds another copy of the catalog.
///
/// # Errors
///
/// Returns `CommandError` if the database URL is missing or any insert
/// fails.
pub async fn run(owner: Option<Uuid>) -> Result<(), CommandError> {
    let url = database_url()?;
    let pool = PgPool::connect(&url).await?;

    let owner = owner.unwrap_or_else(Uuid::new_v4);

    let store_id = sqlx::query_scalar::<_, Uuid>(
        r"
        INSERT INTO stores (owner_id, name, slug, phone, primary_color)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (owner_id) DO UPDATE
            SET name = EXCLUDED.name,
                slug = EXCLUDED.slug,
                phone = EXCLUDED.phone,
                updated_at = now()
        RETURNING id
        ",
    )
    .bind(owner)
    .bind("Antojitos Chapines")
    .bind(DEMO_SLUG)
    .bind("12345678")
    .bind("#16A34A")
    .fetch_one(&pool)
    .await?;

    let comidas = seed_category(&pool, store_id, "Comidas").await?;
    let bebidas = seed_category(&pool, store_id, "Bebidas").await?;

    seed_product(
        &pool,
        store_id,
        comidas,
        "Hamburguesa Doble",
        Decimal::from(50),
        &[],
    )
    .await?;
    seed_product(
        &pool,
        store_id,
        comidas,
        "Pizza Familiar",
        Decimal::from(100),
        &[("Tama\u{f1}o", "Familiar", 0), ("Tama\u{f1}o", "Mediana", -25)],
    )
    .await?;
    seed_product(
        &pool,
        store_id,
        bebidas,
        "Limonada con Soda",
        Decimal::from(15),
        &[],
    )
    .await?;

    tracing::info!(%owner, %store_id, slug = DEMO_SLUG, "demo store seeded");
    Ok(())
}

async fn seed_category(pool: &PgPool, store_id: Uuid, name: &str) -> Result<Uuid, CommandError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO categories (store_id, name) VALUES ($1, $2) RETURNING id",
    )
    .bind(store_id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn seed_product(
    pool: &PgPool,
    store_id: Uuid,
    category_id: Uuid,
    title: &str,
    price: Decimal,
    variants: &[(&str, &str, i64)],
) -> Result<(), CommandError> {
    let product_id = sqlx::query_scalar::<_, Uuid>(
        r"
        INSERT INTO products (store_id, category_id, title, price)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        ",
    )
    .bind(store_id)
    .bind(category_id)
    .bind(title)
    .bind(price)
    .fetch_one(pool)
    .await?;

    for (variant_type, variant_value, adjustment) in variants {
        sqlx::query(
            r"
            INSERT INTO product_variants
                (product_id, variant_type, variant_value, price_adjustment)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(product_id)
        .bind(variant_type)
        .bind(variant_value)
        .bind(Decimal::from(*adjustment))
        .execute(pool)
        .await?;
    }

    Ok(())
}
