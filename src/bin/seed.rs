use std::sync::Arc;

use catering_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    middleware::auth::{ROLE_ADMIN, ROLE_CATERER},
    notify::LogNotifier,
    processor::StripeClient,
    services::auth_service::ensure_account,
    state::AppState,
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let processor = Arc::new(StripeClient::new(
        config.stripe_api_base.clone(),
        config.stripe_secret_key.clone(),
    ));
    let state = AppState::new(pool, config, processor, Arc::new(LogNotifier));

    let admin = ensure_account(&state, "admin@example.com", "admin123", "Admin", ROLE_ADMIN)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let caterer = ensure_account(
        &state,
        "caterer@example.com",
        "caterer123",
        "Demo Kitchen",
        ROLE_CATERER,
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    seed_catalog(&state.pool).await?;

    println!("Seed completed. Admin ID: {}, Caterer ID: {}", admin.id, caterer.id);
    Ok(())
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let items = vec![
        ("Jollof Rice", "Smoky party jollof", Decimal::new(850, 2), "Mains"),
        ("Fried Plantain", "Sweet ripe plantain", Decimal::new(350, 2), "Sides"),
        ("Chicken Suya", "Spiced grilled skewers", Decimal::new(650, 2), "Grill"),
        ("Chapman", "Fruity citrus punch", Decimal::new(300, 2), "Drinks"),
    ];

    for (name, desc, price, category) in items {
        sqlx::query(
            r#"
            INSERT INTO menu_catalog (item_name, description, default_price, category)
            SELECT $1, $2, $3, $4
            WHERE NOT EXISTS (
                SELECT 1 FROM menu_catalog WHERE item_name = $1 AND category = $4
            )
            "#,
        )
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded catalog items");
    Ok(())
}
