use axum_canteen_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let count = seed_menu(&pool).await?;

    println!("Seed completed. Menu items ensured: {count}");
    Ok(())
}

async fn seed_menu(pool: &sqlx::PgPool) -> anyhow::Result<usize> {
    // (name, description, category, price in smallest unit, prep minutes)
    let items: &[(&str, &str, &str, i64, i32)] = &[
        ("Masala Dosa", "Crisp dosa with potato filling", "breakfast", 600, 12),
        ("Idli Sambar", "Two idlis with sambar and chutney", "breakfast", 400, 8),
        ("Veg Thali", "Rice, dal, two curries and roti", "lunch", 1200, 15),
        ("Chicken Biryani", "Served with raita", "lunch", 1500, 20),
        ("Samosa", "Single piece, tamarind chutney", "snacks", 300, 5),
        ("Masala Chai", "Freshly brewed", "beverages", 150, 3),
        ("Cold Coffee", "With ice cream", "beverages", 500, 4),
    ];

    for (name, description, category, price, prep) in items {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, name, description, category, price, preparation_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(price)
        .bind(prep)
        .execute(pool)
        .await?;
    }

    Ok(items.len())
}
