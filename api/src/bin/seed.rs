//! Seed a test user for local development.

use tracing_subscriber::EnvFilter;

use ag_core::domain::entities::user::User;
use ag_core::repositories::UserStore;
use ag_infra::{hash_password, DatabasePool, MySqlUserStore};
use ag_shared::config::DatabaseConfig;

const TEST_EMAIL: &str = "test@example.com";
const TEST_PASSWORD: &str = "password123";
const TEST_NAME: &str = "Test User";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DatabaseConfig::from_env()?;
    let pool = DatabasePool::new(&config).await?;
    pool.run_migrations().await?;

    let users = MySqlUserStore::new(pool.pool().clone());

    if users.find_by_email(TEST_EMAIL).await?.is_some() {
        println!("Test user already exists");
    } else {
        let password_hash = hash_password(TEST_PASSWORD)?;
        users
            .create(User::new(
                TEST_EMAIL.to_string(),
                TEST_NAME.to_string(),
                password_hash,
            ))
            .await?;
        println!("Test user created successfully!");
        println!("Email: {TEST_EMAIL}");
        println!("Password: {TEST_PASSWORD}");
    }

    pool.close().await;
    Ok(())
}
