use std::net::SocketAddr;

use sea_orm_migration::MigratorTrait;
use vetclinic_server::{api, config, migrator};

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    vetclinic_server::telemetry::init_telemetry("vetclinic_server");

    let app_config = config::AppConfig::from_env();

    // Primary connection with automatic fallback to the local SQLite file
    let (db, info) = config::connect_with_fallback(&app_config)
        .await
        .expect("failed to connect to any database");

    // Run migrations
    migrator::Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");

    let app = api::router(db, info);

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
