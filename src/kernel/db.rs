use sqlx::{
    postgres::PgPoolOptions,
    Pool,
    Postgres,
};

pub type DB = Pool<Postgres>;

pub async fn connect(database_url: &str) -> anyhow::Result<DB> {
    PgPoolOptions::new()
        .connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {:?}", e))
}
