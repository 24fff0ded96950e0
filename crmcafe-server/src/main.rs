use crmcafe_server::config::Config;
use crmcafe_server::{logging, resources, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        max_connections = config.max_connections,
        require_ssl = config.require_ssl,
        "starting crmcafe"
    );

    let pool = crmcafe_postgres::connect(
        &config.database_url,
        config.max_connections,
        config.require_ssl,
    )
    .await?;
    if config.init_schema {
        crmcafe_postgres::init_schema(&pool).await?;
    }

    run(resources::postgres_config(pool, config.port)).await
}
