use std::env;

/// Process configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port on `0.0.0.0`.
    pub port: u16,

    pub database_url: String,

    /// `PGSSLMODE=require` forces TLS to the database.
    pub require_ssl: bool,

    pub max_connections: u32,

    /// Apply the bundled schema before serving.
    pub init_schema: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,

            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,

            require_ssl: env::var("PGSSLMODE")
                .map(|mode| mode.eq_ignore_ascii_case("require"))
                .unwrap_or(false),

            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            init_schema: env::var("CRMCAFE_INIT_SCHEMA")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }
}
