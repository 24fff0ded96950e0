mod bind;
mod link;
mod pool;
pub mod query;
mod repository;

pub use link::PostgresLinkRepository;
pub use pool::{connect, init_schema, PostgresHealth, SCHEMA_SQL};
pub use repository::PostgresRepository;
pub use sqlx::PgPool;
