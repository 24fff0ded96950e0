use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str =
    "crmcafe=info,crmcafe_server=info,crmcafe_postgres=debug,crmcafe_restlette=info,tower_http=info";

/// Install the global subscriber. `RUST_LOG` overrides the defaults.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
