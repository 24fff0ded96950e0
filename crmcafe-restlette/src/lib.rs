mod error;
mod links;
pub mod params;
mod routes;

pub use error::error_response;
pub use links::build_link_router;
pub use routes::build_restlette_router;
