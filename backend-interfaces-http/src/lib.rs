// Backend HTTP Interface Layer

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::build_router;
