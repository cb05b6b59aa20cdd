pub mod auth;

pub use auth::{authorize, authorize_device};
