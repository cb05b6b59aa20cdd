// Backend Application Layer

pub mod commands;
pub mod error;
pub mod metrics;
pub mod queries;
pub mod sensor_locks;
pub mod state;

pub use error::AppError;
pub use metrics::Metrics;
pub use sensor_locks::SensorLockRegistry;
pub use state::AppState;
