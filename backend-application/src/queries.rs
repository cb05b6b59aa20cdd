// Application queries (read paths)

pub mod balance_queries;
pub mod collector_queries;
pub mod company_queries;
pub mod request_queries;
pub mod sensor_queries;
