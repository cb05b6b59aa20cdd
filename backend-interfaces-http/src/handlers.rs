pub mod collector_handlers;
pub mod ledger_handlers;
pub mod ops_handlers;
pub mod request_handlers;
pub mod review_handlers;
pub mod sensor_handlers;
