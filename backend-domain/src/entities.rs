// Domain entities

pub mod collector;
pub mod ledger;
pub mod model;
pub mod request;
pub mod review;
pub mod sensor;

pub use collector::*;
pub use ledger::*;
pub use model::*;
pub use request::*;
pub use review::*;
pub use sensor::*;
