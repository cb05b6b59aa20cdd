// Domain services
// Pure decision logic, free of I/O

pub mod collection;
pub mod rating;

pub use collection::*;
pub use rating::*;
