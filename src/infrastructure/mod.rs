pub mod cache;
pub mod mock;
pub mod observability;
pub mod recorded;
