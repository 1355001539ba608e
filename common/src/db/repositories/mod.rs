// Repository layer for database operations

pub mod event;

pub use event::{EventRepository, EventStore};
