// src/events/mod.rs
//
// Internal Event System - Public API
//
// The handler type alias is internal to the bus and must NOT be exported.

pub mod bus;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    AuthorCreated,
    AuthorDeleted,
    AuthorLinkedToBook,
    BookCreated,
    BookDeleted,
    BookUpdated,
};

pub use bus::{EventBus, EventLogEntry};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
