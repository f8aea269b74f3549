// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// Events are facts, not commands. They carry only the data needed to
// react, and no business logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AuthorId, BookId};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// AUTHOR DOMAIN EVENTS
// ============================================================================

/// Emitted when a new author enters the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub author_id: AuthorId,
    pub full_name: String,
}

impl AuthorCreated {
    pub fn new(author_id: AuthorId, full_name: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            author_id,
            full_name,
        }
    }
}

impl DomainEvent for AuthorCreated {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "AuthorCreated"
    }
}

/// Emitted when an author record is removed
///
/// Only ever follows a successful cascade check: the author had no
/// remaining book associations at deletion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub author_id: AuthorId,
}

impl AuthorDeleted {
    pub fn new(author_id: AuthorId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            author_id,
        }
    }
}

impl DomainEvent for AuthorDeleted {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "AuthorDeleted"
    }
}

// ============================================================================
// BOOK DOMAIN EVENTS
// ============================================================================

/// Emitted when a new book enters the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
    pub title: String,
    pub author_ids: Vec<AuthorId>,
}

impl BookCreated {
    pub fn new(book_id: BookId, title: String, author_ids: Vec<AuthorId>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
            title,
            author_ids,
        }
    }
}

impl DomainEvent for BookCreated {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookCreated"
    }
}

/// Emitted when a book's fields or author set are replaced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
}

impl BookUpdated {
    pub fn new(book_id: BookId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
        }
    }
}

impl DomainEvent for BookUpdated {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookUpdated"
    }
}

/// Emitted when a book leaves the catalog, together with every edge of
/// its association
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
}

impl BookDeleted {
    pub fn new(book_id: BookId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
        }
    }
}

impl DomainEvent for BookDeleted {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "BookDeleted"
    }
}

/// Emitted when an additional author is attached to an existing book.
/// Not emitted for the no-op case of re-linking an existing pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorLinkedToBook {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
    pub author_id: AuthorId,
}

impl AuthorLinkedToBook {
    pub fn new(book_id: BookId, author_id: AuthorId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
            author_id,
        }
    }
}

impl DomainEvent for AuthorLinkedToBook {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "AuthorLinkedToBook"
    }
}
