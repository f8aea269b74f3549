// src/lib.rs
// BookHub - Library catalog core
//
// Architecture:
// - Domain-centric: business rules live in the domain modules
// - Event-driven: services report mutations through the event bus
// - Explicit: no implicit behavior, no ambient singletons
// - Transport-agnostic: an embedding layer does HTTP binding and
//   field mapping; this crate only exposes typed operations

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_author_name,
    validate_book,
    validate_book_fields,
    // Author
    Author,
    AuthorId,
    // Book
    Book,
    BookId,
    Language,
    NewBook,
    // Errors
    DomainError,
    DomainResult,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    AuthorCreated,
    AuthorDeleted,
    AuthorLinkedToBook,
    BookCreated,
    BookDeleted,
    BookUpdated,
    DomainEvent,
    EventBus,
    EventLogEntry,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    AuthorRepository,
    BookRepository,
    SqliteAuthorRepository,
    SqliteBookRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AuthorService,
    BookService,
    CreateAuthorRequest,
    CreateBookRequest,
    UpdateAuthorRequest,
    UpdateBookRequest,
};
