// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod author;
pub mod book;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Author Domain
pub use author::{validate_author_name, Author, AuthorId};

// Book Domain
pub use book::{
    validate_book, validate_book_fields, Book, BookId, Language, NewBook,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants.
/// The transport layer treats every variant as a bad request.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Book {book_id} is not held by any of the declared authors")]
    MismatchedAttribution { book_id: BookId },
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
