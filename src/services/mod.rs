// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Services validate cross-entity references, mutate the store through
// the repositories and emit events. One call, one transaction.

pub mod author_service;
pub mod book_service;


// Re-export all services and their types
pub use author_service::{
    AuthorService,
    CreateAuthorRequest,
    UpdateAuthorRequest,
};

pub use book_service::{
    BookService,
    CreateBookRequest,
    UpdateBookRequest,
};
