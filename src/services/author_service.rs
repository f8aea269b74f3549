// src/services/author_service.rs
//
// Author Service - Author Relationship Management
//
// CRITICAL RULES:
// - Manages authors and their side of the association ONLY
// - Never creates or mutates books
// - Deletion is cascade-prevented: an author holding books stays

use std::sync::Arc;

use crate::domain::author::{validate_author_name, Author, AuthorId};
use crate::domain::book::Book;
use crate::error::{AppError, AppResult};
use crate::events::{AuthorCreated, AuthorDeleted, EventBus};
use crate::repositories::{AuthorRepository, BookRepository};

/// Request to register a new author
#[derive(Debug, Clone)]
pub struct CreateAuthorRequest {
    pub full_name: String,
}

/// Request to update an author's mutable fields (the name; never the
/// book collection, which only the edge set operations touch)
#[derive(Debug, Clone)]
pub struct UpdateAuthorRequest {
    pub author_id: AuthorId,
    pub full_name: String,
}

pub struct AuthorService {
    author_repo: Arc<dyn AuthorRepository>,
    book_repo: Arc<dyn BookRepository>,
    event_bus: Arc<EventBus>,
}

impl AuthorService {
    pub fn new(
        author_repo: Arc<dyn AuthorRepository>,
        book_repo: Arc<dyn BookRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            author_repo,
            book_repo,
            event_bus,
        }
    }

    /// All authors, in store insertion order
    pub fn list(&self) -> AppResult<Vec<Author>> {
        self.author_repo.list_all()
    }

    /// Authors whose name contains the query, literally
    pub fn search_by_name(&self, query: &str) -> AppResult<Vec<Author>> {
        self.author_repo.search_by_name(query)
    }

    pub fn get(&self, author_id: AuthorId) -> AppResult<Author> {
        self.author_repo
            .get_by_id(author_id)?
            .ok_or(AppError::NotFound)
    }

    /// Register a new author with an empty book collection
    pub fn create(&self, request: CreateAuthorRequest) -> AppResult<Author> {
        validate_author_name(&request.full_name)?;

        let author = self.author_repo.insert(&request.full_name)?;

        log::debug!("Author {} registered", author.id);
        self.event_bus
            .emit(AuthorCreated::new(author.id, author.full_name.clone()));

        Ok(author)
    }

    /// Replace the author's name. The book collection is never replaced
    /// wholesale here: associations established elsewhere must survive.
    pub fn update(&self, request: UpdateAuthorRequest) -> AppResult<Author> {
        validate_author_name(&request.full_name)?;

        let mut author = self.get(request.author_id)?;
        author.rename(request.full_name);

        self.author_repo
            .update_name(author.id, &author.full_name)?;

        Ok(author)
    }

    /// Remove an author, provided no books reference them
    pub fn delete(&self, author_id: AuthorId) -> AppResult<()> {
        let author = self.get(author_id)?;

        if author.has_books() {
            return Err(AppError::author_has_books());
        }

        self.author_repo.delete(author_id)?;

        log::debug!("Author {} removed", author_id);
        self.event_bus.emit(AuthorDeleted::new(author_id));

        Ok(())
    }

    /// The author's book collection
    pub fn books(&self, author_id: AuthorId) -> AppResult<Vec<Book>> {
        if !self.author_repo.exists(author_id)? {
            return Err(AppError::NotFound);
        }

        self.book_repo.list_by_author(author_id)
    }
}
