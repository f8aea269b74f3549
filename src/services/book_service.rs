// src/services/book_service.rs
//
// Book Service - Book Relationship Management
//
// CRITICAL RULES:
// - Every book is created under an existing author
// - Updates are attributed through a currently-associated author
// - A book never ends up authorless; deletion removes every reverse
//   reference from its authors

use std::sync::Arc;

use crate::domain::author::AuthorId;
use crate::domain::book::{
    validate_book, validate_book_fields, Book, BookId, Language, NewBook,
};
use crate::domain::{DomainError, DomainResult};
use crate::error::{AppError, AppResult};
use crate::events::{AuthorLinkedToBook, BookCreated, BookDeleted, BookUpdated, EventBus};
use crate::repositories::{AuthorRepository, BookRepository};

/// Request to catalog a new book under a creator author.
/// `co_author_ids` carries any other authors already present in the
/// incoming payload.
#[derive(Debug, Clone)]
pub struct CreateBookRequest {
    pub title: String,
    pub isbn: i64,
    pub publisher: Option<String>,
    pub year: i16,
    pub language: Language,
    pub co_author_ids: Vec<AuthorId>,
}

/// Request to replace a book's mutable fields and author set.
/// `author_ids` is the declared author set; the update is accepted only
/// when it is attributed through an author who already holds the book.
#[derive(Debug, Clone)]
pub struct UpdateBookRequest {
    pub book_id: BookId,
    pub title: String,
    pub isbn: i64,
    pub publisher: Option<String>,
    pub year: i16,
    pub language: Language,
    pub author_ids: Vec<AuthorId>,
}

pub struct BookService {
    book_repo: Arc<dyn BookRepository>,
    author_repo: Arc<dyn AuthorRepository>,
    event_bus: Arc<EventBus>,
}

impl BookService {
    pub fn new(
        book_repo: Arc<dyn BookRepository>,
        author_repo: Arc<dyn AuthorRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            book_repo,
            author_repo,
            event_bus,
        }
    }

    /// All books, in store insertion order
    pub fn list(&self) -> AppResult<Vec<Book>> {
        self.book_repo.list_all()
    }

    /// Books whose title contains the query, literally
    pub fn find_by_title(&self, query: &str) -> AppResult<Vec<Book>> {
        self.book_repo.find_by_title(query)
    }

    pub fn get(&self, book_id: BookId) -> AppResult<Book> {
        self.book_repo.get_by_id(book_id)?.ok_or(AppError::NotFound)
    }

    /// Catalog a new book under `author_id`
    pub fn create(&self, author_id: AuthorId, request: CreateBookRequest) -> AppResult<Book> {
        if !self.author_repo.exists(author_id)? {
            return Err(AppError::NotFound);
        }
        for &co_author_id in &request.co_author_ids {
            if !self.author_repo.exists(co_author_id)? {
                return Err(AppError::NotFound);
            }
        }

        validate_book_fields(&request.title, request.isbn, request.year)?;

        // creator first, payload authors after, duplicates collapsed
        let mut author_set = vec![author_id];
        for &co_author_id in &request.co_author_ids {
            if !author_set.contains(&co_author_id) {
                author_set.push(co_author_id);
            }
        }

        let new_book = NewBook {
            title: request.title,
            isbn: request.isbn,
            publisher: request.publisher,
            year: request.year,
            language: request.language,
        };

        let book = self.book_repo.insert(&new_book, &author_set)?;

        log::debug!("Book {} catalogued under author {}", book.id, author_id);
        self.event_bus
            .emit(BookCreated::new(book.id, book.title.clone(), author_set));

        Ok(book)
    }

    /// Replace a book's mutable fields and author associations,
    /// keeping referential symmetry
    pub fn update(&self, request: UpdateBookRequest) -> AppResult<Book> {
        let mut book = self
            .book_repo
            .get_by_id(request.book_id)?
            .ok_or(AppError::NotFound)?;

        for &author_id in &request.author_ids {
            if !self.author_repo.exists(author_id)? {
                return Err(AppError::NotFound);
            }
        }

        check_attribution(&book, &request.author_ids)?;

        let mut author_set = Vec::new();
        for &author_id in &request.author_ids {
            if !author_set.contains(&author_id) {
                author_set.push(author_id);
            }
        }

        book.replace_fields(
            request.title,
            request.isbn,
            request.publisher,
            request.year,
            request.language,
            author_set,
        );
        validate_book(&book)?;

        self.book_repo.update(&book)?;

        log::debug!("Book {} updated", book.id);
        self.event_bus.emit(BookUpdated::new(book.id));

        Ok(book)
    }

    /// Remove a book and every reverse reference from its authors
    pub fn delete(&self, book_id: BookId) -> AppResult<()> {
        if !self.book_repo.exists(book_id)? {
            return Err(AppError::NotFound);
        }

        self.book_repo.delete(book_id)?;

        log::debug!("Book {} removed", book_id);
        self.event_bus.emit(BookDeleted::new(book_id));

        Ok(())
    }

    /// Attach an existing author to an existing book.
    /// Attaching an already-attached pair is a no-op, not an error.
    pub fn add_author(&self, book_id: BookId, author_id: AuthorId) -> AppResult<Book> {
        let book = self.book_repo.get_by_id(book_id)?.ok_or(AppError::NotFound)?;

        if !self.author_repo.exists(author_id)? {
            return Err(AppError::NotFound);
        }

        if book.has_author(author_id) {
            return Ok(book);
        }

        self.book_repo.link_author(book_id, author_id)?;

        log::debug!("Author {} attached to book {}", author_id, book_id);
        self.event_bus
            .emit(AuthorLinkedToBook::new(book_id, author_id));

        self.get(book_id)
    }
}

/// An update must be attributed through an author who already holds the
/// book; an empty declared set would leave the book authorless.
fn check_attribution(book: &Book, declared: &[AuthorId]) -> DomainResult<()> {
    if declared.is_empty() {
        return Err(DomainError::InvariantViolation(
            "A book must have at least one author".to_string(),
        ));
    }

    if !declared.iter().any(|&author_id| book.has_author(author_id)) {
        return Err(DomainError::MismatchedAttribution { book_id: book.id });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::author_repository::MockAuthorRepository;
    use crate::repositories::book_repository::MockBookRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn service(book_repo: MockBookRepository, author_repo: MockAuthorRepository) -> BookService {
        BookService::new(
            Arc::new(book_repo),
            Arc::new(author_repo),
            Arc::new(EventBus::new()),
        )
    }

    fn stored_book(id: BookId, authors: Vec<AuthorId>) -> Book {
        let now = Utc::now();
        Book {
            id,
            title: "Vingt mille lieues sous les mers".to_string(),
            isbn: 9_782_253_004_226,
            publisher: None,
            year: 1870,
            language: Language::French,
            authors,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_under_missing_author_is_not_found() {
        let mut author_repo = MockAuthorRepository::new();
        author_repo.expect_exists().with(eq(7)).returning(|_| Ok(false));
        // no insert expectation: nothing may be written

        let service = service(MockBookRepository::new(), author_repo);

        let result = service.create(
            7,
            CreateBookRequest {
                title: "Voyage".to_string(),
                isbn: 9_782_253_004_226,
                publisher: None,
                year: 1870,
                language: Language::French,
                co_author_ids: vec![],
            },
        );

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[test]
    fn test_create_rejects_invalid_isbn_after_resolving_author() {
        let mut author_repo = MockAuthorRepository::new();
        author_repo.expect_exists().with(eq(1)).returning(|_| Ok(true));

        let service = service(MockBookRepository::new(), author_repo);

        let result = service.create(
            1,
            CreateBookRequest {
                title: "Voyage".to_string(),
                isbn: 123_456_789, // 9 digits
                publisher: None,
                year: 1870,
                language: Language::French,
                co_author_ids: vec![],
            },
        );

        assert!(matches!(result, Err(AppError::Domain(_))));
    }

    #[test]
    fn test_update_through_unrelated_author_is_rejected() {
        let mut book_repo = MockBookRepository::new();
        book_repo
            .expect_get_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(stored_book(1, vec![1]))));
        let mut author_repo = MockAuthorRepository::new();
        author_repo.expect_exists().with(eq(2)).returning(|_| Ok(true));

        let service = service(book_repo, author_repo);

        let result = service.update(UpdateBookRequest {
            book_id: 1,
            title: "Voyage".to_string(),
            isbn: 9_782_253_004_226,
            publisher: None,
            year: 1870,
            language: Language::French,
            author_ids: vec![2], // never held book 1
        });

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::MismatchedAttribution { book_id: 1 }))
        ));
    }

    #[test]
    fn test_add_author_to_missing_book_is_not_found() {
        let mut book_repo = MockBookRepository::new();
        book_repo.expect_get_by_id().with(eq(5)).returning(|_| Ok(None));

        let service = service(book_repo, MockAuthorRepository::new());

        assert!(matches!(service.add_author(5, 1), Err(AppError::NotFound)));
    }

    #[test]
    fn test_add_author_already_linked_is_a_noop() {
        let mut book_repo = MockBookRepository::new();
        book_repo
            .expect_get_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(stored_book(1, vec![4]))));
        let mut author_repo = MockAuthorRepository::new();
        author_repo.expect_exists().with(eq(4)).returning(|_| Ok(true));
        // no link_author expectation: the edge set must not be touched

        let service = service(book_repo, author_repo);

        let book = service.add_author(1, 4).unwrap();
        assert_eq!(book.authors, vec![4]);
    }
}
