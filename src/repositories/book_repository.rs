// src/repositories/book_repository.rs
//
// Book persistence, including the association edge set.
//
// Multi-statement writes (entity fields + edges) run inside a single
// rusqlite transaction: either every side effect commits or none do.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::author::AuthorId;
use crate::domain::book::{Book, BookId, Language, NewBook};
use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
pub trait BookRepository: Send + Sync {
    /// Insert a new book and its initial edge set in one transaction;
    /// the store assigns the identity
    fn insert(&self, book: &NewBook, author_ids: &[AuthorId]) -> AppResult<Book>;
    /// Replace mutable fields and the full edge set in one transaction
    fn update(&self, book: &Book) -> AppResult<()>;
    fn get_by_id(&self, id: BookId) -> AppResult<Option<Book>>;
    fn list_all(&self) -> AppResult<Vec<Book>>;
    /// Literal case-sensitive contains match on the title
    fn find_by_title(&self, query: &str) -> AppResult<Vec<Book>>;
    /// Remove the book; its edges cascade away with it
    fn delete(&self, id: BookId) -> AppResult<()>;
    fn exists(&self, id: BookId) -> AppResult<bool>;
    fn list_by_author(&self, author_id: AuthorId) -> AppResult<Vec<Book>>;
    /// Add one edge; linking an already-linked pair is a no-op
    fn link_author(&self, book_id: BookId, author_id: AuthorId) -> AppResult<()>;
    /// Drop one edge; fails with NotFound if the pair was not linked
    fn unlink_author(&self, book_id: BookId, author_id: AuthorId) -> AppResult<()>;
    fn author_ids(&self, book_id: BookId) -> AppResult<Vec<AuthorId>>;
}

pub struct SqliteBookRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteBookRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map a database row to a Book with an empty author collection -
    /// returns rusqlite::Error for query_map compatibility
    fn row_to_book(row: &Row) -> Result<Book, rusqlite::Error> {
        let language_str: String = row.get("language")?;
        let language = match language_str.as_str() {
            "french" => Language::French,
            "english" => Language::English,
            _ => return Err(rusqlite::Error::InvalidQuery),
        };

        let created_at_str: String = row.get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let updated_at_str: String = row.get("updated_at")?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Book {
            id: row.get("id")?,
            title: row.get("title")?,
            isbn: row.get("isbn")?,
            publisher: row.get("publisher")?,
            year: row.get("year")?,
            language,
            authors: Vec::new(),
            created_at,
            updated_at,
        })
    }

    /// Fill the derived author collection from the association edge set
    fn attach_authors(conn: &Connection, book: &mut Book) -> AppResult<()> {
        let mut stmt = conn
            .prepare("SELECT author_id FROM book_authors WHERE book_id = ?1 ORDER BY author_id")?;

        book.authors = stmt
            .query_map(params![book.id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(())
    }
}

impl BookRepository for SqliteBookRepository {
    fn insert(&self, book: &NewBook, author_ids: &[AuthorId]) -> AppResult<Book> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        let now = Utc::now();

        tx.execute(
            "INSERT INTO books (title, isbn, publisher, year, language, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                book.title,
                book.isbn,
                book.publisher,
                book.year,
                book.language.to_string(),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        let id = tx.last_insert_rowid();

        for &author_id in author_ids {
            tx.execute(
                "INSERT OR IGNORE INTO book_authors (book_id, author_id) VALUES (?1, ?2)",
                params![id, author_id],
            )?;
        }

        tx.commit()?;

        Ok(Book {
            id,
            title: book.title.clone(),
            isbn: book.isbn,
            publisher: book.publisher.clone(),
            year: book.year,
            language: book.language,
            authors: author_ids.to_vec(),
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&self, book: &Book) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let rows_affected = tx.execute(
            "UPDATE books
             SET title = ?1, isbn = ?2, publisher = ?3, year = ?4, language = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                book.title,
                book.isbn,
                book.publisher,
                book.year,
                book.language.to_string(),
                book.updated_at.to_rfc3339(),
                book.id,
            ],
        )?;

        if rows_affected == 0 {
            // dropping the transaction rolls the update back
            return Err(AppError::NotFound);
        }

        tx.execute(
            "DELETE FROM book_authors WHERE book_id = ?1",
            params![book.id],
        )?;

        for &author_id in &book.authors {
            tx.execute(
                "INSERT INTO book_authors (book_id, author_id) VALUES (?1, ?2)",
                params![book.id, author_id],
            )?;
        }

        tx.commit()?;

        Ok(())
    }

    fn get_by_id(&self, id: BookId) -> AppResult<Option<Book>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, isbn, publisher, year, language, created_at, updated_at
             FROM books WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_book) {
            Ok(mut book) => {
                Self::attach_authors(&conn, &mut book)?;
                Ok(Some(book))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Book>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, isbn, publisher, year, language, created_at, updated_at
             FROM books ORDER BY id",
        )?;

        let mut books: Vec<Book> = stmt
            .query_map([], Self::row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;

        for book in &mut books {
            Self::attach_authors(&conn, book)?;
        }

        Ok(books)
    }

    fn find_by_title(&self, query: &str) -> AppResult<Vec<Book>> {
        let conn = self.pool.get()?;

        // instr keeps literal contains semantics; LIKE would fold case
        let mut stmt = conn.prepare(
            "SELECT id, title, isbn, publisher, year, language, created_at, updated_at
             FROM books
             WHERE instr(title, ?1) > 0
             ORDER BY id",
        )?;

        let mut books: Vec<Book> = stmt
            .query_map(params![query], Self::row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;

        for book in &mut books {
            Self::attach_authors(&conn, book)?;
        }

        Ok(books)
    }

    fn delete(&self, id: BookId) -> AppResult<()> {
        let conn = self.pool.get()?;

        // ON DELETE CASCADE removes every reverse reference with the row
        let rows_affected = conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn exists(&self, id: BookId) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM books WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn list_by_author(&self, author_id: AuthorId) -> AppResult<Vec<Book>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT b.id, b.title, b.isbn, b.publisher, b.year, b.language, b.created_at, b.updated_at
             FROM books b
             JOIN book_authors ba ON ba.book_id = b.id
             WHERE ba.author_id = ?1
             ORDER BY b.id",
        )?;

        let mut books: Vec<Book> = stmt
            .query_map(params![author_id], Self::row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;

        for book in &mut books {
            Self::attach_authors(&conn, book)?;
        }

        Ok(books)
    }

    fn link_author(&self, book_id: BookId, author_id: AuthorId) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR IGNORE INTO book_authors (book_id, author_id) VALUES (?1, ?2)",
            params![book_id, author_id],
        )?;

        Ok(())
    }

    fn unlink_author(&self, book_id: BookId, author_id: AuthorId) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "DELETE FROM book_authors WHERE book_id = ?1 AND author_id = ?2",
            params![book_id, author_id],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn author_ids(&self, book_id: BookId) -> AppResult<Vec<AuthorId>> {
        let conn = self.pool.get()?;

        let mut stmt = conn
            .prepare("SELECT author_id FROM book_authors WHERE book_id = ?1 ORDER BY author_id")?;

        let ids = stmt
            .query_map(params![book_id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;
    use crate::db::migrations::initialize_database;
    use crate::repositories::author_repository::{AuthorRepository, SqliteAuthorRepository};

    fn repos() -> (SqliteAuthorRepository, SqliteBookRepository) {
        let pool = Arc::new(create_test_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        (
            SqliteAuthorRepository::new(Arc::clone(&pool)),
            SqliteBookRepository::new(pool),
        )
    }

    fn sample_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            isbn: 9_782_253_004_226,
            publisher: Some("Hetzel".to_string()),
            year: 1870,
            language: Language::French,
        }
    }

    #[test]
    fn test_insert_creates_edges() {
        let (authors, books) = repos();

        let verne = authors.insert("Jules Verne").unwrap();
        let book = books
            .insert(&sample_book("Vingt mille lieues sous les mers"), &[verne.id])
            .unwrap();

        assert_eq!(book.id, 1);
        assert_eq!(book.authors, vec![verne.id]);

        let loaded = books.get_by_id(book.id).unwrap().unwrap();
        assert_eq!(loaded.authors, vec![verne.id]);
        assert_eq!(loaded.language, Language::French);

        // the reverse direction is derived from the same edge
        let verne = authors.get_by_id(verne.id).unwrap().unwrap();
        assert_eq!(verne.books, vec![book.id]);
    }

    #[test]
    fn test_update_replaces_fields_and_edges() {
        let (authors, books) = repos();

        let verne = authors.insert("Jules Verne").unwrap();
        let sand = authors.insert("George Sand").unwrap();
        let mut book = books.insert(&sample_book("Vingt mille lieues"), &[verne.id]).unwrap();

        book.replace_fields(
            "Vingt mille lieues sous les mers".to_string(),
            book.isbn,
            book.publisher.clone(),
            book.year,
            Language::English,
            vec![verne.id, sand.id],
        );
        books.update(&book).unwrap();

        let loaded = books.get_by_id(book.id).unwrap().unwrap();
        assert_eq!(loaded.title, "Vingt mille lieues sous les mers");
        assert_eq!(loaded.language, Language::English);
        assert_eq!(loaded.authors, vec![verne.id, sand.id]);
    }

    #[test]
    fn test_update_missing_book_is_not_found() {
        let (authors, books) = repos();

        let verne = authors.insert("Jules Verne").unwrap();
        let mut book = books.insert(&sample_book("L'Ile mysterieuse"), &[verne.id]).unwrap();
        books.delete(book.id).unwrap();

        book.replace_fields(
            book.title.clone(),
            book.isbn,
            None,
            book.year,
            book.language,
            vec![verne.id],
        );

        assert!(matches!(books.update(&book), Err(AppError::NotFound)));
    }

    #[test]
    fn test_delete_cascades_edges() {
        let (authors, books) = repos();

        let verne = authors.insert("Jules Verne").unwrap();
        let book = books.insert(&sample_book("L'Ile mysterieuse"), &[verne.id]).unwrap();

        books.delete(book.id).unwrap();

        assert!(books.get_by_id(book.id).unwrap().is_none());
        assert!(authors.get_by_id(verne.id).unwrap().unwrap().books.is_empty());
        assert!(matches!(books.delete(book.id), Err(AppError::NotFound)));
    }

    #[test]
    fn test_link_is_idempotent() {
        let (authors, books) = repos();

        let verne = authors.insert("Jules Verne").unwrap();
        let sand = authors.insert("George Sand").unwrap();
        let book = books.insert(&sample_book("Collaboration"), &[verne.id]).unwrap();

        books.link_author(book.id, sand.id).unwrap();
        books.link_author(book.id, sand.id).unwrap();

        assert_eq!(books.author_ids(book.id).unwrap(), vec![verne.id, sand.id]);
    }

    #[test]
    fn test_unlink() {
        let (authors, books) = repos();

        let verne = authors.insert("Jules Verne").unwrap();
        let sand = authors.insert("George Sand").unwrap();
        let book = books
            .insert(&sample_book("Collaboration"), &[verne.id, sand.id])
            .unwrap();

        books.unlink_author(book.id, sand.id).unwrap();
        assert_eq!(books.author_ids(book.id).unwrap(), vec![verne.id]);

        // the pair is gone now
        assert!(matches!(
            books.unlink_author(book.id, sand.id),
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn test_find_by_title_is_literal_contains() {
        let (authors, books) = repos();

        let verne = authors.insert("Jules Verne").unwrap();
        books.insert(&sample_book("Vingt mille lieues"), &[verne.id]).unwrap();
        books.insert(&sample_book("De la Terre a la Lune"), &[verne.id]).unwrap();

        let hits = books.find_by_title("Lune").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "De la Terre a la Lune");

        assert!(books.find_by_title("lune sombre").unwrap().is_empty());
    }

    #[test]
    fn test_list_by_author() {
        let (authors, books) = repos();

        let verne = authors.insert("Jules Verne").unwrap();
        let sand = authors.insert("George Sand").unwrap();
        books.insert(&sample_book("Vingt mille lieues"), &[verne.id]).unwrap();
        books.insert(&sample_book("Indiana"), &[sand.id]).unwrap();

        let shelf = books.list_by_author(verne.id).unwrap();
        assert_eq!(shelf.len(), 1);
        assert_eq!(shelf[0].title, "Vingt mille lieues");
    }
}
