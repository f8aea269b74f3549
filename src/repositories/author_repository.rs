// src/repositories/author_repository.rs
//
// Author persistence

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::author::{Author, AuthorId};
use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
pub trait AuthorRepository: Send + Sync {
    /// Insert a new author; the store assigns the identity
    fn insert(&self, full_name: &str) -> AppResult<Author>;
    /// Replace the name only; associations are never written here
    fn update_name(&self, id: AuthorId, full_name: &str) -> AppResult<()>;
    fn get_by_id(&self, id: AuthorId) -> AppResult<Option<Author>>;
    fn list_all(&self) -> AppResult<Vec<Author>>;
    /// Literal case-sensitive contains match on the full name
    fn search_by_name(&self, query: &str) -> AppResult<Vec<Author>>;
    fn delete(&self, id: AuthorId) -> AppResult<()>;
    fn exists(&self, id: AuthorId) -> AppResult<bool>;
}

pub struct SqliteAuthorRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteAuthorRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map a database row to an Author with an empty book collection -
    /// returns rusqlite::Error for query_map compatibility
    fn row_to_author(row: &Row) -> Result<Author, rusqlite::Error> {
        let created_at_str: String = row.get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let updated_at_str: String = row.get("updated_at")?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Author {
            id: row.get("id")?,
            full_name: row.get("full_name")?,
            books: Vec::new(),
            created_at,
            updated_at,
        })
    }

    /// Fill the derived book collection from the association edge set
    fn attach_books(conn: &Connection, author: &mut Author) -> AppResult<()> {
        let mut stmt =
            conn.prepare("SELECT book_id FROM book_authors WHERE author_id = ?1 ORDER BY book_id")?;

        author.books = stmt
            .query_map(params![author.id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(())
    }
}

impl AuthorRepository for SqliteAuthorRepository {
    fn insert(&self, full_name: &str) -> AppResult<Author> {
        let conn = self.pool.get()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO authors (full_name, created_at, updated_at) VALUES (?1, ?2, ?3)",
            params![full_name, now.to_rfc3339(), now.to_rfc3339()],
        )?;

        Ok(Author {
            id: conn.last_insert_rowid(),
            full_name: full_name.to_string(),
            books: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    fn update_name(&self, id: AuthorId, full_name: &str) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE authors SET full_name = ?1, updated_at = ?2 WHERE id = ?3",
            params![full_name, Utc::now().to_rfc3339(), id],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn get_by_id(&self, id: AuthorId) -> AppResult<Option<Author>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, full_name, created_at, updated_at FROM authors WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_author) {
            Ok(mut author) => {
                Self::attach_books(&conn, &mut author)?;
                Ok(Some(author))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Author>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, full_name, created_at, updated_at FROM authors ORDER BY id",
        )?;

        let mut authors: Vec<Author> = stmt
            .query_map([], Self::row_to_author)?
            .collect::<Result<Vec<_>, _>>()?;

        for author in &mut authors {
            Self::attach_books(&conn, author)?;
        }

        Ok(authors)
    }

    fn search_by_name(&self, query: &str) -> AppResult<Vec<Author>> {
        let conn = self.pool.get()?;

        // instr keeps literal contains semantics; LIKE would fold case
        let mut stmt = conn.prepare(
            "SELECT id, full_name, created_at, updated_at
             FROM authors
             WHERE instr(full_name, ?1) > 0
             ORDER BY id",
        )?;

        let mut authors: Vec<Author> = stmt
            .query_map(params![query], Self::row_to_author)?
            .collect::<Result<Vec<_>, _>>()?;

        for author in &mut authors {
            Self::attach_books(&conn, author)?;
        }

        Ok(authors)
    }

    fn delete(&self, id: AuthorId) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM authors WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn exists(&self, id: AuthorId) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM authors WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}
