use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::book::BookId;

/// Opaque integer handle assigned by the store on insert
pub type AuthorId = i64;

/// A catalogued author
///
/// Holds non-exclusive references to books: a book may belong to several
/// authors, so deleting an author never deletes books through this
/// collection. The collection itself is derived from the association edge
/// set, never written directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    /// Internal immutable identifier
    pub id: AuthorId,

    /// Display name, never empty
    pub full_name: String,

    /// Ids of the books this author is associated with
    pub books: Vec<BookId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Author {
    /// Replace the name, refreshing the modification timestamp.
    /// The book collection is deliberately untouched: associations are
    /// only ever established or dropped through the edge set.
    pub fn rename(&mut self, full_name: String) {
        self.full_name = full_name;
        self.updated_at = Utc::now();
    }

    pub fn has_books(&self) -> bool {
        !self.books.is_empty()
    }
}
