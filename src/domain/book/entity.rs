use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::author::AuthorId;
use crate::domain::{DomainError, DomainResult};

/// Opaque integer handle assigned by the store on insert
pub type BookId = i64;

/// Catalogue language of a book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    French,
    English,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::French => write!(f, "french"),
            Language::English => write!(f, "english"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s {
            "french" => Ok(Language::French),
            "english" => Ok(Language::English),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown language: {}",
                other
            ))),
        }
    }
}

/// A catalogued book
///
/// Always associated with at least one author from creation onwards; the
/// `authors` collection is derived from the association edge set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Internal immutable identifier
    pub id: BookId,

    /// Title, never empty
    pub title: String,

    /// 10 to 13 digits
    pub isbn: i64,

    pub publisher: Option<String>,

    /// Publication year, -9999..=9999
    pub year: i16,

    pub language: Language,

    /// Ids of the associated authors, never empty
    pub authors: Vec<AuthorId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Field set of a book that does not exist in the store yet.
/// The store assigns the identity and establishes the initial edge set.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub isbn: i64,
    pub publisher: Option<String>,
    pub year: i16,
    pub language: Language,
}

impl Book {
    /// Replace every mutable field and the author set.
    /// Preserves identity and creation timestamp, refreshes the
    /// modification timestamp.
    pub fn replace_fields(
        &mut self,
        title: String,
        isbn: i64,
        publisher: Option<String>,
        year: i16,
        language: Language,
        authors: Vec<AuthorId>,
    ) {
        self.title = title;
        self.isbn = isbn;
        self.publisher = publisher;
        self.year = year;
        self.language = language;
        self.authors = authors;
        self.updated_at = Utc::now();
    }

    pub fn has_author(&self, author_id: AuthorId) -> bool {
        self.authors.contains(&author_id)
    }
}
