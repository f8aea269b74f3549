use super::entity::Book;
use crate::domain::{DomainError, DomainResult};

/// 10-digit lower bound of the ISBN space
pub const ISBN_MIN: i64 = 1_000_000_000;
/// 13-digit upper bound of the ISBN space
pub const ISBN_MAX: i64 = 9_999_999_999_999;

/// Publication year bounds. A numeric range, not a rendered-digit count:
/// negative years validate by magnitude, the sign is not a digit.
pub const YEAR_MIN: i16 = -9999;
pub const YEAR_MAX: i16 = 9999;

/// Validates all Book invariants, including the author set
pub fn validate_book(book: &Book) -> DomainResult<()> {
    validate_book_fields(&book.title, book.isbn, book.year)?;
    if book.authors.is_empty() {
        return Err(DomainError::InvariantViolation(
            "A book must have at least one author".to_string(),
        ));
    }
    Ok(())
}

/// Validates the scalar fields of a book, stated once for both the
/// creation and update paths
pub fn validate_book_fields(title: &str, isbn: i64, year: i16) -> DomainResult<()> {
    validate_title(title)?;
    validate_isbn(isbn)?;
    validate_year(year)?;
    Ok(())
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Book title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_isbn(isbn: i64) -> DomainResult<()> {
    if !(ISBN_MIN..=ISBN_MAX).contains(&isbn) {
        return Err(DomainError::InvariantViolation(format!(
            "ISBN {} must be 10 to 13 digits",
            isbn
        )));
    }
    Ok(())
}

fn validate_year(year: i16) -> DomainResult<()> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(DomainError::InvariantViolation(format!(
            "Publication year {} is out of range",
            year
        )));
    }
    Ok(())
}

/// Invariants that must hold true for the Book domain:
///
/// 1. Identity is immutable and unique among books
/// 2. Title is never empty
/// 3. ISBN has 10 to 13 digits
/// 4. Year lies in -9999..=9999
/// 5. At least one author is associated at all times after creation
/// 6. The author collection mirrors the association edge set exactly
/// 7. Created timestamp never changes

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::Language;
    use chrono::Utc;

    fn book_with(isbn: i64, year: i16, authors: Vec<i64>) -> Book {
        let now = Utc::now();
        Book {
            id: 1,
            title: "Vingt mille lieues sous les mers".to_string(),
            isbn,
            publisher: Some("Hetzel".to_string()),
            year,
            language: Language::French,
            authors,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_valid_book() {
        assert!(validate_book(&book_with(9_782_253_004_226, 1870, vec![1])).is_ok());
    }

    #[test]
    fn test_isbn_digit_bounds() {
        // 9 digits rejected, 10 accepted
        assert!(validate_book_fields("t", 999_999_999, 2000).is_err());
        assert!(validate_book_fields("t", 1_000_000_000, 2000).is_ok());
        // 13 digits accepted, 14 rejected
        assert!(validate_book_fields("t", 9_999_999_999_999, 2000).is_ok());
        assert!(validate_book_fields("t", 10_000_000_000_000, 2000).is_err());
    }

    #[test]
    fn test_year_is_a_range_not_a_digit_count() {
        // the sign of a negative year is not a digit
        assert!(validate_book_fields("t", ISBN_MIN, -9999).is_ok());
        assert!(validate_book_fields("t", ISBN_MIN, 9999).is_ok());
        assert!(validate_book_fields("t", ISBN_MIN, -10000).is_err());
        assert!(validate_book_fields("t", ISBN_MIN, 10000).is_err());
    }

    #[test]
    fn test_empty_title_fails() {
        assert!(validate_book_fields("  ", ISBN_MIN, 2000).is_err());
    }

    #[test]
    fn test_authorless_book_fails() {
        let book = book_with(ISBN_MIN, 1870, vec![]);
        assert!(validate_book(&book).is_err());
    }
}
