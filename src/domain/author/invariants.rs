use crate::domain::{DomainError, DomainResult};

/// An author name cannot be empty or whitespace-only
pub fn validate_author_name(full_name: &str) -> DomainResult<()> {
    if full_name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Author name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Invariants that must hold true for the Author domain:
///
/// 1. Identity is immutable and unique among authors
/// 2. Name is never empty
/// 3. The book collection mirrors the association edge set exactly
/// 4. An author with associated books cannot be deleted
/// 5. Created timestamp never changes
