pub mod entity;
pub mod invariants;

pub use entity::{Author, AuthorId};
pub use invariants::validate_author_name;
