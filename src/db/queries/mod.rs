//! Database queries

pub mod bus;
pub mod driver;
pub mod place;
pub mod shift;

/// Outcome of deleting a referenced entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// A foreign key still references the row; deletion is restricted.
    InUse,
}

/// True when the error is a Postgres foreign-key violation (23503), i.e.
/// an ON DELETE RESTRICT constraint fired.
pub(crate) fn is_restrict_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23503")
}
