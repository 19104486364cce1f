//! Helpers for classifying database errors.

/// Primary key constraint of the `links` table.
pub const LINKS_CODE_CONSTRAINT: &str = "links_pkey";

/// Returns true if `e` is a unique violation on the link short code.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(LINKS_CODE_CONSTRAINT))
}
