//! Constraint-violation classification for `DbErr`.

use sea_orm::{DbErr, SqlErr};

/// Unique violation, as reported by the driver or, failing that, by message.
pub fn is_unique_violation(err: &DbErr) -> bool {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return true;
    }
    let msg = err.to_string().to_lowercase();
    msg.contains("unique constraint") || msg.contains("duplicate")
}

/// Foreign key violation, e.g. deleting a row that is still referenced.
pub fn is_foreign_key_violation(err: &DbErr) -> bool {
    if let Some(SqlErr::ForeignKeyConstraintViolation(_)) = err.sql_err() {
        return true;
    }
    err.to_string().to_lowercase().contains("foreign key constraint")
}
