// sqlx::Error -> AppError mapping
//
// Lives here because of the orphan rule: core cannot see sqlx and this crate
// cannot implement From<sqlx::Error> for AppError.

use opskill_core::error::AppError;

// Friendlier messages for the UNIQUE constraints callers can trip
const UNIQUE_MESSAGES: &[(&str, &str)] = &[
    ("users.email", "Email is already registered"),
    (
        "applications.job_id, applications.talent_id",
        "Talent has already applied to this job",
    ),
    (
        "reviews.contract_id, reviews.reviewer_id",
        "Reviewer has already reviewed this contract",
    ),
];

/// Convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            match db_err.code().as_deref() {
                // SQLite extended codes: https://www.sqlite.org/rescode.html
                Some("2067") | Some("1555") => {
                    let friendly = UNIQUE_MESSAGES
                        .iter()
                        .find(|(columns, _)| message.ends_with(columns))
                        .map(|(_, text)| text.to_string());
                    AppError::Conflict(
                        friendly.unwrap_or_else(|| format!("Duplicate record: {}", message)),
                    )
                }
                Some("787") | Some("3850") => AppError::Database(format!(
                    "Referenced record does not exist: {}",
                    message
                )),
                Some("275") => {
                    AppError::Database(format!("Check constraint violation: {}", message))
                }
                Some("5") | Some("517") => {
                    AppError::Database(format!("Database locked (SQLITE_BUSY): {}", message))
                }
                Some("13") => AppError::Database(format!("Database full: {}", message)),
                Some(code) => AppError::Database(format!("Database error [{}]: {}", code, message)),
                None => AppError::Database(format!("Database error: {}", message)),
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => AppError::Database(format!("Column not found: {}", col)),
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}

/// Escape `%`, `_` and `\` for a LIKE pattern using `ESCAPE '\'`
pub(crate) fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
