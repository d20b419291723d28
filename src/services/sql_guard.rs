use std::sync::OnceLock;

use regex::Regex;

use crate::errors::AppError;

fn comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)--[^\n]*|/\*.*?\*/").expect("valid comment regex"))
}

fn read_keyword_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^\(*\s*(SELECT|WITH)\b").expect("valid keyword regex"))
}

/// Trims whitespace and trailing semicolons. Empty input is rejected.
pub fn normalize_sql(sql: &str) -> Result<&str, AppError> {
    let normalized = sql.trim().trim_end_matches(';').trim();
    if normalized.is_empty() {
        return Err(AppError::Query("query must not be empty".to_string()));
    }
    Ok(normalized)
}

/// Accepts a single SELECT/WITH statement, ignoring comments.
pub fn ensure_read_only(sql: &str) -> Result<(), AppError> {
    let stripped = comment_pattern().replace_all(sql, " ");
    let stripped = stripped.trim().trim_end_matches(';').trim();

    if !read_keyword_pattern().is_match(stripped) {
        return Err(AppError::Query(
            "only SELECT/WITH read queries are allowed".to_string(),
        ));
    }

    let statements = stripped
        .split(';')
        .filter(|part| !part.trim().is_empty())
        .count();
    if statements > 1 {
        return Err(AppError::Query(
            "multiple SQL statements are not allowed".to_string(),
        ));
    }
    Ok(())
}
