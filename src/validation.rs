use crate::error::{StoreError, StoreResult};

pub const MIN_TITLE_LEN: usize = 3;
pub const MAX_TITLE_LEN: usize = 200;
pub const MIN_DESCRIPTION_LEN: usize = 10;
pub const MAX_DESCRIPTION_LEN: usize = 5_000;
pub const MAX_AUTHOR_LEN: usize = 100;
pub const MIN_COMMENT_LEN: usize = 2;
pub const MAX_COMMENT_LEN: usize = 2_000;

pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

const _: [(); MAX_TITLE_LEN - MIN_TITLE_LEN] = [(); MAX_TITLE_LEN - MIN_TITLE_LEN];
const _: [(); MAX_COMMENT_LEN - MIN_COMMENT_LEN] = [(); MAX_COMMENT_LEN - MIN_COMMENT_LEN];

pub fn canonicalize_title(value: &str) -> StoreResult<String> {
    bounded_text(value, "Title", MIN_TITLE_LEN, MAX_TITLE_LEN)
}

pub fn canonicalize_description(value: &str) -> StoreResult<String> {
    bounded_text(value, "Description", MIN_DESCRIPTION_LEN, MAX_DESCRIPTION_LEN)
}

pub fn canonicalize_comment_text(value: &str) -> StoreResult<String> {
    bounded_text(value, "Comment", MIN_COMMENT_LEN, MAX_COMMENT_LEN)
}

/// Blank or missing authors collapse to [`ANONYMOUS_AUTHOR`].
pub fn canonicalize_author(value: Option<&str>) -> StoreResult<String> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Ok(ANONYMOUS_AUTHOR.to_string());
    }
    if trimmed.chars().count() > MAX_AUTHOR_LEN {
        return Err(StoreError::validation(format!(
            "Author exceeds {MAX_AUTHOR_LEN} character limit"
        )));
    }
    Ok(trimmed.to_string())
}

fn bounded_text(value: &str, label: &str, min: usize, max: usize) -> StoreResult<String> {
    assert!(min > 0, "Minimum length must be positive");
    assert!(min <= max, "Minimum length exceeds maximum");

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation(format!("{label} is required")));
    }
    let length = trimmed.chars().count();
    if length < min {
        return Err(StoreError::validation(format!(
            "{label} is too short, minimum {min} characters"
        )));
    }
    if length > max {
        return Err(StoreError::validation(format!(
            "{label} exceeds {max} character limit"
        )));
    }
    Ok(trimmed.to_string())
}
