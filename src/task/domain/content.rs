//! Validation helpers for user-supplied task content.

use super::TaskDomainError;
use std::collections::BTreeSet;

/// Trims and validates a task title.
///
/// # Errors
///
/// Returns [`TaskDomainError::EmptyTitle`] for blank titles and
/// [`TaskDomainError::TitleTooLong`] when the trimmed title exceeds `limit`
/// characters.
pub fn validate_title(raw: &str, limit: usize) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    let actual = trimmed.chars().count();
    if actual > limit {
        return Err(TaskDomainError::TitleTooLong { limit, actual });
    }
    Ok(trimmed.to_owned())
}

/// Validates a task description. Descriptions may be empty.
///
/// # Errors
///
/// Returns [`TaskDomainError::DescriptionTooLong`] when the description
/// exceeds `limit` characters.
pub fn validate_description(raw: &str, limit: usize) -> Result<String, TaskDomainError> {
    let actual = raw.chars().count();
    if actual > limit {
        return Err(TaskDomainError::DescriptionTooLong { limit, actual });
    }
    Ok(raw.to_owned())
}

/// Trims tags and collapses duplicates.
///
/// # Errors
///
/// Returns [`TaskDomainError::EmptyTag`] when any tag is blank.
pub fn normalize_tags<I, S>(tags: I) -> Result<BTreeSet<String>, TaskDomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| {
            let trimmed = tag.as_ref().trim();
            if trimmed.is_empty() {
                Err(TaskDomainError::EmptyTag)
            } else {
                Ok(trimmed.to_owned())
            }
        })
        .collect()
}
