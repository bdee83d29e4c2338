//! Version strings whose last character is a counter digit (`v1`, `1.0.3`).

use crate::UtilsError;

fn split_last_digit(version: &str) -> Result<(&str, u32), UtilsError> {
    let last = version
        .chars()
        .last()
        .ok_or_else(|| UtilsError::InvalidVersion(version.to_string()))?;
    let digit = last
        .to_digit(10)
        .ok_or_else(|| UtilsError::InvalidVersion(version.to_string()))?;
    Ok((&version[..version.len() - last.len_utf8()], digit))
}

/// Bump the trailing digit: `v1` -> `v2`, `v9` -> `v10`.
pub fn increment_version(version: &str) -> Result<String, UtilsError> {
    let (prefix, digit) = split_last_digit(version)?;
    Ok(format!("{}{}", prefix, digit + 1))
}

/// Lower the trailing digit, never below zero: `v2` -> `v1`, `v0` -> `v0`.
pub fn decrement_version(version: &str) -> Result<String, UtilsError> {
    let (prefix, digit) = split_last_digit(version)?;
    Ok(format!("{}{}", prefix, digit.saturating_sub(1)))
}
