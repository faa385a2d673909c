//! Centralized validation and helper functions.

use crate::core::types::MISSING_IDENTIFIER;

/// Maximum number of rows allowed in a single input table
pub const MAX_TABLE_ROWS: usize = 1_000_000;

/// Whether an identifier value stands for "no identifier available".
///
/// # Examples
///
/// ```
/// use pathway_matcher::utils::validation::is_missing_identifier;
///
/// assert!(is_missing_identifier("-1"));
/// assert!(is_missing_identifier("  "));
/// assert!(!is_missing_identifier("17925"));
/// ```
#[must_use]
pub fn is_missing_identifier(identifier: &str) -> bool {
    let trimmed = identifier.trim();
    trimmed.is_empty() || trimmed == MISSING_IDENTIFIER
}

/// Compute a signature hash from an ordered sequence of canonical lines.
///
/// The signature is the MD5 of the lines joined with newlines, so callers must
/// emit lines in a deterministic order. Returns an empty string for no lines.
#[must_use]
pub fn compute_signature<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut context = md5::Context::new();
    let mut any = false;
    for line in lines {
        context.consume(line.as_ref().as_bytes());
        context.consume(b"\n");
        any = true;
    }

    if any {
        format!("{:x}", context.compute())
    } else {
        String::new()
    }
}

/// Check if adding another row would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new row.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_row_limit(count: usize) -> Option<String> {
    if count >= MAX_TABLE_ROWS {
        Some(format!(
            "Too many rows: adding another would exceed maximum of {MAX_TABLE_ROWS}"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identifier() {
        assert!(is_missing_identifier("-1"));
        assert!(is_missing_identifier(" -1 "));
        assert!(is_missing_identifier(""));
        assert!(!is_missing_identifier("-10"));
        assert!(!is_missing_identifier("15361"));
    }

    #[test]
    fn test_compute_signature_deterministic() {
        let a = compute_signature(["n\tSC_A", "e\tSC_A\tSC_B\tR1"]);
        let b = compute_signature(vec!["n\tSC_A".to_string(), "e\tSC_A\tSC_B\tR1".to_string()]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_compute_signature_order_sensitive() {
        let a = compute_signature(["x", "y"]);
        let b = compute_signature(["y", "x"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_compute_signature_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(compute_signature(empty), "");
    }

    #[test]
    fn test_row_limit() {
        assert!(check_row_limit(0).is_none());
        assert!(check_row_limit(MAX_TABLE_ROWS - 1).is_none());
        assert!(check_row_limit(MAX_TABLE_ROWS).is_some());
    }
}
