//! Collision-resistant object naming.

use uuid::Uuid;

/// Generate a unique storage name for `filename`.
///
/// Format: `{uuid_v4}-{sanitized_filename}`. Both the blob and the local
/// backend call this independently, so a name is never shared between them.
#[must_use]
pub fn unique_name(filename: &str) -> String {
    format!("{}-{}", Uuid::new_v4(), sanitize_filename(filename))
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
/// Path separators become underscores, so the result is always a single
/// path component.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("invoice.pdf"), "invoice.pdf");
        assert_eq!(sanitize_filename("my file (1).pdf"), "my_file__1_.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("C:\\docs\\plan.docx"), "C__docs_plan.docx");
        assert_eq!(sanitize_filename("日本語.pdf"), "___.pdf");
    }

    #[test]
    fn test_unique_name_keeps_original_suffix() {
        let name = unique_name("report.xlsx");
        assert!(name.ends_with("-report.xlsx"));
        let (prefix, _) = name.split_at(36);
        assert!(Uuid::parse_str(prefix).is_ok());
    }

    #[test]
    fn test_unique_name_differs_per_call() {
        assert_ne!(unique_name("same.txt"), unique_name("same.txt"));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_sanitized_filename_safe_chars(filename in ".*") {
            let sanitized = sanitize_filename(&filename);

            for c in sanitized.chars() {
                let is_safe = c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_';
                prop_assert!(is_safe, "Unexpected character in sanitized filename: {}", c);
            }
        }
    }

    // Same logical file name never yields the same generated name twice.
    proptest! {
        #[test]
        fn prop_unique_name_never_collides(filename in "[a-zA-Z0-9 ._-]{1,40}") {
            let first = unique_name(&filename);
            let second = unique_name(&filename);

            prop_assert_ne!(&first, &second);
            prop_assert!(!first.contains('/'));
            prop_assert!(first.ends_with(&sanitize_filename(&filename)));
        }
    }
}
