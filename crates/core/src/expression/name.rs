//! Attribute-name sanitization.
//!
//! Expression placeholder tokens may not contain `*`, `.` or `-`, so field
//! names are cleaned before they are used as placeholder suffixes. The
//! placeholder-name table always maps back to the original field name, so the
//! wire's name resolution still targets the real attribute.

use std::borrow::Cow;

/// Replace every `*`, `.` and `-` in `name` with `_`.
///
/// Returns the input borrowed when nothing needed replacing.
pub fn clean_attribute_name(name: &str) -> Cow<'_, str> {
    if name.contains(['*', '.', '-']) {
        Cow::Owned(
            name.chars()
                .map(|c| if matches!(c, '*' | '.' | '-') { '_' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_replaces_illegal_characters() {
        assert_eq!(clean_attribute_name("a.b"), "a_b");
        assert_eq!(clean_attribute_name("a-b*c"), "a_b_c");
        assert_eq!(clean_attribute_name("*.-"), "___");
    }

    #[test]
    fn test_clean_borrows_when_unchanged() {
        let name = "plain_name";
        assert!(matches!(
            clean_attribute_name(name),
            Cow::Borrowed("plain_name")
        ));
    }

    #[test]
    fn test_cleaned_output_contains_no_illegal_characters() {
        for name in ["order.total", "a-*-b", "x.y-z*"] {
            let cleaned = clean_attribute_name(name);
            assert!(!cleaned.contains(['*', '.', '-']), "cleaned: {cleaned}");
        }
    }
}
