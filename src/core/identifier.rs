//! Validator identifier style.
//!
//! Identifiers double as record `type`s in every snapshot, so they follow a
//! strict SCREAMING_SNAKE_CASE convention: uppercase ASCII letters and
//! underscores only, no leading or trailing underscore, and every underscore
//! flanked by letters on both sides.

/// Check an identifier against the naming convention.
///
/// ```
/// use fieldcheck::core::identifier::matches_style;
///
/// assert!(matches_style("HELLO_WORLD"));
/// assert!(!matches_style("_HELLO"));
/// assert!(!matches_style("HeLLO"));
/// ```
pub fn matches_style(identifier: &str) -> bool {
    let bytes = identifier.as_bytes();
    if bytes.is_empty() {
        return false;
    }

    bytes.iter().enumerate().all(|(i, &b)| match b {
        b'A'..=b'Z' => true,
        b'_' => {
            let before = i.checked_sub(1).and_then(|j| bytes.get(j));
            let after = bytes.get(i + 1);
            matches!(before, Some(b'A'..=b'Z')) && matches!(after, Some(b'A'..=b'Z'))
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_uppercase_succeeds() {
        for identifier in ["HELLO", "HEL", "HE", "H"] {
            assert!(matches_style(identifier), "{identifier} should pass");
        }
    }

    #[test]
    fn test_flanked_underscores_succeed() {
        for identifier in ["HELLO_WORLD", "H_W", "H_E_L_L_O"] {
            assert!(matches_style(identifier), "{identifier} should pass");
        }
    }

    #[test]
    fn test_edge_underscores_fail() {
        for identifier in ["_HELLO", "HELLO_", "_HELLO_", "_", "A__B", "_STYLE_Fail_"] {
            assert!(!matches_style(identifier), "{identifier} should fail");
        }
    }

    #[test]
    fn test_lowercase_and_other_chars_fail() {
        for identifier in ["HeLLO", "HeO", "Ho", "o", "", "HELLO WORLD", "HELLO1", "ÄB"] {
            assert!(!matches_style(identifier), "{identifier:?} should fail");
        }
    }

    proptest! {
        #[test]
        fn prop_generated_words_pass(words in prop::collection::vec("[A-Z]{1,6}", 1..5)) {
            let identifier = words.join("_");
            prop_assert!(matches_style(&identifier));
        }

        #[test]
        fn prop_lowercase_anywhere_fails(prefix in "[A-Z]{0,4}", lower in "[a-z]", suffix in "[A-Z]{0,4}") {
            let identifier = format!("{prefix}{lower}{suffix}");
            prop_assert!(!matches_style(&identifier));
        }
    }
}
