//! Display titles from document file names.

/// Derive a display title from a file name stem.
///
/// Hyphens and underscores become spaces, and the first character of every
/// word is uppercased. The rest of each word is left as written, so
/// `"api-HTTPClient"` becomes `"Api HTTPClient"`.
pub fn derive_title(stem: &str) -> String {
    stem.replace(|c: char| c == '-' || c == '_', " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derives_title_from_hyphenated_stem() {
        assert_eq!(derive_title("getting-started"), "Getting Started");
    }

    #[test]
    fn empty_stem_gives_empty_title() {
        assert_eq!(derive_title(""), "");
    }

    #[test]
    fn underscores_are_separators() {
        assert_eq!(derive_title("release_notes"), "Release Notes");
    }

    #[test]
    fn preserves_interior_casing() {
        assert_eq!(derive_title("api-HTTPClient"), "Api HTTPClient");
        assert_eq!(derive_title("FAQ"), "FAQ");
        assert_eq!(derive_title("iOS-setup"), "IOS Setup");
    }

    #[test]
    fn collapses_repeated_separators() {
        assert_eq!(derive_title("a--b__c"), "A B C");
        assert_eq!(derive_title("-leading"), "Leading");
    }

    #[test]
    fn every_word_starts_uppercase() {
        let stems = [
            "index",
            "getting-started",
            "deploy_to-production",
            "v2-migration-guide",
            "über-config",
        ];

        for stem in stems {
            let title = derive_title(stem);
            let normalized = stem.replace(|c: char| c == '-' || c == '_', " ");

            assert_eq!(
                title.split_whitespace().count(),
                normalized.split_whitespace().count(),
                "word count for {stem}"
            );
            for word in title.split_whitespace() {
                let first = word.chars().next().unwrap();
                assert!(
                    !first.is_lowercase(),
                    "word {word:?} in {title:?} starts lowercase"
                );
            }
        }
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(derive_title("some-page"), derive_title("some-page"));
    }
}
