use std::collections::HashSet;

/// Converts a single raw identifier into its canonical form.
///
/// Returns `None` if nothing is left after trimming. This is the only place
/// identifiers get case-folded, both at catalog load and at query time.
pub fn canonical(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { return None; }
    Some(trimmed.to_uppercase())
}

/// Builds a canonical identifier set out of raw user input.
pub fn normalize<I, S>(raw: I) -> HashSet<String>
    where I: IntoIterator<Item=S>,
          S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|id| canonical(id.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical() {
        assert_eq!(canonical("  ensg00000141510\t"), Some("ENSG00000141510".to_string()));
        assert_eq!(canonical("TP53"), Some("TP53".to_string()));
        assert_eq!(canonical("   "), None);
        assert_eq!(canonical(""), None);
    }

    #[test]
    fn test_normalize_collapses_duplicates() {
        let ids = normalize(vec!["g1", " G1 ", "g2", "", "  "]);
        let expected: HashSet<String> = vec!["G1", "G2"].into_iter()
            .map(String::from)
            .collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(&["  Foo", "bar ", "BAR", "baz\n"]);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_empty() {
        let ids = normalize(Vec::<String>::new());
        assert!(ids.is_empty());
    }
}
