mod dependency_specs;
mod identity_syntax;
mod platform_skip;
mod required_fields;
mod source_checksum;
mod source_url;
mod test_coverage;
mod unknown_sections;

use super::Check;

/// Returns all built-in checks, in check-id order.
pub fn all_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(required_fields::RequiredFields),
        Box::new(source_checksum::SourceChecksum),
        Box::new(identity_syntax::IdentitySyntax),
        Box::new(dependency_specs::DependencySpecs),
        Box::new(test_coverage::TestCoverage),
        Box::new(source_url::SourceUrl),
        Box::new(platform_skip::PlatformSkip),
        Box::new(unknown_sections::UnknownSections),
    ]
}

/// Nearest candidate within edit distance 2, for "did you mean" hints.
fn nearest<'a>(candidates: &[&'a str], input: &str) -> Option<&'a str> {
    let input = input.to_lowercase();
    candidates
        .iter()
        .map(|c| (levenshtein::levenshtein(&input, c), *c))
        .filter(|(distance, _)| *distance > 0 && *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_finds_close_match() {
        assert_eq!(nearest(&["linux", "osx", "win"], "wni"), Some("win"));
        assert_eq!(nearest(&["requirements"], "requirments"), Some("requirements"));
    }

    #[test]
    fn nearest_ignores_distant_strings() {
        assert_eq!(nearest(&["linux", "osx", "win"], "solaris"), None);
    }

    #[test]
    fn exact_match_is_not_a_suggestion() {
        assert_eq!(nearest(&["win"], "win"), None);
    }
}
