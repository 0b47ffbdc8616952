//! Keyword and position matching helpers for listings.
//!
//! Keyword filters are pushed down to SQL as `ILIKE` patterns. The
//! multi-position filter (OR over comma-separated tokens) is evaluated in the
//! application after the SQL phase has narrowed the rows.

/// Build an `ILIKE` substring pattern, escaping the LIKE wildcards in `input`.
///
/// Returns `None` for blank input so callers can skip the predicate.
pub fn like_pattern(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(trimmed.len() + 2);
    escaped.push('%');
    for ch in trimmed.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}

/// Split a comma-separated position filter into lowercase tokens.
///
/// Blank tokens are dropped; an empty result means "no position filter".
pub fn parse_position_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether `position` contains at least one of `tokens`, case-insensitively.
///
/// `tokens` must come from [`parse_position_tokens`]. A missing position never
/// matches.
pub fn matches_any_position(position: Option<&str>, tokens: &[String]) -> bool {
    let Some(position) = position else {
        return false;
    };
    let position = position.to_lowercase();
    tokens.iter().any(|token| position.contains(token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_in_wildcards() {
        assert_eq!(like_pattern("oop"), Some("%oop%".to_string()));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%_done"), Some("%100\\%\\_done%".to_string()));
    }

    #[test]
    fn like_pattern_blank_returns_none() {
        assert_eq!(like_pattern("   "), None);
    }

    #[test]
    fn position_tokens_are_trimmed_and_lowercased() {
        assert_eq!(
            parse_position_tokens(" Backend , ,Java Developer,"),
            vec!["backend".to_string(), "java developer".to_string()]
        );
        assert!(parse_position_tokens(" , ").is_empty());
    }

    #[test]
    fn position_matching_is_an_or_of_substrings() {
        let tokens = parse_position_tokens("frontend,java");
        assert!(matches_any_position(Some("Senior Java Engineer"), &tokens));
        assert!(matches_any_position(Some("FRONTEND intern"), &tokens));
        assert!(!matches_any_position(Some("Data Analyst"), &tokens));
        assert!(!matches_any_position(None, &tokens));
    }
}
