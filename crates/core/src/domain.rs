//! Domain input normalization

/// Reduce user input to a bare host name.
///
/// Lower-cases, strips any `scheme://`, drops path/query/fragment, a leading
/// `www.` and trailing slashes or dots.
///
/// ```
/// use seolens_core::domain::normalize_domain;
///
/// assert_eq!(normalize_domain("https://www.Example.com/"), "example.com");
/// assert_eq!(normalize_domain("example.com"), "example.com");
/// ```
pub fn normalize_domain(input: &str) -> String {
    let lowered = input.trim().to_lowercase();

    let without_scheme = match lowered.find("://") {
        Some(index) => &lowered[index + 3..],
        None => lowered.as_str(),
    };

    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    let host = host.strip_prefix("www.").unwrap_or(host);

    host.trim_end_matches(['/', '.']).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_url() {
        assert_eq!(normalize_domain("https://www.Example.com/"), "example.com");
    }

    #[test]
    fn test_normalize_bare_domain_is_unchanged() {
        assert_eq!(normalize_domain("example.com"), "example.com");
    }

    #[test]
    fn test_normalize_strips_path_query_and_fragment() {
        assert_eq!(
            normalize_domain("http://blog.example.com/posts/1?ref=x#top"),
            "blog.example.com"
        );
        assert_eq!(normalize_domain("example.com?utm=1"), "example.com");
    }

    #[test]
    fn test_normalize_trailing_slashes_and_whitespace() {
        assert_eq!(normalize_domain("  www.example.com///  "), "example.com");
    }

    #[test]
    fn test_normalize_only_leading_www() {
        assert_eq!(normalize_domain("wwwexample.com"), "wwwexample.com");
        assert_eq!(
            normalize_domain("shop.www.example.com"),
            "shop.www.example.com"
        );
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize_domain(""), "");
        assert_eq!(normalize_domain("https://"), "");
    }
}
