//! Joining request paths onto the configured base URL

use horizon_domain::{HorizonError, Result};
use url::Url;

/// Append `path` to the path of `base`, cleaning `.` and `..` segments and
/// duplicate slashes.
///
/// A trailing slash on `path` is kept. An optional `?query` suffix on `path`
/// becomes the URL query.
pub fn join_path(base: &Url, path: &str) -> Result<Url> {
    if base.cannot_be_a_base() {
        return Err(HorizonError::Config(format!("base URL {base} cannot carry a path")));
    }

    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in base.path().split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    let mut joined = format!("/{}", segments.join("/"));
    if path.ends_with('/') && !joined.ends_with('/') {
        joined.push('/');
    }

    let mut url = base.clone();
    url.set_path(&joined);
    url.set_query(query);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(base: &str, path: &str) -> String {
        join_path(&Url::parse(base).unwrap(), path).unwrap().to_string()
    }

    #[test]
    fn joins_onto_bare_host() {
        assert_eq!(join("https://pki.example", "/api/v1/x"), "https://pki.example/api/v1/x");
        assert_eq!(join("https://pki.example/", "api/v1/x"), "https://pki.example/api/v1/x");
    }

    #[test]
    fn keeps_base_path_prefix() {
        assert_eq!(
            join("https://pki.example/horizon/", "/api/v1/requests"),
            "https://pki.example/horizon/api/v1/requests"
        );
    }

    #[test]
    fn collapses_duplicate_slashes_and_dots() {
        assert_eq!(
            join("https://pki.example/base", "//api/./v1//x"),
            "https://pki.example/base/api/v1/x"
        );
        assert_eq!(join("https://pki.example/base/", "../api"), "https://pki.example/api");
        assert_eq!(join("https://pki.example", "../../api"), "https://pki.example/api");
    }

    #[test]
    fn keeps_trailing_slash() {
        assert_eq!(join("https://pki.example", "/api/v1/"), "https://pki.example/api/v1/");
    }

    #[test]
    fn splits_query() {
        assert_eq!(
            join("https://pki.example", "/api/v1/rfc5280/tc/abc?order=desc"),
            "https://pki.example/api/v1/rfc5280/tc/abc?order=desc"
        );
    }

    #[test]
    fn encodes_unsafe_characters() {
        assert_eq!(
            join("https://pki.example", "/api/v1/accounts/john doe"),
            "https://pki.example/api/v1/accounts/john%20doe"
        );
    }

    #[test]
    fn rejects_opaque_base() {
        let base = Url::parse("mailto:pki@example.com").unwrap();
        assert!(join_path(&base, "/api").is_err());
    }
}
