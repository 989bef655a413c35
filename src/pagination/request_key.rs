//! Request key construction
//!
//! A request key is the target URL with the offset pagination parameters
//! written into its query string. Identical pages always produce identical
//! keys, which is what lets the request cache deduplicate them.

use crate::error::{Error, Result};
use url::Url;

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "limit";

/// Query parameter carrying the zero-based offset of the first item
pub const START_INDEX_PARAM: &str = "startIndex";

/// Query parameter asking the server to report the collection size
pub const TOTAL_COUNT_PARAM: &str = "totalCount";

/// Parse a pagination target, resolving relative targets against `origin`
pub fn resolve_target(target: &str, origin: Option<&Url>) -> Result<Url> {
    match Url::parse(target) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match origin {
            Some(origin) => Ok(origin.join(target)?),
            None => Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithoutBase)),
        },
        Err(e) => Err(e.into()),
    }
}

/// Replace query parameters on a URL
///
/// Pairs whose name appears in `params` are removed wherever they occur;
/// every other pair keeps its position. The new pairs are appended in the
/// order given.
pub fn set_query_params(url: &Url, params: &[(&str, String)]) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !params.iter().any(|(p, _)| p == name))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut out = url.clone();
    out.set_query(None);
    {
        let mut pairs = out.query_pairs_mut();
        for (name, value) in &kept {
            pairs.append_pair(name, value);
        }
        for (name, value) in params {
            pairs.append_pair(name, value);
        }
    }
    out
}

/// Build the request key for one page
pub fn build_request_key(target: &Url, limit: u32, start_index: u64) -> String {
    set_query_params(
        target,
        &[
            (LIMIT_PARAM, limit.to_string()),
            (START_INDEX_PARAM, start_index.to_string()),
            (TOTAL_COUNT_PARAM, "true".to_string()),
        ],
    )
    .to_string()
}

/// Read a numeric query parameter, if present and well formed
pub fn query_number(url: &Url, name: &str) -> Option<u64> {
    url.query_pairs()
        .find(|(n, _)| n == name)
        .and_then(|(_, v)| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_build_request_key_appends_params() {
        let key = build_request_key(&url("https://emr.example.org/ws/rest/v1/patient"), 50, 650);
        assert_eq!(
            key,
            "https://emr.example.org/ws/rest/v1/patient?limit=50&startIndex=650&totalCount=true"
        );
    }

    #[test]
    fn test_build_request_key_overwrites_existing_params() {
        let target = url("https://emr.example.org/ws/rest/v1/patient?limit=3&q=john&startIndex=9&totalCount=false&v=full");
        let key = build_request_key(&target, 25, 0);
        assert_eq!(
            key,
            "https://emr.example.org/ws/rest/v1/patient?q=john&v=full&limit=25&startIndex=0&totalCount=true"
        );
    }

    #[test]
    fn test_build_request_key_removes_duplicate_params() {
        let target = url("https://h/p?limit=1&limit=2&x=y");
        let key = build_request_key(&target, 10, 10);
        assert_eq!(key, "https://h/p?x=y&limit=10&startIndex=10&totalCount=true");
    }

    #[test]
    fn test_build_request_key_is_stable() {
        let target = url("https://h/p?q=a");
        assert_eq!(
            build_request_key(&target, 10, 20),
            build_request_key(&target, 10, 20)
        );
        assert_ne!(
            build_request_key(&target, 10, 20),
            build_request_key(&target, 10, 30)
        );
    }

    #[test]
    fn test_resolve_target_absolute() {
        let resolved = resolve_target("https://h/p?q=1", None).unwrap();
        assert_eq!(resolved.as_str(), "https://h/p?q=1");
    }

    #[test]
    fn test_resolve_target_relative_with_origin() {
        let origin = url("https://emr.example.org/openmrs/spa/home");
        let resolved = resolve_target("/openmrs/ws/rest/v1/location?tag=Login", Some(&origin)).unwrap();
        assert_eq!(
            resolved.as_str(),
            "https://emr.example.org/openmrs/ws/rest/v1/location?tag=Login"
        );
    }

    #[test]
    fn test_resolve_target_relative_without_origin() {
        let err = resolve_target("/ws/rest/v1/location", None).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidUrl(url::ParseError::RelativeUrlWithoutBase)
        ));
    }

    #[test]
    fn test_query_number() {
        let u = url("https://h/p?limit=50&startIndex=abc");
        assert_eq!(query_number(&u, "limit"), Some(50));
        assert_eq!(query_number(&u, "startIndex"), None);
        assert_eq!(query_number(&u, "missing"), None);
    }
}
