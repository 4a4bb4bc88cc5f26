// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Assembly of absolute request URIs.

use url::Url;

use crate::common::ParamList;
use crate::error::{Error, Result};

/// Parses the given API base, which must be an absolute URL without a query string or fragment.
///
/// A base that doesn't end with `/` gets one, so that relative paths are appended to it rather
/// than replacing its last segment.
pub fn parse_base(base: &str) -> Result<Url> {
    let url = if base.ends_with('/') {
        Url::parse(base)?
    } else {
        Url::parse(&format!("{}/", base))?
    };

    if url.cannot_be_a_base() {
        return Err(Error::MalformedUri(format!("{} cannot be used as an API base", base)));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::MalformedUri(format!(
            "{} must not carry a query string or fragment",
            base
        )));
    }

    Ok(url)
}

/// Composes the absolute URI for `path` under `base`, with `params` as its query string.
///
/// The parameters are written in the order the `ParamList` holds them, percent-encoded the way
/// Twitter expects (the same encoding used while signing the request). An empty `ParamList`
/// produces a URI without any `?`.
pub fn build_uri(base: &Url, path: &str, params: &ParamList) -> Result<Url> {
    let path = path.trim_start_matches('/');
    let mut uri = base.join(path)?;
    if !uri.as_str().starts_with(base.as_str()) {
        return Err(Error::MalformedUri(format!(
            "{} is not a path relative to the API base",
            path
        )));
    }
    if uri.query().is_some() || uri.fragment().is_some() {
        return Err(Error::MalformedUri(format!(
            "{} must not carry its own query string or fragment",
            path
        )));
    }

    if params.is_empty() {
        uri.set_query(None);
    } else {
        uri.set_query(Some(&params.to_urlencoded()));
    }

    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::btree_map;
    use proptest::prelude::*;

    fn base() -> Url {
        parse_base("https://api.twitter.com/1.1/").unwrap()
    }

    #[test]
    fn empty_params_have_no_query() {
        let uri = build_uri(&base(), "statuses/home_timeline.json", &ParamList::new()).unwrap();
        assert_eq!(uri.as_str(), "https://api.twitter.com/1.1/statuses/home_timeline.json");
        assert!(!uri.as_str().contains('?'));
    }

    #[test]
    fn query_follows_insertion_order() {
        let params = ParamList::new()
            .add_param("q", "test")
            .add_param("count", "10")
            .add_param("include_entities", "true");
        let uri = build_uri(&base(), "search/tweets.json", &params).unwrap();
        assert_eq!(
            uri.as_str(),
            "https://api.twitter.com/1.1/search/tweets.json?q=test&count=10&include_entities=true"
        );
    }

    #[test]
    fn query_round_trips() {
        let params = ParamList::new()
            .add_param("q", "#rust & friends")
            .add_param("geocode", "37.78,-122.39,1mi")
            .add_param("status", "Hello Ladies + Gentlemen, a signed OAuth request!")
            .add_param("lang", "日本語");
        let uri = build_uri(&base(), "search/tweets.json", &params).unwrap();

        let decoded = uri
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect::<Vec<_>>();
        let expected = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(decoded, expected);
    }

    proptest! {
        #[test]
        fn any_params_round_trip(pairs in btree_map(any::<String>(), any::<String>(), 0..8)) {
            let params = pairs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<ParamList>();
            let uri = build_uri(&base(), "search/tweets.json", &params).unwrap();

            let decoded = uri
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect::<Vec<_>>();
            prop_assert_eq!(decoded, pairs.into_iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn leading_slash_is_relative() {
        let uri = build_uri(&base(), "/account/verify_credentials.json", &ParamList::new()).unwrap();
        assert_eq!(uri.as_str(), "https://api.twitter.com/1.1/account/verify_credentials.json");
    }

    #[test]
    fn base_without_trailing_slash() {
        let base = parse_base("http://127.0.0.1:8080/1.1").unwrap();
        let uri = build_uri(&base, "help/test.json", &ParamList::new()).unwrap();
        assert_eq!(uri.as_str(), "http://127.0.0.1:8080/1.1/help/test.json");
    }

    #[test]
    fn base_with_query_or_fragment() {
        assert!(matches!(
            parse_base("https://api.twitter.com/1.1?lang=en"),
            Err(Error::MalformedUri(_))
        ));
        assert!(matches!(
            parse_base("https://api.twitter.com/1.1/?lang=en"),
            Err(Error::MalformedUri(_))
        ));
        assert!(matches!(
            parse_base("https://api.twitter.com/1.1#top"),
            Err(Error::MalformedUri(_))
        ));
    }

    #[test]
    fn malformed() {
        assert!(matches!(parse_base("not a url"), Err(Error::MalformedUri(_))));
        assert!(matches!(parse_base("mailto:someone@example.com"), Err(Error::MalformedUri(_))));
        assert!(matches!(
            build_uri(&base(), "https://evil.example.com/x.json", &ParamList::new()),
            Err(Error::MalformedUri(_))
        ));
        assert!(matches!(
            build_uri(&base(), "../2/tweets.json", &ParamList::new()),
            Err(Error::MalformedUri(_))
        ));
        assert!(matches!(
            build_uri(&base(), "search.json?q=test", &ParamList::new()),
            Err(Error::MalformedUri(_))
        ));
    }
}
