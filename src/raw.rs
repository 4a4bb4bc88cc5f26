// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Raw access to the request- and response-handling primitives the pipeline is built from.
//!
//! The functions and types exposed in this module allow you to drive Twitter calls with your own
//! HTTP stack while still getting the same URIs, OAuth signatures and error translation that
//! `RestPipeline` uses. In return, much more knowledge of the Twitter API is required to use them
//! effectively.
//!
//! The functions can be divided into two categories: assembling a request, and processing the
//! response.
//!
//! * `build_uri` resolves an endpoint path and its query parameters against an API base, and
//!   `request` goes on to produce a complete `hyper` request, signed if the given identity carries
//!   credentials.
//! * Once you've read a response to completion, wrap it in a `RawResponse` and hand it to
//!   `translate_response`, which either returns it unchanged (for a 2xx status) or turns it into
//!   the matching `Error`. The body can then be decoded with a `codec::Decoder`.

use hyper::{Body, Method, Request};
use url::Url;

use crate::auth::raw::RequestBuilder;
use crate::auth::Identity;
use crate::error::Result;

pub use crate::common::response::translate as translate_response;
pub use crate::common::response::{rate_limit_reset, rate_limit_status, Headers, RawResponse};
pub use crate::common::{percent_encode, ParamList};
pub use crate::uri::{build_uri, parse_base};

/// Assembles a request for the endpoint at `path`, relative to `base`.
///
/// `query` ends up in the URI; `body`, if given, is sent form-encoded. When `identity` carries
/// credentials, both take part in the OAuth signature in the `Authorization` header.
pub fn request(
    identity: &Identity,
    method: Method,
    base: &Url,
    path: &str,
    query: Option<&ParamList>,
    body: Option<&ParamList>,
) -> Result<Request<Body>> {
    let mut builder = RequestBuilder::new(method, base, path);
    if let Some(query) = query {
        builder = builder.with_query_params(query);
    }
    if let Some(body) = body {
        builder = builder.with_body_params(body);
    }
    builder.request(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use hyper::header::{AUTHORIZATION, CONTENT_TYPE};

    #[test]
    fn signed_form_request() {
        let base = parse_base("https://api.twitter.com/1.1").unwrap();
        let identity = Identity::from(Credentials::new("ck", "cs", "at", "ats"));
        let data = ParamList::new().add_param("status", "hello");

        let req = request(&identity, Method::POST, &base, "statuses/update.json", None, Some(&data))
            .unwrap();

        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.uri(), "https://api.twitter.com/1.1/statuses/update.json");
        assert_eq!(req.headers()[CONTENT_TYPE], "application/x-www-form-urlencoded");
        let auth = req.headers()[AUTHORIZATION].to_str().unwrap();
        assert!(auth.starts_with("OAuth "));
        assert!(auth.contains("oauth_consumer_key=\"ck\""));
        assert!(auth.contains("oauth_token=\"at\""));
    }

    #[test]
    fn anonymous_delete_has_no_body() {
        let base = parse_base("https://api.twitter.com/1.1/").unwrap();
        let params = ParamList::new().add_param("id", "9");

        let req = request(
            &Identity::Anonymous,
            Method::DELETE,
            &base,
            "direct_messages/destroy.json",
            Some(&params),
            None,
        )
        .unwrap();

        assert_eq!(req.uri(), "https://api.twitter.com/1.1/direct_messages/destroy.json?id=9");
        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert!(req.headers().get(CONTENT_TYPE).is_none());
    }
}
