// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Internal mechanisms for the `auth` module: request assembly and OAuth 1.0a signing.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac, NewMac};
use hyper::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use hyper::{Body, Method, Request};
use rand::{self, Rng};
use sha1::Sha1;
use url::Url;

use crate::common::*;
use crate::error::Result;
use crate::uri;

use super::{Identity, KeyPair};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Assembles one request to the API: its URI, its body, and its `Authorization` header.
pub struct RequestBuilder<'a> {
    base: &'a Url,
    path: &'a str,
    method: Method,
    query: Option<&'a ParamList>,
    body: Option<&'a ParamList>,
    user_agent: Option<&'a str>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(method: Method, base: &'a Url, path: &'a str) -> Self {
        RequestBuilder {
            base,
            path,
            method,
            query: None,
            body: None,
            user_agent: None,
        }
    }

    pub fn with_query_params(self, params: &'a ParamList) -> Self {
        RequestBuilder {
            query: Some(params),
            ..self
        }
    }

    pub fn with_body_params(self, params: &'a ParamList) -> Self {
        RequestBuilder {
            body: Some(params),
            ..self
        }
    }

    pub fn user_agent(self, user_agent: &'a str) -> Self {
        RequestBuilder {
            user_agent: Some(user_agent),
            ..self
        }
    }

    /// Returns the absolute URI this request will be sent to, query string included.
    pub fn uri(&self) -> Result<Url> {
        let empty = ParamList::new();
        uri::build_uri(self.base, self.path, self.query.unwrap_or(&empty))
    }

    /// Builds the request, signing it if the given identity carries credentials.
    pub fn request(self, identity: &Identity) -> Result<Request<Body>> {
        let full_uri = self.uri()?;

        let authorization = match identity {
            Identity::Anonymous => None,
            Identity::AuthenticatedForUser(creds) => {
                let mut signing_uri = full_uri.clone();
                signing_uri.set_query(None);
                signing_uri.set_fragment(None);

                let mut params = ParamList::new();
                if let Some(query) = self.query {
                    params.combine(query);
                }
                if let Some(body) = self.body {
                    params.combine(body);
                }

                let header = OAuthParams::from_keys(creds.consumer.clone(), Some(creds.access.clone()))
                    .sign_request(&self.method, signing_uri.as_str(), Some(&params));
                Some(header.to_string())
            }
        };

        let mut request = Request::builder()
            .method(self.method)
            .uri(full_uri.as_str())
            .header(ACCEPT, "application/json");

        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }
        if let Some(user_agent) = self.user_agent {
            request = request.header(USER_AGENT, user_agent);
        }

        let request = match self.body {
            Some(body) => request
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(Body::from(body.to_urlencoded()))?,
            None => request.body(Body::empty())?,
        };

        Ok(request)
    }
}

/// OAuth header set used to create an OAuth signature.
#[derive(Clone, Debug)]
struct OAuthParams {
    /// The consumer key that represents the app making the API request.
    consumer_key: KeyPair,
    /// The token that represents the user authorizing the request.
    token: Option<KeyPair>,
    /// A random token representing the request itself. Used to de-duplicate requests on Twitter's
    /// end.
    nonce: String,
    /// A Unix timestamp for when the request was created.
    timestamp: u64,
}

impl OAuthParams {
    /// Creates an empty `OAuthParams` header with a new `timestamp` and `nonce`.
    ///
    /// **Note**: This should only be used as part of another constructor that populates the tokens!
    /// Attempting to sign a request with an empty consumer and access token will result in an
    /// invalid request.
    fn empty() -> OAuthParams {
        let timestamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(dur) => dur,
            Err(err) => err.duration(),
        }
        .as_secs();
        let mut rng = rand::thread_rng();
        let nonce = ::std::iter::repeat(())
            .map(|()| rng.sample(rand::distributions::Alphanumeric))
            .map(char::from)
            .take(32)
            .collect::<String>();
        OAuthParams {
            consumer_key: KeyPair::empty(),
            token: None,
            nonce,
            timestamp,
        }
    }

    /// Creates a new `OAuthParams` header with the given keys and a fresh nonce and timestamp.
    fn from_keys(consumer_key: KeyPair, token: Option<KeyPair>) -> OAuthParams {
        OAuthParams {
            consumer_key,
            token,
            ..OAuthParams::empty()
        }
    }

    /// Uses the parameters in this `OAuthParams` instance to generate a signature for the given
    /// request, returning it as a `SignedHeader`.
    ///
    /// `uri` must be the request URI without its query string; query and body parameters are
    /// given through `params`.
    fn sign_request(self, method: &Method, uri: &str, params: Option<&ParamList>) -> SignedHeader {
        let query_string = {
            let sig_params = params
                .cloned()
                .unwrap_or_default()
                .append_param("oauth_consumer_key", self.consumer_key.key.clone())
                .append_param("oauth_nonce", self.nonce.clone())
                .append_param("oauth_signature_method", "HMAC-SHA1")
                .append_param("oauth_timestamp", self.timestamp.to_string())
                .append_param("oauth_version", "1.0");
            let sig_params = match &self.token {
                Some(token) => sig_params.append_param("oauth_token", token.key.clone()),
                None => sig_params,
            };

            let mut query = sig_params
                .iter()
                .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
                .collect::<Vec<_>>();
            query.sort();

            query.join("&")
        };

        let base_str = format!(
            "{}&{}&{}",
            percent_encode(method.as_str()),
            percent_encode(uri),
            percent_encode(&query_string)
        );
        let key = format!(
            "{}&{}",
            percent_encode(&self.consumer_key.secret),
            percent_encode(self.token.as_ref().map_or("", |t| t.secret.as_ref()))
        );

        // HMAC takes keys of any length
        let mut digest =
            Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
        digest.update(base_str.as_bytes());

        let mut params: BTreeMap<&'static str, Cow<'static, str>> = BTreeMap::new();
        params.insert("oauth_signature_method", "HMAC-SHA1".into());
        params.insert("oauth_version", "1.0".into());

        params.insert("oauth_consumer_key", self.consumer_key.key);
        if let Some(token) = self.token {
            params.insert("oauth_token", token.key);
        }

        params.insert("oauth_nonce", self.nonce.into());
        params.insert("oauth_timestamp", self.timestamp.to_string().into());

        params.insert("oauth_signature", base64::encode(&digest.finalize().into_bytes()).into());

        SignedHeader { params }
    }
}

/// A set of `OAuthParams` parameters combined with a request signature, ready to be attached to a
/// request.
struct SignedHeader {
    /// The OAuth parameters used to create the signature.
    params: BTreeMap<&'static str, Cow<'static, str>>,
}

/// The `Display` impl for `SignedHeader` formats it as an `Authorization` header for an HTTP
/// request.
impl fmt::Display for SignedHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // authorization scheme
        write!(f, "OAuth ")?;

        // authorization data

        let mut first = true;
        for (k, v) in &self.params {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }

            write!(f, "{}=\"{}\"", k, percent_encode(v))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;

    // the worked example from Twitter's "Creating a signature" documentation
    fn documented_params() -> OAuthParams {
        OAuthParams {
            consumer_key: KeyPair::new(
                "xvz1evFS4wEEPTGEFPHBog",
                "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            ),
            token: Some(KeyPair::new(
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
                "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
            )),
            nonce: "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg".to_string(),
            timestamp: 1318622958,
        }
    }

    #[test]
    fn documented_signature() {
        let params = ParamList::new()
            .add_param("status", "Hello Ladies + Gentlemen, a signed OAuth request!")
            .add_param("include_entities", "true");

        let header = documented_params()
            .sign_request(
                &Method::POST,
                "https://api.twitter.com/1.1/statuses/update.json",
                Some(&params),
            );

        assert_eq!(header.params["oauth_signature"], "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");

        let rendered = header.to_string();
        assert!(rendered.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(rendered.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
    }

    #[test]
    fn empty_secrets_still_sign() {
        let params = OAuthParams {
            consumer_key: KeyPair::new("ck", ""),
            token: None,
            nonce: "nonce".to_string(),
            timestamp: 1318622958,
        };

        let header = params.sign_request(&Method::GET, "https://api.twitter.com/1.1/help/test.json", None);
        assert!(!header.params["oauth_signature"].is_empty());
        assert!(!header.params.contains_key("oauth_token"));
    }

    #[test]
    fn anonymous_requests_are_unsigned() {
        let base = Url::parse("https://api.twitter.com/1.1/").unwrap();
        let query = ParamList::new().add_param("q", "test");
        let request = RequestBuilder::new(Method::GET, &base, "search/tweets.json")
            .with_query_params(&query)
            .request(&Identity::Anonymous)
            .unwrap();

        assert_eq!(request.uri(), "https://api.twitter.com/1.1/search/tweets.json?q=test");
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn authenticated_requests_are_signed() {
        let base = Url::parse("https://api.twitter.com/1.1/").unwrap();
        let body = ParamList::new().add_param("status", "hello");
        let identity = Identity::from(Credentials::new("ck", "cs", "at", "as"));
        let request = RequestBuilder::new(Method::POST, &base, "statuses/update.json")
            .with_body_params(&body)
            .user_agent("birdhouse-test")
            .request(&identity)
            .unwrap();

        let auth = request.headers()[AUTHORIZATION].to_str().unwrap();
        assert!(auth.starts_with("OAuth "));
        assert!(auth.contains("oauth_consumer_key=\"ck\""));
        assert!(auth.contains("oauth_token=\"at\""));
        assert!(auth.contains("oauth_signature=\""));
        assert_eq!(request.headers()[CONTENT_TYPE], FORM_CONTENT_TYPE);
        assert_eq!(request.headers()[USER_AGENT], "birdhouse-test");
        assert_eq!(request.method(), Method::POST);
    }
}
