// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The request pipeline every call to Twitter goes through.
//!
//! The `Pipeline` trait is the narrow capability the resource operations are built on: four
//! shapes of request, each of which either returns its result or an `Error` that has already been
//! translated from whatever the transport saw. `RestPipeline` is the implementation that talks to
//! Twitter over HTTP.
//!
//! # Blocking
//!
//! Every pipeline call blocks the calling thread until the response has been read (or the
//! configured timeout elapses). `RestPipeline` drives its requests on a small single-threaded
//! runtime it owns, so no call leaves work running in the background once it returns. Calls may
//! be made from any number of threads at once, but not from inside an async runtime: use
//! `tokio::task::spawn_blocking` or a dedicated thread there. Creating and dropping a pipeline is
//! fine anywhere.

use std::time::{Duration, Instant};

use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request};
use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;
use tracing::{debug, warn};
use url::Url;

use crate::auth::raw::RequestBuilder;
use crate::auth::Identity;
use crate::codec::Decoder;
use crate::common::*;
use crate::config::Config;
use crate::error::{Error, Result, TransportError};
use crate::{links, uri};

/// The four request shapes every resource operation is expressed in.
///
/// Query parameters are optional everywhere; `None` and an empty `ParamList` mean the same thing.
/// No method ever hands back an HTTP status: failures come back as the matching `Error` variant.
pub trait Pipeline: Send + Sync {
    /// Issues a GET to `path` and decodes the response body as `T`.
    fn fetch<T: DeserializeOwned>(&self, path: &str, params: Option<&ParamList>) -> Result<T>;

    /// Issues a GET to `path` and returns the raw response body.
    ///
    /// If the response is a redirect, this fails with `Error::UnsupportedRedirect` rather than
    /// returning the (empty) body of the redirect.
    fn fetch_binary(&self, path: &str, params: Option<&ParamList>) -> Result<Vec<u8>>;

    /// Issues a POST to `path` with `data` as its form-encoded body, and decodes the response
    /// body as `T`.
    fn publish<T: DeserializeOwned>(
        &self,
        path: &str,
        data: &ParamList,
        params: Option<&ParamList>,
    ) -> Result<T>;

    /// Issues a POST to `path` with `data` as its form-encoded body, discarding the response
    /// body. Failures are reported exactly as for `publish`.
    fn publish_ack(&self, path: &str, data: &ParamList, params: Option<&ParamList>) -> Result<()>;

    /// Issues a DELETE to `path`, discarding the response body.
    fn remove(&self, path: &str, params: Option<&ParamList>) -> Result<()>;
}

#[cfg(feature = "native_tls")]
type Connector = hyper_tls::HttpsConnector<HttpConnector>;

#[cfg(feature = "native_tls")]
fn new_https_connector() -> Connector {
    hyper_tls::HttpsConnector::new()
}

#[cfg(all(feature = "rustls", not(feature = "native_tls")))]
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

#[cfg(all(feature = "rustls", not(feature = "native_tls")))]
fn new_https_connector() -> Connector {
    hyper_rustls::HttpsConnector::with_native_roots()
}

#[cfg(all(feature = "rustls_webpki", not(any(feature = "native_tls", feature = "rustls"))))]
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

#[cfg(all(feature = "rustls_webpki", not(any(feature = "native_tls", feature = "rustls"))))]
fn new_https_connector() -> Connector {
    hyper_rustls::HttpsConnector::with_webpki_roots()
}

#[cfg(not(any(feature = "native_tls", feature = "rustls", feature = "rustls_webpki")))]
type Connector = HttpConnector;

#[cfg(not(any(feature = "native_tls", feature = "rustls", feature = "rustls_webpki")))]
fn new_https_connector() -> Connector {
    HttpConnector::new()
}

/// Sends requests and reads their responses to completion, one call at a time.
struct Transport {
    client: Client<Connector, Body>,
    // only taken while dropping
    runtime: Option<Runtime>,
    timeout: Option<Duration>,
}

impl Transport {
    fn new(timeout: Option<Duration>) -> Result<Transport> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(TransportError::from)?;
        // redirects are never followed, and no connection outlives the call that opened it
        let client = Client::builder()
            .pool_max_idle_per_host(0)
            .build(new_https_connector());

        Ok(Transport {
            client,
            runtime: Some(runtime),
            timeout,
        })
    }

    fn send(&self, request: Request<Body>) -> Result<RawResponse> {
        let exchange = async {
            let resp = self.client.request(request).await?;
            let (parts, body) = resp.into_parts();
            let body = hyper::body::to_bytes(body).await?;
            Ok::<_, Error>(RawResponse {
                status: parts.status,
                headers: parts.headers,
                body: body.to_vec(),
            })
        };

        let runtime = self.runtime.as_ref().expect("transport runtime is only taken on drop");
        match self.timeout {
            Some(limit) => runtime.block_on(async {
                match tokio::time::timeout(limit, exchange).await {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::TimedOut(limit).into()),
                }
            }),
            None => runtime.block_on(exchange),
        }
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        // a plain drop blocks, which panics when the client is dropped inside an async context
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// A `Pipeline` that talks to Twitter over HTTP.
///
/// Its identity, decoder and configuration are fixed when it is created, so a single instance
/// can be shared between threads (usually behind an `Arc`) without any locking.
pub struct RestPipeline {
    identity: Identity,
    base: Url,
    decoder: Decoder,
    user_agent: String,
    transport: Transport,
}

impl RestPipeline {
    /// Creates a pipeline that sends requests as `identity` and decodes responses with `decoder`.
    ///
    /// Fails with `Error::MalformedUri` if the configured API base isn't an absolute URL.
    pub fn new(identity: Identity, config: Config, decoder: Decoder) -> Result<RestPipeline> {
        let base = uri::parse_base(&config.api_base)?;
        let transport = Transport::new(config.timeout)?;

        Ok(RestPipeline {
            identity,
            base,
            decoder,
            user_agent: config.user_agent,
            transport,
        })
    }

    /// Returns whether requests from this pipeline are signed on behalf of a user.
    pub fn is_authorized_for_user(&self) -> bool {
        self.identity.is_authorized_for_user()
    }

    /// The decoder responses are decoded with.
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// The absolute URL request paths are resolved against.
    pub fn api_base(&self) -> &Url {
        &self.base
    }

    fn execute(
        &self,
        method: Method,
        path: &str,
        query: Option<&ParamList>,
        body: Option<&ParamList>,
    ) -> Result<RawResponse> {
        let span = tracing::debug_span!("twitter_request", method = %method, path);
        let _enter = span.enter();

        if !self.identity.is_authorized_for_user() && links::requires_authorization(path) {
            warn!("anonymous client called an endpoint that requires authorization");
            return Err(Error::BadCredentials);
        }

        let mut builder = RequestBuilder::new(method, &self.base, path).user_agent(&self.user_agent);
        if let Some(query) = query {
            builder = builder.with_query_params(query);
        }
        if let Some(body) = body {
            builder = builder.with_body_params(body);
        }
        let request = builder.request(&self.identity)?;

        debug!(uri = %request.uri(), "sending request");
        let start = Instant::now();
        let response = self.transport.send(request).map_err(|err| {
            warn!(error = %err, "request failed before a response arrived");
            err
        })?;
        debug!(
            status = response.status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "received response"
        );
        if let Some((limit, remaining)) = rate_limit_status(&response.headers) {
            debug!(limit, remaining, "rate limit status");
        }

        translate(response).map_err(|err| {
            match &err {
                Error::BadCredentials | Error::RateLimitExceeded { .. } => {
                    warn!(error = %err, "request rejected")
                }
                _ => debug!(error = %err, "request failed"),
            }
            err
        })
    }

    fn decode<T: DeserializeOwned>(&self, response: RawResponse) -> Result<T> {
        self.decoder
            .decode(response.content_type(), &response.body)
            .map_err(|err| {
                debug!(error = %err, "could not decode response body");
                Error::ApiError {
                    status: response.status.as_u16(),
                    code: None,
                    message: format!("could not decode response: {}", err),
                }
            })
    }
}

impl Pipeline for RestPipeline {
    fn fetch<T: DeserializeOwned>(&self, path: &str, params: Option<&ParamList>) -> Result<T> {
        let response = self.execute(Method::GET, path, params, None)?;
        self.decode(response)
    }

    fn fetch_binary(&self, path: &str, params: Option<&ParamList>) -> Result<Vec<u8>> {
        let response = self.execute(Method::GET, path, params, None)?;
        Ok(response.body)
    }

    fn publish<T: DeserializeOwned>(
        &self,
        path: &str,
        data: &ParamList,
        params: Option<&ParamList>,
    ) -> Result<T> {
        let response = self.execute(Method::POST, path, params, Some(data))?;
        self.decode(response)
    }

    fn publish_ack(&self, path: &str, data: &ParamList, params: Option<&ParamList>) -> Result<()> {
        self.execute(Method::POST, path, params, Some(data))?;
        Ok(())
    }

    fn remove(&self, path: &str, params: Option<&ParamList>) -> Result<()> {
        self.execute(Method::DELETE, path, params, None)?;
        Ok(())
    }
}

impl std::fmt::Debug for RestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("RestPipeline")
            .field("identity", &self.identity)
            .field("base", &self.base.as_str())
            .field("decoder", &self.decoder)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! An in-memory `Pipeline` for exercising the resource operations without a network.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// One call seen by a `MockPipeline`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Call {
        pub method: &'static str,
        pub path: String,
        pub params: ParamList,
        pub data: Option<ParamList>,
    }

    /// Records every call and answers them in order from a queue of canned JSON bodies.
    ///
    /// An empty queue answers with `null`, which is enough for the acknowledgement-only calls.
    #[derive(Default)]
    pub struct MockPipeline {
        calls: Mutex<Vec<Call>>,
        responses: Mutex<VecDeque<Vec<u8>>>,
    }

    impl MockPipeline {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond_with(self, body: serde_json::Value) -> Self {
            self.responses.lock().unwrap().push_back(body.to_string().into_bytes());
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn last_call(&self) -> Call {
            self.calls().pop().expect("no call was made")
        }

        fn record(
            &self,
            method: &'static str,
            path: &str,
            params: Option<&ParamList>,
            data: Option<&ParamList>,
        ) -> Vec<u8> {
            self.calls.lock().unwrap().push(Call {
                method,
                path: path.to_string(),
                params: params.cloned().unwrap_or_default(),
                data: data.cloned(),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| b"null".to_vec())
        }

        fn decode<T: DeserializeOwned>(body: Vec<u8>) -> Result<T> {
            Decoder::twitter()
                .decode(None, &body)
                .map_err(|err| Error::ApiError {
                    status: 200,
                    code: None,
                    message: err.to_string(),
                })
        }
    }

    impl Pipeline for MockPipeline {
        fn fetch<T: DeserializeOwned>(&self, path: &str, params: Option<&ParamList>) -> Result<T> {
            Self::decode(self.record("GET", path, params, None))
        }

        fn fetch_binary(&self, path: &str, params: Option<&ParamList>) -> Result<Vec<u8>> {
            Ok(self.record("GET", path, params, None))
        }

        fn publish<T: DeserializeOwned>(
            &self,
            path: &str,
            data: &ParamList,
            params: Option<&ParamList>,
        ) -> Result<T> {
            Self::decode(self.record("POST", path, params, Some(data)))
        }

        fn publish_ack(
            &self,
            path: &str,
            data: &ParamList,
            params: Option<&ParamList>,
        ) -> Result<()> {
            self.record("POST", path, params, Some(data));
            Ok(())
        }

        fn remove(&self, path: &str, params: Option<&ParamList>) -> Result<()> {
            self.record("DELETE", path, params, None);
            Ok(())
        }
    }

    /// A tweet in the shape Twitter sends it.
    pub fn tweet_json(id: u64, text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "id_str": id.to_string(),
            "created_at": "Wed Aug 27 13:08:45 +0000 2008",
            "text": text,
            "user": user_json(783214, "twitter"),
        })
    }

    /// A user profile in the shape Twitter sends it.
    pub fn user_json(id: u64, screen_name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "id_str": id.to_string(),
            "screen_name": screen_name,
            "name": screen_name,
            "followers_count": 10,
            "created_at": "Tue Feb 20 14:35:54 +0000 2007",
        })
    }
}
